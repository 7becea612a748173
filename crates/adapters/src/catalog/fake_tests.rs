// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn ids(names: &[&str]) -> Vec<CollectionId> {
    names.iter().map(|n| CollectionId::from(*n)).collect()
}

#[tokio::test]
async fn fake_catalog_answers_positionally() {
    let catalog = FakeCatalogAdapter::with_collections(["a", "c"]);

    let answers = catalog
        .check_collections_exist(&ids(&["a", "b", "c"]))
        .await
        .unwrap();

    assert_eq!(answers, vec![true, false, true]);
    assert_eq!(
        catalog.calls(),
        vec![CatalogCall::CheckExist {
            ids: ids(&["a", "b", "c"])
        }]
    );
}

#[tokio::test]
async fn fake_catalog_injected_failure_hits_one_call() {
    let catalog = FakeCatalogAdapter::new();
    catalog.fail_on_call(1);

    assert!(catalog.check_collections_exist(&ids(&["a"])).await.is_ok());
    let result = catalog.check_collections_exist(&ids(&["a"])).await;
    assert!(matches!(result, Err(CatalogError::Request(_))));
    assert!(catalog.check_collections_exist(&ids(&["a"])).await.is_ok());
}

#[tokio::test]
async fn fake_catalog_short_answers() {
    let catalog = FakeCatalogAdapter::with_collections(["a"]);
    catalog.answer_short();

    let answers = catalog
        .check_collections_exist(&ids(&["a", "b"]))
        .await
        .unwrap();
    assert_eq!(answers.len(), 1);
}

#[tokio::test]
async fn noop_catalog_knows_everything() {
    let answers = crate::catalog::NoOpCatalogAdapter::new()
        .check_collections_exist(&ids(&["x", "y"]))
        .await
        .unwrap();
    assert_eq!(answers, vec![true, true]);
}
