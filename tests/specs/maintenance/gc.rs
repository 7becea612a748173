//! Garbage collection specs

use crate::prelude::*;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;

/// Answer one catalog request with the given JSON body
fn catalog_replying(reply: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/exists", listener.local_addr().unwrap());

    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_ascii_lowercase();
            if line.is_empty() {
                break;
            }
            if let Some(value) = line.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).unwrap();

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            reply.len(),
            reply
        )
        .unwrap();
    });

    url
}

#[test]
fn gc_deletes_only_collections_missing_from_catalog() {
    let temp = Project::empty();
    for id in ["x", "y", "z"] {
        temp.rl().args(&["push", id, "payload"]).passes();
    }

    // Ledger ids are asked about in sorted order: x, y, z
    let url = catalog_replying(r#"{"exists":[true,false,true]}"#);
    let out = temp.rl().args(&["gc", "--catalog-url", url.as_str()]).passes();
    similar_asserts::assert_eq!(
        out.json(),
        serde_json::json!({"scanned": 3, "deleted": 1, "failed": 0})
    );

    temp.rl().args(&["bounds", "x"]).passes();
    temp.rl().args(&["bounds", "y"]).fails();
    temp.rl().args(&["bounds", "z"]).passes();
}

#[test]
fn gc_with_unreachable_catalog_deletes_nothing() {
    let temp = Project::empty();
    temp.rl().args(&["push", "x", "payload"]).passes();

    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let url = format!("http://127.0.0.1:{}/exists", port);
    temp.rl()
        .args(&["gc", "--catalog-url", url.as_str(), "--catalog-timeout", "2s"])
        .fails()
        .stderr_has("catalog");

    temp.rl().args(&["bounds", "x"]).passes();
}
