//! Integration tests for credential loading.

mod common;

use common::TestContext;
use ua_stache::credentials::{load, StacheEntry, STACHE_HOST};
use ua_stache::StacheError;

#[test]
fn test_load_from_credentials_file() {
    let ctx = TestContext::new().unwrap();
    let path = ctx
        .create_credentials("stache.json", "read-key-123", "/api/v1/secret/read/db")
        .unwrap();

    let (header, url) = load(&path).unwrap();

    assert_eq!(header.len(), 1);
    assert_eq!(header["X-STACHE-READ-KEY"], "read-key-123");
    assert_eq!(url, "https://stache.arizona.edu/api/v1/secret/read/db");
}

#[test]
fn test_url_is_host_plus_endpoint() {
    let ctx = TestContext::new().unwrap();

    for endpoint in ["/a", "/api/v1/secret/read/x?version=2", "", "relative/path"] {
        let path = ctx.create_credentials("creds.json", "k", endpoint).unwrap();
        let (_, url) = load(&path).unwrap();

        assert_eq!(url, format!("{}{}", STACHE_HOST, endpoint));
    }
}

#[test]
fn test_entry_matches_load() {
    let ctx = TestContext::new().unwrap();
    let path = ctx.create_credentials("stache.json", "k", "/e").unwrap();

    let entry = StacheEntry::from_file(&path).unwrap();
    let (header, url) = load(&path).unwrap();

    assert_eq!(entry.header(), header);
    assert_eq!(entry.url(), url);
    assert_eq!(entry, StacheEntry::new("k", "/e"));
}

#[test]
fn test_load_nonexistent_file() {
    let ctx = TestContext::new().unwrap();
    let result = load(ctx.temp_path.join("missing.json"));

    match result {
        Err(StacheError::FileAccess { path, .. }) => assert!(path.ends_with("missing.json")),
        other => panic!("expected FileAccess, got {:?}", other),
    }
}

#[test]
fn test_load_invalid_json() {
    let ctx = TestContext::new().unwrap();
    let path = ctx.create_file("stache.json", "X-STACHE-READ-KEY=abc\nendpoint=/e\n").unwrap();

    assert!(matches!(load(&path), Err(StacheError::Parse { .. })));
}

#[test]
fn test_load_missing_fields() {
    let ctx = TestContext::new().unwrap();

    let no_key = ctx.create_file("no_key.json", r#"{"endpoint": "/e"}"#).unwrap();
    assert!(matches!(
        load(&no_key),
        Err(StacheError::MissingField(ref f)) if f == "X-STACHE-READ-KEY"
    ));

    let no_endpoint = ctx
        .create_file("no_endpoint.json", r#"{"X-STACHE-READ-KEY": "k"}"#)
        .unwrap();
    assert!(matches!(
        load(&no_endpoint),
        Err(StacheError::MissingField(ref f)) if f == "endpoint"
    ));
}

#[test]
fn test_load_top_level_array() {
    let ctx = TestContext::new().unwrap();
    let path = ctx.create_file("stache.json", r#"["k", "/e"]"#).unwrap();

    assert!(matches!(load(&path), Err(StacheError::MissingField(_))));
}
