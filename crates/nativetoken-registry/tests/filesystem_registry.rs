//! End-to-end registry runs against a real token file

use assert_matches::assert_matches;
use nativetoken_core::{RegistryConfig, TokenError, TokenType, INVALID_TOKEN_ID};
use nativetoken_effects::{FilesystemTokenStore, OsRandomHandler};
use nativetoken_registry::TokenRegistry;
use nativetoken_testkit::RequestBuilder;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

type DiskRegistry = TokenRegistry<OsRandomHandler, FilesystemTokenStore>;

fn token_file(dir: &TempDir) -> PathBuf {
    dir.path().join("nativetoken.json")
}

fn open(path: &Path) -> DiskRegistry {
    let config = RegistryConfig {
        sync_owner_with_parent: false,
        ..RegistryConfig::with_token_file(path)
    };
    TokenRegistry::new(
        OsRandomHandler::new(),
        FilesystemTokenStore::from_config(&config),
        config,
    )
}

fn read_records(path: &Path) -> Vec<Value> {
    match serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap() {
        Value::Array(records) => records,
        other => panic!("unexpected root {other}"),
    }
}

fn scenario_a_request() -> nativetoken_core::TokenRequest {
    RequestBuilder::new("foo")
        .dcaps(["A"])
        .perms(["p1", "p2"])
        .apl("system_basic")
        .build()
}

#[test]
fn test_fresh_registry_registers_first_process() {
    let dir = tempfile::tempdir().unwrap();
    let path = token_file(&dir);
    let mut registry = open(&path);

    let token = registry.register(&scenario_a_request()).unwrap();
    assert_ne!(token.as_u64(), INVALID_TOKEN_ID);

    let records = read_records(&path);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["processName"], "foo");
    assert_eq!(records[0]["APL"], 2);
}

#[test]
fn test_second_process_and_reregistration() {
    let dir = tempfile::tempdir().unwrap();
    let path = token_file(&dir);
    let mut registry = open(&path);

    let foo = registry.register(&scenario_a_request()).unwrap();
    let bar = registry
        .register(&RequestBuilder::standard("bar").apl("normal").build())
        .unwrap();
    assert_ne!(foo.token_id().unique_id(), bar.token_id().unique_id());
    assert_eq!(read_records(&path).len(), 2);

    assert_eq!(registry.register(&scenario_a_request()).unwrap(), foo);
}

#[test]
fn test_rejected_request_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = token_file(&dir);
    let mut registry = open(&path);
    registry.register(&scenario_a_request()).unwrap();
    let before = fs::read(&path).unwrap();

    let bad = RequestBuilder::standard("baz").apl("unknown").build();
    assert_matches!(
        registry.register(&bad),
        Err(TokenError::InvalidRequest { .. })
    );
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn test_tokens_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = token_file(&dir);

    let mut tokens = Vec::new();
    {
        let mut registry = open(&path);
        for i in 0..200 {
            let request = RequestBuilder::standard(format!("proc_{i}")).build();
            tokens.push(registry.register(&request).unwrap());
        }
    }

    let mut registry = open(&path);
    assert_eq!(registry.entries().unwrap().len(), 200);
    for (i, token) in tokens.iter().enumerate() {
        let request = RequestBuilder::standard(format!("proc_{i}")).build();
        assert_eq!(registry.register(&request).unwrap(), *token);
    }
}

#[test]
fn test_missing_file_created_on_first_use() {
    let dir = tempfile::tempdir().unwrap();
    let path = token_file(&dir);
    let mut registry = open(&path);
    assert!(!path.exists());

    assert!(registry.entries().unwrap().is_empty());
    assert!(path.exists());
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}

#[test]
fn test_corrupt_file_fails_until_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let path = token_file(&dir);
    fs::write(&path, "[{\"processName\": 7}]").unwrap();
    let mut registry = open(&path);

    let request = RequestBuilder::standard("foo").build();
    assert!(registry.register(&request).is_err());
    assert!(!registry.is_initialized());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "[{\"processName\": 7}]"
    );

    fs::write(&path, "[]").unwrap();
    assert!(registry.register(&request).is_ok());
    assert_eq!(read_records(&path).len(), 1);
}

#[test]
fn test_oversized_file_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = token_file(&dir);
    fs::write(&path, " ".repeat(102_401)).unwrap();
    let mut registry = open(&path);

    assert_matches!(registry.entries(), Err(TokenError::FileTooLarge { .. }));
}

#[test]
fn test_shell_process_persisted_with_shell_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = token_file(&dir);
    let mut registry = open(&path);
    registry
        .register(&RequestBuilder::standard("hdcd").build())
        .unwrap();

    let mut reopened = open(&path);
    let entry = reopened.lookup("hdcd").unwrap().unwrap();
    assert_eq!(entry.token_id.token_type(), Some(TokenType::Shell));
}

#[test]
fn test_missing_directory_fails_initialization() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nativetoken.json");
    let mut registry = open(&path);

    assert!(registry
        .register(&RequestBuilder::standard("foo").build())
        .is_err());
    assert!(!registry.is_initialized());
}
