//! Command behaviour against in-memory and on-disk registries

use nativetoken_cli::commands::{common, delete, get, list, show};
use nativetoken_core::RegistryConfig;
use nativetoken_registry::TokenRegistry;
use nativetoken_testkit::{MemoryTokenStore, MockRandomHandler};
use std::fs;

fn memory_registry(store: &MemoryTokenStore) -> TokenRegistry<MockRandomHandler, MemoryTokenStore> {
    TokenRegistry::new(
        MockRandomHandler::deterministic(),
        store.clone(),
        RegistryConfig::default(),
    )
}

fn get_args(name: &str) -> get::GetArgs {
    get::GetArgs {
        name: name.to_string(),
        apl: "system_basic".to_string(),
        dcaps: vec!["AT_CAP".to_string()],
        perms: vec!["ohos.permission.test1".to_string()],
        acls: vec![],
    }
}

fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}

#[test]
fn get_prints_hex_and_decimal() {
    let store = MemoryTokenStore::new();
    let mut registry = memory_registry(&store);
    let mut out = Vec::new();
    get::run(&mut registry, get_args("foo"), &mut out).unwrap();

    let text = output(out);
    let mut fields = text.split_whitespace();
    let hex = fields.next().unwrap();
    let decimal: u64 = fields.next().unwrap().parse().unwrap();
    assert_eq!(u64::from_str_radix(hex.trim_start_matches("0x"), 16).unwrap(), decimal);
    assert_ne!(decimal, 0);
    assert_eq!(decimal & 0xffff_ffff, 0);
}

#[test]
fn get_rejects_unknown_apl() {
    let store = MemoryTokenStore::new();
    let mut registry = memory_registry(&store);
    let mut args = get_args("foo");
    args.apl = "root".to_string();

    let err = get::run(&mut registry, args, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().contains("foo"));
}

#[test]
fn list_show_and_delete() {
    let store = MemoryTokenStore::new();
    let mut registry = memory_registry(&store);
    get::run(&mut registry, get_args("foo"), &mut Vec::new()).unwrap();
    get::run(&mut registry, get_args("bar"), &mut Vec::new()).unwrap();

    let mut out = Vec::new();
    list::run(&mut registry, &mut out).unwrap();
    let text = output(out);
    let lines: Vec<_> = text.lines().collect();
    assert!(lines[0].starts_with("bar\t"));
    assert!(lines[1].starts_with("foo\t"));
    assert!(lines[1].contains("system_basic"));
    assert!(lines[1].ends_with("dcaps=1 perms=1 acls=0"));
    assert_eq!(lines[2], "2 entries");

    let mut out = Vec::new();
    show::run(&mut registry, "foo", &mut out).unwrap();
    let record: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(record["processName"], "foo");
    assert_eq!(record["APL"], 2);

    delete::run(&mut registry, "foo", &mut Vec::new()).unwrap();
    assert!(show::run(&mut registry, "foo", &mut Vec::new()).is_err());
    assert!(delete::run(&mut registry, "foo", &mut Vec::new()).is_err());
    assert!(!store.contents().unwrap().contains("\"foo\""));
}

#[test]
fn config_override_and_disk_registry() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("registry.toml");
    let token_file = dir.path().join("nativetoken.json");
    fs::write(&config_path, "max_retry = 10\nsync_owner_with_parent = false\n").unwrap();

    let config = common::load_config(&config_path, Some(token_file.clone())).unwrap();
    assert_eq!(config.max_retry, 10);
    assert_eq!(config.token_file, token_file);

    let mut registry = common::open_registry(config.clone());
    assert_eq!(registry.config().max_retry, 10);
    let mut first = Vec::new();
    get::run(&mut registry, get_args("foo"), &mut first).unwrap();

    let mut reopened = common::open_registry(config);
    let mut second = Vec::new();
    get::run(&mut reopened, get_args("foo"), &mut second).unwrap();
    assert_eq!(first, second);

    let text = fs::read_to_string(&token_file).unwrap();
    assert!(text.contains("\"processName\":\"foo\""));
}

#[test]
fn bad_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("registry.toml");
    fs::write(&config_path, "max_retry = 0\n").unwrap();

    let err = common::load_config(&config_path, None).unwrap_err();
    assert!(err.to_string().contains("registry.toml"));
}
