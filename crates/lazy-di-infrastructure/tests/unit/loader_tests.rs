//! Bulk loader tests

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_di_core::{BoxError, EntryState, Error, Instance, Item, Registry};
use lazy_di_infrastructure::config::LoaderConfig;
use lazy_di_infrastructure::loader::{
    FactoryCatalog, LoadOptions, load_dir, load_file, load_items,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn catalog() -> FactoryCatalog {
    let mut catalog = FactoryCatalog::new();
    catalog
        .add_fn("greeter", |_, name| Ok(format!("hello {name}")))
        .add("joiner", |deps, _| async move {
            let parts: Vec<String> = deps
                .iter()
                .map(|dep| dep.downcast_ref::<String>().cloned().unwrap_or_default())
                .collect();
            Ok::<_, BoxError>(Arc::new(parts.join("+")) as Instance)
        });
    catalog
}

#[test]
fn test_load_items_substitutes_placeholder() {
    let registry = Registry::new();
    load_items(
        &registry,
        vec![
            ("users".to_string(), Item::new("handler::?").value(1_u8)),
            ("orders".to_string(), Item::new("handler::?::?").value(2_u8)),
        ],
        &LoadOptions::default(),
    )
    .unwrap();

    assert!(registry.contains("handler::users").unwrap());
    assert!(registry.contains("handler::orders::orders").unwrap());
}

#[test]
fn test_load_items_wraps_registration_errors() {
    let registry = Registry::new();
    registry.register(Item::new("handler::users").value(0_u8)).unwrap();

    let err = load_items(
        &registry,
        vec![("users".to_string(), Item::new("handler::?").value(1_u8))],
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot load users: Dependency handler::users already provided"
    );
}

#[tokio::test]
async fn test_load_items_override() {
    let registry = Registry::new();
    registry.register(Item::new("cfg::db").value(0_u8)).unwrap();

    load_items(
        &registry,
        vec![("db".to_string(), Item::new("cfg::?").value(9_u8))],
        &LoadOptions::default().overriding(true),
    )
    .unwrap();
    assert_eq!(*registry.resolve_as::<u8>("cfg::db").await.unwrap(), 9);
}

#[tokio::test]
async fn test_load_file_with_value() {
    let dir = TempDir::new().unwrap();
    let file = write(
        dir.path(),
        "port.toml",
        "provides = \"config::?\"\ndocs = \"Listening port\"\nvalue = 8080\n",
    );

    let registry = Registry::new();
    load_file(&registry, &file, &catalog(), &LoadOptions::default())
        .await
        .unwrap();

    let value = registry
        .resolve_as::<toml::Value>("config::port")
        .await
        .unwrap();
    assert_eq!(value.as_integer(), Some(8080));
    let entry = registry.entry("config::port").unwrap().unwrap();
    assert_eq!(entry.docs(), Some("Listening port"));
}

#[tokio::test]
async fn test_load_file_with_catalog_factory() {
    let dir = TempDir::new().unwrap();
    let file = write(
        dir.path(),
        "greeting.toml",
        "provides = \"?::*\"\nfactory = \"greeter\"\n",
    );

    let registry = Registry::new();
    load_file(&registry, &file, &catalog(), &LoadOptions::default())
        .await
        .unwrap();

    let value = registry
        .resolve_as::<String>("greeting::bob")
        .await
        .unwrap();
    assert_eq!(value.as_str(), "hello bob");
}

#[tokio::test]
async fn test_load_file_requires_absolute_path() {
    let registry = Registry::new();
    let err = load_file(
        &registry,
        Path::new("relative/item.toml"),
        &catalog(),
        &LoadOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("must be absolute"));
}

#[tokio::test]
async fn test_load_file_reports_bad_manifest() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "broken.toml", "provides = \"a\"\nfactory = \"nope\"\n");

    let registry = Registry::new();
    let err = load_file(&registry, &file, &catalog(), &LoadOptions::default())
        .await
        .unwrap_err();
    match err {
        Error::Load { file: source, message } => {
            assert!(source.ends_with("broken.toml"));
            assert_eq!(message, "unknown factory 'nope'");
        }
        other => panic!("Expected Load error, got {other:?}"),
    }
    assert!(registry.is_empty().unwrap());
}

#[tokio::test]
async fn test_load_dir_filters_and_sorts() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.toml", "provides = \"part::?\"\nvalue = \"B\"\n");
    write(dir.path(), "a.toml", "provides = \"part::?\"\nvalue = \"A\"\n");
    write(dir.path(), "notes.txt", "not a manifest");
    std::fs::create_dir(dir.path().join("nested.toml")).unwrap();
    write(
        dir.path(),
        "all.toml",
        "provides = \"whole\"\nrequires = [\"part::*\"]\nfactory = \"parts\"\n",
    );

    let mut catalog = catalog();
    catalog.add_fn("parts", |deps, _| {
        let group = deps[0]
            .downcast_ref::<lazy_di_core::ProviderGroup>()
            .ok_or("expected a group")?;
        Ok(group.names().join(","))
    });

    let registry = Registry::new();
    let loaded = load_dir(&registry, dir.path(), &catalog, &LoadOptions::default())
        .await
        .unwrap();
    assert_eq!(loaded, 3);

    let whole = registry.resolve_as::<String>("whole").await.unwrap();
    assert_eq!(whole.as_str(), "a,b");
}

#[tokio::test]
async fn test_load_dir_stops_at_first_bad_manifest() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.toml", "provides = \"x::?\"\nvalue = 1\n");
    write(dir.path(), "b.toml", "provides = [not toml");

    let registry = Registry::new();
    let err = load_dir(&registry, dir.path(), &catalog(), &LoadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Load { .. }));
    // a.toml precedes the broken file and is kept
    assert!(registry.contains("x::a").unwrap());
}

#[tokio::test]
async fn test_load_dir_custom_pattern_and_placeholder() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "svc.item.toml", "provides = \"svc::@\"\nvalue = true\n");
    write(dir.path(), "other.toml", "provides = \"other\"\nvalue = true\n");

    let config = LoaderConfig {
        file_pattern: r"\.item\.toml$".to_string(),
        placeholder: "@".to_string(),
        ..LoaderConfig::default()
    };
    let options = LoadOptions::from_config(&config).unwrap();

    let registry = Registry::new();
    load_dir(&registry, dir.path(), &catalog(), &options)
        .await
        .unwrap();

    let paths: Vec<String> = registry.list().unwrap().into_iter().map(|(p, _)| p).collect();
    assert_eq!(paths, vec!["svc::svc.item"]);
}

#[tokio::test]
async fn test_load_dir_requires_absolute_path() {
    let registry = Registry::new();
    let err = load_dir(
        &registry,
        Path::new("items"),
        &catalog(),
        &LoadOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("paths must be absolute"));
}

#[tokio::test]
async fn test_catalog_factory_receives_dependencies() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "pair.toml",
        "provides = \"pair::*\"\nrequires = [\"left\", \"right::{name}\"]\nfactory = \"joiner\"\n",
    );
    let registry = Registry::new();
    registry
        .register(Item::new("left").value("L".to_string()))
        .unwrap()
        .register(Item::new("right::*").factory_fn(|_, name| Ok(format!("R{name}"))))
        .unwrap();

    load_dir(&registry, dir.path(), &catalog(), &LoadOptions::default())
        .await
        .unwrap();

    let entry = registry.entry("pair::*").unwrap().unwrap();
    assert_eq!(entry.state(), EntryState::Unresolved);
    let value = registry.resolve_as::<String>("pair::x").await.unwrap();
    assert_eq!(value.as_str(), "L+Rx");
}
