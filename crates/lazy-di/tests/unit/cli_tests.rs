//! Command-line tests
//!
//! Commands run through `execute` so no global log subscriber is installed.

use clap::Parser;
use lazy_di::cli::{Cli, Command, execute};
use lazy_di::{Item, Registry};

fn registry() -> Registry {
    let registry = Registry::new();
    registry
        .register(Item::new("app::name").docs("Application name").value("demo".to_string()))
        .unwrap()
        .register(Item::new("app::port").value(8080_i64))
        .unwrap()
        .register(Item::new("app::debug").value(Some(true)))
        .unwrap()
        .register(Item::new("secret").value(std::time::Duration::from_secs(1)))
        .unwrap();
    registry
}

#[test]
fn test_parse_arguments() {
    let cli = Cli::try_parse_from([
        "lazy-di",
        "--config",
        "/etc/lazy-di.toml",
        "resolve",
        "env::HOME",
    ])
    .unwrap();
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/etc/lazy-di.toml"))
    );
    assert_eq!(
        cli.command,
        Command::Resolve {
            path: "env::HOME".to_string()
        }
    );

    let cli = Cli::try_parse_from(["lazy-di", "docs", "--preamble", "# Services"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Docs {
            preamble: Some("# Services".to_string())
        }
    );

    assert!(Cli::try_parse_from(["lazy-di"]).is_err());
}

#[tokio::test]
async fn test_list_shows_state() {
    let registry = registry();
    registry.resolve("app::port").await.unwrap();

    let output = execute(&Command::List, &registry).await.unwrap();
    assert_eq!(
        output,
        "app::debug\tunresolved\n\
         app::name\tunresolved\n\
         app::port\tresolved\n\
         secret\tunresolved"
    );
}

#[tokio::test]
async fn test_resolve_renders_values() {
    let registry = registry();
    let resolve = |path: &str| Command::Resolve {
        path: path.to_string(),
    };

    assert_eq!(execute(&resolve("app::name"), &registry).await.unwrap(), "demo");
    assert_eq!(execute(&resolve("app::port"), &registry).await.unwrap(), "8080");
    assert_eq!(execute(&resolve("app::debug"), &registry).await.unwrap(), "true");
    assert_eq!(execute(&resolve("secret"), &registry).await.unwrap(), "<opaque>");
    assert_eq!(
        execute(&resolve("app::*"), &registry).await.unwrap(),
        "debug = true\nname = demo\nport = 8080"
    );
}

#[tokio::test]
async fn test_resolve_unknown_path_fails() {
    let err = execute(
        &Command::Resolve {
            path: "app::missing".to_string(),
        },
        &registry(),
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_docs_command() {
    let output = execute(
        &Command::Docs {
            preamble: Some("# App".to_string()),
        },
        &registry(),
    )
    .await
    .unwrap();
    assert!(output.starts_with("# App\n\n"));
    assert!(output.contains("## `app::name`\n\nApplication name"));
}
