//! Tests for the `info` and `resolve` command output.

use std::path::Path;

use docsave_cli::cli::ResolveArgs;
use docsave_cli::commands::{load_config, run_resolve};
use docsave_cli::summary::info_rows;
use docsave_core::{LocalWriteStrategy, SaverConfig};
use docsave_model::DocumentOrigin;

fn render(rows: &[(&str, String)]) -> String {
    rows.iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn info_rows_for_defaults() {
    let rows = info_rows(&SaverConfig::default(), None);
    insta::assert_snapshot!(render(&rows), @r"
    Config file: (defaults)
    Buffer size: 16384 bytes
    Local strategy: atomic-replace
    Keep history: yes
    Silent I/O errors: no
    Poll interval: 50 ms
    ");
}

#[test]
fn info_rows_for_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "local_strategy = \"in-place\"\nkeep_history = false\nbuffer_size = 4096\n",
    )
    .unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.local_strategy, LocalWriteStrategy::InPlace);

    let rows = info_rows(&config, Some(Path::new("/etc/docsave/config.toml")));
    insta::assert_snapshot!(render(&rows), @r"
    Config file: /etc/docsave/config.toml
    Buffer size: 4096 bytes
    Local strategy: in-place
    Keep history: no
    Silent I/O errors: no
    Poll interval: 50 ms
    ");
}

#[test]
fn invalid_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "buffer_size = 0\n").unwrap();

    let error = load_config(Some(&path)).unwrap_err();
    assert!(format!("{error:#}").contains("config.toml"));
}

#[test]
fn resolve_workspace_reference() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("proj/reports")).unwrap();
    std::fs::write(root.path().join("proj/reports/a.rptdesign"), "<report/>").unwrap();
    let root = std::fs::canonicalize(root.path()).unwrap();

    let resolution = run_resolve(&ResolveArgs {
        input: format!("workspace:{}:/proj/reports/a.rptdesign", root.display()),
    })
    .unwrap();

    assert_eq!(resolution.origin, DocumentOrigin::Workspace);
    assert_eq!(resolution.path, Some(root.join("proj/reports/a.rptdesign")));
    assert_eq!(resolution.project_folder, Some(root.join("proj")));
    assert_eq!(resolution.document_bytes, Some(9));
}
