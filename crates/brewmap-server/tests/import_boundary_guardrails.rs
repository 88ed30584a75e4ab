use std::path::{Path, PathBuf};

fn rust_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in std::fs::read_dir(dir).expect("read src dir") {
        let path = entry.expect("dir entry").path();
        if path.is_dir() {
            rust_sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
}

#[test]
fn server_reaches_storage_only_through_the_store_crate() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cargo_toml =
        std::fs::read_to_string(manifest_dir.join("Cargo.toml")).expect("read Cargo.toml");
    assert!(
        !cargo_toml.contains("rusqlite"),
        "server must not depend on rusqlite directly"
    );

    let mut files = Vec::new();
    rust_sources(&manifest_dir.join("src"), &mut files);
    assert!(!files.is_empty());
    for file in files {
        let text = std::fs::read_to_string(&file).expect("read source");
        assert!(
            !text.contains("rusqlite"),
            "{} references rusqlite",
            file.display()
        );
    }
}

#[test]
fn server_config_leaves_the_process_only_through_redacted_debug() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let config = std::fs::read_to_string(manifest_dir.join("src/config/mod.rs"))
        .expect("read config source");
    assert!(
        !config.contains("Serialize"),
        "ServerConfig carries the secret key and must not be serializable"
    );
    assert!(config.contains("impl fmt::Debug for ServerConfig"));
}
