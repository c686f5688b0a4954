use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Copy named fixtures into a fresh temp dir so runs can rewrite them
#[allow(dead_code)]
pub fn staged(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        fs::copy(fixtures_dir().join(name), dir.path().join(name)).unwrap();
    }
    dir
}

#[allow(dead_code)]
pub fn path_in(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[allow(dead_code)]
pub fn file_bytes(path: &Path) -> Vec<u8> {
    fs::read(path).unwrap()
}
