// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Read-only access to the app's bundled assets.

Paths are relative to the asset root and always use `/`.  Bytes registered with
[AssetStore::insert] shadow the filesystem, which lets tests and embedders supply assets
without a directory on disk.
*/

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::Priority;

#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum AssetError {
    #[error("Can't open asset {path}: {message}")]
    Open { path: String, message: String },
    #[error("Can't read asset {path}: {message}")]
    Read { path: String, message: String },
    #[error("Asset {path} is not valid UTF-8")]
    NotText { path: String },
}

/**
The asset root plus an in-memory overlay.

Cloning is cheap and clones share the overlay.
*/
#[derive(Clone)]
pub struct AssetStore {
    root: PathBuf,
    priority: Priority,
    overlay: Arc<Mutex<HashMap<String, Arc<[u8]>>>>,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>, priority: Priority) -> Self {
        AssetStore {
            root: root.into(),
            priority,
            overlay: Arc::default(),
        }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Registers bytes for `path`, shadowing any file of the same name.
    pub fn insert(&self, path: &str, bytes: impl Into<Arc<[u8]>>) {
        self.overlay.lock().unwrap().insert(path.to_string(), bytes.into());
    }

    /// Drops an overlay entry.
    pub fn remove(&self, path: &str) {
        self.overlay.lock().unwrap().remove(path);
    }

    /// Reads a whole asset.
    pub async fn read(&self, path: &str) -> Result<Arc<[u8]>, AssetError> {
        let shadowed = self.overlay.lock().unwrap().get(path).cloned();
        if let Some(bytes) = shadowed {
            return Ok(bytes);
        }
        let full_path = self.root.join(path);
        let file = async_file::File::open(&full_path, self.priority)
            .await
            .map_err(|e| AssetError::Open {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        let data = file.read_all(self.priority).await.map_err(|e| AssetError::Read {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(Arc::from(&*data))
    }

    /// Reads an asset that must be UTF-8 text.
    pub async fn read_text(&self, path: &str) -> Result<String, AssetError> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| AssetError::NotText { path: path.to_string() })
    }
}

impl std::fmt::Debug for AssetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetStore")
            .field("root", &self.root)
            .field("overlay", &self.overlay.lock().unwrap().keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> AssetStore {
        AssetStore::new(env!("CARGO_MANIFEST_DIR"), async_file::Priority::unit_test())
    }

    #[test]
    fn overlay_shadows_files() {
        let store = store();
        store.insert("Cargo.toml", b"shadowed".to_vec());
        let bytes = test_executors::spin_on(store.read("Cargo.toml")).unwrap();
        assert_eq!(&*bytes, b"shadowed");
        store.remove("Cargo.toml");
        let text = test_executors::spin_on(store.read_text("Cargo.toml")).unwrap();
        assert!(text.contains("metronome_amplified"));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = test_executors::spin_on(store().read("no/such/asset.bin")).unwrap_err();
        assert!(matches!(err, AssetError::Open { ref path, .. } if path == "no/such/asset.bin"));
    }

    #[test]
    fn binary_is_not_text() {
        let store = store();
        store.insert("blob", vec![0xff, 0xfe]);
        let err = test_executors::spin_on(store.read_text("blob")).unwrap_err();
        assert!(matches!(err, AssetError::NotText { .. }));
    }
}
