//! Key/value JSON storage
//!
//! LocalStorage in the browser, one `<key>.json` file per key on native.
//! Native writes go through a temporary file and a rename so a crash never
//! leaves half a file behind.

use std::fmt;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

/// Environment variable naming the native data directory
#[cfg(not(target_arch = "wasm32"))]
pub const DATA_DIR_ENV: &str = "GRAVITY_FLAP_DATA_DIR";
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_DATA_DIR: &str = ".gravity-flap";

/// Storage failures
#[derive(Debug)]
pub enum StorageError {
    /// No storage backend (private browsing, no window)
    Unavailable,
    #[cfg(not(target_arch = "wasm32"))]
    Io(std::io::Error),
    Serialize(serde_json::Error),
    /// Error reported by the browser
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            #[cfg(not(target_arch = "wasm32"))]
            StorageError::Io(e) => write!(f, "storage I/O error: {}", e),
            StorageError::Serialize(e) => write!(f, "storage serialization error: {}", e),
            StorageError::Backend(msg) => write!(f, "storage backend error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(not(target_arch = "wasm32"))]
            StorageError::Io(e) => Some(e),
            StorageError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Handle to the platform's key/value store
#[derive(Debug, Clone)]
pub struct Store {
    #[cfg(not(target_arch = "wasm32"))]
    dir: PathBuf,
}

impl Store {
    /// Store rooted at a specific directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory from `GRAVITY_FLAP_DATA_DIR`, else `.gravity-flap`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open_default() -> Self {
        let dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self::in_dir(dir)
    }

    #[cfg(target_arch = "wasm32")]
    pub fn open_default() -> Self {
        Self {}
    }

    /// Read and parse a value; `Ok(None)` when the key was never written
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.read_raw(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.write_raw(key, &json)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn read_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn write_raw(&self, key: &str, json: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Delete a key (missing keys are fine)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }

    #[cfg(target_arch = "wasm32")]
    fn read_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local_storage()?
            .get_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    #[cfg(target_arch = "wasm32")]
    fn write_raw(&self, key: &str, json: &str) -> Result<(), StorageError> {
        Self::local_storage()?
            .set_item(key, json)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::local_storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}
