use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::err::Error;

/// String-keyed durable store, the local-storage analog. Reads are
/// infallible (an absent key is just `None`); writes can fail only in
/// backends that actually touch the filesystem.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error>;
    fn remove_item(&mut self, key: &str) -> Result<(), Error>;
}

/// Plain in-memory map. The default store for tests and for callers that
/// do not need anything to survive the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Error> {
        self.items.remove(key);
        Ok(())
    }
}

/// File-backed store: the whole key-value map is one JSON object on disk,
/// rewritten on every mutation. Loading is best-effort, a missing or
/// corrupt file yields an empty map rather than an error.
///
/// Two instances opened on the same path do not see each other's writes;
/// the last one to flush wins, same as two browser tabs sharing a profile.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: HashMap<String, String>,
}

impl FileStorage {
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();
        let items = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::warn!(
                    "storage file {} is corrupt, starting empty: {}",
                    path.display(),
                    err
                );
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self { path, items }
    }

    fn flush(&self) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("criando {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_string(&self.items).context("serializando armazenamento")?;
        fs::write(&self.path, raw)
            .with_context(|| format!("gravando {}", self.path.display()))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.items.insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Error> {
        self.items.remove(key);
        self.flush()
    }
}
