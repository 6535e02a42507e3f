use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use failure::Fail;
use log::debug;

#[derive(Debug, Fail)]
pub enum StoreError {
  #[fail(display = "Invalid key: {:?}", key)]
  InvalidKey { key: String },

  #[fail(display = "IO error: {}", cause)]
  Io { cause: io::Error },
}

impl From<io::Error> for StoreError {
  fn from(cause: io::Error) -> Self {
    StoreError::Io { cause }
  }
}

pub trait Store {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

  fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

  ///! Returns whether there was a value to delete
  fn delete(&mut self, key: &str) -> Result<bool, StoreError>;

  ///! Every stored key, sorted
  fn keys(&self) -> Result<Vec<String>, StoreError>;
}

fn check_key(key: &str) -> Result<(), StoreError> {
  let valid = !key.is_empty()
    && key
      .chars()
      .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');

  if valid {
    Ok(())
  } else {
    Err(StoreError::InvalidKey {
      key: key.to_string(),
    })
  }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  values: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> MemoryStore {
    MemoryStore::default()
  }
}

impl Store for MemoryStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    check_key(key)?;
    Ok(self.values.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
    check_key(key)?;
    self.values.insert(key.to_string(), value);
    Ok(())
  }

  fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
    check_key(key)?;
    Ok(self.values.remove(key).is_some())
  }

  fn keys(&self) -> Result<Vec<String>, StoreError> {
    let mut keys: Vec<String> = self.values.keys().cloned().collect();
    keys.sort();
    Ok(keys)
  }
}

///! Keeps every value in its own `<key>.json` file inside a directory
pub struct FileStore {
  root: PathBuf,
}

impl FileStore {
  pub fn new<T>(root: T) -> Result<FileStore, StoreError>
  where
    T: Into<PathBuf>,
  {
    let root = root.into();
    fs::create_dir_all(&root)?;
    Ok(FileStore { root })
  }

  fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
    check_key(key)?;
    Ok(self.root.join(format!("{}.json", key)))
  }
}

impl Store for FileStore {
  fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let path = self.path(key)?;
    match fs::read_to_string(&path) {
      Ok(content) => Ok(Some(content)),
      Err(ref err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(err) => Err(err.into()),
    }
  }

  fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
    let path = self.path(key)?;
    debug!("Writing {:?}", path);
    fs::write(path, value)?;
    Ok(())
  }

  fn delete(&mut self, key: &str) -> Result<bool, StoreError> {
    let path = self.path(key)?;
    match fs::remove_file(&path) {
      Ok(()) => {
        debug!("Deleted {:?}", path);
        Ok(true)
      }
      Err(ref err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
      Err(err) => Err(err.into()),
    }
  }

  fn keys(&self) -> Result<Vec<String>, StoreError> {
    let mut keys = Vec::new();
    for entry in fs::read_dir(&self.root)? {
      let path = entry?.path();
      if path.extension().map_or(false, |ext| ext == "json") {
        let key = path.file_stem().and_then(|stem| stem.to_str());
        if let Some(key) = key.filter(|key| check_key(key).is_ok()) {
          keys.push(key.to_string());
        }
      }
    }
    keys.sort();
    Ok(keys)
  }
}

#[cfg(test)]
mod test {

  use std::env;
  use std::fs;

  use super::{FileStore, MemoryStore, Store, StoreError};

  #[test]
  pub fn memory_store() {
    let mut store = MemoryStore::new();
    assert_eq!(store.get("tune").unwrap(), None);
    store.set("tune", "{}".to_string()).unwrap();
    assert_eq!(store.get("tune").unwrap(), Some("{}".to_string()));

    store.set("jig", "{}".to_string()).unwrap();
    assert_eq!(store.keys().unwrap(), vec!["jig", "tune"]);
    assert!(store.delete("tune").unwrap());
    assert!(!store.delete("tune").unwrap());
    assert_eq!(store.get("tune").unwrap(), None);
    assert_eq!(store.keys().unwrap(), vec!["jig"]);
  }

  #[test]
  pub fn invalid_keys() {
    let mut store = MemoryStore::new();
    for key in &["", "../tune", "a/b", "tune.json"] {
      match store.set(key, String::new()) {
        Err(StoreError::InvalidKey { .. }) => {}
        other => panic!("unexpected result for {:?}: {:?}", key, other),
      }
    }
  }

  #[test]
  pub fn file_store() {
    let root = env::temp_dir().join(format!("tab-studio-store-{}", std::process::id()));
    let mut store = FileStore::new(root.clone()).unwrap();
    assert_eq!(store.get("reel").unwrap(), None);
    store.set("reel", "{\"bpm\":120}".to_string()).unwrap();
    assert_eq!(store.get("reel").unwrap(), Some("{\"bpm\":120}".to_string()));
    assert!(root.join("reel.json").exists());

    let reopened = FileStore::new(root.clone()).unwrap();
    assert!(reopened.get("reel").unwrap().is_some());
    assert!(reopened.get("../reel").is_err());

    let mut store = reopened;
    store.set("jig", "{}".to_string()).unwrap();
    fs::write(root.join("notes.txt"), "not a tune").unwrap();
    assert_eq!(store.keys().unwrap(), vec!["jig", "reel"]);
    assert!(store.delete("reel").unwrap());
    assert!(!store.delete("reel").unwrap());
    assert!(!root.join("reel.json").exists());
    assert_eq!(store.keys().unwrap(), vec!["jig"]);

    drop(fs::remove_dir_all(root));
  }
}
