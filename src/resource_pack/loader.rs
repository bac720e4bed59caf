//! Resource loaders for directories, ZIP archives and in-memory packs.

use super::path::ResourcePath;
use crate::error::{RenderError, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source of raw pack assets.
///
/// Implementations return [`RenderError::NotFound`] when they simply don't
/// have the asset; any other error means the asset exists but is unusable.
pub trait ResourceLoader: Send + Sync {
    /// Fetch and parse a JSON asset (blockstate, model or `.mcmeta`).
    fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>>;

    /// Fetch the raw bytes of a texture image.
    fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>>;

    /// Release any held resources. Further loads may fail.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Arc<L> {
    fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>> {
        (**self).load_json(path)
    }

    fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
        (**self).load_texture(path)
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Box<L> {
    fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>> {
        (**self).load_json(path)
    }

    fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
        (**self).load_texture(path)
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}

/// Open a pack from a file path.
///
/// Supports both ZIP files and directories.
pub fn open_pack<P: AsRef<Path>>(path: P) -> Result<Box<dyn ResourceLoader>> {
    let path = path.as_ref();

    if path.is_dir() {
        Ok(Box::new(DirectoryLoader::new(path)))
    } else {
        Ok(Box::new(ZipLoader::from_path(path)?))
    }
}

fn parse_json(path: &ResourcePath, bytes: &[u8]) -> Result<Arc<Value>> {
    let value = serde_json::from_slice(bytes).map_err(|e| {
        log::warn!("Failed to parse {}: {}", path, e);
        e
    })?;
    Ok(Arc::new(value))
}

/// Reads assets from an unpacked pack whose root contains `assets/`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, path: &ResourcePath) -> Result<Vec<u8>> {
        let file = self.root.join(path.file_path());
        log::trace!("Reading {}", file.display());
        match std::fs::read(&file) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RenderError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ResourceLoader for DirectoryLoader {
    fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>> {
        let data = self.read(path)?;
        parse_json(path, &data)
    }

    fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
        Ok(Arc::new(self.read(path)?))
    }
}

/// Reads assets from a pack archive. The archive is read once into memory.
#[derive(Debug, Default)]
pub struct ZipLoader {
    entries: Mutex<HashMap<String, Arc<Vec<u8>>>>,
}

impl ZipLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load every file under `assets/` from ZIP bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let cursor = std::io::Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)?;

        let mut entries = HashMap::new();
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            // Skip anything that isn't an asset we know how to address
            let name = file.name().to_string();
            if ResourcePath::from_file_path(&name).is_none() {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            entries.insert(name, Arc::new(contents));
        }

        log::debug!("Loaded {} assets from archive", entries.len());
        Ok(Self {
            entries: Mutex::new(entries),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn read(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
        self.entries
            .lock()
            .get(&path.file_path())
            .cloned()
            .ok_or_else(|| RenderError::NotFound(path.to_string()))
    }
}

impl ResourceLoader for ZipLoader {
    fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>> {
        let data = self.read(path)?;
        parse_json(path, &data)
    }

    fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
        self.read(path)
    }

    fn close(&self) -> Result<()> {
        self.entries.lock().clear();
        Ok(())
    }
}

/// Assets held in memory, keyed by `ResourcePath` string form.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    json: HashMap<String, Arc<Value>>,
    bytes: HashMap<String, Arc<Vec<u8>>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_json(&mut self, path: &ResourcePath, value: Value) {
        self.json.insert(path.to_string(), Arc::new(value));
    }

    pub fn insert_bytes(&mut self, path: &ResourcePath, data: Vec<u8>) {
        self.bytes.insert(path.to_string(), Arc::new(data));
    }

    pub fn with_json(mut self, path: &ResourcePath, value: Value) -> Self {
        self.insert_json(path, value);
        self
    }

    pub fn with_bytes(mut self, path: &ResourcePath, data: Vec<u8>) -> Self {
        self.insert_bytes(path, data);
        self
    }
}

impl ResourceLoader for MemoryLoader {
    fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>> {
        let key = path.to_string();
        if let Some(value) = self.json.get(&key) {
            return Ok(value.clone());
        }
        match self.bytes.get(&key) {
            Some(data) => parse_json(path, data),
            None => Err(RenderError::NotFound(key)),
        }
    }

    fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
        let key = path.to_string();
        self.bytes
            .get(&key)
            .cloned()
            .ok_or(RenderError::NotFound(key))
    }
}

/// Tries each loader in order; the first success wins.
///
/// Only not-found moves on to the next loader. Any other error (a corrupt
/// file, an I/O failure) is returned as is.
#[derive(Default)]
pub struct CompositeLoader {
    loaders: Vec<Box<dyn ResourceLoader>>,
}

impl CompositeLoader {
    pub fn new(loaders: Vec<Box<dyn ResourceLoader>>) -> Self {
        Self { loaders }
    }

    pub fn push<L: ResourceLoader + 'static>(&mut self, loader: L) {
        self.loaders.push(Box::new(loader));
    }

    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    fn first_success<T>(
        &self,
        path: &ResourcePath,
        load: impl Fn(&dyn ResourceLoader) -> Result<T>,
    ) -> Result<T> {
        for (i, loader) in self.loaders.iter().enumerate() {
            match load(loader.as_ref()) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_not_found() => {
                    log::debug!("Loader {} could not load {}: {}", i, path, e)
                }
                Err(e) => return Err(e),
            }
        }
        Err(RenderError::NotFound(format!(
            "Could not load \"{}\" from any source.",
            path
        )))
    }
}

impl ResourceLoader for CompositeLoader {
    fn load_json(&self, path: &ResourcePath) -> Result<Arc<Value>> {
        self.first_success(path, |loader| loader.load_json(path))
    }

    fn load_texture(&self, path: &ResourcePath) -> Result<Arc<Vec<u8>>> {
        self.first_success(path, |loader| loader.load_texture(path))
    }

    fn close(&self) -> Result<()> {
        for loader in &self.loaders {
            loader.close()?;
        }
        Ok(())
    }
}
