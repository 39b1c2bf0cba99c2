//! Filesystem-backed blob store.
//!
//! Layout: `<root>/<bucket>/<key>`.  Writes go to a temp file in the
//! bucket directory and are renamed over the target, so readers never
//! see a half-written object.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{not_found, validate_segment, BlobStore};
use crate::errors::Result;

pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    /// Use `root` as the storage directory.  Nothing is created until the
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        validate_segment("bucket", bucket)?;
        validate_segment("key", key)?;
        Ok(self.root.join(bucket).join(key))
    }
}

impl BlobStore for LocalBlobStore {
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        let dir = self.root.join(bucket);
        fs::create_dir_all(&dir)?;

        // Atomic write: temp file in the same directory, then rename.
        let tmp_path = dir.join(format!(".{key}.tmp"));
        fs::write(&tmp_path, data)?;

        // On Unix, restrict permissions to owner-only read/write.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, &path)?;
        debug!(bucket, key, bytes = data.len(), "wrote object");
        Ok(())
    }

    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        if !path.exists() {
            return Err(not_found(bucket, key));
        }
        Ok(fs::read(path)?)
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        Ok(self.object_path(bucket, key)?.is_file())
    }

    fn list(&self, bucket: &str) -> Result<Vec<String>> {
        validate_segment("bucket", bucket)?;
        let dir = self.root.join(bucket);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // Skip in-flight temp files.
            if name.starts_with('.') {
                continue;
            }
            keys.push(name);
        }
        keys.sort();
        Ok(keys)
    }
}
