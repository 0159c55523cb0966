//! Content-addressed object store
//!
//! Objects are immutable byte strings keyed by the digest of their content.
//! The store is append-only: there is no update or delete, and writing an
//! object that already exists is a no-op. Because of that, reading an object
//! whose ID is known to exist is always safe, whatever else is going on in
//! the repository.
//!
//! On disk each object is zlib-compressed under `objects/<2 hex>/<38 hex>`.

use crate::areas::storage::Storage;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use std::io::{Read, Write};
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug)]
pub struct Database {
    storage: Rc<dyn Storage>,
    path: Box<Path>,
}

impl Database {
    pub fn new(storage: Rc<dyn Storage>, path: Box<Path>) -> Self {
        Database { storage, path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.storage.exists(&self.path.join(object_id.to_path()))
    }

    /// Store raw content and return its digest
    pub fn put(&self, content: &[u8]) -> Result<ObjectId> {
        let object_id = ObjectId::hash(content);

        // write the object unless it already exists
        if !self.contains(&object_id) {
            let object_path = self.path.join(object_id.to_path());
            let compressed = Self::compress(content, &object_path)?;
            self.storage.write(&object_path, &compressed)?;

            debug!(oid = %object_id, size = content.len(), "stored object");
        }

        Ok(object_id)
    }

    /// Read the raw content stored under a digest
    pub fn get(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        let compressed = self.storage.read(&object_path).map_err(|error| {
            if error.is_not_found() {
                RepositoryError::not_found("object", object_id)
            } else {
                error
            }
        })?;

        Self::decompress(&compressed, object_id)
    }

    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        self.put(&object.serialize()?)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> Result<Blob> {
        Blob::deserialize(object_id, self.get(object_id)?)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> Result<Commit> {
        let content = self.get(object_id).map_err(|error| {
            if error.is_not_found() {
                RepositoryError::not_found("commit", object_id)
            } else {
                error
            }
        })?;

        Commit::deserialize(object_id, content)
    }

    fn compress(data: &[u8], object_path: &Path) -> Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(data)
            .map_err(|e| RepositoryError::io(object_path, e))?;

        encoder
            .finish()
            .map(Bytes::from)
            .map_err(|e| RepositoryError::io(object_path, e))
    }

    fn decompress(data: &[u8], object_id: &ObjectId) -> Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .map_err(|e| RepositoryError::corrupt(format!("object {}", object_id), e))?;

        Ok(decompressed_content.into())
    }
}
