//! Blob object
//!
//! Blobs store file content with no metadata. The stored bytes are exactly
//! the file bytes, so a blob's ID is the digest of the file content.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Content decoded as text, replacing invalid UTF-8 sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

impl Packable for Blob {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.content.clone())
    }
}

impl Unpackable for Blob {
    fn deserialize(_oid: &ObjectId, content: Bytes) -> Result<Self> {
        Ok(Self::new(content))
    }
}

impl Object for Blob {
    fn display(&self) -> String {
        self.text()
    }
}
