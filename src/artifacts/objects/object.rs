use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bytes::Bytes;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(oid: &ObjectId, content: Bytes) -> Result<Self>
    where
        Self: Sized;
}

/// Anything that can be written to the object store
///
/// The identity of an object is the digest of its serialized form, so two
/// objects with identical content always share an ID.
pub trait Object: Packable {
    fn display(&self) -> String;

    fn object_id(&self) -> Result<ObjectId> {
        Ok(ObjectId::hash(&self.serialize()?))
    }
}
