//! Packed storage reference codec.
//!
//! Records persist a single string `"{bucket},{key}"`. The comma is the one
//! documented delimiter; this module is the only place that splits or joins
//! on it. A stored reference with no delimiter is an internal invariant
//! violation, not a user error.

use crate::traits::{StorageError, StorageResult};
use std::fmt;

/// Delimiter between bucket and key in a packed reference.
pub const REFERENCE_DELIMITER: char = ',';

/// A parsed `"{bucket},{key}"` reference to a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    /// Build a reference, rejecting components that contain the delimiter
    /// (they would be unrecoverable after packing).
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> StorageResult<Self> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.is_empty() || bucket.contains(REFERENCE_DELIMITER) {
            return Err(StorageError::InvalidKey(format!(
                "Invalid bucket in reference: {:?}",
                bucket
            )));
        }
        if key.is_empty() || key.contains(REFERENCE_DELIMITER) {
            return Err(StorageError::InvalidKey(format!(
                "Invalid key in reference: {:?}",
                key
            )));
        }
        Ok(ObjectRef { bucket, key })
    }

    /// Parse a packed reference. Splits on the first delimiter, matching the
    /// historical on-disk contract.
    pub fn parse(reference: &str) -> StorageResult<Self> {
        let (bucket, key) = reference.split_once(REFERENCE_DELIMITER).ok_or_else(|| {
            StorageError::MalformedReference(format!(
                "Reference {:?} has no {:?} delimiter",
                reference, REFERENCE_DELIMITER
            ))
        })?;
        if bucket.is_empty() || key.is_empty() {
            return Err(StorageError::MalformedReference(format!(
                "Reference {:?} has an empty bucket or key",
                reference
            )));
        }
        Ok(ObjectRef {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    /// Pack into the stored form.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.bucket, REFERENCE_DELIMITER, self.key)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let object_ref = ObjectRef::new("clipshelf-media", "landscape/abc123.mp4").unwrap();
        let packed = object_ref.encode();
        assert_eq!(packed, "clipshelf-media,landscape/abc123.mp4");
        assert_eq!(ObjectRef::parse(&packed).unwrap(), object_ref);
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        let err = ObjectRef::parse("no-delimiter-here").unwrap_err();
        assert!(matches!(err, StorageError::MalformedReference(_)));
    }

    #[test]
    fn empty_components_are_malformed() {
        assert!(matches!(
            ObjectRef::parse(",key-only"),
            Err(StorageError::MalformedReference(_))
        ));
        assert!(matches!(
            ObjectRef::parse("bucket-only,"),
            Err(StorageError::MalformedReference(_))
        ));
    }

    #[test]
    fn constructor_rejects_delimiter_in_components() {
        assert!(ObjectRef::new("bad,bucket", "key").is_err());
        assert!(ObjectRef::new("bucket", "bad,key").is_err());
    }

    #[test]
    fn parse_splits_on_first_delimiter() {
        // Keys never contain commas by construction, but parsing follows the
        // historical first-delimiter rule.
        let object_ref = ObjectRef::parse("bucket,key,with,commas").unwrap();
        assert_eq!(object_ref.bucket, "bucket");
        assert_eq!(object_ref.key, "key,with,commas");
    }
}
