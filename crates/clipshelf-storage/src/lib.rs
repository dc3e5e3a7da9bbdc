//! Storage layer for clipshelf.
//!
//! This crate provides the object storage abstraction used by the upload
//! pipeline, its S3 implementation, the local asset store for thumbnails,
//! collision-resistant key generation, and the packed reference codec.
//!
//! # Object key format
//!
//! Video keys are `{orientation}/{random}.{ext}` where `{orientation}` is one
//! of `landscape`, `portrait` or `other` and `{random}` is 256 bits of CSPRNG
//! output, base64 URL-safe without padding. Thumbnail filenames use the same
//! random form without the orientation prefix.
//!
//! # Stored references
//!
//! Records persist `"{bucket},{key}"` as a single packed string. Parsing is
//! centralized in [`reference`]; no other module may split on the delimiter.

pub mod keys;
pub mod local;
pub mod reference;
pub mod s3;
pub mod traits;

pub use keys::{generate_asset_filename, generate_object_key};
pub use local::LocalAssetStore;
pub use reference::{ObjectRef, REFERENCE_DELIMITER};
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
