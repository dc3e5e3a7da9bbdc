//! Request-scoped services behind the handlers.

pub mod signing;
pub mod upload;

pub use signing::{presign_reference, signed_response, signed_responses};
pub use upload::{StoredVideo, ThumbnailIngest, VideoIngest};
