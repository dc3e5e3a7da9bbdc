//! Domain models

mod video;

pub use video::{CreateVideoParams, Video, VideoResponse};
