//! Media processing for clipshelf: content-type validation, bounded temp
//! staging, container inspection, and fast-start remuxing.
//!
//! The probe and remux stages are modeled as narrow capability traits
//! ([`MediaProbe`], [`Remuxer`]) so the upload pipeline can be exercised with
//! deterministic fixtures instead of spawning real processes.

pub mod probe;
pub mod remux;
pub mod staging;
pub mod validator;

pub use probe::{classify_orientation, FfprobeProber, MediaProbe, Orientation, ProbeError,
    VideoStreamInfo};
pub use remux::{faststart_output_path, FfmpegRemuxer, RemuxError, Remuxer};
pub use staging::{stage_stream, StagedFile, StagingError};
pub use validator::{validate_image_content_type, validate_video_content_type, ValidationError};
