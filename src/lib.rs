//! `release_forge` builds pixel-accurate YOLO dataset releases from a
//! project's source images and annotations: `registry`/`plan` turn a
//! user's tool selections into a deterministic augmentation plan,
//! `engine` renders each variant's pixels, `annotate` replays the same
//! geometry against its annotations, and `encode` writes the result as
//! YOLO label lines, all tied together by the Release Orchestrator.

pub mod annotate;
pub mod codec;
pub mod config;
pub mod encode;
pub mod engine;
pub mod error;
pub mod numeric;
pub mod orchestrator;
pub mod plan;
pub mod registry;
pub mod sink;
pub mod source;
pub mod transform;
pub mod types;

pub use error::{ReleaseError, Result};

pub mod prelude {
    pub use crate::config::{ExportFormat, ReleaseOptions, ReleaseRequest, TaskType};
    pub use crate::error::{ReleaseError, Result};
    pub use crate::orchestrator::build_release;
    pub use crate::plan::UserToolSpec;
    pub use crate::sink::{FileSink, FsSink};
    pub use crate::source::{DataSource, InMemorySource};
    pub use crate::types::{Annotation, BoundingBox, Polygon, SourceImage, Split};
}
