//! A read-only abstraction over the external project store the release is
//! built from: source images, their annotations, and the
//! dataset/split membership the orchestrator walks. Kept separate from
//! `FileSink` because a release reads from one project but may write to a
//! different root (or, in tests, neither touches a real filesystem).

use crate::error::Result;
use crate::types::{Annotation, SourceImage};

pub trait DataSource: Send + Sync {
    /// Every source image belonging to `dataset_id`, in a stable order.
    fn images(&self, dataset_id: &str) -> Result<Vec<SourceImage>>;

    /// The annotations for one source image, in their original order.
    fn annotations(&self, image_id: &str) -> Result<Vec<Annotation>>;
}

/// An in-memory `DataSource` for tests and examples: images/annotations
/// are supplied up front rather than read from a project database.
#[derive(Default)]
pub struct InMemorySource {
    images: Vec<SourceImage>,
    annotations: std::collections::HashMap<String, Vec<Annotation>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, image: SourceImage, annotations: Vec<Annotation>) -> Self {
        self.annotations.insert(image.id.clone(), annotations);
        self.images.push(image);
        self
    }
}

impl DataSource for InMemorySource {
    fn images(&self, dataset_id: &str) -> Result<Vec<SourceImage>> {
        Ok(self.images.iter().filter(|i| i.dataset_id == dataset_id).cloned().collect())
    }

    fn annotations(&self, image_id: &str) -> Result<Vec<Annotation>> {
        Ok(self.annotations.get(image_id).cloned().unwrap_or_default())
    }
}
