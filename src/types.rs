//! Shared value types from the data model: images, splits,
//! annotations, and the canvas/tracking values that flow between
//! `engine::render` and `annotate`.

use serde::{Deserialize, Serialize};

/// Which split an image belongs to within the release.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

/// An immutable source image record, read from the external project store.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub id: String,
    pub file_path: String,
    pub width: u32,
    pub height: u32,
    pub split: Split,
    pub dataset_id: String,
}

/// A pixel-space axis-aligned bounding box annotation.
///
/// Invariant: `x_min < x_max` and `y_min < y_max`.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
    pub class_name: String,
    pub class_id: u32,
    pub confidence: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn is_valid(&self) -> bool {
        self.x_min < self.x_max && self.y_min < self.y_max
    }
}

/// A pixel-space polygon (segmentation ring), at least 3 points. Rings are
/// assumed simple; self-intersection is not modeled.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub points: Vec<(f64, f64)>,
    pub class_name: String,
    pub class_id: u32,
    pub confidence: f64,
}

/// One of the two annotation shapes the core transports.
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Bbox(BoundingBox),
    Polygon(Polygon),
}

impl Annotation {
    pub fn class_name(&self) -> &str {
        match self {
            Annotation::Bbox(b) => &b.class_name,
            Annotation::Polygon(p) => &p.class_name,
        }
    }
}

/// The dimensions of a rendered pixel canvas. Always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasDims {
    pub width: u32,
    pub height: u32,
}

impl CanvasDims {
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "canvas dims must be positive");
        Self { width, height }
    }

    pub fn as_f64(self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}
