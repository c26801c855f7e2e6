//! In-memory manifest and per-split counters the orchestrator accumulates
//! while walking a release. Serialized to
//! `metadata/dataset_stats.json` once the walk completes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use crate::types::Split;

/// A single transported annotation's coordinates, always in the
/// `[{x,y},...]` point-list form regardless of whether the source
/// annotation was a box or a polygon.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct AnnotationShape {
    pub class_id: u32,
    pub class_name: String,
    pub points: Vec<Point>,
}

/// One written variant's annotations, keyed by its image path relative
/// to the release root.
#[derive(Clone, Debug, Serialize)]
pub struct AnnotationsEntry {
    pub image_path: String,
    pub shapes: Vec<AnnotationShape>,
}

/// Lock-free per-split counters updated from any worker in the pool,
/// one atomic field per counted event so concurrent writers never contend.
#[derive(Default)]
pub struct SplitCounters {
    pub images_written: AtomicU64,
    pub images_failed: AtomicU64,
    pub variants_written: AtomicU64,
    pub annotations_dropped: AtomicU64,
    pub variants_failed: AtomicU64,
}

impl SplitCounters {
    fn snapshot(&self) -> SplitStats {
        SplitStats {
            images_written: self.images_written.load(Ordering::Relaxed),
            images_failed: self.images_failed.load(Ordering::Relaxed),
            variants_written: self.variants_written.load(Ordering::Relaxed),
            annotations_dropped: self.annotations_dropped.load(Ordering::Relaxed),
            variants_failed: self.variants_failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct SplitStats {
    pub images_written: u64,
    /// Images that never produced a variant: decode failure or an
    /// unreadable source file. Recorded against the image's split.
    pub images_failed: u64,
    pub variants_written: u64,
    pub annotations_dropped: u64,
    pub variants_failed: u64,
}

/// The whole release's accumulated counters, one `SplitCounters` per
/// split so concurrent workers on different splits never contend.
#[derive(Default)]
pub struct ManifestBuilder {
    pub train: SplitCounters,
    pub val: SplitCounters,
    pub test: SplitCounters,
    annotations: Mutex<Vec<AnnotationsEntry>>,
}

impl ManifestBuilder {
    pub fn for_split(&self, split: Split) -> &SplitCounters {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
            Split::Test => &self.test,
        }
    }

    /// Records one written variant's annotations for `metadata/annotations.json`.
    pub fn push_annotations(&self, entry: AnnotationsEntry) {
        self.annotations.lock().unwrap().push(entry);
    }

    pub fn annotations_snapshot(&self) -> Vec<AnnotationsEntry> {
        self.annotations.lock().unwrap().clone()
    }

    pub fn finish(&self) -> Manifest {
        Manifest {
            train: self.train.snapshot(),
            val: self.val.snapshot(),
            test: self.test.snapshot(),
        }
    }
}

/// Serializes directly to `metadata/dataset_stats.json`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Manifest {
    pub train: SplitStats,
    pub val: SplitStats,
    pub test: SplitStats,
}

impl Manifest {
    pub fn totals(&self) -> HashMap<&'static str, u64> {
        let mut out = HashMap::new();
        out.insert("images_written", self.train.images_written + self.val.images_written + self.test.images_written);
        out.insert(
            "variants_written",
            self.train.variants_written + self.val.variants_written + self.test.variants_written,
        );
        out
    }
}
