//! The release request bundle: what to build, from where,
//! with which tools, and how many variants per original. `ReleaseRequest`
//! is the one argument `orchestrator::build_release` takes beyond the
//! `DataSource`/`FileSink` pair.

use serde::{Deserialize, Serialize};

use crate::codec::OutputFormat;
use crate::error::{ReleaseError, Result};
use crate::plan::UserToolSpec;

/// What kind of ground truth this release's labels represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    ObjectDetection,
    Segmentation,
}

/// Which YOLO label dialect `encode::encode_line` emits, independent of
/// the shape the source annotation arrived in — a box is re-derived as a
/// four-corner polygon for `YoloSegmentation`, and a polygon is collapsed
/// to its axis-aligned envelope for `YoloDetection`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    YoloDetection,
    YoloSegmentation,
}

/// Tunables that don't change *what* gets built, only how.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReleaseOptions {
    pub output_format: OutputFormat,
    /// Bounded worker-pool width for the variant-level concurrency model.
    /// Ignored when the crate's `parallel` feature is
    /// off, in which case orchestration is strictly sequential.
    pub max_concurrency: usize,
    /// Abort the whole release on the first `sink_failed`, rather than
    /// recording it and continuing — caller policy.
    pub abort_on_sink_failure: bool,
    /// Keep each source image in the split it already belongs to instead
    /// of letting the release recompute splits from scratch.
    pub preserve_original_splits: bool,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Original,
            max_concurrency: 4,
            abort_on_sink_failure: false,
            preserve_original_splits: true,
        }
    }
}

/// One release build request: a dataset, the tool selections to apply,
/// how many augmented variants per original, and where to write.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReleaseRequest {
    /// Identifies this release in `data.yaml`/`metadata/release_config.json`;
    /// purely descriptive, not used to derive any path.
    pub release_name: String,
    pub dataset_id: String,
    pub release_root: String,
    #[serde(skip)]
    pub selections: Vec<UserToolSpec>,
    pub variants_per_original: u32,
    pub task_type: TaskType,
    pub export_format: ExportFormat,
    #[serde(default)]
    pub options: ReleaseOptions,
}

impl ReleaseRequest {
    /// Structural validation ahead of any rendering: `config_invalid`
    /// aborts the whole release before work starts.
    pub fn validate(&self) -> Result<()> {
        if self.release_name.trim().is_empty() {
            return Err(ReleaseError::ConfigInvalid("release_name must not be empty".to_string()));
        }
        if self.dataset_id.trim().is_empty() {
            return Err(ReleaseError::ConfigInvalid("dataset_id must not be empty".to_string()));
        }
        if self.release_root.trim().is_empty() {
            return Err(ReleaseError::ConfigInvalid("release_root must not be empty".to_string()));
        }
        if self.options.max_concurrency == 0 {
            return Err(ReleaseError::ConfigInvalid("max_concurrency must be >= 1".to_string()));
        }
        match (self.task_type, self.export_format) {
            (TaskType::ObjectDetection, ExportFormat::YoloDetection) => {}
            (TaskType::Segmentation, ExportFormat::YoloSegmentation) => {}
            _ => {
                return Err(ReleaseError::ConfigInvalid(format!(
                    "task_type {:?} is incompatible with export_format {:?}",
                    self.task_type, self.export_format
                )))
            }
        }
        Ok(())
    }
}
