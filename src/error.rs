use thiserror::Error;

/// The main error type for the release_forge crate.
///
/// This enum encompasses all possible error conditions that can occur while
/// building a dataset release. It uses the `thiserror` crate to provide
/// automatic implementation of `std::error::Error` and `Display`.
///
/// Most variants are *recoverable at a narrower scope than the whole
/// release*: a `GeometryNumerical` failure drops one variant, an
/// `AnnotationDropped` drops one annotation. Only `ConfigInvalid` and
/// (by caller policy) `SinkFailed` abort the whole build. See
/// `orchestrator::mod` for how these are caught and tallied.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// A transformation's parameters violate its registry bounds.
    ///
    /// Surfaced before any rendering begins; the whole release fails.
    #[error("invalid transformation config: {0}")]
    ConfigInvalid(String),

    /// The pixel input for an image could not be read or decoded.
    ///
    /// The image is skipped; the release continues and the failure is
    /// recorded in `dataset_stats.json`.
    #[error("failed to decode image {path}: {source}")]
    DecodeFailed {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// Non-finite arithmetic (NaN/Inf) occurred in a geometric operation,
    /// either while rendering pixels (`engine::render`) or transporting
    /// annotations (`annotate`).
    ///
    /// The variant producing it is dropped; other variants proceed.
    #[error("non-finite geometry in '{op}': {detail}")]
    GeometryNumerical { op: String, detail: String },

    /// A single annotation clipped to nothing (zero area, or fewer than 3
    /// polygon vertices survived). Logged at debug level, not counted as
    /// an error; the remaining annotations for the image are unaffected.
    #[error("annotation dropped during transport: {0}")]
    AnnotationDropped(String),

    /// A YOLO value escaped `[0,1]` after normalization against the final
    /// canvas. This indicates an upstream clip inconsistency, not a
    /// correctable condition; the line is dropped and tagged in logs.
    #[error("encoded value out of bounds: {0}")]
    EncodeBounds(String),

    /// The file sink rejected a write (pixels, label text, or metadata).
    ///
    /// The variant producing it is aborted; whether the release continues
    /// or fails is the caller's policy (default: continue, record).
    #[error("sink write failed for {path}: {source}")]
    SinkFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Wraps a YAML (de)serialization failure from emitting `data.yaml`.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wraps a JSON (de)serialization failure from emitting the manifest
    /// or release config metadata files.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from standard library operations not already covered by
    /// a more specific variant above.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReleaseError>;
