//! The Release Orchestrator: walks dataset -> split -> image -> variant,
//! invoking `plan::Generator`, `engine::render`, `annotate` and
//! `encode::encode_line` for each, then writes the release's
//! `data.yaml` and `metadata/` outputs.

pub mod manifest;
pub mod pool;

use std::path::Path;
use std::sync::atomic::Ordering;

use tracing::{debug, info, warn};

use crate::annotate::transform_matrix_precise;
use crate::codec;
use crate::config::ReleaseRequest;
use crate::encode::classmap::ClassMap;
use crate::encode::encode_line;
use crate::encode::yaml::DataYaml;
use crate::engine;
use crate::error::{ReleaseError, Result};
use crate::plan::Generator;
use crate::sink::FileSink;
use crate::source::DataSource;
use crate::types::SourceImage;
use manifest::{AnnotationShape, AnnotationsEntry, Manifest, ManifestBuilder, Point};

pub fn build_release(request: &ReleaseRequest, source: &dyn DataSource, sink: &dyn FileSink) -> Result<Manifest> {
    request.validate()?;

    // Every selection is bounds-checked once, up front, against the whole
    // request: a bad parameter is a `config_invalid` that aborts the
    // release before any image is touched, not a per-image failure.
    Generator::validate_all(&request.selections)?;

    let images = source.images(&request.dataset_id)?;
    info!(dataset_id = %request.dataset_id, image_count = images.len(), "starting release build");

    // Freeze the class-name set before any label is encoded: a name
    // introduced after this point falls back to class 0 in
    // `ClassMap::resolve` rather than shifting every other id.
    let mut names = Vec::new();
    for image in &images {
        for ann in source.annotations(&image.id)? {
            names.push(ann.class_name().to_string());
        }
    }
    let classes = ClassMap::build(names);

    let manifest = ManifestBuilder::default();
    for image in &images {
        if let Err(e) = build_image(request, source, sink, &classes, &manifest, image) {
            if matches!(e, ReleaseError::ConfigInvalid(_)) {
                return Err(e);
            }
            if matches!(e, ReleaseError::DecodeFailed { .. }) {
                manifest.for_split(image.split).images_failed.fetch_add(1, Ordering::Relaxed);
            }
            warn!(image_id = %image.id, error = %e, "image build failed, continuing release");
        }
    }

    let result = manifest.finish();
    let yaml = DataYaml::new(
        ".",
        &classes,
        result.train.variants_written,
        result.val.variants_written,
        result.test.variants_written,
    );
    sink.write_text(Path::new("data.yaml"), &yaml.to_yaml_string()?)?;
    sink.write_text(Path::new("metadata/release_config.json"), &serde_json::to_string_pretty(request)?)?;
    sink.write_text(
        Path::new("metadata/annotations.json"),
        &serde_json::to_string_pretty(&manifest.annotations_snapshot())?,
    )?;
    sink.write_text(Path::new("metadata/dataset_stats.json"), &serde_json::to_string_pretty(&result)?)?;
    Ok(result)
}

fn build_image(
    request: &ReleaseRequest,
    source: &dyn DataSource,
    sink: &dyn FileSink,
    classes: &ClassMap,
    manifest: &ManifestBuilder,
    image: &SourceImage,
) -> Result<()> {
    let (pixels, source_format) = codec::decode(Path::new(&image.file_path))?;
    let annotations = source.annotations(&image.id)?;
    let plan = Generator::generate(&request.selections, request.variants_per_original, &image.id)?;

    let results = pool::run_variants(plan.len(), request.options.max_concurrency, |i| {
        render_one_variant(request, sink, classes, manifest, image, &pixels, source_format, &plan.configs[i], i as u32, &annotations)
    });

    manifest.for_split(image.split).images_written.fetch_add(1, Ordering::Relaxed);

    let sink_failure = results.iter().any(|r| matches!(r, Err(ReleaseError::SinkFailed { .. })));
    if sink_failure && request.options.abort_on_sink_failure {
        return Err(ReleaseError::SinkFailed {
            path: image.file_path.clone(),
            source: std::io::Error::other(format!("one or more variants failed to write for image {}", image.id)),
        });
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render_one_variant(
    request: &ReleaseRequest,
    sink: &dyn FileSink,
    classes: &ClassMap,
    manifest: &ManifestBuilder,
    image: &SourceImage,
    pixels: &image::RgbImage,
    source_format: image::ImageFormat,
    config: &crate::transform::TransformationConfig,
    variant_index: u32,
    annotations: &[crate::types::Annotation],
) -> Result<()> {
    let counters = manifest.for_split(image.split);

    let rendered = match engine::render(pixels, config, &image.id, variant_index) {
        Ok(r) => r,
        Err(e) => {
            counters.variants_failed.fetch_add(1, Ordering::Relaxed);
            return Err(e);
        }
    };

    let suffix = config.suffix();
    let ext = request.options.output_format.extension(source_format);
    let base = format!("{}_{}", image.id, suffix);
    let image_path = Path::new("images").join(image.split.as_str()).join(format!("{base}.{ext}"));
    let label_path = Path::new("labels").join(image.split.as_str()).join(format!("{base}.txt"));

    let encoded_bytes = match codec::encode(&rendered.image, request.options.output_format, source_format) {
        Ok(b) => b,
        Err(e) => {
            counters.variants_failed.fetch_add(1, Ordering::Relaxed);
            return Err(e);
        }
    };
    if let Err(e) = sink.write_bytes(&image_path, &encoded_bytes) {
        counters.variants_failed.fetch_add(1, Ordering::Relaxed);
        return Err(e);
    }

    let mut lines = Vec::new();
    let mut shapes = Vec::new();
    for ann in annotations {
        let transported = match transform_matrix_precise(ann, &rendered.tracking) {
            Ok(Some(t)) => t,
            Ok(None) => {
                counters.annotations_dropped.fetch_add(1, Ordering::Relaxed);
                continue;
            }
            Err(e) => {
                debug!(image_id = %image.id, error = %e, "annotation dropped during transport");
                counters.annotations_dropped.fetch_add(1, Ordering::Relaxed);
                continue;
            }
        };
        match encode_line(&transported, rendered.tracking.final_dims, classes, request.export_format) {
            Ok(Some(line)) => {
                lines.push(line);
                shapes.push(AnnotationShape {
                    class_id: classes.resolve(transported.class_name()),
                    class_name: transported.class_name().to_string(),
                    points: annotation_points(&transported).into_iter().map(|(x, y)| Point { x, y }).collect(),
                });
            }
            Ok(None) => {
                counters.annotations_dropped.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                debug!(image_id = %image.id, error = %e, "annotation line dropped at encode time");
                counters.annotations_dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    let mut text = lines.join("\n");
    if !lines.is_empty() {
        text.push('\n');
    }
    if let Err(e) = sink.write_text(&label_path, &text) {
        sink.remove_file(&image_path).ok();
        counters.variants_failed.fetch_add(1, Ordering::Relaxed);
        return Err(e);
    }

    manifest.push_annotations(AnnotationsEntry { image_path: image_path.display().to_string(), shapes });
    counters.variants_written.fetch_add(1, Ordering::Relaxed);
    Ok(())
}

/// The transported annotation's coordinates in canonical `[{x,y},...]`
/// point-list form, for `metadata/annotations.json` — a box's four
/// corners, or a polygon's points verbatim.
fn annotation_points(ann: &crate::types::Annotation) -> Vec<(f64, f64)> {
    match ann {
        crate::types::Annotation::Bbox(b) => {
            vec![(b.x_min, b.y_min), (b.x_max, b.y_min), (b.x_max, b.y_max), (b.x_min, b.y_max)]
        }
        crate::types::Annotation::Polygon(p) => p.points.clone(),
    }
}
