use std::path::{Path, PathBuf};

use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::{debug, info, instrument, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::loader::reader::ImageReader;
use crate::image_pipeline::loader::standard_reader::StandardImageReader;
use crate::image_pipeline::loader::types::{LoadReport, LoadedImage, SkippedFile, TargetSize};

/// Lists the regular files directly inside `dir` whose extension matches one
/// of `extensions` (case-insensitive, a leading dot is ignored).
///
/// Paths are sorted so that repeated runs see the same order.
pub fn enumerate<P: AsRef<Path>>(dir: P, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", dir.display(), e)))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| PipelineError::InputReadError(format!("{}: {}", dir.display(), e)))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                extensions
                    .iter()
                    .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
            });
        if matches {
            paths.push(path);
        }
    }

    paths.sort();
    debug!("Enumerated {} files in {}", paths.len(), dir.display());
    Ok(paths)
}

/// Resizes to exactly `target`, ignoring the aspect ratio.
pub fn resize_to(image: &RgbImage, target: TargetSize) -> Result<RgbImage> {
    target.validate()?;
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::EmptyImage("cannot resize a 0x0 image".to_string()));
    }
    Ok(imageops::resize(image, target.width, target.height, FilterType::Triangle))
}

pub(crate) fn read_file<R: ImageReader>(reader: &R, path: &Path) -> Result<RgbImage> {
    let data = std::fs::read(path)
        .map_err(|e| PipelineError::InputReadError(format!("{}: {}", path.display(), e)))?;
    reader.read_image(&data)
}

pub fn load_directory<P: AsRef<Path>>(
    dir: P,
    extensions: &[String],
    target: TargetSize,
) -> Result<LoadReport> {
    load_directory_with(&StandardImageReader, dir, extensions, target)
}

/// Decodes and resizes every matching file in `dir`.
///
/// Unreadable, undecodable or empty files are logged and recorded in
/// [`LoadReport::skipped`]; they never abort the load. An invalid `target`
/// fails before any file is read.
#[instrument(skip(reader, dir, extensions), fields(dir = %dir.as_ref().display()))]
pub fn load_directory_with<R: ImageReader, P: AsRef<Path>>(
    reader: &R,
    dir: P,
    extensions: &[String],
    target: TargetSize,
) -> Result<LoadReport> {
    target.validate()?;
    let paths = {
        let _span = tracing::info_span!("enumerate").entered();
        enumerate(dir.as_ref(), extensions)?
    };

    let mut report = LoadReport::default();
    for (i, path) in paths.into_iter().enumerate() {
        let decoded = {
            let _span = tracing::info_span!("decode", index = i).entered();
            read_file(reader, &path)
        };

        let image = match decoded.and_then(|img| resize_to(&img, target)) {
            Ok(image) => image,
            Err(
                e @ (PipelineError::InputReadError(_)
                | PipelineError::DecodeError(_)
                | PipelineError::EmptyImage(_)),
            ) => {
                warn!(path = %path.display(), error = %e, "Could not read image, skipping");
                report.skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        debug!(index = i, path = %path.display(), "Image loaded");
        report.images.push(LoadedImage { path, image });
    }

    info!(
        loaded = report.images.len(),
        skipped = report.skipped.len(),
        "Directory loaded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};

    fn extensions() -> Vec<String> {
        vec!["jpg".to_string(), "png".to_string()]
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 7]))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_corrupt_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("good.png"), 64, 48);
        std::fs::write(dir.path().join("bad.jpg"), b"not a jpeg at all").unwrap();

        let report = load_directory(dir.path(), &extensions(), TargetSize::default()).unwrap();

        assert_eq!(report.images.len(), 1);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.is_partial());
        assert!(report.skipped[0].path.ends_with("bad.jpg"));
        assert!(report.images[0].path.ends_with("good.png"));
    }

    #[test]
    fn test_resize_ignores_aspect_ratio() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("wide.png"), 120, 20);
        write_png(&dir.path().join("tall.png"), 9, 200);
        write_png(&dir.path().join("tiny.png"), 1, 1);

        let report = load_directory(dir.path(), &extensions(), TargetSize::default()).unwrap();

        assert_eq!(report.images.len(), 3);
        for loaded in &report.images {
            assert_eq!(loaded.image.dimensions(), (32, 32));
        }
    }

    #[test]
    fn test_enumerate_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "notes.txt", "c.jpeg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let paths = enumerate(dir.path(), &extensions()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.PNG"]);
    }

    #[test]
    fn test_leading_dot_extensions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();

        let paths = enumerate(dir.path(), &[".JPG".to_string()]).unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_zero_target_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("good.png"), 16, 16);

        let result = load_directory(dir.path(), &extensions(), TargetSize::square(0));
        assert!(matches!(result, Err(PipelineError::InvalidConfig(_))));
        assert_eq!(result.unwrap_err().exit_code(), 7);
    }

    #[test]
    fn test_missing_directory() {
        let result = enumerate("/definitely/not/here", &extensions());
        assert!(matches!(result, Err(PipelineError::InputReadError(_))));
    }

    #[test]
    fn test_resize_rejects_empty() {
        let empty = RgbImage::new(0, 0);
        let result = resize_to(&empty, TargetSize::default());
        assert!(matches!(result, Err(PipelineError::EmptyImage(_))));
    }
}
