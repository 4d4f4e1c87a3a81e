// image_processing.rs
use crate::app::export::{self, ExportError, ExportOptions};
use crate::app::{BatchUpdate, ImagePair, Notice};
use crate::utils::Logger;
use image::io::Reader as ImageReader;
use image::DynamicImage;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use thiserror::Error;

pub const WEBP_QUALITY: f32 = 85.0;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("could not open image: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("could not encode WebP: {0}")]
    Encode(String),
}

/// Runs one full batch on a worker thread: convert every selected file,
/// then write the three load artifacts. Progress and modal notices go back
/// to the GUI thread over `sender`; a disconnected receiver (window closed)
/// is ignored.
pub fn run_batch(
    input_files: Vec<PathBuf>,
    options: ExportOptions,
    log_messages: Arc<Mutex<Vec<String>>>,
    sender: Sender<BatchUpdate>,
) {
    let logger = Logger::new(log_messages);
    logger.log(format!("Starting batch of {} images", input_files.len()));

    let out_dir = Path::new(export::WEBP_DIR);
    if let Err(e) = fs::create_dir_all(out_dir) {
        let _ = sender.send(BatchUpdate::Notice(Notice::error(format!(
            "Could not create output directory {}: {}",
            out_dir.display(),
            e
        ))));
        let _ = sender.send(BatchUpdate::Completed);
        return;
    }

    let pairs = convert_batch(&input_files, out_dir, &logger, &sender);

    if pairs.is_empty() {
        logger.log("No new images were processed".to_string());
        let _ = sender.send(BatchUpdate::Notice(Notice::info("No new images were processed.")));
    } else {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        run_exporters(&pairs, &options, &date, &logger, &sender);
    }

    logger.log("Batch complete".to_string());
    let _ = sender.send(BatchUpdate::Completed);
}

/// Converts the files one at a time, in list order. A file that fails to
/// decode raises an error notice and is skipped; the batch keeps going.
fn convert_batch(
    input_files: &[PathBuf],
    out_dir: &Path,
    logger: &Logger,
    sender: &Sender<BatchUpdate>,
) -> Vec<ImagePair> {
    let total = input_files.len();
    let mut pairs = Vec::new();

    for (index, input_path) in input_files.iter().enumerate() {
        match convert_to_webp(input_path, out_dir) {
            Ok(Some(pair)) => {
                logger.log(format!("Converted {} -> {}", input_path.display(), pair.webp_name));
                pairs.push(pair);
            }
            Ok(None) => {
                logger.log(format!("Skipped {} (already WebP)", input_path.display()));
            }
            Err(e) => {
                logger.log(format!("Failed to convert {}: {}", input_path.display(), e));
                let _ = sender.send(BatchUpdate::Notice(Notice::error(format!(
                    "Could not convert image {}:\n{}",
                    input_path.display(),
                    e
                ))));
            }
        }
        let _ = sender.send(BatchUpdate::Progress(index + 1, total));
    }

    pairs
}

/// Converts a single image to WebP at fixed quality, flattening to RGB.
/// Returns `Ok(None)` for files already in WebP format, which are never
/// re-encoded and never appear in the exported artifacts.
pub fn convert_to_webp(input_path: &Path, out_dir: &Path) -> Result<Option<ImagePair>, ConvertError> {
    if input_path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("webp"))
    {
        return Ok(None);
    }

    let img = ImageReader::open(input_path)?.decode()?;
    // Force 3-channel RGB, dropping any alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let encoder = webp::Encoder::from_image(&rgb).map_err(|e| ConvertError::Encode(e.to_string()))?;
    let webp_data = encoder.encode(WEBP_QUALITY);

    let base = input_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let webp_name = format!("{}.webp", base);
    fs::write(out_dir.join(&webp_name), &*webp_data)?;

    Ok(Some(ImagePair { original_base: base, webp_name }))
}

/// Each writer runs regardless of how the others fared; a failed artifact
/// is reported and abandoned, never retried.
fn run_exporters(
    pairs: &[ImagePair],
    options: &ExportOptions,
    date: &str,
    logger: &Logger,
    sender: &Sender<BatchUpdate>,
) {
    let results: [(&str, Result<(), ExportError>); 3] = [
        (
            export::UNL_FILE,
            export::write_unl(pairs, date, Path::new(export::UNL_FILE)),
        ),
        (
            export::CSV_FILE,
            export::write_csv(pairs, Path::new(export::CSV_FILE)),
        ),
        (
            export::SQL_FILE,
            export::write_sql(pairs, options, date, Path::new(export::SQL_FILE)),
        ),
    ];

    for (file_name, result) in results {
        match result {
            Ok(()) => {
                logger.log(format!("Wrote {}", file_name));
                let _ = sender.send(BatchUpdate::Notice(Notice::success(format!(
                    "File created successfully: {}",
                    file_name
                ))));
            }
            Err(e) => {
                logger.log(format!("Failed to write {}: {}", file_name, e));
                let _ = sender.send(BatchUpdate::Notice(Notice::error(format!(
                    "Could not create {}: {}",
                    file_name, e
                ))));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::NoticeKind;
    use std::sync::mpsc::channel;
    use tempfile::tempdir;

    #[test]
    fn webp_inputs_are_skipped_without_touching_the_filesystem() {
        let out_dir = Path::new("no_such_dir");
        assert!(matches!(
            convert_to_webp(Path::new("no_such_dir/already.webp"), out_dir),
            Ok(None)
        ));
        assert!(matches!(
            convert_to_webp(Path::new("no_such_dir/ALREADY.WEBP"), out_dir),
            Ok(None)
        ));
    }

    #[test]
    fn converted_images_lose_their_alpha_channel() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("logo.png");
        let rgba = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 128]));
        rgba.save(&input).unwrap();

        let pair = convert_to_webp(&input, dir.path()).unwrap().unwrap();
        assert_eq!(pair.original_base, "logo");
        assert_eq!(pair.webp_name, "logo.webp");

        let reencoded = image::open(dir.path().join("logo.webp")).unwrap();
        assert_eq!(reencoded.color().channel_count(), 3);
    }

    #[test]
    fn output_files_are_overwritten_on_reconversion() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("item.png");
        image::RgbImage::from_pixel(4, 4, image::Rgb([10, 20, 30]))
            .save(&input)
            .unwrap();

        let stale = dir.path().join("item.webp");
        fs::write(&stale, b"stale").unwrap();

        convert_to_webp(&input, dir.path()).unwrap().unwrap();
        assert_ne!(fs::read(&stale).unwrap(), b"stale");
    }

    #[test]
    fn decode_failure_skips_the_file_but_not_the_batch() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.jpg");
        fs::write(&bad, b"not an image").unwrap();
        let good = dir.path().join("good.png");
        image::RgbImage::from_pixel(4, 4, image::Rgb([0, 128, 255]))
            .save(&good)
            .unwrap();

        let log_messages = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new(log_messages);
        let (sender, receiver) = channel();

        let pairs = convert_batch(&[bad, good], dir.path(), &logger, &sender);
        assert_eq!(
            pairs,
            vec![ImagePair {
                original_base: "good".to_string(),
                webp_name: "good.webp".to_string(),
            }]
        );

        let updates: Vec<BatchUpdate> = receiver.try_iter().collect();
        assert!(updates
            .iter()
            .any(|u| matches!(u, BatchUpdate::Notice(n) if n.kind == NoticeKind::Error)));
        assert!(matches!(updates.last(), Some(BatchUpdate::Progress(2, 2))));
    }

    #[test]
    fn skipped_webp_files_produce_no_pair() {
        let dir = tempdir().unwrap();
        let already = dir.path().join("done.webp");
        fs::write(&already, b"whatever").unwrap();

        let log_messages = Arc::new(Mutex::new(Vec::new()));
        let logger = Logger::new(log_messages);
        let (sender, receiver) = channel();

        let pairs = convert_batch(&[already], dir.path(), &logger, &sender);
        assert!(pairs.is_empty());

        // still counted toward progress
        let updates: Vec<BatchUpdate> = receiver.try_iter().collect();
        assert!(matches!(updates.last(), Some(BatchUpdate::Progress(1, 1))));
    }
}
