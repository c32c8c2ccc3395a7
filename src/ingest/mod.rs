pub mod pool;
pub mod raster;

use std::path::{Path, PathBuf};

use anyhow::Result;
use image::ImageReader;
use tracing::{debug, warn};

pub use pool::{SourceImage, SourcePool};
pub use raster::PageRasterizer;

/// Builds the request-scoped image pool from the uploaded files, in upload
/// order. PDFs are rasterized one entry per page under the original
/// filename; plain images are verified decodable before being admitted.
/// Unsupported or unreadable files are skipped with a warning, never an
/// error: the pool reflects the usable subset of the upload.
pub fn build_pool(inputs: &[PathBuf], rasterizer: &PageRasterizer) -> Result<SourcePool> {
    let mut pool = SourcePool::new();

    for input in inputs {
        let filename = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if filename.is_empty() {
            warn!(path = %input.display(), "skipping input without a filename");
            continue;
        }

        match extension_of(input).as_deref() {
            Some("pdf") => match rasterizer.rasterize(input) {
                Ok(pages) => {
                    debug!(file = %filename, pages = pages.len(), "rasterized PDF");
                    for page in pages {
                        pool.push(filename.clone(), page);
                    }
                }
                Err(err) => {
                    warn!(file = %filename, error = %err, "failed to rasterize PDF, skipping");
                }
            },
            Some("jpg") | Some("jpeg") | Some("png") => match verify_image(input) {
                Ok(()) => pool.push(filename, input.clone()),
                Err(err) => {
                    warn!(file = %filename, error = %err, "unreadable image, skipping");
                }
            },
            _ => {
                warn!(file = %filename, "unsupported file type, skipping");
            }
        }
    }

    Ok(pool)
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

fn verify_image(path: &Path) -> Result<()> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "verified source image"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn unreadable_files_are_skipped_not_fatal() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let bogus = dir.path().join("broken.jpg");
        fs::write(&bogus, b"not an image")?;
        let other = dir.path().join("notes.txt");
        fs::write(&other, b"hello")?;

        let rasterizer = PageRasterizer::new(dir.path().join("pages"), 200);
        let pool = build_pool(&[bogus, other], &rasterizer)?;
        assert!(pool.is_empty());
        Ok(())
    }

    #[test]
    fn valid_images_are_admitted_in_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        for path in [&first, &second] {
            let buf = image::RgbImage::new(4, 4);
            buf.save(path)?;
        }

        let rasterizer = PageRasterizer::new(dir.path().join("pages"), 200);
        let pool = build_pool(&[first, second], &rasterizer)?;
        let names: Vec<_> = pool.filenames().collect();
        assert_eq!(names, vec!["first.png", "second.png"]);
        Ok(())
    }
}
