use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

/// Converts a multi-page PDF into an ordered sequence of page images using
/// poppler's command line tools.
#[derive(Debug, Clone)]
pub struct PageRasterizer {
    work_dir: PathBuf,
    dpi: u32,
}

impl PageRasterizer {
    pub fn new(work_dir: PathBuf, dpi: u32) -> Self {
        Self { work_dir, dpi }
    }

    /// Renders every page of `pdf_path` to a JPEG under the work dir and
    /// returns the image paths in page order.
    pub fn rasterize(&self, pdf_path: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.work_dir)?;

        let pages = page_count(pdf_path)?;
        let stem = pdf_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let mut rendered = Vec::with_capacity(pages);
        for page_idx in 0..pages {
            rendered.push(self.render_page(pdf_path, &stem, page_idx, pages)?);
        }
        Ok(rendered)
    }

    fn render_page(
        &self,
        pdf_path: &Path,
        stem: &str,
        page_idx: usize,
        total_pages: usize,
    ) -> Result<PathBuf> {
        // pdftoppm uses 1-based page indices
        let page_number = page_idx + 1;
        let prefix = self.work_dir.join(format!("{stem}_page_{page_number:03}"));
        let prefix_str = prefix
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("non-UTF8 work dir path not supported"))?;

        let status = Command::new("pdftoppm")
            .arg("-jpeg")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(pdf_path)
            .arg(prefix_str)
            .status()
            .with_context(|| "failed to invoke pdftoppm; is poppler-utils installed?")?;

        if !status.success() {
            anyhow::bail!("pdftoppm failed with status: {status}");
        }

        let image_path = self
            .work_dir
            .join(rendered_page_name(stem, page_number, total_pages));

        if !image_path.exists() {
            anyhow::bail!("expected rendered page not found: {}", image_path.display());
        }

        Ok(image_path)
    }
}

/// Name pdftoppm gives the rendered page: the page-number suffix is
/// zero-padded to the digit width of the document's total page count.
fn rendered_page_name(stem: &str, page_number: usize, total_pages: usize) -> String {
    let width = total_pages.to_string().len();
    format!("{stem}_page_{page_number:03}-{page_number:0width$}.jpg")
}

/// Page count via pdfinfo.
pub fn page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo")
        .arg(pdf_path)
        .output()
        .with_context(|| format!("failed to invoke pdfinfo on {}", pdf_path.display()))?;

    if !output.status.success() {
        anyhow::bail!("pdfinfo failed with status: {}", output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(rest) = line.strip_prefix("Pages:") {
            let num_str = rest.trim();
            let pages: usize = num_str.parse().with_context(|| {
                format!("failed to parse page count from 'Pages:' line: {num_str}")
            })?;
            return Ok(pages);
        }
    }

    anyhow::bail!(
        "pdfinfo output did not contain a 'Pages:' line for {}",
        pdf_path.display()
    );
}
