use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::photo::FaceLocator;

#[derive(Debug, Deserialize)]
struct FaceCropResponse {
    face_path: Option<PathBuf>,
}

/// Face detection via the OpenCV cascade bridge script. The script crops
/// the largest detected face to passport proportions, writes it under the
/// work dir and reports the path as JSON on stdout (`face_path` is null
/// when no face was found).
#[derive(Debug, Clone)]
pub struct FaceCropBridge {
    work_dir: PathBuf,
    script_path: PathBuf,
}

impl FaceCropBridge {
    pub fn new(work_dir: PathBuf) -> Self {
        let script_path = PathBuf::from("bridge/face_crop.py");
        Self {
            work_dir,
            script_path,
        }
    }

    pub fn with_script(mut self, script_path: PathBuf) -> Self {
        self.script_path = script_path;
        self
    }

    pub fn run(&self, image_path: &Path) -> Result<Option<PathBuf>> {
        fs::create_dir_all(&self.work_dir)?;
        let output = Command::new("python3")
            .arg(&self.script_path)
            .arg("--image")
            .arg(image_path)
            .arg("--out-dir")
            .arg(&self.work_dir)
            .output()
            .with_context(|| "failed to invoke python face crop bridge")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("face crop bridge failed: {stderr}");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let response: FaceCropResponse = serde_json::from_str(&stdout)
            .with_context(|| "failed to parse face crop JSON response")?;
        Ok(response.face_path)
    }
}

impl FaceLocator for FaceCropBridge {
    fn locate(&self, image_path: &Path) -> Result<Option<PathBuf>> {
        self.run(image_path)
    }
}
