pub mod bridge;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{debug, warn};

use crate::core::model::Identity;
use crate::ingest::SourcePool;

pub use bridge::FaceCropBridge;

/// External face detection collaborator. Heuristic and best-effort: a
/// returned path points at a cropped face image written by the locator.
pub trait FaceLocator {
    fn locate(&self, image_path: &Path) -> Result<Option<PathBuf>>;
}

/// Attaches at most one photo per identity by probing the identity's
/// source images in upload order. Locator failures are absorbed; photo
/// extraction must never fail the request.
pub struct PhotoResolver<'a> {
    locator: &'a dyn FaceLocator,
}

impl<'a> PhotoResolver<'a> {
    pub fn new(locator: &'a dyn FaceLocator) -> Self {
        Self { locator }
    }

    /// First face found wins; identities that already hold a photo are
    /// left untouched.
    pub fn resolve(&self, identity: &mut Identity, pool: &SourcePool) {
        if identity.photo_path.is_some() {
            return;
        }

        for candidate in pool.candidates_for(&identity.source_files) {
            match self.locator.locate(&candidate.path) {
                Ok(Some(face)) => {
                    debug!(
                        source = %candidate.filename,
                        face = %face.display(),
                        "attached photo"
                    );
                    identity.photo_path = Some(face);
                    return;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        source = %candidate.filename,
                        error = %err,
                        "face locator failed, treating as no face"
                    );
                }
            }
        }
    }

    pub fn resolve_all(&self, identities: &mut [Identity], pool: &SourcePool) {
        for identity in identities {
            self.resolve(identity, pool);
        }
    }
}
