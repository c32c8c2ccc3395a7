use std::path::PathBuf;

/// One decoded page or image available for this request, keyed by the
/// filename the client uploaded it under. Filenames are not guaranteed
/// unique: a multi-page PDF contributes one entry per page, all under the
/// original filename.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub filename: String,
    pub path: PathBuf,
}

/// Request-scoped pool of candidate images in upload order. Read-only to
/// the resolution core; upload order is the tie-break everywhere an image
/// has to be chosen.
#[derive(Debug, Clone, Default)]
pub struct SourcePool {
    images: Vec<SourceImage>,
}

impl SourcePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filename: impl Into<String>, path: PathBuf) {
        self.images.push(SourceImage {
            filename: filename.into(),
            path,
        });
    }

    pub fn images(&self) -> &[SourceImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(|i| i.filename.as_str())
    }

    /// Pool entries whose filename appears in `source_files`, in upload
    /// order. The earliest uploaded file always comes first.
    pub fn candidates_for<'a>(
        &'a self,
        source_files: &'a [String],
    ) -> impl Iterator<Item = &'a SourceImage> {
        self.images
            .iter()
            .filter(move |image| source_files.iter().any(|f| f == &image.filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_follow_upload_order() {
        let mut pool = SourcePool::new();
        pool.push("b.jpg", PathBuf::from("/tmp/b.jpg"));
        pool.push("a.jpg", PathBuf::from("/tmp/a.jpg"));
        pool.push("c.jpg", PathBuf::from("/tmp/c.jpg"));

        let wanted = vec!["a.jpg".to_string(), "b.jpg".to_string()];
        let candidates: Vec<_> = pool.candidates_for(&wanted).map(|i| i.filename.clone()).collect();
        assert_eq!(candidates, vec!["b.jpg", "a.jpg"]);
    }

    #[test]
    fn duplicate_filenames_yield_multiple_candidates() {
        let mut pool = SourcePool::new();
        pool.push("doc.pdf", PathBuf::from("/tmp/page1.jpg"));
        pool.push("doc.pdf", PathBuf::from("/tmp/page2.jpg"));

        let wanted = vec!["doc.pdf".to_string()];
        assert_eq!(pool.candidates_for(&wanted).count(), 2);
    }

    #[test]
    fn empty_source_files_yield_no_candidates() {
        let mut pool = SourcePool::new();
        pool.push("a.jpg", PathBuf::from("/tmp/a.jpg"));
        assert_eq!(pool.candidates_for(&[]).count(), 0);
    }
}
