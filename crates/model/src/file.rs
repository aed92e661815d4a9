use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

/// A file handed to the ingestion pipeline.
///
/// This is the pipeline's equivalent of a browser `File`: a base name, the
/// contents, and optionally the path it was found at. Files picked one by one
/// have no relative path; files found by walking a directory carry their path
/// from the walk root, and files extracted from an archive carry their
/// in-archive path.
///
/// Contents are reference counted, so cloning a [`SourceFile`] (for example
/// when the same image ends up in a catalog entry) never copies the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    relative_path: Option<String>,
    mime: Option<String>,
    data: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            relative_path: None,
            mime: None,
            data: data.into(),
        }
    }

    /// Stamp the file with the `/`-separated path it was found at.
    pub fn with_relative_path(mut self, path: impl Into<String>) -> Self {
        self.relative_path = Some(path.into());
        self
    }

    /// Declare the content type, overriding detection from the file name.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Base file name, without any directory components.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn relative_path(&self) -> Option<&str> {
        self.relative_path.as_deref().filter(|path| !path.is_empty())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the contents, for moving into blocking tasks.
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Content type of the file: the declared type when there is one,
    /// otherwise the type guessed from the file name.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime.as_deref().or_else(|| mime_guess::from_path(&self.name).first_raw())
    }

    /// Everything after the last `.` in the name.
    ///
    /// # Examples
    ///
    /// ```
    /// use mokuro_model::SourceFile;
    ///
    /// let file = SourceFile::new("vol.01.mokuro", Vec::<u8>::new());
    /// assert_eq!(file.extension(), Some("mokuro"));
    /// assert_eq!(file.stem(), "vol.01");
    /// ```
    pub fn extension(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(_, ext)| ext)
    }

    /// The name with its last extension removed.
    pub fn stem(&self) -> &str {
        self.name.rsplit_once('.').map_or(self.name.as_str(), |(stem, _)| stem)
    }
}

impl Debug for SourceFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("relative_path", &self.relative_path)
            .field("mime", &self.mime)
            .field("size", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("001.jpg", Some("image/jpeg"))]
    #[case("001.JPEG", Some("image/jpeg"))]
    #[case("cover.png", Some("image/png"))]
    #[case("page.webp", Some("image/webp"))]
    #[case("no-extension", None)]
    fn test_mime_type_from_name(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(SourceFile::new(name, Vec::<u8>::new()).mime_type(), expected);
    }

    #[test]
    fn test_declared_mime_wins() {
        let file = SourceFile::new("blob", Vec::<u8>::new()).with_mime("image/png");
        assert_eq!(file.mime_type(), Some("image/png"));
    }

    #[rstest]
    #[case("info.mokuro", "info", Some("mokuro"))]
    #[case("vol.01.cbz", "vol.01", Some("cbz"))]
    #[case(".mokuro", "", Some("mokuro"))]
    #[case("README", "README", None)]
    fn test_stem_and_extension(#[case] name: &str, #[case] stem: &str, #[case] ext: Option<&str>) {
        let file = SourceFile::new(name, Vec::<u8>::new());
        assert_eq!(file.stem(), stem);
        assert_eq!(file.extension(), ext);
    }

    #[test]
    fn test_empty_relative_path_is_none() {
        let file = SourceFile::new("a.jpg", Vec::<u8>::new()).with_relative_path("");
        assert_eq!(file.relative_path(), None);
        let file = file.with_relative_path("dir/a.jpg");
        assert_eq!(file.relative_path(), Some("dir/a.jpg"));
    }

    #[test]
    fn test_clone_shares_contents() {
        let file = SourceFile::new("a.jpg", vec![1, 2, 3]);
        let copy = file.clone();
        assert!(Arc::ptr_eq(&file.shared_data(), &copy.shared_data()));
        assert_eq!(copy.len(), 3);
    }
}
