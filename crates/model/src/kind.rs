use crate::file::SourceFile;
use serde::{Deserialize, Serialize};

/// What the pipeline should do with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Sidecar `.mokuro` document.
    Metadata,
    /// A page image of a supported type.
    Image,
    /// A zip-compatible archive to unpack.
    Archive,
    /// Anything else; ignored.
    Other,
}

/// Rules for classifying uploaded files.
///
/// - The metadata extension is compared exactly (`.mokuro`, not `.MOKURO`).
/// - Archive extensions are compared case-insensitively, so `zip`, `ZIP`,
///   `cbz` and `CBZ` are all accepted with the defaults.
/// - Images are recognised by mime type: the declared type if there is one,
///   otherwise the type guessed from the file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Classifier {
    pub metadata_extension: String,
    pub archive_extensions: Vec<String>,
    pub image_types: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            metadata_extension: "mokuro".to_string(),
            archive_extensions: vec!["zip".to_string(), "cbz".to_string()],
            image_types: vec!["image/jpeg".to_string(), "image/png".to_string(), "image/webp".to_string()],
        }
    }
}

impl Classifier {
    pub fn classify(&self, file: &SourceFile) -> FileKind {
        self.classify_parts(file.extension(), file.mime_type())
    }

    /// Classify a bare file name (such as an archive entry), guessing its
    /// mime type from the name alone.
    pub fn classify_name(&self, name: &str) -> FileKind {
        let extension = name.rsplit_once('.').map(|(_, ext)| ext);
        self.classify_parts(extension, mime_guess::from_path(name).first_raw())
    }

    fn classify_parts(&self, extension: Option<&str>, mime: Option<&str>) -> FileKind {
        if extension.is_some_and(|ext| self.is_metadata_extension(ext)) {
            return FileKind::Metadata;
        }
        if mime.is_some_and(|mime| self.is_image_type(mime)) {
            return FileKind::Image;
        }
        if extension.is_some_and(|ext| self.is_archive_extension(ext)) {
            return FileKind::Archive;
        }
        FileKind::Other
    }

    pub fn is_metadata_extension(&self, extension: &str) -> bool {
        extension == self.metadata_extension
    }

    pub fn is_archive_extension(&self, extension: &str) -> bool {
        self.archive_extensions.iter().any(|known| known.eq_ignore_ascii_case(extension))
    }

    pub fn is_image_type(&self, mime: &str) -> bool {
        self.image_types.iter().any(|known| known.eq_ignore_ascii_case(mime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("volume.mokuro", FileKind::Metadata)]
    #[case("volume.MOKURO", FileKind::Other)]
    #[case("001.jpg", FileKind::Image)]
    #[case("001.jpeg", FileKind::Image)]
    #[case("001.png", FileKind::Image)]
    #[case("001.webp", FileKind::Image)]
    #[case("001.gif", FileKind::Other)]
    #[case("volume.zip", FileKind::Archive)]
    #[case("volume.ZIP", FileKind::Archive)]
    #[case("volume.cbz", FileKind::Archive)]
    #[case("volume.CBZ", FileKind::Archive)]
    #[case("volume.rar", FileKind::Other)]
    #[case("notes.txt", FileKind::Other)]
    #[case("README", FileKind::Other)]
    fn test_classify_name_default(#[case] name: &str, #[case] expected: FileKind) {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify_name(name), expected);
        assert_eq!(classifier.classify(&SourceFile::new(name, Vec::<u8>::new())), expected);
    }

    #[test]
    fn test_declared_mime_is_trusted() {
        let classifier = Classifier::default();
        let file = SourceFile::new("page", Vec::<u8>::new()).with_mime("image/webp");
        assert_eq!(classifier.classify(&file), FileKind::Image);
    }

    #[test]
    fn test_custom_rules() {
        let classifier = Classifier {
            metadata_extension: "json".to_string(),
            archive_extensions: vec!["cbz".to_string()],
            image_types: vec!["image/png".to_string()],
        };
        assert_eq!(classifier.classify_name("info.json"), FileKind::Metadata);
        assert_eq!(classifier.classify_name("001.jpg"), FileKind::Other);
        assert_eq!(classifier.classify_name("vol.zip"), FileKind::Other);
        assert_eq!(classifier.classify_name("vol.cbz"), FileKind::Archive);
    }
}
