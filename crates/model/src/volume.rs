use crate::file::SourceFile;
use crate::metadata::VolumeMetadata;
use derive_more::Display;
use indexmap::IndexMap;

/// A volume's images, keyed by image name.
///
/// Insertion ordered: iteration order is page order.
pub type VolumeFiles = IndexMap<String, SourceFile>;

/// The part of a volume that was never found.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    #[display("metadata")]
    Metadata,
    #[display("images")]
    Images,
}

/// A volume under construction.
///
/// Each correlation pass owns its partial volumes (keyed by path) and fills
/// in whichever parts it finds; nothing is guaranteed until
/// [`validate`](Self::validate) succeeds.
#[derive(Debug, Clone, Default)]
pub struct PartialVolume {
    pub metadata: Option<VolumeMetadata>,
    pub volume_name: Option<String>,
    pub files: Option<VolumeFiles>,
}

impl PartialVolume {
    pub fn attach_metadata(&mut self, metadata: VolumeMetadata, volume_name: impl Into<String>) {
        self.metadata = Some(metadata);
        self.volume_name = Some(volume_name.into());
    }

    /// Add one image, replacing any earlier image with the same key.
    pub fn attach_file(&mut self, key: impl Into<String>, file: SourceFile) {
        self.files.get_or_insert_with(VolumeFiles::new).insert(key.into(), file);
    }

    /// Replace the whole image set (an archive is one volume's worth of images).
    pub fn set_files(&mut self, files: VolumeFiles) {
        self.files = Some(files);
    }

    /// First missing part, metadata before images.
    pub fn missing(&self) -> Option<Missing> {
        let has_name = self.volume_name.as_deref().is_some_and(|name| !name.is_empty());
        if self.metadata.is_none() || !has_name {
            return Some(Missing::Metadata);
        }
        if self.files.as_ref().is_none_or(|files| files.is_empty()) {
            return Some(Missing::Images);
        }
        None
    }

    pub fn is_valid(&self) -> bool {
        self.missing().is_none()
    }

    /// Finalize into a [`Volume`], or report what is missing.
    pub fn validate(self) -> Result<Volume, Missing> {
        if let Some(missing) = self.missing() {
            return Err(missing);
        }
        match (self.metadata, self.volume_name, self.files) {
            (Some(metadata), Some(volume_name), Some(files)) => Ok(Volume { metadata, volume_name, files }),
            // `missing()` has already ruled these out.
            (None, _, _) | (_, None, _) => Err(Missing::Metadata),
            (_, _, None) => Err(Missing::Images),
        }
    }
}

/// A validated volume: metadata, a name, and at least one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub metadata: VolumeMetadata,
    pub volume_name: String,
    pub files: VolumeFiles,
}

impl Volume {
    pub fn title_uuid(&self) -> &str {
        &self.metadata.title_uuid
    }

    pub fn volume_uuid(&self) -> &str {
        &self.metadata.volume_uuid
    }

    pub fn page_count(&self) -> usize {
        self.files.len()
    }
}
