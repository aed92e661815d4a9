use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured data read from a volume's sidecar `.mokuro` document.
///
/// Only the two identifiers are interpreted; every other field of the
/// document (pages, OCR blocks, tool versions, ...) is kept in
/// [`payload`](Self::payload) and serialised back out unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMetadata {
    /// Identifies the title (manga series) the volume belongs to.
    pub title_uuid: String,
    /// Identifies this volume; unique within its title.
    pub volume_uuid: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl VolumeMetadata {
    pub fn new(title_uuid: impl Into<String>, volume_uuid: impl Into<String>) -> Self {
        Self {
            title_uuid: title_uuid.into(),
            volume_uuid: volume_uuid.into(),
            payload: Map::new(),
        }
    }

    /// Parse a sidecar document.
    ///
    /// Fails with [`InvalidMetadata`](ErrorKind::InvalidMetadata) if the
    /// bytes are not a JSON object, or if either identifier is missing, not
    /// a string, or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use mokuro_model::VolumeMetadata;
    ///
    /// let doc = br#"{"title_uuid": "t-1", "volume_uuid": "v-1", "pages": []}"#;
    /// let metadata = VolumeMetadata::from_slice(doc).unwrap();
    /// assert_eq!(metadata.title_uuid, "t-1");
    /// assert!(metadata.payload.contains_key("pages"));
    /// ```
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let metadata: Self = serde_json::from_slice(bytes).or_raise(|| ErrorKind::InvalidMetadata)?;
        if metadata.title_uuid.is_empty() || metadata.volume_uuid.is_empty() {
            exn::bail!(ErrorKind::InvalidMetadata);
        }
        Ok(metadata)
    }

    /// Look up an opaque payload field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_payload_round_trips_unmodified() {
        let doc = json!({
            "version": "0.1.8",
            "title": "Yotsuba",
            "title_uuid": "5c0a",
            "volume": "Volume 1",
            "volume_uuid": "9f2e",
            "pages": [{"img_path": "001.jpg", "blocks": []}],
        });
        let metadata = VolumeMetadata::from_slice(doc.to_string().as_bytes()).unwrap();
        assert_eq!(metadata.title_uuid, "5c0a");
        assert_eq!(metadata.volume_uuid, "9f2e");
        assert_eq!(metadata.get("title"), Some(&json!("Yotsuba")));
        assert_eq!(serde_json::to_value(&metadata).unwrap(), doc);
    }

    #[rstest]
    #[case(b"not json at all".as_slice())]
    #[case(br#"[1, 2, 3]"#.as_slice())]
    #[case(br#"{"volume_uuid": "v"}"#.as_slice())]
    #[case(br#"{"title_uuid": "t"}"#.as_slice())]
    #[case(br#"{"title_uuid": 7, "volume_uuid": "v"}"#.as_slice())]
    #[case(br#"{"title_uuid": "", "volume_uuid": "v"}"#.as_slice())]
    fn test_invalid_documents(#[case] doc: &[u8]) {
        let err = VolumeMetadata::from_slice(doc).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidMetadata);
    }
}
