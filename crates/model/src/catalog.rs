use crate::volume::Volume;

/// One title in the catalog and the volumes ingested for it.
///
/// Within an entry, `volume_uuid` values are unique; the merger never
/// appends a volume whose id is already present.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// The title's `title_uuid`.
    pub id: String,
    pub volumes: Vec<Volume>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, volumes: Vec<Volume>) -> Self {
        Self { id: id.into(), volumes }
    }

    pub fn contains(&self, volume_uuid: &str) -> bool {
        self.volumes.iter().any(|volume| volume.volume_uuid() == volume_uuid)
    }

    pub fn volume_uuids(&self) -> impl Iterator<Item = &str> {
        self.volumes.iter().map(Volume::volume_uuid)
    }
}
