use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use indexmap::IndexMap;
use mokuro_model::{Classifier, FileKind, SourceFile, VolumeFiles, base_name, normalize_relative, sort_naturally};
use std::io::{Cursor, Read, Seek};
use std::sync::Arc;
use tracing::instrument;
use zip::ZipArchive;

/// The usable contents of one archive, keyed by normalised in-archive path.
///
/// Iteration order is natural filename order.
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    files: IndexMap<String, SourceFile>,
}

impl Extracted {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceFile)> {
        self.files.iter().map(|(path, file)| (path.as_str(), file))
    }

    /// Every extracted file, each stamped with its in-archive path.
    pub fn into_files(self) -> Vec<SourceFile> {
        self.files.into_values().collect()
    }

    /// Only the image entries, keyed by file name like every other volume's
    /// pages; an archive that is one volume contributes exactly these.
    ///
    /// Where two entries share a name, the later one replaces the earlier
    /// in its place.
    pub fn images(&self, classifier: &Classifier) -> VolumeFiles {
        self.files
            .values()
            .filter(|file| classifier.classify(file) == FileKind::Image)
            .map(|file| (file.name().to_string(), file.clone()))
            .collect()
    }
}

/// Extract every image and metadata entry of the archive in `data`.
///
/// `name` is only used for diagnostics. Fails only if `data` is not a
/// readable archive; individual unreadable entries are logged and skipped.
#[instrument(skip(data, classifier), fields(size = data.len()))]
pub fn extract(name: &str, data: &[u8], classifier: &Classifier) -> Result<Extracted> {
    let mut archive = ZipArchive::new(Cursor::new(data)).or_raise(|| ErrorKind::Open(name.to_string()))?;
    let mut entry_names: Vec<String> = archive.file_names().map(str::to_string).collect();
    sort_naturally(&mut entry_names, String::as_str);

    let mut extracted = Extracted::default();
    for entry_name in &entry_names {
        match read_entry(&mut archive, entry_name, classifier) {
            Ok(Some((path, file))) => {
                extracted.files.insert(path, file);
            },
            Ok(None) => {},
            Err(e) => tracing::warn!(entry = %entry_name, error = ?e, "Skipping unreadable archive entry"),
        }
    }
    tracing::debug!(entries = entry_names.len(), extracted = extracted.len(), "Extracted archive");
    Ok(extracted)
}

/// [`extract`] on the blocking thread pool.
pub async fn extract_async(name: String, data: Arc<[u8]>, classifier: Classifier) -> Result<Extracted> {
    tokio::task::spawn_blocking(move || extract(&name, &data, &classifier))
        .await
        .or_raise(|| ErrorKind::Blocking)?
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    entry_name: &str,
    classifier: &Classifier,
) -> Result<Option<(String, SourceFile)>> {
    if entry_name.ends_with(['/', '\\']) {
        return Ok(None);
    }
    let path = normalize_relative(entry_name).or_raise(|| ErrorKind::Entry(entry_name.to_string()))?;
    let file_name = base_name(&path);
    let kind = classifier.classify_name(file_name);
    if !matches!(kind, FileKind::Image | FileKind::Metadata) {
        tracing::trace!(entry = %entry_name, ?kind, "Ignoring archive entry");
        return Ok(None);
    }

    let mut entry = archive.by_name(entry_name).or_raise(|| ErrorKind::Entry(entry_name.to_string()))?;
    if entry.is_dir() {
        return Ok(None);
    }
    let mut data = Vec::new();
    entry.read_to_end(&mut data).or_raise(|| ErrorKind::Entry(entry_name.to_string()))?;

    let mut file = SourceFile::new(file_name, data).with_relative_path(path.clone());
    if kind == FileKind::Image
        && let Some(mime) = mime_guess::from_path(file_name).first_raw()
    {
        file = file.with_mime(mime);
    }
    Ok(Some((path, file)))
}
