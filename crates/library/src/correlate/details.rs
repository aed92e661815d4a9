use mokuro_model::{SourceFile, dir_name};
use regex::Regex;
use std::sync::LazyLock;

static TRAILING_EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[^./]*$").unwrap());

/// Naming facts about one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Details {
    /// Name without its last extension.
    pub stem: String,
    /// Volume key: the relative path without its last extension, or the
    /// stem for files with no relative path.
    pub path: String,
}

impl Details {
    pub fn of(file: &SourceFile) -> Self {
        let stem = file.stem().to_string();
        let path = match file.relative_path() {
            Some(relative) => TRAILING_EXTENSION.replace(relative, "").into_owned(),
            None => stem.clone(),
        };
        Self { stem, path }
    }
}

/// How deep inside volume key `key`'s directory the image at `path` sits,
/// as the length of the shared prefix; `None` if it is not inside it.
///
/// `T/vol1` contains `T/vol1/001.jpg` but not `T/vol10/001.jpg`.
pub(crate) fn inside(key: &str, path: &str) -> Option<usize> {
    let rest = path.strip_prefix(key)?;
    rest.starts_with('/').then_some(key.len() + 1)
}

/// Position of the key whose directory contains the image at `path` most
/// deeply. Ties go to the earliest key.
pub(crate) fn deepest<'a>(keys: impl IntoIterator<Item = &'a str>, path: &str) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, key) in keys.into_iter().enumerate() {
        if let Some(depth) = inside(key, path)
            && best.is_none_or(|(_, current)| depth > current)
        {
            best = Some((index, depth));
        }
    }
    best.map(|(index, _)| index)
}

/// Position of the only key sitting in the same directory as the image at
/// `path`, as with a metadata file kept inside its own volume folder
/// (`a/info` beside `a/1.png`). `None` if no key or several keys sit there.
pub(crate) fn lone_sibling<'a>(keys: impl IntoIterator<Item = &'a str>, path: &str) -> Option<usize> {
    let directory = dir_name(path);
    let mut siblings = keys.into_iter().enumerate().filter(|(_, key)| dir_name(key) == directory);
    match (siblings.next(), siblings.next()) {
        (Some((index, _)), None) => Some(index),
        _ => None,
    }
}
