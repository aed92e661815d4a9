//! Relative path helpers.
//!
//! Paths inside the pipeline are plain `/`-separated strings relative to
//! whatever root they were found under (a dropped folder, an archive). These
//! helpers keep them that way regardless of where they came from.

use crate::error::{ErrorKind, Result};

/// Normalise a relative path into `/`-separated components.
///
/// Both `/` and `\` separate components (archives written on Windows use
/// backslashes). Empty and `.` components are dropped and `..` pops the
/// previous component; popping past the root, NUL bytes, or a path with no
/// components left are [`InvalidPath`](ErrorKind::InvalidPath).
///
/// # Examples
///
/// ```
/// use mokuro_model::normalize_relative;
///
/// assert_eq!(normalize_relative("vol1//./001.jpg").unwrap(), "vol1/001.jpg");
/// assert_eq!(normalize_relative("vol1\\001.jpg").unwrap(), "vol1/001.jpg");
/// assert!(normalize_relative("../etc/passwd").is_err());
/// ```
pub fn normalize_relative(path: &str) -> Result<String> {
    let mut components = Vec::new();
    for component in path.split(['/', '\\']) {
        match component {
            "" | "." => {},
            ".." => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.to_string()));
                }
            },
            // NUL bytes truncate paths in C-based syscalls.
            c if c.contains('\0') => exn::bail!(ErrorKind::InvalidPath(path.to_string())),
            c => components.push(c),
        }
    }
    if components.is_empty() {
        exn::bail!(ErrorKind::InvalidPath(path.to_string()));
    }
    Ok(components.join("/"))
}

/// Last component of a `/`-separated path.
pub fn base_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Everything before the last `/`, or `""` for a bare name.
pub fn dir_name(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}
