//! Grouping of loose files into candidate volumes.
//!
//! A volume is recognised by its sidecar metadata file: every `.mokuro`
//! document opens a candidate keyed by its path without the extension
//! (`Series/vol1.mokuro` opens `Series/vol1`). Images then join the
//! candidate whose key best matches their own path, and archives become
//! whole volumes of their own. An upload consisting of a single archive is
//! unpacked and correlated as if its contents had been uploaded instead.
//!
//! Correlation never fails: unparseable metadata and unreadable archives are
//! logged and left out, and whatever is incomplete is for the merger to
//! reject.

mod details;
pub mod error;
mod pass;

pub use self::pass::{Correlation, Pass, correlate};
