//! Recursive enumeration of file-system entries into a flat file list.
//!
//! A dropped folder (or any other tree of [`Entry`]s) is flattened into
//! [`SourceFile`](mokuro_model::SourceFile)s, each stamped with its path from
//! the walk root's parent, so `Series/vol1/001.jpg` keeps telling the
//! correlator which volume it belongs to.
//!
//! Directories are read in batches through an [`EntryReader`] until an empty
//! batch comes back. Files are resolved concurrently while the walk carries
//! on; subdirectories are descended one at a time. Nothing here fails the
//! walk as a whole: unreadable directories and files are logged and left out.

mod entry;
pub mod error;
mod local;
#[cfg(any(test, feature = "mock"))]
mod memory;
mod walker;

pub use self::entry::{Entry, EntryHandle, EntryKind, EntryReader, join_path};
pub use self::local::LocalEntry;
#[cfg(any(test, feature = "mock"))]
pub use self::memory::MemoryEntry;
pub use self::walker::{walk, walk_all};
