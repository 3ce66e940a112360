//! Filesystem layer for envcfg
//!
//! Provides the two guarantees the pipeline relies on when it replaces a
//! destination file:
//!
//! - **Atomic replacement**: content is written to a sibling temp file and
//!   renamed over the destination, so readers see the old or the new bytes.
//! - **Backups**: existing destination content is copied to a timestamped
//!   sibling (or a configured directory) before anything is mutated.

pub mod backup;
pub mod error;
pub mod io;

pub use backup::{Backup, BackupStore};
pub use error::{Error, Result};
