//! Last-modified instants from files and directories
//!
//! Lookups are asynchronous and never fail from the caller's point of view:
//! any I/O error or timeout degrades to the current instant.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::additional::generate_last_modified;
use crate::dates::{DateFormat, latest_timestamp};
use crate::response::HeaderResult;

/// Something that knows when the content it describes last changed
#[async_trait]
pub trait TimestampSource: Send + Sync + 'static {
    async fn last_modified(&self) -> io::Result<DateTime<Utc>>;

    /// Label for logs
    fn describe(&self) -> String {
        "timestamp source".to_string()
    }
}

/// A fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimestamp(pub DateTime<Utc>);

#[async_trait]
impl TimestampSource for FixedTimestamp {
    async fn last_modified(&self) -> io::Result<DateTime<Utc>> {
        Ok(self.0)
    }

    fn describe(&self) -> String {
        format!("fixed instant {}", self.0.to_rfc3339())
    }
}

/// The mtime of a file, or the newest mtime among a directory's files
///
/// Directories are not searched recursively. Symlinks in the given path are
/// resolved first; entries inside a directory are inspected without
/// following links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTimestamp {
    path: PathBuf,
}

impl PathTimestamp {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TimestampSource for PathTimestamp {
    async fn last_modified(&self) -> io::Result<DateTime<Utc>> {
        let real = tokio::fs::canonicalize(&self.path).await?;
        let meta = tokio::fs::symlink_metadata(&real).await?;

        if meta.is_file() {
            return Ok(meta.modified()?.into());
        }
        if meta.is_dir() {
            return directory_mtime(&real).await;
        }
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is neither a file nor a directory", real.display()),
        ))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

async fn directory_mtime(dir: &Path) -> io::Result<DateTime<Utc>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut stamps = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let meta = match entry.metadata().await {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => continue,
            Err(err) => {
                debug!(
                    target: "skp_headers",
                    path = %entry.path().display(),
                    error = %err,
                    "skipping unreadable directory entry"
                );
                continue;
            }
        };
        stamps.extend(entry_mtime(&entry.path(), meta.modified()));
    }

    // an empty directory counts as modified now
    Ok(latest_timestamp(stamps).unwrap_or_else(Utc::now))
}

/// An entry's mtime, or `None` when the platform cannot report it
fn entry_mtime(path: &Path, mtime: io::Result<SystemTime>) -> Option<DateTime<Utc>> {
    match mtime {
        Ok(mtime) => Some(mtime.into()),
        Err(err) => {
            debug!(
                target: "skp_headers",
                path = %path.display(),
                error = %err,
                "skipping directory entry without mtime"
            );
            None
        }
    }
}

/// Resolve a source with a time bound, falling back to now
pub async fn resolve_last_modified(source: &dyn TimestampSource, timeout: Duration) -> DateTime<Utc> {
    match tokio::time::timeout(timeout, source.last_modified()).await {
        Ok(Ok(instant)) => instant,
        Ok(Err(err)) => {
            warn!(
                target: "skp_headers",
                source = %source.describe(),
                error = %err,
                "last-modified lookup failed, using current time"
            );
            Utc::now()
        }
        Err(_) => {
            warn!(
                target: "skp_headers",
                source = %source.describe(),
                timeout_ms = timeout.as_millis() as u64,
                "last-modified lookup timed out, using current time"
            );
            Utc::now()
        }
    }
}

/// `Last-Modified` header from a source
pub async fn last_modified_header(
    source: &dyn TimestampSource,
    timeout: Duration,
    format: DateFormat,
) -> HeaderResult {
    generate_last_modified(resolve_last_modified(source, timeout).await, format)
}
