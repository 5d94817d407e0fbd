//! Content-fetch collaborator interface.
//!
//! Layout wrappers and page bodies are read through [`ContentFetcher`],
//! keeping the core independent of where content actually lives. The
//! default implementation reads the local filesystem.

use std::io;
use std::path::Path;

/// Reads a resource locator to text.
pub trait ContentFetcher: Send + Sync {
    /// Read the resource at `locator`, yielding its text content or an
    /// I/O error when it is missing or unreadable.
    fn fetch(&self, locator: &str) -> io::Result<String>;
}

/// Filesystem-backed fetcher.
///
/// A `file://` prefix on the locator is stripped before reading, matching
/// how layout and page locators are written in window setups.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFetcher;

impl ContentFetcher for FsFetcher {
    fn fetch(&self, locator: &str) -> io::Result<String> {
        let path = locator.strip_prefix("file://").unwrap_or(locator);
        std::fs::read_to_string(Path::new(path))
    }
}
