//! Error types for Casement.

/// Result type alias for Casement operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while orchestrating windows.
///
/// Configuration-resolution problems (unknown template, unknown layout,
/// malformed position name) are deliberately *not* represented here: those
/// degrade gracefully with a `tracing::warn!` diagnostic and the operation
/// proceeds with a fallback. The variants below are definite failures a
/// caller must handle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation required a live host window, but the window has not
    /// been created yet or has already been closed/destroyed.
    #[error("window '{name}' has no live host window")]
    NotLive { name: String },

    /// The windowing host failed to instantiate a window.
    #[error("window creation failed for '{name}': {message}")]
    HostCreation { name: String, message: String },

    /// A shortcut was requested but no shortcut registrar was supplied
    /// when the manager was built.
    #[error("no shortcut registrar is configured")]
    NoShortcutRegistrar,
}

impl Error {
    /// Create a `NotLive` error for the named window.
    pub fn not_live(name: impl Into<String>) -> Self {
        Self::NotLive { name: name.into() }
    }

    /// Create a `HostCreation` error.
    pub fn host_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HostCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_live("main");
        assert!(format!("{}", err).contains("main"));

        let err = Error::host_creation("popup", "out of handles");
        assert!(format!("{}", err).contains("popup"));
        assert!(format!("{}", err).contains("out of handles"));

        let err = Error::NoShortcutRegistrar;
        assert!(format!("{}", err).contains("registrar"));
    }
}
