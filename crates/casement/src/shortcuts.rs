//! Global-hotkey collaborator interface.
//!
//! Shortcuts are registered against a specific host window. The core uses
//! this internally to wire dev-mode accelerators (devtools toggle and
//! reload) onto every created window, and exposes it to applications via
//! [`crate::Window::register_shortcut`].

use crate::host::HostWindowId;

/// Accelerator that toggles developer tooling on the focused window in
/// dev mode.
pub const DEV_TOOLS_ACCELERATOR: &str = "CmdOrCtrl+F12";

/// Accelerator that reloads the focused window's content in dev mode.
pub const RELOAD_ACCELERATOR: &str = "CmdOrCtrl+R";

/// Registers accelerator strings against host windows.
pub trait ShortcutRegistrar: Send + Sync {
    /// Register `accelerator` for the given window. The callback fires on
    /// the control thread whenever the accelerator is pressed while the
    /// window has focus.
    fn register(&self, window: HostWindowId, accelerator: &str, callback: Box<dyn Fn() + Send + Sync>);
}

#[cfg(test)]
pub(crate) mod mock {
    use parking_lot::Mutex;

    use super::*;

    type Entry = (HostWindowId, String, Box<dyn Fn() + Send + Sync>);

    /// Records registrations and lets tests fire them.
    #[derive(Default)]
    pub struct MockShortcuts {
        entries: Mutex<Vec<Entry>>,
    }

    impl MockShortcuts {
        pub fn new() -> Self {
            Self::default()
        }

        /// Accelerators registered for a window, in registration order.
        pub fn accelerators(&self, window: HostWindowId) -> Vec<String> {
            self.entries
                .lock()
                .iter()
                .filter(|(id, _, _)| *id == window)
                .map(|(_, accel, _)| accel.clone())
                .collect()
        }

        /// Invoke the callback registered for an accelerator.
        pub fn fire(&self, window: HostWindowId, accelerator: &str) {
            let entries = self.entries.lock();
            for (id, accel, callback) in entries.iter() {
                if *id == window && accel == accelerator {
                    callback();
                }
            }
        }
    }

    impl ShortcutRegistrar for MockShortcuts {
        fn register(
            &self,
            window: HostWindowId,
            accelerator: &str,
            callback: Box<dyn Fn() + Send + Sync>,
        ) {
            self.entries.lock().push((window, accelerator.to_string(), callback));
        }
    }
}
