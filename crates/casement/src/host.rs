//! Windowing-host collaborator interfaces.
//!
//! The orchestration layer never talks to a concrete windowing system.
//! Everything it needs from one is captured by two traits: [`WindowHost`]
//! (instantiate windows, query the display and focus state) and
//! [`HostWindow`] (the opaque per-window handle with show/move/load/close
//! primitives).
//!
//! Host-initiated events (a window closed by the user, a failed content
//! load, readiness notifications) flow back in through a single intake
//! point, [`crate::WindowManager::handle_host_event`], mirroring how an
//! event-loop adapter routes raw window events to a manager.

use serde_json::Value;

use crate::geometry::WorkArea;

/// Free-form options forwarded verbatim to the host's content-loading
/// primitive.
pub type LoadOptions = serde_json::Map<String, Value>;

/// Host-assigned numeric identity of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostWindowId(pub u64);

/// Absolute window bounds in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Resolved per-window options handed to the host at instantiation.
///
/// This is the typed output of configuration merging; anything the core
/// does not interpret itself travels in `extra`.
#[derive(Debug, Clone, Default)]
pub struct HostWindowOptions {
    pub title: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    /// Ask the host to center the window (its native behavior).
    pub center: bool,
    pub resizable: bool,
    /// Interpret width/height as the content size rather than the outer
    /// frame size.
    pub use_content_size: bool,
    /// Whether the window is drawn with a native frame.
    pub frame: bool,
    /// Whether the window is visible immediately after creation.
    pub show: bool,
    /// Opaque passthrough fields, forwarded verbatim.
    pub extra: serde_json::Map<String, Value>,
}

/// An event reported by the host about one of its windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The window was closed (by the user or programmatically).
    Closed,
    /// The host failed to load the requested content.
    LoadFailed,
    /// The content's DOM finished parsing.
    DomReady,
    /// The content finished loading completely.
    FinishedLoad,
}

/// The opaque handle to a live host window.
pub trait HostWindow: Send {
    /// The host-assigned identity of this window.
    fn id(&self) -> HostWindowId;

    /// Current outer bounds.
    fn bounds(&self) -> Bounds;

    /// Move and/or resize the window.
    fn set_bounds(&self, bounds: Bounds);

    fn show(&self);
    fn hide(&self);
    fn focus(&self);
    fn minimize(&self);
    fn maximize(&self);
    fn restore(&self);
    fn is_maximized(&self) -> bool;

    /// Request a graceful close (the host will report [`HostEvent::Closed`]).
    fn close(&self);

    /// Tear the window down immediately.
    fn destroy(&self);

    /// Apply a menu. `None` means "no menu at all", which is distinct
    /// from never calling this method.
    fn set_menu(&self, menu: Option<&Value>);

    fn toggle_dev_tools(&self, detached: bool);

    /// Load a content locator.
    fn load_url(&self, url: &str, options: &LoadOptions);

    /// Load inline content directly, bypassing any fetch.
    fn load_html(&self, html: &str, options: &LoadOptions);

    /// The locator of the currently loaded content.
    fn current_url(&self) -> String;

    fn reload(&self);
    fn reload_ignoring_cache(&self);

    /// Execute a script inside the window's content.
    fn execute(&self, script: &str);

    fn can_go_back(&self) -> bool;
    fn go_back(&self);
}

/// The windowing host itself.
pub trait WindowHost: Send + Sync {
    /// Instantiate a window from resolved options.
    fn create_window(
        &self,
        options: &HostWindowOptions,
    ) -> Result<Box<dyn HostWindow>, String>;

    /// Usable area of the primary display.
    fn work_area(&self) -> WorkArea;

    /// Identity of the window that currently has focus, if any.
    fn focused_window(&self) -> Option<HostWindowId>;

    /// Identities of all live host windows, managed here or not.
    fn window_ids(&self) -> Vec<HostWindowId>;

    /// Request a graceful close of a host window by identity. Used for
    /// bulk operations that must reach host windows the manager never
    /// created.
    fn close_window(&self, id: HostWindowId);
}

#[cfg(test)]
pub(crate) mod mock {
    //! A recording host for tests. Every operation performed on a window
    //! is captured in shared state the test can inspect afterwards.

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    use parking_lot::Mutex;

    use super::*;

    /// What a mock window has been asked to load.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Loaded {
        Url(String),
        Html(String),
    }

    #[derive(Debug, Default)]
    pub struct WindowState {
        pub id: u64,
        pub options: HostWindowOptions,
        pub bounds: Bounds,
        pub visible: bool,
        pub focus_count: usize,
        pub minimized: bool,
        pub maximized: bool,
        pub restored: usize,
        pub closed: bool,
        pub destroyed: bool,
        pub menu: Option<Option<Value>>,
        pub dev_tools_toggles: usize,
        pub loads: Vec<Loaded>,
        pub reloads: usize,
        pub uncached_reloads: usize,
        pub scripts: Vec<String>,
        pub can_go_back: bool,
        pub back_count: usize,
    }

    pub struct MockWindow {
        state: Arc<Mutex<WindowState>>,
    }

    impl HostWindow for MockWindow {
        fn id(&self) -> HostWindowId {
            HostWindowId(self.state.lock().id)
        }

        fn bounds(&self) -> Bounds {
            self.state.lock().bounds
        }

        fn set_bounds(&self, bounds: Bounds) {
            self.state.lock().bounds = bounds;
        }

        fn show(&self) {
            self.state.lock().visible = true;
        }

        fn hide(&self) {
            self.state.lock().visible = false;
        }

        fn focus(&self) {
            self.state.lock().focus_count += 1;
        }

        fn minimize(&self) {
            self.state.lock().minimized = true;
        }

        fn maximize(&self) {
            self.state.lock().maximized = true;
        }

        fn restore(&self) {
            let mut state = self.state.lock();
            state.minimized = false;
            state.maximized = false;
            state.restored += 1;
        }

        fn is_maximized(&self) -> bool {
            self.state.lock().maximized
        }

        fn close(&self) {
            self.state.lock().closed = true;
        }

        fn destroy(&self) {
            self.state.lock().destroyed = true;
        }

        fn set_menu(&self, menu: Option<&Value>) {
            self.state.lock().menu = Some(menu.cloned());
        }

        fn toggle_dev_tools(&self, _detached: bool) {
            self.state.lock().dev_tools_toggles += 1;
        }

        fn load_url(&self, url: &str, _options: &LoadOptions) {
            self.state.lock().loads.push(Loaded::Url(url.to_string()));
        }

        fn load_html(&self, html: &str, _options: &LoadOptions) {
            self.state.lock().loads.push(Loaded::Html(html.to_string()));
        }

        fn current_url(&self) -> String {
            match self.state.lock().loads.last() {
                Some(Loaded::Url(url)) => url.clone(),
                Some(Loaded::Html(_)) => "data:text/html".to_string(),
                None => String::new(),
            }
        }

        fn reload(&self) {
            self.state.lock().reloads += 1;
        }

        fn reload_ignoring_cache(&self) {
            self.state.lock().uncached_reloads += 1;
        }

        fn execute(&self, script: &str) {
            self.state.lock().scripts.push(script.to_string());
        }

        fn can_go_back(&self) -> bool {
            self.state.lock().can_go_back
        }

        fn go_back(&self) {
            self.state.lock().back_count += 1;
        }
    }

    /// A recording [`WindowHost`]. Clone it before handing it to the
    /// manager to keep a handle for assertions.
    #[derive(Clone)]
    pub struct MockHost {
        inner: Arc<MockHostInner>,
    }

    struct MockHostInner {
        next_id: AtomicU64,
        work_area: WorkArea,
        focused: Mutex<Option<HostWindowId>>,
        windows: Mutex<Vec<Arc<Mutex<WindowState>>>>,
    }

    impl MockHost {
        pub fn new() -> Self {
            Self::with_work_area(WorkArea::new(1920, 1080))
        }

        pub fn with_work_area(work_area: WorkArea) -> Self {
            Self {
                inner: Arc::new(MockHostInner {
                    next_id: AtomicU64::new(1),
                    work_area,
                    focused: Mutex::new(None),
                    windows: Mutex::new(Vec::new()),
                }),
            }
        }

        /// State of the nth created window.
        pub fn window(&self, index: usize) -> Arc<Mutex<WindowState>> {
            self.inner.windows.lock()[index].clone()
        }

        pub fn window_count(&self) -> usize {
            self.inner.windows.lock().len()
        }

        pub fn set_focused(&self, id: Option<HostWindowId>) {
            *self.inner.focused.lock() = id;
        }
    }

    impl WindowHost for MockHost {
        fn create_window(
            &self,
            options: &HostWindowOptions,
        ) -> Result<Box<dyn HostWindow>, String> {
            let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
            let state = Arc::new(Mutex::new(WindowState {
                id,
                options: options.clone(),
                bounds: Bounds {
                    x: options.x.unwrap_or(0),
                    y: options.y.unwrap_or(0),
                    width: options.width.unwrap_or(800),
                    height: options.height.unwrap_or(600),
                },
                visible: options.show,
                ..WindowState::default()
            }));
            self.inner.windows.lock().push(state.clone());
            *self.inner.focused.lock() = Some(HostWindowId(id));
            Ok(Box::new(MockWindow { state }))
        }

        fn work_area(&self) -> WorkArea {
            self.inner.work_area
        }

        fn focused_window(&self) -> Option<HostWindowId> {
            *self.inner.focused.lock()
        }

        fn window_ids(&self) -> Vec<HostWindowId> {
            self.inner
                .windows
                .lock()
                .iter()
                .filter(|w| !w.lock().closed && !w.lock().destroyed)
                .map(|w| HostWindowId(w.lock().id))
                .collect()
        }

        fn close_window(&self, id: HostWindowId) {
            for state in self.inner.windows.lock().iter() {
                let mut state = state.lock();
                if state.id == id.0 {
                    state.closed = true;
                }
            }
        }
    }
}
