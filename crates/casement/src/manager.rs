//! The window manager: the application-facing façade.
//!
//! The manager owns the registry of named windows plus everything they
//! share (global configuration, template and layout registries, the
//! shared-data store, and the host/fetcher/shortcut collaborators).
//! Collaborators are injected at construction; nothing here is process
//! global, so tests and embedders can run any number of managers side by
//! side.
//!
//! Host-initiated events enter through [`WindowManager::handle_host_event`];
//! the event-loop adapter only needs a host window identity and an event
//! kind, and the manager routes it to the right entity.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use casement_core::{ConnectionId, SharedStore};

use crate::config::{CreateOptions, GlobalConfig};
use crate::error::Result;
use crate::fetch::ContentFetcher;
use crate::host::{HostEvent, HostWindowId, WindowHost};
use crate::layout::LayoutRegistry;
use crate::shortcuts::ShortcutRegistrar;
use crate::template::TemplateRegistry;
use crate::window::{SharedWindow, Window, into_shared};

/// State shared by the manager and every window it creates.
pub(crate) struct Context {
    pub(crate) config: RwLock<GlobalConfig>,
    pub(crate) templates: TemplateRegistry,
    pub(crate) layouts: LayoutRegistry,
    pub(crate) shared: SharedStore<Value>,
    pub(crate) host: Box<dyn WindowHost>,
    pub(crate) fetcher: Box<dyn ContentFetcher>,
    pub(crate) shortcuts: Option<Arc<dyn ShortcutRegistrar>>,
}

impl Context {
    pub(crate) fn new(
        config: GlobalConfig,
        host: Box<dyn WindowHost>,
        fetcher: Box<dyn ContentFetcher>,
        shortcuts: Option<Arc<dyn ShortcutRegistrar>>,
    ) -> Self {
        Self {
            config: RwLock::new(config),
            templates: TemplateRegistry::new(),
            layouts: LayoutRegistry::new(),
            shared: SharedStore::new(),
            host,
            fetcher,
            shortcuts,
        }
    }
}

/// Orchestrates named windows over an abstract windowing host.
///
/// Cheap to clone; clones share the same windows and state.
#[derive(Clone)]
pub struct WindowManager {
    ctx: Arc<Context>,
    windows: Arc<RwLock<HashMap<String, SharedWindow>>>,
}

impl WindowManager {
    /// Create a manager over the given host and content fetcher.
    pub fn new(
        config: GlobalConfig,
        host: Box<dyn WindowHost>,
        fetcher: Box<dyn ContentFetcher>,
    ) -> Self {
        Self::assemble(Context::new(config, host, fetcher, None))
    }

    /// Create a manager that can also register window-scoped shortcuts.
    pub fn with_shortcuts(
        config: GlobalConfig,
        host: Box<dyn WindowHost>,
        fetcher: Box<dyn ContentFetcher>,
        shortcuts: Arc<dyn ShortcutRegistrar>,
    ) -> Self {
        Self::assemble(Context::new(config, host, fetcher, Some(shortcuts)))
    }

    fn assemble(ctx: Context) -> Self {
        Self {
            ctx: Arc::new(ctx),
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// A snapshot of the global configuration.
    pub fn config(&self) -> GlobalConfig {
        self.ctx.config.read().clone()
    }

    /// Update the global configuration in place.
    pub fn update_config(&self, update: impl FnOnce(&mut GlobalConfig)) {
        update(&mut self.ctx.config.write());
    }

    // ========================================================================
    // Window registry
    // ========================================================================

    /// Create a named window entity (without instantiating it yet).
    ///
    /// An empty name gets a serial `window_N` name. Asking for a name
    /// that is already registered returns the existing window untouched,
    /// focusing it if live; the new options are dropped.
    pub fn create_new(&self, name: &str, options: CreateOptions) -> SharedWindow {
        let mut windows = self.windows.write();

        let name = if name.is_empty() {
            let mut n = windows.len() + 1;
            loop {
                let candidate = format!("window_{n}");
                if !windows.contains_key(&candidate) {
                    break candidate;
                }
                n += 1;
            }
        } else {
            name.to_string()
        };

        if let Some(existing) = windows.get(&name) {
            tracing::warn!(
                target: "casement::manager",
                name,
                "window already exists, returning it unchanged"
            );
            let _ = existing.lock().focus();
            return existing.clone();
        }

        tracing::debug!(target: "casement::manager", name, "registering window");
        let window = into_shared(Window::new(name.clone(), self.ctx.clone(), options));
        windows.insert(name, window.clone());
        window
    }

    /// Create a named window and open it immediately.
    pub fn open_new(&self, name: &str, options: CreateOptions) -> Result<SharedWindow> {
        let window = self.create_new(name, options);
        window.lock().open(false)?;
        Ok(window)
    }

    /// Look up a window by name.
    pub fn get(&self, name: &str) -> Option<SharedWindow> {
        self.windows.read().get(name).cloned()
    }

    /// Look up a live window by its host identity.
    pub fn get_by_id(&self, id: HostWindowId) -> Option<SharedWindow> {
        self.windows
            .read()
            .values()
            .find(|window| window.lock().id() == Some(id))
            .cloned()
    }

    pub fn window_count(&self) -> usize {
        self.windows.read().len()
    }

    pub fn window_names(&self) -> Vec<String> {
        self.windows.read().keys().cloned().collect()
    }

    /// Resolve a façade target: a name, or the host-focused window when
    /// absent. Misses are logged and yield `None`.
    fn resolve(&self, name: Option<&str>) -> Option<SharedWindow> {
        match name {
            Some(name) => {
                let found = self.windows.read().get(name).cloned();
                if found.is_none() {
                    tracing::warn!(target: "casement::manager", name, "no such window");
                }
                found
            }
            None => {
                let Some(id) = self.ctx.host.focused_window() else {
                    tracing::warn!(
                        target: "casement::manager",
                        "no window has focus, nothing to operate on"
                    );
                    return None;
                };
                let found = self.get_by_id(id);
                if found.is_none() {
                    tracing::warn!(
                        target: "casement::manager",
                        id = id.0,
                        "focused window is not managed here"
                    );
                }
                found
            }
        }
    }

    fn with_window(
        &self,
        name: Option<&str>,
        op: &'static str,
        action: impl FnOnce(&SharedWindow) -> Result<()>,
    ) {
        let Some(window) = self.resolve(name) else {
            return;
        };
        if let Err(error) = action(&window) {
            tracing::warn!(target: "casement::manager", op, %error, "window operation failed");
        }
    }

    // ========================================================================
    // Façade operations (by name, or on the focused window)
    // ========================================================================

    pub fn open(&self, name: Option<&str>) {
        self.with_window(name, "open", |w| w.lock().open(false).map(|_| ()));
    }

    pub fn close(&self, name: Option<&str>) {
        self.with_window(name, "close", |w| w.lock().close());
    }

    /// Tear a window down immediately and drop it from the registry.
    pub fn destroy(&self, name: Option<&str>) {
        let Some(window) = self.resolve(name) else {
            return;
        };
        let name = {
            let mut window = window.lock();
            let _ = window.destroy();
            window.name().to_string()
        };
        self.windows.write().remove(&name);
    }

    pub fn focus_on(&self, name: Option<&str>) {
        self.with_window(name, "focus", |w| w.lock().focus());
    }

    pub fn show(&self, name: Option<&str>) {
        self.with_window(name, "show", |w| w.lock().show());
    }

    pub fn hide(&self, name: Option<&str>) {
        self.with_window(name, "hide", |w| w.lock().hide());
    }

    pub fn minimize(&self, name: Option<&str>) {
        self.with_window(name, "minimize", |w| w.lock().minimize());
    }

    pub fn maximize(&self, name: Option<&str>) {
        self.with_window(name, "maximize", |w| w.lock().maximize());
    }

    pub fn restore(&self, name: Option<&str>) {
        self.with_window(name, "restore", |w| w.lock().restore());
    }

    /// Gracefully close every host window except the named one's, then
    /// focus it.
    ///
    /// Enumeration goes through the host, so host windows that were never
    /// registered here are closed too.
    pub fn close_all_except(&self, keep: &str) {
        let kept = self.get(keep).and_then(|window| window.lock().id());
        if kept.is_none() {
            tracing::warn!(
                target: "casement::manager",
                keep,
                "window to keep is not live, closing every host window"
            );
        }
        for id in self.ctx.host.window_ids() {
            if Some(id) != kept {
                self.ctx.host.close_window(id);
            }
        }
        self.focus_on(Some(keep));
    }

    // ========================================================================
    // Host events
    // ========================================================================

    /// Route a host-reported window event to the owning entity.
    pub fn handle_host_event(&self, id: HostWindowId, event: HostEvent) {
        let Some(window) = self.get_by_id(id) else {
            tracing::debug!(
                target: "casement::manager",
                id = id.0,
                ?event,
                "event for a window not managed here"
            );
            return;
        };
        match event {
            HostEvent::Closed => {
                let name = {
                    let mut window = window.lock();
                    window.handle_closed();
                    window.name().to_string()
                };
                self.windows.write().remove(&name);
            }
            HostEvent::LoadFailed => window.lock().down(),
            HostEvent::DomReady => window.lock().dom_ready.emit(()),
            HostEvent::FinishedLoad => window.lock().finished_load.emit(()),
        }
    }

    // ========================================================================
    // Templates and layouts
    // ========================================================================

    /// Register a setup template. First registration wins.
    pub fn set_template(&self, name: &str, fragment: Map<String, Value>) -> bool {
        self.ctx.templates.register(name, fragment)
    }

    /// Replace a setup template wholesale.
    pub fn replace_template(&self, name: &str, fragment: Map<String, Value>) {
        self.ctx.templates.replace(name, fragment);
    }

    /// Shallow-merge new keys into an existing template.
    pub fn modify_template(&self, name: &str, fragment: Map<String, Value>) -> bool {
        self.ctx.templates.modify(name, fragment)
    }

    pub fn get_template(&self, name: &str) -> Option<Map<String, Value>> {
        self.ctx.templates.get(name)
    }

    pub fn get_template_property(&self, name: &str, key: &str) -> Option<Value> {
        self.ctx.templates.get_prop(name, key)
    }

    /// Register a layout shell. First registration wins.
    pub fn register_layout(&self, name: &str, locator: &str) -> bool {
        let app_base = self.ctx.config.read().app_base().to_string();
        self.ctx.layouts.register(name, locator, &app_base)
    }

    /// Replace a layout shell locator.
    pub fn replace_layout(&self, name: &str, locator: &str) {
        let app_base = self.ctx.config.read().app_base().to_string();
        self.ctx.layouts.replace(name, locator, &app_base);
    }

    // ========================================================================
    // Shared data
    // ========================================================================

    pub fn set_data(&self, key: &str, value: Value) {
        self.ctx.shared.set(key, value);
    }

    pub fn get_data(&self, key: &str) -> Option<Value> {
        self.ctx.shared.get(key)
    }

    pub fn get_data_or(&self, key: &str, default: Value) -> Value {
        self.ctx.shared.get_or(key, default)
    }

    /// Watch a shared-data key; the callback fires once per write.
    pub fn watch_data<F>(&self, key: &str, callback: F) -> ConnectionId
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.ctx.shared.watch(key, callback)
    }

    pub fn unwatch_data(&self, key: &str, id: ConnectionId) {
        self.ctx.shared.unwatch(key, id);
    }
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("windows", &self.window_names())
            .finish_non_exhaustive()
    }
}
