//! The window entity and its lifecycle.
//!
//! A [`Window`] starts as pure configuration: fields accumulate through
//! the constructor and [`Window::set`] calls while no host window exists.
//! [`Window::create`] resolves the configuration (template merge, title
//! derivation, placement, host defaults) and instantiates the host
//! window; from then on display and content operations act on the live
//! handle. Closing or destroying the window drops the handle, and every
//! handle-requiring operation afterwards reports [`Error::NotLive`].
//!
//! Content loading is where the pieces meet: locators are resolved
//! against the app base, local loads are composed through the window's
//! layout, and a failed fetch diverts into the load-failure path exactly
//! once, with nothing partial ever reaching the host.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use casement_core::{ConnectionId, Signal};

use crate::config::{
    LayoutChoice, MenuSpec, PositionSpec, TemplateChoice, WindowOptions, resolve_locator,
};
use crate::config::{CreateOptions, Setup, parse_dimensions};
use crate::error::{Error, Result};
use crate::geometry::{self, Position};
use crate::host::{Bounds, HostWindow, HostWindowId, LoadOptions};
use crate::layout;
use crate::manager::Context;
use crate::shortcuts::{DEV_TOOLS_ACCELERATOR, RELOAD_ACCELERATOR};

/// A window shared between the manager, host-event routing, and shortcut
/// callbacks.
pub type SharedWindow = Arc<Mutex<Window>>;

/// Wrap a window for sharing, wiring its internal back-reference.
pub(crate) fn into_shared(window: Window) -> SharedWindow {
    let shared = Arc::new(Mutex::new(window));
    shared.lock().self_ref = Arc::downgrade(&shared);
    shared
}

/// A managed window: accumulated configuration plus, once created, the
/// live host handle.
pub struct Window {
    name: String,
    /// Effective configuration. Mutable until `create()` resolves it;
    /// afterwards it records what the window was created with.
    pub options: WindowOptions,
    handle: Option<Box<dyn HostWindow>>,
    ctx: Arc<Context>,
    pub(crate) self_ref: Weak<Mutex<Window>>,
    /// Monotonic load counter; composed loads only land if no newer load
    /// superseded them.
    load_generation: u64,

    /// Emitted after the host window closed and the handle was dropped.
    pub closed: Signal<()>,
    /// Emitted when a content load fails, before the failure handler runs.
    pub load_failed: Signal<()>,
    /// Emitted when the content's DOM finished parsing.
    pub dom_ready: Signal<()>,
    /// Emitted when the content finished loading completely.
    pub finished_load: Signal<()>,
}

impl Window {
    pub(crate) fn new(name: String, ctx: Arc<Context>, create: CreateOptions) -> Self {
        let mut options = WindowOptions::default();
        // Seeded before anything else so no template can force an early
        // show; visibility is decided by open().
        options.show = Some(false);

        match create.setup {
            Some(Setup::Fragment(fragment)) => options.apply_fragment(&fragment),
            Some(Setup::Shorthand(shorthand)) => match parse_dimensions(&shorthand) {
                Some((width, height)) => {
                    options.width = Some(width);
                    options.height = Some(height);
                }
                None => tracing::warn!(
                    target: "casement::window",
                    name,
                    shorthand,
                    "ignoring malformed dimension shorthand"
                ),
            },
            None => {}
        }

        if let Some(title) = create.title {
            options.title = Some(title);
        }
        if let Some(url) = create.url {
            options.url = Some(url);
        }
        if let Some(template) = create.template {
            options.template = Some(TemplateChoice::Named(template));
        }
        if create.show_dev_tools {
            options.show_dev_tools = Some(true);
        }

        Self {
            name,
            options,
            handle: None,
            ctx,
            self_ref: Weak::new(),
            load_generation: 0,
            closed: Signal::new(),
            load_failed: Signal::new(),
            dom_ready: Signal::new(),
            finished_load: Signal::new(),
        }
    }

    /// The name this window is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a live host window backs this entity.
    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    /// The host identity of the live window, if any.
    pub fn id(&self) -> Option<HostWindowId> {
        self.handle.as_ref().map(|handle| handle.id())
    }

    fn live(&self) -> Result<&dyn HostWindow> {
        self.handle
            .as_deref()
            .ok_or_else(|| Error::not_live(&self.name))
    }

    // ========================================================================
    // Configuration (valid before and after creation)
    // ========================================================================

    /// Set a single configuration key.
    pub fn set(&mut self, key: &str, value: Value) {
        self.options.set(key, value);
    }

    /// Apply a configuration fragment, overwriting existing fields.
    pub fn apply(&mut self, fragment: &Map<String, Value>) {
        self.options.apply_fragment(fragment);
    }

    /// Choose the layout future loads compose through.
    pub fn use_layout(&mut self, name: &str) {
        self.options.layout = LayoutChoice::Named(name.to_string());
    }

    /// Opt out of layout composition, including any global default.
    pub fn disable_layout(&mut self) {
        self.options.layout = LayoutChoice::Disabled;
    }

    /// Choose the setup template merged in at create time.
    pub fn apply_setup_template(&mut self, name: &str) {
        self.options.template = Some(TemplateChoice::Named(name.to_string()));
    }

    /// Set the content locator loaded at create time.
    pub fn set_url(&mut self, url: &str) {
        self.options.url = Some(url.to_string());
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Resolve the accumulated configuration and instantiate the host
    /// window.
    ///
    /// Resolution order: merge the setup template underneath instance
    /// fields, derive the title, resolve symbolic placement, apply host
    /// defaults, then create. Content referenced by `url` is loaded
    /// immediately after creation.
    pub fn create(&mut self) -> Result<()> {
        if self.handle.is_some() {
            tracing::debug!(
                target: "casement::window",
                name = %self.name,
                "create() on a live window is a no-op"
            );
            return Ok(());
        }

        let config = self.ctx.config.read().clone();

        // Template layer: merged under everything accumulated so far.
        let choice = self.options.template.clone().or_else(|| {
            config
                .default_template
                .clone()
                .map(TemplateChoice::Named)
        });
        if let Some(TemplateChoice::Named(template)) = choice {
            match self.ctx.templates.get(&template) {
                Some(fragment) => self.options.merge_under(&fragment),
                None => tracing::warn!(
                    target: "casement::window",
                    name = %self.name,
                    template,
                    "setup template not registered, proceeding without it"
                ),
            }
        }

        // Title derivation.
        if let Some(default) = &config.default_window_title {
            if self.options.title.is_none() {
                self.options.title = Some(default.clone());
            }
        } else if let (Some(prefix), Some(title)) =
            (&config.windows_title_prefix, &self.options.title)
        {
            self.options.title = Some(format!("{prefix}{title}"));
        }

        // Placement.
        match self.options.position {
            Some(PositionSpec::Coords(x, y)) => {
                self.options.x = Some(x);
                self.options.y = Some(y);
            }
            Some(PositionSpec::Named(position)) => {
                if let Some((x, y)) = geometry::resolve(
                    position,
                    self.options.width,
                    self.options.height,
                    self.options.frameless(),
                    self.ctx.host.work_area(),
                ) {
                    self.options.x = Some(x);
                    self.options.y = Some(y);
                }
            }
            None => {}
        }

        // Host defaults: fixed-size content windows unless asked otherwise,
        // centered when no placement produced coordinates.
        self.options.resizable.get_or_insert(false);
        self.options.use_content_size.get_or_insert(true);
        if self.options.x.is_none() || self.options.y.is_none() {
            self.options.center = Some(true);
        }

        let host_options = self.options.to_host_options();
        let handle = self
            .ctx
            .host
            .create_window(&host_options)
            .map_err(|message| Error::host_creation(&self.name, message))?;
        tracing::info!(
            target: "casement::window",
            name = %self.name,
            id = handle.id().0,
            "window created"
        );
        self.handle = Some(handle);

        match &self.options.menu {
            MenuSpec::Unset => {}
            MenuSpec::Hidden => self.live()?.set_menu(None),
            MenuSpec::Template(template) => self.live()?.set_menu(Some(template)),
        }

        if let Some(url) = self.options.url.clone() {
            self.load_url(&url, &LoadOptions::new())?;
        }

        // Backfill dimensions from the host so later symbolic moves have
        // something to work with.
        if let Some(handle) = &self.handle {
            let bounds = handle.bounds();
            self.options.width.get_or_insert(bounds.width);
            self.options.height.get_or_insert(bounds.height);
        }

        if self.options.show_dev_tools == Some(true) {
            self.live()?.toggle_dev_tools(false);
        }

        if config.dev_mode {
            self.wire_dev_shortcuts();
        }

        Ok(())
    }

    /// Create the window if needed and bring it to the front.
    ///
    /// A live window is focused instead. Returns whether a new host
    /// window was created. `hide` suppresses the show after creation.
    pub fn open(&mut self, hide: bool) -> Result<bool> {
        if self.handle.is_some() {
            self.focus()?;
            return Ok(false);
        }
        self.create()?;
        if !hide {
            self.live()?.show();
        }
        Ok(true)
    }

    /// Close the live window gracefully. The handle is dropped when the
    /// host reports the close back.
    pub fn close(&self) -> Result<()> {
        self.live()?.close();
        Ok(())
    }

    /// Tear the host window down immediately and drop the handle.
    pub fn destroy(&mut self) -> Result<()> {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| Error::not_live(&self.name))?;
        handle.destroy();
        tracing::info!(target: "casement::window", name = %self.name, "window destroyed");
        Ok(())
    }

    /// Invoked when the host reports the window closed.
    pub(crate) fn handle_closed(&mut self) {
        self.handle = None;
        tracing::info!(target: "casement::window", name = %self.name, "window closed");
        self.closed.emit(());
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Load a content locator into the live window.
    ///
    /// The locator is resolved against the app base. Local loads compose
    /// through the window's effective layout (its own choice, else the
    /// global default); remote (`http…`) locators and layout-less windows
    /// load directly. When the layout shell or the page body cannot be
    /// fetched, the load diverts into the failure path and nothing
    /// partial reaches the host.
    pub fn load_url(&mut self, locator: &str, options: &LoadOptions) -> Result<()> {
        if self.handle.is_none() {
            return Err(Error::not_live(&self.name));
        }

        self.load_generation += 1;
        let generation = self.load_generation;

        let (app_base, default_layout) = {
            let config = self.ctx.config.read();
            (config.app_base().to_string(), config.default_layout.clone())
        };
        let resolved = resolve_locator(&app_base, locator);

        let layout_name = match &self.options.layout {
            LayoutChoice::Disabled => None,
            LayoutChoice::Named(name) => Some(name.clone()),
            LayoutChoice::Default => default_layout,
        };
        let shell_locator = match &layout_name {
            Some(name) => {
                let found = self.ctx.layouts.get(name);
                if found.is_none() {
                    tracing::warn!(
                        target: "casement::window",
                        name = %self.name,
                        layout = %name,
                        "layout not registered, loading without it"
                    );
                }
                found
            }
            None => None,
        };

        let Some(shell_locator) = shell_locator else {
            self.live()?.load_url(&resolved, options);
            return Ok(());
        };

        if is_remote(&resolved) {
            // Remote content cannot be spliced into a local shell.
            self.live()?.load_url(&resolved, options);
            return Ok(());
        }

        let shell = self.ctx.fetcher.fetch(&shell_locator);
        let body = self.ctx.fetcher.fetch(&resolved);
        match (shell, body) {
            (Ok(shell), Ok(body)) => {
                let document = layout::compose(&shell, &body, &app_base);
                self.complete_composed_load(generation, &document, options);
                Ok(())
            }
            (shell, body) => {
                if let Err(error) = &shell {
                    tracing::error!(
                        target: "casement::window",
                        name = %self.name,
                        locator = %shell_locator,
                        %error,
                        "failed to fetch layout shell"
                    );
                }
                if let Err(error) = &body {
                    tracing::error!(
                        target: "casement::window",
                        name = %self.name,
                        locator = %resolved,
                        %error,
                        "failed to fetch page content"
                    );
                }
                self.down();
                Ok(())
            }
        }
    }

    /// Land a composed document, unless a newer load superseded this one
    /// or the window is no longer live.
    pub(crate) fn complete_composed_load(
        &mut self,
        generation: u64,
        document: &str,
        options: &LoadOptions,
    ) {
        if generation != self.load_generation {
            tracing::debug!(
                target: "casement::window",
                name = %self.name,
                generation,
                current = self.load_generation,
                "discarding superseded load"
            );
            return;
        }
        if let Some(handle) = &self.handle {
            handle.load_html(document, options);
        }
    }

    /// Load inline content directly, bypassing locator resolution and
    /// layout composition.
    pub fn html(&self, html: &str, options: &LoadOptions) -> Result<()> {
        self.live()?.load_html(html, options);
        Ok(())
    }

    /// Divert into the load-failure path.
    ///
    /// Layout composition is switched off first so the failure content
    /// renders bare, then the window's failure handler (or the global
    /// one) runs exactly once for this failure.
    pub fn down(&mut self) {
        tracing::warn!(target: "casement::window", name = %self.name, "content load failed");
        self.options.layout = LayoutChoice::Disabled;
        let handler = self
            .options
            .on_load_failure
            .clone()
            .unwrap_or_else(|| self.ctx.config.read().on_load_failure.clone());
        self.load_failed.emit(());
        handler(&*self);
    }

    /// The locator of the currently loaded content.
    pub fn current_url(&self) -> Result<String> {
        Ok(self.live()?.current_url())
    }

    /// Reload the current content, optionally bypassing caches.
    pub fn reload(&self, ignore_cache: bool) -> Result<()> {
        let handle = self.live()?;
        if ignore_cache {
            handle.reload_ignoring_cache();
        } else {
            handle.reload();
        }
        Ok(())
    }

    /// Execute a script inside the window's content.
    pub fn execute(&self, script: &str) -> Result<()> {
        self.live()?.execute(script);
        Ok(())
    }

    /// Navigate back, if there is anywhere to go back to.
    pub fn go_back(&self) -> Result<()> {
        let handle = self.live()?;
        if handle.can_go_back() {
            handle.go_back();
        }
        Ok(())
    }

    /// Run a callback when content is ready. `wait_for_dom` fires on DOM
    /// readiness; otherwise on load completion.
    pub fn on_ready<F>(&self, wait_for_dom: bool, callback: F) -> ConnectionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        if wait_for_dom {
            self.dom_ready.connect(move |_| callback())
        } else {
            self.finished_load.connect(move |_| callback())
        }
    }

    // ========================================================================
    // Display
    // ========================================================================

    pub fn show(&self) -> Result<()> {
        self.live()?.show();
        Ok(())
    }

    pub fn hide(&self) -> Result<()> {
        self.live()?.hide();
        Ok(())
    }

    pub fn focus(&self) -> Result<()> {
        self.live()?.focus();
        Ok(())
    }

    pub fn minimize(&self) -> Result<()> {
        self.live()?.minimize();
        Ok(())
    }

    /// Maximize the window, or restore it when already maximized.
    pub fn maximize(&self) -> Result<()> {
        let handle = self.live()?;
        if handle.is_maximized() {
            handle.restore();
        } else {
            handle.maximize();
        }
        Ok(())
    }

    pub fn restore(&self) -> Result<()> {
        self.live()?.restore();
        Ok(())
    }

    /// Move to a named placement, keeping the current size.
    pub fn move_to_position(&self, position: Position) -> Result<()> {
        let handle = self.live()?;
        let bounds = handle.bounds();
        if let Some((x, y)) = geometry::resolve(
            position,
            self.options.width.or(Some(bounds.width)),
            self.options.height.or(Some(bounds.height)),
            self.options.frameless(),
            self.ctx.host.work_area(),
        ) {
            handle.set_bounds(Bounds { x, y, ..bounds });
        }
        Ok(())
    }

    /// Move to explicit coordinates, keeping the current size.
    pub fn move_to(&self, x: i32, y: i32) -> Result<()> {
        let handle = self.live()?;
        let bounds = handle.bounds();
        handle.set_bounds(Bounds { x, y, ..bounds });
        Ok(())
    }

    /// Resize in place.
    pub fn resize(&self, width: u32, height: u32) -> Result<()> {
        let handle = self.live()?;
        let bounds = handle.bounds();
        handle.set_bounds(Bounds {
            width,
            height,
            ..bounds
        });
        Ok(())
    }

    /// Toggle developer tooling for the window's content.
    pub fn toggle_dev_tools(&self, detached: bool) -> Result<()> {
        self.live()?.toggle_dev_tools(detached);
        Ok(())
    }

    // ========================================================================
    // Shortcuts
    // ========================================================================

    /// Register an accelerator scoped to this window.
    ///
    /// The callback receives the window itself, locked for the duration
    /// of the call.
    pub fn register_shortcut<F>(&self, accelerator: &str, callback: F) -> Result<()>
    where
        F: Fn(&Window) + Send + Sync + 'static,
    {
        let registrar = self
            .ctx
            .shortcuts
            .as_deref()
            .ok_or(Error::NoShortcutRegistrar)?;
        let id = self.live()?.id();
        let weak = self.self_ref.clone();
        registrar.register(
            id,
            accelerator,
            Box::new(move || {
                if let Some(window) = weak.upgrade() {
                    callback(&window.lock());
                }
            }),
        );
        Ok(())
    }

    fn wire_dev_shortcuts(&self) {
        let Some(registrar) = self.ctx.shortcuts.as_deref() else {
            tracing::debug!(
                target: "casement::window",
                name = %self.name,
                "dev mode active but no shortcut registrar configured"
            );
            return;
        };
        let Ok(handle) = self.live() else { return };
        let id = handle.id();

        let weak = self.self_ref.clone();
        registrar.register(
            id,
            DEV_TOOLS_ACCELERATOR,
            Box::new(move || {
                if let Some(window) = weak.upgrade() {
                    let _ = window.lock().toggle_dev_tools(false);
                }
            }),
        );

        let weak = self.self_ref.clone();
        registrar.register(
            id,
            RELOAD_ACCELERATOR,
            Box::new(move || {
                if let Some(window) = weak.upgrade() {
                    let _ = window.lock().reload(false);
                }
            }),
        );
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("name", &self.name)
            .field("live", &self.is_live())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn is_remote(locator: &str) -> bool {
    locator.starts_with("http")
}
