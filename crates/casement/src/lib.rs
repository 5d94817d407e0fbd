//! Casement orchestrates the lifecycle of named application windows over
//! an abstract windowing host.
//!
//! The host itself (the thing that actually puts pixels on screen) is
//! behind the [`WindowHost`] and [`HostWindow`] traits; Casement supplies
//! everything around it:
//!
//! - **Named windows** with a configure-then-create lifecycle: a
//!   [`Window`] accumulates configuration while dormant, resolves it on
//!   [`Window::create`], and exposes display/content operations while
//!   live.
//! - **Configuration layering**: reusable setup templates merge
//!   underneath per-window fields, with global defaults (title, layout,
//!   template) filling the remaining gaps.
//! - **Symbolic placement**: position names like `"topRight"` resolve to
//!   work-area coordinates, with frame compensation for framed windows.
//! - **Layout composition**: local page content is spliced into a shared
//!   HTML shell before it reaches the host, and failed fetches divert
//!   into a configurable load-failure path.
//! - **Shared data** with per-key watchers, and typed per-window event
//!   signals (closed, load failure, readiness).
//!
//! The [`WindowManager`] ties it together: it owns the window registry,
//! the template/layout registries, and the injected collaborators, and
//! routes host-reported events back to the owning window.

pub mod config;
pub mod error;
pub mod fetch;
pub mod geometry;
pub mod host;
pub mod layout;
pub mod manager;
pub mod shortcuts;
pub mod template;
pub mod window;

pub use config::{
    APP_BASE_TOKEN, CreateOptions, GlobalConfig, LayoutChoice, LoadFailureHandler, MenuSpec,
    PositionSpec, Setup, TemplateChoice, WindowOptions, parse_dimensions, resolve_locator,
};
pub use error::{Error, Result};
pub use fetch::{ContentFetcher, FsFetcher};
pub use geometry::{Position, WorkArea};
pub use host::{
    Bounds, HostEvent, HostWindow, HostWindowId, HostWindowOptions, LoadOptions, WindowHost,
};
pub use layout::{CONTENT_TOKEN, LayoutRegistry, compose};
pub use manager::WindowManager;
pub use shortcuts::{DEV_TOOLS_ACCELERATOR, RELOAD_ACCELERATOR, ShortcutRegistrar};
pub use template::TemplateRegistry;
pub use window::{SharedWindow, Window};

pub use casement_core::{ConnectionId, SharedStore, Signal};
