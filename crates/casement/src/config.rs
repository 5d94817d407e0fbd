//! Window configuration: global defaults, per-window options, and the
//! layered merge that produces a window's effective setup.
//!
//! A window's configuration is assembled from strictly ordered layers,
//! later layers winning on conflict:
//!
//! 1. built-in defaults seeded at construction (`show: false`)
//! 2. the resolved setup template (merged *under* everything else, even
//!    though it is looked up late, inside `create()`)
//! 3. fields supplied at construction and accumulated via `set()` calls
//!
//! Typed fields the core interprets live directly on [`WindowOptions`];
//! anything else travels in the `extra` passthrough map and is forwarded
//! verbatim to the windowing host.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::geometry::Position;
use crate::host::{HostWindowOptions, LoadOptions};
use crate::window::Window;

/// Placeholder substituted with the application base path in content
/// locators.
pub const APP_BASE_TOKEN: &str = "{appBase}";

/// The built-in page shown by the default load-failure handler.
pub(crate) const LOAD_FAILURE_PAGE: &str = include_str!("../assets/load_failure.html");

/// Handler invoked when a window's content fails to load.
pub type LoadFailureHandler = Arc<dyn Fn(&Window) + Send + Sync>;

/// Process-wide configuration, initialized once during setup.
#[derive(Clone)]
pub struct GlobalConfig {
    /// Application base path; always stored with a trailing separator.
    app_base: String,
    /// Development mode: wires devtools/reload accelerators onto every
    /// created window.
    pub dev_mode: bool,
    /// Layout applied to windows that do not choose one themselves.
    pub default_layout: Option<String>,
    /// Setup template applied to windows that do not choose one.
    pub default_template: Option<String>,
    /// Title adopted by windows created without one.
    pub default_window_title: Option<String>,
    /// Prefix prepended to explicit window titles (only when no default
    /// window title is configured).
    pub windows_title_prefix: Option<String>,
    /// Global load-failure handler; the default loads a built-in failure
    /// page into the affected window.
    pub on_load_failure: LoadFailureHandler,
}

impl GlobalConfig {
    /// Create a configuration rooted at the given application base path.
    pub fn new(app_base: impl Into<String>) -> Self {
        Self {
            app_base: normalize_base(app_base.into()),
            dev_mode: false,
            default_layout: None,
            default_template: None,
            default_window_title: None,
            windows_title_prefix: None,
            on_load_failure: Arc::new(|window| {
                let _ = window.html(LOAD_FAILURE_PAGE, &LoadOptions::new());
            }),
        }
    }

    /// The application base path, guaranteed to end with a separator.
    pub fn app_base(&self) -> &str {
        &self.app_base
    }

    /// Replace the application base path.
    pub fn set_app_base(&mut self, app_base: impl Into<String>) {
        self.app_base = normalize_base(app_base.into());
    }

    /// Enable or disable development mode.
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Set the default layout name.
    pub fn with_default_layout(mut self, name: impl Into<String>) -> Self {
        self.default_layout = Some(name.into());
        self
    }

    /// Set the default setup template name.
    pub fn with_default_template(mut self, name: impl Into<String>) -> Self {
        self.default_template = Some(name.into());
        self
    }

    /// Set the default window title.
    pub fn with_default_window_title(mut self, title: impl Into<String>) -> Self {
        self.default_window_title = Some(title.into());
        self
    }

    /// Set the prefix prepended to explicit window titles.
    pub fn with_title_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.windows_title_prefix = Some(prefix.into());
        self
    }

    /// Replace the global load-failure handler.
    pub fn with_load_failure_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Window) + Send + Sync + 'static,
    {
        self.on_load_failure = Arc::new(handler);
        self
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self::new("./")
    }
}

impl fmt::Debug for GlobalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobalConfig")
            .field("app_base", &self.app_base)
            .field("dev_mode", &self.dev_mode)
            .field("default_layout", &self.default_layout)
            .field("default_template", &self.default_template)
            .field("default_window_title", &self.default_window_title)
            .field("windows_title_prefix", &self.windows_title_prefix)
            .finish_non_exhaustive()
    }
}

fn normalize_base(mut base: String) -> String {
    if !base.ends_with('/') {
        base.push('/');
    }
    base
}

/// Resolve a content locator against the application base path.
///
/// A leading `/` roots the locator at the app base; otherwise every
/// occurrence of [`APP_BASE_TOKEN`] is substituted. Anything else (remote
/// or already-absolute locators included) passes through unchanged.
pub fn resolve_locator(app_base: &str, locator: &str) -> String {
    if let Some(rest) = locator.strip_prefix('/') {
        format!("{app_base}{rest}")
    } else {
        locator.replace(APP_BASE_TOKEN, app_base)
    }
}

/// Parse a `"<width>x<height>"` dimension shorthand.
pub fn parse_dimensions(shorthand: &str) -> Option<(u32, u32)> {
    let (width, height) = shorthand.split_once('x')?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

/// Where a window should be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSpec {
    /// A named placement, resolved against the work area at create time.
    Named(Position),
    /// Explicit coordinates.
    Coords(i32, i32),
}

/// The window's setup-template choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateChoice {
    /// Use the named template.
    Named(String),
    /// Use no template, even if a global default exists.
    Disabled,
}

/// The window's layout choice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayoutChoice {
    /// Fall back to the global default layout, if any.
    #[default]
    Default,
    /// Use the named layout.
    Named(String),
    /// Force no layout, even if a global default exists.
    Disabled,
}

/// The window's menu. `Hidden` (an explicit "no menu") is distinct from
/// `Unset` (never configured).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MenuSpec {
    #[default]
    Unset,
    Hidden,
    Template(Value),
}

/// A window's effective configuration.
///
/// `Option` fields distinguish "never set" from an explicit value, which
/// is what lets the late template merge slot underneath accumulated
/// instance fields.
#[derive(Clone, Default)]
pub struct WindowOptions {
    pub title: Option<String>,
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub position: Option<PositionSpec>,
    pub resizable: Option<bool>,
    pub use_content_size: Option<bool>,
    pub center: Option<bool>,
    pub frame: Option<bool>,
    pub show: Option<bool>,
    pub show_dev_tools: Option<bool>,
    pub template: Option<TemplateChoice>,
    pub layout: LayoutChoice,
    pub menu: MenuSpec,
    /// Per-window load-failure override; wins over the global handler.
    pub on_load_failure: Option<LoadFailureHandler>,
    /// Opaque passthrough fields forwarded to the windowing host.
    pub extra: Map<String, Value>,
}

impl WindowOptions {
    /// Set a single configuration key from a dynamic value.
    ///
    /// Known keys land on the typed fields; unknown keys go into the
    /// passthrough map.
    pub fn set(&mut self, key: &str, value: Value) {
        self.apply_entry(key, &value);
    }

    /// Apply a configuration fragment, overwriting existing fields.
    pub fn apply_fragment(&mut self, fragment: &Map<String, Value>) {
        for (key, value) in fragment {
            self.apply_entry(key, value);
        }
    }

    /// Merge a fragment *underneath* the current fields: only keys not
    /// already set on this instance are taken.
    ///
    /// This is the template layer of the three-tier merge; instance
    /// fields accumulated before `create()` always win over it.
    pub fn merge_under(&mut self, fragment: &Map<String, Value>) {
        for (key, value) in fragment {
            if !self.is_set(key) {
                self.apply_entry(key, value);
            }
        }
    }

    fn is_set(&self, key: &str) -> bool {
        match key {
            "title" => self.title.is_some(),
            "url" => self.url.is_some(),
            "width" => self.width.is_some(),
            "height" => self.height.is_some(),
            "x" => self.x.is_some(),
            "y" => self.y.is_some(),
            "position" => self.position.is_some(),
            "resizable" => self.resizable.is_some(),
            "useContentSize" => self.use_content_size.is_some(),
            "center" => self.center.is_some(),
            "frame" => self.frame.is_some(),
            "show" => self.show.is_some(),
            "showDevTools" => self.show_dev_tools.is_some(),
            "setupTemplate" => self.template.is_some(),
            "layout" => self.layout != LayoutChoice::Default,
            "menu" => self.menu != MenuSpec::Unset,
            other => self.extra.contains_key(other),
        }
    }

    fn apply_entry(&mut self, key: &str, value: &Value) {
        match key {
            "title" => self.title = string_field(key, value),
            "url" => self.url = string_field(key, value),
            "width" => self.width = u32_field(key, value),
            "height" => self.height = u32_field(key, value),
            "x" => self.x = i32_field(key, value),
            "y" => self.y = i32_field(key, value),
            "position" => self.position = position_field(value),
            "resizable" => self.resizable = bool_field(key, value),
            "useContentSize" => self.use_content_size = bool_field(key, value),
            "center" => self.center = bool_field(key, value),
            "frame" => self.frame = bool_field(key, value),
            "show" => self.show = bool_field(key, value),
            "showDevTools" => self.show_dev_tools = bool_field(key, value),
            "setupTemplate" => {
                self.template = match value {
                    Value::Bool(false) => Some(TemplateChoice::Disabled),
                    Value::String(name) => Some(TemplateChoice::Named(name.clone())),
                    other => {
                        field_warning("setupTemplate", other);
                        self.template.take()
                    }
                }
            }
            "layout" => {
                self.layout = match value {
                    Value::Bool(false) => LayoutChoice::Disabled,
                    Value::String(name) => LayoutChoice::Named(name.clone()),
                    other => {
                        field_warning("layout", other);
                        LayoutChoice::Default
                    }
                }
            }
            "menu" => {
                self.menu = match value {
                    Value::Null => MenuSpec::Hidden,
                    other => MenuSpec::Template(other.clone()),
                }
            }
            other => {
                self.extra.insert(other.to_string(), value.clone());
            }
        }
    }

    /// Whether the window is drawn without a native frame.
    ///
    /// Hosts default to framed windows, so an unset `frame` counts as
    /// framed for placement compensation.
    pub fn frameless(&self) -> bool {
        !self.frame.unwrap_or(true)
    }

    /// Convert to the resolved options handed to the windowing host.
    pub fn to_host_options(&self) -> HostWindowOptions {
        HostWindowOptions {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            x: self.x,
            y: self.y,
            center: self.center.unwrap_or(false),
            resizable: self.resizable.unwrap_or(false),
            use_content_size: self.use_content_size.unwrap_or(true),
            frame: self.frame.unwrap_or(true),
            show: self.show.unwrap_or(false),
            extra: self.extra.clone(),
        }
    }
}

impl fmt::Debug for WindowOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowOptions")
            .field("title", &self.title)
            .field("url", &self.url)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("position", &self.position)
            .field("resizable", &self.resizable)
            .field("show", &self.show)
            .field("template", &self.template)
            .field("layout", &self.layout)
            .field("menu", &self.menu)
            .field("has_failure_override", &self.on_load_failure.is_some())
            .field("extra", &self.extra)
            .finish_non_exhaustive()
    }
}

fn string_field(key: &str, value: &Value) -> Option<String> {
    match value.as_str() {
        Some(s) => Some(s.to_string()),
        None => {
            field_warning(key, value);
            None
        }
    }
}

fn bool_field(key: &str, value: &Value) -> Option<bool> {
    match value.as_bool() {
        Some(b) => Some(b),
        None => {
            field_warning(key, value);
            None
        }
    }
}

fn u32_field(key: &str, value: &Value) -> Option<u32> {
    match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
        Some(n) => Some(n),
        None => {
            field_warning(key, value);
            None
        }
    }
}

fn i32_field(key: &str, value: &Value) -> Option<i32> {
    match value.as_i64().and_then(|n| i32::try_from(n).ok()) {
        Some(n) => Some(n),
        None => {
            field_warning(key, value);
            None
        }
    }
}

fn position_field(value: &Value) -> Option<PositionSpec> {
    match value {
        Value::String(name) => match Position::parse(name) {
            Some(position) => Some(PositionSpec::Named(position)),
            None => {
                tracing::warn!(
                    target: "casement::config",
                    position = %name,
                    "unrecognized position name, falling back to centering"
                );
                None
            }
        },
        Value::Array(items) if items.len() == 2 => {
            let coords = items[0]
                .as_i64()
                .and_then(|x| i32::try_from(x).ok())
                .zip(items[1].as_i64().and_then(|y| i32::try_from(y).ok()));
            match coords {
                Some((x, y)) => Some(PositionSpec::Coords(x, y)),
                None => {
                    field_warning("position", value);
                    None
                }
            }
        }
        other => {
            field_warning("position", other);
            None
        }
    }
}

fn field_warning(key: &str, value: &Value) {
    tracing::warn!(
        target: "casement::config",
        key,
        %value,
        "ignoring configuration value of unexpected shape"
    );
}

/// The setup argument accepted at window construction: either a
/// configuration fragment or a `"WxH"` dimension shorthand.
#[derive(Debug, Clone)]
pub enum Setup {
    Fragment(Map<String, Value>),
    Shorthand(String),
}

impl From<Map<String, Value>> for Setup {
    fn from(fragment: Map<String, Value>) -> Self {
        Self::Fragment(fragment)
    }
}

impl From<&str> for Setup {
    fn from(shorthand: &str) -> Self {
        Self::Shorthand(shorthand.to_string())
    }
}

/// Arguments for creating a named window.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub title: Option<String>,
    pub url: Option<String>,
    pub template: Option<String>,
    pub setup: Option<Setup>,
    pub show_dev_tools: bool,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn template(mut self, name: impl Into<String>) -> Self {
        self.template = Some(name.into());
        self
    }

    pub fn setup(mut self, setup: impl Into<Setup>) -> Self {
        self.setup = Some(setup.into());
        self
    }

    pub fn show_dev_tools(mut self, show: bool) -> Self {
        self.show_dev_tools = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_app_base_always_ends_with_separator() {
        let config = GlobalConfig::new("/opt/app");
        assert_eq!(config.app_base(), "/opt/app/");

        let config = GlobalConfig::new("/opt/app/");
        assert_eq!(config.app_base(), "/opt/app/");

        let mut config = GlobalConfig::default();
        config.set_app_base("/elsewhere");
        assert_eq!(config.app_base(), "/elsewhere/");
    }

    #[test]
    fn test_resolve_locator() {
        // Path-root marker prefixes the app base.
        assert_eq!(resolve_locator("/app/", "/pages/main.html"), "/app/pages/main.html");
        // Token substitution.
        assert_eq!(
            resolve_locator("/app/", "file://{appBase}views/a.html"),
            "file:///app/views/a.html"
        );
        // Remote locators pass through untouched.
        assert_eq!(
            resolve_locator("/app/", "https://example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("500x350"), Some((500, 350)));
        assert_eq!(parse_dimensions("500"), None);
        assert_eq!(parse_dimensions("wide x tall"), None);
    }

    #[test]
    fn test_apply_fragment_typed_and_passthrough() {
        let mut options = WindowOptions::default();
        options.apply_fragment(&fragment(json!({
            "title": "Main",
            "width": 640,
            "height": 480,
            "resizable": true,
            "position": "topRight",
            "alwaysOnTop": true,
            "webPreferences": { "nodeIntegration": false }
        })));

        assert_eq!(options.title.as_deref(), Some("Main"));
        assert_eq!(options.width, Some(640));
        assert_eq!(options.height, Some(480));
        assert_eq!(options.resizable, Some(true));
        assert_eq!(
            options.position,
            Some(PositionSpec::Named(Position::TopRight))
        );
        // Unknown keys are preserved for the host.
        assert_eq!(options.extra["alwaysOnTop"], json!(true));
        assert!(options.extra.contains_key("webPreferences"));
    }

    #[test]
    fn test_position_array_form() {
        let mut options = WindowOptions::default();
        options.set("position", json!([120, 40]));
        assert_eq!(options.position, Some(PositionSpec::Coords(120, 40)));
    }

    #[test]
    fn test_malformed_position_name_is_dropped() {
        let mut options = WindowOptions::default();
        options.set("position", json!("middle-ish"));
        assert_eq!(options.position, None);
    }

    #[test]
    fn test_out_of_range_numbers_are_dropped() {
        // Oversized values degrade with a diagnostic like any other
        // malformed field, never silently truncate.
        let mut options = WindowOptions::default();
        options.set("width", json!(1u64 << 33));
        options.set("height", json!(-300));
        options.set("x", json!(i64::MAX));
        options.set("position", json!([i64::MAX, 0]));

        assert_eq!(options.width, None);
        assert_eq!(options.height, None);
        assert_eq!(options.x, None);
        assert_eq!(options.position, None);

        options.set("width", json!(640));
        assert_eq!(options.width, Some(640));
    }

    #[test]
    fn test_layout_and_template_choices() {
        let mut options = WindowOptions::default();
        assert_eq!(options.layout, LayoutChoice::Default);

        options.set("layout", json!("main"));
        assert_eq!(options.layout, LayoutChoice::Named("main".to_string()));

        options.set("layout", json!(false));
        assert_eq!(options.layout, LayoutChoice::Disabled);

        options.set("setupTemplate", json!("compact"));
        assert_eq!(
            options.template,
            Some(TemplateChoice::Named("compact".to_string()))
        );

        options.set("setupTemplate", json!(false));
        assert_eq!(options.template, Some(TemplateChoice::Disabled));
    }

    #[test]
    fn test_menu_null_is_explicit_no_menu() {
        let mut options = WindowOptions::default();
        assert_eq!(options.menu, MenuSpec::Unset);

        options.set("menu", Value::Null);
        assert_eq!(options.menu, MenuSpec::Hidden);

        options.set("menu", json!([{ "label": "File" }]));
        assert!(matches!(options.menu, MenuSpec::Template(_)));
    }

    #[test]
    fn test_merge_under_never_overrides_instance_fields() {
        // Encodes the precedence table: template fields lose to fields
        // already accumulated on the instance.
        let mut options = WindowOptions::default();
        options.set("width", json!(500));
        options.set("show", json!(false));

        options.merge_under(&fragment(json!({
            "width": 400,
            "height": 300,
            "show": true,
            "badge": "from-template"
        })));

        assert_eq!(options.width, Some(500)); // instance wins
        assert_eq!(options.height, Some(300)); // template fills the gap
        assert_eq!(options.show, Some(false));
        assert_eq!(options.extra["badge"], json!("from-template"));
    }

    #[test]
    fn test_merge_under_is_layer_associative_for_disjoint_keys() {
        // Applying template then override equals pre-merged application
        // when keys do not conflict.
        let template = fragment(json!({ "width": 400 }));
        let override_frag = fragment(json!({ "height": 300 }));

        let mut split = WindowOptions::default();
        split.apply_fragment(&override_frag);
        split.merge_under(&template);

        let mut premerged_frag = template.clone();
        premerged_frag.extend(override_frag.clone());
        let mut premerged = WindowOptions::default();
        premerged.apply_fragment(&premerged_frag);

        assert_eq!(split.width, premerged.width);
        assert_eq!(split.height, premerged.height);
    }

    #[test]
    fn test_to_host_options_defaults() {
        let options = WindowOptions::default();
        let host = options.to_host_options();
        assert!(!host.show);
        assert!(!host.resizable);
        assert!(host.use_content_size);
        assert!(host.frame);
        assert!(!options.frameless());
    }
}
