//! Symbolic window placement.
//!
//! This module turns position names like `"topRight"` into absolute
//! coordinates relative to the primary display's work area. Resolution is
//! a pure function: no I/O, no caching, and callers recompute on every
//! placement request (creation and later `move_to` calls alike).
//!
//! Centering is never computed here. `Position::Center` resolves to
//! `None` because centering is the windowing host's native behavior.

/// Usable area of the primary display, excluding taskbars and docks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl WorkArea {
    /// Create a work area from its dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Margin between a window and the work-area edge it is placed against.
const POSITION_MARGIN: i32 = 0;

/// Horizontal inset applied to left-edge placements so the visible frame
/// lines up with the screen edge.
const LEFT_EDGE_INSET: i32 = 8;

// Frame compensation constants, applied to the dimensions used for layout
// math only (never to the window's requested size) when the window is
// drawn with a native frame. Values are empirical.
const FRAME_EDGE: u32 = 8;
const FRAME_HEADER: u32 = 50;
const FRAME_TOP: u32 = 13;

/// A named placement on the work area.
///
/// Parsed from the position names accepted in window setup; each corner
/// has two equivalent spellings (`topLeft`/`leftTop`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Center,
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    /// Parse a position name.
    ///
    /// Returns `None` for unrecognized names; the caller falls back to
    /// centering.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "center" => Some(Self::Center),
            "top" => Some(Self::Top),
            "right" => Some(Self::Right),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "topLeft" | "leftTop" => Some(Self::TopLeft),
            "topRight" | "rightTop" => Some(Self::TopRight),
            "bottomRight" | "rightBottom" => Some(Self::BottomRight),
            "bottomLeft" | "leftBottom" => Some(Self::BottomLeft),
            _ => None,
        }
    }
}

/// Resolve a placement into absolute `(x, y)` coordinates.
///
/// Returns `None` when the caller should fall back to the host's native
/// centering: for `Position::Center`, or when either dimension is
/// missing.
///
/// When `frameless` is false, fixed compensation amounts are added to the
/// dimensions used for the math so the visible window lands where the
/// name says, accounting for the native frame and header.
pub fn resolve(
    position: Position,
    width: Option<u32>,
    height: Option<u32>,
    frameless: bool,
    work_area: WorkArea,
) -> Option<(i32, i32)> {
    let (Some(width), Some(height)) = (width, height) else {
        tracing::warn!(
            target: "casement::geometry",
            ?position,
            "cannot position a window without width and height"
        );
        return None;
    };

    if position == Position::Center {
        return None;
    }

    let (mut w, mut h) = (width, height);
    if !frameless {
        match position {
            Position::Left => {}
            Position::Right => w += FRAME_EDGE,
            Position::Top => w += FRAME_TOP,
            Position::Bottom => {
                h += FRAME_HEADER;
                w += FRAME_TOP;
            }
            Position::TopLeft | Position::BottomLeft => h += FRAME_HEADER,
            Position::TopRight | Position::BottomRight => {
                w += FRAME_EDGE;
                h += FRAME_HEADER;
            }
            Position::Center => unreachable!(),
        }
    }

    let (sw, sh) = (work_area.width as i32, work_area.height as i32);
    let (w, h) = (w as i32, h as i32);

    let centered_x = (sw - w).div_euclid(2);
    let centered_y = (sh - h).div_euclid(2);
    let far_x = sw - w - POSITION_MARGIN;
    let far_y = sh - h - POSITION_MARGIN;
    let near_left = POSITION_MARGIN - LEFT_EDGE_INSET;

    let (x, y) = match position {
        Position::Left => (near_left, centered_y),
        Position::Right => (far_x, centered_y),
        Position::Top => (centered_x, POSITION_MARGIN),
        Position::Bottom => (centered_x, far_y),
        Position::TopLeft => (near_left, POSITION_MARGIN),
        Position::TopRight => (far_x, POSITION_MARGIN),
        Position::BottomLeft => (near_left, far_y),
        Position::BottomRight => (far_x, far_y),
        Position::Center => unreachable!(),
    };

    Some((x, y))
}
