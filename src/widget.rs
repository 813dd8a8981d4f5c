//! The capability surface the fit pass requires from the surrounding
//! toolkit.
//!
//! The engine never owns widgets. It sees them as opaque [`WidgetId`]s and
//! reaches their geometry through a [`WidgetHost`], which the toolkit
//! implements over its real widget tree. Everything here is synchronous and
//! single-threaded; the host is borrowed mutably for the duration of one
//! pass and nothing else touches widget frames while it runs.

use serde::{Deserialize, Serialize};

use crate::geometry::{Orientation, Rect};

/// Opaque handle to a real widget, issued by the host toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub u32);

impl WidgetId {
    pub fn new(raw: u32) -> Self { WidgetId(raw) }
}

impl std::fmt::Display for WidgetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// Geometry and policy callbacks for one top-level window's widget tree.
///
/// Only `children`, `frame`, `set_frame`, and `window_frame` are required;
/// the defaults for the policy hooks reproduce the stock toolkit behavior.
pub trait WidgetHost {
    /// Immediate children of `container`, in construction order. The order
    /// must be stable across calls within one pass.
    fn children(&self, container: WidgetId) -> Vec<WidgetId>;

    /// Bounding rectangle in global window coordinates.
    fn frame(&self, id: WidgetId) -> Rect;

    fn set_frame(&mut self, id: WidgetId, frame: Rect);

    /// Frame of the top-level window this tree belongs to.
    fn window_frame(&self) -> Rect;

    /// Smallest extent along `axis` at which the widget's content is not
    /// clipped. Defaults to the current aperture size, i.e. "already fits".
    fn min_content_size(&self, id: WidgetId, axis: Orientation) -> i32 {
        self.frame(id).size.along(axis)
    }

    /// Whether the widget takes part in the fit pass at all. An excluded
    /// widget is invisible to discovery: it is never grouped and never
    /// blocks a match. The default includes anything intersecting the
    /// top-level window.
    fn include_in_layout(&self, id: WidgetId) -> bool {
        self.frame(id).intersects(self.window_frame())
    }

    /// Whether the widget may absorb surplus growth. Non-elastic widgets
    /// keep their size when a sibling compartment grows.
    fn is_elastic(&self, _id: WidgetId) -> bool { true }

    /// Whether the widget is itself a container that runs its own fit pass.
    /// Used only by [`Engine::run_tree`](crate::engine::Engine::run_tree)
    /// to order passes bottom-up.
    fn is_container(&self, _id: WidgetId) -> bool { false }

    /// Called once per pass on every widget whose frame grew, after all
    /// frames are final, so the widget can reflow its own internals. Must
    /// not start another fit pass.
    fn content_area_resized(&mut self, _id: WidgetId, _dw: i32, _dh: i32) {}

    fn set_size(&mut self, id: WidgetId, width: i32, height: i32) {
        let frame = self.frame(id);
        self.set_frame(id, Rect::new(frame.left(), frame.top(), width, height));
    }

    fn place(&mut self, id: WidgetId, x: i32, y: i32) {
        let frame = self.frame(id);
        self.set_frame(id, Rect::new(x, y, frame.size.width, frame.size.height));
    }

    fn shift(&mut self, id: WidgetId, dx: i32, dy: i32) {
        let frame = self.frame(id);
        self.set_frame(id, frame.translated(dx, dy));
    }
}
