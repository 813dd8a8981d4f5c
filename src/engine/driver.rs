//! Pass orchestration.
//!
//! One [`Engine::run`] per top-level window, scheduled by the toolkit as a
//! one-shot deferred task right after the window's construction code has
//! placed all children and before the window is first shown. The engine
//! runs the horizontal pass to completion, then the vertical pass over the
//! already-adjusted rectangles, and applies each resulting delta to the
//! container itself. Discovery failure on an axis is not an error to the
//! caller: that axis simply keeps its designed sizes.

use tracing::{debug, warn};

use super::cell::{self, CellTree};
use super::discover::{DiscoveryError, discover};
use super::expand::expand;
use crate::common::config::Settings;
use crate::geometry::{Orientation, Rect};
use crate::widget::{WidgetHost, WidgetId};

pub struct Engine {
    settings: Settings,
}

/// Net growth applied to a container by one run.
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FitReport {
    pub dw: i32,
    pub dh: i32,
}

impl Engine {
    pub fn new(settings: Settings) -> Self { Engine { settings } }

    /// Fits `container`'s immediate children and grows the container by
    /// the resulting deltas.
    pub fn run(&self, host: &mut impl WidgetHost, container: WidgetId) -> FitReport {
        let dw = self.run_axis(host, container, Orientation::Horizontal);
        if self.settings.debug.horizontal_only {
            debug!(%container, "vertical pass skipped (horizontal_only)");
            return FitReport { dw, dh: 0 };
        }
        let dh = self.run_axis(host, container, Orientation::Vertical);
        FitReport { dw, dh }
    }

    /// Runs fit passes over `container` and every nested container,
    /// bottom-up, so a parent's discovery only ever sees each child
    /// container's final footprint.
    pub fn run_tree(&self, host: &mut impl WidgetHost, container: WidgetId) -> FitReport {
        for child in host.children(container) {
            if host.is_container(child) {
                let _ = self.run_tree(host, child);
            }
        }
        self.run(host, container)
    }

    fn run_axis(&self, host: &mut impl WidgetHost, container: WidgetId, axis: Orientation) -> i32 {
        let children: Vec<(WidgetId, Rect)> = host
            .children(container)
            .into_iter()
            .filter(|&c| host.include_in_layout(c))
            .map(|c| (c, host.frame(c)))
            .collect();
        if children.is_empty() {
            return 0;
        }

        // The cell tree lives exactly as long as this pass.
        let mut tree = CellTree::new();
        match discover(&mut tree, &children, axis, &self.settings.limits) {
            Ok(root) => {
                if self.settings.debug.dump_cells {
                    debug!(%container, ?axis, "cell tree:\n{}", cell::dump(&tree, root));
                }
                let delta = expand(&mut tree, host, root, axis);
                // The container grows only as far as the expanded covering
                // actually overflows it. A child container grown by its own
                // earlier pass is picked up here the same way.
                let frame = host.frame(container);
                let overflow =
                    (tree[root].frame.span(axis).hi - frame.span(axis).hi).max(0);
                if overflow > 0 {
                    let grown = frame.with_len(axis, frame.size.along(axis) + overflow);
                    host.set_frame(container, grown);
                    debug!(%container, ?axis, delta, overflow, "container grown");
                }
                overflow
            }
            Err(err) => {
                if let DiscoveryError::Unresolved { roots, .. } = &err {
                    warn!(%container, ?axis, ?roots, "{err}");
                } else {
                    warn!(%container, ?axis, "{err}");
                }
                0
            }
        }
    }
}
