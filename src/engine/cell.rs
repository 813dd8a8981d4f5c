//! Cells: the synthetic grouping nodes produced by discovery.
//!
//! A cell either wraps exactly one real widget (a leaf) or an ordered run
//! of child cells along one axis (a group). A full tree of cells is built
//! from scratch by every discovery pass and dropped with the pass; no cell
//! survives into the next invocation.

use crate::geometry::{Orientation, Rect};
use crate::model::tree::{NodeId, Tree};
use crate::widget::WidgetId;

pub type CellTree = Tree<Cell>;

#[derive(Clone, Debug)]
pub struct Cell {
    /// The wrapped real widget. Mutually exclusive with having children.
    pub widget: Option<WidgetId>,
    /// Stacking axis of a group's children. `None` for leaves.
    pub dir: Option<Orientation>,
    /// Whether this group arose from identical-extent matching rather than
    /// mere overlap.
    pub exact: bool,
    /// Covering rectangle, in global coordinates.
    pub frame: Rect,
    /// Designed gap between this cell and its previous sibling along the
    /// parent's stacking axis. Zero for first children and for roots.
    pub gap_before: i32,
    /// Cross-axis anchor inside the parent: 0 leading edge, 1 trailing
    /// edge, 0.5 centerline. Meaningless when the cell fills the parent.
    pub anchor: f32,
}

impl Cell {
    pub fn leaf(widget: WidgetId, frame: Rect) -> Cell {
        Cell {
            widget: Some(widget),
            dir: None,
            exact: false,
            frame,
            gap_before: 0,
            anchor: 0.0,
        }
    }

    pub fn group(dir: Orientation, exact: bool) -> Cell {
        Cell {
            widget: None,
            dir: Some(dir),
            exact,
            frame: Rect::default(),
            gap_before: 0,
            anchor: 0.0,
        }
    }

    pub fn is_leaf(&self) -> bool { self.widget.is_some() }
}

/// Recomputes a group's covering frame and its children's gap and anchor
/// metrics. Must be called after the group's child list changes.
pub fn refresh_group(tree: &mut CellTree, group: NodeId) {
    let Some(dir) = tree[group].dir else { return };
    let children: Vec<NodeId> = tree.children(group).collect();
    let mut frame: Option<Rect> = None;
    for &child in &children {
        let cf = tree[child].frame;
        frame = Some(frame.map_or(cf, |f| f.union(cf)));
    }
    let Some(frame) = frame else { return };
    tree[group].frame = frame;

    let cross = dir.cross();
    let group_cross = frame.span(cross);
    let mut prev_hi: Option<i32> = None;
    for &child in &children {
        let along = tree[child].frame.span(dir);
        let gap = prev_hi.map_or(0, |hi| (along.lo - hi).max(0));
        prev_hi = Some(along.hi);

        let child_cross = tree[child].frame.span(cross);
        let slack = group_cross.len() - child_cross.len();
        let anchor = if slack > 0 {
            (child_cross.lo - group_cross.lo) as f32 / slack as f32
        } else {
            0.0
        };

        let cell = &mut tree[child];
        cell.gap_before = gap;
        cell.anchor = anchor.clamp(0.0, 1.0);
    }
}

/// All real widgets reachable from `root`, in leaf order.
pub fn leaf_widgets(tree: &CellTree, root: NodeId) -> Vec<WidgetId> {
    tree.postorder(root).filter_map(|id| tree[id].widget).collect()
}

/// Renders the cell tree for the diagnostic log.
pub fn dump(tree: &CellTree, root: NodeId) -> String {
    let rendered = to_ascii(tree, root);
    let mut out = String::new();
    let _ = ascii_tree::write_tree(&mut out, &rendered);
    out
}

fn to_ascii(tree: &CellTree, id: NodeId) -> ascii_tree::Tree {
    let cell = &tree[id];
    let f = cell.frame;
    let desc = match cell.widget {
        Some(w) => format!(
            "{w} ({},{}) {}x{}",
            f.left(),
            f.top(),
            f.size.width,
            f.size.height
        ),
        None => format!(
            "{:?}{} ({},{}) {}x{}",
            cell.dir.expect("group cell without direction"),
            if cell.exact { "" } else { " ~" },
            f.left(),
            f.top(),
            f.size.width,
            f.size.height
        ),
    };
    if tree.is_leaf(id) {
        ascii_tree::Tree::Leaf(vec![desc])
    } else {
        let children = tree.children(id).map(|c| to_ascii(tree, c)).collect();
        ascii_tree::Tree::Node(desc, children)
    }
}
