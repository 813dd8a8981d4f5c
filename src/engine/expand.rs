//! Size propagation: growing a discovered cell tree until no widget's
//! content is clipped.
//!
//! Two walks. Bottom-up, every cell reports the smallest extent that fits
//! its content; top-down, the root's growth is paid out to children, in
//! stacking order for cells stacked along the expansion axis and as the
//! same absolute delta for cells stacked across it. Widgets only ever
//! grow; a tree whose root already fits is left bit-identical.

use tracing::{debug, trace};

use super::cell::CellTree;
use crate::geometry::Orientation;
use crate::model::tree::NodeId;
use crate::widget::WidgetHost;

/// Grows the tree under `root` along `axis` and pushes the new frames out
/// to the real widgets. Returns the applied delta (zero if everything
/// already fits).
pub fn expand(
    tree: &mut CellTree,
    host: &mut impl WidgetHost,
    root: NodeId,
    axis: Orientation,
) -> i32 {
    let required = required_size(tree, host, root, axis);
    let current = tree[root].frame.size.along(axis);
    let delta = required - current;
    if delta <= 0 {
        trace!(?axis, required, current, "content already fits");
        return 0;
    }
    debug!(?axis, required, current, delta, "expanding");
    apply(tree, host, root, required, axis);
    delta
}

/// Smallest extent along `axis` at which no content under `id` is clipped.
/// Never smaller than the extent the designer already allocated.
pub fn required_size(
    tree: &CellTree,
    host: &impl WidgetHost,
    id: NodeId,
    axis: Orientation,
) -> i32 {
    let cell = &tree[id];
    let current = cell.frame.size.along(axis);
    if let Some(widget) = cell.widget {
        return host.min_content_size(widget, axis).max(current);
    }
    let dir = cell.dir.expect("group cell without direction");
    let required = if dir == axis {
        tree.children(id)
            .map(|c| required_size(tree, host, c, axis) + tree[c].gap_before)
            .sum()
    } else {
        tree.children(id)
            .map(|c| required_size(tree, host, c, axis))
            .max()
            .unwrap_or(current)
    };
    required.max(current)
}

/// Gives the subtree under `id` a final extent of `target` along `axis`,
/// repositioning and resizing descendants and their widgets.
fn apply(tree: &mut CellTree, host: &mut impl WidgetHost, id: NodeId, target: i32, axis: Orientation) {
    let frame = tree[id].frame;
    let current = frame.size.along(axis);
    let delta = target - current;
    debug_assert!(delta >= 0, "expansion tried to shrink a cell");

    if let Some(widget) = tree[id].widget {
        if delta > 0 {
            let grown = frame.with_len(axis, target);
            tree[id].frame = grown;
            host.set_frame(widget, grown);
            let (dw, dh) = match axis {
                Orientation::Horizontal => (delta, 0),
                Orientation::Vertical => (0, delta),
            };
            host.content_area_resized(widget, dw, dh);
        }
        return;
    }

    let dir = tree[id].dir.expect("group cell without direction");
    let children: Vec<NodeId> = tree.children(id).collect();

    if dir == axis {
        apply_stacked(tree, host, id, &children, target, axis);
    } else {
        apply_across(tree, host, id, &children, target, delta, axis);
    }
    tree[id].frame = frame.with_len(axis, target);
}

/// Children are stacked along the expansion axis: every child gets its own
/// required extent, surplus is split among the elastic ones, and designed
/// gaps are re-applied between them.
fn apply_stacked(
    tree: &mut CellTree,
    host: &mut impl WidgetHost,
    group: NodeId,
    children: &[NodeId],
    target: i32,
    axis: Orientation,
) {
    let needs: Vec<i32> =
        children.iter().map(|&c| required_size(tree, host, c, axis)).collect();
    let gaps: Vec<i32> = children.iter().map(|&c| tree[c].gap_before).collect();
    let total: i32 = needs.iter().sum::<i32>() + gaps.iter().sum::<i32>();
    let surplus = (target - total).max(0);

    let mut elastic: Vec<bool> =
        children.iter().map(|&c| is_elastic(tree, host, c)).collect();
    if !elastic.iter().any(|&e| e) {
        // No designated compartment: everyone absorbs.
        elastic.iter_mut().for_each(|e| *e = true);
    }
    let elastic_count = elastic.iter().filter(|&&e| e).count() as i32;
    let share = surplus / elastic_count;
    let mut remainder = surplus - share * elastic_count;

    let mut cursor = tree[group].frame.span(axis).lo;
    for ((&child, &need), (&gap, &stretchy)) in
        children.iter().zip(&needs).zip(gaps.iter().zip(&elastic))
    {
        cursor += gap;
        let mut child_target = need;
        if stretchy {
            child_target += share;
            if remainder > 0 {
                child_target += 1;
                remainder -= 1;
            }
        }
        let shift = cursor - tree[child].frame.span(axis).lo;
        if shift != 0 {
            shift_subtree(tree, host, child, shift, axis);
        }
        apply(tree, host, child, child_target, axis);
        cursor += child_target;
    }
}

/// Children are stacked across the expansion axis: the group's extent here
/// is the cross dimension, so every child receives the same absolute delta
/// and keeps its anchored alignment inside the grown extent.
fn apply_across(
    tree: &mut CellTree,
    host: &mut impl WidgetHost,
    group: NodeId,
    children: &[NodeId],
    target: i32,
    delta: i32,
    axis: Orientation,
) {
    let group_lo = tree[group].frame.span(axis).lo;
    for &child in children {
        let child_frame = tree[child].frame;
        let need = required_size(tree, host, child, axis);
        let child_target = need.max(child_frame.size.along(axis) + delta);

        let slack = (target - child_target).max(0);
        let anchor = tree[child].anchor;
        let new_lo = group_lo + (anchor * slack as f32).round() as i32;
        let shift = new_lo - child_frame.span(axis).lo;
        if shift != 0 {
            shift_subtree(tree, host, child, shift, axis);
        }
        apply(tree, host, child, child_target, axis);
    }
}

fn is_elastic(tree: &CellTree, host: &impl WidgetHost, id: NodeId) -> bool {
    match tree[id].widget {
        Some(widget) => host.is_elastic(widget),
        None => tree.children(id).any(|c| is_elastic(tree, host, c)),
    }
}

/// Translates a whole subtree, cells and widgets alike, along `axis`.
fn shift_subtree(
    tree: &mut CellTree,
    host: &mut impl WidgetHost,
    id: NodeId,
    amount: i32,
    axis: Orientation,
) {
    let (dx, dy) = match axis {
        Orientation::Horizontal => (amount, 0),
        Orientation::Vertical => (0, amount),
    };
    let nodes: Vec<NodeId> = tree.postorder(id).collect();
    for node in nodes {
        tree[node].frame = tree[node].frame.translated(dx, dy);
        if let Some(widget) = tree[node].widget {
            host.shift(widget, dx, dy);
        }
    }
}
