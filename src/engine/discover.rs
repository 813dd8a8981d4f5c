//! Layout discovery: recovering the row/column structure a form designer
//! built out of absolute rectangles.
//!
//! Nothing in the input records the intended grouping. The discoverer
//! reverse-engineers it by repeatedly merging items that align along the
//! current merge axis, starting with byte-identical extents and falling
//! back to plain overlap once exact matching stops making progress. The
//! pass succeeds when the working list collapses to a single cell; a list
//! that refuses to collapse means the widget set cannot be explained as
//! one nested table, and the caller leaves that axis alone.

use thiserror::Error;
use tracing::{debug, trace};

use super::cell::{self, Cell, CellTree};
use crate::common::collections::HashSet;
use crate::common::config::LimitSettings;
use crate::geometry::{Orientation, Rect, Span};
use crate::model::tree::NodeId;
use crate::widget::WidgetId;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The widget set cannot be reduced to a single nested table. The
    /// covering rectangles of the surviving groups are kept for diagnosis.
    #[error("{axis:?} discovery left {} unmerged groups", roots.len())]
    Unresolved { axis: Orientation, roots: Vec<Rect> },
    /// Defensive cap against malformed geometry; does not occur in valid
    /// layouts.
    #[error("{axis:?} discovery exceeded {limit} iterations")]
    IterationLimit { axis: Orientation, limit: usize },
}

/// Builds a cell tree over `widgets` for one expansion axis.
///
/// `widgets` must already be filtered to the ones taking part in the pass;
/// excluded widgets are invisible here and never block a match. On success
/// the returned root covers every input widget exactly once.
pub fn discover(
    tree: &mut CellTree,
    widgets: &[(WidgetId, Rect)],
    axis: Orientation,
    limits: &LimitSettings,
) -> Result<NodeId, DiscoveryError> {
    let mut items: Vec<NodeId> = widgets
        .iter()
        .map(|&(id, frame)| tree.insert(Cell::leaf(id, frame)))
        .collect();

    // Merging starts orthogonal to the expansion axis: grouping rows first
    // requires knowing which widgets share a column extent, and vice versa.
    let mut dir = axis.cross();
    let mut exact = true;
    let mut first = true;
    let mut stalls = 0;
    let mut iterations = 0;

    while items.len() > 1 {
        if iterations >= limits.max_iterations {
            return Err(DiscoveryError::IterationLimit {
                axis,
                limit: limits.max_iterations,
            });
        }
        iterations += 1;

        if !exact {
            // Closer items must merge first or the encroachment rule below
            // would be evaluated against the wrong neighbors. Stable, so
            // ties keep the caller's child order.
            items.sort_by_key(|&id| tree[id].frame.span(dir).lo);
        }

        let before = items.len();
        items = merge_round(tree, items, dir, exact, first);
        first = false;
        trace!(?axis, ?dir, exact, before, after = items.len(), "merge round");

        if items.len() < before {
            stalls = 0;
        } else {
            stalls += 1;
            if stalls >= limits.stall_limit {
                if exact {
                    // Exact matching is spent; retry the whole remainder
                    // with overlap matching, from the orthogonal axis.
                    exact = false;
                    stalls = 0;
                    dir = axis.cross();
                    continue;
                }
                break;
            }
        }
        dir = dir.cross();
    }

    match items.as_slice() {
        &[root] => {
            let root = if tree[root].is_leaf() {
                let group = tree.insert(Cell::group(axis, true));
                tree.push_back(group, root);
                cell::refresh_group(tree, group);
                group
            } else {
                root
            };
            debug_assert!(
                {
                    let mut found = cell::leaf_widgets(tree, root);
                    let mut given: Vec<WidgetId> = widgets.iter().map(|&(id, _)| id).collect();
                    found.sort();
                    given.sort();
                    found == given
                },
                "discovery lost or duplicated a widget"
            );
            debug!(?axis, iterations, widgets = widgets.len(), "discovery resolved");
            Ok(root)
        }
        rest => Err(DiscoveryError::Unresolved {
            axis,
            roots: rest.iter().map(|&id| tree[id].frame).collect(),
        }),
    }
}

/// One pass over the working list: each item in turn claims every other
/// item aligned with it along `dir.cross()` into a new group cell.
fn merge_round(
    tree: &mut CellTree,
    items: Vec<NodeId>,
    dir: Orientation,
    exact: bool,
    first: bool,
) -> Vec<NodeId> {
    let match_axis = dir.cross();
    let mut out: Vec<NodeId> = Vec::with_capacity(items.len());
    let mut consumed: HashSet<NodeId> = HashSet::default();
    let mut pending: std::collections::VecDeque<NodeId> = items.iter().copied().collect();

    while let Some(target) = pending.pop_front() {
        let target_span = tree[target].frame.span(match_axis);
        let mut matched: Vec<NodeId> = Vec::new();

        if exact {
            for &cand in &pending {
                if tree[cand].frame.span(match_axis) == target_span {
                    matched.push(cand);
                }
            }
            // Identical alignment across a gap occupied by something else
            // is not a real table relationship. Skipped on the very first
            // merge attempt only.
            if !matched.is_empty() && !first {
                trim_blocked(tree, &items, &consumed, target, &mut matched, dir, match_axis);
            }
        } else {
            let mut cover = tree[target].frame;
            let mut members: HashSet<NodeId> = HashSet::default();
            members.insert(target);
            for &cand in &pending {
                if !tree[cand].frame.span(match_axis).overlaps(target_span) {
                    continue;
                }
                let trial = cover.union(tree[cand].frame);
                members.insert(cand);
                if encroaches(tree, &items, &consumed, &members, trial) {
                    members.remove(&cand);
                    continue;
                }
                matched.push(cand);
                cover = trial;
            }
        }

        if matched.is_empty() {
            out.push(target);
            continue;
        }

        pending.retain(|id| !matched.contains(id));
        consumed.insert(target);
        consumed.extend(matched.iter().copied());

        let mut members = matched;
        members.push(target);
        members.sort_by_key(|&id| tree[id].frame.span(dir).lo);

        let group = tree.insert(Cell::group(dir, exact));
        for &member in &members {
            tree.push_back(group, member);
        }
        if !exact {
            flatten_same_direction(tree, group);
        }
        cell::refresh_group(tree, group);
        trace!(
            ?dir,
            exact,
            members = members.len(),
            frame = ?tree[group].frame,
            "grouped"
        );
        out.push(group);
    }

    out
}

/// Trims exact matches separated from `target` by an intervening unmatched
/// item. The nearest overlapping item entirely before `target` along `dir`
/// and the nearest one entirely after bound the open interval a match must
/// fall inside.
fn trim_blocked(
    tree: &CellTree,
    items: &[NodeId],
    consumed: &HashSet<NodeId>,
    target: NodeId,
    matched: &mut Vec<NodeId>,
    dir: Orientation,
    match_axis: Orientation,
) {
    let target_cross = tree[target].frame.span(match_axis);
    let target_along = tree[target].frame.span(dir);
    let mut min_blocker: Option<Span> = None;
    let mut max_blocker: Option<Span> = None;

    for &id in items {
        if id == target || consumed.contains(&id) || matched.contains(&id) {
            continue;
        }
        let frame = tree[id].frame;
        if !frame.span(match_axis).overlaps(target_cross) {
            continue;
        }
        let along = frame.span(dir);
        if along.precedes(target_along) {
            if min_blocker.is_none_or(|b| along.hi > b.hi) {
                min_blocker = Some(along);
            }
        } else if along.follows(target_along)
            && max_blocker.is_none_or(|b| along.lo < b.lo)
        {
            max_blocker = Some(along);
        }
    }

    if min_blocker.is_none() && max_blocker.is_none() {
        return;
    }
    matched.retain(|&m| {
        let along = tree[m].frame.span(dir);
        let clear_before = min_blocker.is_none_or(|b| along.lo >= b.hi);
        let clear_after = max_blocker.is_none_or(|b| along.hi <= b.lo);
        let keep = clear_before && clear_after;
        if !keep {
            trace!(?dir, blocked = ?tree[m].frame, "match discarded behind blocker");
        }
        keep
    });
}

/// True if `cover` would intrude on any item of this round that is not part
/// of the group being formed.
fn encroaches(
    tree: &CellTree,
    items: &[NodeId],
    consumed: &HashSet<NodeId>,
    members: &HashSet<NodeId>,
    cover: Rect,
) -> bool {
    items.iter().any(|&id| {
        !members.contains(&id) && !consumed.contains(&id) && cover.intersects(tree[id].frame)
    })
}

/// Splices the grandchildren of same-direction inexact children into
/// `group`, one level deep. Two nested inexact runs of the same
/// orientation carry no more structure than one.
fn flatten_same_direction(tree: &mut CellTree, group: NodeId) {
    let dir = tree[group].dir;
    let children: Vec<NodeId> = tree.children(group).collect();
    for child in children {
        let cell = &tree[child];
        if cell.is_leaf() || cell.exact || cell.dir != dir {
            continue;
        }
        let grandchildren: Vec<NodeId> = tree.children(child).collect();
        for gc in grandchildren {
            tree.detach(gc);
            tree.insert_before(child, gc);
        }
        tree.remove_subtree(child);
    }
}
