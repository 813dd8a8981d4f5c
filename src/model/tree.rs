//! N-ary tree arena with payloads.
//!
//! Backed by a [`SlotMap`]; structure is kept as first/last-child plus
//! sibling links so reparenting is O(1). One `Tree` holds the nodes of a
//! single pass and is dropped wholesale when that pass ends, so nodes are
//! never reclaimed individually except through [`Tree::remove_subtree`].

use std::ops::{Index, IndexMut};

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Key of a node somewhere in the tree.
    pub struct NodeId;
}

pub struct Tree<T> {
    map: SlotMap<NodeId, Node<T>>,
}

struct Node<T> {
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    value: T,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Node {
            parent: None,
            prev_sibling: None,
            next_sibling: None,
            first_child: None,
            last_child: None,
            value,
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self { Tree { map: SlotMap::default() } }
}

impl<T> Tree<T> {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    pub fn contains(&self, id: NodeId) -> bool { self.map.contains_key(id) }

    /// Inserts a new detached node (a root until attached).
    pub fn insert(&mut self, value: T) -> NodeId { self.map.insert(Node::new(value)) }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.map.get(id).and_then(|n| n.parent)
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.map.get(id).and_then(|n| n.first_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.map.get(id).and_then(|n| n.next_sibling)
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.map.get(id).and_then(|n| n.prev_sibling)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.map.get(id).map(|n| n.first_child.is_none()).unwrap_or(true)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        ChildIterator {
            cur: self.map.get(id).and_then(|n| n.first_child),
            tree: self,
        }
    }

    pub fn child_count(&self, id: NodeId) -> usize { self.children(id).count() }

    /// Post-order traversal of the subtree rooted at `id`, `id` last.
    pub fn postorder(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        PostorderTraversal::new(self, id)
    }

    /// Ancestors of `id`, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = Some(id);
        std::iter::from_fn(move || {
            let node = next;
            next = node.and_then(|n| self.parent(n));
            node
        })
    }

    /// Attaches a detached node as the last child of `parent`.
    #[track_caller]
    pub fn push_back(&mut self, parent: NodeId, child: NodeId) {
        assert_ne!(parent, child, "node cannot be its own parent");
        debug_assert!(
            self.map[child].parent.is_none(),
            "push_back called on attached node {child:?}"
        );
        debug_assert!(
            !self.ancestors(parent).any(|a| a == child),
            "push_back would create a cycle at {child:?}"
        );
        let prev = {
            let parent_node = &mut self.map[parent];
            parent_node.first_child.get_or_insert(child);
            parent_node.last_child.replace(child)
        };
        self.map[child].parent = Some(parent);
        if let Some(prev) = prev {
            self.map[child].prev_sibling = Some(prev);
            self.map[prev].next_sibling = Some(child);
        }
    }

    /// Attaches a detached node immediately before `sibling`.
    #[track_caller]
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        let parent = self.map[sibling].parent.expect("cannot make a sibling of a root node");
        debug_assert!(self.map[node].parent.is_none());
        let prev = self.map[sibling].prev_sibling;
        self.map[node].parent = Some(parent);
        self.map[node].next_sibling = Some(sibling);
        self.map[node].prev_sibling = prev;
        self.map[sibling].prev_sibling = Some(node);
        match prev {
            Some(prev) => self.map[prev].next_sibling = Some(node),
            None => self.map[parent].first_child = Some(node),
        }
    }

    /// Unlinks `id` from its parent and siblings; the node becomes a
    /// detached root and keeps its own subtree.
    pub fn detach(&mut self, id: NodeId) {
        let Some((parent, prev, next)) =
            self.map.get(id).map(|n| (n.parent, n.prev_sibling, n.next_sibling))
        else {
            return;
        };
        if let Some(prev) = prev {
            self.map[prev].next_sibling = next;
        }
        if let Some(next) = next {
            self.map[next].prev_sibling = prev;
        }
        if let Some(parent) = parent {
            let parent_node = &mut self.map[parent];
            if parent_node.first_child == Some(id) {
                parent_node.first_child = next;
            }
            if parent_node.last_child == Some(id) {
                parent_node.last_child = prev;
            }
        }
        let node = &mut self.map[id];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Detaches `id` and removes it together with all of its descendants.
    pub fn remove_subtree(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.map.remove(cur) {
                let mut child = node.first_child;
                while let Some(c) = child {
                    stack.push(c);
                    child = self.map.get(c).and_then(|n| n.next_sibling);
                }
            }
        }
    }
}

impl<T> Index<NodeId> for Tree<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T { &self.map[id].value }
}

impl<T> IndexMut<NodeId> for Tree<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T { &mut self.map[id].value }
}

struct ChildIterator<'a, T> {
    cur: Option<NodeId>,
    tree: &'a Tree<T>,
}

impl<'a, T> Iterator for ChildIterator<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cur?;
        self.cur = self.tree.map.get(id).and_then(|n| n.next_sibling);
        Some(id)
    }
}

struct PostorderTraversal<'a, T> {
    cur: Option<NodeId>,
    top: NodeId,
    tree: &'a Tree<T>,
}

impl<'a, T> PostorderTraversal<'a, T> {
    fn new(tree: &'a Tree<T>, root: NodeId) -> Self {
        Self {
            top: root,
            cur: Some(Self::descend_left(root, tree)),
            tree,
        }
    }

    fn descend_left(mut node: NodeId, tree: &Tree<T>) -> NodeId {
        while let Some(child) = tree.first_child(node) {
            node = child;
        }
        node
    }
}

impl<'a, T> Iterator for PostorderTraversal<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = None;
        if node != self.top {
            if let Some(next) = self.tree.next_sibling(node) {
                self.cur = Some(Self::descend_left(next, self.tree));
            } else {
                self.cur = self.tree.parent(node);
            }
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A tree with the following structure:
    /// ```text
    ///        __root__
    ///       /    |   \
    ///    "c1"  "c2"  "c3"
    ///            |
    ///          "gc1"
    /// ```
    struct TestTree {
        tree: Tree<&'static str>,
        root: NodeId,
        c1: NodeId,
        c2: NodeId,
        c3: NodeId,
        gc1: NodeId,
    }

    impl TestTree {
        fn new() -> Self {
            let mut tree = Tree::new();
            let root = tree.insert("root");
            let c1 = tree.insert("c1");
            let c2 = tree.insert("c2");
            let c3 = tree.insert("c3");
            let gc1 = tree.insert("gc1");
            tree.push_back(root, c1);
            tree.push_back(root, c2);
            tree.push_back(root, c3);
            tree.push_back(c2, gc1);
            TestTree { tree, root, c1, c2, c3, gc1 }
        }

        fn children_of(&self, id: NodeId) -> Vec<NodeId> {
            self.tree.children(id).collect()
        }
    }

    #[test]
    fn child_iteration() {
        let t = TestTree::new();
        assert_eq!(vec![t.c1, t.c2, t.c3], t.children_of(t.root));
        assert!(t.children_of(t.c1).is_empty());
        assert_eq!(vec![t.gc1], t.children_of(t.c2));
    }

    #[test]
    fn payload_access() {
        let mut t = TestTree::new();
        assert_eq!("c2", t.tree[t.c2]);
        t.tree[t.c2] = "renamed";
        assert_eq!("renamed", t.tree[t.c2]);
    }

    #[test]
    fn ancestors_start_at_self() {
        let t = TestTree::new();
        let chain: Vec<NodeId> = t.tree.ancestors(t.gc1).collect();
        assert_eq!(vec![t.gc1, t.c2, t.root], chain);
    }

    #[test]
    fn postorder_visits_root_last() {
        let t = TestTree::new();
        let order: Vec<NodeId> = t.tree.postorder(t.root).collect();
        assert_eq!(vec![t.c1, t.gc1, t.c2, t.c3, t.root], order);
    }

    #[test]
    fn detach_keeps_subtree() {
        let mut t = TestTree::new();
        t.tree.detach(t.c2);
        assert_eq!(vec![t.c1, t.c3], t.children_of(t.root));
        assert_eq!(None, t.tree.parent(t.c2));
        assert_eq!(vec![t.gc1], t.children_of(t.c2));
    }

    #[test]
    fn detach_and_reattach_elsewhere() {
        let mut t = TestTree::new();
        t.tree.detach(t.c1);
        t.tree.push_back(t.c2, t.c1);
        assert_eq!(vec![t.c2, t.c3], t.children_of(t.root));
        assert_eq!(vec![t.gc1, t.c1], t.children_of(t.c2));
    }

    #[test]
    fn insert_before_updates_first_child() {
        let mut t = TestTree::new();
        let c0 = t.tree.insert("c0");
        t.tree.insert_before(t.c1, c0);
        assert_eq!(vec![c0, t.c1, t.c2, t.c3], t.children_of(t.root));
        let c1_5 = t.tree.insert("c1.5");
        t.tree.insert_before(t.c2, c1_5);
        assert_eq!(vec![c0, t.c1, c1_5, t.c2, t.c3], t.children_of(t.root));
    }

    #[test]
    fn remove_subtree_removes_descendants() {
        let mut t = TestTree::new();
        t.tree.remove_subtree(t.c2);
        assert_eq!(vec![t.c1, t.c3], t.children_of(t.root));
        assert!(!t.tree.contains(t.c2));
        assert!(!t.tree.contains(t.gc1));
        assert_eq!(3, t.tree.len());
    }

    #[test]
    fn leaf_queries() {
        let t = TestTree::new();
        assert!(!t.tree.is_leaf(t.root));
        assert!(t.tree.is_leaf(t.c1));
        assert!(!t.tree.is_leaf(t.c2));
        assert!(t.tree.is_leaf(t.gc1));
    }

    #[test]
    #[should_panic(expected = "cycle")]
    fn push_back_rejects_cycles() {
        let mut t = TestTree::new();
        t.tree.detach(t.root);
        t.tree.push_back(t.gc1, t.root);
    }
}
