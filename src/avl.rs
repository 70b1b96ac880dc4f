//! A height-balanced (AVL) binary search tree of ranked, labelled members
//!
//! Nodes own their children outright (`Option<Box<Node>>`), so every mutation takes a subtree
//! by value and hands back the subtree that replaces it. Rotations move boxes around without
//! copying members.
//!
//! ## Behaviour worth knowing
//!
//! - **Insert never overwrites**: inserting a rank that is already present leaves the existing
//!   label in place. Every node passed on the way down (including the matching one) still
//!   emits a [`Event::Welcomed`].
//! - **Two-child removal copies the successor up**: the in-order successor's rank and label
//!   replace the departing member, and the successor's old node is then removed silently.
//! - **Tie-break**: when the heavy child is itself balanced, the single rotation is preferred
//!   over the double one.

use std::cmp::{max, Ordering};

use tracing::{debug, instrument, trace};

use crate::event::{Event, Member, Mutation, Rotation};
use crate::rank::Rank;

/// Allowed height difference between the two subtrees of any node
const IMBALANCE_LIMIT: i32 = 1;

pub(crate) type Link = Option<Box<Node>>;

/// A member of the hierarchy
pub(crate) struct Node {
    pub(crate) key: Rank,
    pub(crate) label: String,
    pub(crate) height: i32,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    fn new(key: Rank, label: String) -> Self {
        Node {
            key,
            label,
            height: 0,
            left: None,
            right: None,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Existing children, left before right
    pub(crate) fn children(&self) -> impl Iterator<Item = &Node> {
        self.left.as_deref().into_iter().chain(self.right.as_deref())
    }

    pub(crate) fn to_member(&self) -> Member {
        Member::new(self.label.clone(), self.key)
    }

    fn update_height(&mut self) {
        self.height = max(height(&self.left), height(&self.right)) + 1;
    }
}

/// Height of a possibly absent subtree; an absent subtree has height -1
fn height(link: &Link) -> i32 {
    link.as_ref().map_or(-1, |n| n.height)
}

/// An AVL tree keyed by [`Rank`]
///
/// Differences from a general-purpose ordered map:
/// 1. Mutations report what happened to the members as a [`Mutation`] instead of returning
///    the previous value
/// 2. Duplicate inserts keep the original label
/// 3. The structural queries (ancestor, depth, division) live in their own modules and
///    walk the same nodes
#[derive(Default)]
pub struct AvlTree {
    pub(crate) root: Link,
    size: usize,
}

impl AvlTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        AvlTree {
            root: None,
            size: 0,
        }
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Height of the whole tree: -1 when empty, 0 for a lone root
    pub fn height(&self) -> i32 {
        height(&self.root)
    }

    pub fn contains(&self, key: impl Into<Rank>) -> bool {
        self.get(key).is_some()
    }

    /// The label stored under `key`, if any
    pub fn get(&self, key: impl Into<Rank>) -> Option<&str> {
        let key = key.into();
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.label),
            };
        }
        None
    }

    /// The member at the root, if the tree is not empty
    pub fn root(&self) -> Option<Member> {
        self.root.as_deref().map(Node::to_member)
    }

    /// In-order (ascending rank) iterator over `(rank, label)`
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_edge(self.root.as_deref());
        iter
    }

    /// Insert a member, welcoming it at every node passed on the way down
    ///
    /// A rank that is already present is left untouched (label included); the returned
    /// mutation then reports `applied() == false`.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, key: impl Into<Rank>, label: impl Into<String>) -> Mutation {
        let (key, label) = (key.into(), label.into());
        trace!(%key, %label, "insert");
        let mut mutation = Mutation::default();
        let root = Self::insert_node(self.root.take(), key, label, &mut mutation);
        self.root = Some(root);
        if mutation.applied {
            self.size += 1;
        }
        mutation
    }

    /// Remove the member holding `key`
    ///
    /// Removing an absent rank changes nothing and emits nothing.
    #[instrument(level = "trace", skip_all)]
    pub fn remove(&mut self, key: impl Into<Rank>) -> Mutation {
        let key = key.into();
        trace!(%key, "remove");
        let mut mutation = Mutation::default();
        self.root = Self::remove_node(self.root.take(), key, true, &mut mutation);
        if mutation.applied {
            self.size -= 1;
        }
        mutation
    }

    /// Remove every member
    pub fn clear(&mut self) {
        self.root = None;
        self.size = 0;
    }

    fn insert_node(link: Link, key: Rank, label: String, mutation: &mut Mutation) -> Box<Node> {
        let mut node = match link {
            None => {
                mutation.applied = true;
                return Box::new(Node::new(key, label));
            }
            Some(node) => node,
        };
        // every member passed on the way down welcomes the newcomer
        Self::emit(
            mutation,
            Event::Welcomed {
                ancestor: node.label.clone(),
                newcomer: label.clone(),
            },
        );

        match key.cmp(&node.key) {
            Ordering::Less => {
                node.left = Some(Self::insert_node(node.left.take(), key, label, mutation));
            }
            Ordering::Greater => {
                node.right = Some(Self::insert_node(node.right.take(), key, label, mutation));
            }
            Ordering::Equal => {} // Key already exists, do nothing
        }
        Self::balance(node, mutation)
    }

    // `notify` is false while deleting the successor that was copied up into a two-child node
    fn remove_node(link: Link, key: Rank, notify: bool, mutation: &mut Mutation) -> Link {
        let mut node = link?;
        match key.cmp(&node.key) {
            Ordering::Less => {
                node.left = Self::remove_node(node.left.take(), key, notify, mutation);
            }
            Ordering::Greater => {
                node.right = Self::remove_node(node.right.take(), key, notify, mutation);
            }
            Ordering::Equal => {
                mutation.applied = true;
                match (node.left.take(), node.right.take()) {
                    (Some(left), Some(right)) => {
                        let successor = leftmost(&right);
                        let (successor_key, successor_label) =
                            (successor.key, successor.label.clone());
                        debug!(departing = %node.label, successor = %successor_label, "two-child removal");
                        if notify {
                            Self::emit(
                                mutation,
                                Event::Replaced {
                                    departing: node.label.clone(),
                                    replacement: Some(successor_label.clone()),
                                },
                            );
                        }
                        node.key = successor_key;
                        node.label = successor_label;
                        node.left = Some(left);
                        node.right = Self::remove_node(Some(right), successor_key, false, mutation);
                    }
                    (Some(child), None) | (None, Some(child)) => {
                        if notify {
                            Self::emit(
                                mutation,
                                Event::Replaced {
                                    departing: std::mem::take(&mut node.label),
                                    replacement: Some(child.label.clone()),
                                },
                            );
                        }
                        return Some(Self::balance(child, mutation));
                    }
                    (None, None) => {
                        if notify {
                            Self::emit(
                                mutation,
                                Event::Replaced {
                                    departing: std::mem::take(&mut node.label),
                                    replacement: None,
                                },
                            );
                        }
                        return None;
                    }
                }
            }
        }
        Some(Self::balance(node, mutation))
    }

    fn emit(mutation: &mut Mutation, event: Event) {
        trace!(?event, "emit");
        mutation.events.push(event);
    }

    // Restore the balance bound at `node`, whose subtrees are already balanced
    fn balance(node: Box<Node>, mutation: &mut Mutation) -> Box<Node> {
        let difference = height(&node.left) - height(&node.right);
        let mut node = if difference > IMBALANCE_LIMIT {
            let outer_heavy = node.left.as_deref().map(|l| height(&l.left) >= height(&l.right));
            match outer_heavy {
                Some(true) => Self::rotate(node, Rotation::Right, mutation),
                Some(false) => Self::rotate(node, Rotation::LeftRight, mutation),
                None => node,
            }
        } else if -difference > IMBALANCE_LIMIT {
            let outer_heavy = node.right.as_deref().map(|r| height(&r.right) >= height(&r.left));
            match outer_heavy {
                Some(true) => Self::rotate(node, Rotation::Left, mutation),
                Some(false) => Self::rotate(node, Rotation::RightLeft, mutation),
                None => node,
            }
        } else {
            node
        };
        node.update_height();
        node
    }

    fn rotate(mut node: Box<Node>, rotation: Rotation, mutation: &mut Mutation) -> Box<Node> {
        debug!(?rotation, pivot = %node.label, "rotate");
        mutation.rotations.push(rotation);
        match rotation {
            Rotation::Right => Self::rotate_right(node),
            Rotation::Left => Self::rotate_left(node),
            Rotation::LeftRight => {
                node.left = node.left.take().map(Self::rotate_left);
                Self::rotate_right(node)
            }
            Rotation::RightLeft => {
                node.right = node.right.take().map(Self::rotate_right);
                Self::rotate_left(node)
            }
        }
    }

    // Rotate right
    fn rotate_right(mut node: Box<Node>) -> Box<Node> {
        let Some(mut new_root) = node.left.take() else {
            return node;
        };
        node.left = new_root.right.take();
        node.update_height();
        new_root.right = Some(node);
        new_root.update_height();
        new_root
    }

    // Rotate left
    fn rotate_left(mut node: Box<Node>) -> Box<Node> {
        let Some(mut new_root) = node.right.take() else {
            return node;
        };
        node.right = new_root.left.take();
        node.update_height();
        new_root.left = Some(node);
        new_root.update_height();
        new_root
    }
}

fn leftmost(node: &Node) -> &Node {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    current
}

/// In-order iterator returned by [`AvlTree::iter`]
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left_edge(&mut self, mut node: Option<&'a Node>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Rank, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_edge(node.right.as_deref());
        Some((node.key, node.label.as_str()))
    }
}

impl<'a> IntoIterator for &'a AvlTree {
    type Item = (Rank, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Build a tree from `(rank, label)` pairs, discarding the events
impl<K: Into<Rank>, L: Into<String>> FromIterator<(K, L)> for AvlTree {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        let mut tree = AvlTree::new();
        tree.extend(iter);
        tree
    }
}

impl<K: Into<Rank>, L: Into<String>> Extend<(K, L)> for AvlTree {
    fn extend<I: IntoIterator<Item = (K, L)>>(&mut self, iter: I) {
        for (key, label) in iter {
            self.insert(key, label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    /// Assert the BST, AVL and height invariants and the cached size
    fn validate_tree_structure(tree: &AvlTree) {
        fn check(node: &Node, low: Option<Rank>, high: Option<Rank>) -> usize {
            if let Some(low) = low {
                assert!(node.key > low, "{} is not above {}", node.key, low);
            }
            if let Some(high) = high {
                assert!(node.key < high, "{} is not below {}", node.key, high);
            }
            let (lh, rh) = (height(&node.left), height(&node.right));
            assert!((lh - rh).abs() <= 1, "node {} is unbalanced: {} vs {}", node.key, lh, rh);
            assert_eq!(node.height, max(lh, rh) + 1, "stale height at {}", node.key);

            let left = node.left.as_deref().map_or(0, |l| check(l, low, Some(node.key)));
            let right = node.right.as_deref().map_or(0, |r| check(r, Some(node.key), high));
            left + right + 1
        }

        let count = tree.root.as_deref().map_or(0, |root| check(root, None, None));
        assert_eq!(count, tree.len());
    }

    fn keys(tree: &AvlTree) -> Vec<f64> {
        tree.iter().map(|(k, _)| k.value()).collect()
    }

    fn welcomed(ancestor: &str, newcomer: &str) -> Event {
        Event::Welcomed {
            ancestor: ancestor.to_string(),
            newcomer: newcomer.to_string(),
        }
    }

    fn replaced(departing: &str, replacement: Option<&str>) -> Event {
        Event::Replaced {
            departing: departing.to_string(),
            replacement: replacement.map(str::to_string),
        }
    }

    #[test]
    fn test_insert_boss_and_two_reports() {
        let mut tree = AvlTree::new();

        let boss = tree.insert(100, "Boss");
        assert!(boss.applied());
        assert!(boss.events().is_empty());

        assert_eq!(tree.insert(50, "A").events(), &[welcomed("Boss", "A")]);
        assert_eq!(tree.insert(150, "B").events(), &[welcomed("Boss", "B")]);

        let root = tree.root.as_deref().unwrap();
        assert_eq!(root.label, "Boss");
        assert_eq!(root.height, 1);
        assert_eq!(root.left.as_deref().unwrap().label, "A");
        assert_eq!(root.right.as_deref().unwrap().label, "B");
        assert!(root.left.as_deref().unwrap().is_leaf());
        assert!(root.right.as_deref().unwrap().is_leaf());
        validate_tree_structure(&tree);
    }

    #[test]
    fn test_ascending_inserts_rotate_left_once() {
        let mut tree = AvlTree::new();
        assert!(tree.insert(10, "a").rotations().is_empty());
        assert!(tree.insert(20, "b").rotations().is_empty());
        let third = tree.insert(30, "c");
        assert_eq!(third.rotations(), &[Rotation::Left]);
        assert_eq!(third.events(), &[welcomed("a", "c"), welcomed("b", "c")]);

        let root = tree.root.as_deref().unwrap();
        assert_eq!(root.key, Rank::from(20));
        assert_eq!(root.height, 1);
        assert_eq!(root.left.as_deref().unwrap().key, Rank::from(10));
        assert_eq!(root.left.as_deref().unwrap().height, 0);
        assert_eq!(root.right.as_deref().unwrap().key, Rank::from(30));
        assert_eq!(root.right.as_deref().unwrap().height, 0);
        validate_tree_structure(&tree);
    }

    #[test]
    fn test_descending_inserts_rotate_right_once() {
        let mut tree = AvlTree::new();
        tree.insert(30, "c");
        tree.insert(20, "b");
        assert_eq!(tree.insert(10, "a").rotations(), &[Rotation::Right]);
        assert_eq!(tree.root().unwrap().label, "b");
        validate_tree_structure(&tree);
    }

    #[test]
    fn test_double_rotations() {
        let mut tree = AvlTree::new();
        tree.insert(30, "c");
        tree.insert(10, "a");
        let zigzag = tree.insert(20, "b");
        assert_eq!(zigzag.rotations(), &[Rotation::LeftRight]);
        assert_eq!(zigzag.events(), &[welcomed("c", "b"), welcomed("a", "b")]);
        assert_eq!(tree.root().unwrap().label, "b");
        validate_tree_structure(&tree);

        let mut tree = AvlTree::new();
        tree.insert(10, "a");
        tree.insert(30, "c");
        assert_eq!(tree.insert(20, "b").rotations(), &[Rotation::RightLeft]);
        assert_eq!(tree.root().unwrap().label, "b");
        validate_tree_structure(&tree);
    }

    #[test]
    fn test_duplicate_insert_is_a_noop() {
        let mut tree: AvlTree = [(20, "b"), (10, "a"), (30, "c")].into_iter().collect();

        let duplicate = tree.insert(10, "impostor");
        assert!(!duplicate.applied());
        assert_eq!(
            duplicate.events(),
            &[welcomed("b", "impostor"), welcomed("a", "impostor")]
        );
        assert_eq!(tree.get(10), Some("a"));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.height(), 1);
        validate_tree_structure(&tree);
    }

    #[test]
    fn test_remove_two_children_promotes_successor() {
        let mut tree: AvlTree = [(20, "b"), (10, "a"), (30, "c")].into_iter().collect();

        let removal = tree.remove(20);
        assert!(removal.applied());
        assert_eq!(removal.events(), &[replaced("b", Some("c"))]);
        assert_eq!(tree.root().unwrap(), Member::new("c", 30));
        assert_eq!(keys(&tree), vec![10.0, 30.0]);
        validate_tree_structure(&tree);
    }

    #[test]
    fn test_remove_single_child_and_leaf() {
        let mut tree: AvlTree = [(20, "b"), (10, "a"), (30, "c"), (40, "d")]
            .into_iter()
            .collect();

        assert_eq!(tree.remove(30).events(), &[replaced("c", Some("d"))]);
        assert_eq!(keys(&tree), vec![10.0, 20.0, 40.0]);
        validate_tree_structure(&tree);

        assert_eq!(tree.remove(10).events(), &[replaced("a", None)]);
        assert_eq!(keys(&tree), vec![20.0, 40.0]);
        validate_tree_structure(&tree);
    }

    #[test]
    fn test_remove_rebalances() {
        let mut tree: AvlTree = [(20, "b"), (10, "a"), (30, "c"), (40, "d")]
            .into_iter()
            .collect();

        let removal = tree.remove(10);
        assert_eq!(removal.rotations(), &[Rotation::Left]);
        assert_eq!(tree.root().unwrap().label, "c");
        assert_eq!(tree.height(), 1);
        validate_tree_structure(&tree);
    }

    #[test]
    fn test_remove_absent_is_silent() {
        let mut tree: AvlTree = [(20, "b"), (10, "a")].into_iter().collect();
        let removal = tree.remove(99);
        assert!(!removal.applied());
        assert!(removal.events().is_empty());
        assert_eq!(tree.len(), 2);

        let mut empty = AvlTree::new();
        assert!(!empty.remove(1).applied());
        assert_eq!(empty.height(), -1);
    }

    #[test]
    fn test_remove_last_member() {
        let mut tree = AvlTree::new();
        tree.insert(1, "solo");
        assert_eq!(tree.remove(1).events(), &[replaced("solo", None)]);
        assert!(tree.is_empty());
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_long_ascending_run_stays_logarithmic() {
        let tree: AvlTree = (0..1024).map(|i| (i, format!("m{i}"))).collect();
        assert_eq!(tree.len(), 1024);
        assert_eq!(tree.height(), 10);
        validate_tree_structure(&tree);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn arbitrary_op() -> impl Strategy<Value = Op> {
        // A small key domain makes duplicates and misses common
        prop_oneof![
            (0..64i32).prop_map(Op::Insert),
            (0..64i32).prop_map(Op::Remove),
        ]
    }

    proptest! {
        /// Random mutations keep every invariant and agree with a BTreeMap model.
        #[test]
        fn prop_matches_model(ops in prop::collection::vec(arbitrary_op(), 0..200)) {
            let mut tree = AvlTree::new();
            let mut model = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(k) => {
                        let label = format!("m{k}");
                        let expected = !model.contains_key(&k);
                        model.entry(k).or_insert_with(|| label.clone());
                        prop_assert_eq!(tree.insert(k, label).applied(), expected);
                    }
                    Op::Remove(k) => {
                        let expected = model.remove(&k).is_some();
                        let removal = tree.remove(k);
                        prop_assert_eq!(removal.applied(), expected);
                        prop_assert_eq!(removal.events().len(), usize::from(expected));
                    }
                }
                validate_tree_structure(&tree);
            }

            let got: Vec<(f64, String)> = tree.iter().map(|(k, l)| (k.value(), l.to_string())).collect();
            let want: Vec<(f64, String)> = model.into_iter().map(|(k, l)| (f64::from(k), l)).collect();
            prop_assert_eq!(got, want);
        }

        /// Inserting then removing a fresh key restores the key set.
        #[test]
        fn prop_insert_remove_inverse(
            seed in prop::collection::btree_set(0..500i32, 0..100),
            fresh in 500..600i32,
        ) {
            let mut tree: AvlTree = seed.iter().map(|&k| (k, "x")).collect();
            let before = keys(&tree);

            prop_assert!(tree.insert(fresh, "x").applied());
            prop_assert!(tree.remove(fresh).applied());

            prop_assert_eq!(keys(&tree), before);
            validate_tree_structure(&tree);
        }
    }
}
