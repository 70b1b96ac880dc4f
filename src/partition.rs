//! Division analysis: a conflict-free subset over parent/child edges
//!
//! This is a bottom-up greedy rule rather than the two-state tree dynamic program:
//!
//! - a leaf is always selected
//! - an inner node is selected only when none of its existing children was selected
//! - a selected child is released again as soon as its parent has been evaluated, so only
//!   the direct children ever influence a node
//!
//! The walk is a pure function of the subtree; nothing is marked on the nodes.

use tracing::{debug, instrument};

use crate::avl::{AvlTree, Node};
use crate::error::{TreeError, TreeResult};

impl AvlTree {
    /// Size of the conflict-free subset chosen by the bottom-up selection rule
    #[instrument(level = "trace", skip_all)]
    pub fn divide(&self) -> TreeResult<usize> {
        let root = self.root.as_deref().ok_or(TreeError::EmptyTree)?;
        let (root_selected, count) = select(root);
        debug!(count, root_selected, "division");
        Ok(count)
    }
}

/// Returns whether `node` itself is selected, and the subtree's contribution
fn select(node: &Node) -> (bool, usize) {
    if node.is_leaf() {
        return (true, 1);
    }
    let (any_child_selected, sum) = node
        .children()
        .map(select)
        .fold((false, 0), |(any, sum), (selected, count)| (any || selected, sum + count));
    if any_child_selected {
        (false, sum)
    } else {
        (true, sum + 1)
    }
}
