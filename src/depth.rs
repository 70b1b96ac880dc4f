//! Depth lookup and same-depth grouping

use tracing::{debug, instrument};

use crate::avl::{AvlTree, Node};
use crate::error::TreeResult;
use crate::event::Member;
use crate::rank::Rank;

impl AvlTree {
    /// Number of edges between the root and the member holding `key`
    pub fn depth(&self, key: impl Into<Rank>) -> TreeResult<usize> {
        Ok(self.path_to(key.into())?.len() - 1)
    }

    /// Every member whose distance from the root is `target`, left to right
    ///
    /// Never fails; an empty tree or a depth below the deepest leaf yields an empty list.
    pub fn same_depth(&self, target: usize) -> Vec<Member> {
        let mut found = Vec::new();
        if let Some(root) = self.root.as_deref() {
            collect_at_depth(root, 0, target, &mut found);
        }
        found
    }

    /// All members sharing the depth of `key`, itself included
    #[instrument(level = "trace", skip_all)]
    pub fn monitor_rank(&self, key: impl Into<Rank>) -> TreeResult<Vec<Member>> {
        let depth = self.depth(key)?;
        let peers = self.same_depth(depth);
        debug!(depth, peers = peers.len(), "monitor rank");
        Ok(peers)
    }
}

// Pre-order walk that stops descending once the target depth is reached
fn collect_at_depth(node: &Node, depth: usize, target: usize, found: &mut Vec<Member>) {
    if depth == target {
        found.push(node.to_member());
        return;
    }
    for child in node.children() {
        collect_at_depth(child, depth + 1, target, found);
    }
}
