//! Lowest common ancestor by root-to-node path comparison

use std::cmp::Ordering;

use tracing::{debug, instrument};

use crate::avl::{AvlTree, Node};
use crate::error::{TreeError, TreeResult};
use crate::event::Member;
use crate::rank::Rank;

impl AvlTree {
    /// Nodes visited while descending from the root to `key`, root first
    pub(crate) fn path_to(&self, key: Rank) -> TreeResult<Vec<&Node>> {
        let mut current = self.root.as_deref().ok_or(TreeError::EmptyTree)?;
        let mut path = Vec::with_capacity(self.height().max(0) as usize + 1);
        loop {
            path.push(current);
            current = match key.cmp(&current.key) {
                Ordering::Less => current.left.as_deref(),
                Ordering::Greater => current.right.as_deref(),
                Ordering::Equal => return Ok(path),
            }
            .ok_or(TreeError::KeyNotFound(key))?;
        }
    }

    /// The deepest member lying on the paths to both `first` and `second`
    ///
    /// Both paths are aligned by distance from the root and compared from the deeper end
    /// upwards; the first depth at which the two paths hold the same label wins. Members are
    /// matched by label, so two distinct members sharing a label can be mistaken for one
    /// another. The reported rank is taken from the shorter path (from `second`'s path when
    /// both have the same length).
    ///
    /// Returns `Ok(None)` only if no depth matches, which cannot happen while both paths start
    /// at the same root.
    #[instrument(level = "trace", skip_all)]
    pub fn lowest_common_ancestor(
        &self,
        first: impl Into<Rank>,
        second: impl Into<Rank>,
    ) -> TreeResult<Option<Member>> {
        let first = self.path_to(first.into())?;
        let second = self.path_to(second.into())?;
        let reported = if first.len() >= second.len() {
            &second
        } else {
            &first
        };

        let common = first.len().min(second.len());
        let found = (0..common)
            .rev()
            .find(|&depth| first[depth].label == second[depth].label)
            .map(|depth| reported[depth].to_member());
        debug!(?found, "lowest common ancestor");
        Ok(found)
    }
}
