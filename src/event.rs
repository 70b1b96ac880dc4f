//! Side-channel notifications produced by tree mutations
//!
//! The tree never writes anywhere itself. Every [`insert`](crate::AvlTree::insert) and
//! [`remove`](crate::AvlTree::remove) hands back a [`Mutation`] holding the ordered events, and
//! the caller decides how (and whether) to persist them.

use crate::rank::Rank;

/// A member-level notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// `ancestor` was passed on the way down while inserting `newcomer`
    Welcomed { ancestor: String, newcomer: String },
    /// `departing` left the hierarchy; `replacement` now holds its position, or `None` if the
    /// position disappeared with it
    Replaced {
        departing: String,
        replacement: Option<String>,
    },
}

/// One of the four AVL restructurings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Single left rotation (right-right case)
    Left,
    /// Single right rotation (left-left case)
    Right,
    /// Left rotation of the left child, then right rotation (left-right case)
    LeftRight,
    /// Right rotation of the right child, then left rotation (right-left case)
    RightLeft,
}

/// The outcome of a single insert or remove
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mutation {
    pub(crate) applied: bool,
    pub(crate) events: Vec<Event>,
    pub(crate) rotations: Vec<Rotation>,
}

impl Mutation {
    /// False when the call was a no-op: a duplicate insert or the removal of an absent rank
    pub fn applied(&self) -> bool {
        self.applied
    }

    /// Events in emission order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Rotations in the order they were applied, deepest first
    pub fn rotations(&self) -> &[Rotation] {
        &self.rotations
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}

impl IntoIterator for Mutation {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

/// A member as reported by the queries
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub label: String,
    pub key: Rank,
}

impl Member {
    pub fn new(label: impl Into<String>, key: impl Into<Rank>) -> Self {
        Member {
            label: label.into(),
            key: key.into(),
        }
    }
}
