//! Maintain a hierarchy of ranked members as an AVL tree, and answer structural questions
//! about it:
//!
//! - who is the lowest superior shared by two members ([`AvlTree::lowest_common_ancestor`])
//! - how large a group can be picked without a member and its direct superior both being in
//!   it ([`AvlTree::divide`])
//! - which members sit at the same depth as a given one ([`AvlTree::monitor_rank`])
//!
//! Mutations never write anywhere. [`AvlTree::insert`] and [`AvlTree::remove`] return a
//! [`Mutation`] carrying the ordered [`Event`]s, which [`Reporter`] can turn into text and the
//! [`script`] module drives from a command file.
//!
//! # Examples
//!
//! ```
//! use avlrank::{AvlTree, Event, Member};
//!
//! let mut family = AvlTree::new();
//! family.insert(100.0, "Boss");
//! let joined = family.insert(50.0, "A");
//! assert_eq!(
//!     joined.events(),
//!     &[Event::Welcomed { ancestor: "Boss".into(), newcomer: "A".into() }]
//! );
//! family.insert(150.0, "B");
//!
//! assert_eq!(family.divide(), Ok(2));
//! assert_eq!(
//!     family.monitor_rank(150.0).unwrap(),
//!     vec![Member::new("A", 50.0), Member::new("B", 150.0)]
//! );
//! ```

mod ancestor;
mod avl;
mod config;
mod depth;
mod error;
mod event;
mod partition;
mod rank;
mod report;
pub mod script;

pub use crate::avl::{AvlTree, Iter};
pub use crate::config::{Config, ConfigBuilder, MAX_PRECISION};
pub use crate::error::{ConfigError, ScriptError, TreeError, TreeResult};
pub use crate::event::{Event, Member, Mutation, Rotation};
pub use crate::rank::Rank;
pub use crate::report::Reporter;
