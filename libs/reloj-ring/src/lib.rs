//! Circular doubly linked ring for the reloj alarm store
//!
//! The ring keeps its nodes in an arena and links them by slot index, so the
//! `next`/`prev` cycle never needs shared ownership. A navigation cursor
//! (`current`) lives alongside `head` and is relocated whenever the node it
//! points to is unlinked.
//!
//! ```
//! use reloj_ring::{CircularList, Keyed};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Slot(u32);
//!
//! impl Keyed for Slot {
//!     type Key = u32;
//!     fn key(&self) -> &u32 {
//!         &self.0
//!     }
//! }
//!
//! let mut ring = CircularList::new();
//! ring.insert_at_end(Slot(1));
//! ring.insert_at_end(Slot(2));
//!
//! assert_eq!(ring.next_item(), Some(&Slot(2)));
//! assert_eq!(ring.next_item(), Some(&Slot(1)));
//! ```

pub mod describe;
pub mod keyed;
pub mod list;

pub use describe::RingStructure;
pub use keyed::{Keyed, Merge};
pub use list::{CircularList, Iter, NodeRef};
