//! Error type for fallible slot arena operations.
//!
//! The resolver and the attribute bus never return these: the bus turns them
//! into warnings and leaves slot state untouched.

use thiserror::Error;

use crate::slot::SlotId;

/// Errors raised while building or configuring a slot arena.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// The handle does not belong to this arena.
    #[error("slot {0:?} is not part of this arena")]
    InvalidSlot(SlotId),

    /// An attach-to index fell outside the rule's slot map.
    #[error("invalid attach-to index {index} (slot map holds {len} slots)")]
    AttachTargetOutOfRange { index: u16, len: usize },

    /// Linking would make a slot its own ancestor.
    #[error("attaching {child:?} to {parent:?} would form a cycle")]
    AttachmentCycle { child: SlotId, parent: SlotId },

    /// User attribute index beyond the configured attribute count.
    #[error("user attribute {index} out of range (session carries {count})")]
    UserAttrOutOfRange { index: usize, count: usize },

    /// No per-character record at the slot's original index.
    #[error("no character record at index {0}")]
    CharInfoOutOfRange(usize),

    /// Configuration could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(String),
}
