//! Attachment resolution and cluster positioning for glyph slots.
//!
//! A shaping rule interpreter links glyph slots into attachment trees (marks
//! on bases, bases on ligature components) and sets attachment offsets. This
//! crate turns that topology into absolute positions:
//!
//! - [`SlotArena`] owns the slots of one session and keeps the logical
//!   sequence and the attachment forest consistent.
//! - [`SlotArena::finalise`] resolves one cluster and corrects left overhang
//!   and right-to-left collisions; [`SlotArena::position_slots`] runs it for
//!   every cluster of a run.
//! - [`SlotArena::cluster_metric`] measures a cluster in design units.
//! - [`SlotArena::get_attr`] / [`SlotArena::set_attr`] expose slot state to
//!   rules by attribute code.
//!
//! Glyph metrics, character records and the run direction come from a
//! [`ShapingContext`]; device scaling and hinting from a [`Font`].

pub mod arena;
pub mod attr;
pub mod config;
pub mod context;
pub mod error;
pub mod font;
pub mod metric;
pub mod position;
pub mod resolver;
pub mod slot;

pub use arena::{SequenceIter, SlotArena};
pub use attr::{AttrCode, SlotMap};
pub use config::{ArenaConfig, ArenaConfigBuilder};
pub use context::{CharInfo, DIR_RTL, GlyphFace, Segment, ShapingContext};
pub use error::SlotError;
pub use font::{Font, ScaledFont};
pub use metric::Metric;
pub use position::{Position, Rect};
pub use resolver::ClusterTraversal;
pub use slot::{Slot, SlotId, flags};
