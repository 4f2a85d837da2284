//! The slot: one glyph in the logical sequence and one node of an
//! attachment forest.

use crate::position::Position;

/// Slot flag bits.
pub mod flags {
    pub const DELETED: u8 = 1 << 0;
    pub const INSERTED: u8 = 1 << 1;
    pub const COPIED: u8 = 1 << 2;
    pub const POSITIONED: u8 = 1 << 3;
    pub const ATTACHED: u8 = 1 << 4;
}

/// Handle to a slot owned by a [`SlotArena`](crate::SlotArena).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub(crate) u32);

impl SlotId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Geometry and attribute state of one glyph.
///
/// Links are handles into the owning arena. They are only mutated through
/// the arena so both sides of a parent/child link stay consistent.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub(crate) next: Option<SlotId>,
    pub(crate) prev: Option<SlotId>,
    pub(crate) parent: Option<SlotId>,
    pub(crate) child: Option<SlotId>,
    pub(crate) sibling: Option<SlotId>,

    pub glyph_id: u16,
    /// Pseudo-glyph substitution target, 0 when none.
    pub real_glyph_id: u16,
    pub original: usize,
    pub before: usize,
    pub after: usize,

    pub position: Position,
    pub shift: Position,
    pub advance: Position,
    pub attach: Position,
    pub with: Position,
    pub att_level: u8,
    pub flags: u8,
    pub(crate) user_attrs: Vec<i16>,
}

impl Slot {
    pub(crate) fn new(user_attr_count: usize) -> Self {
        Self {
            next: None,
            prev: None,
            parent: None,
            child: None,
            sibling: None,
            glyph_id: 0,
            real_glyph_id: 0,
            original: 0,
            before: 0,
            after: 0,
            position: Position::ZERO,
            shift: Position::ZERO,
            advance: Position::new(-1.0, -1.0),
            attach: Position::ZERO,
            with: Position::ZERO,
            att_level: 0,
            flags: 0,
            user_attrs: vec![0; user_attr_count],
        }
    }

    /// Copy of `self` for a split or inserted slot. Character indices move
    /// by `char_offset`; no link of any kind is carried over.
    pub(crate) fn detached_copy(&self, char_offset: isize) -> Self {
        Self {
            next: None,
            prev: None,
            parent: None,
            child: None,
            sibling: None,
            original: self.original.wrapping_add_signed(char_offset),
            before: self.before.wrapping_add_signed(char_offset),
            after: self.after.wrapping_add_signed(char_offset),
            flags: self.flags & !flags::ATTACHED,
            user_attrs: self.user_attrs.clone(),
            ..*self
        }
    }

    /// Glyph whose outline is drawn: the substitution target if any.
    #[inline]
    pub fn glyph(&self) -> u16 {
        if self.real_glyph_id != 0 {
            self.real_glyph_id
        } else {
            self.glyph_id
        }
    }

    #[inline]
    pub fn next(&self) -> Option<SlotId> {
        self.next
    }

    #[inline]
    pub fn prev(&self) -> Option<SlotId> {
        self.prev
    }

    #[inline]
    pub fn parent(&self) -> Option<SlotId> {
        self.parent
    }

    /// First attached child.
    #[inline]
    pub fn first_child(&self) -> Option<SlotId> {
        self.child
    }

    #[inline]
    pub fn next_sibling(&self) -> Option<SlotId> {
        self.sibling
    }

    /// A slot without a parent begins its own cluster.
    #[inline]
    pub fn is_cluster_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline]
    pub fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }

    #[inline]
    pub fn is_insert_before(&self) -> bool {
        !self.has_flag(flags::INSERTED)
    }

    pub fn mark_insert_before(&mut self, state: bool) {
        if state {
            self.flags &= !flags::INSERTED;
        } else {
            self.flags |= flags::INSERTED;
        }
    }

    #[inline]
    pub fn user_attrs(&self) -> &[i16] {
        &self.user_attrs
    }

    #[inline]
    pub fn user_attr(&self, index: usize) -> Option<i16> {
        self.user_attrs.get(index).copied()
    }
}
