//! Slot storage for one shaping session.
//!
//! The arena owns every slot and hands out [`SlotId`] handles. Sequence
//! links (`next`/`prev`) and attachment links (`parent`/`child`/`sibling`)
//! are handles too, so relinking never touches ownership.

use std::ops::{Index, IndexMut};

use crate::config::{ArenaConfig, MAX_INITIAL_CAPACITY, MAX_USER_ATTR_COUNT};
use crate::context::ShapingContext;
use crate::error::SlotError;
use crate::position::Position;
use crate::slot::{Slot, SlotId, flags};

/// Owner of all slots in a shaping session.
#[derive(Debug, Clone, Default)]
pub struct SlotArena {
    slots: Vec<Slot>,
    first: Option<SlotId>,
    last: Option<SlotId>,
    user_attr_count: usize,
}
static_assertions::assert_impl_all!(SlotArena: Send, Sync);

impl SlotArena {
    /// Sizes outside the configuration limits are clamped to them.
    pub fn new(config: &ArenaConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.initial_capacity.min(MAX_INITIAL_CAPACITY)),
            first: None,
            last: None,
            user_attr_count: config.user_attr_count.min(MAX_USER_ATTR_COUNT),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn user_attr_count(&self) -> usize {
        self.user_attr_count
    }

    /// Drops every slot. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.first = None;
        self.last = None;
    }

    /// Allocates a fresh slot outside the logical sequence.
    pub fn new_slot(&mut self) -> SlotId {
        let id = SlotId(self.slots.len() as u32);
        self.slots.push(Slot::new(self.user_attr_count));
        id
    }

    /// Allocates a copy of `src` with character indices moved by
    /// `char_offset`. The copy is detached from every tree and sequence.
    pub fn clone_slot(&mut self, src: SlotId, char_offset: isize) -> SlotId {
        let copy = self[src].detached_copy(char_offset);
        let id = SlotId(self.slots.len() as u32);
        self.slots.push(copy);
        id
    }

    #[inline]
    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.get_mut(id.index())
    }

    pub fn try_slot(&self, id: SlotId) -> Result<&Slot, SlotError> {
        self.get(id).ok_or(SlotError::InvalidSlot(id))
    }

    pub fn try_slot_mut(&mut self, id: SlotId) -> Result<&mut Slot, SlotError> {
        self.get_mut(id).ok_or(SlotError::InvalidSlot(id))
    }

    // Logical sequence

    #[inline]
    pub fn first(&self) -> Option<SlotId> {
        self.first
    }

    #[inline]
    pub fn last(&self) -> Option<SlotId> {
        self.last
    }

    /// Links `id` at the end of the logical sequence.
    pub fn append(&mut self, id: SlotId) {
        self[id].next = None;
        self[id].prev = self.last;
        match self.last {
            Some(last) => self[last].next = Some(id),
            None => self.first = Some(id),
        }
        self.last = Some(id);
    }

    /// Links `id` directly after `anchor` in the logical sequence.
    pub fn insert_after(&mut self, anchor: SlotId, id: SlotId) {
        let next = self[anchor].next;
        self[id].prev = Some(anchor);
        self[id].next = next;
        self[anchor].next = Some(id);
        match next {
            Some(n) => self[n].prev = Some(id),
            None => self.last = Some(id),
        }
    }

    /// Slots in logical order.
    pub fn iter(&self) -> SequenceIter<'_> {
        SequenceIter {
            arena: self,
            cur: self.first,
        }
    }

    /// Cluster roots in logical order.
    pub fn roots(&self) -> impl Iterator<Item = SlotId> + '_ {
        self.iter().filter(|&id| self[id].is_cluster_root())
    }

    /// Splices this arena's slots after another segment: character indices
    /// move by `num_char_info` and positions by `rel_pos`.
    pub fn update(&mut self, id: SlotId, num_char_info: usize, rel_pos: Position) {
        let slot = &mut self[id];
        slot.before += num_char_info;
        slot.after += num_char_info;
        slot.position += rel_pos;
    }

    /// Resolved positions in logical order, flattened to `x, y` pairs.
    pub fn write_positions(&self, out: &mut Vec<f32>) {
        let positions: Vec<Position> = self.iter().map(|id| self[id].position).collect();
        out.extend_from_slice(bytemuck::cast_slice(&positions));
    }

    // Attachment forest

    /// Appends `a` as the last child of `parent`. Only the forward link is
    /// set; use [`SlotArena::attach`] to keep both sides consistent.
    pub fn add_child(&mut self, parent: SlotId, a: SlotId) {
        match self[parent].child {
            None => self[parent].child = Some(a),
            Some(c) if c == a => {}
            Some(c) => self.add_sibling(c, a),
        }
    }

    /// Appends `a` to the sibling chain starting at `s`.
    pub fn add_sibling(&mut self, s: SlotId, a: SlotId) {
        let mut cur = s;
        if cur == a {
            return;
        }
        loop {
            match self[cur].sibling {
                None => {
                    self[cur].sibling = Some(a);
                    return;
                }
                Some(n) if n == a => return,
                Some(n) => cur = n,
            }
        }
    }

    /// True if `ancestor` is `id` or lies on `id`'s parent chain.
    pub fn is_ancestor(&self, ancestor: SlotId, id: SlotId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self[c].parent;
        }
        false
    }

    /// Attaches `child` under `parent`, setting both links. A previous
    /// attachment of `child` is dropped first.
    pub fn attach(&mut self, child: SlotId, parent: SlotId) -> Result<(), SlotError> {
        self.try_slot(child)?;
        self.try_slot(parent)?;
        if self.is_ancestor(child, parent) {
            return Err(SlotError::AttachmentCycle { child, parent });
        }
        if self[child].parent != Some(parent) {
            self.detach(child);
            self[child].parent = Some(parent);
        }
        self.add_child(parent, child);
        self[child].flags |= flags::ATTACHED;
        Ok(())
    }

    /// Removes `child` from its parent's chain. The child keeps its own
    /// subtree.
    pub fn detach(&mut self, child: SlotId) {
        let Some(parent) = self[child].parent.take() else {
            return;
        };
        let after = self[child].sibling.take();
        if self[parent].child == Some(child) {
            self[parent].child = after;
        } else {
            let mut cur = self[parent].child;
            while let Some(c) = cur {
                if self[c].sibling == Some(child) {
                    self[c].sibling = after;
                    break;
                }
                cur = self[c].sibling;
            }
        }
        self[child].flags &= !flags::ATTACHED;
    }

    /// Children of `parent` in attachment order.
    pub fn children(&self, parent: SlotId) -> impl Iterator<Item = SlotId> + '_ {
        std::iter::successors(self[parent].child, move |&c| self[c].sibling)
    }

    /// Translates `id`, its subtree and its following siblings by `adj`.
    pub fn flood_shift(&mut self, id: SlotId, adj: Position) {
        self[id].position += adj;
        if let Some(c) = self[id].child {
            self.flood_shift(c, adj);
        }
        if let Some(s) = self[id].sibling {
            self.flood_shift(s, adj);
        }
    }

    // Glyph and attribute state

    /// Assigns a glyph, resolving pseudo-glyph substitution and taking the
    /// natural advance from the face table.
    pub fn set_glyph<C>(&mut self, id: SlotId, ctx: &C, glyph_id: u16)
    where
        C: ShapingContext + ?Sized,
    {
        let slot = &mut self[id];
        slot.glyph_id = glyph_id;
        let Some(face) = ctx.glyph_face(glyph_id) else {
            slot.real_glyph_id = 0;
            slot.advance = Position::ZERO;
            return;
        };
        slot.real_glyph_id = face.attr(ctx.pseudo_attr());
        let face = if slot.real_glyph_id != 0 {
            ctx.glyph_face(slot.real_glyph_id)
        } else {
            Some(face)
        };
        slot.advance = Position::new(face.map_or(0.0, |f| f.advance.x), 0.0);
    }

    pub fn user_attr(&self, id: SlotId, index: usize) -> Result<i16, SlotError> {
        self.try_slot(id)?
            .user_attr(index)
            .ok_or(SlotError::UserAttrOutOfRange {
                index,
                count: self.user_attr_count,
            })
    }

    pub fn set_user_attr(&mut self, id: SlotId, index: usize, value: i16) -> Result<(), SlotError> {
        let count = self.user_attr_count;
        let slot = self.try_slot_mut(id)?;
        let attr = slot
            .user_attrs
            .get_mut(index)
            .ok_or(SlotError::UserAttrOutOfRange { index, count })?;
        *attr = value;
        Ok(())
    }
}

impl Index<SlotId> for SlotArena {
    type Output = Slot;

    #[inline]
    fn index(&self, id: SlotId) -> &Slot {
        &self.slots[id.index()]
    }
}

impl IndexMut<SlotId> for SlotArena {
    #[inline]
    fn index_mut(&mut self, id: SlotId) -> &mut Slot {
        &mut self.slots[id.index()]
    }
}

/// Iterator over the logical sequence.
#[derive(Debug)]
pub struct SequenceIter<'a> {
    arena: &'a SlotArena,
    cur: Option<SlotId>,
}

impl Iterator for SequenceIter<'_> {
    type Item = SlotId;

    fn next(&mut self) -> Option<SlotId> {
        let id = self.cur?;
        self.cur = self.arena[id].next;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GlyphFace, Segment};
    use crate::position::Rect;

    fn arena_with(n: usize, user_attrs: usize) -> (SlotArena, Vec<SlotId>) {
        let mut arena = SlotArena::new(&ArenaConfig::with_user_attrs(user_attrs));
        let ids = (0..n)
            .map(|_| {
                let id = arena.new_slot();
                arena.append(id);
                id
            })
            .collect();
        (arena, ids)
    }

    #[test]
    fn sequence_order() {
        let (mut arena, ids) = arena_with(3, 0);
        let extra = arena.new_slot();
        arena.insert_after(ids[0], extra);
        let order: Vec<_> = arena.iter().collect();
        assert_eq!(order, vec![ids[0], extra, ids[1], ids[2]]);
        assert_eq!(arena[extra].prev(), Some(ids[0]));
        assert_eq!(arena.last(), Some(ids[2]));

        let tail = arena.new_slot();
        arena.insert_after(ids[2], tail);
        assert_eq!(arena.last(), Some(tail));
    }

    #[test]
    fn add_child_appends_once() {
        let (mut arena, ids) = arena_with(4, 0);
        arena.add_child(ids[0], ids[1]);
        arena.add_child(ids[0], ids[2]);
        arena.add_child(ids[0], ids[3]);
        arena.add_child(ids[0], ids[2]);
        arena.add_child(ids[0], ids[1]);
        let kids: Vec<_> = arena.children(ids[0]).collect();
        assert_eq!(kids, vec![ids[1], ids[2], ids[3]]);
    }

    #[test]
    fn attach_links_both_sides() {
        let (mut arena, ids) = arena_with(3, 0);
        arena.attach(ids[1], ids[0]).unwrap();
        arena.attach(ids[2], ids[0]).unwrap();
        assert_eq!(arena[ids[1]].parent(), Some(ids[0]));
        assert_eq!(arena[ids[0]].first_child(), Some(ids[1]));
        assert_eq!(arena[ids[1]].next_sibling(), Some(ids[2]));
        assert!(arena[ids[2]].has_flag(flags::ATTACHED));
        let roots: Vec<_> = arena.roots().collect();
        assert_eq!(roots, vec![ids[0]]);
    }

    #[test]
    fn attach_rejects_cycles() {
        let (mut arena, ids) = arena_with(3, 0);
        arena.attach(ids[1], ids[0]).unwrap();
        arena.attach(ids[2], ids[1]).unwrap();
        assert_eq!(
            arena.attach(ids[0], ids[2]),
            Err(SlotError::AttachmentCycle {
                child: ids[0],
                parent: ids[2]
            })
        );
        assert!(arena.attach(ids[0], ids[0]).is_err());
        assert!(arena[ids[0]].is_cluster_root());
    }

    #[test]
    fn reattach_moves_between_parents() {
        let (mut arena, ids) = arena_with(4, 0);
        arena.attach(ids[1], ids[0]).unwrap();
        arena.attach(ids[2], ids[0]).unwrap();
        arena.attach(ids[3], ids[0]).unwrap();

        arena.attach(ids[2], ids[3]).unwrap();
        let kids: Vec<_> = arena.children(ids[0]).collect();
        assert_eq!(kids, vec![ids[1], ids[3]]);
        assert_eq!(arena[ids[3]].first_child(), Some(ids[2]));

        arena.detach(ids[1]);
        assert_eq!(arena[ids[0]].first_child(), Some(ids[3]));
        assert!(arena[ids[1]].is_cluster_root());
        assert!(!arena[ids[1]].has_flag(flags::ATTACHED));
    }

    #[test]
    fn clone_is_detached_and_offset() {
        let (mut arena, ids) = arena_with(4, 2);
        arena.attach(ids[1], ids[0]).unwrap();
        arena.attach(ids[2], ids[1]).unwrap();
        arena.attach(ids[3], ids[0]).unwrap();
        arena[ids[1]].original = 2;
        arena[ids[1]].flags |= flags::COPIED;
        arena.set_user_attr(ids[1], 1, -4).unwrap();

        let c = arena.clone_slot(ids[1], 3);
        assert_eq!(arena[c].original, 5);
        assert_eq!(arena[c].parent(), None);
        assert_eq!(arena[c].first_child(), None);
        assert_eq!(arena[c].next_sibling(), None);
        assert_eq!(arena[c].next(), None);
        assert!(arena[c].has_flag(flags::COPIED));
        assert_eq!(arena.user_attr(c, 1), Ok(-4));
    }

    #[test]
    fn flood_shift_reaches_subtree_and_siblings() {
        let (mut arena, ids) = arena_with(4, 0);
        arena.attach(ids[1], ids[0]).unwrap();
        arena.attach(ids[2], ids[1]).unwrap();
        arena.attach(ids[3], ids[0]).unwrap();
        arena.flood_shift(ids[1], Position::new(5.0, 1.0));
        assert_eq!(arena[ids[0]].position, Position::ZERO);
        for &id in &ids[1..] {
            assert_eq!(arena[id].position, Position::new(5.0, 1.0));
        }
    }

    #[test]
    fn set_glyph_substitutes_pseudo() {
        let faces = vec![
            GlyphFace::new(Position::new(100.0, 0.0), Rect::ZERO),
            GlyphFace::new(Position::new(200.0, 0.0), Rect::ZERO).with_attrs(vec![0, 0, 0]),
            GlyphFace::new(Position::new(300.0, 0.0), Rect::ZERO).with_attrs(vec![0, 0, 1]),
        ];
        let seg = Segment::new(faces, vec![]).with_pseudo_attr(2);
        let (mut arena, ids) = arena_with(1, 0);

        arena.set_glyph(ids[0], &seg, 1);
        assert_eq!(arena[ids[0]].real_glyph_id, 0);
        assert_eq!(arena[ids[0]].advance, Position::new(200.0, 0.0));

        arena.set_glyph(ids[0], &seg, 2);
        assert_eq!(arena[ids[0]].real_glyph_id, 1);
        assert_eq!(arena[ids[0]].glyph(), 1);
        assert_eq!(arena[ids[0]].advance, Position::new(200.0, 0.0));

        arena.set_glyph(ids[0], &seg, 40);
        assert_eq!(arena[ids[0]].glyph_id, 40);
        assert_eq!(arena[ids[0]].advance, Position::ZERO);
    }

    #[test]
    fn user_attr_bounds() {
        let (mut arena, ids) = arena_with(1, 2);
        assert_eq!(arena.set_user_attr(ids[0], 1, 7), Ok(()));
        assert_eq!(arena.user_attr(ids[0], 1), Ok(7));
        assert_eq!(
            arena.user_attr(ids[0], 2),
            Err(SlotError::UserAttrOutOfRange { index: 2, count: 2 })
        );
        assert!(arena.try_slot(SlotId(99)).is_err());
    }

    #[test]
    fn update_and_flat_positions() {
        let (mut arena, ids) = arena_with(2, 0);
        arena[ids[1]].position = Position::new(10.0, 0.0);
        arena.update(ids[1], 4, Position::new(1.0, 2.0));
        assert_eq!(arena[ids[1]].before, 4);
        assert_eq!(arena[ids[1]].after, 4);

        let mut flat = Vec::new();
        arena.write_positions(&mut flat);
        assert_eq!(flat, vec![0.0, 0.0, 11.0, 2.0]);
    }

    #[test]
    fn oversized_config_is_clamped() {
        let config = ArenaConfig {
            user_attr_count: usize::MAX,
            initial_capacity: usize::MAX,
        };
        let mut arena = SlotArena::new(&config);
        assert_eq!(arena.user_attr_count(), MAX_USER_ATTR_COUNT);
        let id = arena.new_slot();
        assert_eq!(arena[id].user_attrs().len(), MAX_USER_ATTR_COUNT);
    }
}
