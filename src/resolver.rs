//! Cluster position resolution.
//!
//! # Algorithm
//!
//! Attachment offsets are expressed in the parent glyph's frame, so a mark
//! cannot be placed before its base. Resolution therefore runs in two
//! phases per cluster:
//!
//! 1. **Resolve** (top-down): each slot is placed relative to its parent's
//!    resolved position; the bounding box and the left-most x seen in the
//!    cluster are accumulated on the way.
//! 2. **Correct** (bottom-up, root only): if a mark overhangs to the left,
//!    or a right-to-left cluster extends past its own base, the already
//!    resolved subtree is flood-shifted right.
//!
//! The correction costs one walk of a single cluster's subtree, never of the
//! whole run.

use crate::arena::SlotArena;
use crate::context::{DIR_RTL, ShapingContext};
use crate::font::Font;
use crate::position::{Position, Rect};
use crate::slot::{SlotId, flags};

/// Accumulators threaded through one cluster walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterTraversal {
    /// Union of every visited glyph box.
    pub bbox: Rect,
    /// Smallest x of any attached slot; reset to 0 at each cluster root.
    pub global_min: f32,
    /// Smallest x of any attached slot; reset to the base x at each cluster
    /// root.
    pub cluster_min: f32,
}

impl ClusterTraversal {
    pub fn new(bbox: Rect) -> Self {
        Self {
            bbox,
            global_min: 0.0,
            cluster_min: 0.0,
        }
    }
}

impl Default for ClusterTraversal {
    fn default() -> Self {
        Self::new(Rect::EMPTY)
    }
}

impl SlotArena {
    /// Resolves the positions of `id` and everything attached below it.
    ///
    /// `base` is the pen position for a cluster root and the parent's
    /// resolved position for an attached slot. Slots with an attachment
    /// level above a non-zero `att_level` are skipped with a zero advance.
    ///
    /// Returns the advance contributed by this subtree; for a root it is the
    /// pen position where the next cluster starts.
    pub fn finalise<C>(
        &mut self,
        id: SlotId,
        ctx: &C,
        font: Option<&dyn Font>,
        base: Position,
        traversal: &mut ClusterTraversal,
        att_level: u8,
    ) -> Position
    where
        C: ShapingContext + ?Sized,
    {
        let slot = &self[id];
        if att_level != 0 && slot.att_level > att_level {
            return Position::ZERO;
        }

        let face = ctx.glyph_face(slot.glyph());
        let mut scale = 1.0;
        let mut shift = slot.shift;
        let mut t_advance = slot.advance.x;
        if let Some(font) = font {
            scale = font.scale();
            shift = shift * scale;
            if font.is_hinted() {
                let reference = face.map_or_else(|| ctx.glyph_advance(slot.glyph()), |f| f.advance.x);
                t_advance = (slot.advance.x - reference) * scale + font.advance(slot.glyph_id);
            } else {
                t_advance *= scale;
            }
        }

        let parent = slot.parent;
        let child = slot.child;
        let sibling = slot.sibling;
        let mut position = base + shift;
        let mut res;
        if parent.is_none() {
            res = base + Position::new(t_advance, slot.advance.y * scale);
            traversal.global_min = 0.0;
            traversal.cluster_min = base.x;
        } else {
            position += (slot.attach - slot.with) * scale;
            let t_adv = if t_advance > 0.0 {
                position.x + t_advance - shift.x
            } else {
                0.0
            };
            res = Position::new(t_adv, 0.0);
            if position.x < traversal.cluster_min {
                traversal.cluster_min = position.x;
            }
        }

        if let Some(face) = face {
            let glyph_box = face.bbox * scale + position;
            traversal.bbox = traversal.bbox.widen(&glyph_box);
        }

        if parent.is_some() && position.x < traversal.global_min {
            traversal.global_min = position.x;
        }

        self[id].position = position;
        log::trace!("slot {:?} resolved at ({}, {})", id, position.x, position.y);

        if let Some(child) = child {
            let t_res = self.finalise(child, ctx, font, position, traversal, att_level);
            if t_res.x > res.x {
                res = t_res;
            }
        }

        if parent.is_some() {
            if let Some(sibling) = sibling {
                let t_res = self.finalise(sibling, ctx, font, base, traversal, att_level);
                if t_res.x > res.x {
                    res = t_res;
                }
            }
        } else {
            let adj = if traversal.global_min < 0.0 {
                -traversal.global_min
            } else if ctx.dir() & DIR_RTL != 0 && traversal.cluster_min < base.x {
                base.x - traversal.cluster_min
            } else {
                0.0
            };
            if adj != 0.0 {
                log::debug!("cluster {:?} shifted right by {}", id, adj);
                let adj = Position::new(adj, 0.0);
                res += adj;
                self[id].position += adj;
                if let Some(child) = child {
                    self.flood_shift(child, adj);
                }
            }
        }
        res
    }

    /// Positions every cluster of the run starting the pen at `origin`.
    ///
    /// Clusters are placed in logical order, or last to first when the run
    /// is right-to-left. Every slot of the run is marked
    /// [`flags::POSITIONED`].
    ///
    /// Returns the final pen position and the bounding box of the whole run,
    /// which is [`Rect::ZERO`] when no glyph has a known face.
    pub fn position_slots<C>(
        &mut self,
        ctx: &C,
        font: Option<&dyn Font>,
        origin: Position,
    ) -> (Position, Rect)
    where
        C: ShapingContext + ?Sized,
    {
        let mut roots: Vec<SlotId> = self.roots().collect();
        if ctx.dir() & DIR_RTL != 0 {
            roots.reverse();
        }
        let mut pen = origin;
        let mut traversal = ClusterTraversal::default();
        for root in roots {
            pen = self.finalise(root, ctx, font, pen, &mut traversal, 0);
        }
        let run: Vec<SlotId> = self.iter().collect();
        for id in run {
            self[id].flags |= flags::POSITIONED;
        }
        let bbox = if traversal.bbox.is_empty() {
            Rect::ZERO
        } else {
            traversal.bbox
        };
        (pen, bbox)
    }
}
