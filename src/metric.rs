//! Scalar cluster measurements in design units.

use crate::arena::SlotArena;
use crate::context::ShapingContext;
use crate::position::{Position, Rect};
use crate::resolver::ClusterTraversal;
use crate::slot::SlotId;

/// Measurement selected by a rule's metric code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Metric {
    Lsb = 0,
    Rsb = 1,
    BbTop = 2,
    BbBottom = 3,
    BbLeft = 4,
    BbRight = 5,
    BbHeight = 6,
    BbWidth = 7,
    AdvWidth = 8,
    AdvHeight = 9,
}

impl Metric {
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Lsb,
            1 => Self::Rsb,
            2 => Self::BbTop,
            3 => Self::BbBottom,
            4 => Self::BbLeft,
            5 => Self::BbRight,
            6 => Self::BbHeight,
            7 => Self::BbWidth,
            8 => Self::AdvWidth,
            9 => Self::AdvHeight,
            _ => return None,
        })
    }

    fn select(self, bbox: &Rect, advance: Position) -> f32 {
        match self {
            Self::Lsb | Self::BbLeft => bbox.bl.x,
            Self::Rsb => advance.x - bbox.tr.x,
            Self::BbTop => bbox.tr.y,
            Self::BbBottom => bbox.bl.y,
            Self::BbRight => bbox.tr.x,
            Self::BbHeight => bbox.height(),
            Self::BbWidth => bbox.width(),
            Self::AdvWidth => advance.x,
            Self::AdvHeight => advance.y,
        }
    }
}

impl SlotArena {
    /// Measures the cluster rooted at `id`, unscaled and unhinted.
    ///
    /// Unknown metric codes measure 0. The value is truncated toward zero.
    ///
    /// This runs the resolver, so every slot in the cluster is left at its
    /// unscaled position for a base of `(0, 0)`. Run the real positioning
    /// pass again afterwards if rendered positions are needed. The
    /// [`flags::POSITIONED`](crate::flags::POSITIONED) bit is not touched.
    pub fn cluster_metric<C>(&mut self, id: SlotId, ctx: &C, metric: u8, att_level: u8) -> i32
    where
        C: ShapingContext + ?Sized,
    {
        let bbox = ctx
            .glyph_face(self[id].glyph_id)
            .map_or(Rect::ZERO, |f| f.bbox);
        let mut traversal = ClusterTraversal::new(bbox);
        let advance = self.finalise(id, ctx, None, Position::ZERO, &mut traversal, att_level);
        Metric::from_code(metric).map_or(0, |m| m.select(&traversal.bbox, advance) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;
    use crate::context::{GlyphFace, Segment};

    fn setup() -> (SlotArena, Segment, SlotId, SlotId) {
        let seg = Segment::new(
            vec![
                GlyphFace::new(
                    Position::new(600.0, 0.0),
                    Rect::new(Position::new(40.0, -10.0), Position::new(560.0, 700.0)),
                ),
                GlyphFace::new(
                    Position::ZERO,
                    Rect::new(Position::new(-30.0, 0.0), Position::new(30.0, 80.0)),
                ),
            ],
            vec![],
        );
        let mut arena = SlotArena::new(&ArenaConfig::default());
        let base = arena.new_slot();
        let mark = arena.new_slot();
        arena.set_glyph(base, &seg, 0);
        arena.set_glyph(mark, &seg, 1);
        arena.attach(mark, base).unwrap();
        arena[mark].attach = Position::new(300.0, 750.0);
        (arena, seg, base, mark)
    }

    #[test]
    fn box_and_bearings() {
        let (mut arena, seg, base, _) = setup();
        let m = |arena: &mut SlotArena, code: Metric| arena.cluster_metric(base, &seg, code as u8, 0);
        assert_eq!(m(&mut arena, Metric::Lsb), 40);
        assert_eq!(m(&mut arena, Metric::BbLeft), 40);
        assert_eq!(m(&mut arena, Metric::BbRight), 560);
        assert_eq!(m(&mut arena, Metric::BbTop), 830);
        assert_eq!(m(&mut arena, Metric::BbBottom), -10);
        assert_eq!(m(&mut arena, Metric::BbWidth), 520);
        assert_eq!(m(&mut arena, Metric::BbHeight), 840);
        assert_eq!(m(&mut arena, Metric::Rsb), 40);
        assert_eq!(m(&mut arena, Metric::AdvWidth), 600);
        assert_eq!(m(&mut arena, Metric::AdvHeight), 0);
    }

    #[test]
    fn advance_width_matches_resolver() {
        let (mut arena, seg, base, _) = setup();
        let mut t = ClusterTraversal::default();
        let direct = arena.finalise(base, &seg, None, Position::ZERO, &mut t, 0);
        assert_eq!(
            arena.cluster_metric(base, &seg, Metric::AdvWidth as u8, 0),
            direct.x as i32
        );
    }

    #[test]
    fn unknown_code_is_zero() {
        let (mut arena, seg, base, _) = setup();
        assert_eq!(arena.cluster_metric(base, &seg, 10, 0), 0);
        assert_eq!(arena.cluster_metric(base, &seg, 200, 0), 0);
        assert_eq!(Metric::from_code(10), None);
    }

    #[test]
    fn measuring_rewrites_positions() {
        let (mut arena, seg, base, mark) = setup();
        arena[base].position = Position::new(1234.0, 0.0);
        arena.cluster_metric(base, &seg, Metric::BbWidth as u8, 0);
        assert_eq!(arena[base].position, Position::ZERO);
        assert_eq!(arena[mark].position, Position::new(300.0, 750.0));
    }

    #[test]
    fn measuring_does_not_mark_positioned() {
        let (mut arena, seg, base, mark) = setup();
        arena.cluster_metric(base, &seg, Metric::AdvWidth as u8, 0);
        assert!(!arena[base].has_flag(crate::slot::flags::POSITIONED));
        assert!(!arena[mark].has_flag(crate::slot::flags::POSITIONED));
    }
}
