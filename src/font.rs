//! Rendering-font capability consumed by the resolver.

/// A font instance at a particular size.
///
/// Passing no font to the resolver means an unscaled, unhinted query in
/// design units.
pub trait Font {
    /// Design units to device pixels.
    fn scale(&self) -> f32;

    /// Whether advances come from hinted device metrics rather than
    /// linear scaling.
    fn is_hinted(&self) -> bool;

    /// Hinted advance of `glyph_id` in device pixels.
    fn advance(&self, glyph_id: u16) -> f32;
}

/// Font with a linear scale and an optional table of hinted advances.
#[derive(Debug, Clone, Default)]
pub struct ScaledFont {
    scale: f32,
    hinted_advances: Option<Vec<f32>>,
}

impl ScaledFont {
    /// Unhinted font scaling design units by `ppem / units_per_em`.
    pub fn new(ppem: f32, units_per_em: u16) -> Self {
        Self::with_scale(ppem / f32::from(units_per_em.max(1)))
    }

    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale,
            hinted_advances: None,
        }
    }

    /// Switch to hinted advances, indexed by glyph id. Glyphs past the end of
    /// the table have a zero hinted advance.
    #[must_use]
    pub fn hinted(mut self, advances: Vec<f32>) -> Self {
        self.hinted_advances = Some(advances);
        self
    }
}

impl Font for ScaledFont {
    #[inline]
    fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    fn is_hinted(&self) -> bool {
        self.hinted_advances.is_some()
    }

    fn advance(&self, glyph_id: u16) -> f32 {
        self.hinted_advances
            .as_ref()
            .and_then(|adv| adv.get(usize::from(glyph_id)).copied())
            .unwrap_or(0.0)
    }
}
