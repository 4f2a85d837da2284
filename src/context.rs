//! Shaping-session services the positioning code reads from: glyph faces,
//! per-character records and the run direction.

use crate::position::{Position, Rect};

/// Direction flag bit marking a right-to-left run.
pub const DIR_RTL: u8 = 1;

/// Outline metrics of one glyph in design units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphFace {
    pub advance: Position,
    pub bbox: Rect,
    attrs: Vec<u16>,
}

impl GlyphFace {
    pub fn new(advance: Position, bbox: Rect) -> Self {
        Self {
            advance,
            bbox,
            attrs: Vec::new(),
        }
    }

    /// Attach the glyph attribute table.
    #[must_use]
    pub fn with_attrs(mut self, attrs: Vec<u16>) -> Self {
        self.attrs = attrs;
        self
    }

    /// Glyph attribute value, 0 when the glyph does not define it.
    #[inline]
    pub fn attr(&self, index: u16) -> u16 {
        self.attrs.get(usize::from(index)).copied().unwrap_or(0)
    }
}

/// Per-character record of the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharInfo {
    pub unicode: u32,
    pub break_weight: i16,
}

impl CharInfo {
    pub const fn new(unicode: u32) -> Self {
        Self {
            unicode,
            break_weight: 0,
        }
    }
}

/// What the positioning code needs from the surrounding shaping session.
pub trait ShapingContext {
    /// Face record for `glyph_id`, `None` for an invalid id.
    fn glyph_face(&self, glyph_id: u16) -> Option<&GlyphFace>;

    /// Natural advance used when no face record exists.
    fn glyph_advance(&self, glyph_id: u16) -> f32 {
        self.glyph_face(glyph_id).map_or(0.0, |f| f.advance.x)
    }

    fn char_info(&self, index: usize) -> Option<&CharInfo>;

    fn char_info_mut(&mut self, index: usize) -> Option<&mut CharInfo>;

    /// Direction flags; bit 0 set means right-to-left.
    fn dir(&self) -> u8;

    /// Glyph attribute holding a pseudo glyph's real glyph id.
    fn pseudo_attr(&self) -> u16;
}

/// In-memory shaping context over a face table and a character array.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    faces: Vec<GlyphFace>,
    chars: Vec<CharInfo>,
    dir: u8,
    pseudo_attr: u16,
}

impl Segment {
    pub fn new(faces: Vec<GlyphFace>, chars: Vec<CharInfo>) -> Self {
        Self {
            faces,
            chars,
            dir: 0,
            pseudo_attr: 0,
        }
    }

    /// Build the character records from text.
    pub fn from_text(faces: Vec<GlyphFace>, text: &str) -> Self {
        Self::new(faces, text.chars().map(|c| CharInfo::new(c.into())).collect())
    }

    #[must_use]
    pub fn with_dir(mut self, dir: u8) -> Self {
        self.dir = dir;
        self
    }

    #[must_use]
    pub fn with_pseudo_attr(mut self, attr: u16) -> Self {
        self.pseudo_attr = attr;
        self
    }

    #[inline]
    pub fn is_rtl(&self) -> bool {
        self.dir & DIR_RTL != 0
    }

    pub fn num_chars(&self) -> usize {
        self.chars.len()
    }
}

impl ShapingContext for Segment {
    #[inline]
    fn glyph_face(&self, glyph_id: u16) -> Option<&GlyphFace> {
        self.faces.get(usize::from(glyph_id))
    }

    fn char_info(&self, index: usize) -> Option<&CharInfo> {
        self.chars.get(index)
    }

    fn char_info_mut(&mut self, index: usize) -> Option<&mut CharInfo> {
        self.chars.get_mut(index)
    }

    #[inline]
    fn dir(&self) -> u8 {
        self.dir
    }

    #[inline]
    fn pseudo_attr(&self) -> u16 {
        self.pseudo_attr
    }
}
