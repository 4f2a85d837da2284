//! Typed get/set access to slot attributes by rule attribute code.
//!
//! Every code has a fixed read/write behaviour. Derived attributes ignore
//! writes; the justification and a few offset attributes are reserved and
//! always read 0. Failures never propagate: they are logged and the slot is
//! left as it was.

use crate::arena::SlotArena;
use crate::context::ShapingContext;
use crate::error::SlotError;
use crate::position::Position;
use crate::slot::SlotId;

/// Slot attribute codes as used by compiled rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AttrCode {
    AdvX = 0,
    AdvY = 1,
    AttTo = 2,
    AttX = 3,
    AttY = 4,
    AttGpt = 5,
    AttXOff = 6,
    AttYOff = 7,
    AttWithX = 8,
    AttWithY = 9,
    WithGpt = 10,
    AttWithXOff = 11,
    AttWithYOff = 12,
    AttLevel = 13,
    Break = 14,
    CompRef = 15,
    Dir = 16,
    Insert = 17,
    PosX = 18,
    PosY = 19,
    ShiftX = 20,
    ShiftY = 21,
    UserDefnV1 = 22,
    MeasureSol = 23,
    MeasureEol = 24,
    JStretch = 25,
    JShrink = 26,
    JStep = 27,
    JWeight = 28,
    JWidth = 29,
    UserDefn = 55,
}

impl AttrCode {
    pub fn from_code(code: u8) -> Option<Self> {
        use AttrCode::*;
        Some(match code {
            0 => AdvX,
            1 => AdvY,
            2 => AttTo,
            3 => AttX,
            4 => AttY,
            5 => AttGpt,
            6 => AttXOff,
            7 => AttYOff,
            8 => AttWithX,
            9 => AttWithY,
            10 => WithGpt,
            11 => AttWithXOff,
            12 => AttWithYOff,
            13 => AttLevel,
            14 => Break,
            15 => CompRef,
            16 => Dir,
            17 => Insert,
            18 => PosX,
            19 => PosY,
            20 => ShiftX,
            21 => ShiftY,
            22 => UserDefnV1,
            23 => MeasureSol,
            24 => MeasureEol,
            25 => JStretch,
            26 => JShrink,
            27 => JStep,
            28 => JWeight,
            29 => JWidth,
            55 => UserDefn,
            _ => return None,
        })
    }
}

/// Rule-local view from slot indices to live slots.
pub trait SlotMap {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<SlotId>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SlotMap for [SlotId] {
    fn len(&self) -> usize {
        <[SlotId]>::len(self)
    }

    fn get(&self, index: usize) -> Option<SlotId> {
        <[SlotId]>::get(self, index).copied()
    }
}

impl SlotMap for Vec<SlotId> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, index: usize) -> Option<SlotId> {
        self.as_slice().get(index).copied()
    }
}

impl SlotArena {
    /// Reads attribute `code` of `slot`. `subindex` selects a user attribute.
    ///
    /// Reads 0 when there is no slot or the code is unknown.
    pub fn get_attr<C>(&self, slot: Option<SlotId>, ctx: &C, code: u8, subindex: u8) -> i32
    where
        C: ShapingContext + ?Sized,
    {
        let Some(s) = slot.and_then(|id| self.get(id)) else {
            return 0;
        };
        let Some(mut attr) = AttrCode::from_code(code) else {
            return 0;
        };
        let mut subindex = usize::from(subindex);
        if attr == AttrCode::UserDefnV1 {
            attr = AttrCode::UserDefn;
            subindex = 0;
        }

        use AttrCode::*;
        match attr {
            AdvX => s.advance.x as i32,
            AdvY => s.advance.y as i32,
            AttX => s.attach.x as i32,
            AttY => s.attach.y as i32,
            AttWithX => s.with.x as i32,
            AttWithY => s.with.y as i32,
            AttLevel => i32::from(s.att_level),
            Break => ctx
                .char_info(s.original)
                .map_or(0, |c| i32::from(c.break_weight)),
            Dir => i32::from(ctx.dir()),
            Insert => i32::from(s.is_insert_before()),
            PosX => s.position.x as i32,
            PosY => s.position.y as i32,
            ShiftX => s.shift.x as i32,
            ShiftY => s.shift.y as i32,
            MeasureSol | MeasureEol => -1,
            UserDefn => s.user_attr(subindex).map_or(0, i32::from),
            AttTo | AttGpt | AttXOff | AttYOff | WithGpt | AttWithXOff | AttWithYOff
            | CompRef | JStretch | JShrink | JStep | JWeight | JWidth | UserDefnV1 => 0,
        }
    }

    /// Writes attribute `code` of `slot`. `map` resolves attach-to indices.
    ///
    /// Does nothing when there is no slot, the code is unknown or the
    /// attribute is read-only.
    pub fn set_attr<C, M>(
        &mut self,
        slot: Option<SlotId>,
        ctx: &mut C,
        code: u8,
        subindex: u8,
        value: i16,
        map: &M,
    ) where
        C: ShapingContext + ?Sized,
        M: SlotMap + ?Sized,
    {
        let Some(id) = slot.filter(|&id| self.get(id).is_some()) else {
            return;
        };
        let Some(mut attr) = AttrCode::from_code(code) else {
            return;
        };
        let mut subindex = usize::from(subindex);
        if attr == AttrCode::UserDefnV1 {
            attr = AttrCode::UserDefn;
            subindex = 0;
        }

        let v = f32::from(value);
        use AttrCode::*;
        match attr {
            AdvX => self[id].advance.x = v,
            AdvY => self[id].advance.y = v,
            AttTo => {
                if let Err(e) = self.attach_to_index(id, ctx, value, map) {
                    log::warn!("invalid slatAttTo {}: {}", value, e);
                }
            }
            AttX => self[id].attach.x = v,
            AttY => self[id].attach.y = v,
            AttWithX => self[id].with.x = v,
            AttWithY => self[id].with.y = v,
            AttLevel => self[id].att_level = value.clamp(-127, 127) as u8,
            Break => {
                let original = self[id].original;
                match ctx.char_info_mut(original) {
                    Some(c) => c.break_weight = value,
                    None => log::warn!("{}", SlotError::CharInfoOutOfRange(original)),
                }
            }
            Insert => self[id].mark_insert_before(value != 0),
            ShiftX => self[id].shift.x = v,
            ShiftY => self[id].shift.y = v,
            UserDefn => {
                if let Err(e) = self.set_user_attr(id, subindex, value) {
                    log::warn!("{}", e);
                }
            }
            AttGpt | AttXOff | AttYOff | WithGpt | AttWithXOff | AttWithYOff | CompRef | Dir
            | PosX | PosY | MeasureSol | MeasureEol | JStretch | JShrink | JStep | JWeight
            | JWidth | UserDefnV1 => {}
        }
    }

    /// Attaches `id` to the slot at `value` in `map`, defaulting the attach
    /// point to the target's natural advance.
    fn attach_to_index<C, M>(
        &mut self,
        id: SlotId,
        ctx: &C,
        value: i16,
        map: &M,
    ) -> Result<(), SlotError>
    where
        C: ShapingContext + ?Sized,
        M: SlotMap + ?Sized,
    {
        let index = value as u16;
        let target = map
            .get(usize::from(index))
            .ok_or(SlotError::AttachTargetOutOfRange {
                index,
                len: map.len(),
            })?;
        self.attach(id, target)?;
        let glyph = self[target].glyph_id;
        self[id].attach = Position::new(ctx.glyph_advance(glyph), 0.0);
        Ok(())
    }
}
