//! The allocation flags compound property.
//!
//! Controls how a container hands space to a widget:
//! - `hfill`/`vfill`: stretch the widget across the space it was given
//! - `hexpand`/`vexpand`: claim extra container space beyond the minimum
//! - `hembed`/`vembed`: embed the widget into the parent's frame, drawing
//!   without the usual separating gap
//!
//! The compound slot carries the comma-separated bareword list
//! (`"hfill,vexpand"`); per-flag boolean slots exist alongside it.

use bitflags::bitflags;

use horizon_trellis_core::Result;
use horizon_trellis_style::{Atom, EnumDef, StyleId, StyleSheet, StyleValue, parse};

use super::property::{MultiBinding, MultiCell, PropCtx, PropTag};

bitflags! {
    /// The raw allocation flag bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AllocFlags: u32 {
        const HFILL   = 1 << 0;
        const VFILL   = 1 << 1;
        const HEXPAND = 1 << 2;
        const VEXPAND = 1 << 3;
        const HEMBED  = 1 << 4;
        const VEMBED  = 1 << 5;
    }
}

const P_VALUE: usize = 0;
const P_HFILL: usize = 1;
const P_VFILL: usize = 2;
const P_HEXPAND: usize = 3;
const P_VEXPAND: usize = 4;
const P_HEMBED: usize = 5;
const P_VEMBED: usize = 6;

const SUFFIXES: &[&str] = &[
    "", ".hfill", ".vfill", ".hexpand", ".vexpand", ".hembed", ".vembed",
];

const FLAG_DEFS: &[EnumDef] = &[
    EnumDef::new("hfill", AllocFlags::HFILL.bits() as i64),
    EnumDef::new("vfill", AllocFlags::VFILL.bits() as i64),
    EnumDef::new("hexpand", AllocFlags::HEXPAND.bits() as i64),
    EnumDef::new("vexpand", AllocFlags::VEXPAND.bits() as i64),
    EnumDef::new("hembed", AllocFlags::HEMBED.bits() as i64),
    EnumDef::new("vembed", AllocFlags::VEMBED.bits() as i64),
];

const COMPONENT_BITS: [AllocFlags; 6] = [
    AllocFlags::HFILL,
    AllocFlags::VFILL,
    AllocFlags::HEXPAND,
    AllocFlags::VEXPAND,
    AllocFlags::HEMBED,
    AllocFlags::VEMBED,
];

/// The style-bindable allocation property.
pub struct Allocation {
    cell: MultiCell,
    binding: Option<MultiBinding>,
    value: AllocFlags,
}

impl Allocation {
    pub fn new(tag: PropTag) -> Self {
        Self {
            cell: MultiCell::new(tag),
            binding: None,
            value: AllocFlags::empty(),
        }
    }

    pub fn flags(&self) -> AllocFlags {
        self.value
    }

    pub fn hfill(&self) -> bool {
        self.value.contains(AllocFlags::HFILL)
    }

    pub fn vfill(&self) -> bool {
        self.value.contains(AllocFlags::VFILL)
    }

    pub fn hexpand(&self) -> bool {
        self.value.contains(AllocFlags::HEXPAND)
    }

    pub fn vexpand(&self) -> bool {
        self.value.contains(AllocFlags::VEXPAND)
    }

    pub fn hembed(&self) -> bool {
        self.value.contains(AllocFlags::HEMBED)
    }

    pub fn vembed(&self) -> bool {
        self.value.contains(AllocFlags::VEMBED)
    }

    pub fn bind(&mut self, name: &str, style: StyleId, ctx: &mut PropCtx<'_>) -> Result<()> {
        if self.binding.is_some() {
            return Err(horizon_trellis_core::Status::AlreadyBound);
        }
        let binding = MultiBinding::bind(name, SUFFIXES, style, ctx)?;
        for (i, bit) in COMPONENT_BITS.iter().enumerate() {
            if let Some(v) = ctx
                .sheet
                .get(style, binding.atoms[i + 1])
                .and_then(StyleValue::as_bool)
            {
                self.value.set(*bit, v);
            }
        }
        self.binding = Some(binding);
        Ok(())
    }

    pub fn unbind(&mut self, sheet: &mut StyleSheet) {
        if let Some(b) = self.binding.take() {
            b.unbind(sheet);
        }
    }

    pub fn set_flags(&mut self, flags: AllocFlags, ctx: &mut PropCtx<'_>) -> AllocFlags {
        if self.value == flags {
            return flags;
        }
        let old = std::mem::replace(&mut self.value, flags);
        self.sync(ctx);
        old
    }

    fn set_bit(&mut self, bit: AllocFlags, on: bool, ctx: &mut PropCtx<'_>) -> bool {
        let old = self.value.contains(bit);
        if old != on {
            self.value.set(bit, on);
            self.sync(ctx);
        }
        old
    }

    pub fn set_hfill(&mut self, on: bool, ctx: &mut PropCtx<'_>) -> bool {
        self.set_bit(AllocFlags::HFILL, on, ctx)
    }

    pub fn set_vfill(&mut self, on: bool, ctx: &mut PropCtx<'_>) -> bool {
        self.set_bit(AllocFlags::VFILL, on, ctx)
    }

    pub fn set_hexpand(&mut self, on: bool, ctx: &mut PropCtx<'_>) -> bool {
        self.set_bit(AllocFlags::HEXPAND, on, ctx)
    }

    pub fn set_vexpand(&mut self, on: bool, ctx: &mut PropCtx<'_>) -> bool {
        self.set_bit(AllocFlags::VEXPAND, on, ctx)
    }

    pub fn set_hembed(&mut self, on: bool, ctx: &mut PropCtx<'_>) -> bool {
        self.set_bit(AllocFlags::HEMBED, on, ctx)
    }

    pub fn set_vembed(&mut self, on: bool, ctx: &mut PropCtx<'_>) -> bool {
        self.set_bit(AllocFlags::VEMBED, on, ctx)
    }

    pub fn set_fill(&mut self, hor: bool, vert: bool, ctx: &mut PropCtx<'_>) {
        let mut f = self.value;
        f.set(AllocFlags::HFILL, hor);
        f.set(AllocFlags::VFILL, vert);
        self.set_flags(f, ctx);
    }

    pub fn set_expand(&mut self, hor: bool, vert: bool, ctx: &mut PropCtx<'_>) {
        let mut f = self.value;
        f.set(AllocFlags::HEXPAND, hor);
        f.set(AllocFlags::VEXPAND, vert);
        self.set_flags(f, ctx);
    }

    pub fn set_embed(&mut self, hor: bool, vert: bool, ctx: &mut PropCtx<'_>) {
        let mut f = self.value;
        f.set(AllocFlags::HEMBED, hor);
        f.set(AllocFlags::VEMBED, vert);
        self.set_flags(f, ctx);
    }

    fn sync(&mut self, ctx: &mut PropCtx<'_>) {
        if let Some(b) = &self.binding {
            if ctx.sheet.config_mode() {
                let origin = Some(b.listener);
                let mut updates = Vec::new();
                for (i, bit) in COMPONENT_BITS.iter().enumerate() {
                    updates.extend(ctx.sheet.set(
                        b.node,
                        b.atoms[i + 1],
                        StyleValue::Bool(self.value.contains(*bit)),
                        origin,
                    ));
                }
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_VALUE],
                    StyleValue::String(parse::format_bit_flags(self.value.bits(), FLAG_DEFS)),
                    origin,
                ));
                ctx.push_updates(updates);
                return;
            }
        }
        self.cell.queue_notify(ctx);
    }

    pub fn commit(&mut self, atom: Atom, ctx: &mut PropCtx<'_>) -> bool {
        let Some(b) = &self.binding else {
            return false;
        };
        let Some(index) = b.index_of(atom) else {
            return false;
        };
        let node = b.node;
        let mut next = self.value;
        match index {
            P_VALUE => {
                if let Some(bits) = ctx
                    .sheet
                    .get(node, atom)
                    .and_then(StyleValue::as_str)
                    .and_then(|s| parse::parse_bit_flags(s, FLAG_DEFS))
                {
                    next = AllocFlags::from_bits_truncate(bits);
                }
            }
            P_HFILL | P_VFILL | P_HEXPAND | P_VEXPAND | P_HEMBED | P_VEMBED => {
                if let Some(v) = ctx.sheet.get(node, atom).and_then(StyleValue::as_bool) {
                    next.set(COMPONENT_BITS[index - 1], v);
                }
            }
            _ => {}
        }
        if next != self.value {
            self.value = next;
            self.cell.queue_notify(ctx);
        }
        true
    }

    pub fn poll(&mut self) -> Option<PropTag> {
        self.cell.poll()
    }

    pub fn lock_if(&mut self, tag: PropTag, locked: bool) -> bool {
        self.cell.lock_if(tag, locked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_list_round_trip() {
        let bits = parse::parse_bit_flags("hfill,vexpand", FLAG_DEFS).unwrap();
        let flags = AllocFlags::from_bits_truncate(bits);
        assert!(flags.contains(AllocFlags::HFILL));
        assert!(flags.contains(AllocFlags::VEXPAND));
        assert_eq!(
            parse::format_bit_flags(flags.bits(), FLAG_DEFS),
            "hfill,vexpand"
        );
    }

    #[test]
    fn embed_setters_touch_embed_bits() {
        // The original implementation mutated the expand bits here; that was
        // a defect and these setters deliberately address the embed bits.
        let mut a = Allocation::new(PropTag(50));
        a.value = AllocFlags::empty();
        a.value.set(AllocFlags::HEMBED, true);
        assert!(a.hembed());
        assert!(!a.hexpand());
        a.value.set(AllocFlags::VEMBED, true);
        assert!(a.vembed());
        assert!(!a.vexpand());
    }
}
