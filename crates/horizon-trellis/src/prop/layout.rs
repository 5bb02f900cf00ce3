//! The layout compound property: alignment and scale of a child within an
//! allocated rectangle.
//!
//! Alignment runs from `-1` (left/top) through `0` (centered) to `+1`
//! (right/bottom). Scale runs from `0` (child keeps its minimum size) to `1`
//! (child takes all the space it is allowed to). The textual form is four
//! floats `"halign valign hscale vscale"`; a two-float form sets the
//! alignments and leaves the scales.

use horizon_trellis_core::Result;
use horizon_trellis_draw::{Rect, SizeLimit};
use horizon_trellis_style::{Atom, StyleId, StyleSheet, StyleValue, parse};

use super::property::{MultiBinding, MultiCell, PropCtx, PropTag};

const P_VALUE: usize = 0;
const P_HALIGN: usize = 1;
const P_VALIGN: usize = 2;
const P_HSCALE: usize = 3;
const P_VSCALE: usize = 4;

const SUFFIXES: &[&str] = &["", ".halign", ".valign", ".hscale", ".vscale"];

/// The plain layout value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutValue {
    pub halign: f32,
    pub valign: f32,
    pub hscale: f32,
    pub vscale: f32,
}

impl Default for LayoutValue {
    fn default() -> Self {
        Self {
            halign: 0.0,
            valign: 0.0,
            hscale: 0.0,
            vscale: 0.0,
        }
    }
}

impl LayoutValue {
    pub const fn new(halign: f32, valign: f32, hscale: f32, vscale: f32) -> Self {
        Self {
            halign,
            valign,
            hscale,
            vscale,
        }
    }

    /// Parse `"halign valign"` or `"halign valign hscale vscale"`.
    pub fn parse(text: &str) -> Option<Self> {
        let mut vv = [0f32; 4];
        match parse::parse_floats(&mut vv, text) {
            2 => Some(Self::new(vv[0], vv[1], 0.0, 0.0)),
            4 => Some(Self::new(vv[0], vv[1], vv[2], vv[3])),
            _ => None,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{:.4} {:.4} {:.4} {:.4}",
            self.halign, self.valign, self.hscale, self.vscale
        )
    }

    /// Place a child with size limits `limit` inside `avail`.
    ///
    /// The child starts at its minimum, grows by the scale share of the
    /// leftover space, and is clamped by its maximum. When the available
    /// space is below the child's minimum, the child keeps its minimum and
    /// overflows; the caller clips at render time. The result never has a
    /// negative dimension.
    pub fn apply(&self, avail: Rect, limit: &SizeLimit) -> Rect {
        let (w, x) = Self::apply_axis(
            avail.left,
            avail.width,
            limit.min_width,
            limit.max_width,
            self.halign,
            self.hscale,
        );
        let (h, y) = Self::apply_axis(
            avail.top,
            avail.height,
            limit.min_height,
            limit.max_height,
            self.valign,
            self.vscale,
        );
        Rect::new(x, y, w, h)
    }

    fn apply_axis(origin: i32, avail: i32, min: i32, max: i32, align: f32, scale: f32) -> (i32, i32) {
        let min = min.max(0);
        let mut size = min;
        if avail > size {
            size += ((avail - size) as f32 * scale.clamp(0.0, 1.0)) as i32;
        }
        if max >= 0 {
            size = size.min(max.max(min));
        }
        let align = align.clamp(-1.0, 1.0);
        let pos = origin + (((avail - size) as f32) * (align + 1.0) * 0.5) as i32;
        (size, pos)
    }
}

/// The style-bindable layout property.
pub struct Layout {
    cell: MultiCell,
    binding: Option<MultiBinding>,
    value: LayoutValue,
}

impl Layout {
    pub fn new(tag: PropTag) -> Self {
        Self {
            cell: MultiCell::new(tag),
            binding: None,
            value: LayoutValue::default(),
        }
    }

    pub fn get(&self) -> LayoutValue {
        self.value
    }

    pub fn bind(&mut self, name: &str, style: StyleId, ctx: &mut PropCtx<'_>) -> Result<()> {
        if self.binding.is_some() {
            return Err(horizon_trellis_core::Status::AlreadyBound);
        }
        let binding = MultiBinding::bind(name, SUFFIXES, style, ctx)?;
        let read = |i: usize| {
            ctx.sheet
                .get(style, binding.atoms[i])
                .and_then(StyleValue::as_float)
        };
        if let Some(v) = read(P_HALIGN) {
            self.value.halign = v;
        }
        if let Some(v) = read(P_VALIGN) {
            self.value.valign = v;
        }
        if let Some(v) = read(P_HSCALE) {
            self.value.hscale = v;
        }
        if let Some(v) = read(P_VSCALE) {
            self.value.vscale = v;
        }
        self.binding = Some(binding);
        Ok(())
    }

    pub fn unbind(&mut self, sheet: &mut StyleSheet) {
        if let Some(b) = self.binding.take() {
            b.unbind(sheet);
        }
    }

    pub fn set(&mut self, value: LayoutValue, ctx: &mut PropCtx<'_>) -> LayoutValue {
        if self.value == value {
            return value;
        }
        let old = std::mem::replace(&mut self.value, value);
        self.sync(ctx);
        old
    }

    pub fn set_align(&mut self, halign: f32, valign: f32, ctx: &mut PropCtx<'_>) {
        let mut v = self.value;
        v.halign = halign;
        v.valign = valign;
        self.set(v, ctx);
    }

    pub fn set_scale(&mut self, hscale: f32, vscale: f32, ctx: &mut PropCtx<'_>) {
        let mut v = self.value;
        v.hscale = hscale;
        v.vscale = vscale;
        self.set(v, ctx);
    }

    fn sync(&mut self, ctx: &mut PropCtx<'_>) {
        if let Some(b) = &self.binding {
            if ctx.sheet.config_mode() {
                let v = self.value;
                let origin = Some(b.listener);
                let mut updates = Vec::new();
                for (i, raw) in [
                    (P_HALIGN, v.halign),
                    (P_VALIGN, v.valign),
                    (P_HSCALE, v.hscale),
                    (P_VSCALE, v.vscale),
                ] {
                    updates.extend(ctx.sheet.set(
                        b.node,
                        b.atoms[i],
                        StyleValue::Float(raw),
                        origin,
                    ));
                }
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_VALUE],
                    StyleValue::String(v.format()),
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
                if let Some(v) = ctx
                    .sheet
                    .get(node, atom)
                    .and_then(StyleValue::as_str)
                    .and_then(LayoutValue::parse)
                {
                    next = v;
                }
            }
            P_HALIGN | P_VALIGN | P_HSCALE | P_VSCALE => {
                if let Some(v) = ctx.sheet.get(node, atom).and_then(StyleValue::as_float) {
                    match index {
                        P_HALIGN => next.halign = v,
                        P_VALIGN => next.valign = v,
                        P_HSCALE => next.hscale = v,
                        _ => next.vscale = v,
                    }
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
