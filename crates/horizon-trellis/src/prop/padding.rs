//! The padding compound property.
//!
//! Four non-negative edge widths. Padding belongs to the widget but is the
//! *parent's* responsibility during layout: a widget reports its size limits
//! without padding and receives its realized rectangle net of padding.
//!
//! Textual forms:
//! - native order `"left right top bottom"`, with shorthands:
//!   one value sets all four sides, two set left/right then top/bottom,
//!   three set left, right, then top/bottom
//! - CSS order `"top right bottom left"` on the `.css` slot, with the CSS
//!   shorthand expansions

use horizon_trellis_core::Result;
use horizon_trellis_draw::{Rect, SizeLimit};
use horizon_trellis_style::{Atom, StyleId, StyleSheet, StyleValue, parse};

use super::property::{MultiBinding, MultiCell, PropCtx, PropTag};

const P_VALUE: usize = 0;
const P_LEFT: usize = 1;
const P_RIGHT: usize = 2;
const P_TOP: usize = 3;
const P_BOTTOM: usize = 4;
const P_CSS: usize = 5;

const SUFFIXES: &[&str] = &["", ".left", ".right", ".top", ".bottom", ".css"];

/// The plain padding value, in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddingValue {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl PaddingValue {
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub const fn all(value: u32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Parse the native order form. `None` means "no change".
    pub fn parse(text: &str) -> Option<Self> {
        let mut vv = [0i64; 4];
        let n = parse::parse_ints(&mut vv, text);
        let v = |i: usize| vv[i].max(0) as u32;
        match n {
            1 => Some(Self::all(v(0))),
            2 => Some(Self::new(v(0), v(0), v(1), v(1))),
            3 => Some(Self::new(v(0), v(1), v(2), v(2))),
            4 => Some(Self::new(v(0), v(1), v(2), v(3))),
            _ => None,
        }
    }

    /// Parse the CSS order form. `None` means "no change".
    pub fn parse_css(text: &str) -> Option<Self> {
        let mut vv = [0i64; 4];
        let n = parse::parse_ints(&mut vv, text);
        let v = |i: usize| vv[i].max(0) as u32;
        match n {
            1 => Some(Self::all(v(0))),
            2 => Some(Self::new(v(1), v(1), v(0), v(0))),
            3 => Some(Self::new(v(1), v(1), v(0), v(2))),
            4 => Some(Self::new(v(3), v(1), v(0), v(2))),
            _ => None,
        }
    }

    pub fn format(&self) -> String {
        format!("{} {} {} {}", self.left, self.right, self.top, self.bottom)
    }

    pub fn format_css(&self) -> String {
        format!("{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }

    fn scaled(&self, scale: f32) -> (i32, i32, i32, i32) {
        let k = scale.max(0.0);
        let s = |v: u32| (v as f32 * k) as i32;
        (s(self.left), s(self.right), s(self.top), s(self.bottom))
    }

    /// Grow a size limit by the padding, honoring `-1` sentinels.
    pub fn add_to_limit(&self, dst: &mut SizeLimit, scale: f32) {
        let (l, r, t, b) = self.scaled(scale);
        let hor = l + r;
        let vert = t + b;

        dst.min_width = if dst.min_width < 0 {
            hor
        } else {
            dst.min_width + hor
        };
        dst.min_height = if dst.min_height < 0 {
            vert
        } else {
            dst.min_height + vert
        };
        if dst.max_width >= 0 {
            dst.max_width += hor;
        }
        if dst.max_height >= 0 {
            dst.max_height += vert;
        }
    }

    /// Shrink an allocated rectangle to the content area inside the padding.
    ///
    /// The result never goes negative in either dimension.
    pub fn enter(&self, rect: Rect, scale: f32) -> Rect {
        let (l, r, t, b) = self.scaled(scale);
        Rect::new(
            rect.left + l,
            rect.top + t,
            (rect.width - l - r).max(0),
            (rect.height - t - b).max(0),
        )
    }
}

/// The style-bindable padding property.
pub struct Padding {
    cell: MultiCell,
    binding: Option<MultiBinding>,
    value: PaddingValue,
}

impl Padding {
    pub fn new(tag: PropTag) -> Self {
        Self {
            cell: MultiCell::new(tag),
            binding: None,
            value: PaddingValue::default(),
        }
    }

    pub fn get(&self) -> PaddingValue {
        self.value
    }

    pub fn bind(&mut self, name: &str, style: StyleId, ctx: &mut PropCtx<'_>) -> Result<()> {
        if self.binding.is_some() {
            return Err(horizon_trellis_core::Status::AlreadyBound);
        }
        let binding = MultiBinding::bind(name, SUFFIXES, style, ctx)?;
        // Adopt any defaults the cascade already holds.
        let read = |i: usize| {
            ctx.sheet
                .get(style, binding.atoms[i])
                .and_then(StyleValue::as_int)
        };
        if let Some(v) = read(P_LEFT) {
            self.value.left = v.max(0) as u32;
        }
        if let Some(v) = read(P_RIGHT) {
            self.value.right = v.max(0) as u32;
        }
        if let Some(v) = read(P_TOP) {
            self.value.top = v.max(0) as u32;
        }
        if let Some(v) = read(P_BOTTOM) {
            self.value.bottom = v.max(0) as u32;
        }
        self.binding = Some(binding);
        Ok(())
    }

    pub fn unbind(&mut self, sheet: &mut StyleSheet) {
        if let Some(b) = self.binding.take() {
            b.unbind(sheet);
        }
    }

    pub fn set(&mut self, value: PaddingValue, ctx: &mut PropCtx<'_>) -> PaddingValue {
        if self.value == value {
            return value;
        }
        let old = std::mem::replace(&mut self.value, value);
        self.sync(ctx);
        old
    }

    pub fn set_all(&mut self, value: u32, ctx: &mut PropCtx<'_>) -> PaddingValue {
        self.set(PaddingValue::all(value), ctx)
    }

    pub fn set_left(&mut self, value: u32, ctx: &mut PropCtx<'_>) -> u32 {
        let old = self.value.left;
        if old != value {
            self.value.left = value;
            self.sync(ctx);
        }
        old
    }

    pub fn set_right(&mut self, value: u32, ctx: &mut PropCtx<'_>) -> u32 {
        let old = self.value.right;
        if old != value {
            self.value.right = value;
            self.sync(ctx);
        }
        old
    }

    pub fn set_top(&mut self, value: u32, ctx: &mut PropCtx<'_>) -> u32 {
        let old = self.value.top;
        if old != value {
            self.value.top = value;
            self.sync(ctx);
        }
        old
    }

    pub fn set_bottom(&mut self, value: u32, ctx: &mut PropCtx<'_>) -> u32 {
        let old = self.value.bottom;
        if old != value {
            self.value.bottom = value;
            self.sync(ctx);
        }
        old
    }

    fn sync(&mut self, ctx: &mut PropCtx<'_>) {
        if let Some(b) = &self.binding {
            if ctx.sheet.config_mode() {
                let v = self.value;
                let origin = Some(b.listener);
                let mut updates = Vec::new();
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_LEFT],
                    StyleValue::Int(v.left as i64),
                    origin,
                ));
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_RIGHT],
                    StyleValue::Int(v.right as i64),
                    origin,
                ));
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_TOP],
                    StyleValue::Int(v.top as i64),
                    origin,
                ));
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_BOTTOM],
                    StyleValue::Int(v.bottom as i64),
                    origin,
                ));
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_VALUE],
                    StyleValue::String(v.format()),
                    origin,
                ));
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_CSS],
                    StyleValue::String(v.format_css()),
                    origin,
                ));
                ctx.push_updates(updates);
                return;
            }
        }
        self.cell.queue_notify(ctx);
    }

    /// Route an external cascade change. Returns `true` when the atom is one
    /// of this property's slots.
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
            P_LEFT | P_RIGHT | P_TOP | P_BOTTOM => {
                if let Some(v) = ctx.sheet.get(node, atom).and_then(StyleValue::as_int) {
                    let v = v.max(0) as u32;
                    match index {
                        P_LEFT => next.left = v,
                        P_RIGHT => next.right = v,
                        P_TOP => next.top = v,
                        _ => next.bottom = v,
                    }
                }
            }
            P_VALUE => {
                if let Some(v) = ctx
                    .sheet
                    .get(node, atom)
                    .and_then(StyleValue::as_str)
                    .and_then(PaddingValue::parse)
                {
                    next = v;
                }
            }
            P_CSS => {
                if let Some(v) = ctx
                    .sheet
                    .get(node, atom)
                    .and_then(StyleValue::as_str)
                    .and_then(PaddingValue::parse_css)
                {
                    next = v;
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
    fn native_order_shorthands() {
        assert_eq!(PaddingValue::parse("4"), Some(PaddingValue::all(4)));
        assert_eq!(
            PaddingValue::parse("2 4"),
            Some(PaddingValue::new(2, 2, 4, 4))
        );
        assert_eq!(
            PaddingValue::parse("1 2 3"),
            Some(PaddingValue::new(1, 2, 3, 3))
        );
        assert_eq!(
            PaddingValue::parse("1 2 3 4"),
            Some(PaddingValue::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn css_order() {
        // "top right bottom left"
        assert_eq!(
            PaddingValue::parse_css("1 2 3 4"),
            Some(PaddingValue::new(4, 2, 1, 3))
        );
        assert_eq!(
            PaddingValue::parse_css("5 6"),
            Some(PaddingValue::new(6, 6, 5, 5))
        );
    }

    #[test]
    fn malformed_text_is_no_change() {
        assert_eq!(PaddingValue::parse("a b"), None);
        assert_eq!(PaddingValue::parse(""), None);
        assert_eq!(PaddingValue::parse("1 2 3 4 5"), None);
        assert_eq!(PaddingValue::parse_css("1.5"), None);
    }

    #[test]
    fn negative_components_clamp_to_zero() {
        assert_eq!(
            PaddingValue::parse("-3 7"),
            Some(PaddingValue::new(0, 0, 7, 7))
        );
    }

    #[test]
    fn add_to_limit_honors_sentinels() {
        let p = PaddingValue::new(1, 2, 3, 4);
        let mut l = SizeLimit::UNCONSTRAINED;
        p.add_to_limit(&mut l, 1.0);
        assert_eq!(l, SizeLimit::new(3, 7, -1, -1));

        let mut l = SizeLimit::new(10, 10, 20, 20);
        p.add_to_limit(&mut l, 1.0);
        assert_eq!(l, SizeLimit::new(13, 17, 23, 27));
    }

    #[test]
    fn enter_never_negative() {
        let p = PaddingValue::all(10);
        let r = p.enter(Rect::new(0, 0, 12, 12), 1.0);
        assert_eq!(r, Rect::new(10, 10, 0, 0));

        let r = p.enter(Rect::new(5, 5, 100, 50), 1.0);
        assert_eq!(r, Rect::new(15, 15, 80, 30));
    }

    #[test]
    fn scaling_multiplies_padding() {
        let p = PaddingValue::all(4);
        let mut l = SizeLimit::new(0, 0, -1, -1);
        p.add_to_limit(&mut l, 2.0);
        assert_eq!((l.min_width, l.min_height), (16, 16));
    }

    #[test]
    fn format_round_trips() {
        let p = PaddingValue::new(1, 2, 3, 4);
        assert_eq!(PaddingValue::parse(&p.format()), Some(p));
        assert_eq!(PaddingValue::parse_css(&p.format_css()), Some(p));
    }
}
