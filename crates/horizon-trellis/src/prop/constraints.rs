//! The size-constraints compound property.
//!
//! Explicit min/max overrides a widget applies to its computed size limits,
//! always after combining children. `-1` leaves a bound unconstrained.

use horizon_trellis_core::Result;
use horizon_trellis_draw::SizeLimit;
use horizon_trellis_style::{Atom, StyleId, StyleSheet, StyleValue, parse};

use super::property::{MultiBinding, MultiCell, PropCtx, PropTag};

const P_VALUE: usize = 0;
const P_MIN_WIDTH: usize = 1;
const P_MIN_HEIGHT: usize = 2;
const P_MAX_WIDTH: usize = 3;
const P_MAX_HEIGHT: usize = 4;

const SUFFIXES: &[&str] = &["", ".min_width", ".min_height", ".max_width", ".max_height"];

fn parse_limit(text: &str) -> Option<SizeLimit> {
    let mut vv = [0i64; 4];
    if parse::parse_ints(&mut vv, text) != 4 {
        return None;
    }
    let v = |i: usize| (vv[i].max(-1)) as i32;
    Some(SizeLimit::new(v(0), v(1), v(2), v(3)))
}

fn format_limit(l: &SizeLimit) -> String {
    format!(
        "{} {} {} {}",
        l.min_width, l.min_height, l.max_width, l.max_height
    )
}

/// The style-bindable size-constraints property.
pub struct SizeConstraints {
    cell: MultiCell,
    binding: Option<MultiBinding>,
    value: SizeLimit,
}

impl SizeConstraints {
    pub fn new(tag: PropTag) -> Self {
        Self {
            cell: MultiCell::new(tag),
            binding: None,
            value: SizeLimit::UNCONSTRAINED,
        }
    }

    pub fn get(&self) -> SizeLimit {
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
                .and_then(StyleValue::as_int)
                .map(|v| v.max(-1) as i32)
        };
        if let Some(v) = read(P_MIN_WIDTH) {
            self.value.min_width = v;
        }
        if let Some(v) = read(P_MIN_HEIGHT) {
            self.value.min_height = v;
        }
        if let Some(v) = read(P_MAX_WIDTH) {
            self.value.max_width = v;
        }
        if let Some(v) = read(P_MAX_HEIGHT) {
            self.value.max_height = v;
        }
        self.binding = Some(binding);
        Ok(())
    }

    pub fn unbind(&mut self, sheet: &mut StyleSheet) {
        if let Some(b) = self.binding.take() {
            b.unbind(sheet);
        }
    }

    pub fn set(&mut self, value: SizeLimit, ctx: &mut PropCtx<'_>) -> SizeLimit {
        if self.value == value {
            return value;
        }
        let old = std::mem::replace(&mut self.value, value);
        self.sync(ctx);
        old
    }

    pub fn set_min(&mut self, width: i32, height: i32, ctx: &mut PropCtx<'_>) {
        let mut v = self.value;
        v.min_width = width;
        v.min_height = height;
        self.set(v, ctx);
    }

    pub fn set_max(&mut self, width: i32, height: i32, ctx: &mut PropCtx<'_>) {
        let mut v = self.value;
        v.max_width = width;
        v.max_height = height;
        self.set(v, ctx);
    }

    /// Pin both axes to an exact size.
    pub fn set_fixed(&mut self, width: i32, height: i32, ctx: &mut PropCtx<'_>) {
        self.set(SizeLimit::fixed(width, height), ctx);
    }

    fn sync(&mut self, ctx: &mut PropCtx<'_>) {
        if let Some(b) = &self.binding {
            if ctx.sheet.config_mode() {
                let v = self.value;
                let origin = Some(b.listener);
                let mut updates = Vec::new();
                for (i, raw) in [
                    (P_MIN_WIDTH, v.min_width),
                    (P_MIN_HEIGHT, v.min_height),
                    (P_MAX_WIDTH, v.max_width),
                    (P_MAX_HEIGHT, v.max_height),
                ] {
                    updates.extend(ctx.sheet.set(
                        b.node,
                        b.atoms[i],
                        StyleValue::Int(raw as i64),
                        origin,
                    ));
                }
                updates.extend(ctx.sheet.set(
                    b.node,
                    b.atoms[P_VALUE],
                    StyleValue::String(format_limit(&v)),
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
            P_MIN_WIDTH | P_MIN_HEIGHT | P_MAX_WIDTH | P_MAX_HEIGHT => {
                if let Some(v) = ctx.sheet.get(node, atom).and_then(StyleValue::as_int) {
                    let v = v.max(-1) as i32;
                    match index {
                        P_MIN_WIDTH => next.min_width = v,
                        P_MIN_HEIGHT => next.min_height = v,
                        P_MAX_WIDTH => next.max_width = v,
                        _ => next.max_height = v,
                    }
                }
            }
            P_VALUE => {
                if let Some(v) = ctx
                    .sheet
                    .get(node, atom)
                    .and_then(StyleValue::as_str)
                    .and_then(parse_limit)
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

    /// Scale the constraints, preserving `-1` sentinels.
    pub fn compute(&self, scale: f32) -> SizeLimit {
        let k = scale.max(0.0);
        let s = |v: i32| if v < 0 { -1 } else { (v as f32 * k) as i32 };
        SizeLimit::new(
            s(self.value.min_width),
            s(self.value.min_height),
            s(self.value.max_width),
            s(self.value.max_height),
        )
    }

    /// Override a computed size limit with these constraints.
    ///
    /// Set bounds replace the computed ones; when a resulting maximum drops
    /// below the minimum the maximum is raised to the minimum.
    pub fn apply(&self, dst: &mut SizeLimit, scale: f32) {
        let c = self.compute(scale);
        if c.min_width >= 0 {
            dst.min_width = c.min_width;
        }
        if c.min_height >= 0 {
            dst.min_height = c.min_height;
        }
        if c.max_width >= 0 {
            dst.max_width = c.max_width;
        }
        if c.max_height >= 0 {
            dst.max_height = c.max_height;
        }
        if dst.max_width >= 0 && dst.min_width > dst.max_width {
            dst.max_width = dst.min_width;
        }
        if dst.max_height >= 0 && dst.min_height > dst.max_height {
            dst.max_height = dst.min_height;
        }
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
    fn default_constraints_leave_limits_alone() {
        let c = SizeConstraints::new(PropTag(40));
        let mut l = SizeLimit::new(40, 20, -1, -1);
        c.apply(&mut l, 1.0);
        assert_eq!(l, SizeLimit::new(40, 20, -1, -1));
    }

    #[test]
    fn set_bounds_override() {
        let mut c = SizeConstraints::new(PropTag(40));
        c.value = SizeLimit::new(100, -1, 200, 50);
        let mut l = SizeLimit::new(40, 20, -1, -1);
        c.apply(&mut l, 1.0);
        assert_eq!(l, SizeLimit::new(100, 20, 200, 50));
    }

    #[test]
    fn conflicting_max_is_raised_to_min() {
        let mut c = SizeConstraints::new(PropTag(40));
        c.value = SizeLimit::new(100, 100, -1, -1);
        let mut l = SizeLimit::new(-1, -1, 50, 50);
        c.apply(&mut l, 1.0);
        assert_eq!(l, SizeLimit::new(100, 100, 100, 100));
    }

    #[test]
    fn scaling_skips_sentinels() {
        let mut c = SizeConstraints::new(PropTag(40));
        c.value = SizeLimit::new(10, -1, 20, -1);
        assert_eq!(c.compute(2.0), SizeLimit::new(20, -1, 40, -1));
    }

    #[test]
    fn limit_text_round_trip() {
        let l = SizeLimit::new(10, 20, -1, 40);
        assert_eq!(parse_limit(&format_limit(&l)), Some(l));
        assert_eq!(parse_limit("10 20"), None);
        assert_eq!(parse_limit("a b c d"), None);
    }
}
