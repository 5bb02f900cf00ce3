//! The abstract drawing-surface capability.
//!
//! The toolkit core issues drawing calls against [`Surface`] and never
//! implements rasterization itself. A rendering backend supplies the real
//! implementation; [`NullSurface`] degrades every call to a no-op so that a
//! failed surface acquisition never aborts a running UI, and
//! [`RecordingSurface`] captures the call stream for headless tests.

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};

/// Drawing operations consumed by widget rendering.
pub trait Surface {
    /// Current surface dimensions in pixels.
    fn size(&self) -> Size;

    /// Fill the whole surface with a color.
    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, color: Color, rect: Rect);

    fn fill_round_rect(&mut self, color: Color, rect: Rect, radius: f32);

    fn fill_triangle(&mut self, color: Color, a: Point, b: Point, c: Point);

    /// Stroke an open polyline through the given points.
    fn draw_poly(&mut self, color: Color, points: &[Point], width: f32);

    fn line(&mut self, color: Color, a: Point, b: Point, width: f32);

    /// Push a clip rectangle; drawing is restricted to the intersection of
    /// all active clips until the matching [`clip_end`](Surface::clip_end).
    fn clip_begin(&mut self, area: Rect);

    fn clip_end(&mut self);

    /// Toggle antialiasing, returning the previous setting.
    fn set_antialiasing(&mut self, enabled: bool) -> bool;
}

/// A surface that swallows every call.
///
/// Used when the native layer cannot provide a real surface; rendering
/// proceeds without effect instead of failing.
#[derive(Debug, Default)]
pub struct NullSurface {
    size: Size,
}

impl NullSurface {
    pub fn new(size: Size) -> Self {
        Self { size }
    }
}

impl Surface for NullSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, _color: Color) {}
    fn fill_rect(&mut self, _color: Color, _rect: Rect) {}
    fn fill_round_rect(&mut self, _color: Color, _rect: Rect, _radius: f32) {}
    fn fill_triangle(&mut self, _color: Color, _a: Point, _b: Point, _c: Point) {}
    fn draw_poly(&mut self, _color: Color, _points: &[Point], _width: f32) {}
    fn line(&mut self, _color: Color, _a: Point, _b: Point, _width: f32) {}
    fn clip_begin(&mut self, _area: Rect) {}
    fn clip_end(&mut self) {}

    fn set_antialiasing(&mut self, _enabled: bool) -> bool {
        false
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    FillRect(Color, Rect),
    FillRoundRect(Color, Rect, f32),
    FillTriangle(Color, Point, Point, Point),
    DrawPoly(Color, Vec<Point>, f32),
    Line(Color, Point, Point, f32),
    ClipBegin(Rect),
    ClipEnd,
}

/// A surface that records the call stream instead of drawing.
///
/// Rendering tests assert against [`ops`](RecordingSurface::ops) to verify
/// what a widget painted without a real backend.
#[derive(Debug)]
pub struct RecordingSurface {
    size: Size,
    antialiasing: bool,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            antialiasing: true,
            ops: Vec::new(),
        }
    }

    /// The recorded operations, in issue order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Drop all recorded operations.
    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_rect(&mut self, color: Color, rect: Rect) {
        self.ops.push(DrawOp::FillRect(color, rect));
    }

    fn fill_round_rect(&mut self, color: Color, rect: Rect, radius: f32) {
        self.ops.push(DrawOp::FillRoundRect(color, rect, radius));
    }

    fn fill_triangle(&mut self, color: Color, a: Point, b: Point, c: Point) {
        self.ops.push(DrawOp::FillTriangle(color, a, b, c));
    }

    fn draw_poly(&mut self, color: Color, points: &[Point], width: f32) {
        self.ops.push(DrawOp::DrawPoly(color, points.to_vec(), width));
    }

    fn line(&mut self, color: Color, a: Point, b: Point, width: f32) {
        self.ops.push(DrawOp::Line(color, a, b, width));
    }

    fn clip_begin(&mut self, area: Rect) {
        self.ops.push(DrawOp::ClipBegin(area));
    }

    fn clip_end(&mut self) {
        self.ops.push(DrawOp::ClipEnd);
    }

    fn set_antialiasing(&mut self, enabled: bool) -> bool {
        std::mem::replace(&mut self.antialiasing, enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_surface_captures_calls() {
        let mut s = RecordingSurface::new(Size::new(100, 50));
        s.clear(Color::BLACK);
        s.fill_rect(Color::WHITE, Rect::new(1, 2, 3, 4));
        s.clip_begin(Rect::new(0, 0, 10, 10));
        s.clip_end();

        assert_eq!(s.ops().len(), 4);
        assert_eq!(s.ops()[0], DrawOp::Clear(Color::BLACK));
        assert_eq!(
            s.ops()[1],
            DrawOp::FillRect(Color::WHITE, Rect::new(1, 2, 3, 4))
        );
    }

    #[test]
    fn null_surface_is_silent() {
        let mut s = NullSurface::new(Size::new(10, 10));
        s.clear(Color::WHITE);
        s.line(Color::BLACK, Point::new(0, 0), Point::new(5, 5), 1.0);
        assert_eq!(s.size(), Size::new(10, 10));
        assert!(!s.set_antialiasing(true));
    }
}
