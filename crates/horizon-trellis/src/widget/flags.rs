//! Widget dirty-flag bitset.

use bitflags::bitflags;

bitflags! {
    /// Per-widget lifecycle and dirty state.
    ///
    /// A widget's cached rectangle is authoritative only while
    /// `SIZE_INVALID` and `RESIZE_PENDING` are both clear; rendering must
    /// never read geometry with either flag set. The layout flush resolves
    /// them before any `REDRAW_*` flag is serviced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WidgetFlags: u32 {
        /// `init()` completed successfully.
        const INITIALIZED    = 1 << 0;
        /// The widget entered destruction; only `destroy()` is legal now.
        const FINALIZED      = 1 << 1;
        /// The widget's own surface needs repainting.
        const REDRAW_SURFACE = 1 << 2;
        /// Some descendant needs repainting.
        const REDRAW_CHILD   = 1 << 3;
        /// The cached size limit is stale.
        const SIZE_INVALID   = 1 << 4;
        /// A resize request is pending resolution.
        const RESIZE_PENDING = 1 << 5;
        /// Realize is running; suppresses re-entrant resize requests.
        const REALIZE_ACTIVE = 1 << 6;
    }
}

impl WidgetFlags {
    pub const REDRAW_ANY: WidgetFlags = WidgetFlags::REDRAW_SURFACE.union(WidgetFlags::REDRAW_CHILD);
    pub const RESIZE_ANY: WidgetFlags = WidgetFlags::SIZE_INVALID.union(WidgetFlags::RESIZE_PENDING);

    #[inline]
    pub fn redraw_pending(&self) -> bool {
        self.intersects(Self::REDRAW_ANY)
    }

    #[inline]
    pub fn resize_pending(&self) -> bool {
        self.intersects(Self::RESIZE_ANY)
    }

    /// Initialized and not yet finalized.
    #[inline]
    pub fn valid(&self) -> bool {
        self.contains(Self::INITIALIZED) && !self.contains(Self::FINALIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_requires_init_without_finalize() {
        let mut f = WidgetFlags::empty();
        assert!(!f.valid());
        f.insert(WidgetFlags::INITIALIZED);
        assert!(f.valid());
        f.insert(WidgetFlags::FINALIZED);
        assert!(!f.valid());
    }

    #[test]
    fn pending_checks_cover_both_flags() {
        assert!(WidgetFlags::REDRAW_CHILD.redraw_pending());
        assert!(WidgetFlags::REDRAW_SURFACE.redraw_pending());
        assert!(WidgetFlags::SIZE_INVALID.resize_pending());
        assert!(WidgetFlags::RESIZE_PENDING.resize_pending());
        assert!(!WidgetFlags::INITIALIZED.redraw_pending());
    }
}
