//! Size negotiation and dirty-flag propagation.

mod common;

use common::{Probe, new_tree, window_with_probe};

use horizon_trellis::widget::WidgetFlags;
use horizon_trellis::{Align, Orientation, Stack, Widget, Window, WindowPolicy};
use horizon_trellis_core::Status;
use horizon_trellis_draw::{DrawOp, RecordingSurface, Size};

#[test]
fn fixed_leaf_realizes_to_its_limits() {
    let (tree, window, align, probe) = window_with_probe(40, 20);

    // The window collapses onto the leaf's minimum.
    assert_eq!(tree.rect(window).size(), Size::new(40, 20));
    assert_eq!(tree.rect(align).size(), Size::new(40, 20));

    let rect = tree.rect(probe);
    assert_eq!((rect.left, rect.top, rect.width, rect.height), (0, 0, 40, 20));
}

#[test]
fn align_passes_child_minimum_with_max_cleared() {
    let (mut tree, _window, align, _probe) = window_with_probe(40, 20);

    let limits = tree.size_limits(align);
    assert_eq!((limits.min_width, limits.min_height), (40, 20));
    assert_eq!((limits.max_width, limits.max_height), (-1, -1));
}

#[test]
fn oversized_window_keeps_leaf_at_minimum() {
    let (mut tree, window, align, probe) = window_with_probe(40, 20);

    // Force a larger window through its own constraints.
    tree.configure_as::<Window, _>(window, |w, ctx| {
        let mut props = ctx.props();
        w.constraints.set_fixed(200, 100, &mut props);
    })
    .unwrap();
    tree.flush_window(window);

    assert_eq!(tree.rect(window).size(), Size::new(200, 100));
    assert_eq!(tree.rect(align).size(), Size::new(200, 100));

    // Zero scale: the leaf keeps its minimum, centered in the align.
    let rect = tree.rect(probe);
    assert_eq!(rect.size(), Size::new(40, 20));
    assert_eq!((rect.left, rect.top), (80, 40));
}

#[test]
fn undersized_allocation_never_goes_negative() {
    let (mut tree, window, align, probe) = window_with_probe(40, 20);

    // Clamp the whole window below the leaf's minimum.
    tree.configure_as::<Align, _>(align, |a, ctx| {
        let mut props = ctx.props();
        a.constraints.set_fixed(10, 5, &mut props);
    })
    .unwrap();
    tree.configure_as::<Window, _>(window, |w, ctx| {
        let mut props = ctx.props();
        w.constraints.set_fixed(10, 5, &mut props);
    })
    .unwrap();
    tree.flush_window(window);

    // The leaf overflows its container but stays at its minimum.
    let rect = tree.rect(probe);
    assert_eq!(rect.size(), Size::new(40, 20));
    assert!(rect.width >= 0 && rect.height >= 0);
}

#[test]
fn query_resize_marks_self_and_ancestors() {
    let (mut tree, window, align, probe) = window_with_probe(40, 20);

    // Everything resolved by the initial flush.
    assert!(!tree.flags(probe).resize_pending());
    assert!(!tree.flags(align).resize_pending());
    assert!(!tree.flags(window).resize_pending());

    tree.query_resize(probe);
    for id in [probe, align, window] {
        assert!(tree.flags(id).contains(WidgetFlags::SIZE_INVALID));
        assert!(tree.flags(id).contains(WidgetFlags::RESIZE_PENDING));
    }
}

#[test]
fn query_resize_short_circuits_on_marked_ancestors() {
    let (mut tree, window, align, probe) = window_with_probe(40, 20);

    // Marking the middle widget must already cover the root.
    tree.query_resize(align);
    assert!(tree.flags(window).resize_pending());
    assert!(!tree.flags(probe).resize_pending());

    // A second request from the leaf stops at the marked align node and
    // stays idempotent.
    tree.query_resize(probe);
    let flags = tree.flags(probe);
    tree.query_resize(probe);
    assert_eq!(tree.flags(probe), flags);
    assert!(tree.flags(window).resize_pending());
}

#[test]
fn add_then_remove_restores_container_state() {
    let mut tree = new_tree();
    let align = tree.spawn(Align::new()).unwrap();
    let probe = tree.spawn(Probe::fixed(10, 10)).unwrap();

    assert_eq!(tree.children(align).len(), 0);
    assert_eq!(tree.parent(probe), None);

    tree.add(align, probe).unwrap();
    assert_eq!(tree.children(align), vec![probe]);
    assert_eq!(tree.parent(probe), Some(align));

    tree.remove(align, probe).unwrap();
    assert_eq!(tree.children(align).len(), 0);
    assert_eq!(tree.parent(probe), None);
}

#[test]
fn container_errors() {
    let mut tree = new_tree();
    let align = tree.spawn(Align::new()).unwrap();
    let a = tree.spawn(Probe::fixed(10, 10)).unwrap();
    let b = tree.spawn(Probe::fixed(10, 10)).unwrap();

    // Removing a widget that was never added.
    assert_eq!(tree.remove(align, a), Err(Status::NotFound));

    tree.add(align, a).unwrap();
    // The single slot is taken.
    assert_eq!(tree.add(align, b), Err(Status::AlreadyExists));
    // Self-insertion is rejected outright.
    assert_eq!(tree.add(align, align), Err(Status::BadArguments));

    // Leaves do not implement the container contract.
    assert_eq!(tree.add(a, b), Err(Status::NotImplemented));
    assert_eq!(tree.remove_all(a), Err(Status::NotImplemented));
}

#[test]
fn invisible_children_contribute_no_size() {
    let (mut tree, window, align, probe) = window_with_probe(40, 20);

    // Fixed policy tracks the computed minimum exactly.
    tree.configure_as::<Window, _>(window, |w, ctx| {
        let mut props = ctx.props();
        w.policy.set(WindowPolicy::Fixed, &mut props);
    })
    .unwrap();

    tree.configure(probe, |w, ctx| {
        let mut props = ctx.props();
        w.base_mut().visibility.set(false, &mut props);
    })
    .unwrap();
    tree.flush_window(window);

    let limits = tree.size_limits(align);
    assert_eq!((limits.min_width, limits.min_height), (-1, -1));
    assert_eq!(tree.rect(window).size(), Size::new(0, 0));
}

#[test]
fn stack_arranges_children_sequentially() {
    let mut tree = new_tree();
    let window = tree.spawn(Window::new()).unwrap();
    let stack = tree.spawn(Stack::vertical()).unwrap();
    let a = tree.spawn(Probe::fixed(40, 20)).unwrap();
    let b = tree.spawn(Probe::fixed(30, 10)).unwrap();

    tree.add(window, stack).unwrap();
    tree.add(stack, a).unwrap();
    tree.add(stack, b).unwrap();
    tree.configure_as::<Stack, _>(stack, |s, ctx| {
        let mut props = ctx.props();
        s.spacing.set(4, &mut props);
    })
    .unwrap();
    tree.flush_window(window);

    assert_eq!(tree.widget::<Stack>(stack).unwrap().orientation(), Orientation::Vertical);
    // 20 + 4 + 10 tall, 40 wide.
    assert_eq!(tree.rect(window).size(), Size::new(40, 34));

    let ra = tree.rect(a);
    let rb = tree.rect(b);
    assert_eq!((ra.top, ra.height), (0, 20));
    assert_eq!((rb.top, rb.height), (24, 10));
    // Narrower child is centered across the axis.
    assert_eq!(rb.left, 5);
}

#[test]
fn render_emits_drawing_ops() {
    let (mut tree, window, _align, probe) = window_with_probe(40, 20);

    let mut surface = RecordingSurface::new(Size::new(40, 20));
    tree.render_widget(window, &mut surface, true).unwrap();

    // The probe painted its rectangle.
    let probe_rect = tree.rect(probe);
    assert!(
        surface
            .ops()
            .iter()
            .any(|op| matches!(op, DrawOp::FillRect(_, r) if *r == probe_rect))
    );

    // Redraw state is committed after the paint.
    assert!(!tree.flags(window).redraw_pending());
}
