//! Window event routing: capture, focus, key tracking, click synthesis,
//! redraw coalescing.

mod common;

use std::time::{Duration, Instant};

use common::{Probe, clear_probe, new_tree, probe_events};

use horizon_trellis::widget::WidgetFlags;
use horizon_trellis::{Stack, Widget, WidgetId, WidgetTree, Window};
use horizon_trellis_core::{EventKind, MouseButton, UiEvent};
use horizon_trellis_draw::Color;

/// Window → vertical stack → two 40×20 probes at y=0 and y=20.
fn two_probe_window() -> (WidgetTree, WidgetId, WidgetId, WidgetId) {
    let mut tree = new_tree();
    let window = tree.spawn(Window::new()).unwrap();
    let stack = tree.spawn(Stack::vertical()).unwrap();
    let top = tree.spawn(Probe::fixed(40, 20)).unwrap();
    let bottom = tree.spawn(Probe::fixed(40, 20)).unwrap();
    tree.add(window, stack).unwrap();
    tree.add(stack, top).unwrap();
    tree.add(stack, bottom).unwrap();
    tree.flush_window(window);
    clear_probe(&mut tree, top);
    clear_probe(&mut tree, bottom);
    (tree, window, top, bottom)
}

fn down(x: i32, y: i32, time: u64) -> UiEvent {
    UiEvent::mouse(EventKind::MouseDown, x, y, MouseButton::Left, time)
}

fn up(x: i32, y: i32, time: u64) -> UiEvent {
    UiEvent::mouse(EventKind::MouseUp, x, y, MouseButton::Left, time)
}

#[test]
fn button_down_acquires_capture_on_hit_widget() {
    let (mut tree, window, top, bottom) = two_probe_window();

    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    assert_eq!(tree.widget::<Window>(window).unwrap().capture(), Some(top));
    assert_eq!(probe_events(&tree, top), vec![EventKind::MouseDown]);
    assert!(probe_events(&tree, bottom).is_empty());
}

#[test]
fn capture_holds_outside_widget_bounds_until_release() {
    let (mut tree, window, top, bottom) = two_probe_window();

    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    // Drag across the sibling and far outside the window.
    tree.handle_event(window, &UiEvent::mouse_move(10, 30, 10)).unwrap();
    tree.handle_event(window, &UiEvent::mouse_move(500, 500, 20)).unwrap();
    tree.handle_event(window, &up(500, 500, 30)).unwrap();

    // Every gesture event went to the captured widget; the sibling saw
    // nothing until the release re-derived hover.
    let events = probe_events(&tree, top);
    assert_eq!(
        events,
        vec![
            EventKind::MouseDown,
            EventKind::MouseOut,
            EventKind::MouseMove,
            EventKind::MouseMove,
            EventKind::MouseUp,
        ]
    );
    assert!(!probe_events(&tree, bottom).contains(&EventKind::MouseMove));
    assert_eq!(tree.widget::<Window>(window).unwrap().capture(), None);
}

#[test]
fn capture_persists_until_all_buttons_release() {
    let (mut tree, window, top, _bottom) = two_probe_window();

    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    tree.handle_event(
        window,
        &UiEvent::mouse(EventKind::MouseDown, 10, 5, MouseButton::Right, 5),
    )
    .unwrap();
    tree.handle_event(window, &up(10, 5, 10)).unwrap();
    // The right button is still down: capture holds.
    assert_eq!(tree.widget::<Window>(window).unwrap().capture(), Some(top));

    tree.handle_event(
        window,
        &UiEvent::mouse(EventKind::MouseUp, 10, 5, MouseButton::Right, 15),
    )
    .unwrap();
    assert_eq!(tree.widget::<Window>(window).unwrap().capture(), None);
}

#[test]
fn boundary_crossings_synthesize_in_and_out() {
    let (mut tree, window, top, _bottom) = two_probe_window();

    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    tree.handle_event(window, &UiEvent::mouse_move(10, 30, 10)).unwrap();
    tree.handle_event(window, &UiEvent::mouse_move(10, 8, 20)).unwrap();

    let events = probe_events(&tree, top);
    let crossings: Vec<_> = events
        .iter()
        .filter(|k| matches!(k, EventKind::MouseIn | EventKind::MouseOut))
        .collect();
    assert_eq!(crossings, vec![&EventKind::MouseOut, &EventKind::MouseIn]);
    // Capture never broke.
    assert_eq!(tree.widget::<Window>(window).unwrap().capture(), Some(top));
}

#[test]
fn hover_transitions_without_capture() {
    let (mut tree, window, top, bottom) = two_probe_window();

    tree.handle_event(window, &UiEvent::mouse_move(10, 5, 0)).unwrap();
    tree.handle_event(window, &UiEvent::mouse_move(10, 30, 10)).unwrap();

    assert_eq!(
        probe_events(&tree, top),
        vec![EventKind::MouseIn, EventKind::MouseMove, EventKind::MouseOut]
    );
    assert_eq!(
        probe_events(&tree, bottom),
        vec![EventKind::MouseIn, EventKind::MouseMove]
    );
}

#[test]
fn click_chain_synthesis() {
    let (mut tree, window, top, _bottom) = two_probe_window();

    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    tree.handle_event(window, &up(10, 5, 50)).unwrap();
    tree.handle_event(window, &down(10, 5, 100)).unwrap();
    tree.handle_event(window, &up(10, 5, 150)).unwrap();
    tree.handle_event(window, &down(10, 5, 200)).unwrap();
    tree.handle_event(window, &up(10, 5, 250)).unwrap();

    let clicks: Vec<_> = probe_events(&tree, top)
        .into_iter()
        .filter(|k| {
            matches!(
                k,
                EventKind::MouseClick | EventKind::MouseDoubleClick | EventKind::MouseTripleClick
            )
        })
        .collect();
    assert_eq!(
        clicks,
        vec![
            EventKind::MouseClick,
            EventKind::MouseDoubleClick,
            EventKind::MouseTripleClick,
        ]
    );
}

#[test]
fn slow_clicks_do_not_chain() {
    let (mut tree, window, top, _bottom) = two_probe_window();

    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    tree.handle_event(window, &up(10, 5, 50)).unwrap();
    // Beyond the chaining window.
    tree.handle_event(window, &down(10, 5, 1000)).unwrap();
    tree.handle_event(window, &up(10, 5, 1050)).unwrap();

    let clicks: Vec<_> = probe_events(&tree, top)
        .into_iter()
        .filter(|k| matches!(k, EventKind::MouseClick | EventKind::MouseDoubleClick))
        .collect();
    assert_eq!(clicks, vec![EventKind::MouseClick, EventKind::MouseClick]);
}

#[test]
fn release_outside_target_produces_no_click() {
    let (mut tree, window, top, _bottom) = two_probe_window();

    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    tree.handle_event(window, &up(10, 30, 50)).unwrap();

    assert!(!probe_events(&tree, top).contains(&EventKind::MouseClick));
}

#[test]
fn key_up_follows_the_key_down_target() {
    let (mut tree, window, top, bottom) = two_probe_window();

    tree.set_focus(top);
    clear_probe(&mut tree, top);

    tree.handle_event(window, &UiEvent::key(EventKind::KeyDown, 42, 0)).unwrap();
    // Focus moves mid-press.
    tree.set_focus(bottom);
    tree.handle_event(window, &UiEvent::key(EventKind::KeyUp, 42, 10)).unwrap();

    // Balanced delivery: the original widget sees both halves.
    let top_events = probe_events(&tree, top);
    assert!(top_events.contains(&EventKind::KeyDown));
    assert!(top_events.contains(&EventKind::KeyUp));
    assert!(!probe_events(&tree, bottom).contains(&EventKind::KeyUp));

    // The pressed-key set drained.
    assert!(tree.widget::<Window>(window).unwrap().pressed_keys().is_empty());
}

#[test]
fn focus_moves_deliver_in_and_out() {
    let (mut tree, _window, top, bottom) = two_probe_window();

    tree.set_focus(top);
    tree.set_focus(bottom);

    assert!(probe_events(&tree, top).contains(&EventKind::FocusIn));
    assert!(probe_events(&tree, top).contains(&EventKind::FocusOut));
    assert_eq!(probe_events(&tree, bottom), vec![EventKind::FocusIn]);
}

#[test]
fn new_key_down_goes_to_current_focus() {
    let (mut tree, window, top, bottom) = two_probe_window();

    tree.set_focus(top);
    tree.handle_event(window, &UiEvent::key(EventKind::KeyDown, 1, 0)).unwrap();
    tree.set_focus(bottom);
    tree.handle_event(window, &UiEvent::key(EventKind::KeyDown, 2, 10)).unwrap();

    assert!(probe_events(&tree, top).contains(&EventKind::KeyDown));
    assert!(probe_events(&tree, bottom).contains(&EventKind::KeyDown));

    // Each key-up finds its own recorded target.
    tree.handle_event(window, &UiEvent::key(EventKind::KeyUp, 2, 20)).unwrap();
    assert!(!probe_events(&tree, top).contains(&EventKind::KeyUp));
    assert!(probe_events(&tree, bottom).contains(&EventKind::KeyUp));
}

#[test]
fn destroyed_widget_is_evicted_from_routing_state() {
    let (mut tree, window, top, _bottom) = two_probe_window();

    tree.set_focus(top);
    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    tree.handle_event(window, &UiEvent::key(EventKind::KeyDown, 9, 5)).unwrap();

    let win = tree.widget::<Window>(window).unwrap();
    assert_eq!(win.capture(), Some(top));
    assert_eq!(win.focused(), Some(top));
    assert_eq!(win.pressed_keys(), vec![9]);

    tree.destroy(top).unwrap();

    let win = tree.widget::<Window>(window).unwrap();
    assert_eq!(win.capture(), None);
    assert_eq!(win.focused(), None);
    assert!(win.pressed_keys().is_empty());

    // Remaining gesture events are swallowed, not misdelivered.
    tree.handle_event(window, &up(10, 5, 10)).unwrap();
    tree.handle_event(window, &UiEvent::key(EventKind::KeyUp, 9, 20)).unwrap();
}

#[test]
fn redraw_requests_coalesce_into_one_flush() {
    let (mut tree, window, top, _bottom) = two_probe_window();
    let now = Instant::now();

    // A burst of paint-provoking changes within one quantum.
    for step in 0..3 {
        tree.configure(top, |w, ctx| {
            let mut props = ctx.props();
            let level = 0.1 * (step + 1) as f32;
            w.base_mut()
                .bg_color
                .set(Color::new(level, level, level, 1.0), &mut props);
        })
        .unwrap();
    }
    assert!(tree.flags(window).contains(WidgetFlags::REDRAW_CHILD));

    // One timer fires, one flush runs.
    assert_eq!(tree.process_timers_at(now + Duration::from_millis(100)), 1);
    assert!(!tree.flags(window).redraw_pending());

    // Nothing left to do afterwards.
    assert_eq!(tree.process_timers_at(now + Duration::from_secs(1)), 0);
}

#[test]
fn slot_handlers_run_on_routed_events() {
    use horizon_trellis::prop::PropTag;
    use horizon_trellis::widget::SlotKey;

    let (mut tree, window, top, _bottom) = two_probe_window();
    const MARKER: PropTag = PropTag(999);

    tree.configure(top, |w, _ctx| {
        w.base_mut().slots.add(
            SlotKey::MouseClick,
            Box::new(|sender, _ctx, _event| {
                let probe = sender.as_any_mut().downcast_mut::<Probe>().unwrap();
                probe.notified.push(MARKER);
                Ok(())
            }),
        );
    })
    .unwrap();

    tree.handle_event(window, &down(10, 5, 0)).unwrap();
    tree.handle_event(window, &up(10, 5, 20)).unwrap();

    let probe = tree.widget::<Probe>(top).unwrap();
    assert_eq!(probe.notified.iter().filter(|&&t| t == MARKER).count(), 1);
}

#[test]
fn show_and_hide_map_through_the_native_binding() {
    let mut tree = new_tree();
    let window = tree
        .spawn(Window::with_native(Box::new(
            horizon_trellis_draw::NullWindow::new(horizon_trellis_draw::Size::new(100, 100)),
        )))
        .unwrap();

    assert!(!tree.widget::<Window>(window).unwrap().is_mapped());
    tree.configure_as::<Window, _>(window, |w, ctx| w.show(ctx)).unwrap();
    assert!(tree.widget::<Window>(window).unwrap().is_mapped());
    tree.configure_as::<Window, _>(window, |w, ctx| w.hide(ctx)).unwrap();
    assert!(!tree.widget::<Window>(window).unwrap().is_mapped());

    // Icon installation requires the binding.
    tree.configure_as::<Window, _>(window, |w, _ctx| {
        w.set_icon(&[0u8; 16], 2, 2).unwrap();
        assert!(w.release_native().is_some());
        assert!(w.set_icon(&[0u8; 16], 2, 2).is_err());
    })
    .unwrap();
}

#[test]
fn resize_event_rederives_layout_from_constraints() {
    let (mut tree, window, top, _bottom) = two_probe_window();

    // The native layer claims a huge size; the tree re-derives and clamps
    // through its own negotiation (policy Normal, no explicit constraints:
    // the window accepts the size, children keep their minimums).
    tree.handle_event(window, &UiEvent::resize(400, 300)).unwrap();

    assert_eq!(tree.rect(window).width, 400);
    assert_eq!(tree.rect(window).height, 300);
    // The probes were re-realized, not left stale.
    assert!(!tree.flags(top).resize_pending());
}
