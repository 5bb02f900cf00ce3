//! Property cells, the style cascade, and change notification.

mod common;

use common::{Probe, clear_probe, new_tree, window_with_probe};

use horizon_trellis::Widget;
use horizon_trellis::prop::tags;
use horizon_trellis_core::Status;
use horizon_trellis_style::StyleValue;

#[test]
fn set_then_get_returns_latest_value() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);

    tree.configure(probe, |w, ctx| {
        let mut props = ctx.props();
        let old = w.base_mut().tag.set(5, &mut props);
        assert_eq!(old, 0);
    })
    .unwrap();
    assert_eq!(tree.widget::<Probe>(probe).unwrap().base().tag.get(), 5);

    tree.configure(probe, |w, ctx| {
        let mut props = ctx.props();
        let old = w.base_mut().tag.set(7, &mut props);
        assert_eq!(old, 5);
    })
    .unwrap();
    assert_eq!(tree.widget::<Probe>(probe).unwrap().base().tag.get(), 7);
}

#[test]
fn equal_value_set_never_notifies() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);

    tree.configure(probe, |w, ctx| {
        let mut props = ctx.props();
        w.base_mut().tag.set(5, &mut props);
    })
    .unwrap();
    let notified = tree.widget::<Probe>(probe).unwrap().notified.clone();
    assert_eq!(notified.iter().filter(|&&t| t == tags::TAG).count(), 1);

    // Same value again: no notification.
    tree.configure(probe, |w, ctx| {
        let mut props = ctx.props();
        w.base_mut().tag.set(5, &mut props);
    })
    .unwrap();
    let notified = tree.widget::<Probe>(probe).unwrap().notified.clone();
    assert_eq!(notified.iter().filter(|&&t| t == tags::TAG).count(), 1);
}

#[test]
fn reentrant_set_causes_no_recursive_notification() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);

    tree.configure_as::<Probe, _>(probe, |p, ctx| {
        // The change handler will immediately set the property again.
        p.reentrant_tag = Some(99);
        let mut props = ctx.props();
        p.base_mut().tag.set(1, &mut props);
    })
    .unwrap();

    let p = tree.widget::<Probe>(probe).unwrap();
    // The nested write landed...
    assert_eq!(p.base().tag.get(), 99);
    // ...but delivered exactly one notification.
    assert_eq!(p.notified.iter().filter(|&&t| t == tags::TAG).count(), 1);
}

#[test]
fn binding_twice_is_rejected() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);

    let result = tree
        .configure(probe, |w, ctx| {
            let style = w.base().style();
            let mut props = ctx.props();
            w.base_mut().tag.bind("tag", style, &mut props)
        })
        .unwrap();
    assert_eq!(result, Err(Status::AlreadyBound));
}

#[test]
fn theme_write_commits_into_bound_properties() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);

    // Write on the class node; the instance inherits it.
    let class = tree.sheet().class("Filler").unwrap();
    tree.write_style(class, "tag", StyleValue::Int(9));

    let p = tree.widget::<Probe>(probe).unwrap();
    assert_eq!(p.base().tag.get(), 9);
    assert!(p.notified.contains(&tags::TAG));
}

#[test]
fn padding_parses_css_order_from_style_text() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);

    let style = tree.style_of(probe).unwrap();
    tree.write_style(style, "padding.css", StyleValue::String("1 2 3 4".into()));

    let padding = tree.widget::<Probe>(probe).unwrap().base().padding.get();
    assert_eq!(
        (padding.top, padding.right, padding.bottom, padding.left),
        (1, 2, 3, 4)
    );
}

#[test]
fn malformed_padding_text_leaves_value_unchanged() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);

    let style = tree.style_of(probe).unwrap();
    tree.write_style(style, "padding", StyleValue::String("2 4".into()));
    let before = tree.widget::<Probe>(probe).unwrap().base().padding.get();
    assert_eq!((before.left, before.right, before.top, before.bottom), (2, 2, 4, 4));

    tree.write_style(style, "padding", StyleValue::String("a b".into()));
    let after = tree.widget::<Probe>(probe).unwrap().base().padding.get();
    assert_eq!(after, before);
}

#[test]
fn padding_change_triggers_layout() {
    let (mut tree, window, _align, probe) = window_with_probe(40, 20);

    tree.configure(probe, |w, ctx| {
        let mut props = ctx.props();
        w.base_mut().padding.set_all(5, &mut props);
    })
    .unwrap();
    // The notification marked the chain dirty.
    assert!(tree.flags(window).resize_pending());

    tree.flush_window(window);
    // Window grows by the padding; the leaf keeps its content size.
    assert_eq!(tree.rect(window).width, 50);
    assert_eq!(tree.rect(window).height, 30);
    assert_eq!(tree.rect(probe).width, 40);
    assert_eq!(tree.rect(probe).height, 20);
}

#[test]
fn config_mode_pushes_defaults_into_the_cascade() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);
    clear_probe(&mut tree, probe);

    tree.begin_config();
    tree.configure(probe, |w, ctx| {
        let mut props = ctx.props();
        w.base_mut().tag.set(42, &mut props);
    })
    .unwrap();
    tree.end_config();

    // The value went into the widget's style node instead of the notify
    // queue.
    let style = tree.style_of(probe).unwrap();
    let atom = tree.sheet().lookup_atom("tag").unwrap();
    assert_eq!(tree.sheet().get(style, atom), Some(&StyleValue::Int(42)));
    let p = tree.widget::<Probe>(probe).unwrap();
    assert_eq!(p.base().tag.get(), 42);
    assert!(!p.notified.contains(&tags::TAG));
}

#[test]
fn local_override_shields_instance_from_theme_writes() {
    let (mut tree, _window, _align, probe) = window_with_probe(40, 20);

    // Pin a local value on the instance node.
    let style = tree.style_of(probe).unwrap();
    tree.write_style(style, "tag", StyleValue::Int(5));
    clear_probe(&mut tree, probe);

    // A later class-wide write must not reach the shielded instance.
    let class = tree.sheet().class("Filler").unwrap();
    tree.write_style(class, "tag", StyleValue::Int(77));

    let p = tree.widget::<Probe>(probe).unwrap();
    assert_eq!(p.base().tag.get(), 5);
    assert!(!p.notified.contains(&tags::TAG));
}

#[test]
fn destroy_is_idempotent_through_the_tree() {
    let mut tree = new_tree();
    let probe = tree.spawn(Probe::fixed(10, 10)).unwrap();

    tree.destroy(probe).unwrap();
    assert_eq!(tree.destroy(probe), Err(Status::NotFound));
    assert!(!tree.contains(probe));
}
