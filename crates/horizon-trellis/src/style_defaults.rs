//! Built-in style classes and their defaults.
//!
//! There is no implicit global registry: the application constructs a
//! [`StyleSheet`], calls [`install`] once at startup, and passes the sheet
//! into [`WidgetTree::new`](crate::tree::WidgetTree::new). Every widget
//! instance then inherits from the class node matching its type name.

use horizon_trellis_draw::Color;
use horizon_trellis_style::{StyleId, StyleSheet, StyleValue};

/// The default widget background.
const DEFAULT_BG: Color = Color::new(0.2, 0.2, 0.2, 1.0);

/// Register the built-in classes and their attribute defaults.
///
/// Returns the root `Widget` class every other class inherits from. Fails
/// when a class name is already taken — the sheet must be fresh.
pub fn install(sheet: &mut StyleSheet) -> horizon_trellis_style::Result<StyleId> {
    let widget = sheet.create_class("Widget", None)?;
    widget_defaults(sheet, widget);

    let align = sheet.create_class("Align", Some(widget))?;
    layout_defaults(sheet, align);
    constraint_defaults(sheet, align);

    let stack = sheet.create_class("Stack", Some(widget))?;
    int_default(sheet, stack, "spacing", 0);
    constraint_defaults(sheet, stack);

    let filler = sheet.create_class("Filler", Some(widget))?;
    constraint_defaults(sheet, filler);

    let window = sheet.create_class("Window", Some(widget))?;
    string_default(sheet, window, "title", "");
    string_default(sheet, window, "role", "");
    color_default(sheet, window, "border.color", Color::BLACK);
    int_default(sheet, window, "border.size", 0);
    string_default(sheet, window, "policy", "normal");
    constraint_defaults(sheet, window);
    // A window stretches its child across the whole frame.
    float_default(sheet, window, "layout.halign", 0.0);
    float_default(sheet, window, "layout.valign", 0.0);
    float_default(sheet, window, "layout.hscale", 1.0);
    float_default(sheet, window, "layout.vscale", 1.0);
    string_default(sheet, window, "layout", "0.0000 0.0000 1.0000 1.0000");

    Ok(widget)
}

fn widget_defaults(sheet: &mut StyleSheet, class: StyleId) {
    for flag in ["hfill", "vfill", "hexpand", "vexpand", "hembed", "vembed"] {
        bool_default(sheet, class, &format!("allocation.{flag}"), false);
    }
    string_default(sheet, class, "allocation", "");

    for side in ["left", "right", "top", "bottom"] {
        int_default(sheet, class, &format!("padding.{side}"), 0);
    }
    string_default(sheet, class, "padding", "0 0 0 0");
    string_default(sheet, class, "padding.css", "0 0 0 0");

    bool_default(sheet, class, "visibility", true);
    color_default(sheet, class, "bg.color", DEFAULT_BG);
    bool_default(sheet, class, "bg.inherit", false);
    float_default(sheet, class, "scaling", 1.0);
    float_default(sheet, class, "brightness", 1.0);
    int_default(sheet, class, "tag", 0);
}

fn layout_defaults(sheet: &mut StyleSheet, class: StyleId) {
    for part in ["halign", "valign", "hscale", "vscale"] {
        float_default(sheet, class, &format!("layout.{part}"), 0.0);
    }
    string_default(sheet, class, "layout", "0.0000 0.0000 0.0000 0.0000");
}

fn constraint_defaults(sheet: &mut StyleSheet, class: StyleId) {
    for part in ["min_width", "min_height", "max_width", "max_height"] {
        int_default(sheet, class, &format!("size.constraints.{part}"), -1);
    }
    string_default(sheet, class, "size.constraints", "-1 -1 -1 -1");
}

fn int_default(sheet: &mut StyleSheet, node: StyleId, name: &str, value: i64) {
    let atom = sheet.atom(name);
    sheet.create_default(node, atom, StyleValue::Int(value));
}

fn float_default(sheet: &mut StyleSheet, node: StyleId, name: &str, value: f32) {
    let atom = sheet.atom(name);
    sheet.create_default(node, atom, StyleValue::Float(value));
}

fn bool_default(sheet: &mut StyleSheet, node: StyleId, name: &str, value: bool) {
    let atom = sheet.atom(name);
    sheet.create_default(node, atom, StyleValue::Bool(value));
}

fn string_default(sheet: &mut StyleSheet, node: StyleId, name: &str, value: &str) {
    let atom = sheet.atom(name);
    sheet.create_default(node, atom, StyleValue::String(value.to_string()));
}

fn color_default(sheet: &mut StyleSheet, node: StyleId, name: &str, value: Color) {
    let atom = sheet.atom(name);
    sheet.create_default(node, atom, StyleValue::Color(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_registered() {
        let mut sheet = StyleSheet::new();
        let widget = install(&mut sheet).unwrap();
        assert_eq!(sheet.class("Widget"), Some(widget));
        for class in ["Align", "Stack", "Filler", "Window"] {
            let id = sheet.class(class).unwrap();
            assert_eq!(sheet.parent(id), Some(widget));
        }
    }

    #[test]
    fn instances_inherit_widget_defaults() {
        let mut sheet = StyleSheet::new();
        install(&mut sheet).unwrap();
        let class = sheet.class("Filler").unwrap();
        let instance = sheet.create_style(Some(class)).unwrap();

        let visibility = sheet.atom("visibility");
        assert_eq!(sheet.get_bool(instance, visibility).unwrap(), true);
        let min_width = sheet.atom("size.constraints.min_width");
        assert_eq!(sheet.get_int(instance, min_width).unwrap(), -1);
    }
}
