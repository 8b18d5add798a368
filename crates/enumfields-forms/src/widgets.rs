//! Widgets for rendering enum choices as HTML form elements.
//!
//! A widget renders itself for a field name and current value, and pulls the
//! submitted raw value back out of form data. Choices arrive as
//! `(value, label)` string pairs already prepared by the form field.

use std::collections::HashMap;
use std::fmt;

/// Submitted form data, keyed by field name.
pub type FormData = HashMap<String, String>;

/// The widgets an enum choice field can render with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetType {
    /// `<select>`.
    #[default]
    Select,
    /// A set of `<input type="radio">` elements.
    RadioSelect,
    /// `<input type="hidden">`.
    HiddenInput,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Select => "Select",
            Self::RadioSelect => "RadioSelect",
            Self::HiddenInput => "HiddenInput",
        };
        write!(f, "{name}")
    }
}

/// A trait for HTML form widgets.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type enum variant.
    fn widget_type(&self) -> WidgetType;

    /// Renders the widget as an HTML string.
    ///
    /// # Arguments
    /// - `name` - The HTML `name` attribute
    /// - `value` - The current value to display (if any)
    /// - `attrs` - Additional HTML attributes
    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String;

    /// Extracts a raw string value from the submitted form data.
    ///
    /// Returns `None` if no value was submitted for this field name.
    fn value_from_data(&self, data: &FormData, name: &str) -> Option<String> {
        data.get(name).cloned()
    }

    /// Returns the HTML `id` attribute value for a label targeting this widget.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Formats an HTML attributes map into a string like ` key="value" key2="value2"`.
fn render_attrs(attrs: &HashMap<String, String>) -> String {
    let mut parts: Vec<String> = attrs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape(v)))
        .collect();
    parts.sort(); // deterministic output for testing
    parts.concat()
}

/// A `<select>` dropdown widget.
#[derive(Debug, Clone)]
pub struct Select {
    /// The available choices as `(value, display_label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl Select {
    /// Creates a new `Select` widget with the given choices.
    pub const fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }
}

impl Widget for Select {
    fn widget_type(&self) -> WidgetType {
        WidgetType::Select
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        let current = value.unwrap_or("");
        let options: String = self
            .choices
            .iter()
            .map(|(val, label)| {
                let selected = if val == current { " selected" } else { "" };
                format!(
                    r#"<option value="{}"{selected}>{}</option>"#,
                    escape(val),
                    escape(label)
                )
            })
            .collect();
        format!(
            r#"<select name="{name}"{}>{options}</select>"#,
            render_attrs(attrs)
        )
    }
}

/// A set of `<input type="radio">` elements.
#[derive(Debug, Clone)]
pub struct RadioSelect {
    /// The available choices as `(value, display_label)` pairs.
    pub choices: Vec<(String, String)>,
}

impl RadioSelect {
    /// Creates a new `RadioSelect` widget with the given choices.
    pub const fn new(choices: Vec<(String, String)>) -> Self {
        Self { choices }
    }
}

impl Widget for RadioSelect {
    fn widget_type(&self) -> WidgetType {
        WidgetType::RadioSelect
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        let current = value.unwrap_or("");
        let id_base = attrs.get("id").map_or(name, String::as_str);
        let mut html = String::from("<div>");
        for (i, (val, label)) in self.choices.iter().enumerate() {
            let checked = if val == current { " checked" } else { "" };
            let option_id = format!("{id_base}_{i}");
            html.push_str(&format!(
                r#"<div><input type="radio" name="{name}" value="{}" id="{option_id}"{checked} />"#,
                escape(val)
            ));
            html.push_str(&format!(
                r#" <label for="{option_id}">{}</label></div>"#,
                escape(label)
            ));
        }
        html.push_str("</div>");
        html
    }

    fn id_for_label(&self, id: &str) -> String {
        format!("{id}_0")
    }
}

/// An `<input type="hidden">` widget.
#[derive(Debug, Clone, Copy)]
pub struct HiddenInput;

impl Widget for HiddenInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::HiddenInput
    }

    fn render(&self, name: &str, value: Option<&str>, attrs: &HashMap<String, String>) -> String {
        format!(
            r#"<input type="hidden" name="{name}" value="{}"{} />"#,
            escape(value.unwrap_or("")),
            render_attrs(attrs)
        )
    }
}

/// Creates a widget of the given type over `choices`.
pub fn create_widget(widget_type: WidgetType, choices: &[(String, String)]) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::Select => Box::new(Select::new(choices.to_vec())),
        WidgetType::RadioSelect => Box::new(RadioSelect::new(choices.to_vec())),
        WidgetType::HiddenInput => Box::new(HiddenInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_attrs() -> HashMap<String, String> {
        HashMap::new()
    }

    fn colors() -> Vec<(String, String)> {
        vec![
            (String::new(), "---------".into()),
            ("r".into(), "Red".into()),
            ("g".into(), "Green".into()),
        ]
    }

    #[test]
    fn test_select_render() {
        let w = Select::new(colors());
        let html = w.render("color", Some("g"), &empty_attrs());
        assert!(html.starts_with(r#"<select name="color">"#));
        assert!(html.contains(r#"<option value="">---------</option>"#));
        assert!(html.contains(r#"<option value="r">Red</option>"#));
        assert!(html.contains(r#"<option value="g" selected>Green</option>"#));
    }

    #[test]
    fn test_select_render_none_selects_blank() {
        let w = Select::new(colors());
        let html = w.render("color", None, &empty_attrs());
        assert!(html.contains(r#"<option value="" selected>---------</option>"#));
    }

    #[test]
    fn test_select_escapes_labels() {
        let w = Select::new(vec![("a&b".into(), "<A & B>".into())]);
        let html = w.render("x", None, &empty_attrs());
        assert!(html.contains(r#"<option value="a&amp;b">&lt;A &amp; B&gt;</option>"#));
    }

    #[test]
    fn test_render_attrs_sorted() {
        let mut attrs = HashMap::new();
        attrs.insert("id".to_string(), "id_color".to_string());
        attrs.insert("class".to_string(), "wide".to_string());
        let html = Select::new(vec![]).render("color", None, &attrs);
        assert_eq!(
            html,
            r#"<select name="color" class="wide" id="id_color"></select>"#
        );
    }

    #[test]
    fn test_radio_select_render() {
        let w = RadioSelect::new(colors());
        let html = w.render("color", Some("r"), &empty_attrs());
        assert!(html.contains(r#"value="r" id="color_1" checked />"#));
        assert!(html.contains(r#"<label for="color_2">Green</label>"#));
        assert_eq!(w.id_for_label("id_color"), "id_color_0");
    }

    #[test]
    fn test_hidden_input_render() {
        let html = HiddenInput.render("color", Some("b"), &empty_attrs());
        assert_eq!(html, r#"<input type="hidden" name="color" value="b" />"#);
    }

    #[test]
    fn test_value_from_data() {
        let mut data = FormData::new();
        data.insert("color".into(), "g".into());
        let w = Select::new(colors());
        assert_eq!(w.value_from_data(&data, "color").as_deref(), Some("g"));
        assert_eq!(w.value_from_data(&data, "size"), None);
    }

    #[test]
    fn test_create_widget() {
        for ty in [WidgetType::Select, WidgetType::RadioSelect, WidgetType::HiddenInput] {
            assert_eq!(create_widget(ty, &colors()).widget_type(), ty);
        }
        assert_eq!(WidgetType::RadioSelect.to_string(), "RadioSelect");
        assert_eq!(WidgetType::default(), WidgetType::Select);
    }
}
