//! HTML rendering of form inputs.
//!
//! Every widget renders from a name, an optional display value and a map of
//! extra attributes. Values and attributes are HTML-escaped; attributes are
//! emitted in sorted order so output is deterministic.

use std::collections::BTreeMap;
use std::fmt;

use viewkit_core::utils::text::escape_html;

/// The built-in widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetType {
    /// `<input type="text">`.
    TextInput,
    /// `<input type="number">`.
    NumberInput,
    /// `<input type="email">`.
    EmailInput,
    /// `<input type="password">`; never echoes the value back.
    PasswordInput,
    /// `<input type="hidden">`.
    HiddenInput,
    /// `<input type="checkbox">`.
    CheckboxInput,
    /// `<textarea>`.
    Textarea,
    /// `<select>` over a list of `(value, label)` choices.
    Select,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::NumberInput => "NumberInput",
            Self::EmailInput => "EmailInput",
            Self::PasswordInput => "PasswordInput",
            Self::HiddenInput => "HiddenInput",
            Self::CheckboxInput => "CheckboxInput",
            Self::Textarea => "Textarea",
            Self::Select => "Select",
        };
        f.write_str(name)
    }
}

impl WidgetType {
    /// Renders the widget.
    ///
    /// `choices` is only consulted by [`WidgetType::Select`].
    pub fn render(
        &self,
        name: &str,
        value: Option<&str>,
        attrs: &BTreeMap<String, String>,
        choices: &[(String, String)],
    ) -> String {
        let name = escape_html(name);
        let attrs = render_attrs(attrs);
        let val = escape_html(value.unwrap_or(""));
        match self {
            Self::TextInput => input("text", &name, &val, &attrs),
            Self::NumberInput => input("number", &name, &val, &attrs),
            Self::EmailInput => input("email", &name, &val, &attrs),
            Self::HiddenInput => input("hidden", &name, &val, &attrs),
            Self::PasswordInput => input("password", &name, "", &attrs),
            Self::CheckboxInput => {
                let checked = value.is_some_and(|v| {
                    matches!(v.to_lowercase().as_str(), "true" | "on" | "1" | "yes")
                });
                let checked_attr = if checked { " checked" } else { "" };
                format!(r#"<input type="checkbox" name="{name}"{checked_attr}{attrs} />"#)
            }
            Self::Textarea => format!(r#"<textarea name="{name}"{attrs}>{val}</textarea>"#),
            Self::Select => {
                let options: String = choices
                    .iter()
                    .map(|(v, label)| {
                        let selected = if value == Some(v.as_str()) { " selected" } else { "" };
                        format!(
                            r#"<option value="{}"{selected}>{}</option>"#,
                            escape_html(v),
                            escape_html(label)
                        )
                    })
                    .collect();
                format!(r#"<select name="{name}"{attrs}>{options}</select>"#)
            }
        }
    }

    /// Returns `true` if the rendered element contains no visible label target.
    pub const fn is_hidden(&self) -> bool {
        matches!(self, Self::HiddenInput)
    }
}

fn input(input_type: &str, name: &str, val: &str, attrs: &str) -> String {
    format!(r#"<input type="{input_type}" name="{name}" value="{val}"{attrs} />"#)
}

fn render_attrs(attrs: &BTreeMap<String, String>) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {}="{}""#, escape_html(k), escape_html(v)))
        .collect()
}
