//! Bound fields: a field definition paired with its display value and errors.

use std::collections::BTreeMap;

use viewkit_core::utils::text::escape_html;

use crate::fields::{FormFieldDef, FormFieldType};

/// A form field ready to render.
///
/// Created by [`BaseForm::bound_fields`](crate::BaseForm::bound_fields). The
/// display value is whatever the form resolved for this field: submitted data
/// when bound, otherwise the instance, form initial or field initial value.
#[derive(Debug, Clone)]
pub struct BoundField<'a> {
    /// The HTML name attribute, including any form prefix.
    pub html_name: String,
    /// The field definition.
    pub field: &'a FormFieldDef,
    /// The value to display in the input.
    pub value: Option<String>,
    /// Validation errors for this field.
    pub errors: Vec<String>,
}

impl<'a> BoundField<'a> {
    /// Creates a bound field.
    pub fn new(
        field: &'a FormFieldDef,
        value: Option<String>,
        errors: Vec<String>,
        prefix: Option<&str>,
    ) -> Self {
        let html_name = match prefix {
            Some(p) => format!("{p}-{}", field.name),
            None => field.name.clone(),
        };
        Self {
            html_name,
            field,
            value,
            errors,
        }
    }

    /// Returns the HTML `id` attribute, `id_<html_name>`.
    pub fn auto_id(&self) -> String {
        format!("id_{}", self.html_name)
    }

    /// Renders the input element.
    pub fn render(&self) -> String {
        let mut attrs = BTreeMap::new();
        attrs.insert("id".to_string(), self.auto_id());
        if self.field.required && !self.field.widget.is_hidden() {
            attrs.insert("required".to_string(), "required".to_string());
        }
        if self.field.disabled {
            attrs.insert("disabled".to_string(), "disabled".to_string());
        }
        let choices: &[(String, String)] = match &self.field.field_type {
            FormFieldType::Choice { choices } => choices.as_slice(),
            _ => &[],
        };
        self.field
            .widget
            .render(&self.html_name, self.value.as_deref(), &attrs, choices)
    }

    /// Renders a `<label>` pointing at the input.
    pub fn label_tag(&self) -> String {
        format!(
            r#"<label for="{}">{}</label>"#,
            self.auto_id(),
            escape_html(&self.field.label)
        )
    }

    /// Returns `true` if the field has errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Renders the errors as `<ul class="errorlist">`, or an empty string.
    pub fn errors_as_ul(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        let items: String = self
            .errors
            .iter()
            .map(|e| format!("<li>{}</li>", escape_html(e)))
            .collect();
        format!(r#"<ul class="errorlist">{items}</ul>"#)
    }

    /// Renders label, errors, input and help text wrapped in a `<p>`.
    pub fn as_p(&self) -> String {
        if self.field.widget.is_hidden() {
            return self.render();
        }
        let help = if self.field.help_text.is_empty() {
            String::new()
        } else {
            format!(
                r#" <span class="helptext">{}</span>"#,
                escape_html(&self.field.help_text)
            )
        };
        format!(
            "{}<p>{} {}{help}</p>",
            self.errors_as_ul(),
            self.label_tag(),
            self.render()
        )
    }
}
