//! Form field definitions and type-level cleaning.
//!
//! A [`FormFieldDef`] describes one input: its name, label, whether it is
//! required, and a [`FormFieldType`] that controls how the submitted string
//! is parsed. [`clean_field_value`] turns raw input into a [`Value`] or a
//! list of error messages.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use viewkit_db::Value;

use crate::widgets::WidgetType;

static EMAIL_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").ok());

/// The type of a form field and its type-specific constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    /// Free text.
    Char {
        /// Minimum length in characters.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Trim surrounding whitespace before validating.
        strip: bool,
    },
    /// A whole number.
    Integer {
        /// Smallest accepted value.
        min_value: Option<i64>,
        /// Largest accepted value.
        max_value: Option<i64>,
    },
    /// A floating-point number.
    Float {
        /// Smallest accepted value.
        min_value: Option<f64>,
        /// Largest accepted value.
        max_value: Option<f64>,
    },
    /// A checkbox.
    Boolean,
    /// An email address.
    Email,
    /// One of a fixed set of `(value, label)` choices.
    Choice {
        /// The accepted choices.
        choices: Vec<(String, String)>,
    },
}

impl FormFieldType {
    /// A text field with no length limits that strips whitespace.
    pub const fn char() -> Self {
        Self::Char {
            min_length: None,
            max_length: None,
            strip: true,
        }
    }

    /// An integer field with no bounds.
    pub const fn integer() -> Self {
        Self::Integer {
            min_value: None,
            max_value: None,
        }
    }

    /// Returns the widget used when none is set explicitly.
    pub const fn default_widget(&self) -> WidgetType {
        match self {
            Self::Char { .. } => WidgetType::TextInput,
            Self::Integer { .. } | Self::Float { .. } => WidgetType::NumberInput,
            Self::Boolean => WidgetType::CheckboxInput,
            Self::Email => WidgetType::EmailInput,
            Self::Choice { .. } => WidgetType::Select,
        }
    }
}

/// The complete definition of a form field.
#[derive(Debug, Clone)]
pub struct FormFieldDef {
    /// The input name, also the key in cleaned data.
    pub name: String,
    /// Parsing and constraint rules.
    pub field_type: FormFieldType,
    /// Whether an empty submission is an error.
    pub required: bool,
    /// Value shown when neither data, instance nor form initial supplies one.
    pub initial: Option<Value>,
    /// Help text shown next to the input.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// How the input is rendered.
    pub widget: WidgetType,
    /// Overrides for built-in error messages, keyed by code (`"required"`, `"invalid"`).
    pub error_messages: HashMap<String, String>,
    /// Disabled fields render read-only and always clean to their initial value.
    pub disabled: bool,
}

impl FormFieldDef {
    /// Creates a required field with the default widget for its type.
    ///
    /// The label defaults to the name with underscores replaced by spaces.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let label = viewkit_core::utils::text::capfirst(&name.replace('_', " "));
        Self {
            widget: field_type.default_widget(),
            name,
            field_type,
            required: true,
            initial: None,
            help_text: String::new(),
            label,
            error_messages: HashMap::new(),
            disabled: false,
        }
    }

    /// Sets whether the field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the field-level initial value.
    #[must_use]
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget.
    #[must_use]
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Overrides the message for an error code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Sets whether the field is disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn message(&self, code: &str, default: impl FnOnce() -> String) -> String {
        self.error_messages
            .get(code)
            .cloned()
            .unwrap_or_else(default)
    }
}

/// Cleans a raw submitted string into a typed value.
///
/// Empty input fails a required field with `"This field is required."`;
/// for optional fields it yields the field's initial value or
/// [`Value::Null`]. Otherwise the input is parsed according to the field
/// type and every violated constraint contributes one message.
pub fn clean_field_value(field: &FormFieldDef, raw: Option<&str>) -> Result<Value, Vec<String>> {
    let raw_str = raw.unwrap_or("");
    let is_empty = match &field.field_type {
        FormFieldType::Char { strip: true, .. } => raw_str.trim().is_empty(),
        _ => raw_str.is_empty(),
    };

    if is_empty {
        if field.required {
            return Err(vec![
                field.message("required", || "This field is required.".to_string())
            ]);
        }
        return Ok(field.initial.clone().unwrap_or(Value::Null));
    }

    let mut errors = Vec::new();

    let value = match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            strip,
        } => {
            let s = if *strip { raw_str.trim() } else { raw_str };
            let len = s.chars().count();
            if let Some(min) = min_length.filter(|min| len < *min) {
                errors.push(format!(
                    "Ensure this value has at least {min} characters (it has {len})."
                ));
            }
            if let Some(max) = max_length.filter(|max| len > *max) {
                errors.push(format!(
                    "Ensure this value has at most {max} characters (it has {len})."
                ));
            }
            Value::String(s.to_string())
        }

        FormFieldType::Integer {
            min_value,
            max_value,
        } => match raw_str.trim().parse::<i64>() {
            Ok(n) => {
                if let Some(min) = min_value.filter(|min| n < *min) {
                    errors.push(format!("Ensure this value is greater than or equal to {min}."));
                }
                if let Some(max) = max_value.filter(|max| n > *max) {
                    errors.push(format!("Ensure this value is less than or equal to {max}."));
                }
                Value::Int(n)
            }
            Err(_) => {
                errors.push(field.message("invalid", || "Enter a whole number.".to_string()));
                Value::Null
            }
        },

        FormFieldType::Float {
            min_value,
            max_value,
        } => match raw_str.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => {
                if let Some(min) = min_value.filter(|min| n < *min) {
                    errors.push(format!("Ensure this value is greater than or equal to {min}."));
                }
                if let Some(max) = max_value.filter(|max| n > *max) {
                    errors.push(format!("Ensure this value is less than or equal to {max}."));
                }
                Value::Float(n)
            }
            _ => {
                errors.push(field.message("invalid", || "Enter a number.".to_string()));
                Value::Null
            }
        },

        FormFieldType::Boolean => Value::Bool(matches!(
            raw_str.to_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        )),

        FormFieldType::Email => {
            let email = raw_str.trim();
            if EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email)) {
                Value::String(email.to_string())
            } else {
                errors.push(
                    field.message("invalid", || "Enter a valid email address.".to_string()),
                );
                Value::Null
            }
        }

        FormFieldType::Choice { choices } => {
            if choices.iter().any(|(value, _)| value == raw_str) {
                Value::String(raw_str.to_string())
            } else {
                errors.push(field.message("invalid_choice", || {
                    format!("Select a valid choice. {raw_str} is not one of the available choices.")
                }));
                Value::Null
            }
        }
    };

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}
