//! The [`Form`] trait and [`BaseForm`].
//!
//! A form starts unbound. Unbound forms render values taken from an
//! instance (when editing a record), the form's initial mapping, or each
//! field's own initial value, in that order. Binding to submitted data
//! replaces those values with what the user sent; [`Form::is_valid`] then
//! cleans the data and records errors.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value as Json};

use viewkit_db::{Fields, Value};
use viewkit_http::QueryDict;

use crate::bound_field::BoundField;
use crate::fields::FormFieldDef;
use crate::validation::{self, NON_FIELD_ERRORS};

/// The interface views use to drive a form.
///
/// Validation is async so that a [`Form::clean`] override can consult a
/// store, for example to check that a username is unused.
#[async_trait]
pub trait Form: Send + Sync {
    /// Returns the field definitions.
    fn fields(&self) -> &[FormFieldDef];

    /// Returns the form-level initial values.
    fn initial(&self) -> &HashMap<String, Value>;

    /// Adds form-level initial values. A key already present is overwritten.
    fn merge_initial(&mut self, initial: HashMap<String, Value>);

    /// Sets the field values of the record being edited.
    fn set_instance(&mut self, fields: Fields);

    /// Binds submitted data, clearing any previous validation state.
    fn bind(&mut self, data: &QueryDict);

    /// Returns `true` once [`Form::bind`] has been called.
    fn is_bound(&self) -> bool;

    /// Cleans bound data. Unbound forms are never valid.
    async fn is_valid(&mut self) -> bool;

    /// Returns errors keyed by field name; form-level errors use `"__all__"`.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned values of fields that passed validation.
    fn cleaned_data(&self) -> &HashMap<String, Value>;

    /// Returns a JSON object describing the form for templates.
    fn as_context(&self) -> Json;

    /// Cross-field validation, run after field cleaning.
    async fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }
}

/// A form built from a list of field definitions.
///
/// # Examples
///
/// ```
/// use viewkit_forms::{BaseForm, Form, FormFieldDef, FormFieldType};
/// use viewkit_http::QueryDict;
///
/// let mut form = BaseForm::new(vec![FormFieldDef::new("username", FormFieldType::char())]);
/// assert!(form.as_p().contains(r#"name="username""#));
///
/// form.bind(&QueryDict::parse("username=bar"));
/// assert!(form.is_bound());
/// assert_eq!(form.bound_fields()[0].value.as_deref(), Some("bar"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    initial_data: HashMap<String, Value>,
    instance: Option<Fields>,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Option<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, Value>,
}

impl BaseForm {
    /// Creates an unbound form.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            ..Self::default()
        }
    }

    /// Sets form-level initial values.
    #[must_use]
    pub fn with_initial(mut self, initial: HashMap<String, Value>) -> Self {
        self.initial_data = initial;
        self
    }

    /// Pre-populates the form from a record's fields.
    #[must_use]
    pub fn with_instance(mut self, fields: Fields) -> Self {
        self.instance = Some(fields);
        self
    }

    /// Namespaces input names as `<prefix>-<name>`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Records an error, typically from a wrapping form's `clean`.
    pub fn add_error(&mut self, field: Option<&str>, message: impl Into<String>) {
        self.errors
            .entry(field.unwrap_or(NON_FIELD_ERRORS).to_string())
            .or_default()
            .push(message.into());
        if let Some(name) = field {
            self.cleaned_data.remove(name);
        }
    }

    /// Returns the form-level errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors
            .get(NON_FIELD_ERRORS)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns every field paired with its display value and errors.
    pub fn bound_fields(&self) -> Vec<BoundField<'_>> {
        self.field_defs
            .iter()
            .map(|field| {
                let errors = self.errors.get(&field.name).cloned().unwrap_or_default();
                BoundField::new(
                    field,
                    self.display_value(field),
                    errors,
                    self.prefix.as_deref(),
                )
            })
            .collect()
    }

    /// Renders every field as `<p>` rows, preceded by form-level errors.
    pub fn as_p(&self) -> String {
        let mut html: String = self
            .non_field_errors()
            .iter()
            .map(|e| {
                format!(
                    r#"<ul class="errorlist nonfield"><li>{}</li></ul>"#,
                    viewkit_core::utils::text::escape_html(e)
                )
            })
            .collect();
        for bf in self.bound_fields() {
            html.push_str(&bf.as_p());
        }
        html
    }

    fn display_value(&self, field: &FormFieldDef) -> Option<String> {
        if self.bound && !field.disabled {
            return self.raw_data.get(&field.name).cloned().flatten();
        }
        self.instance
            .as_ref()
            .and_then(|fields| fields.get(&field.name))
            .filter(|v| !v.is_null())
            .or_else(|| self.initial_data.get(&field.name))
            .or(field.initial.as_ref())
            .map(ToString::to_string)
    }

    fn html_name(&self, field: &FormFieldDef) -> String {
        match &self.prefix {
            Some(p) => format!("{p}-{}", field.name),
            None => field.name.clone(),
        }
    }
}

#[async_trait]
impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn initial(&self) -> &HashMap<String, Value> {
        &self.initial_data
    }

    fn merge_initial(&mut self, initial: HashMap<String, Value>) {
        self.initial_data.extend(initial);
    }

    fn set_instance(&mut self, fields: Fields) {
        self.instance = Some(fields);
    }

    fn bind(&mut self, data: &QueryDict) {
        self.bound = true;
        self.errors.clear();
        self.cleaned_data.clear();
        self.raw_data = self
            .field_defs
            .iter()
            .map(|field| {
                let value = data.get(&self.html_name(field)).map(String::from);
                (field.name.clone(), value)
            })
            .collect();
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    async fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();
        validation::clean_fields(
            &self.field_defs,
            &self.raw_data,
            &mut self.cleaned_data,
            &mut self.errors,
        );

        if let Err(form_errors) = self.clean().await {
            for (key, msgs) in form_errors {
                self.errors.entry(key).or_default().extend(msgs);
            }
        }

        if !self.errors.is_empty() {
            tracing::debug!(errors = ?self.errors, "form failed validation");
        }
        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }

    fn as_context(&self) -> Json {
        let fields: Vec<Json> = self
            .bound_fields()
            .iter()
            .map(|bf| {
                json!({
                    "name": bf.field.name,
                    "html_name": bf.html_name,
                    "label": bf.field.label,
                    "help_text": bf.field.help_text,
                    "required": bf.field.required,
                    "value": bf.value,
                    "html": bf.render(),
                    "label_tag": bf.label_tag(),
                    "errors": bf.errors,
                    "errors_html": bf.errors_as_ul(),
                })
            })
            .collect();

        json!({
            "fields": fields,
            "errors": self.errors,
            "non_field_errors": self.non_field_errors(),
            "is_bound": self.bound,
            "as_p": self.as_p(),
        })
    }
}
