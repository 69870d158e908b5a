//! The field cleaning pass.
//!
//! Cleaning runs every field and accumulates errors instead of stopping at
//! the first failure, so a re-rendered form shows all problems at once.

use std::collections::HashMap;

use viewkit_db::Value;

use crate::fields::{clean_field_value, FormFieldDef};
use crate::form::Form;

/// Key under which form-level errors are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Cleans every field in `field_defs` against `raw_data`.
///
/// Successful fields land in `cleaned_data`, failing ones in `errors`.
/// Disabled fields skip validation and take their initial value.
pub fn clean_fields(
    field_defs: &[FormFieldDef],
    raw_data: &HashMap<String, Option<String>>,
    cleaned_data: &mut HashMap<String, Value>,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in field_defs {
        if field.disabled {
            if let Some(initial) = &field.initial {
                cleaned_data.insert(field.name.clone(), initial.clone());
            }
            continue;
        }

        let raw = raw_data.get(&field.name).and_then(|v| v.as_deref());
        match clean_field_value(field, raw) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}

/// Validates `form` and returns its errors sorted by field name.
pub async fn full_clean(form: &mut dyn Form) -> Result<(), Vec<(String, Vec<String>)>> {
    if form.is_valid().await {
        return Ok(());
    }
    let mut errors: Vec<(String, Vec<String>)> = form
        .errors()
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    errors.sort_by(|a, b| a.0.cmp(&b.0));
    Err(errors)
}
