//! Copying cleaned form data onto records.

use viewkit_core::ViewResult;
use viewkit_db::Document;

use crate::form::Form;

/// Writes every cleaned, non-disabled field of `form` onto `doc`.
///
/// Fields that failed validation or were never cleaned are left untouched.
/// The first `set_field` error aborts the copy and is returned.
pub fn populate_document<D: Document>(form: &dyn Form, doc: &mut D) -> ViewResult<()> {
    let cleaned = form.cleaned_data();
    for field in form.fields().iter().filter(|f| !f.disabled) {
        if let Some(value) = cleaned.get(&field.name) {
            doc.set_field(&field.name, value.clone())?;
        }
    }
    Ok(())
}
