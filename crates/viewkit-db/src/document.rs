//! The [`Document`] trait implemented by stored records.

use viewkit_core::ViewResult;

use crate::object_id::ObjectId;
use crate::value::{Fields, Value};

/// A record stored in a [`DocumentStore`](crate::DocumentStore).
///
/// Views never know a record's concrete shape. They read fields by name to
/// match URL parameters and to build template or JSON context, and write
/// fields by name when a form is saved.
///
/// # Examples
///
/// ```
/// use viewkit_core::{ViewError, ViewResult};
/// use viewkit_db::{Document, Fields, ObjectId, Value};
///
/// #[derive(Clone, Default)]
/// struct User {
///     id: Option<ObjectId>,
///     username: String,
/// }
///
/// impl Document for User {
///     const NAME: &'static str = "User";
///
///     fn id(&self) -> Option<ObjectId> { self.id }
///     fn set_id(&mut self, id: ObjectId) { self.id = Some(id); }
///
///     fn fields(&self) -> Fields {
///         Fields::from([("username".to_string(), Value::from(self.username.as_str()))])
///     }
///
///     fn set_field(&mut self, name: &str, value: Value) -> ViewResult<()> {
///         match name {
///             "username" => self.username = value.to_string(),
///             other => return Err(ViewError::DatabaseError(format!("unknown field {other}"))),
///         }
///         Ok(())
///     }
/// }
///
/// let user = User { id: None, username: "bar".into() };
/// assert_eq!(user.get_field("username"), Some(Value::from("bar")));
/// assert_eq!(user.get_field("id"), Some(Value::Null));
/// ```
pub trait Document: Send + Sync + Clone + 'static {
    /// The type name, used to derive default context names.
    const NAME: &'static str;

    /// Returns the id, or `None` if the record was never saved.
    fn id(&self) -> Option<ObjectId>;

    /// Sets the id. Called by stores on first save.
    fn set_id(&mut self, id: ObjectId);

    /// Returns every field except the id.
    fn fields(&self) -> Fields;

    /// Writes a single field.
    ///
    /// Implementations return an error for unknown names or values that
    /// cannot be stored in the field.
    fn set_field(&mut self, name: &str, value: Value) -> ViewResult<()>;

    /// Reads a single field. `"id"` yields the id, or [`Value::Null`] when unsaved.
    fn get_field(&self, name: &str) -> Option<Value> {
        if name == "id" {
            return Some(self.id().into());
        }
        self.fields().remove(name)
    }

    /// Returns the record as an embedded-document value, including `id`.
    fn to_value(&self) -> Value {
        let mut fields = self.fields();
        fields.insert("id".to_string(), self.id().into());
        Value::Document(fields)
    }
}
