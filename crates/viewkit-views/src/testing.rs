//! Records and stores shared by the unit tests.

use std::sync::Arc;

use viewkit_core::{ViewError, ViewResult};
use viewkit_db::{Document, DocumentStore, Fields, MemoryStore, ObjectId, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct User {
    pub id: Option<ObjectId>,
    pub username: String,
    pub name: String,
}

impl User {
    pub fn new(username: &str, name: &str) -> Self {
        Self {
            id: None,
            username: username.to_string(),
            name: name.to_string(),
        }
    }
}

impl Document for User {
    const NAME: &'static str = "User";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn fields(&self) -> Fields {
        Fields::from([
            ("username".to_string(), Value::from(self.username.as_str())),
            ("name".to_string(), Value::from(self.name.as_str())),
        ])
    }

    fn set_field(&mut self, name: &str, value: Value) -> ViewResult<()> {
        match name {
            "username" => self.username = value.to_string(),
            "name" => self.name = value.to_string(),
            other => {
                return Err(ViewError::FieldError {
                    field: other.to_string(),
                    message: "no such field on User".to_string(),
                })
            }
        }
        Ok(())
    }
}

/// `user`/`foofoo`, then `user1`..`user11` named `testtest`.
pub fn seeded_store() -> Arc<MemoryStore<User>> {
    let mut users = vec![User::new("user", "foofoo")];
    users.extend((1..=11).map(|i| User::new(&format!("user{i}"), "testtest")));
    Arc::new(MemoryStore::from_documents(users))
}

pub fn as_store(store: &Arc<MemoryStore<User>>) -> Arc<dyn DocumentStore<User>> {
    Arc::clone(store) as Arc<dyn DocumentStore<User>>
}
