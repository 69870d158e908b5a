//! Shared fixtures for the end-to-end tests.

#![allow(dead_code)]

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;
use viewkit_core::{Settings, ViewError, ViewResult};
use viewkit_db::{Document, DocumentStore, Fields, Filter, MemoryStore, ObjectId, Value};
use viewkit_forms::{FormFieldDef, FormFieldType};
use viewkit_template::Engine;
use viewkit_test::TestClient;
use viewkit_views::{
    App, CreateView, DetailView, FormMixin, FormView, JsonDetailView, JsonListView, JsonView,
    ListView, UpdateView,
};

#[derive(Debug, Clone, Default)]
pub struct User {
    pub id: Option<ObjectId>,
    pub username: String,
    pub name: String,
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
                    message: "unknown field".to_string(),
                })
            }
        }
        Ok(())
    }
}

fn user(username: &str, name: &str) -> User {
    User {
        id: None,
        username: username.to_string(),
        name: name.to_string(),
    }
}

/// `user`/`foofoo`, then `user1`..`user11` named `testtest`.
pub fn seeded_store() -> Arc<MemoryStore<User>> {
    let mut users = vec![user("user", "foofoo")];
    users.extend((1..=11).map(|i| user(&format!("user{i}"), "testtest")));
    Arc::new(MemoryStore::from_documents(users))
}

pub async fn id_of(store: &MemoryStore<User>, username: &str) -> String {
    store
        .get(&Filter::new().with("username", Some(username)))
        .await
        .unwrap()
        .id
        .unwrap()
        .to_hex()
}

/// Writes the templates to a temporary directory and loads them.
pub fn engine() -> (TempDir, Arc<Engine>) {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("users")).unwrap();
    fs::write(
        dir.path().join("users/list.html"),
        "{% for user in user_list %}<li>{{ user.username }}</li>{% endfor %}\
         page {{ current_page }} of {{ page_count }}",
    )
    .unwrap();
    fs::write(
        dir.path().join("users/detail.html"),
        "<h1>{{ user.username }}</h1><p>{{ object.name }}</p>",
    )
    .unwrap();
    fs::write(
        dir.path().join("users/form.html"),
        "{% if user is defined %}<h1>{{ user.username }}</h1>{% endif %}\
         <form method=\"post\">{{ form.as_p | safe }}</form>",
    )
    .unwrap();

    let settings = Settings {
        template_dirs: vec![dir.path().to_path_buf()],
        ..Settings::default()
    };
    let engine = Arc::new(Engine::from_settings(&settings).unwrap());
    (dir, engine)
}

pub fn user_fields() -> Vec<FormFieldDef> {
    vec![
        FormFieldDef::new("username", FormFieldType::char()),
        FormFieldDef::new("name", FormFieldType::char()),
    ]
}

/// Mounts every view over `store`.
pub fn client(store: &Arc<MemoryStore<User>>, engine: &Arc<Engine>) -> TestClient {
    let shared: Arc<dyn DocumentStore<User>> = Arc::clone(store) as Arc<dyn DocumentStore<User>>;
    let settings = Settings::default();

    let by_name = || {
        ListView::new(Arc::clone(&shared), Arc::clone(engine), "users/list.html")
            .configure(|o| o.with_settings(&settings))
            .filter_fields(&[("name", "name")])
            .items_per_page(3)
    };

    let app = App::new(settings.clone())
        .route("/users/", ListView::new(Arc::clone(&shared), Arc::clone(engine), "users/list.html"))
        .route("/users/by-name/{name}/", by_name())
        .route("/users/by-name/{name}/page/{page}/", by_name())
        .route(
            "/users/new/",
            CreateView::new(
                FormMixin::from_fields(user_fields()).success_url("http://google.com/"),
                Arc::clone(&shared),
                Arc::clone(engine),
                "users/form.html",
            ),
        )
        .route(
            "/users/{id}/",
            DetailView::new(Arc::clone(&shared), Arc::clone(engine), "users/detail.html"),
        )
        .route(
            "/users/{id}/edit/",
            UpdateView::new(
                FormMixin::from_fields(user_fields()).success_url("/users/{id}/"),
                Arc::clone(&shared),
                Arc::clone(engine),
                "users/form.html",
            ),
        )
        .route("/users/{id}/json/", JsonDetailView::new(Arc::clone(&shared)))
        .route(
            "/api/users/{name}/",
            JsonListView::new(Arc::clone(&shared))
                .configure(|o| o.filter_fields(&[("name", "name")]).items_per_page(5)),
        )
        .route(
            "/signup/",
            FormView::new(
                FormMixin::from_fields(user_fields())
                    .initial("username", "Foo")
                    .success_url("/thanks/"),
                Arc::clone(engine),
                "users/form.html",
            ),
        )
        .route("/echo/{user}/{slug}/", JsonView::new());

    TestClient::new(app.into_router())
}
