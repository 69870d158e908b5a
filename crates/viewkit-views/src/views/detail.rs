//! Single-record views.
//!
//! [`SingleObject`] maps path parameters onto lookup fields and fetches
//! exactly one record. [`DetailView`] renders it through a template,
//! [`JsonDetailView`] serializes its fields.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use viewkit_core::utils::text::context_name;
use viewkit_core::{ViewError, ViewResult};
use viewkit_db::{Document, DocumentStore, Filter};
use viewkit_http::{HttpRequest, HttpResponse};
use viewkit_template::Engine;

use super::class_based::{Context, ContextMixin, TemplateResponseMixin, View};
use super::renderer::{DocumentEncoder, JsonRenderer, ResponseRenderer, TemplateRenderer};

/// Looks up one record from path parameters.
///
/// `get_fields` pairs a lookup field with the path parameter holding its
/// value. The default, `[("id", "id")]`, fetches by id from a route such as
/// `/users/{id}/`. With `[("cat", "category"), ("user", "author")]`, a
/// request for `/news/john/` looks up `cat = "news", user = "john"`.
pub struct SingleObject<D: Document> {
    store: Arc<dyn DocumentStore<D>>,
    get_fields: Vec<(String, String)>,
    context_object_name: Option<String>,
}

impl<D: Document> SingleObject<D> {
    /// Looks up records in `store` by id.
    pub fn new(store: Arc<dyn DocumentStore<D>>) -> Self {
        Self {
            store,
            get_fields: vec![("id".to_string(), "id".to_string())],
            context_object_name: None,
        }
    }

    /// Replaces the lookup mapping with `(field, path parameter)` pairs.
    #[must_use]
    pub fn get_fields(mut self, fields: &[(&str, &str)]) -> Self {
        self.get_fields = fields
            .iter()
            .map(|(field, param)| ((*field).to_string(), (*param).to_string()))
            .collect();
        self
    }

    /// Sets the context key for the record.
    #[must_use]
    pub fn context_object_name(mut self, name: impl Into<String>) -> Self {
        self.context_object_name = Some(name.into());
        self
    }

    /// Returns the store.
    pub fn store(&self) -> &Arc<dyn DocumentStore<D>> {
        &self.store
    }

    /// Builds the lookup filter. A missing parameter constrains its field to
    /// be absent.
    pub fn get_filter(&self, kwargs: &HashMap<String, String>) -> Filter {
        let mut filter = Filter::new();
        for (field, param) in &self.get_fields {
            filter.push(field.clone(), kwargs.get(param).cloned());
        }
        filter
    }

    /// Fetches the record, turning a failed lookup into [`ViewError::NotFound`].
    pub async fn get_object(&self, kwargs: &HashMap<String, String>) -> ViewResult<D> {
        let filter = self.get_filter(kwargs);
        match self.store.get(&filter).await {
            Ok(object) => Ok(object),
            Err(ViewError::DoesNotExist(what)) => {
                tracing::debug!(document = D::NAME, %filter, "no record for lookup");
                Err(ViewError::NotFound(what))
            }
            Err(err) => Err(err),
        }
    }

    /// Returns the configured context name, or the lower-cased type name.
    pub fn get_context_object_name(&self) -> String {
        self.context_object_name
            .clone()
            .unwrap_or_else(|| context_name(D::NAME, ""))
    }
}

/// Renders one record through a template.
///
/// The context holds `params`, the record as `object`, and the record under
/// its context name (`user` for a `User`).
pub struct DetailView<D: Document> {
    object: SingleObject<D>,
    renderer: TemplateRenderer,
}

impl<D: Document> DetailView<D> {
    /// Creates a view fetching by id and rendering `template_name`.
    pub fn new(
        store: Arc<dyn DocumentStore<D>>,
        engine: Arc<Engine>,
        template_name: impl Into<String>,
    ) -> Self {
        Self {
            object: SingleObject::new(store),
            renderer: TemplateRenderer::new(engine, template_name),
        }
    }

    /// Replaces the lookup mapping.
    #[must_use]
    pub fn get_fields(mut self, fields: &[(&str, &str)]) -> Self {
        self.object = self.object.get_fields(fields);
        self
    }

    /// Sets the context key for the record.
    #[must_use]
    pub fn context_object_name(mut self, name: impl Into<String>) -> Self {
        self.object = self.object.context_object_name(name);
        self
    }

    /// Returns the lookup capability.
    pub const fn single_object(&self) -> &SingleObject<D> {
        &self.object
    }

    /// Builds the context for `object`.
    pub fn get_object_context(&self, kwargs: &HashMap<String, String>, object: &D) -> Context {
        let mut context = self.get_context_data(kwargs);
        let value = object.to_value();
        context.insert(self.object.get_context_object_name(), value.clone());
        context.insert("object".to_string(), value);
        context
    }
}

impl<D: Document> ContextMixin for DetailView<D> {}

impl<D: Document> TemplateResponseMixin for DetailView<D> {
    fn renderer(&self) -> &dyn ResponseRenderer {
        &self.renderer
    }
}

#[async_trait]
impl<D: Document> View for DetailView<D> {
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![http::Method::GET, http::Method::HEAD, http::Method::OPTIONS]
    }

    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let object = self.object.get_object(request.kwargs()).await?;
        let context = self.get_object_context(request.kwargs(), &object);
        self.render_to_response(&context)
    }
}

/// Serializes one record's fields, including `id`, as JSON.
pub struct JsonDetailView<D: Document> {
    object: SingleObject<D>,
    renderer: JsonRenderer,
}

impl<D: Document> JsonDetailView<D> {
    /// Creates a view fetching by id.
    pub fn new(store: Arc<dyn DocumentStore<D>>) -> Self {
        Self {
            object: SingleObject::new(store),
            renderer: JsonRenderer::new(DocumentEncoder),
        }
    }

    /// Replaces the lookup mapping.
    #[must_use]
    pub fn get_fields(mut self, fields: &[(&str, &str)]) -> Self {
        self.object = self.object.get_fields(fields);
        self
    }

    /// Indents the output.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.renderer = self.renderer.pretty(pretty);
        self
    }
}

#[async_trait]
impl<D: Document> View for JsonDetailView<D> {
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![http::Method::GET, http::Method::HEAD, http::Method::OPTIONS]
    }

    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let object = self.object.get_object(request.kwargs()).await?;
        self.renderer.render_value(&object.to_value())
    }
}

#[cfg(test)]
mod tests {
    use viewkit_db::{MemoryStore, Value};

    use super::*;
    use crate::testing::{as_store, seeded_store, User};

    fn kwargs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    async fn first_id(store: &Arc<MemoryStore<User>>) -> String {
        let user = store
            .get(&Filter::new().with("username", Some("user")))
            .await
            .unwrap();
        user.id.unwrap().to_hex()
    }

    #[test]
    fn test_filter_from_mapping() {
        let object = SingleObject::new(as_store(&seeded_store()))
            .get_fields(&[("cat", "category"), ("user", "author")]);
        let filter = object.get_filter(&kwargs(&[("category", "news"), ("author", "john")]));
        assert_eq!(filter.get("cat"), Some(Some("news")));
        assert_eq!(filter.get("user"), Some(Some("john")));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_filter_missing_param_is_none() {
        let object = SingleObject::new(as_store(&seeded_store()));
        let filter = object.get_filter(&HashMap::new());
        assert_eq!(filter.get("id"), Some(None));
    }

    #[test]
    fn test_context_object_name() {
        let object = SingleObject::new(as_store(&seeded_store()));
        assert_eq!(object.get_context_object_name(), "user");
        let object = object.context_object_name("member");
        assert_eq!(object.get_context_object_name(), "member");
    }

    #[tokio::test]
    async fn test_get_object() {
        let store = seeded_store();
        let id = first_id(&store).await;
        let object = SingleObject::new(as_store(&store));
        let user = object.get_object(&kwargs(&[("id", &id)])).await.unwrap();
        assert_eq!(user.username, "user");
    }

    #[tokio::test]
    async fn test_get_object_miss_is_not_found() {
        let object = SingleObject::new(as_store(&seeded_store()));
        let err = object
            .get_object(&kwargs(&[("id", "000000000000000000000000")]))
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_object_multiple_is_server_error() {
        let object = SingleObject::new(as_store(&seeded_store())).get_fields(&[("name", "name")]);
        let err = object
            .get_object(&kwargs(&[("name", "testtest")]))
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::MultipleObjectsReturned(_)));
    }

    fn engine() -> Arc<Engine> {
        let engine = Arc::new(Engine::new());
        engine
            .add_string_template("user_detail.html", "{{ user.username }}|{{ object.name }}|{{ params.id }}")
            .unwrap();
        engine
    }

    #[tokio::test]
    async fn test_detail_view_renders() {
        let store = seeded_store();
        let id = first_id(&store).await;
        let view = DetailView::new(as_store(&store), engine(), "user_detail.html");
        let request = HttpRequest::builder().path("/users/").kwarg("id", &id).build();
        let response = view.dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.text().unwrap(), format!("user|foofoo|{id}"));
    }

    #[tokio::test]
    async fn test_detail_view_miss_is_404() {
        let view = DetailView::new(as_store(&seeded_store()), engine(), "user_detail.html");
        let request = HttpRequest::builder().kwarg("id", "nonsense").build();
        let response = view.dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_detail_view_custom_lookup() {
        let engine = Arc::new(Engine::new());
        engine
            .add_string_template("member.html", "{{ member.name }}")
            .unwrap();
        let view = DetailView::new(as_store(&seeded_store()), engine, "member.html")
            .get_fields(&[("username", "username")])
            .context_object_name("member");
        let request = HttpRequest::builder().kwarg("username", "user3").build();
        let response = view.dispatch(request).await;
        assert_eq!(response.text().unwrap(), "testtest");
    }

    #[test]
    fn test_object_context_keys() {
        let view = DetailView::new(as_store(&seeded_store()), engine(), "user_detail.html");
        let user = User::new("bar", "Bar");
        let context = view.get_object_context(&HashMap::new(), &user);
        let keys: Vec<&str> = context.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["object", "params", "user"]);
        assert!(matches!(context.get("user"), Some(Value::Document(_))));
    }

    #[tokio::test]
    async fn test_json_detail_view() {
        let store = seeded_store();
        let id = first_id(&store).await;
        let view = JsonDetailView::new(as_store(&store));
        let request = HttpRequest::builder().kwarg("id", &id).build();
        let response = view.dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(response.content_type(), "application/json");
        let body: serde_json::Value = serde_json::from_str(&response.text().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"id": id, "username": "user", "name": "foofoo"})
        );
    }

    #[tokio::test]
    async fn test_json_detail_view_miss() {
        let view = JsonDetailView::new(as_store(&seeded_store()));
        let request = HttpRequest::builder().kwarg("id", "abc").build();
        let response = view.dispatch(request).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }
}
