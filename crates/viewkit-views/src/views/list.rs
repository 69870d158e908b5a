//! Paginated multi-record views.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use viewkit_core::utils::text::context_name;
use viewkit_core::{Settings, ViewError, ViewResult};
use viewkit_db::{Document, DocumentStore, Filter, Value};
use viewkit_http::{HttpRequest, HttpResponse};
use viewkit_template::Engine;

use super::class_based::{Context, ContextMixin, TemplateResponseMixin, View};
use super::renderer::{DocumentEncoder, JsonRenderer, ResponseRenderer, TemplateRenderer};
use crate::pagination::PageDescriptor;

/// One page of records with its position.
#[derive(Debug, Clone)]
pub struct Page<D> {
    /// The records on this page.
    pub object_list: Vec<D>,
    /// Where the page sits in the result set.
    pub descriptor: PageDescriptor,
}

/// Fetches filtered, optionally paginated record lists.
///
/// `filter_fields` pairs a lookup field with a path parameter, as in
/// [`SingleObject`](super::detail::SingleObject); an empty mapping lists
/// every record. `items_per_page` of `0` disables pagination.
///
/// The page number is read from the path parameter named `page_kwarg`,
/// then from the query string, and defaults to 1. Malformed numbers and `0`
/// fall back to page 1 unless `strict_page_numbers` is set, in which case
/// they are rejected with 400.
pub struct MultipleObject<D: Document> {
    store: Arc<dyn DocumentStore<D>>,
    filter_fields: Vec<(String, String)>,
    items_per_page: usize,
    page_kwarg: String,
    strict_page_numbers: bool,
    context_object_name: Option<String>,
}

impl<D: Document> MultipleObject<D> {
    /// Lists every record in `store`, unpaginated.
    pub fn new(store: Arc<dyn DocumentStore<D>>) -> Self {
        Self {
            store,
            filter_fields: Vec::new(),
            items_per_page: 0,
            page_kwarg: "page".to_string(),
            strict_page_numbers: false,
            context_object_name: None,
        }
    }

    /// Takes `page_kwarg` and `strict_page_numbers` from settings.
    #[must_use]
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.page_kwarg.clone_from(&settings.page_kwarg);
        self.strict_page_numbers = settings.strict_page_numbers;
        self
    }

    /// Sets the `(field, path parameter)` filter mapping.
    #[must_use]
    pub fn filter_fields(mut self, fields: &[(&str, &str)]) -> Self {
        self.filter_fields = fields
            .iter()
            .map(|(field, param)| ((*field).to_string(), (*param).to_string()))
            .collect();
        self
    }

    /// Sets the page size. `0` disables pagination.
    #[must_use]
    pub const fn items_per_page(mut self, items: usize) -> Self {
        self.items_per_page = items;
        self
    }

    /// Sets the name of the page parameter.
    #[must_use]
    pub fn page_kwarg(mut self, name: impl Into<String>) -> Self {
        self.page_kwarg = name.into();
        self
    }

    /// Rejects malformed page numbers with 400 instead of using page 1.
    #[must_use]
    pub const fn strict_page_numbers(mut self, strict: bool) -> Self {
        self.strict_page_numbers = strict;
        self
    }

    /// Sets the context key for the list.
    #[must_use]
    pub fn context_object_name(mut self, name: impl Into<String>) -> Self {
        self.context_object_name = Some(name.into());
        self
    }

    /// Returns the store.
    pub fn store(&self) -> &Arc<dyn DocumentStore<D>> {
        &self.store
    }

    /// Builds the filter. A missing parameter constrains its field to be absent.
    pub fn get_filter_fields(&self, kwargs: &HashMap<String, String>) -> Filter {
        let mut filter = Filter::new();
        for (field, param) in &self.filter_fields {
            filter.push(field.clone(), kwargs.get(param).cloned());
        }
        filter
    }

    /// Returns the requested page number.
    pub fn get_page_number(&self, request: &HttpRequest) -> ViewResult<usize> {
        let raw = request
            .kwarg(&self.page_kwarg)
            .or_else(|| request.get().get(&self.page_kwarg));
        let Some(raw) = raw else {
            return Ok(1);
        };
        match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ if self.strict_page_numbers => Err(ViewError::BadRequest(format!(
                "invalid page number '{raw}'"
            ))),
            _ => {
                tracing::debug!(page = raw, "malformed page number, using page 1");
                Ok(1)
            }
        }
    }

    /// Returns `ceil(count / items_per_page)`, or `None` when not paginated.
    pub async fn get_page_count(&self, filter: &Filter) -> ViewResult<Option<usize>> {
        if self.items_per_page == 0 {
            return Ok(None);
        }
        let total = self.store.count(filter).await?;
        Ok(PageDescriptor::new(1, self.items_per_page, total).page_count())
    }

    /// Returns the records of the requested page, or all matching records
    /// when not paginated.
    pub async fn get_object_list(&self, request: &HttpRequest) -> ViewResult<Vec<D>> {
        let filter = self.get_filter_fields(request.kwargs());
        let number = self.get_page_number(request)?;
        self.fetch(&filter, number).await
    }

    /// Fetches the requested page with its descriptor.
    pub async fn get_page(&self, request: &HttpRequest) -> ViewResult<Page<D>> {
        let filter = self.get_filter_fields(request.kwargs());
        let number = self.get_page_number(request)?;
        let object_list = self.fetch(&filter, number).await?;
        let total = if self.items_per_page == 0 {
            object_list.len()
        } else {
            self.store.count(&filter).await?
        };
        Ok(Page {
            object_list,
            descriptor: PageDescriptor::new(number, self.items_per_page, total),
        })
    }

    /// Returns the configured context name, or `<type>_list`.
    pub fn get_context_object_name(&self) -> String {
        self.context_object_name
            .clone()
            .unwrap_or_else(|| context_name(D::NAME, "_list"))
    }

    /// Builds the list context for `page` on top of `context`.
    pub fn extend_context(&self, context: &mut Context, page: &Page<D>) {
        let list = Value::List(page.object_list.iter().map(Document::to_value).collect());
        let descriptor = &page.descriptor;
        context.insert(self.get_context_object_name(), list.clone());
        context.insert("object_list".to_string(), list);
        context.insert("is_paginated".to_string(), descriptor.is_paginated().into());
        context.insert(
            "current_page".to_string(),
            page_value(descriptor.is_paginated().then_some(descriptor.number())),
        );
        context.insert("page_count".to_string(), page_value(descriptor.page_count()));
        context.insert("has_next".to_string(), descriptor.has_next().into());
        context.insert("has_previous".to_string(), descriptor.has_previous().into());
        context.insert(
            "next_page_number".to_string(),
            page_value(descriptor.next_page_number()),
        );
        context.insert(
            "previous_page_number".to_string(),
            page_value(descriptor.previous_page_number()),
        );
    }

    async fn fetch(&self, filter: &Filter, number: usize) -> ViewResult<Vec<D>> {
        let descriptor = PageDescriptor::new(number, self.items_per_page, 0);
        let Some(range) = descriptor.slice_range() else {
            if descriptor.is_paginated() {
                return Err(ViewError::NotFound(format!("page {number} is out of range")));
            }
            return self.store.all(filter).await;
        };

        let objects = match self.store.find(filter, range).await {
            Ok(objects) => objects,
            Err(ViewError::IndexOutOfRange(msg)) => return Err(ViewError::NotFound(msg)),
            Err(err) => return Err(err),
        };
        if objects.is_empty() && number > 1 {
            tracing::debug!(document = D::NAME, page = number, "empty page");
            return Err(ViewError::NotFound(format!("page {number} is empty")));
        }
        Ok(objects)
    }
}

fn page_value(n: Option<usize>) -> Value {
    n.and_then(|n| i64::try_from(n).ok()).into()
}

/// Renders a page of records through a template.
///
/// The context holds `params`, the records under their context name
/// (`user_list` for `User`) and as `object_list`, plus `is_paginated`,
/// `current_page`, `page_count`, `has_next`, `has_previous`,
/// `next_page_number` and `previous_page_number` (null at either end).
pub struct ListView<D: Document> {
    objects: MultipleObject<D>,
    renderer: TemplateRenderer,
}

impl<D: Document> ListView<D> {
    /// Creates a view rendering `template_name`.
    pub fn new(
        store: Arc<dyn DocumentStore<D>>,
        engine: Arc<Engine>,
        template_name: impl Into<String>,
    ) -> Self {
        Self {
            objects: MultipleObject::new(store),
            renderer: TemplateRenderer::new(engine, template_name),
        }
    }

    /// Adjusts the list capability.
    #[must_use]
    pub fn configure(mut self, f: impl FnOnce(MultipleObject<D>) -> MultipleObject<D>) -> Self {
        self.objects = f(self.objects);
        self
    }

    /// Sets the page size.
    #[must_use]
    pub fn items_per_page(self, items: usize) -> Self {
        self.configure(|o| o.items_per_page(items))
    }

    /// Sets the filter mapping.
    #[must_use]
    pub fn filter_fields(self, fields: &[(&str, &str)]) -> Self {
        self.configure(|o| o.filter_fields(fields))
    }

    /// Returns the list capability.
    pub const fn multiple_object(&self) -> &MultipleObject<D> {
        &self.objects
    }
}

impl<D: Document> ContextMixin for ListView<D> {}

impl<D: Document> TemplateResponseMixin for ListView<D> {
    fn renderer(&self) -> &dyn ResponseRenderer {
        &self.renderer
    }
}

#[async_trait]
impl<D: Document> View for ListView<D> {
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![http::Method::GET, http::Method::HEAD, http::Method::OPTIONS]
    }

    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let page = self.objects.get_page(&request).await?;
        let mut context = self.get_context_data(request.kwargs());
        self.objects.extend_context(&mut context, &page);
        self.render_to_response(&context)
    }
}

/// Serializes a page of records and its position as JSON.
pub struct JsonListView<D: Document> {
    objects: MultipleObject<D>,
    renderer: JsonRenderer,
}

impl<D: Document> JsonListView<D> {
    /// Creates a view over `store`.
    pub fn new(store: Arc<dyn DocumentStore<D>>) -> Self {
        Self {
            objects: MultipleObject::new(store),
            renderer: JsonRenderer::new(DocumentEncoder),
        }
    }

    /// Adjusts the list capability.
    #[must_use]
    pub fn configure(mut self, f: impl FnOnce(MultipleObject<D>) -> MultipleObject<D>) -> Self {
        self.objects = f(self.objects);
        self
    }

    /// Indents the output.
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.renderer = self.renderer.pretty(pretty);
        self
    }
}

impl<D: Document> ContextMixin for JsonListView<D> {}

impl<D: Document> TemplateResponseMixin for JsonListView<D> {
    fn renderer(&self) -> &dyn ResponseRenderer {
        &self.renderer
    }
}

#[async_trait]
impl<D: Document> View for JsonListView<D> {
    fn allowed_methods(&self) -> Vec<http::Method> {
        vec![http::Method::GET, http::Method::HEAD, http::Method::OPTIONS]
    }

    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let page = self.objects.get_page(&request).await?;
        let mut context = self.get_context_data(request.kwargs());
        self.objects.extend_context(&mut context, &page);
        self.render_to_response(&context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{as_store, seeded_store};

    fn testtest_users() -> MultipleObject<crate::testing::User> {
        MultipleObject::new(as_store(&seeded_store()))
            .filter_fields(&[("name", "name")])
            .items_per_page(3)
    }

    fn page_request(page: &str) -> HttpRequest {
        HttpRequest::builder()
            .kwarg("name", "testtest")
            .kwarg("page", page)
            .build()
    }

    #[test]
    fn test_filter_fields() {
        let objects = MultipleObject::new(as_store(&seeded_store()))
            .filter_fields(&[("cat", "category"), ("user", "author")]);
        let mut kwargs = HashMap::new();
        kwargs.insert("category".to_string(), "news".to_string());
        kwargs.insert("author".to_string(), "john".to_string());
        let filter = objects.get_filter_fields(&kwargs);
        assert_eq!(filter.get("cat"), Some(Some("news")));
        assert_eq!(filter.get("user"), Some(Some("john")));

        let filter = objects.get_filter_fields(&HashMap::new());
        assert_eq!(filter.get("cat"), Some(None));
    }

    #[test]
    fn test_empty_filter_fields() {
        let objects = MultipleObject::new(as_store(&seeded_store()));
        assert!(objects.get_filter_fields(&HashMap::new()).is_empty());
    }

    #[test]
    fn test_page_number_precedence() {
        let objects = testtest_users();
        let both = HttpRequest::builder()
            .kwarg("page", "3")
            .query_string("page=2")
            .build();
        assert_eq!(objects.get_page_number(&both).unwrap(), 3);

        let query = HttpRequest::builder().query_string("page=2").build();
        assert_eq!(objects.get_page_number(&query).unwrap(), 2);

        let none = HttpRequest::builder().build();
        assert_eq!(objects.get_page_number(&none).unwrap(), 1);
    }

    #[test]
    fn test_malformed_page_number_is_lenient() {
        let objects = testtest_users();
        for raw in ["abc", "0", "-2", ""] {
            let request = HttpRequest::builder().kwarg("page", raw).build();
            assert_eq!(objects.get_page_number(&request).unwrap(), 1, "{raw}");
        }
    }

    #[test]
    fn test_strict_page_number() {
        let objects = testtest_users().strict_page_numbers(true);
        let request = HttpRequest::builder().query_string("page=abc").build();
        let err = objects.get_page_number(&request).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_page_kwarg_from_settings() {
        let settings = Settings {
            page_kwarg: "p".to_string(),
            strict_page_numbers: true,
            ..Settings::default()
        };
        let objects = testtest_users().with_settings(&settings);
        let request = HttpRequest::builder().query_string("p=4&page=2").build();
        assert_eq!(objects.get_page_number(&request).unwrap(), 4);
    }

    #[tokio::test]
    async fn test_page_count() {
        let objects = testtest_users();
        let filter = Filter::new().with("name", Some("testtest"));
        assert_eq!(objects.get_page_count(&filter).await.unwrap(), Some(4));

        let unpaginated = MultipleObject::new(as_store(&seeded_store()));
        assert_eq!(unpaginated.get_page_count(&filter).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_object_list_pages() {
        let objects = testtest_users();
        let mut sizes = Vec::new();
        for page in ["1", "2", "3", "4"] {
            sizes.push(objects.get_object_list(&page_request(page)).await.unwrap().len());
        }
        assert_eq!(sizes, vec![3, 3, 3, 2]);

        let last = objects.get_object_list(&page_request("4")).await.unwrap();
        let names: Vec<&str> = last.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["user10", "user11"]);
    }

    #[tokio::test]
    async fn test_page_past_end_is_not_found() {
        let err = testtest_users()
            .get_object_list(&page_request("5"))
            .await
            .unwrap_err();
        assert!(matches!(err, ViewError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_empty_first_page_is_empty_list() {
        let objects = testtest_users();
        let request = HttpRequest::builder().kwarg("name", "nobody").build();
        assert!(objects.get_object_list(&request).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_page_is_not_found() {
        let request = page_request(&usize::MAX.to_string());
        let err = testtest_users().get_object_list(&request).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unpaginated_returns_all() {
        let objects = MultipleObject::new(as_store(&seeded_store()));
        let all = objects.get_object_list(&page_request("7")).await.unwrap();
        assert_eq!(all.len(), 12);
    }

    #[test]
    fn test_context_object_name() {
        assert_eq!(testtest_users().get_context_object_name(), "user_list");
        assert_eq!(
            testtest_users().context_object_name("members").get_context_object_name(),
            "members"
        );
    }

    #[tokio::test]
    async fn test_list_view_context() {
        let engine = Arc::new(Engine::new());
        engine
            .add_string_template(
                "list.html",
                "{% for u in user_list %}{{ u.username }},{% endfor %}\
                 {{ object_list | length }} {{ current_page }}/{{ page_count }} \
                 {{ is_paginated }} {{ has_previous }} {{ has_next }} \
                 {{ previous_page_number }}<{{ next_page_number }}",
            )
            .unwrap();
        let view = ListView::new(as_store(&seeded_store()), engine, "list.html")
            .filter_fields(&[("name", "name")])
            .items_per_page(3);
        let response = view.dispatch(page_request("2")).await;
        assert_eq!(response.status(), http::StatusCode::OK);
        assert_eq!(
            response.text().unwrap(),
            "user4,user5,user6,3 2/4 true true true 1<3"
        );
    }

    #[tokio::test]
    async fn test_list_view_out_of_range() {
        let view = ListView::new(as_store(&seeded_store()), Arc::new(Engine::new()), "list.html")
            .filter_fields(&[("name", "name")])
            .items_per_page(3);
        let response = view.dispatch(page_request("5")).await;
        assert_eq!(response.status(), http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_json_list_view() {
        let view = JsonListView::new(as_store(&seeded_store()))
            .configure(|o| o.filter_fields(&[("name", "name")]).items_per_page(3));
        let response = view.dispatch(page_request("4")).await;
        let body: serde_json::Value = serde_json::from_str(&response.text().unwrap()).unwrap();
        assert_eq!(body["user_list"][0]["username"], "user10");
        assert_eq!(body["object_list"].as_array().unwrap().len(), 2);
        assert_eq!(body["current_page"], 4);
        assert_eq!(body["page_count"], 4);
        assert_eq!(body["has_next"], false);
        assert!(body["next_page_number"].is_null());
        assert_eq!(body["previous_page_number"], 3);
        assert_eq!(body["params"]["page"], "4");
    }

    #[tokio::test]
    async fn test_json_list_view_unpaginated() {
        let view = JsonListView::new(as_store(&seeded_store()));
        let response = view.dispatch(HttpRequest::builder().build()).await;
        let body: serde_json::Value = serde_json::from_str(&response.text().unwrap()).unwrap();
        assert_eq!(body["object_list"].as_array().unwrap().len(), 12);
        assert_eq!(body["is_paginated"], false);
        assert!(body["page_count"].is_null());
        assert!(body["current_page"].is_null());
        assert!(body["next_page_number"].is_null());
    }
}
