//! Form processing views.
//!
//! A GET renders an unbound form. A POST (or PUT) binds the submitted body
//! and validates it: a valid form redirects to the success URL, an invalid
//! one is rendered again with its errors and status 200. The model views
//! additionally copy the cleaned data onto a record and save it before
//! redirecting.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use viewkit_core::{ViewError, ViewResult};
use viewkit_db::{Document, DocumentStore, Value};
use viewkit_forms::{populate_document, BaseForm, Form, FormFieldDef};
use viewkit_http::{HttpRequest, HttpResponse, HttpResponseRedirect};
use viewkit_template::Engine;

use super::class_based::{Context, ContextMixin, TemplateResponseMixin, View};
use super::detail::SingleObject;
use super::renderer::{ResponseRenderer, TemplateRenderer};

/// Builds a fresh form for each request.
pub type FormFactory = Arc<dyn Fn() -> Box<dyn Form> + Send + Sync>;

/// Builds forms and knows where to go after a successful submission.
#[derive(Clone)]
pub struct FormMixin {
    factory: FormFactory,
    initial: HashMap<String, Value>,
    success_url: Option<String>,
}

impl FormMixin {
    /// Uses `factory` to create forms.
    pub fn new(factory: impl Fn() -> Box<dyn Form> + Send + Sync + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
            initial: HashMap::new(),
            success_url: None,
        }
    }

    /// Creates a [`BaseForm`] with `fields` for each request.
    pub fn from_fields(fields: Vec<FormFieldDef>) -> Self {
        Self::new(move || Box::new(BaseForm::new(fields.clone())))
    }

    /// Sets one form-level initial value.
    #[must_use]
    pub fn initial(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.initial.insert(field.into(), value.into());
        self
    }

    /// Sets the redirect target for valid submissions.
    #[must_use]
    pub fn success_url(mut self, url: impl Into<String>) -> Self {
        self.success_url = Some(url.into());
        self
    }

    /// Returns the form-level initial values.
    pub const fn get_initial(&self) -> &HashMap<String, Value> {
        &self.initial
    }

    /// Creates a form, bound to the body for POST and PUT.
    pub fn get_form(&self, request: &HttpRequest) -> Box<dyn Form> {
        let mut form = (self.factory)();
        if !self.initial.is_empty() {
            form.merge_initial(self.initial.clone());
        }
        if is_submission(request) {
            form.bind(request.post());
        }
        form
    }

    /// Returns the success URL, or an error when none is configured.
    pub fn get_success_url(&self) -> ViewResult<&str> {
        self.success_url.as_deref().ok_or_else(|| {
            ViewError::ImproperlyConfigured("no URL to redirect to, set success_url".to_string())
        })
    }
}

fn is_submission(request: &HttpRequest) -> bool {
    matches!(*request.method(), http::Method::POST | http::Method::PUT)
}

fn form_methods() -> Vec<http::Method> {
    vec![
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::HEAD,
        http::Method::OPTIONS,
    ]
}

/// Renders a form and redirects once it validates.
///
/// The template receives the form under `form`; render it with
/// `{{ form.as_p | safe }}` or field by field from `form.fields`.
pub struct FormView {
    form: FormMixin,
    renderer: TemplateRenderer,
}

impl FormView {
    /// Creates a view rendering `template_name`.
    pub fn new(form: FormMixin, engine: Arc<Engine>, template_name: impl Into<String>) -> Self {
        Self {
            form,
            renderer: TemplateRenderer::new(engine, template_name),
        }
    }

    /// Returns the form capability.
    pub const fn form_mixin(&self) -> &FormMixin {
        &self.form
    }

    fn render_form(&self, request: &HttpRequest, form: &dyn Form) -> ViewResult<HttpResponse> {
        let mut context = self.get_context_data(request.kwargs());
        context.insert("form".to_string(), Value::Json(form.as_context()));
        self.render_to_response(&context)
    }
}

impl ContextMixin for FormView {}

impl TemplateResponseMixin for FormView {
    fn renderer(&self) -> &dyn ResponseRenderer {
        &self.renderer
    }
}

#[async_trait]
impl View for FormView {
    fn allowed_methods(&self) -> Vec<http::Method> {
        form_methods()
    }

    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let form = self.form.get_form(&request);
        self.render_form(&request, form.as_ref())
    }

    async fn post(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let mut form = self.form.get_form(&request);
        if form.is_valid().await {
            Ok(HttpResponseRedirect::new(self.form.get_success_url()?))
        } else {
            self.render_form(&request, form.as_ref())
        }
    }

    async fn put(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        self.post(request).await
    }
}

/// Form handling bound to a record store.
///
/// The success URL may contain `{id}`, replaced by the saved record's id.
pub struct ModelFormMixin<D: Document> {
    form: FormMixin,
    object: SingleObject<D>,
}

impl<D: Document> ModelFormMixin<D> {
    /// Combines a form with a store, looking records up by id.
    pub fn new(form: FormMixin, store: Arc<dyn DocumentStore<D>>) -> Self {
        Self {
            form,
            object: SingleObject::new(store),
        }
    }

    /// Adjusts the lookup capability.
    #[must_use]
    pub fn configure_object(mut self, f: impl FnOnce(SingleObject<D>) -> SingleObject<D>) -> Self {
        self.object = f(self.object);
        self
    }

    /// Returns the lookup capability.
    pub const fn single_object(&self) -> &SingleObject<D> {
        &self.object
    }

    /// Returns the form capability.
    pub const fn form_mixin(&self) -> &FormMixin {
        &self.form
    }

    /// Creates a form, pre-populated from `object` when given.
    pub fn get_form(&self, request: &HttpRequest, object: Option<&D>) -> Box<dyn Form> {
        let mut form = self.form.get_form(request);
        if let Some(object) = object {
            form.set_instance(object.fields());
        }
        form
    }

    /// Returns the success URL for a saved `object`.
    pub fn get_success_url(&self, object: &D) -> ViewResult<String> {
        let url = self.form.get_success_url()?;
        let id = object.id().map(|id| id.to_hex()).unwrap_or_default();
        Ok(url.replace("{id}", &id))
    }

    /// Copies the cleaned data onto `object`, saves it and redirects.
    pub async fn form_valid(&self, form: &dyn Form, mut object: D) -> ViewResult<HttpResponse> {
        self.form.get_success_url()?;
        populate_document(form, &mut object)?;
        self.object.store().save(&mut object).await?;
        tracing::info!(
            document = D::NAME,
            id = %object.id().map(|id| id.to_hex()).unwrap_or_default(),
            "saved record from form"
        );
        Ok(HttpResponseRedirect::new(&self.get_success_url(&object)?))
    }

    /// Builds the context holding `params`, `form`, and the record when
    /// there is one.
    pub fn form_context(
        &self,
        kwargs: &HashMap<String, String>,
        form: &dyn Form,
        object: Option<&D>,
    ) -> Context {
        let mut context = self.get_context_data(kwargs);
        context.insert("form".to_string(), Value::Json(form.as_context()));
        if let Some(object) = object.filter(|o| o.id().is_some()) {
            let value = object.to_value();
            context.insert(self.object.get_context_object_name(), value.clone());
            context.insert("object".to_string(), value);
        }
        context
    }

    async fn process(
        &self,
        request: &HttpRequest,
        object: D,
        renderer: &dyn ResponseRenderer,
    ) -> ViewResult<HttpResponse> {
        let mut form = self.get_form(request, Some(&object));
        if form.is_valid().await {
            self.form_valid(form.as_ref(), object).await
        } else {
            renderer.render(&self.form_context(request.kwargs(), form.as_ref(), Some(&object)))
        }
    }
}

impl<D: Document> ContextMixin for ModelFormMixin<D> {}

/// Creates a record from a form.
///
/// GET renders an empty form. A valid POST saves a new `D::default()` with
/// the cleaned data and redirects.
pub struct CreateView<D: Document + Default> {
    model_form: ModelFormMixin<D>,
    renderer: TemplateRenderer,
}

impl<D: Document + Default> CreateView<D> {
    /// Creates a view rendering `template_name`.
    pub fn new(
        form: FormMixin,
        store: Arc<dyn DocumentStore<D>>,
        engine: Arc<Engine>,
        template_name: impl Into<String>,
    ) -> Self {
        Self {
            model_form: ModelFormMixin::new(form, store),
            renderer: TemplateRenderer::new(engine, template_name),
        }
    }

    /// Returns the model form capability.
    pub const fn model_form(&self) -> &ModelFormMixin<D> {
        &self.model_form
    }
}

impl<D: Document + Default> TemplateResponseMixin for CreateView<D> {
    fn renderer(&self) -> &dyn ResponseRenderer {
        &self.renderer
    }
}

#[async_trait]
impl<D: Document + Default> View for CreateView<D> {
    fn allowed_methods(&self) -> Vec<http::Method> {
        form_methods()
    }

    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let form = self.model_form.get_form(&request, None);
        let context = self
            .model_form
            .form_context(request.kwargs(), form.as_ref(), None);
        self.render_to_response(&context)
    }

    async fn post(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        self.model_form
            .process(&request, D::default(), &self.renderer)
            .await
    }

    async fn put(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        self.post(request).await
    }
}

/// Edits an existing record through a form.
///
/// The record is looked up from the path parameters first; a miss is 404
/// for both GET and POST.
pub struct UpdateView<D: Document> {
    model_form: ModelFormMixin<D>,
    renderer: TemplateRenderer,
}

impl<D: Document> UpdateView<D> {
    /// Creates a view rendering `template_name`.
    pub fn new(
        form: FormMixin,
        store: Arc<dyn DocumentStore<D>>,
        engine: Arc<Engine>,
        template_name: impl Into<String>,
    ) -> Self {
        Self {
            model_form: ModelFormMixin::new(form, store),
            renderer: TemplateRenderer::new(engine, template_name),
        }
    }

    /// Replaces the lookup mapping.
    #[must_use]
    pub fn get_fields(mut self, fields: &[(&str, &str)]) -> Self {
        self.model_form = self.model_form.configure_object(|o| o.get_fields(fields));
        self
    }

    /// Returns the model form capability.
    pub const fn model_form(&self) -> &ModelFormMixin<D> {
        &self.model_form
    }
}

impl<D: Document> TemplateResponseMixin for UpdateView<D> {
    fn renderer(&self) -> &dyn ResponseRenderer {
        &self.renderer
    }
}

#[async_trait]
impl<D: Document> View for UpdateView<D> {
    fn allowed_methods(&self) -> Vec<http::Method> {
        form_methods()
    }

    async fn get(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let object = self
            .model_form
            .single_object()
            .get_object(request.kwargs())
            .await?;
        let form = self.model_form.get_form(&request, Some(&object));
        let context = self
            .model_form
            .form_context(request.kwargs(), form.as_ref(), Some(&object));
        self.render_to_response(&context)
    }

    async fn post(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        let object = self
            .model_form
            .single_object()
            .get_object(request.kwargs())
            .await?;
        self.model_form.process(&request, object, &self.renderer).await
    }

    async fn put(&self, request: HttpRequest) -> ViewResult<HttpResponse> {
        self.post(request).await
    }
}
