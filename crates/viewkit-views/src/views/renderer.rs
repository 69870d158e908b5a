//! Response renderers and JSON encoders.
//!
//! A view owns one [`ResponseRenderer`] and hands it the context it built.
//! [`TemplateRenderer`] produces HTML through the template engine,
//! [`JsonRenderer`] produces `application/json` through a [`JsonEncoder`].

use std::sync::Arc;

use viewkit_core::{ViewError, ViewResult};
use viewkit_db::Value;
use viewkit_http::{HttpResponse, JsonResponse};
use viewkit_template::engine::TemplateContext;
use viewkit_template::Engine;

use super::class_based::Context;

/// Turns a context into a response.
pub trait ResponseRenderer: Send + Sync {
    /// Renders `context`.
    fn render(&self, context: &Context) -> ViewResult<HttpResponse>;
}

/// Renders a named template.
#[derive(Clone)]
pub struct TemplateRenderer {
    engine: Arc<Engine>,
    template_name: String,
    content_type: String,
}

impl TemplateRenderer {
    /// Creates a renderer for `template_name`, served as `text/html`.
    pub fn new(engine: Arc<Engine>, template_name: impl Into<String>) -> Self {
        Self {
            engine,
            template_name: template_name.into(),
            content_type: "text/html".to_string(),
        }
    }

    /// Overrides the response content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the template name.
    pub fn template_name(&self) -> &str {
        &self.template_name
    }
}

impl ResponseRenderer for TemplateRenderer {
    fn render(&self, context: &Context) -> ViewResult<HttpResponse> {
        let template_context: TemplateContext = context
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        let html = self
            .engine
            .render_to_string(&self.template_name, &template_context)?;
        let mut response = HttpResponse::ok(html);
        response.set_content_type(self.content_type.clone());
        Ok(response)
    }
}

/// Converts values into JSON.
pub trait JsonEncoder: Send + Sync {
    /// Encodes a single value.
    fn encode(&self, value: &Value) -> ViewResult<serde_json::Value>;

    /// Encodes a whole context as a JSON object.
    fn encode_context(&self, context: &Context) -> ViewResult<serde_json::Value> {
        let mut map = serde_json::Map::new();
        for (key, value) in context {
            map.insert(key.clone(), self.encode(value)?);
        }
        Ok(serde_json::Value::Object(map))
    }
}

/// Encodes plain values and rejects ids, timestamps and documents.
///
/// # Examples
///
/// ```
/// use viewkit_db::{ObjectId, Value};
/// use viewkit_views::{JsonEncoder, StandardEncoder};
///
/// assert_eq!(StandardEncoder.encode(&Value::from(3)).unwrap(), serde_json::json!(3));
/// assert!(StandardEncoder.encode(&Value::from(ObjectId::new())).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEncoder;

impl JsonEncoder for StandardEncoder {
    fn encode(&self, value: &Value) -> ViewResult<serde_json::Value> {
        match value {
            Value::ObjectId(_) => Err(not_serializable("ObjectId")),
            Value::DateTime(_) => Err(not_serializable("DateTime")),
            Value::Document(_) => Err(not_serializable("Document")),
            Value::List(items) => items
                .iter()
                .map(|item| self.encode(item))
                .collect::<ViewResult<Vec<_>>>()
                .map(serde_json::Value::Array),
            other => Ok(other.to_json()),
        }
    }
}

fn not_serializable(type_name: &str) -> ViewError {
    ViewError::SerializationError(format!("Object of type {type_name} is not JSON serializable"))
}

/// Encodes every value, including records.
///
/// Ids become hex strings and embedded documents become objects of their
/// fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentEncoder;

impl JsonEncoder for DocumentEncoder {
    fn encode(&self, value: &Value) -> ViewResult<serde_json::Value> {
        Ok(value.to_json())
    }
}

/// Serializes the context as JSON.
#[derive(Clone)]
pub struct JsonRenderer {
    encoder: Arc<dyn JsonEncoder>,
    pretty: bool,
}

impl JsonRenderer {
    /// Creates a renderer with `encoder`.
    pub fn new(encoder: impl JsonEncoder + 'static) -> Self {
        Self {
            encoder: Arc::new(encoder),
            pretty: false,
        }
    }

    /// Indents the output.
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Encodes a single value into a response body.
    pub fn render_value(&self, value: &Value) -> ViewResult<HttpResponse> {
        let json = self.encoder.encode(value)?;
        self.respond(&json)
    }

    fn respond(&self, json: &serde_json::Value) -> ViewResult<HttpResponse> {
        let body = if self.pretty {
            serde_json::to_string_pretty(json)?
        } else {
            serde_json::to_string(json)?
        };
        Ok(JsonResponse::from_string(body))
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new(StandardEncoder)
    }
}

impl ResponseRenderer for JsonRenderer {
    fn render(&self, context: &Context) -> ViewResult<HttpResponse> {
        let json = self.encoder.encode_context(context)?;
        self.respond(&json)
    }
}
