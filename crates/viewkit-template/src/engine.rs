//! The template engine.
//!
//! Templates whose names end in `.html`, `.htm` or `.xml` are autoescaped.
//! Pre-rendered HTML, such as a form's `as_p`, must be marked with the
//! `safe` filter.

use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use viewkit_core::{Settings, ViewError, ViewResult};

/// A context map handed to templates.
pub type TemplateContext = serde_json::Map<String, serde_json::Value>;

/// Loads and renders templates.
///
/// The engine can be shared between views; templates may be added at any
/// time through a shared reference.
///
/// # Examples
///
/// ```
/// use viewkit_template::Engine;
///
/// let engine = Engine::new();
/// engine.add_string_template("hello.html", "Hello {{ name }}!").unwrap();
///
/// let mut ctx = serde_json::Map::new();
/// ctx.insert("name".into(), "<World>".into());
/// assert_eq!(engine.render_to_string("hello.html", &ctx).unwrap(), "Hello &lt;World&gt;!");
/// ```
#[derive(Debug)]
pub struct Engine {
    tera: RwLock<tera::Tera>,
}

impl Engine {
    /// Creates an engine with no templates.
    pub fn new() -> Self {
        let mut tera = tera::Tera::default();
        tera.autoescape_on(vec![".html", ".htm", ".xml"]);
        Self {
            tera: RwLock::new(tera),
        }
    }

    /// Creates an engine loading every file under each directory.
    ///
    /// Template names are paths relative to their directory. When two
    /// directories hold the same name, the earlier one wins.
    pub fn from_dirs(dirs: &[PathBuf]) -> ViewResult<Self> {
        let engine = Self::new();
        for dir in dirs {
            engine.load_dir(dir)?;
        }
        Ok(engine)
    }

    /// Creates an engine from `settings.template_dirs`.
    pub fn from_settings(settings: &Settings) -> ViewResult<Self> {
        Self::from_dirs(&settings.template_dirs)
    }

    /// Loads every file under `dir`. Names already loaded are kept.
    pub fn load_dir(&self, dir: &Path) -> ViewResult<()> {
        if !dir.is_dir() {
            return Err(ViewError::ImproperlyConfigured(format!(
                "template directory '{}' does not exist",
                dir.display()
            )));
        }
        let glob = format!("{}/**/*", dir.display());
        let loaded = tera::Tera::new(&glob).map_err(|e| map_tera_error(&e))?;
        tracing::debug!(dir = %dir.display(), count = loaded.get_template_names().count(), "loaded templates");
        self.write()?
            .extend(&loaded)
            .map_err(|e| map_tera_error(&e))
    }

    /// Adds a template from a string, replacing any template of the same name.
    pub fn add_string_template(&self, name: &str, source: &str) -> ViewResult<()> {
        self.write()?
            .add_raw_template(name, source)
            .map_err(|e| map_tera_error(&e))
    }

    /// Returns `true` if a template with this name is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera
            .read()
            .map(|tera| tera.get_template_names().any(|n| n == name))
            .unwrap_or(false)
    }

    /// Renders the named template.
    pub fn render_to_string(&self, name: &str, context: &TemplateContext) -> ViewResult<String> {
        let tera = self
            .tera
            .read()
            .map_err(|_| ViewError::InternalServerError("template engine lock poisoned".into()))?;
        if !tera.get_template_names().any(|n| n == name) {
            return Err(ViewError::TemplateDoesNotExist(name.to_string()));
        }
        let ctx = tera::Context::from_value(serde_json::Value::Object(context.clone()))
            .map_err(|e| map_tera_error(&e))?;
        tera.render(name, &ctx).map_err(|e| map_tera_error(&e))
    }

    fn write(&self) -> ViewResult<std::sync::RwLockWriteGuard<'_, tera::Tera>> {
        self.tera
            .write()
            .map_err(|_| ViewError::InternalServerError("template engine lock poisoned".into()))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn map_tera_error(err: &tera::Error) -> ViewError {
    if let tera::ErrorKind::TemplateNotFound(name) = &err.kind {
        return ViewError::TemplateDoesNotExist(name.clone());
    }
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    ViewError::TemplateSyntaxError(message)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn ctx(pairs: &[(&str, serde_json::Value)]) -> TemplateContext {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_render_string_template() {
        let engine = Engine::new();
        engine
            .add_string_template("user.html", "{{ user.username }}")
            .unwrap();
        let out = engine
            .render_to_string("user.html", &ctx(&[("user", serde_json::json!({"username": "bar"}))]))
            .unwrap();
        assert_eq!(out, "bar");
    }

    #[test]
    fn test_safe_filter_skips_escaping() {
        let engine = Engine::new();
        engine
            .add_string_template("form.html", "{{ form.as_p | safe }}|{{ form.as_p }}")
            .unwrap();
        let out = engine
            .render_to_string(
                "form.html",
                &ctx(&[("form", serde_json::json!({"as_p": "<p>x</p>"}))]),
            )
            .unwrap();
        assert_eq!(out, "<p>x</p>|&lt;p&gt;x&lt;&#x2F;p&gt;");
    }

    #[test]
    fn test_txt_not_escaped() {
        let engine = Engine::new();
        engine.add_string_template("a.txt", "{{ v }}").unwrap();
        let out = engine
            .render_to_string("a.txt", &ctx(&[("v", "<b>".into())]))
            .unwrap();
        assert_eq!(out, "<b>");
    }

    #[test]
    fn test_missing_template() {
        let engine = Engine::new();
        let err = engine
            .render_to_string("nope.html", &TemplateContext::new())
            .unwrap_err();
        assert!(matches!(err, ViewError::TemplateDoesNotExist(name) if name == "nope.html"));
    }

    #[test]
    fn test_syntax_error() {
        let engine = Engine::new();
        let err = engine
            .add_string_template("bad.html", "{% if %}")
            .unwrap_err();
        assert!(matches!(err, ViewError::TemplateSyntaxError(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_undefined_variable_is_error() {
        let engine = Engine::new();
        engine.add_string_template("u.html", "{{ missing }}").unwrap();
        let err = engine
            .render_to_string("u.html", &TemplateContext::new())
            .unwrap_err();
        assert!(matches!(err, ViewError::TemplateSyntaxError(_)));
    }

    #[test]
    fn test_from_dirs() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::create_dir(first.path().join("users")).unwrap();
        fs::write(first.path().join("users/detail.html"), "first {{ n }}").unwrap();
        fs::write(first.path().join("base.html"), "base").unwrap();
        fs::write(second.path().join("base.html"), "shadowed").unwrap();
        fs::write(second.path().join("extra.html"), "extra").unwrap();

        let engine =
            Engine::from_dirs(&[first.path().to_path_buf(), second.path().to_path_buf()]).unwrap();
        assert!(engine.has_template("users/detail.html"));
        assert_eq!(
            engine
                .render_to_string("users/detail.html", &ctx(&[("n", 1.into())]))
                .unwrap(),
            "first 1"
        );
        assert_eq!(
            engine.render_to_string("base.html", &TemplateContext::new()).unwrap(),
            "base"
        );
        assert!(engine.has_template("extra.html"));
    }

    #[test]
    fn test_from_dirs_missing_dir() {
        let err = Engine::from_dirs(&[PathBuf::from("/nonexistent/templates")]).unwrap_err();
        assert!(matches!(err, ViewError::ImproperlyConfigured(_)));
    }

    #[test]
    fn test_from_settings_empty() {
        let engine = Engine::from_settings(&Settings::default()).unwrap();
        assert!(!engine.has_template("anything.html"));
    }
}
