//! Settings for the viewkit view layer.
//!
//! [`Settings`] holds the configuration that is shared by every view in an
//! application: logging, template directories, pagination defaults, and the
//! JSON output format. Views copy the values they need at construction time;
//! nothing reads a global at request time.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The complete set of view-layer settings.
///
/// Every field has a default, so partial configuration files are accepted.
///
/// # Examples
///
/// ```
/// use viewkit_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.page_kwarg, "page");
/// assert!(!settings.strict_page_numbers);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Selects pretty (debug) or JSON logs.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter directive (e.g. "info", "viewkit_views=debug").
    pub log_level: String,

    // ── Templates ────────────────────────────────────────────────────

    /// Directories searched for `*.html` templates.
    pub template_dirs: Vec<PathBuf>,

    // ── Pagination ───────────────────────────────────────────────────

    /// Name of the path/query parameter carrying the page number.
    pub page_kwarg: String,
    /// Reject malformed page numbers with 400 instead of falling back to page 1.
    pub strict_page_numbers: bool,

    // ── JSON ─────────────────────────────────────────────────────────

    /// Pretty-print JSON response bodies.
    pub json_pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            template_dirs: Vec::new(),
            page_kwarg: "page".to_string(),
            strict_page_numbers: false,
            json_pretty: false,
        }
    }
}
