//! String utility functions.

/// Escapes the five HTML-significant characters.
///
/// # Examples
///
/// ```
/// use viewkit_core::utils::text::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
///     "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Builds a template context name from a record type name.
///
/// The type name is lower-cased and `suffix` is appended, so `Article`
/// becomes `article` (no suffix) or `article_list` (suffix `_list`).
///
/// # Examples
///
/// ```
/// use viewkit_core::utils::text::context_name;
///
/// assert_eq!(context_name("Article", ""), "article");
/// assert_eq!(context_name("Article", "_list"), "article_list");
/// ```
pub fn context_name(type_name: &str, suffix: &str) -> String {
    let mut name = type_name.to_lowercase();
    name.push_str(suffix);
    name
}

/// Capitalizes the first character of a string.
///
/// # Examples
///
/// ```
/// use viewkit_core::utils::text::capfirst;
///
/// assert_eq!(capfirst("user name"), "User name");
/// assert_eq!(capfirst(""), "");
/// ```
pub fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
