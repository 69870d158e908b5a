//! Equality filters built from URL parameters.

use std::fmt;

use crate::document::Document;

/// An ordered set of equality constraints on document fields.
///
/// Each constraint maps a lookup key to the raw URL parameter value. A `None`
/// value means the parameter was absent from the URL; it matches documents
/// where the field is missing or null.
///
/// # Examples
///
/// ```
/// use viewkit_db::Filter;
///
/// let filter = Filter::new()
///     .with("cat", Some("news"))
///     .with("user", None::<&str>);
/// assert_eq!(filter.len(), 2);
/// assert_eq!(filter.get("cat"), Some(Some("news")));
/// assert_eq!(filter.get("user"), Some(None));
/// assert_eq!(filter.to_string(), "cat=news, user=None");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    constraints: Vec<(String, Option<String>)>,
}

impl Filter {
    /// Creates an empty filter, which matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.push(key, value);
        self
    }

    /// Adds a constraint. A later constraint on the same key replaces the earlier one.
    pub fn push(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        let key = key.into();
        let value = value.map(Into::into);
        if let Some(existing) = self.constraints.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.constraints.push((key, value));
        }
    }

    /// Returns the constraint for `key`: `None` if unconstrained,
    /// `Some(None)` if constrained to a missing value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.constraints
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref())
    }

    /// Iterates over the constraints in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.constraints
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Returns the number of constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if there are no constraints.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns `true` if `doc` satisfies every constraint.
    pub fn matches<D: Document>(&self, doc: &D) -> bool {
        self.constraints.iter().all(|(key, expected)| {
            let actual = doc.get_field(key);
            match expected {
                Some(param) => actual.is_some_and(|v| v.matches_param(param)),
                None => actual.map_or(true, |v| v.is_null()),
            }
        })
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.constraints.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value {
                Some(v) => write!(f, "{key}={v}")?,
                None => write!(f, "{key}=None")?,
            }
        }
        Ok(())
    }
}
