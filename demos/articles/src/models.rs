//! The `Article` record and its sample data.

use viewkit_core::{ViewError, ViewResult};
use viewkit_db::{Document, Fields, ObjectId, Value};

/// A published article.
#[derive(Debug, Clone, Default)]
pub struct Article {
    pub id: Option<ObjectId>,
    pub title: String,
    /// URL-friendly title, unique per author.
    pub slug: String,
    pub author: String,
    pub category: String,
    pub body: String,
}

impl Article {
    pub fn new(title: &str, author: &str, category: &str, body: &str) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            slug: slugify(title),
            author: author.to_string(),
            category: category.to_string(),
            body: body.to_string(),
        }
    }
}

impl Document for Article {
    const NAME: &'static str = "Article";

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn fields(&self) -> Fields {
        Fields::from([
            ("title".to_string(), Value::from(self.title.as_str())),
            ("slug".to_string(), Value::from(self.slug.as_str())),
            ("author".to_string(), Value::from(self.author.as_str())),
            ("category".to_string(), Value::from(self.category.as_str())),
            ("body".to_string(), Value::from(self.body.as_str())),
        ])
    }

    fn set_field(&mut self, name: &str, value: Value) -> ViewResult<()> {
        let text = value.to_string();
        match name {
            "title" => {
                self.slug = slugify(&text);
                self.title = text;
            }
            "slug" => self.slug = text,
            "author" => self.author = text,
            "category" => self.category = text,
            "body" => self.body = text,
            other => {
                return Err(ViewError::FieldError {
                    field: other.to_string(),
                    message: "Article has no such field".to_string(),
                })
            }
        }
        Ok(())
    }
}

/// Lowercases `title` and joins its words with `-`.
fn slugify(title: &str) -> String {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Articles the demo starts with.
pub fn sample_articles() -> Vec<Article> {
    let mut articles = vec![
        Article::new(
            "Hello, viewkit",
            "ada",
            "news",
            "A first look at class-based views on axum.",
        ),
        Article::new(
            "Paginating large lists",
            "ada",
            "guides",
            "List views split records into pages.",
        ),
        Article::new(
            "Forms that save records",
            "grace",
            "guides",
            "Create and update views bind forms to records.",
        ),
    ];
    articles.extend((1..=9).map(|i| {
        Article::new(
            &format!("Release notes {i}"),
            "grace",
            "news",
            &format!("Changes in release {i}."),
        )
    }));
    articles
}
