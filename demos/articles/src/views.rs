//! Routes and views of the articles demo.

use std::sync::Arc;

use viewkit_core::Settings;
use viewkit_db::{DocumentStore, Value};
use viewkit_forms::{FormFieldDef, FormFieldType, WidgetType};
use viewkit_template::Engine;
use viewkit_views::{
    App, CreateView, DetailView, FormMixin, JsonDetailView, JsonListView, ListView,
    TemplateView, UpdateView,
};

use crate::models::Article;

/// Articles shown per page.
pub const PAGE_SIZE: usize = 5;

fn article_form() -> FormMixin {
    FormMixin::from_fields(vec![
        FormFieldDef::new("title", FormFieldType::char()),
        FormFieldDef::new("author", FormFieldType::char()),
        FormFieldDef::new("category", FormFieldType::char()).initial("news"),
        FormFieldDef::new("body", FormFieldType::char()).widget(WidgetType::Textarea),
    ])
}

/// Builds the application.
pub fn app(
    settings: &Settings,
    engine: &Arc<Engine>,
    store: &Arc<dyn DocumentStore<Article>>,
) -> App {
    let list = || {
        ListView::new(Arc::clone(store), Arc::clone(engine), "article_list.html")
            .configure(|o| o.with_settings(settings))
            .items_per_page(PAGE_SIZE)
    };

    App::new(settings.clone())
        .route(
            "/",
            TemplateView::new(Arc::clone(engine), "home.html")
                .with_context("greeting", Value::from("Welcome to the articles demo")),
        )
        .route("/articles/", list())
        .route("/articles/page/{page}/", list())
        .route(
            "/articles/category/{category}/",
            list().filter_fields(&[("category", "category")]),
        )
        .route(
            "/articles/new/",
            CreateView::new(
                article_form().success_url("/articles/{id}/"),
                Arc::clone(store),
                Arc::clone(engine),
                "article_form.html",
            ),
        )
        .route(
            "/articles/{id}/",
            DetailView::new(Arc::clone(store), Arc::clone(engine), "article_detail.html"),
        )
        .route(
            "/articles/{id}/edit/",
            UpdateView::new(
                article_form().success_url("/articles/{id}/"),
                Arc::clone(store),
                Arc::clone(engine),
                "article_form.html",
            ),
        )
        .route(
            "/by/{author}/{slug}/",
            DetailView::new(Arc::clone(store), Arc::clone(engine), "article_detail.html")
                .get_fields(&[("author", "author"), ("slug", "slug")]),
        )
        .route(
            "/api/articles/",
            JsonListView::new(Arc::clone(store))
                .configure(|o| o.with_settings(settings).items_per_page(PAGE_SIZE))
                .pretty(settings.json_pretty),
        )
        .route(
            "/api/articles/{id}/",
            JsonDetailView::new(Arc::clone(store)).pretty(settings.json_pretty),
        )
}
