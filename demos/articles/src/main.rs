//! # Articles demo
//!
//! A small site built from viewkit's class-based views:
//!
//! - `TemplateView` home page
//! - paginated `ListView`s, one filtered by category from the path
//! - `DetailView` by id, and by author and slug
//! - `CreateView` and `UpdateView` forms
//! - `JsonListView` and `JsonDetailView` under `/api/`
//!
//! ## Running
//!
//! ```bash
//! cd demos/articles
//! cargo run -- --addr 127.0.0.1:8000
//! ```

mod models;
mod views;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use viewkit_core::logging::setup_logging;
use viewkit_core::{settings_loader, ViewResult};
use viewkit_db::{DocumentStore, MemoryStore};
use viewkit_template::Engine;

use models::{sample_articles, Article};

/// Serves the articles demo.
#[derive(Debug, Parser)]
#[command(name = "articles", version, about)]
struct Args {
    /// TOML settings file. Defaults apply when it does not exist.
    #[arg(long, default_value = "articles.toml")]
    config: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    addr: String,
}

#[tokio::main]
async fn main() -> ViewResult<()> {
    let args = Args::parse();

    let mut settings = if args.config.exists() {
        settings_loader::from_toml_file_with_env(&args.config)?
    } else {
        settings_loader::from_env()
    };
    if settings.template_dirs.is_empty() {
        settings.template_dirs.push(PathBuf::from("templates"));
    }
    setup_logging(&settings);
    tracing::info!(config = %args.config.display(), debug = settings.debug, "settings loaded");

    let engine = Arc::new(Engine::from_settings(&settings)?);
    let store: Arc<dyn DocumentStore<Article>> =
        Arc::new(MemoryStore::from_documents(sample_articles()));

    let app = views::app(&settings, &engine, &store);
    tracing::info!(routes = app.route_count(), "application ready");
    app.run(&args.addr).await
}
