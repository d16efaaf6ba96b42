//! Cached dining-hall menus with on-demand nutrition facts.
//!
//! The menu page is scraped at most once per TTL window into an immutable
//! snapshot (hall → period → category → item). Nutrition facts are fetched
//! the first time an item is asked for and stay attached to that snapshot.
//!
//! Layers:
//! - `domain`: model, errors and the fetch/parse traits
//! - `infrastructure`: reqwest fetcher, HTML parser, the cache, config
//! - `application`: read-only queries used by both interfaces
//! - `interfaces`: clap CLI and axum JSON API
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;

pub use domain::error::MenuError;
pub use infrastructure::storage::MenuCache;
pub use state::AppState;
