use crate::domain::error::MenuError;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::DiningClient;
use crate::infrastructure::parser::HtmlMenuParser;
use crate::infrastructure::storage::MenuCache;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<MenuCache>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, MenuError> {
        let source = Arc::new(DiningClient::from_config(&config)?);
        let cache = MenuCache::from_config(source, Arc::new(HtmlMenuParser), &config.cache);

        Ok(Self::with_cache(config, cache))
    }

    /// Build state around an already assembled cache (custom sources, tests)
    pub fn with_cache(config: Config, cache: MenuCache) -> Self {
        Self {
            cache: Arc::new(cache),
            config: Arc::new(config),
        }
    }
}
