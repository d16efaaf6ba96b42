// HTTP client utilities
use crate::domain::error::MenuError;
use crate::infrastructure::config::Config;
use reqwest::cookie::Jar;
use reqwest::{Client, Proxy};
use std::sync::Arc;

/// Create the shared HTTP client from config
///
/// The request timeout lives here; the cache itself never times out a fetch.
/// Cookies set anywhere along a redirect chain land in `jar`.
pub fn create_client(config: &Config, jar: Arc<Jar>) -> Result<Client, MenuError> {
    let mut builder = Client::builder()
        .cookie_provider(jar)
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .timeout(config.upstream.timeout())
        .user_agent(config.upstream.user_agent.as_str());

    if let Some(proxy) = config.http_proxy.as_deref().filter(|p| !p.is_empty()) {
        builder = builder.proxy(Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}
