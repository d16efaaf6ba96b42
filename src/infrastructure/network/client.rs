use crate::domain::error::MenuError;
use crate::domain::model::{ItemTokens, SessionCookies};
use crate::domain::traits::MenuSource;
use crate::infrastructure::config::{Config, UpstreamConfig};
use crate::infrastructure::network::http::create_client;
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, COOKIE, ORIGIN, REFERER};
use reqwest::{Client, Url};
use std::sync::Arc;
use tracing::debug;

const NUTRITION_ACTION: &str = "get_recipe_details";

/// Fetcher for the campus dining site and its nutrition AJAX endpoint
#[derive(Clone)]
pub struct DiningClient {
    client: Client,
    jar: Arc<Jar>,
    menu_url: String,
    nutrition_url: String,
}

impl DiningClient {
    /// `client` must have been built with `jar` as its cookie provider.
    pub fn new(client: Client, jar: Arc<Jar>, upstream: &UpstreamConfig) -> Self {
        Self {
            client,
            jar,
            menu_url: upstream.menu_url.clone(),
            nutrition_url: upstream.nutrition_url.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, MenuError> {
        let jar = Arc::new(Jar::default());
        let client = create_client(config, jar.clone())?;
        Ok(Self::new(client, jar, &config.upstream))
    }

    // scheme://host[:port] of the menu page, sent as Origin on AJAX calls
    fn origin(&self) -> Option<String> {
        Url::parse(&self.menu_url)
            .ok()
            .map(|url| url.origin().ascii_serialization())
    }
}

#[async_trait]
impl MenuSource for DiningClient {
    async fn fetch_menu_page(&self) -> Result<String, MenuError> {
        debug!(url = %self.menu_url, "fetching menu page");
        let body = self
            .client
            .get(&self.menu_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    async fn establish_session(&self) -> Result<SessionCookies, MenuError> {
        let response = self
            .client
            .get(&self.menu_url)
            .send()
            .await?
            .error_for_status()?;

        // The jar saw every redirect hop; take what it would send to the AJAX endpoint
        let url = Url::parse(&self.nutrition_url)
            .map_err(|e| MenuError::Config(format!("Invalid nutrition url: {}", e)))?;
        let cookies = self
            .jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(SessionCookies::from_cookie_header))
            .unwrap_or_default();
        debug!(
            final_url = %response.url(),
            count = cookies.pairs().len(),
            "session established"
        );
        Ok(cookies)
    }

    async fn fetch_nutrition_fragment(
        &self,
        tokens: &ItemTokens,
        cookies: &SessionCookies,
    ) -> Result<String, MenuError> {
        let form = [
            ("action", NUTRITION_ACTION),
            ("location", tokens.location.as_str()),
            ("id", tokens.recipe_id.as_str()),
            ("menu_id", tokens.menu_id.as_str()),
        ];

        let mut request = self
            .client
            .post(&self.nutrition_url)
            .form(&form)
            .header(ACCEPT, "*/*")
            .header("X-Requested-With", "XMLHttpRequest")
            .header(REFERER, self.menu_url.as_str());

        if let Some(origin) = self.origin() {
            request = request.header(ORIGIN, origin);
        }
        if !cookies.is_empty() {
            request = request.header(COOKIE, cookies.header_value());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MenuError::UpstreamRejected {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
