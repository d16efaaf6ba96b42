use crate::domain::error::MenuError;
use crate::domain::model::{ItemTokens, MenuStore, NutritionFacts, SessionCookies};
use async_trait::async_trait;

/// Trait for the upstream dining site
///
/// Implementations only move raw markup; they never interpret it.
/// The cache is written against this trait so tests and alternative
/// sites can be plugged in.
#[async_trait]
pub trait MenuSource: Send + Sync {
    /// Fetch the full menu page
    async fn fetch_menu_page(&self) -> Result<String, MenuError>;

    /// Perform the handshake request and return its cookies
    async fn establish_session(&self) -> Result<SessionCookies, MenuError>;

    /// Fetch the nutrition fragment for one item
    ///
    /// A non-success status is reported as `MenuError::UpstreamRejected`.
    async fn fetch_nutrition_fragment(
        &self,
        tokens: &ItemTokens,
        cookies: &SessionCookies,
    ) -> Result<String, MenuError>;
}

/// Trait for turning upstream markup into menu data
///
/// Parsing is tolerant: malformed sections are dropped, never fatal.
pub trait MenuParser: Send + Sync {
    /// Parse the menu page into a fresh store
    fn parse_menu_document(&self, html: &str) -> MenuStore;

    /// Parse a nutrition fragment into flat facts
    fn parse_nutrition_fragment(&self, html: &str) -> NutritionFacts;
}
