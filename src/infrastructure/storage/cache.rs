// Shared, time-expiring menu cache with lazy nutrition lookups
use crate::domain::error::MenuError;
use crate::domain::model::{
    all_items, find_item, CacheStatus, HallMenu, ItemRecord, MenuStore, NutritionFacts,
    RefreshSummary, SessionCookies,
};
use crate::domain::traits::{MenuParser, MenuSource};
use crate::infrastructure::config::CacheConfig;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// One installed menu. Never mutated after install except through the
/// write-once nutrition cells of its item records.
#[derive(Debug)]
struct Snapshot {
    store: Arc<MenuStore>,
    refreshed_at: Instant,
    scraped_at: DateTime<Utc>,
    generation: u64,
}

/// Owner of the current menu snapshot and the upstream session.
///
/// Refreshes are serialized by a single lock with a staleness re-check
/// inside it, so a burst of callers hitting an expired cache costs one
/// scrape. Readers only clone an `Arc` out of the snapshot slot.
pub struct MenuCache {
    source: Arc<dyn MenuSource>,
    parser: Arc<dyn MenuParser>,
    ttl: Duration,
    serve_stale_on_error: bool,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    refresh_lock: Mutex<()>,
    cookies: Mutex<Option<SessionCookies>>,
}

impl MenuCache {
    pub fn new(source: Arc<dyn MenuSource>, parser: Arc<dyn MenuParser>) -> Self {
        Self {
            source,
            parser,
            ttl: DEFAULT_TTL,
            serve_stale_on_error: false,
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            cookies: Mutex::new(None),
        }
    }

    pub fn from_config(
        source: Arc<dyn MenuSource>,
        parser: Arc<dyn MenuParser>,
        config: &CacheConfig,
    ) -> Self {
        Self::new(source, parser)
            .with_ttl(config.ttl())
            .with_serve_stale_on_error(config.serve_stale_on_error)
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_serve_stale_on_error(mut self, enabled: bool) -> Self {
        self.serve_stale_on_error = enabled;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The whole menu, refreshed first if stale or forced.
    ///
    /// The returned map is a fresh outer map over shared halls: replacing a
    /// hall in it does not touch the cache, while nutrition fetched through
    /// any item record is visible to every reader of this snapshot.
    pub async fn menu(&self, force_refresh: bool) -> Result<MenuStore, MenuError> {
        let snapshot = self.current(force_refresh).await?;
        Ok(MenuStore::clone(&snapshot.store))
    }

    /// One hall of the menu, shallow-copied like [`MenuCache::menu`].
    /// An unknown hall yields an empty map.
    pub async fn hall_menu(&self, hall: &str, force_refresh: bool) -> Result<HallMenu, MenuError> {
        let snapshot = self.current(force_refresh).await?;
        Ok(snapshot
            .store
            .get(hall)
            .map(|periods| HallMenu::clone(periods))
            .unwrap_or_default())
    }

    /// Force a re-scrape. Callers queued behind an in-flight refresh reuse
    /// its result instead of scraping again.
    pub async fn refresh(&self) -> Result<RefreshSummary, MenuError> {
        let snapshot = self.current(true).await?;
        Ok(RefreshSummary {
            halls: snapshot.store.len(),
            items: all_items(&snapshot.store).count(),
            scraped_at: snapshot.scraped_at,
        })
    }

    /// Nutrition facts for one item, fetched from upstream on first use.
    pub async fn nutrition(
        &self,
        hall: &str,
        period: &str,
        category: &str,
        food: &str,
    ) -> Result<NutritionFacts, MenuError> {
        let snapshot = self.current(false).await?;
        let record = find_item(&snapshot.store, hall, period, category, food)?.clone();
        self.enrich(&record).await
    }

    /// Fill in nutrition for `record` if it has none yet and return its facts.
    ///
    /// A rejected request stores empty facts, so the item is not asked for
    /// again until the next refresh, and drops the cached session. Transport
    /// errors leave the record unfetched.
    pub async fn enrich(&self, record: &ItemRecord) -> Result<NutritionFacts, MenuError> {
        if !record.tokens().is_complete() {
            debug!("item has no nutrition tokens, skipping lookup");
            return Ok(NutritionFacts::new());
        }

        let facts = record
            .nutrition_or_fetch(|| async {
                let cookies = self.session_cookies().await?;
                let fetched = self
                    .source
                    .fetch_nutrition_fragment(record.tokens(), &cookies)
                    .await;

                match fetched {
                    Ok(html) => Ok(self.parser.parse_nutrition_fragment(&html)),
                    Err(MenuError::UpstreamRejected { status }) => {
                        warn!(
                            status,
                            recipe_id = %record.tokens().recipe_id,
                            "nutrition request rejected, storing no facts"
                        );
                        self.invalidate_session().await;
                        Ok(NutritionFacts::new())
                    }
                    Err(e) => Err(e),
                }
            })
            .await?;

        Ok(facts.clone())
    }

    pub async fn status(&self) -> CacheStatus {
        let snapshot = self.snapshot.read().await.clone();
        let has_session = self.cookies.lock().await.is_some();

        match snapshot {
            Some(s) => CacheStatus {
                cached: true,
                scraped_at: Some(s.scraped_at),
                age_secs: Some(s.refreshed_at.elapsed().as_secs()),
                ttl_secs: self.ttl.as_secs(),
                generation: s.generation,
                halls: s.store.len(),
                items: all_items(&s.store).count(),
                enriched_items: all_items(&s.store)
                    .filter(|item| item.nutrition_fetched())
                    .count(),
                has_session,
            },
            None => CacheStatus {
                cached: false,
                scraped_at: None,
                age_secs: None,
                ttl_secs: self.ttl.as_secs(),
                generation: 0,
                halls: 0,
                items: 0,
                enriched_items: 0,
                has_session,
            },
        }
    }

    async fn current(&self, force_refresh: bool) -> Result<Arc<Snapshot>, MenuError> {
        let (stale, force_since) = {
            let slot = self.snapshot.read().await;
            let seen = slot.as_ref().map_or(0, |s| s.generation);
            let force_since = force_refresh.then_some(seen);
            (self.needs_refresh(slot.as_deref(), force_since), force_since)
        };

        if stale {
            let _guard = self.refresh_lock.lock().await;

            let still_stale = {
                let slot = self.snapshot.read().await;
                self.needs_refresh(slot.as_deref(), force_since)
            };

            if still_stale {
                match self.scrape().await {
                    Ok(store) => {
                        self.install(store).await;
                    }
                    Err(e) => {
                        let previous = self.snapshot.read().await.clone();
                        match previous {
                            Some(previous) if self.serve_stale_on_error && !force_refresh => {
                                warn!(error = %e, "menu refresh failed, serving stale snapshot");
                                return Ok(previous);
                            }
                            _ => return Err(e),
                        }
                    }
                }
            } else {
                debug!("menu already refreshed by a concurrent caller");
            }
        }

        let current = self.snapshot.read().await.clone();
        match current {
            Some(snapshot) => Ok(snapshot),
            None => {
                let store = self.scrape().await?;
                Ok(self.install(store).await)
            }
        }
    }

    // `force_since` carries the generation the caller saw before asking for a
    // forced refresh; a newer generation means someone already refreshed.
    fn needs_refresh(&self, snapshot: Option<&Snapshot>, force_since: Option<u64>) -> bool {
        match snapshot {
            None => true,
            Some(s) if s.refreshed_at.elapsed() > self.ttl => true,
            Some(s) => force_since.is_some_and(|seen| s.generation == seen),
        }
    }

    async fn scrape(&self) -> Result<MenuStore, MenuError> {
        info!("scraping menu page");
        let html = self
            .source
            .fetch_menu_page()
            .await
            .map_err(|e| match e {
                MenuError::ScrapeFailure(_) => e,
                other => MenuError::ScrapeFailure(other.to_string()),
            })?;

        let parser = self.parser.clone();
        tokio::task::spawn_blocking(move || parser.parse_menu_document(&html))
            .await
            .map_err(|e| MenuError::ScrapeFailure(format!("menu parser panicked: {}", e)))
    }

    async fn install(&self, store: MenuStore) -> Arc<Snapshot> {
        let mut slot = self.snapshot.write().await;
        let generation = slot.as_ref().map_or(0, |s| s.generation) + 1;
        let snapshot = Arc::new(Snapshot {
            store: Arc::new(store),
            refreshed_at: Instant::now(),
            scraped_at: Utc::now(),
            generation,
        });
        *slot = Some(snapshot.clone());

        info!(
            generation,
            halls = snapshot.store.len(),
            "menu snapshot installed"
        );
        snapshot
    }

    async fn session_cookies(&self) -> Result<SessionCookies, MenuError> {
        let mut slot = self.cookies.lock().await;
        if let Some(cookies) = slot.as_ref() {
            return Ok(cookies.clone());
        }

        let cookies = self.source.establish_session().await?;
        *slot = Some(cookies.clone());
        Ok(cookies)
    }

    async fn invalidate_session(&self) {
        self.cookies.lock().await.take();
    }
}
