//! Shared fixtures and a scripted upstream for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use dining_menu::domain::error::MenuError;
use dining_menu::domain::model::{ItemTokens, SessionCookies};
use dining_menu::domain::traits::MenuSource;
use dining_menu::infrastructure::parser::HtmlMenuParser;
use dining_menu::MenuCache;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const MENU_HTML: &str = r#"
<html><body>
<ul class="locations">
  <li class="location-name">
    <div class="location-title"><span class="cafe-title">  crossroads  </span></div>
    <ul class="periods">
      <li class="preiod-name"><span>fall -   dinner</span>
        <div class="cat-name"><span>grill</span>
          <ul class="recipe-name">
            <li class="recip" data-id="123" data-menuid="9" data-location="abc"><span>cheese pizza</span></li>
            <li class="recip" data-id="124" data-menuid="9" data-location="abd"><span>Burger</span></li>
          </ul>
        </div>
        <div class="cat-name"><span>salad   bar</span>
          <ul class="recipe-name">
            <li class="recip" data-id="200" data-menuid="9" data-location="abe"><span>  caesar   salad </span></li>
          </ul>
        </div>
      </li>
      <li class="preiod-name"><span>Fall - Lunch</span>
        <div class="cat-name"><span>Grill</span>
          <ul class="recipe-name">
            <li class="recip" data-id="300" data-menuid="10" data-location="abc"><span>fries</span></li>
            <li class="recip" data-id="301"><span>mystery meat</span></li>
          </ul>
        </div>
      </li>
    </ul>
  </li>
  <li class="location-name">
    <div class="location-title"><span class="cafe-title">Clark Kerr Campus</span></div>
    <ul>
      <li class="preiod-name"><span>Spring - Dinner</span>
        <div class="cat-name"><span>Plant Forward Entree</span>
          <ul class="recipe-name">
            <li class="recip" data-id="400" data-menuid="11" data-location="xyz"><span>Brown Rice</span></li>
          </ul>
        </div>
        <div class="cat-name"><span>Desserts</span></div>
      </li>
    </ul>
  </li>
  <li class="location-name">
    <div class="location-title"><span class="other">no title here</span></div>
    <ul><li class="preiod-name"><span>Ghost Period</span></li></ul>
  </li>
  <li class="location-name">
    <div class="location-title"><span class="cafe-title">Foothill</span></div>
  </li>
</ul>
</body></html>
"#;

pub const SCENARIO_HTML: &str = r#"
<ul>
  <li class="location-name">
    <div class="location-title"><span class="cafe-title">Crossroads</span></div>
    <ul>
      <li class="preiod-name"><span>Fall - Dinner</span>
        <div class="cat-name"><span>Grill</span>
          <ul class="recipe-name">
            <li class="recip" data-id="123" data-menuid="9" data-location="abc"><span>Cheese Pizza</span></li>
          </ul>
        </div>
      </li>
    </ul>
  </li>
</ul>
"#;

pub const NUTRITION_HTML: &str = r#"
<div class="recipe-details">
  <span class="serving-size"><b>Serving Size:</b> 3.28 oz</span>
  <div class="nutration-details">
    <ul>
      <li>Calories: 250</li>
      <li><span>Total Fat</span>: 10g</li>
      <li>Protein:12g</li>
      <li>no colon here</li>
    </ul>
  </div>
  <div class="allergens"><p>Contains</p><span>Milk, Wheat</span></div>
</div>
"#;

/// Nutrition fragment whose serving size identifies the recipe
pub fn nutrition_html_for(recipe_id: &str) -> String {
    format!(
        r#"<span class="serving-size">Serving Size: {} oz</span>
<div class="nutration-details"><ul><li>Calories: 250</li></ul></div>"#,
        recipe_id
    )
}

/// Scripted upstream that counts every call
pub struct FakeSource {
    menu_html: Mutex<String>,
    menu_delay: Duration,
    nutrition_delay: Duration,
    fail_menu: AtomicBool,
    rejected: Mutex<HashSet<String>>,
    last_cookies: Mutex<Option<SessionCookies>>,
    menu_fetches: AtomicUsize,
    sessions: AtomicUsize,
    nutrition_fetches: AtomicUsize,
}

impl FakeSource {
    pub fn new(menu_html: &str) -> Self {
        Self {
            menu_html: Mutex::new(menu_html.to_string()),
            menu_delay: Duration::ZERO,
            nutrition_delay: Duration::ZERO,
            fail_menu: AtomicBool::new(false),
            rejected: Mutex::new(HashSet::new()),
            last_cookies: Mutex::new(None),
            menu_fetches: AtomicUsize::new(0),
            sessions: AtomicUsize::new(0),
            nutrition_fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_menu_delay(mut self, delay: Duration) -> Self {
        self.menu_delay = delay;
        self
    }

    pub fn with_nutrition_delay(mut self, delay: Duration) -> Self {
        self.nutrition_delay = delay;
        self
    }

    pub fn set_menu_html(&self, html: &str) {
        *self.menu_html.lock().unwrap() = html.to_string();
    }

    pub fn fail_menu(&self, fail: bool) {
        self.fail_menu.store(fail, Ordering::SeqCst);
    }

    pub fn reject(&self, recipe_id: &str) {
        self.rejected.lock().unwrap().insert(recipe_id.to_string());
    }

    pub fn accept(&self, recipe_id: &str) {
        self.rejected.lock().unwrap().remove(recipe_id);
    }

    pub fn menu_fetches(&self) -> usize {
        self.menu_fetches.load(Ordering::SeqCst)
    }

    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    pub fn nutrition_fetches(&self) -> usize {
        self.nutrition_fetches.load(Ordering::SeqCst)
    }

    pub fn last_cookies(&self) -> Option<SessionCookies> {
        self.last_cookies.lock().unwrap().clone()
    }
}

#[async_trait]
impl MenuSource for FakeSource {
    async fn fetch_menu_page(&self) -> Result<String, MenuError> {
        self.menu_fetches.fetch_add(1, Ordering::SeqCst);
        if !self.menu_delay.is_zero() {
            tokio::time::sleep(self.menu_delay).await;
        }
        if self.fail_menu.load(Ordering::SeqCst) {
            return Err(MenuError::ScrapeFailure("upstream unavailable".to_string()));
        }
        Ok(self.menu_html.lock().unwrap().clone())
    }

    async fn establish_session(&self) -> Result<SessionCookies, MenuError> {
        let n = self.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(SessionCookies::new(vec![(
            "PHPSESSID".to_string(),
            format!("session-{}", n),
        )]))
    }

    async fn fetch_nutrition_fragment(
        &self,
        tokens: &ItemTokens,
        cookies: &SessionCookies,
    ) -> Result<String, MenuError> {
        self.nutrition_fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_cookies.lock().unwrap() = Some(cookies.clone());
        if !self.nutrition_delay.is_zero() {
            tokio::time::sleep(self.nutrition_delay).await;
        }
        if self.rejected.lock().unwrap().contains(&tokens.recipe_id) {
            return Err(MenuError::UpstreamRejected { status: 503 });
        }
        Ok(nutrition_html_for(&tokens.recipe_id))
    }
}

pub fn cache_for(source: &Arc<FakeSource>) -> MenuCache {
    MenuCache::new(source.clone(), Arc::new(HtmlMenuParser))
}
