use crate::feed::traits::FeedSource;
use crate::feed::types::FeedParams;
use crate::models::RawAd;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use scraper::{ElementRef, Html, Selector};
use std::thread;
use tracing::{debug, info, warn};

// Class selectors of the group feed DOM. The feed obfuscates its class
// names; these are the stable combinations observed on listing blocks.
const LISTING_SELECTOR: &str = "div.x1yztbdb.x1n2onr6.xh8yej3.x1ja2u2z";
const IMAGE_SELECTOR: &str =
    "img.xz74otr.x1ey2m1c.xds687c.x5yr21d.x10l6tqk.x17qophe.x13vifvy.xh8yej3";
const TITLE_SELECTOR: &str = "span.x1lliihq.x6ikm8r.x10wlt62.x1n2onr6.x1j85h84";
const PRICE_SELECTOR: &str = "span.html-span.xdj266r.x11i5rnm.xat24cr.x1mh8g0r.xexx8yu.x4uap5.x18d9i69.xkhd6sd.x1hl2dhg.x16tdsg8.x1vvkbs.xtvhhri";
const LINK_SELECTOR: &str = "span.x1rg5ohu.x6ikm8r.x10wlt62.x16dsc37.xt0b8zv";
const TEXT_SELECTOR: &str = "span.x193iq5w.xeuugli.x13faqbe.x1vvkbs.x1xmvt09.x1lliihq.x1s928wv.xhkezso.x1gmr53x.x1cpjm7i.x1fgarty.x1943h6x.xudqn12.x3x7a5m.x6prxxf.xvq8zen.xo1l8bm.xzsf02u.x1yc453h";

// Anchor class of the collapsed-post expander button.
const SEE_MORE_CLASS: &str = "x1i10hfl xjbqb8w x1ejq31n xd10rxx x1sy0etr x17r0tee x972fbf xcfux6l x1qhh985 xm0m39n x9f619 x1ypdohk xt0psk2 xe8uvvx xdj266r x11i5rnm xat24cr x1mh8g0r xexx8yu x4uap5 x18d9i69 xkhd6sd x16tdsg8 x1hl2dhg xggy1nq x1a2a7pz x1sur9pj xkrqix3 xzsf02u x1s688f";

/// Browser-based feed source for the group page using headless Chrome
pub struct GroupBrowserFeed {
    browser: Browser,
    params: FeedParams,
}

impl GroupBrowserFeed {
    /// Create a new browser-based feed source
    pub fn new(params: FeedParams) -> Result<Self> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self { browser, params })
    }

    /// Parse all listing blocks out of a feed page snapshot
    fn parse_listings(html: &str) -> Vec<RawAd> {
        let document = Html::parse_document(html);
        let listing_selector = Selector::parse(LISTING_SELECTOR).unwrap();
        let image_selector = Selector::parse(IMAGE_SELECTOR).unwrap();
        let title_selector = Selector::parse(TITLE_SELECTOR).unwrap();
        let price_selector = Selector::parse(PRICE_SELECTOR).unwrap();
        let link_selector = Selector::parse(LINK_SELECTOR).unwrap();
        let text_selector = Selector::parse(TEXT_SELECTOR).unwrap();

        let mut ads = Vec::new();

        for (idx, listing) in document.select(&listing_selector).enumerate() {
            // The feed interleaves non-listing blocks that reuse the
            // container class; a block without body text is not an ad.
            let text = match listing.select(&text_selector).next() {
                Some(element) => element.text().collect::<String>().trim().to_string(),
                None => continue,
            };
            if text.is_empty() {
                continue;
            }

            let title = listing
                .select(&title_selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string());
            let price = listing
                .select(&price_selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string());

            let (title, price) = match (title, price) {
                (Some(title), Some(price)) if !title.is_empty() => (title, price),
                _ => {
                    debug!("Skipped block {}: no title or price", idx);
                    continue;
                }
            };

            let image = listing
                .select(&image_selector)
                .next()
                .and_then(|element| element.value().attr("src"))
                .map(str::to_string);

            // The permalink is the anchor wrapping the timestamp span.
            let link = listing
                .select(&link_selector)
                .next()
                .and_then(|element| element.parent())
                .and_then(ElementRef::wrap)
                .and_then(|anchor| anchor.value().attr("href"))
                .map(str::to_string);

            ads.push(RawAd {
                id_text: text.clone(),
                title,
                price,
                image,
                text,
                link,
            });
        }

        ads
    }

    /// Expand every collapsed post currently in the viewport
    fn expand_posts(&self, tab: &headless_chrome::Tab) {
        let script = format!(
            "Array.from(document.getElementsByClassName('{SEE_MORE_CLASS}'))\
             .filter(element => element.innerText === 'En voir plus' || element.innerText === 'See more')\
             .forEach(elem => elem.click())"
        );
        if let Err(err) = tab.evaluate(&script, false) {
            warn!("Could not expand collapsed posts: {}", err);
        }
    }
}

#[async_trait]
impl FeedSource for GroupBrowserFeed {
    async fn collect(&self) -> Result<Vec<RawAd>> {
        info!("Opening group feed page...");
        let tab = self.browser.new_tab()?;

        tab.navigate_to(&self.params.group_url)?;
        tab.wait_until_navigated()?;
        thread::sleep(self.params.settle_delay);

        // Inject the session cookies so the feed renders logged-in content,
        // then reload to pick them up. An expired cookie leaves the page in
        // its logged-out state; the wait below will then fail loudly.
        let cookie_script = format!(
            "document.cookie = `xs={}; path=/; secure;`;\
             document.cookie = `c_user={}; path=/; secure;`;\
             location.reload()",
            self.params.session_cookie, self.params.c_user_cookie
        );
        if let Err(err) = tab.evaluate(&cookie_script, false) {
            warn!("Session cookie injection failed (expired cookie?): {}", err);
        }

        tab.wait_for_element(LISTING_SELECTOR)
            .context("Feed page did not render any listing blocks")?;

        let mut ads = Vec::new();

        // Scroll in bounded rounds, expanding collapsed posts and
        // harvesting whatever is rendered after each round. Re-parsed
        // blocks produce duplicate ads; the pipeline's dedup absorbs them.
        for round in 0..self.params.scroll_rounds {
            self.expand_posts(&tab);
            let _ = tab.evaluate("window.scrollTo(0, document.body.scrollHeight)", false);
            thread::sleep(self.params.settle_delay);

            let html_result = tab.evaluate("document.documentElement.outerHTML", false)?;
            let html = match html_result.value.as_ref().and_then(|value| value.as_str()) {
                Some(html) => html.to_string(),
                None => {
                    warn!("Could not get HTML from page on round {}", round);
                    continue;
                }
            };

            let round_ads = Self::parse_listings(&html);
            debug!("Round {}: {} listing blocks", round, round_ads.len());
            ads.extend(round_ads);
        }

        info!("Collected {} raw ads from the feed", ads.len());
        Ok(ads)
    }

    fn source_name(&self) -> &'static str {
        "group-feed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_block(title: &str, price: &str, text: &str) -> String {
        format!(
            r#"<div class="x1yztbdb x1n2onr6 xh8yej3 x1ja2u2z">
                 <img class="xz74otr x1ey2m1c xds687c x5yr21d x10l6tqk x17qophe x13vifvy xh8yej3" src="http://x/img.png"/>
                 <span class="x1lliihq x6ikm8r x10wlt62 x1n2onr6 x1j85h84">{title}</span>
                 <span class="html-span xdj266r x11i5rnm xat24cr x1mh8g0r xexx8yu x4uap5 x18d9i69 xkhd6sd x1hl2dhg x16tdsg8 x1vvkbs xtvhhri">{price}</span>
                 <a href="http://feed/post/1"><span class="x1rg5ohu x6ikm8r x10wlt62 x16dsc37 xt0b8zv">2h</span></a>
                 <span class="x193iq5w xeuugli x13faqbe x1vvkbs x1xmvt09 x1lliihq x1s928wv xhkezso x1gmr53x x1cpjm7i x1fgarty x1943h6x xudqn12 x3x7a5m x6prxxf xvq8zen xo1l8bm xzsf02u x1yc453h">{text}</span>
               </div>"#
        )
    }

    #[test]
    fn parses_a_complete_listing_block() {
        let html = format!(
            "<html><body>{}</body></html>",
            listing_block("Room for rent", "500€", "3 room apartment, 2 bedrooms available")
        );
        let ads = GroupBrowserFeed::parse_listings(&html);
        assert_eq!(ads.len(), 1);
        let ad = &ads[0];
        assert_eq!(ad.title, "Room for rent");
        assert_eq!(ad.price, "500€");
        assert_eq!(ad.text, "3 room apartment, 2 bedrooms available");
        assert_eq!(ad.id_text, ad.text);
        assert_eq!(ad.image.as_deref(), Some("http://x/img.png"));
        assert_eq!(ad.link.as_deref(), Some("http://feed/post/1"));
    }

    #[test]
    fn skips_blocks_without_body_text() {
        let html = r#"<html><body>
            <div class="x1yztbdb x1n2onr6 xh8yej3 x1ja2u2z">
              <span class="x1lliihq x6ikm8r x10wlt62 x1n2onr6 x1j85h84">Not a listing</span>
            </div>
        </body></html>"#;
        let ads = GroupBrowserFeed::parse_listings(html);
        assert!(ads.is_empty());
    }

    #[test]
    fn parses_multiple_blocks() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            listing_block("First", "400€", "first ad text"),
            listing_block("Second", "600€", "second ad text"),
        );
        let ads = GroupBrowserFeed::parse_listings(&html);
        assert_eq!(ads.len(), 2);
        assert_eq!(ads[0].title, "First");
        assert_eq!(ads[1].title, "Second");
    }
}
