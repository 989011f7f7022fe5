//! Listing pages: locate entries, enrich them from their detail pages, store them.
//!
//! # URL Pattern
//!
//! Page 1 is `{listing_url}/`, later pages are `{listing_url}/page/{n}/`.
//! [`harvest_pages`] walks them in order and stops at the first page that
//! yields no article.

use scraper::{ElementRef, Html};
use tracing::{debug, error, info, instrument, warn};

use super::content::fetch_content;
use super::fields::extract_entry;
use super::parse_selector;
use crate::http::HttpClient;
use crate::models::ArticleRecord;
use crate::storage::ArticleStore;

/// Decorative block at the top of listing pages. It contains `<article>`
/// tags that are not real entries.
const PROMO_SELECTOR: &str = "div.container-fluid.px-md-8.pt-md-7.pt-5.pb-md-4.pb-1";
const ENTRY_SELECTOR: &str = "article";

/// Harvests listing pages of one site into one store.
#[derive(Debug)]
pub struct ListingHarvester<'a, S> {
    client: &'a HttpClient,
    base_url: &'a str,
    store: &'a S,
}

impl<'a, S: ArticleStore> ListingHarvester<'a, S> {
    pub fn new(client: &'a HttpClient, base_url: &'a str, store: &'a S) -> Self {
        Self {
            client,
            base_url,
            store,
        }
    }

    /// Harvest every entry of one listing page.
    ///
    /// Entries are processed one at a time in document order. An entry
    /// without a title link, or whose insert fails, is logged and skipped.
    /// A listing page that cannot be fetched yields an empty result.
    #[instrument(level = "info", skip(self))]
    pub async fn harvest(&self, listing_url: &str) -> Vec<ArticleRecord> {
        info!("Fetching listing page");
        let body = match self.client.get_text(listing_url).await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to fetch listing page");
                return Vec::new();
            }
        };

        let entries = extract_entries(&body, self.base_url);
        let total = entries.len();
        info!(count = total, "Located article entries");

        let mut articles = Vec::with_capacity(total);
        for (index, entry) in entries.into_iter().enumerate() {
            let index = index + 1;
            info!(index, total, "Processing entry");

            let Some(mut record) = entry else {
                warn!(index, "Entry skipped: no title link extracted");
                continue;
            };

            if let Some(detail) = fetch_content(self.client, &record.url).await {
                record.apply_detail(detail);
            }

            if let Err(e) = self.store.insert_one(&record).await {
                error!(index, url = %record.url, error = %e, "Failed to store article; skipping entry");
                continue;
            }
            info!(index, title = %record.title, "Article stored");
            articles.push(record);
        }

        articles
    }
}

/// Parse a listing page into one extraction result per entry, in document order.
///
/// The promotional block is detached before entries are located, and
/// `article` elements nested inside another `article` are not entries.
/// Entries are searched from the root element: `Html::select` walks every
/// node in the arena, detached ones included.
pub fn extract_entries(html: &str, base_url: &str) -> Vec<Option<ArticleRecord>> {
    let mut document = Html::parse_document(html);
    remove_promotional_block(&mut document);

    let Some(selector) = parse_selector(ENTRY_SELECTOR) else {
        return Vec::new();
    };
    document
        .root_element()
        .select(&selector)
        .filter(|entry| is_top_level(*entry))
        .map(|entry| extract_entry(entry, base_url))
        .collect()
}

fn remove_promotional_block(document: &mut Html) {
    let Some(selector) = parse_selector(PROMO_SELECTOR) else {
        return;
    };
    let promo = document.select(&selector).next().map(|el| el.id());
    if let Some(mut node) = promo.and_then(|id| document.tree.get_mut(id)) {
        node.detach();
        debug!("Removed promotional block");
    }
}

fn is_top_level(entry: ElementRef<'_>) -> bool {
    entry
        .ancestors()
        .filter_map(ElementRef::wrap)
        .all(|ancestor| ancestor.value().name() != ENTRY_SELECTOR)
}

/// URL of listing page `page` (1-based).
pub fn page_url(listing_url: &str, page: u32) -> String {
    let base = listing_url.trim_end_matches('/');
    if page <= 1 {
        format!("{base}/")
    } else {
        format!("{base}/page/{page}/")
    }
}

/// Harvest pages `1..=pages`, stopping at the first page with no article.
#[instrument(level = "info", skip(harvester))]
pub async fn harvest_pages<S: ArticleStore>(
    harvester: &ListingHarvester<'_, S>,
    listing_url: &str,
    pages: u32,
) -> Vec<ArticleRecord> {
    let mut all_articles = Vec::new();
    for page in 1..=pages {
        let url = page_url(listing_url, page);
        info!(page, %url, "Harvesting listing page");

        let articles = harvester.harvest(&url).await;
        if articles.is_empty() {
            warn!(page, "No article found on page; stopping");
            break;
        }
        all_articles.extend(articles);
        info!(page, total = all_articles.len(), "Page harvested");
    }
    info!(count = all_articles.len(), "Harvest complete");
    all_articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::error::{HarvestError, Result};
    use crate::query::ArticleFilter;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entry(n: usize) -> String {
        format!(
            r#"<article class="post">
                <h3 class="entry-title"><a href="/web/article-{n}/">Article {n}</a></h3>
                <span class="favtag color-b">Web</span>
                <a class="post-tags" href="/tag/listing">Listing tag {n}</a>
                <span class="author"><a>Listing Author {n}</a></span>
                <time class="entry-date">1{n} mars 2024</time>
            </article>"#
        )
    }

    fn untitled_entry() -> String {
        r#"<article class="post"><div class="entry-excerpt">Pas de titre</div></article>"#.to_string()
    }

    fn listing_page(entries: &[String]) -> String {
        format!("<html><body><main>{}</main></body></html>", entries.join("\n"))
    }

    fn detail_page(n: usize) -> String {
        format!(
            r#"<html><body>
                <div class="byline"><a>Detail Author {n}</a></div>
                <a class="post-tags">Detail tag {n}</a>
                <div class="entry-content"><p>Corps de l'article {n}.</p><img src="/img/{n}.png"></div>
            </body></html>"#
        )
    }

    async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    async fn mount_details(server: &MockServer, numbers: &[usize]) {
        for &n in numbers {
            mount_page(server, &format!("/web/article-{n}/"), 200, detail_page(n)).await;
        }
    }

    fn client() -> HttpClient {
        HttpClient::new(&SiteConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_entry_without_title_is_skipped() {
        let server = MockServer::start().await;
        let entries = vec![entry(1), entry(2), untitled_entry(), entry(4), entry(5)];
        mount_page(&server, "/web/", 200, listing_page(&entries)).await;
        mount_details(&server, &[1, 2, 4, 5]).await;

        let client = client();
        let store = MemoryStore::default();
        let base = server.uri();
        let harvester = ListingHarvester::new(&client, &base, &store);

        let articles = harvester.harvest(&format!("{base}/web/")).await;

        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Article 1", "Article 2", "Article 4", "Article 5"]);
        assert_eq!(store.len(), 4);
        assert_eq!(store.records(), articles);
    }

    #[tokio::test]
    async fn test_detail_values_override_listing_values() {
        let server = MockServer::start().await;
        mount_page(&server, "/web/", 200, listing_page(&[entry(1)])).await;
        mount_details(&server, &[1]).await;

        let client = client();
        let store = MemoryStore::default();
        let base = server.uri();
        let articles = ListingHarvester::new(&client, &base, &store)
            .harvest(&format!("{base}/web/"))
            .await;

        let article = &articles[0];
        assert_eq!(article.url, format!("{base}/web/article-1/"));
        assert_eq!(article.category.as_deref(), Some("Web"));
        assert_eq!(article.publication_date.as_deref(), Some("2024-03-11"));
        assert_eq!(article.author.as_deref(), Some("Detail Author 1"));
        assert_eq!(article.subcategory, vec!["Detail tag 1"]);
        assert_eq!(article.content.as_deref(), Some("Corps de l'article 1."));
        assert_eq!(article.images, vec!["/img/1.png"]);
    }

    #[tokio::test]
    async fn test_detail_page_without_tags_clears_listing_tags() {
        let server = MockServer::start().await;
        mount_page(&server, "/web/", 200, listing_page(&[entry(1)])).await;
        mount_page(&server, "/web/article-1/", 200, "<html><body><p>vide</p></body></html>".to_string()).await;

        let client = client();
        let store = MemoryStore::default();
        let base = server.uri();
        let articles = ListingHarvester::new(&client, &base, &store)
            .harvest(&format!("{base}/web/"))
            .await;

        assert!(articles[0].subcategory.is_empty());
        assert_eq!(articles[0].author, None);
        assert_eq!(articles[0].content, None);
    }

    #[tokio::test]
    async fn test_failed_detail_fetch_keeps_listing_values() {
        let server = MockServer::start().await;
        mount_page(&server, "/web/", 200, listing_page(&[entry(1), entry(2)])).await;
        mount_page(&server, "/web/article-1/", 404, String::new()).await;
        mount_details(&server, &[2]).await;

        let client = client();
        let store = MemoryStore::default();
        let base = server.uri();
        let articles = ListingHarvester::new(&client, &base, &store)
            .harvest(&format!("{base}/web/"))
            .await;

        assert_eq!(articles.len(), 2);
        let failed = &articles[0];
        assert_eq!(failed.content, None);
        assert!(failed.images.is_empty());
        assert_eq!(failed.author.as_deref(), Some("Listing Author 1"));
        assert_eq!(failed.subcategory, vec!["Listing tag 1"]);
        assert_eq!(articles[1].author.as_deref(), Some("Detail Author 2"));
    }

    #[tokio::test]
    async fn test_listing_fetch_failure_yields_nothing() {
        let server = MockServer::start().await;
        mount_page(&server, "/web/", 500, String::new()).await;

        let client = client();
        let store = MemoryStore::default();
        let base = server.uri();
        let articles = ListingHarvester::new(&client, &base, &store)
            .harvest(&format!("{base}/web/"))
            .await;

        assert!(articles.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_promotional_block_is_not_an_entry() {
        let html = format!(
            r#"<html><body>
                <div class="container-fluid px-md-8 pt-md-7 pt-5 pb-md-4 pb-1">
                    <article><h2><a href="/promo">À la une</a></h2></article>
                </div>
                {}
            </body></html>"#,
            entry(1)
        );

        let entries = extract_entries(&html, "https://x.test");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].as_ref().unwrap().title, "Article 1");
    }

    #[tokio::test]
    async fn test_promotional_article_is_never_followed() {
        let server = MockServer::start().await;
        let page = format!(
            r#"<html><body>
                <div class="container-fluid px-md-8 pt-md-7 pt-5 pb-md-4 pb-1">
                    <article><h2><a href="/promo">À la une</a></h2></article>
                </div>
                <main>{}</main>
            </body></html>"#,
            entry(1)
        );
        mount_page(&server, "/web/", 200, page).await;
        mount_details(&server, &[1]).await;
        Mock::given(method("GET"))
            .and(path("/promo"))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(9)))
            .expect(0)
            .mount(&server)
            .await;

        let client = client();
        let store = MemoryStore::default();
        let base = server.uri();
        let articles = ListingHarvester::new(&client, &base, &store)
            .harvest(&format!("{base}/web/"))
            .await;

        let urls: Vec<&str> = articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec![format!("{base}/web/article-1/")]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_nested_articles_are_not_entries() {
        let html = r#"<article><h2><a href="/outer">Outer</a></h2>
            <article><h2><a href="/inner">Inner</a></h2></article></article>"#;

        let entries = extract_entries(html, "https://x.test");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].as_ref().unwrap().url, "https://x.test/outer");
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("https://x.test/web", 1), "https://x.test/web/");
        assert_eq!(page_url("https://x.test/web/", 2), "https://x.test/web/page/2/");
        assert_eq!(page_url("https://x.test/web", 5), "https://x.test/web/page/5/");
    }

    #[tokio::test]
    async fn test_harvest_pages_stops_at_first_empty_page() {
        let server = MockServer::start().await;
        mount_page(&server, "/web/", 200, listing_page(&[entry(1), entry(2)])).await;
        mount_page(&server, "/web/page/2/", 200, listing_page(&[entry(3)])).await;
        mount_page(&server, "/web/page/3/", 404, String::new()).await;
        Mock::given(method("GET"))
            .and(path("/web/page/4/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[entry(4)])))
            .expect(0)
            .mount(&server)
            .await;
        mount_details(&server, &[1, 2, 3, 4]).await;

        let client = client();
        let store = MemoryStore::default();
        let base = server.uri();
        let harvester = ListingHarvester::new(&client, &base, &store);

        let articles = harvest_pages(&harvester, &format!("{base}/web"), 5).await;
        assert_eq!(articles.len(), 3);
        assert_eq!(store.len(), 3);
    }

    /// Store whose inserts fail for one URL.
    struct FlakyStore {
        inner: MemoryStore,
        failing_url: String,
    }

    impl ArticleStore for FlakyStore {
        async fn insert_one(&self, record: &ArticleRecord) -> Result<()> {
            if record.url == self.failing_url {
                return Err(HarvestError::NotWritable("disk full".to_string()));
            }
            self.inner.insert_one(record).await
        }

        async fn find(&self, filter: &ArticleFilter) -> Result<Vec<ArticleRecord>> {
            self.inner.find(filter).await
        }
    }

    #[tokio::test]
    async fn test_store_failure_skips_only_that_entry() {
        let server = MockServer::start().await;
        mount_page(&server, "/web/", 200, listing_page(&[entry(1), entry(2), entry(3)])).await;
        mount_details(&server, &[1, 2, 3]).await;

        let client = client();
        let base = server.uri();
        let store = FlakyStore {
            inner: MemoryStore::default(),
            failing_url: format!("{base}/web/article-2/"),
        };
        let articles = ListingHarvester::new(&client, &base, &store)
            .harvest(&format!("{base}/web/"))
            .await;

        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Article 1", "Article 3"]);
        assert_eq!(store.inner.len(), 2);
    }
}
