use regex::Regex;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

use crate::db::store::{DocumentStore, Filter, StoreError, StoredDocument, REVIEWS, TREKS};
use crate::models::{
    review::Review,
    trek::{MatchStrategy, ResolutionState, TrekDocument, TrekView},
};
use crate::services::{
    content_generation_service::{placeholder_trek, sample_reviews},
    trek_view_service::{build_trek_view, DEFAULT_TITLE},
};

const DEFAULT_RESOLUTION_TIMEOUT_SECS: u64 = 8;
const DEFAULT_REVIEWS_TIMEOUT_SECS: u64 = 3;

#[derive(Clone, Debug)]
pub struct ResolutionConfig {
    /// How long the lookup chain may run before the placeholder is shown.
    pub timeout: Duration,
    pub reviews_timeout: Duration,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_RESOLUTION_TIMEOUT_SECS),
            reviews_timeout: Duration::from_secs(DEFAULT_REVIEWS_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("no trek or placeholder could be built for {0:?}")]
    Unresolvable(String),
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// `"Valley of Flowers"` → `"valley-of-flowers"`.
pub fn title_slug(title: &str) -> String {
    whitespace_runs()
        .replace_all(&title.to_lowercase(), "-")
        .into_owned()
}

fn scan_matches(doc: &StoredDocument, identifier: &str, lowered: &str) -> bool {
    doc.key == identifier
        || doc.str_field("id") == Some(identifier)
        || doc
            .str_field("title")
            .map(|t| title_slug(t) == lowered)
            .unwrap_or(false)
}

/// Turns a route identifier into exactly one trek, real or placeholder.
#[derive(Clone)]
pub struct TrekResolver {
    store: Arc<dyn DocumentStore>,
    config: ResolutionConfig,
}

impl TrekResolver {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, ResolutionConfig::default())
    }

    pub fn with_config(store: Arc<dyn DocumentStore>, config: ResolutionConfig) -> Self {
        Self { store, config }
    }

    /// Run the lookup chain against the timeout. Whichever finishes first
    /// decides the result; a chain that loses is dropped mid-flight.
    pub async fn resolve(&self, identifier: &str) -> Result<TrekView, ResolutionError> {
        let state = match timeout(self.config.timeout, self.lookup_chain(identifier)).await {
            Ok(Ok(Some((doc, matched_by)))) => match doc.decode::<TrekDocument>(TREKS) {
                Ok(trek) => return Ok(self.authoritative(identifier, doc.key, trek, matched_by).await),
                Err(e) => {
                    log::error!("Matched trek {} but could not read it: {}", identifier, e);
                    ResolutionState::Fallback
                }
            },
            Ok(Ok(None)) => {
                log::info!("No trek matches {}, using placeholder", identifier);
                ResolutionState::Fallback
            }
            Ok(Err(e)) => {
                log::error!("Error fetching trek {}: {}", identifier, e);
                ResolutionState::Fallback
            }
            Err(_) => {
                log::warn!(
                    "Trek lookup for {} exceeded {:?}, showing placeholder",
                    identifier,
                    self.config.timeout
                );
                ResolutionState::TimedOut
            }
        };

        self.placeholder(identifier, state)
    }

    /// Primary key, then the `id` field, then a full scan that also accepts a
    /// title slug. The first strategy to match wins.
    async fn lookup_chain(
        &self,
        identifier: &str,
    ) -> Result<Option<(StoredDocument, MatchStrategy)>, StoreError> {
        if let Some(doc) = self.store.get(TREKS, identifier).await? {
            return Ok(Some((doc, MatchStrategy::PrimaryKey)));
        }

        let by_field = self
            .store
            .find(TREKS, Filter::eq("id", identifier))
            .await?;
        if let Some(doc) = by_field.into_iter().next() {
            return Ok(Some((doc, MatchStrategy::IdField)));
        }

        let lowered = identifier.to_lowercase();
        let all = self.store.find(TREKS, Filter::All).await?;
        // Later documents win, matching a forward scan that keeps overwriting.
        Ok(all
            .into_iter()
            .rev()
            .find(|doc| scan_matches(doc, identifier, &lowered))
            .map(|doc| (doc, MatchStrategy::Scan)))
    }

    async fn authoritative(
        &self,
        identifier: &str,
        key: String,
        trek: TrekDocument,
        matched_by: MatchStrategy,
    ) -> TrekView {
        let title = trek.display_name().unwrap_or(DEFAULT_TITLE).to_string();
        let reviews = match self.stored_reviews(identifier).await {
            Some(reviews) if !reviews.is_empty() => reviews,
            _ => sample_reviews(&title),
        };

        log::debug!("Resolved trek {} via {:?}", identifier, matched_by);
        build_trek_view(&key, trek, reviews, ResolutionState::Resolved { matched_by })
    }

    fn placeholder(
        &self,
        identifier: &str,
        state: ResolutionState,
    ) -> Result<TrekView, ResolutionError> {
        let trek = placeholder_trek(identifier)
            .ok_or_else(|| ResolutionError::Unresolvable(identifier.to_string()))?;
        let title = trek.display_name().unwrap_or(DEFAULT_TITLE).to_string();
        Ok(build_trek_view(identifier, trek, sample_reviews(&title), state))
    }

    /// Best effort: failures and slow responses are logged and yield `None`.
    async fn stored_reviews(&self, identifier: &str) -> Option<Vec<Review>> {
        let lookup = self.store.find(REVIEWS, Filter::eq("trekId", identifier));
        match timeout(self.config.reviews_timeout, lookup).await {
            Ok(Ok(docs)) => Some(
                docs.into_iter()
                    .filter_map(|doc| match doc.decode::<Review>(REVIEWS) {
                        Ok(mut review) => {
                            review.id = doc.key;
                            Some(review)
                        }
                        Err(e) => {
                            log::warn!("Skipping unreadable review: {}", e);
                            None
                        }
                    })
                    .collect(),
            ),
            Ok(Err(e)) => {
                log::warn!("Could not load reviews for {}: {}", identifier, e);
                None
            }
            Err(_) => {
                log::warn!("Reviews for {} timed out", identifier);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDocumentStore;
    use async_trait::async_trait;
    use bson::{doc, Document};

    /// Store whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn get(&self, _: &str, _: &str) -> Result<Option<StoredDocument>, StoreError> {
            Err(StoreError::Backend("unavailable".into()))
        }
        async fn find(&self, _: &str, _: Filter) -> Result<Vec<StoredDocument>, StoreError> {
            Err(StoreError::Backend("unavailable".into()))
        }
        async fn add(&self, _: &str, _: Document) -> Result<String, StoreError> {
            Err(StoreError::Backend("unavailable".into()))
        }
        async fn update(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
            Err(StoreError::Backend("unavailable".into()))
        }
        async fn delete(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Err(StoreError::Backend("unavailable".into()))
        }
    }

    /// Store that never answers within any reasonable deadline.
    struct StalledStore;

    #[async_trait]
    impl DocumentStore for StalledStore {
        async fn get(&self, _: &str, _: &str) -> Result<Option<StoredDocument>, StoreError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(None)
        }
        async fn find(&self, _: &str, _: Filter) -> Result<Vec<StoredDocument>, StoreError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
        async fn add(&self, _: &str, _: Document) -> Result<String, StoreError> {
            Ok(String::new())
        }
        async fn update(&self, _: &str, _: &str, _: Document) -> Result<(), StoreError> {
            Ok(())
        }
        async fn delete(&self, _: &str, _: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// Serves treks from memory; the `reviews` collection either fails or
    /// stalls.
    struct ReviewlessStore {
        treks: MemoryDocumentStore,
        stall: bool,
    }

    #[async_trait]
    impl DocumentStore for ReviewlessStore {
        async fn get(&self, collection: &str, key: &str) -> Result<Option<StoredDocument>, StoreError> {
            self.treks.get(collection, key).await
        }
        async fn find(&self, collection: &str, filter: Filter) -> Result<Vec<StoredDocument>, StoreError> {
            if collection == REVIEWS {
                if self.stall {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                }
                return Err(StoreError::Backend("reviews unavailable".into()));
            }
            self.treks.find(collection, filter).await
        }
        async fn add(&self, collection: &str, document: Document) -> Result<String, StoreError> {
            self.treks.add(collection, document).await
        }
        async fn update(&self, collection: &str, key: &str, fields: Document) -> Result<(), StoreError> {
            self.treks.update(collection, key, fields).await
        }
        async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
            self.treks.delete(collection, key).await
        }
    }

    async fn reviewless(stall: bool) -> Arc<ReviewlessStore> {
        let treks = MemoryDocumentStore::new();
        treks
            .put(TREKS, "brahmatal", doc! { "title": "Brahmatal", "days": 6, "price": "₹10,500" })
            .await;
        Arc::new(ReviewlessStore { treks, stall })
    }

    async fn seeded() -> Arc<MemoryDocumentStore> {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .put(TREKS, "abc123", doc! { "title": "Hampta Pass", "id": "hampta-pass", "days": 5, "price": "₹8,500" })
            .await;
        store
            .put(TREKS, "xyz789", doc! { "title": "Valley of Flowers Trek", "days": 6 })
            .await;
        store
            .put(TREKS, "kedarkantha", doc! { "title": "Kedarkantha", "days": 4 })
            .await;
        store
    }

    #[actix_rt::test]
    async fn test_primary_key_lookup() {
        let resolver = TrekResolver::new(seeded().await);
        let view = resolver.resolve("kedarkantha").await.unwrap();
        assert_eq!(view.title, "Kedarkantha");
        assert_eq!(view.days, 4);
        assert_eq!(
            view.resolution,
            ResolutionState::Resolved { matched_by: MatchStrategy::PrimaryKey }
        );
    }

    #[actix_rt::test]
    async fn test_id_field_lookup() {
        let resolver = TrekResolver::new(seeded().await);
        let view = resolver.resolve("hampta-pass").await.unwrap();
        assert_eq!(view.id, "abc123");
        assert_eq!(view.title, "Hampta Pass");
        assert_eq!(view.price, "₹8,500");
        assert_eq!(
            view.resolution,
            ResolutionState::Resolved { matched_by: MatchStrategy::IdField }
        );
    }

    #[actix_rt::test]
    async fn test_title_slug_scan() {
        let resolver = TrekResolver::new(seeded().await);
        let view = resolver.resolve("Valley-Of-Flowers-Trek").await.unwrap();
        assert_eq!(view.id, "xyz789");
        assert_eq!(
            view.resolution,
            ResolutionState::Resolved { matched_by: MatchStrategy::Scan }
        );
    }

    #[actix_rt::test]
    async fn test_missing_trek_gets_placeholder() {
        let resolver = TrekResolver::new(seeded().await);
        let view = resolver.resolve("valley-of-flowers").await.unwrap();
        assert_eq!(view.title, "Valley Of Flowers");
        assert_eq!(view.resolution, ResolutionState::Fallback);
        assert!((3..=10).contains(&view.days));
        assert!(view.price.starts_with('₹'));
        assert_eq!(view.reviews.len(), 5);
        assert_eq!(view.itinerary.len(), view.days as usize);
    }

    #[actix_rt::test]
    async fn test_store_errors_fall_back() {
        let resolver = TrekResolver::new(Arc::new(BrokenStore));
        let view = resolver.resolve("sar-pass").await.unwrap();
        assert_eq!(view.title, "Sar Pass");
        assert_eq!(view.resolution, ResolutionState::Fallback);
    }

    #[actix_rt::test]
    async fn test_blank_identifier_is_unresolvable() {
        let resolver = TrekResolver::new(seeded().await);
        assert!(matches!(
            resolver.resolve("   ").await,
            Err(ResolutionError::Unresolvable(_))
        ));
    }

    #[actix_rt::test]
    async fn test_timeout_wins_over_stalled_lookup() {
        tokio::time::pause();
        let resolver = TrekResolver::new(Arc::new(StalledStore));
        let view = resolver.resolve("chadar-trek").await.unwrap();
        assert_eq!(view.resolution, ResolutionState::TimedOut);
        assert_eq!(view.title, "Chadar Trek");
    }

    #[actix_rt::test]
    async fn test_stored_reviews_replace_samples() {
        let store = seeded().await;
        store
            .put(REVIEWS, "r1", doc! { "trekId": "kedarkantha", "author": "Meera", "rating": 5, "text": "Snow all the way" })
            .await;

        let resolver = TrekResolver::new(store);
        let view = resolver.resolve("kedarkantha").await.unwrap();
        assert_eq!(view.reviews.len(), 1);
        assert_eq!(view.reviews[0].id, "r1");
        assert_eq!(view.reviews[0].author.as_deref(), Some("Meera"));
    }

    #[actix_rt::test]
    async fn test_failed_reviews_keep_stored_trek() {
        let resolver = TrekResolver::new(reviewless(false).await);
        let view = resolver.resolve("brahmatal").await.unwrap();
        assert_eq!(
            view.resolution,
            ResolutionState::Resolved { matched_by: MatchStrategy::PrimaryKey }
        );
        assert_eq!(view.price, "₹10,500");
        assert_eq!(view.reviews.len(), 5);
    }

    #[actix_rt::test]
    async fn test_stalled_reviews_keep_stored_trek() {
        tokio::time::pause();
        let resolver = TrekResolver::new(reviewless(true).await);
        let view = resolver.resolve("brahmatal").await.unwrap();
        assert_eq!(
            view.resolution,
            ResolutionState::Resolved { matched_by: MatchStrategy::PrimaryKey }
        );
        assert_eq!(view.days, 6);
        assert_eq!(view.reviews.len(), 5);
    }

    #[actix_rt::test]
    async fn test_mistyped_fields_do_not_discard_stored_trek() {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .put(
                TREKS,
                "kedarkantha",
                doc! {
                    "title": "Kedarkantha",
                    "days": 4,
                    "price": "₹9,000",
                    "organizerVerified": "yes",
                    "itinerary": [
                        { "day": "1", "title": "Drive to Sankri" },
                        { "day": "2", "title": "Juda ka talab" },
                    ],
                },
            )
            .await;

        let view = TrekResolver::new(store).resolve("kedarkantha").await.unwrap();
        assert_eq!(
            view.resolution,
            ResolutionState::Resolved { matched_by: MatchStrategy::PrimaryKey }
        );
        assert_eq!(view.price, "₹9,000");
        assert_eq!(view.itinerary.len(), 2);
        assert_eq!(view.itinerary[1].day, 2);
    }

    #[test]
    fn test_title_slug() {
        assert_eq!(title_slug("Valley of  Flowers"), "valley-of-flowers");
    }
}
