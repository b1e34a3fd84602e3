//! Run Discussion use case
//!
//! Drives one article's panel discussion: loads it from the cache on
//! mount, otherwise requests a generation from the backend, reveals the
//! opinions turn by turn, and writes the finished result through to the
//! cache.

use crate::ports::discussion_observer::{DiscussionObserver, Notice};
use crate::ports::locale::LocaleProvider;
use crate::ports::panel_gateway::{GatewayError, PanelGateway, PanelRequest, PanelResponse};
use crate::ports::reveal_delay::RevealDelay;
use crate::use_cases::panel_cache::PanelCacheStore;
use crate::use_cases::staged_reveal::{RevealEvent, staged_reveal};
use futures::StreamExt;
use panel_domain::{
    ArticleId, CachedPanel, ConsensusSummary, DiscussionPhase, MarketData, MarketEvent,
    PanelOpinion, Speaker, consensus_level,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned from a generation attempt
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("A discussion is already being generated")]
    AlreadyGenerating,

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// What a successful generation produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub opinion_count: usize,
    pub has_consensus: bool,
    /// The backend served the result from its own cache (no staged reveal)
    pub backend_cached: bool,
}

/// Everything currently visible for one article
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionView {
    pub article_id: Option<ArticleId>,
    pub phase: DiscussionPhase,
    pub opinions: Vec<PanelOpinion>,
    pub consensus: Option<ConsensusSummary>,
    pub market_data: Option<MarketData>,
    pub economic_calendar: Vec<MarketEvent>,
    /// Speaker of the opinion currently being revealed
    pub current_speaker: Option<Speaker>,
}

impl DiscussionView {
    /// Derived agreement percentage over the visible opinions
    pub fn consensus_level(&self) -> f64 {
        consensus_level(&self.opinions)
    }

    /// View of a cached panel, as `mount` would show it
    pub fn from_cached(panel: CachedPanel) -> Self {
        let mut view = Self {
            article_id: Some(panel.article_id.clone()),
            ..Default::default()
        };
        view.load_cached(panel);
        view
    }

    fn load_cached(&mut self, panel: CachedPanel) {
        self.phase = DiscussionPhase::LoadedFromCache;
        self.opinions = panel.opinions;
        self.consensus = panel.consensus;
        self.market_data = panel.market_data;
        self.economic_calendar.clear();
        self.current_speaker = None;
    }
}

/// Clears the generating flag when dropped, including when the
/// generation future is dropped mid-reveal.
struct GeneratingGuard<'a>(&'a AtomicBool);

impl<'a> GeneratingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Controller for one article's discussion view
///
/// Only one generation may be in flight per controller. There is no
/// cancellation: dropping the future returned by [`generate`](Self::generate)
/// abandons it, and an abandoned generation never reaches the cache.
pub struct PanelDiscussionController<G: PanelGateway + 'static> {
    article_id: ArticleId,
    gateway: Arc<G>,
    cache: Arc<PanelCacheStore>,
    locale: Arc<dyn LocaleProvider>,
    delay: Arc<dyn RevealDelay>,
    generating: AtomicBool,
    view: Mutex<DiscussionView>,
}

impl<G: PanelGateway + 'static> PanelDiscussionController<G> {
    pub fn new(
        article_id: ArticleId,
        gateway: Arc<G>,
        cache: Arc<PanelCacheStore>,
        locale: Arc<dyn LocaleProvider>,
        delay: Arc<dyn RevealDelay>,
    ) -> Self {
        let view = DiscussionView {
            article_id: Some(article_id.clone()),
            ..Default::default()
        };
        Self {
            article_id,
            gateway,
            cache,
            locale,
            delay,
            generating: AtomicBool::new(false),
            view: Mutex::new(view),
        }
    }

    pub fn article_id(&self) -> &ArticleId {
        &self.article_id
    }

    /// Snapshot of the visible state
    pub fn view(&self) -> DiscussionView {
        self.lock_view().clone()
    }

    pub fn phase(&self) -> DiscussionPhase {
        self.lock_view().phase
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    /// Agreement percentage over the opinions visible right now
    pub fn consensus_level(&self) -> f64 {
        self.lock_view().consensus_level()
    }

    /// Show the cached discussion if there is one.
    ///
    /// A hit makes every opinion and the consensus visible at once and
    /// enters `LoadedFromCache`; a miss leaves the view `Idle`. Never
    /// contacts the backend.
    pub fn mount(&self) -> DiscussionPhase {
        match self.cache.get_panel(&self.article_id) {
            Some(panel) => {
                info!(
                    "Loaded {} cached opinions for {}",
                    panel.opinions.len(),
                    self.article_id
                );
                self.lock_view().load_cached(panel);
                DiscussionPhase::LoadedFromCache
            }
            None => {
                debug!("No cached discussion for {}", self.article_id);
                self.lock_view().phase = DiscussionPhase::Idle;
                DiscussionPhase::Idle
            }
        }
    }

    /// Generate the discussion, revealing opinions as they are "spoken".
    ///
    /// With `regenerate`, the cached entry is removed before the request
    /// is issued. On failure the observer receives an error notice, the
    /// view returns to `Idle` and any previously visible opinions stay.
    pub async fn generate(
        &self,
        regenerate: bool,
        observer: &dyn DiscussionObserver,
    ) -> Result<GenerationOutcome, GenerateError> {
        let _guard =
            GeneratingGuard::acquire(&self.generating).ok_or(GenerateError::AlreadyGenerating)?;

        if regenerate {
            info!("Regenerating discussion for {}", self.article_id);
            self.cache.remove_panel(&self.article_id);
        }

        let language = self.locale.active_language();
        self.set_phase(DiscussionPhase::Generating, observer);

        let request = PanelRequest::new(self.article_id.clone(), regenerate, language.clone());
        let response = match self.gateway.generate_panel(&request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Panel generation for {} failed: {}", self.article_id, e);
                let message = e
                    .user_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| language.generation_failed_notice().to_string());
                self.set_phase(DiscussionPhase::Error, observer);
                observer.on_notice(&Notice::error(message));
                self.set_phase(DiscussionPhase::Idle, observer);
                return Err(e.into());
            }
        };

        let outcome = GenerationOutcome {
            opinion_count: response.discussion.len(),
            has_consensus: response.consensus.is_some(),
            backend_cached: response.cached,
        };
        info!(
            "Received {} opinions for {} (backend cached: {})",
            outcome.opinion_count, self.article_id, outcome.backend_cached
        );

        let PanelResponse {
            discussion,
            consensus,
            market_data,
            economic_calendar,
            cached,
        } = response;

        {
            let mut view = self.lock_view();
            view.opinions.clear();
            view.consensus = None;
            view.market_data = market_data.clone();
            view.economic_calendar = economic_calendar;
        }

        if cached {
            self.show_all(discussion.clone(), observer);
        } else {
            self.reveal(discussion.clone(), observer).await;
        }

        if let Some(consensus) = &consensus {
            self.lock_view().consensus = Some(consensus.clone());
            observer.on_consensus(consensus);
        }

        self.set_phase(DiscussionPhase::Complete, observer);
        self.cache
            .save_panel(&self.article_id, discussion, consensus, market_data);
        observer.on_notice(&Notice::success(language.generation_succeeded_notice()));

        Ok(outcome)
    }

    fn show_all(&self, opinions: Vec<PanelOpinion>, observer: &dyn DiscussionObserver) {
        for (index, opinion) in opinions.iter().enumerate() {
            observer.on_opinion_revealed(index, opinion);
        }
        self.lock_view().opinions = opinions;
    }

    async fn reveal(&self, opinions: Vec<PanelOpinion>, observer: &dyn DiscussionObserver) {
        self.set_phase(DiscussionPhase::Revealing, observer);

        let mut events = std::pin::pin!(staged_reveal(opinions, self.delay.as_ref()));
        while let Some(event) = events.next().await {
            match event {
                RevealEvent::Speaking { speaker, .. } => {
                    observer.on_speaker(&speaker);
                    self.lock_view().current_speaker = Some(speaker);
                }
                RevealEvent::Revealed { index, opinion } => {
                    observer.on_opinion_revealed(index, &opinion);
                    self.lock_view().opinions.push(opinion);
                }
            }
        }

        self.lock_view().current_speaker = None;
    }

    fn set_phase(&self, phase: DiscussionPhase, observer: &dyn DiscussionObserver) {
        self.lock_view().phase = phase;
        observer.on_phase_change(phase);
    }

    fn lock_view(&self) -> MutexGuard<'_, DiscussionView> {
        self.view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::discussion_observer::{NoObserver, NoticeLevel};
    use crate::ports::reveal_delay::NoDelay;
    use crate::use_cases::test_support::{
        ManualClock, MemoryStore, RecordingObserver, SwitchableLocale, sample_consensus,
        sample_opinions,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use panel_domain::Persona;
    use std::collections::VecDeque;
    use std::time::Duration;

    // === Mock implementations ===

    struct MockGateway {
        responses: Mutex<VecDeque<Result<PanelResponse, GatewayError>>>,
        requests: Mutex<Vec<PanelRequest>>,
        /// Whether the cache held the article when each request arrived
        cache_seen: Mutex<Vec<bool>>,
        cache: Option<Arc<PanelCacheStore>>,
    }

    impl MockGateway {
        fn new(responses: Vec<Result<PanelResponse, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
                cache_seen: Mutex::new(Vec::new()),
                cache: None,
            }
        }

        fn watching(mut self, cache: Arc<PanelCacheStore>) -> Self {
            self.cache = Some(cache);
            self
        }

        fn requests(&self) -> Vec<PanelRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PanelGateway for MockGateway {
        async fn generate_panel(
            &self,
            request: &PanelRequest,
        ) -> Result<PanelResponse, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(cache) = &self.cache {
                self.cache_seen
                    .lock()
                    .unwrap()
                    .push(cache.has_panel(&request.article_id));
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::ConnectionError("no response".to_string())))
        }
    }

    /// Reveals the first opinion immediately, then never finishes
    struct StallAfterFirst;

    #[async_trait]
    impl RevealDelay for StallAfterFirst {
        async fn wait(&self, index: usize) {
            if index > 0 {
                futures::future::pending::<()>().await;
            }
        }
    }

    struct Harness {
        store: Arc<MemoryStore>,
        locale: Arc<SwitchableLocale>,
        cache: Arc<PanelCacheStore>,
    }

    impl Harness {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::default());
            let locale = Arc::new(SwitchableLocale::new("en"));
            let cache = Arc::new(PanelCacheStore::new(
                store.clone(),
                Arc::new(ManualClock::new()),
                locale.clone(),
            ));
            Self {
                store,
                locale,
                cache,
            }
        }

        fn controller(
            &self,
            article: &str,
            gateway: Arc<MockGateway>,
            delay: Arc<dyn RevealDelay>,
        ) -> PanelDiscussionController<MockGateway> {
            PanelDiscussionController::new(
                ArticleId::new(article).unwrap(),
                gateway,
                self.cache.clone(),
                self.locale.clone(),
                delay,
            )
        }
    }

    fn id(s: &str) -> ArticleId {
        ArticleId::new(s).unwrap()
    }

    fn fresh_response() -> PanelResponse {
        PanelResponse {
            discussion: sample_opinions(Utc::now()),
            consensus: Some(sample_consensus()),
            cached: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generate_reveals_in_order_then_caches() {
        let h = Harness::new();
        let gateway = Arc::new(MockGateway::new(vec![Ok(fresh_response())]));
        let controller = h.controller("a1", gateway.clone(), Arc::new(NoDelay));
        let observer = RecordingObserver::default();

        assert_eq!(controller.mount(), DiscussionPhase::Idle);
        let outcome = controller.generate(false, &observer).await.unwrap();

        assert_eq!(
            outcome,
            GenerationOutcome {
                opinion_count: 3,
                has_consensus: true,
                backend_cached: false,
            }
        );
        assert_eq!(
            observer.events(),
            vec![
                "phase:generating",
                "phase:revealing",
                "speaker:GPT-4",
                "revealed:0:GPT-4",
                "speaker:Claude",
                "revealed:1:Claude",
                "speaker:Grok",
                "revealed:2:Grok",
                "consensus:HOLD",
                "phase:complete",
                "notice:Success",
            ]
        );

        let request = &gateway.requests()[0];
        assert_eq!(request.article_id, id("a1"));
        assert!(!request.regenerate);
        assert_eq!(request.language.as_str(), "en");

        let view = controller.view();
        assert_eq!(view.phase, DiscussionPhase::Complete);
        assert_eq!(view.opinions.len(), 3);
        assert!(view.current_speaker.is_none());
        assert!(!controller.is_generating());

        let cached = h.cache.get_panel(&id("a1")).expect("written through");
        let models: Vec<_> = cached.opinions.iter().map(|o| o.model.as_str()).collect();
        assert_eq!(models, vec!["GPT-4", "Claude", "Grok"]);
        assert_eq!(cached.consensus, Some(sample_consensus()));
    }

    #[tokio::test]
    async fn test_mount_with_cache_hit_shows_everything_without_request() {
        let h = Harness::new();
        let mut opinions = sample_opinions(Utc::now());
        opinions.push(PanelOpinion::from_persona(
            Persona::Gemini,
            "Rates matter more.",
            Utc::now(),
        ));
        h.cache
            .save_panel(&id("a2"), opinions, Some(sample_consensus()), None);

        let gateway = Arc::new(MockGateway::new(vec![]));
        let controller = h.controller("a2", gateway.clone(), Arc::new(StallAfterFirst));

        assert_eq!(controller.mount(), DiscussionPhase::LoadedFromCache);
        let view = controller.view();
        assert_eq!(view.opinions.len(), 4);
        assert_eq!(view.consensus, Some(sample_consensus()));
        assert!(gateway.requests().is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_clears_cache_before_request() {
        let h = Harness::new();
        h.cache
            .save_panel(&id("a1"), sample_opinions(Utc::now()), None, None);

        let gateway = Arc::new(
            MockGateway::new(vec![Err(GatewayError::Timeout)]).watching(h.cache.clone()),
        );
        let controller = h.controller("a1", gateway.clone(), Arc::new(NoDelay));
        controller.mount();

        let result = controller.generate(true, &NoObserver).await;
        assert!(matches!(
            result,
            Err(GenerateError::Gateway(GatewayError::Timeout))
        ));
        assert!(gateway.requests()[0].regenerate);
        assert_eq!(*gateway.cache_seen.lock().unwrap(), vec![false]);
        assert!(h.cache.get_panel(&id("a1")).is_none());

        // The previously displayed result stays visible.
        let view = controller.view();
        assert_eq!(view.phase, DiscussionPhase::Idle);
        assert_eq!(view.opinions.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_generation_notifies_and_caches_nothing() {
        let h = Harness::new();
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::ConnectionError(
            "network unreachable".to_string(),
        ))]));
        let controller = h.controller("a3", gateway, Arc::new(NoDelay));
        let observer = RecordingObserver::default();

        let result = controller.generate(false, &observer).await;
        assert!(result.is_err());

        let notices = observer.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "network unreachable");
        assert_eq!(
            observer.events(),
            vec![
                "phase:generating",
                "phase:error",
                "notice:Error",
                "phase:idle"
            ]
        );
        assert!(!controller.is_generating());
        assert!(h.cache.get_panel(&id("a3")).is_none());
        assert!(h.store.raw(&h.cache.params().namespace).is_none());
    }

    #[tokio::test]
    async fn test_failure_without_message_uses_localized_notice() {
        let h = Harness::new();
        h.locale.set("zh");
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::Backend {
            status: 502,
            message: None,
        })]));
        let controller = h.controller("a3", gateway.clone(), Arc::new(NoDelay));
        let observer = RecordingObserver::default();

        let _ = controller.generate(false, &observer).await;
        assert_eq!(observer.notices()[0].message, "生成专家讨论失败，请稍后重试");
        assert_eq!(gateway.requests()[0].language.as_str(), "zh");
    }

    #[tokio::test]
    async fn test_backend_cached_result_skips_staged_reveal() {
        let h = Harness::new();
        let response = PanelResponse {
            cached: true,
            ..fresh_response()
        };
        let gateway = Arc::new(MockGateway::new(vec![Ok(response)]));
        // A stalling delay would hang the test if the reveal ran.
        let controller = h.controller("a4", gateway, Arc::new(StallAfterFirst));
        let observer = RecordingObserver::default();

        let outcome = controller.generate(false, &observer).await.unwrap();
        assert!(outcome.backend_cached);
        let events = observer.events();
        assert!(!events.iter().any(|e| e.starts_with("speaker:")));
        assert!(!events.contains(&"phase:revealing".to_string()));
        assert_eq!(controller.view().opinions.len(), 3);
        assert!(h.cache.has_panel(&id("a4")));
    }

    #[tokio::test]
    async fn test_rejected_generation_returns_already_generating() {
        let h = Harness::new();
        let gateway = Arc::new(MockGateway::new(vec![Ok(fresh_response())]));
        let controller = h.controller("a5", gateway.clone(), Arc::new(StallAfterFirst));

        let first = controller.generate(false, &NoObserver);
        let second = async {
            while !controller.is_generating() {
                tokio::task::yield_now().await;
            }
            controller.generate(false, &NoObserver).await
        };

        tokio::select! {
            _ = first => panic!("first generation should stall"),
            result = second => {
                assert!(matches!(result, Err(GenerateError::AlreadyGenerating)));
            }
        }
        assert_eq!(gateway.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_reveal_never_reaches_cache() {
        let h = Harness::new();
        let gateway = Arc::new(MockGateway::new(vec![Ok(fresh_response())]));
        let controller = h.controller("a6", gateway, Arc::new(StallAfterFirst));

        let result = tokio::time::timeout(
            Duration::from_millis(20),
            controller.generate(false, &NoObserver),
        )
        .await;
        assert!(result.is_err());

        let view = controller.view();
        assert_eq!(view.phase, DiscussionPhase::Revealing);
        assert_eq!(view.opinions.len(), 1);
        assert!(!controller.is_generating());
        assert!(h.cache.get_panel(&id("a6")).is_none());
    }

    #[tokio::test]
    async fn test_consensus_level_tracks_visible_opinions() {
        let h = Harness::new();
        let gateway = Arc::new(MockGateway::new(vec![Ok(fresh_response())]));
        let controller = h.controller("a7", gateway, Arc::new(NoDelay));

        assert_eq!(controller.consensus_level(), 100.0);
        controller.generate(false, &NoObserver).await.unwrap();
        // 3 agreements, 1 disagreement
        assert!((controller.consensus_level() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_view_from_cached_panel() {
        let panel = CachedPanel {
            article_id: ArticleId::new("a9").unwrap(),
            opinions: sample_opinions(Utc::now()),
            consensus: Some(sample_consensus()),
            market_data: None,
            timestamp: Utc::now(),
            language: panel_domain::Language::english(),
        };

        let view = DiscussionView::from_cached(panel);
        assert_eq!(view.phase, DiscussionPhase::LoadedFromCache);
        assert_eq!(view.article_id.as_ref().map(|id| id.as_str()), Some("a9"));
        assert_eq!(view.opinions.len(), 3);
        assert!(view.consensus.is_some());
        assert!(view.current_speaker.is_none());
    }
}
