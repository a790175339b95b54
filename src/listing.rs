// Infinite-scroll venue listing
// Keeps the accumulated result list for one listing view and decides when
// the next page is fetched. One page fetch is in flight at most; results
// that resolve after the view moved on (query change, unmount) are dropped.

use crate::api_client::{ApiResult, VenueApi};
use crate::config::{ClientConfig, SortOrder, DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THRESHOLD_PX};
use crate::debounce::debounced;
use crate::venue::Venue;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// Viewport geometry reported by the host on scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self, threshold_px: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - threshold_px
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingOptions {
    pub page_size: u32,
    pub sort_order: SortOrder,
    pub scroll_threshold_px: f64,
    pub scroll_debounce: Duration,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sort_order: SortOrder::Desc,
            scroll_threshold_px: DEFAULT_SCROLL_THRESHOLD_PX,
            scroll_debounce: Duration::from_millis(150),
        }
    }
}

impl From<&ClientConfig> for ListingOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            page_size: config.page_size,
            sort_order: config.sort_order,
            scroll_threshold_px: config.scroll_threshold_px,
            scroll_debounce: config.scroll_debounce(),
        }
    }
}

// What the host renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingState {
    pub venues: Vec<Venue>,
    // Last page that produced results; 0 before the first one lands.
    pub page: u32,
    pub has_more: bool,
    pub loading: bool,
    pub query: Option<String>,
    pub error: Option<String>,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            venues: Vec::new(),
            page: 0,
            has_more: true,
            loading: false,
            query: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { page: u32, count: usize },
    // Empty page: nothing further for this query
    Exhausted { page: u32 },
    // Another fetch was in flight, nothing left, or not near the bottom
    Skipped,
    // Resolved after a query change or unmount
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    First,
    Next,
}

#[derive(Debug, Default)]
struct Inner {
    state: ListingState,
    generation: u64,
    mounted: bool,
}

impl Inner {
    fn reset(&mut self, query: Option<String>) {
        self.generation += 1;
        self.state = ListingState {
            query,
            ..ListingState::default()
        };
    }
}

pub struct ListingController<A: VenueApi> {
    api: Arc<A>,
    options: ListingOptions,
    inner: Mutex<Inner>,
    // Bumped on every unmount; wakes the scroll loop
    teardown: watch::Sender<u64>,
}

impl<A: VenueApi> ListingController<A> {
    pub fn new(api: Arc<A>, options: ListingOptions) -> Self {
        Self {
            api,
            options,
            inner: Mutex::new(Inner::default()),
            teardown: watch::channel(0).0,
        }
    }

    pub fn options(&self) -> &ListingOptions {
        &self.options
    }

    pub fn snapshot(&self) -> ListingState {
        self.inner.lock().state.clone()
    }

    pub fn venues(&self) -> Vec<Venue> {
        self.inner.lock().state.venues.clone()
    }

    pub fn has_more(&self) -> bool {
        self.inner.lock().state.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().state.loading
    }

    // Starts (or restarts) the view with the current query and loads page 1.
    pub async fn mount(&self) -> ApiResult<FetchOutcome> {
        {
            let mut inner = self.inner.lock();
            inner.mounted = true;
            let query = inner.state.query.take();
            inner.reset(query);
        }
        self.fetch(Target::First).await
    }

    // Tears the view down. Pending fetches resolve as `Discarded`.
    pub fn unmount(&self) {
        {
            let mut inner = self.inner.lock();
            inner.mounted = false;
            inner.generation += 1;
            inner.state.loading = false;
        }
        self.teardown.send_modify(|count| *count += 1);
        debug!("Listing unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.lock().mounted
    }

    // Replaces the active search. A blank query means the unfiltered list.
    pub async fn set_query(&self, query: Option<String>) -> ApiResult<FetchOutcome> {
        let query = query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        {
            let mut inner = self.inner.lock();
            info!("Listing query changed to {:?}", query);
            inner.reset(query);
        }
        self.fetch(Target::First).await
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> ApiResult<FetchOutcome> {
        if !metrics.near_bottom(self.options.scroll_threshold_px) {
            return Ok(FetchOutcome::Skipped);
        }
        self.load_next().await
    }

    pub async fn load_next(&self) -> ApiResult<FetchOutcome> {
        self.fetch(Target::Next).await
    }

    async fn fetch(&self, target: Target) -> ApiResult<FetchOutcome> {
        let (generation, page, query) = {
            let mut inner = self.inner.lock();
            if !inner.mounted || inner.state.loading {
                return Ok(FetchOutcome::Skipped);
            }
            let page = match target {
                Target::First => 1,
                Target::Next if inner.state.has_more => inner.state.page + 1,
                Target::Next => return Ok(FetchOutcome::Skipped),
            };
            inner.state.loading = true;
            (inner.generation, page, inner.state.query.clone())
        };

        debug!("Fetching listing page {} for {:?}", page, query);
        let result = match query.as_deref() {
            Some(q) => {
                self.api
                    .search_venues(q, page, self.options.page_size, self.options.sort_order)
                    .await
            }
            None => {
                self.api
                    .list_venues(page, self.options.page_size, self.options.sort_order)
                    .await
            }
        };

        let mut inner = self.inner.lock();
        if !inner.mounted || inner.generation != generation {
            debug!("Discarding stale listing page {}", page);
            return Ok(FetchOutcome::Discarded);
        }
        inner.state.loading = false;

        match result {
            Ok(result) if result.venues.is_empty() => {
                inner.state.has_more = false;
                inner.state.error = None;
                if page == 1 {
                    inner.state.venues.clear();
                }
                debug!("Listing exhausted at page {}", page);
                Ok(FetchOutcome::Exhausted { page })
            }
            Ok(result) => {
                let count = result.venues.len();
                if page == 1 {
                    inner.state.venues = result.venues;
                } else {
                    inner.state.venues.extend(result.venues);
                }
                inner.state.page = page;
                inner.state.has_more = true;
                inner.state.error = None;
                Ok(FetchOutcome::Loaded { page, count })
            }
            Err(error) => {
                warn!("Listing page {} failed: {}", page, error);
                inner.state.error = Some(error.display_message());
                Err(error)
            }
        }
    }

    // Feeds debounced scroll events into `on_scroll` until the sender side
    // closes or the view is unmounted, whichever comes first.
    pub fn run_scroll_loop(self: Arc<Self>, events: mpsc::Receiver<ScrollMetrics>) -> JoinHandle<()> {
        let mut settled = debounced(events, self.options.scroll_debounce);
        let mut teardown = self.teardown.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = settled.recv() => match event {
                        Some(metrics) => {
                            if let Err(error) = self.on_scroll(metrics).await {
                                warn!("Scroll-triggered fetch failed: {}", error.display_message());
                            }
                        }
                        None => break,
                    },
                    _ = teardown.changed() => {
                        debug!("Scroll loop stopped by unmount");
                        break;
                    }
                }
            }
        })
    }
}
