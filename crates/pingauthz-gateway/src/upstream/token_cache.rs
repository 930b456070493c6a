//! Shared access-token cache with single-flight refresh.
//!
//! One `CachedToken` is reused by every caller until `REFRESH_MARGIN` before
//! it expires. When it is stale, the first caller starts a refresh and parks
//! it in the cache state as a shared future; concurrent callers await that
//! same future, so exactly one request reaches the identity provider and
//! every waiter observes its result (token or error).
//!
//! The record is replaced as a whole (`Arc<CachedToken>` swap), never
//! mutated field by field.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt, Shared};

use pingauthz_core::error::{ProxyError, Result};

use super::IdentityClient;

/// A token is not handed out once it is this close to expiry.
pub const REFRESH_MARGIN: Duration = Duration::from_secs(30);

/// Time source for freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    pub fn new(value: impl Into<String>, expires_at: Instant) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// `now < expires_at - REFRESH_MARGIN`.
    pub fn is_fresh_at(&self, now: Instant) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }
}

type Refresh = Shared<BoxFuture<'static, Result<Arc<CachedToken>>>>;

#[derive(Default)]
struct CacheState {
    current: Option<Arc<CachedToken>>,
    inflight: Option<Refresh>,
}

struct Inner {
    identity: Arc<IdentityClient>,
    clock: Arc<dyn Clock>,
    state: Mutex<CacheState>,
}

/// Cheap to clone; all clones share one cache.
#[derive(Clone)]
pub struct TokenCache {
    inner: Arc<Inner>,
}

impl TokenCache {
    pub fn new(identity: Arc<IdentityClient>) -> Self {
        Self::with_clock(identity, Arc::new(SystemClock))
    }

    pub fn with_clock(identity: Arc<IdentityClient>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                identity,
                clock,
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    /// Return a token valid for at least `REFRESH_MARGIN`, refreshing if needed.
    pub async fn get_token(&self) -> Result<String> {
        let refresh = {
            let mut state = self.lock_state();
            let now = self.inner.clock.now();
            if let Some(tok) = state.current.as_ref().filter(|t| t.is_fresh_at(now)) {
                tracing::debug!("using cached access token");
                return Ok(tok.value.clone());
            }
            if let Some(pending) = state.inflight.clone() {
                tracing::debug!("joining in-flight token refresh");
                pending
            } else {
                let pending = self.start_refresh();
                state.inflight = Some(pending.clone());
                pending
            }
        };

        refresh.await.map(|tok| tok.value.clone())
    }

    /// Snapshot of the cached record, fresh or not.
    pub fn current(&self) -> Option<Arc<CachedToken>> {
        self.lock_state().current.clone()
    }

    fn start_refresh(&self) -> Refresh {
        let inner = Arc::clone(&self.inner);
        async move {
            let fetched = inner.identity.fetch().await.and_then(|f| {
                let expires_at = inner.clock.now().checked_add(f.expires_in).ok_or_else(|| {
                    ProxyError::Credential(format!(
                        "invalid expires_in: {}s",
                        f.expires_in.as_secs()
                    ))
                })?;
                Ok((f, expires_at))
            });

            let mut state = lock(&inner.state);
            state.inflight = None;

            match fetched {
                Ok((f, expires_at)) => {
                    let token = Arc::new(CachedToken::new(f.access_token, expires_at));
                    state.current = Some(Arc::clone(&token));
                    tracing::info!(expires_in = f.expires_in.as_secs(), "access token refreshed");
                    Ok(token)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "access token refresh failed");
                    Err(e)
                }
            }
        }
        .boxed()
        .shared()
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        lock(&self.inner.state)
    }
}

// Only whole-field assignments happen under the lock, so a poisoned
// state is still consistent.
fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
