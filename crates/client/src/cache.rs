use crate::error::Result;
use crate::handle::{DataSourceRegistry, ResourceHandle};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Readiness of the backend handle for the current panel session.
#[derive(Clone)]
pub enum HandleState {
    Connecting,
    Ready(Arc<dyn ResourceHandle>),
}

impl HandleState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl fmt::Debug for HandleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => f.write_str("Connecting"),
            Self::Ready(handle) => f.debug_tuple("Ready").field(&handle.name()).finish(),
        }
    }
}

/// Resolves the data source handle once per session and memoizes it.
///
/// [`BackendHandleCache::handle`] never waits: while the registry lookup is in
/// flight it returns `None` and callers degrade to empty results. The next
/// call after the lookup completes sees the handle.
pub struct BackendHandleCache {
    data_source: String,
    registry: Arc<dyn DataSourceRegistry>,
    state: watch::Sender<HandleState>,
    resolving: AtomicBool,
}

impl BackendHandleCache {
    pub fn new(registry: Arc<dyn DataSourceRegistry>, data_source: impl Into<String>) -> Arc<Self> {
        let (state, _) = watch::channel(HandleState::Connecting);
        Arc::new(Self {
            data_source: data_source.into(),
            registry,
            state,
            resolving: AtomicBool::new(false),
        })
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn state(&self) -> HandleState {
        self.state.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().is_ready()
    }

    /// Current handle, or `None` after kicking off a background lookup.
    pub fn handle(self: &Arc<Self>) -> Option<Arc<dyn ResourceHandle>> {
        if let HandleState::Ready(handle) = &*self.state.borrow() {
            return Some(Arc::clone(handle));
        }
        self.spawn_resolution();
        None
    }

    /// Resolve the handle in the caller's task, for callers that can wait.
    pub async fn connect(&self) -> Result<Arc<dyn ResourceHandle>> {
        if let HandleState::Ready(handle) = &*self.state.borrow() {
            return Ok(Arc::clone(handle));
        }
        let handle = self.registry.get(&self.data_source).await?;
        log::info!("Data source '{}' ready", self.data_source);
        self.state.send_replace(HandleState::Ready(Arc::clone(&handle)));
        Ok(handle)
    }

    /// Wait until a lookup started elsewhere stores the handle.
    pub async fn wait_ready(&self) -> Arc<dyn ResourceHandle> {
        let mut rx = self.state.subscribe();
        loop {
            if let HandleState::Ready(handle) = &*rx.borrow_and_update() {
                return Arc::clone(handle);
            }
            // The sender lives in `self`, so the channel stays open.
            let _ = rx.changed().await;
        }
    }

    fn spawn_resolution(self: &Arc<Self>) {
        if self.resolving.swap(true, Ordering::SeqCst) {
            return;
        }
        log::debug!("Resolving data source '{}'", self.data_source);
        let this = Arc::clone(self);
        tokio::spawn(async move {
            match this.registry.get(&this.data_source).await {
                Ok(handle) => {
                    log::info!("Data source '{}' ready", this.data_source);
                    this.state.send_replace(HandleState::Ready(handle));
                }
                Err(err) => {
                    log::warn!("Data source '{}' unavailable: {err}", this.data_source);
                }
            }
            this.resolving.store(false, Ordering::SeqCst);
        });
    }
}

impl fmt::Debug for BackendHandleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendHandleCache")
            .field("data_source", &self.data_source)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
