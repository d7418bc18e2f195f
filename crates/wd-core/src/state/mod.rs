use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::RwLock;
use tokio::task::JoinHandle;

use crate::data::TableSource;
use crate::events::{events::DataSourceError, events::DataSourceLoaded, EventBus};

/// Load state of one table
#[derive(Debug)]
pub enum LoadState<T> {
    /// Still loading, or the load failed
    Loading,
    /// Loaded and immutable for the lifetime of the views
    Ready(Arc<T>),
}

impl<T> Clone for LoadState<T> {
    fn clone(&self) -> Self {
        match self {
            LoadState::Loading => LoadState::Loading,
            LoadState::Ready(data) => LoadState::Ready(data.clone()),
        }
    }
}

/// Holder for one table, filled in by a background load
pub struct DatasetSlot<T> {
    name: String,
    state: RwLock<LoadState<T>>,
    /// Bumped by `reset`; loads started under an older value are stale
    generation: AtomicU64,
}

impl<T: Send + Sync + 'static> DatasetSlot<T> {
    /// Create an empty slot in the loading state
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: RwLock::new(LoadState::Loading),
            generation: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The loaded table, if any
    pub fn get(&self) -> Option<Arc<T>> {
        match &*self.state.read() {
            LoadState::Ready(data) => Some(data.clone()),
            LoadState::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(&*self.state.read(), LoadState::Loading)
    }

    pub fn set_ready(&self, data: T) {
        *self.state.write() = LoadState::Ready(Arc::new(data));
    }

    /// Drop the loaded table, e.g. before loading another data folder.
    /// Loads still running from before the reset are ignored when they finish.
    pub fn reset(&self) {
        let mut state = self.state.write();
        self.generation.fetch_add(1, Ordering::SeqCst);
        *state = LoadState::Loading;
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store `data` unless the slot was reset since `generation`
    fn set_ready_for(&self, generation: u64, data: T) -> bool {
        let mut state = self.state.write();
        if self.generation() != generation {
            return false;
        }
        *state = LoadState::Ready(Arc::new(data));
        true
    }

    /// Load `source` in the background.
    ///
    /// Fire-and-forget: on success the table is stored and `on_ready` is
    /// called; on failure the error is logged and the slot stays loading.
    /// A load that finishes after `reset` is discarded without events.
    /// There is no retry and no timeout.
    pub fn spawn_load<S, F>(
        self: &Arc<Self>,
        handle: &tokio::runtime::Handle,
        source: S,
        event_bus: Arc<EventBus>,
        on_ready: F,
    ) -> JoinHandle<()>
    where
        S: TableSource<Output = T> + 'static,
        F: FnOnce() + Send + 'static,
    {
        let slot = self.clone();
        let generation = self.generation();
        handle.spawn(async move {
            let source_name = source.source_name().to_string();
            tracing::info!("Loading {} into {}", source_name, slot.name);

            match source.load().await {
                Ok(data) => {
                    let row_count = S::row_count(&data);
                    if !slot.set_ready_for(generation, data) {
                        tracing::debug!("Discarding stale load of {} into {}", source_name, slot.name);
                        return;
                    }
                    tracing::info!("Loaded {} rows from {}", row_count, source_name);
                    event_bus.publish(DataSourceLoaded { source_name, row_count });
                    on_ready();
                }
                Err(e) if slot.generation() != generation => {
                    tracing::debug!("Ignoring stale failure of {}: {:#}", source_name, e);
                }
                Err(e) => {
                    tracing::error!("Error loading {}: {:#}", source_name, e);
                    event_bus.publish(DataSourceError {
                        source_name,
                        error: e.to_string(),
                    });
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FixedSource(Option<Vec<u32>>);

    /// Source that answers after a delay
    struct DelayedSource {
        rows: Option<Vec<u32>>,
        delay_ms: u64,
    }

    #[async_trait::async_trait]
    impl TableSource for DelayedSource {
        type Output = Vec<u32>;

        async fn load(&self) -> anyhow::Result<Vec<u32>> {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
            self.rows.clone().ok_or_else(|| anyhow::anyhow!("file not found"))
        }

        fn source_name(&self) -> &str {
            "delayed.csv"
        }

        fn row_count(output: &Vec<u32>) -> usize {
            output.len()
        }
    }

    #[async_trait::async_trait]
    impl TableSource for FixedSource {
        type Output = Vec<u32>;

        async fn load(&self) -> anyhow::Result<Vec<u32>> {
            self.0.clone().ok_or_else(|| anyhow::anyhow!("file not found"))
        }

        fn source_name(&self) -> &str {
            "fixed.csv"
        }

        fn row_count(output: &Vec<u32>) -> usize {
            output.len()
        }
    }

    #[tokio::test]
    async fn test_successful_load_fills_slot() {
        let slot = Arc::new(DatasetSlot::new("numbers"));
        let ready = Arc::new(AtomicBool::new(false));
        let flag = ready.clone();

        slot.spawn_load(
            &tokio::runtime::Handle::current(),
            FixedSource(Some(vec![1, 2, 3])),
            Arc::new(EventBus::new()),
            move || flag.store(true, Ordering::SeqCst),
        )
        .await
        .unwrap();

        assert!(!slot.is_loading());
        assert_eq!(slot.get().unwrap().as_slice(), &[1, 2, 3]);
        assert!(ready.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_failed_load_stays_loading() {
        let bus = Arc::new(EventBus::new());
        let errors = Arc::new(AtomicUsize::new(0));
        let counter = errors.clone();
        bus.subscribe(move |_: &DataSourceError| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let slot: Arc<DatasetSlot<Vec<u32>>> = Arc::new(DatasetSlot::new("numbers"));
        slot.spawn_load(&tokio::runtime::Handle::current(), FixedSource(None), bus, || {
            panic!("on_ready must not run after a failed load")
        })
        .await
        .unwrap();

        assert!(slot.is_loading());
        assert!(slot.get().is_none());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_started_before_reset_is_discarded() {
        let handle = tokio::runtime::Handle::current();
        let bus = Arc::new(EventBus::new());
        let loaded = Arc::new(AtomicUsize::new(0));
        let counter = loaded.clone();
        bus.subscribe(move |_: &DataSourceLoaded| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let slot: Arc<DatasetSlot<Vec<u32>>> = Arc::new(DatasetSlot::new("numbers"));
        let old = slot.spawn_load(
            &handle,
            DelayedSource { rows: Some(vec![1, 1, 1]), delay_ms: 200 },
            bus.clone(),
            || {},
        );
        slot.reset();
        let new = slot.spawn_load(&handle, DelayedSource { rows: Some(vec![2]), delay_ms: 10 }, bus, || {});

        new.await.unwrap();
        assert_eq!(slot.get().unwrap().as_slice(), &[2]);
        old.await.unwrap();
        assert_eq!(slot.get().unwrap().as_slice(), &[2]);
        assert_eq!(loaded.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_load_does_not_fill_failed_slot() {
        let handle = tokio::runtime::Handle::current();
        let bus = Arc::new(EventBus::new());
        let errors = Arc::new(AtomicUsize::new(0));
        let counter = errors.clone();
        bus.subscribe(move |_: &DataSourceError| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let slot: Arc<DatasetSlot<Vec<u32>>> = Arc::new(DatasetSlot::new("numbers"));
        let old = slot.spawn_load(
            &handle,
            DelayedSource { rows: Some(vec![1, 1, 1]), delay_ms: 100 },
            bus.clone(),
            || panic!("stale load must not report ready"),
        );
        slot.reset();
        slot.spawn_load(&handle, FixedSource(None), bus, || {}).await.unwrap();
        old.await.unwrap();

        assert!(slot.is_loading());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }
}
