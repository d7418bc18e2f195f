//! Typed publish/subscribe between the loaders, the coordinators and the app

use std::any::{Any, TypeId};
use ahash::AHashMap;
use parking_lot::Mutex;

/// Marker for values that can travel over the [`EventBus`]
pub trait Event: Any + Send + Sync {}

/// Subscriber with the event type erased
type ErasedHandler = Box<dyn FnMut(&dyn Any) + Send>;

/// Dashboard-wide event bus.
///
/// Subscribers are keyed by event type; a publish only reaches the
/// subscribers of that exact type.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<AHashMap<TypeId, Vec<ErasedHandler>>>,
}

/// Dashboard events
pub mod events {
    use super::Event;
    use crate::sync::IdentifierSpace;

    /// A table finished loading
    #[derive(Debug, Clone)]
    pub struct DataSourceLoaded {
        pub source_name: String,
        pub row_count: usize,
    }

    /// A table failed to load; the view stays in its loading state
    #[derive(Debug, Clone)]
    pub struct DataSourceError {
        pub source_name: String,
        pub error: String,
    }

    /// The selection or visibility of an identifier space changed
    #[derive(Debug, Clone)]
    pub struct SelectionChanged {
        pub space: IdentifierSpace,
        pub gesture: &'static str,
        pub selected: usize,
        pub focus: Option<String>,
    }

    impl Event for DataSourceLoaded {}
    impl Event for DataSourceError {}
    impl Event for SelectionChanged {}
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `handler` for every future event of type `E`
    pub fn subscribe<E, F>(&self, mut handler: F)
    where
        E: Event,
        F: FnMut(&E) + Send + 'static,
    {
        let erased: ErasedHandler = Box::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });
        self.subscribers.lock().entry(TypeId::of::<E>()).or_default().push(erased);
    }

    /// Deliver an event to its subscribers, in subscription order.
    ///
    /// Handlers run under the bus lock and must not publish themselves.
    pub fn publish<E: Event>(&self, event: E) {
        let mut subscribers = self.subscribers.lock();
        let Some(handlers) = subscribers.get_mut(&TypeId::of::<E>()) else {
            return;
        };
        for handler in handlers.iter_mut() {
            handler(&event);
        }
    }

    /// Number of subscribers for one event type
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.subscribers
            .lock()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::events::{DataSourceError, DataSourceLoaded};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_publish_reaches_matching_subscribers_only() {
        let bus = EventBus::new();
        let loaded = Arc::new(AtomicUsize::new(0));
        let counter = loaded.clone();

        bus.subscribe(move |e: &DataSourceLoaded| {
            counter.fetch_add(e.row_count, Ordering::SeqCst);
        });

        bus.publish(DataSourceLoaded { source_name: "a.csv".into(), row_count: 3 });
        bus.publish(DataSourceError { source_name: "b.csv".into(), error: "missing".into() });
        bus.publish(DataSourceLoaded { source_name: "c.csv".into(), row_count: 4 });

        assert_eq!(loaded.load(Ordering::SeqCst), 7);
        assert_eq!(bus.subscriber_count::<DataSourceLoaded>(), 1);
        assert_eq!(bus.subscriber_count::<DataSourceError>(), 0);
    }
}
