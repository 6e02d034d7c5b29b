//! Per-instance event dispatch.
//!
//! One table keyed by map id. Each instance holds at most one listener per
//! event kind; setting a listener replaces the previous one, and clearing it
//! leaves none. Events whose `mapId` is not a registered instance are
//! dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use amap_common::{MapEvent, MapEventKind, NativeEvent};

/// Callback receiving routed events for one instance and kind.
pub type MapListener = Arc<dyn Fn(&MapEvent) + Send + Sync>;

/// Callback run once when the instance reports `onMapReady`.
pub type ReadyCallback = Box<dyn FnOnce(&MapEvent) + Send>;

/// Box a closure as a [`MapListener`].
pub fn map_listener<F>(f: F) -> MapListener
where
    F: Fn(&MapEvent) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Box a closure as a [`ReadyCallback`].
pub fn on_ready<F>(f: F) -> ReadyCallback
where
    F: FnOnce(&MapEvent) + Send + 'static,
{
    Box::new(f)
}

#[derive(Default)]
struct InstanceRoutes {
    listeners: HashMap<MapEventKind, MapListener>,
    ready: Option<ReadyCallback>,
}

/// Routes of a replaced instance, kept aside until the replacement either
/// sticks or is rolled back.
pub(crate) struct SavedRoutes(InstanceRoutes);

#[derive(Default)]
pub struct EventRouter {
    routes: Mutex<HashMap<String, InstanceRoutes>>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    fn routes(&self) -> MutexGuard<'_, HashMap<String, InstanceRoutes>> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start routing for `map_id` with no listeners. An existing entry is
    /// replaced.
    pub fn register(&self, map_id: &str) {
        if self.swap_in(map_id).is_some() {
            debug!(map_id, "routes replaced");
        }
    }

    /// Like [`EventRouter::register`], but hands back the replaced entry so
    /// it can be put back with [`EventRouter::restore`].
    pub(crate) fn swap_in(&self, map_id: &str) -> Option<SavedRoutes> {
        self.routes()
            .insert(map_id.to_string(), InstanceRoutes::default())
            .map(SavedRoutes)
    }

    /// Reinstate routes taken out by [`EventRouter::swap_in`], replacing
    /// whatever is registered for `map_id` now.
    pub(crate) fn restore(&self, map_id: &str, saved: SavedRoutes) {
        self.routes().insert(map_id.to_string(), saved.0);
        debug!(map_id, "routes restored");
    }

    /// Stop routing for `map_id`, dropping all its listeners.
    pub fn remove_instance(&self, map_id: &str) -> bool {
        self.routes().remove(map_id).is_some()
    }

    /// Set or clear the listener for `kind`. Returns `false` if `map_id` is
    /// not registered.
    pub fn set_listener(
        &self,
        map_id: &str,
        kind: MapEventKind,
        listener: Option<MapListener>,
    ) -> bool {
        let mut routes = self.routes();
        let Some(instance) = routes.get_mut(map_id) else {
            debug!(map_id, %kind, "listener ignored, instance not registered");
            return false;
        };
        let replaced = match listener {
            Some(listener) => instance.listeners.insert(kind, listener),
            None => instance.listeners.remove(&kind),
        };
        trace!(map_id, %kind, replaced = replaced.is_some(), "listener updated");
        true
    }

    /// Install the one-shot ready callback for `map_id`.
    pub fn set_ready(&self, map_id: &str, callback: ReadyCallback) -> bool {
        match self.routes().get_mut(map_id) {
            Some(instance) => {
                instance.ready = Some(callback);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self, map_id: &str) -> usize {
        self.routes()
            .get(map_id)
            .map(|r| r.listeners.len() + usize::from(r.ready.is_some()))
            .unwrap_or(0)
    }

    /// Deliver an event to the instance it names. Returns the number of
    /// callbacks invoked.
    ///
    /// Callbacks run after the table lock is released, so they may set
    /// listeners themselves.
    pub fn dispatch(&self, event: &NativeEvent) -> usize {
        let Some(kind) = event.kind() else {
            trace!(event = %event.name, "not a map event");
            return 0;
        };
        let Some(map_id) = event.map_id() else {
            debug!(%kind, "event without mapId dropped");
            return 0;
        };

        let (listener, ready) = {
            let mut routes = self.routes();
            let Some(instance) = routes.get_mut(map_id) else {
                trace!(map_id, %kind, "event for unknown instance dropped");
                return 0;
            };
            let ready = if kind == MapEventKind::MapReady {
                instance.ready.take()
            } else {
                None
            };
            (instance.listeners.get(&kind).cloned(), ready)
        };

        let routed = MapEvent {
            kind,
            map_id: map_id.to_string(),
            data: event.data.clone(),
        };
        let mut delivered = 0;
        if let Some(ready) = ready {
            ready(&routed);
            delivered += 1;
        }
        if let Some(listener) = listener {
            listener(&routed);
            delivered += 1;
        }
        delivered
    }
}
