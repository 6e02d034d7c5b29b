//! The plugin facade: instance creation, plugin-wide calls, and inbound
//! event handling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use amap_common::{
    BridgeError, EventBus, GeocodeQuery, GeocodeResult, MapConfig, NativeEvent, Rect, Result,
    FOCUS_PROBE_EVENT, INTERNAL_ID_ATTRIBUTE,
};
use amap_config::BridgeSettings;

use crate::focus::answer_focus_probe;
use crate::host::{HostElement, HostPage};
use crate::map::AMap;
use crate::measure::measure_bounds;
use crate::router::{EventRouter, ReadyCallback, SavedRoutes};
use crate::tracker::{TrackerContext, ViewportTracker};
use crate::transport::{methods, NativeTransport};

/// Arguments for [`AMapPlugin::create`].
pub struct CreateOptions {
    /// Caller-chosen id, unique among live instances.
    pub id: String,
    pub config: MapConfig,
    /// Element the native view is laid out under.
    pub element: Option<Arc<dyn HostElement>>,
    /// Replace a live instance with the same id.
    pub force_create: bool,
}

impl CreateOptions {
    pub fn new(id: impl Into<String>, element: Arc<dyn HostElement>) -> Self {
        Self {
            id: id.into(),
            config: MapConfig::default(),
            element: Some(element),
            force_create: false,
        }
    }

    pub fn with_config(mut self, config: MapConfig) -> Self {
        self.config = config;
        self
    }

    pub fn force_create(mut self, force: bool) -> Self {
        self.force_create = force;
        self
    }
}

struct LiveInstance {
    generation: u64,
    element: Arc<dyn HostElement>,
    tracker: ViewportTracker,
}

/// The instance a forced re-create took over, held with its tracking
/// suspended until the native create settles.
struct Replaced {
    instance: LiveInstance,
    routes: Option<SavedRoutes>,
}

/// State shared by the plugin and every [`AMap`] handle it creates.
pub(crate) struct PluginShared {
    transport: Arc<dyn NativeTransport>,
    page: Arc<dyn HostPage>,
    settings: BridgeSettings,
    pub(crate) router: EventRouter,
    instances: Mutex<HashMap<String, LiveInstance>>,
    next_generation: AtomicU64,
}

impl PluginShared {
    fn instances(&self) -> MutexGuard<'_, HashMap<String, LiveInstance>> {
        self.instances.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forward a call and map transport failures.
    pub(crate) async fn invoke(&self, method: &str, args: Value) -> Result<Value> {
        debug!(method, "native call");
        self.transport.call(method, args).await.map_err(|e| {
            warn!(method, error = %e, "native call failed");
            BridgeError::from_transport(method, e)
        })
    }

    pub(crate) fn is_current(&self, map_id: &str, generation: u64) -> bool {
        self.instances()
            .get(map_id)
            .is_some_and(|i| i.generation == generation)
    }

    fn check_available(
        instances: &HashMap<String, LiveInstance>,
        map_id: &str,
        element: &Arc<dyn HostElement>,
        force_create: bool,
    ) -> Result<()> {
        if instances.contains_key(map_id) && !force_create {
            return Err(BridgeError::Validation(format!(
                "map `{map_id}` already exists; set force_create to replace it"
            )));
        }
        if let Some(owner) = element.data_attribute(INTERNAL_ID_ATTRIBUTE) {
            let hosts_other = owner != map_id
                && instances
                    .get(&owner)
                    .is_some_and(|i| Arc::ptr_eq(&i.element, element));
            if hosts_other {
                return Err(BridgeError::Validation(format!(
                    "element already hosts map `{owner}`"
                )));
            }
        }
        Ok(())
    }

    /// Tag the element, install tracking and routing, and record the
    /// instance. A live instance with the same id is taken out when
    /// `force_create` is set and handed back with its tracking suspended.
    fn attach(
        &self,
        map_id: &str,
        element: &Arc<dyn HostElement>,
        initial: Rect,
        force_create: bool,
        on_ready: Option<ReadyCallback>,
    ) -> Result<(u64, Option<Replaced>)> {
        let mut instances = self.instances();
        Self::check_available(&instances, map_id, element, force_create)?;

        element.set_data_attribute(INTERNAL_ID_ATTRIBUTE, map_id);
        let tracker = ViewportTracker::install(TrackerContext {
            map_id,
            element: Arc::clone(element),
            page: self.page.as_ref(),
            transport: Arc::clone(&self.transport),
            settings: &self.settings,
            initial,
            runtime: Handle::current(),
        });
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = instances.insert(
            map_id.to_string(),
            LiveInstance {
                generation,
                element: Arc::clone(element),
                tracker,
            },
        );

        let routes = self.router.swap_in(map_id);
        if let Some(on_ready) = on_ready {
            self.router.set_ready(map_id, on_ready);
        }
        let replaced = previous.map(|mut instance| {
            instance.tracker.suspend();
            Replaced { instance, routes }
        });
        drop(instances);

        Ok((generation, replaced))
    }

    /// Undo [`PluginShared::attach`] after the native create failed: drop
    /// the new generation and reinstate the instance it took over.
    fn roll_back(&self, map_id: &str, generation: u64, replaced: Option<Replaced>) {
        let removed = {
            let mut instances = self.instances();
            if !instances
                .get(map_id)
                .is_some_and(|i| i.generation == generation)
            {
                debug!(map_id, generation, "nothing to roll back, id taken over again");
                return;
            }
            let removed = instances.remove(map_id);
            match replaced {
                Some(Replaced {
                    mut instance,
                    routes,
                }) => {
                    instance
                        .element
                        .set_data_attribute(INTERNAL_ID_ATTRIBUTE, map_id);
                    instance.tracker.resume();
                    match routes {
                        Some(routes) => self.router.restore(map_id, routes),
                        None => self.router.register(map_id),
                    }
                    info!(
                        map_id,
                        generation = instance.generation,
                        "replacement failed, previous instance restored"
                    );
                    instances.insert(map_id.to_string(), instance);
                }
                None => {
                    self.router.remove_instance(map_id);
                }
            }
            removed
        };
        if let Some(mut instance) = removed {
            instance.tracker.teardown();
        }
    }

    /// Remove local state for one generation of an instance. Returns
    /// `false` if that generation is already gone.
    pub(crate) fn release(&self, map_id: &str, generation: u64) -> bool {
        let removed = {
            let mut instances = self.instances();
            match instances.get(map_id) {
                Some(i) if i.generation == generation => {
                    self.router.remove_instance(map_id);
                    instances.remove(map_id)
                }
                _ => None,
            }
        };
        match removed {
            Some(mut instance) => {
                instance.tracker.teardown();
                true
            }
            None => false,
        }
    }
}

/// Entry point of the bridge.
///
/// Cheap to clone; clones share the instance table and event routing.
#[derive(Clone)]
pub struct AMapPlugin {
    shared: Arc<PluginShared>,
}

impl AMapPlugin {
    pub fn new(
        transport: Arc<dyn NativeTransport>,
        page: Arc<dyn HostPage>,
        settings: BridgeSettings,
    ) -> Self {
        Self {
            shared: Arc::new(PluginShared {
                transport,
                page,
                settings,
                router: EventRouter::new(),
                instances: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.shared.settings
    }

    /// Report whether the privacy policy was shown. Call before `create`.
    pub async fn update_privacy_show(&self, is_contains: bool, is_show: bool) -> Result<()> {
        self.shared
            .invoke(
                methods::UPDATE_PRIVACY_SHOW,
                json!({ "isContains": is_contains, "isShow": is_show }),
            )
            .await
            .map(drop)
    }

    /// Report whether the user agreed to the privacy policy. Call before
    /// `create`.
    pub async fn update_privacy_agree(&self, is_agree: bool) -> Result<()> {
        self.shared
            .invoke(methods::UPDATE_PRIVACY_AGREE, json!({ "isAgree": is_agree }))
            .await
            .map(drop)
    }

    pub async fn set_terrain_enable(&self, enable: bool) -> Result<()> {
        self.shared
            .invoke(
                methods::SET_TERRAIN_ENABLE,
                json!({ "isTerrainEnable": enable }),
            )
            .await
            .map(drop)
    }

    pub async fn open_offline_map_activity(&self) -> Result<()> {
        self.shared
            .invoke(methods::OPEN_OFFLINE_MAP_ACTIVITY, json!({}))
            .await
            .map(drop)
    }

    /// Reverse-geocode a point through the native SDK.
    pub async fn get_from_location(&self, query: GeocodeQuery) -> Result<GeocodeResult> {
        let reply = self
            .shared
            .invoke(methods::GET_FROM_LOCATION, serde_json::to_value(query)?)
            .await?;
        Ok(serde_json::from_value(reply)?)
    }

    /// Create a native map under `options.element`.
    ///
    /// Measures the element (waiting for layout if needed), installs
    /// viewport tracking and event routing, waits the native settle delay,
    /// then asks the native side to create the map. `on_ready` runs once
    /// when the map reports `onMapReady`.
    ///
    /// If the native call fails, the local state is removed again. A forced
    /// re-create that fails leaves the instance it would have replaced live,
    /// so its handle can still destroy it.
    pub async fn create(
        &self,
        options: CreateOptions,
        on_ready: Option<ReadyCallback>,
    ) -> Result<AMap> {
        let CreateOptions {
            id,
            mut config,
            element,
            force_create,
        } = options;
        let element = element
            .ok_or_else(|| BridgeError::Validation("container element is required".into()))?;
        if id.trim().is_empty() {
            return Err(BridgeError::Validation("map id is required".into()));
        }
        let shared = &self.shared;
        PluginShared::check_available(&shared.instances(), &id, &element, force_create)?;

        let measurement = measure_bounds(element.as_ref(), &shared.settings.measure).await;
        config.apply_bounds(&measurement.rect, shared.page.device_pixel_ratio());

        let (generation, replaced) =
            shared.attach(&id, &element, measurement.rect, force_create, on_ready)?;

        tokio::time::sleep(shared.settings.timing.native_settle()).await;

        let args = json!({
            "id": id,
            "config": serde_json::to_value(&config)?,
            "forceCreate": force_create,
        });
        if let Err(err) = shared.invoke(methods::CREATE, args).await {
            shared.roll_back(&id, generation, replaced);
            return Err(err);
        }
        if let Some(mut replaced) = replaced {
            replaced.instance.tracker.teardown();
            debug!(map_id = %id, "previous instance replaced");
        }

        info!(
            map_id = %id,
            width = measurement.rect.width,
            height = measurement.rect.height,
            attempts = measurement.attempts,
            "map created"
        );
        Ok(AMap::new(id, element, Arc::clone(shared), generation))
    }

    /// Handle one inbound native event.
    ///
    /// Focus probes are answered directly; map events are routed to the
    /// instance named by their `mapId`. Returns how many callbacks ran.
    pub fn handle_event(&self, event: &NativeEvent) -> usize {
        if event.name == FOCUS_PROBE_EVENT {
            answer_focus_probe(
                self.shared.page.as_ref(),
                self.shared.transport.as_ref(),
                event,
            );
            return 0;
        }
        self.shared.router.dispatch(event)
    }

    /// Spawn a task feeding every event from `bus` to
    /// [`AMapPlugin::handle_event`]. The task ends when the bus closes.
    pub fn listen(&self, bus: &EventBus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        let plugin = self.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        plugin.handle_event(&event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "native event listener lagged, events dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!("native event bus closed");
                        break;
                    }
                }
            }
        })
    }

    /// Ids with local state, sorted. Includes instances whose native create
    /// is still in flight.
    pub fn live_instances(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.shared.instances().keys().cloned().collect();
        ids.sort();
        ids
    }
}
