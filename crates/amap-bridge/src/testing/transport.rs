use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use amap_common::TransportError;

use crate::transport::{methods, NativeTransport};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One call seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub args: Value,
    /// Sent with `post` rather than `call`.
    pub posted: bool,
}

#[derive(Default)]
struct Registry {
    maps: HashSet<String>,
    log: Vec<String>,
}

/// Transport that records every call and answers from a script.
///
/// By default every call resolves with `null`. With
/// [`RecordingTransport::with_native_registry`] it also keeps the set of
/// native map ids the way the plugin does: `create` for a live id resolves
/// without recreating unless `forceCreate` is set, and `destroy` for an
/// unknown id is rejected with "map not found".
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    failures: Mutex<HashMap<String, TransportError>>,
    responses: Mutex<HashMap<String, Value>>,
    registry: Option<Mutex<Registry>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_native_registry() -> Self {
        Self {
            registry: Some(Mutex::new(Registry::default())),
            ..Self::default()
        }
    }

    /// Make every later call to `method` fail with `err`.
    pub fn fail(&self, method: &str, err: TransportError) {
        lock(&self.failures).insert(method.to_string(), err);
    }

    pub fn clear_failure(&self, method: &str) {
        lock(&self.failures).remove(method);
    }

    /// Reply to `method` with `value` instead of `null`.
    pub fn respond(&self, method: &str, value: Value) {
        lock(&self.responses).insert(method.to_string(), value);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Method names in call order.
    pub fn methods(&self) -> Vec<String> {
        lock(&self.calls).iter().map(|c| c.method.clone()).collect()
    }

    /// Arguments of every call to `method`, in order.
    pub fn args_for(&self, method: &str) -> Vec<Value> {
        lock(&self.calls)
            .iter()
            .filter(|c| c.method == method)
            .map(|c| c.args.clone())
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.method == method).count()
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }

    /// Ids the emulated native side currently holds.
    pub fn native_maps(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .registry
            .as_ref()
            .map(|r| lock(r).maps.iter().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// Native-side create/destroy actions, e.g. `"create m1"`.
    pub fn native_log(&self) -> Vec<String> {
        self.registry
            .as_ref()
            .map(|r| lock(r).log.clone())
            .unwrap_or_default()
    }

    fn record(&self, method: &str, args: &Value, posted: bool) {
        lock(&self.calls).push(RecordedCall {
            method: method.to_string(),
            args: args.clone(),
            posted,
        });
    }

    fn apply_registry(&self, method: &str, args: &Value) -> Result<(), TransportError> {
        let Some(registry) = &self.registry else {
            return Ok(());
        };
        let id = args
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let mut registry = lock(registry);

        match method {
            methods::CREATE => {
                let force = args
                    .get("forceCreate")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                if registry.maps.contains(&id) {
                    if !force {
                        return Ok(());
                    }
                    registry.log.push(format!("destroy {id}"));
                }
                registry.maps.insert(id.clone());
                registry.log.push(format!("create {id}"));
                Ok(())
            }
            methods::DESTROY => {
                if registry.maps.remove(&id) {
                    registry.log.push(format!("destroy {id}"));
                    Ok(())
                } else {
                    Err(TransportError::rejected("map not found"))
                }
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl NativeTransport for RecordingTransport {
    async fn call(&self, method: &str, args: Value) -> Result<Value, TransportError> {
        self.record(method, &args, false);

        if let Some(err) = lock(&self.failures).get(method).cloned() {
            return Err(err);
        }
        self.apply_registry(method, &args)?;

        Ok(lock(&self.responses)
            .get(method)
            .cloned()
            .unwrap_or(Value::Null))
    }

    fn post(&self, method: &str, args: Value) {
        self.record(method, &args, true);
    }
}
