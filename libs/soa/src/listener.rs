//! Listener registration and fan-out

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

use types::errors::{ListenerFailure, ServiceError};

/// Callback interface a service invokes on every registered listener.
///
/// The value is borrowed for the duration of the call only.
pub trait ServiceListener<V>: Send + Sync {
    fn process_add(&self, data: &V) -> Result<(), ServiceError>;

    fn process_remove(&self, data: &V) -> Result<(), ServiceError>;

    fn process_update(&self, data: &V) -> Result<(), ServiceError>;
}

/// Handle through which listeners reach their downstream service
pub type Shared<S> = Arc<Mutex<S>>;

pub fn shared<S>(service: S) -> Shared<S> {
    Arc::new(Mutex::new(service))
}

/// Invoke `process_add` on every listener in registration order.
///
/// A failing listener does not stop the ones after it; all failures are
/// returned together as `ServiceError::FanOut`.
pub fn notify<V>(listeners: &[Arc<dyn ServiceListener<V>>], data: &V) -> Result<(), ServiceError> {
    let mut failures = Vec::new();

    for (index, listener) in listeners.iter().enumerate() {
        if let Err(error) = listener.process_add(data) {
            warn!(listener = index, error = %error, "Listener failed during fan-out");
            failures.push(ListenerFailure { index, error });
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::FanOut(failures))
    }
}
