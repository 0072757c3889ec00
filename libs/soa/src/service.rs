//! Service trait and the keyed store behind every service

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use types::errors::ServiceError;
use types::record::Keyed;

use crate::connector::Connector;
use crate::listener::{notify, ServiceListener};

/// A keyed store of the latest value per key with listener fan-out.
///
/// `on_message` is the entry point for connectors and upstream listeners:
/// it stores the value (last write wins) and then calls `process_add` on
/// every listener, in registration order, before returning.
pub trait Service {
    type Key: Ord + Clone + fmt::Display;
    type Value;

    /// Stored value for `key`, or `NotFound`
    fn get_data(&self, key: &Self::Key) -> Result<&Self::Value, ServiceError>;

    fn on_message(&mut self, data: Self::Value) -> Result<(), ServiceError>;

    /// Append a listener. There is no removal and no duplicate detection.
    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Self::Value>>);

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Self::Value>>];

    fn connector(&mut self) -> &mut dyn Connector<Self::Value>;
}

/// Reusable storage and listener list for a service
pub struct Store<V: Keyed> {
    name: &'static str,
    data: BTreeMap<V::Key, V>,
    listeners: Vec<Arc<dyn ServiceListener<V>>>,
}

impl<V: Keyed> Store<V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            data: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &V::Key) -> Result<&V, ServiceError> {
        self.data
            .get(key)
            .ok_or_else(|| ServiceError::not_found(key))
    }

    pub fn get_mut(&mut self, key: &V::Key) -> Result<&mut V, ServiceError> {
        self.data
            .get_mut(key)
            .ok_or_else(|| ServiceError::not_found(key))
    }

    /// Store without notifying anyone. Returns the stored value.
    pub fn insert(&mut self, value: V) -> &V {
        match self.data.entry(value.key()) {
            Entry::Occupied(mut entry) => {
                entry.insert(value);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(value),
        }
    }

    /// Store the value, then fan it out to every listener.
    pub fn publish(&mut self, value: V) -> Result<(), ServiceError> {
        let key = value.key();
        debug!(service = self.name, key = %key, "Storing update");

        let stored = match self.data.entry(key) {
            Entry::Occupied(mut entry) => {
                entry.insert(value);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(value),
        };
        notify(&self.listeners, stored)
    }

    /// Fan out an already stored value again (after an in-place update).
    pub fn republish(&self, key: &V::Key) -> Result<(), ServiceError> {
        let stored = self.get(key)?;
        notify(&self.listeners, stored)
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ServiceListener<V>>) {
        self.listeners.push(listener);
    }

    pub fn listeners(&self) -> &[Arc<dyn ServiceListener<V>>] {
        &self.listeners
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.data.values()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct Quote {
        symbol: &'static str,
        level: i64,
    }

    impl Keyed for Quote {
        type Key = &'static str;

        fn key(&self) -> &'static str {
            self.symbol
        }
    }

    struct Tape(Arc<Mutex<Vec<String>>>, &'static str);

    impl ServiceListener<Quote> for Tape {
        fn process_add(&self, data: &Quote) -> Result<(), ServiceError> {
            self.0.lock().push(format!("{}:{}={}", self.1, data.symbol, data.level));
            Ok(())
        }

        fn process_remove(&self, _data: &Quote) -> Result<(), ServiceError> {
            Ok(())
        }

        fn process_update(&self, _data: &Quote) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store: Store<Quote> = Store::new("quotes");
        assert_eq!(
            store.get(&"2Y").unwrap_err(),
            ServiceError::NotFound {
                key: "2Y".to_string()
            }
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = Store::new("quotes");
        store.publish(Quote { symbol: "2Y", level: 1 }).unwrap();
        store.publish(Quote { symbol: "2Y", level: 2 }).unwrap();
        store.publish(Quote { symbol: "5Y", level: 3 }).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&"2Y").unwrap().level, 2);
    }

    #[test]
    fn test_listeners_notified_in_order() {
        let tape = Arc::new(Mutex::new(Vec::new()));
        let mut store = Store::new("quotes");
        for name in ["L1", "L2", "L3"] {
            store.add_listener(Arc::new(Tape(Arc::clone(&tape), name)));
        }

        store.publish(Quote { symbol: "10Y", level: 9 }).unwrap();

        assert_eq!(store.listeners().len(), 3);
        assert_eq!(
            *tape.lock(),
            vec!["L1:10Y=9", "L2:10Y=9", "L3:10Y=9"]
        );
    }

    #[test]
    fn test_insert_does_not_notify() {
        let tape = Arc::new(Mutex::new(Vec::new()));
        let mut store = Store::new("quotes");
        store.add_listener(Arc::new(Tape(Arc::clone(&tape), "L1")));

        store.insert(Quote { symbol: "7Y", level: 4 });
        assert!(tape.lock().is_empty());

        store.get_mut(&"7Y").unwrap().level = 5;
        store.republish(&"7Y").unwrap();
        assert_eq!(*tape.lock(), vec!["L1:7Y=5"]);
    }
}
