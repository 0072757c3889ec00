//! GUI snapshot publication with a time throttle
//!
//! Each price is stored, but a line is written to the GUI file only when
//! at least `throttle_millis` have passed since the last written line.
//! Faster updates are dropped, never queued. A clock that steps backwards
//! past the last written line reopens the throttle.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use soa::{
    format_timestamp, Clock, Connector, CsvFileSink, Service, ServiceListener, Shared, Store,
};
use types::errors::ServiceError;
use types::ids::ProductId;
use types::pricing::Price;
use types::product::Product;
use types::record::CsvRecord;

/// Configuration for the GUI publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Minimum gap between written lines.
    pub throttle_millis: i64,
    pub output_path: PathBuf,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            throttle_millis: 300,
            output_path: PathBuf::from("gui.txt"),
        }
    }
}

/// Appends `timestamp,productId,mid,spread` lines.
pub struct GuiConnector {
    sink: CsvFileSink,
    clock: Arc<dyn Clock>,
}

impl GuiConnector {
    pub fn new(path: PathBuf, clock: Arc<dyn Clock>) -> Self {
        Self {
            sink: CsvFileSink::new(path),
            clock,
        }
    }
}

impl Connector<Price> for GuiConnector {
    fn name(&self) -> &'static str {
        "GuiConnector"
    }

    fn publish(&mut self, data: &Price) -> Result<(), ServiceError> {
        let mut line = vec![format_timestamp(self.clock.now_millis())];
        line.extend(data.fields());
        self.sink.append(&line)
    }
}

pub struct GuiService {
    throttle_millis: i64,
    last_published_millis: Option<i64>,
    store: Store<Price>,
    connector: GuiConnector,
    clock: Arc<dyn Clock>,
    published: u64,
    dropped: u64,
}

impl GuiService {
    pub fn new(config: GuiConfig, clock: Arc<dyn Clock>) -> Self {
        info!(
            throttle_millis = config.throttle_millis,
            output = %config.output_path.display(),
            "GuiService initialized"
        );

        Self {
            throttle_millis: config.throttle_millis,
            last_published_millis: None,
            store: Store::new("gui"),
            connector: GuiConnector::new(config.output_path, Arc::clone(&clock)),
            clock,
            published: 0,
            dropped: 0,
        }
    }

    pub fn published(&self) -> u64 {
        self.published
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn throttle_open(&self, now: i64) -> bool {
        match self.last_published_millis {
            None => true,
            Some(last) => now < last || now - last >= self.throttle_millis,
        }
    }
}

impl Service for GuiService {
    type Key = ProductId;
    type Value = Price;

    fn get_data(&self, key: &ProductId) -> Result<&Price, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: Price) -> Result<(), ServiceError> {
        let now = self.clock.now_millis();

        if self.throttle_open(now) {
            self.connector.publish(&data)?;
            self.last_published_millis = Some(now);
            self.published += 1;
            debug!(product = %data.product.product_id(), now, "GUI line written");
        } else {
            self.dropped += 1;
            warn!(
                product = %data.product.product_id(),
                now,
                last = self.last_published_millis,
                "GUI update throttled"
            );
        }

        self.store.publish(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Price>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Price>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<Price> {
        &mut self.connector
    }
}

/// Feeds pricing updates to the GUI.
pub struct PricingToGuiListener {
    service: Shared<GuiService>,
}

impl PricingToGuiListener {
    pub fn new(service: Shared<GuiService>) -> Self {
        Self { service }
    }
}

impl ServiceListener<Price> for PricingToGuiListener {
    fn process_add(&self, data: &Price) -> Result<(), ServiceError> {
        self.service.lock().on_message(data.clone())
    }

    fn process_remove(&self, _data: &Price) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &Price) -> Result<(), ServiceError> {
        Ok(())
    }
}
