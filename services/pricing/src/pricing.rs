//! Pricing service fed by `prices.txt` (`productId,bid,offer`)

use std::sync::Arc;

use tracing::info;

use soa::{Connector, Fields, Service, ServiceListener, Store};
use types::errors::ServiceError;
use types::ids::ProductId;
use types::pricing::Price;
use types::product::SecurityMaster;

/// Decodes two-sided quotes into mid/spread prices.
pub struct PricingConnector {
    master: Arc<SecurityMaster>,
}

impl PricingConnector {
    pub fn new(master: Arc<SecurityMaster>) -> Self {
        Self { master }
    }
}

impl Connector<Price> for PricingConnector {
    fn name(&self) -> &'static str {
        "PricingConnector"
    }

    fn decode(&mut self, fields: &Fields<'_>) -> Result<Option<Price>, ServiceError> {
        fields.expect_len(3)?;

        let product = self.master.lookup(fields.str(0)?)?.clone();
        let bid = fields.price(1)?;
        let offer = fields.price(2)?;

        Ok(Some(Price::from_bid_offer(product, bid, offer)))
    }
}

/// Pass-through store of the latest price per product.
pub struct PricingService {
    store: Store<Price>,
    connector: PricingConnector,
}

impl PricingService {
    pub fn new(master: Arc<SecurityMaster>) -> Self {
        info!(products = master.len(), "PricingService initialized");
        Self {
            store: Store::new("pricing"),
            connector: PricingConnector::new(master),
        }
    }
}

impl Service for PricingService {
    type Key = ProductId;
    type Value = Price;

    fn get_data(&self, key: &ProductId) -> Result<&Price, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: Price) -> Result<(), ServiceError> {
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
