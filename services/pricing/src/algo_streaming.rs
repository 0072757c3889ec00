//! Algorithmic two-way quote generation
//!
//! For each incoming price the algo quotes
//! - bid `mid - spread / 2.2` and offer `mid + spread / 2.0`
//! - visible size alternating 1MM / 2MM per published stream
//! - hidden size twice the visible size
//!
//! The alternation counter is per service instance and shared by every
//! product.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use soa::{Connector, NoConnector, Service, ServiceListener, Shared, Store};
use types::errors::ServiceError;
use types::ids::ProductId;
use types::order::PricingSide;
use types::pricing::{AlgoStream, Price, PriceStream, PriceStreamOrder};
use types::product::Product;

const BASE_VISIBLE_QUANTITY: i64 = 1_000_000;

/// Builds and stores algo streams from prices.
pub struct AlgoStreamingService {
    store: Store<AlgoStream>,
    connector: NoConnector,
    publish_count: u64,
}

impl AlgoStreamingService {
    pub fn new() -> Self {
        info!("AlgoStreamingService initialized");
        Self {
            store: Store::new("algo-streaming"),
            connector: NoConnector,
            publish_count: 0,
        }
    }

    /// Number of streams generated so far.
    pub fn publish_count(&self) -> u64 {
        self.publish_count
    }

    /// Derive a two-way stream from `price`, store it and fan it out.
    pub fn publish_price(&mut self, price: &Price) -> Result<(), ServiceError> {
        let bid_price = price.mid - price.bid_offer_spread / Decimal::new(22, 1);
        let offer_price = price.mid + price.bid_offer_spread / Decimal::TWO;

        let visible = if self.publish_count % 2 == 0 {
            BASE_VISIBLE_QUANTITY
        } else {
            BASE_VISIBLE_QUANTITY * 2
        };
        let hidden = visible * 2;
        self.publish_count += 1;

        debug!(
            product = %price.product.product_id(),
            count = self.publish_count,
            visible,
            "Algo stream generated"
        );

        let stream = PriceStream::new(
            price.product.clone(),
            PriceStreamOrder::new(bid_price, visible, hidden, PricingSide::BID),
            PriceStreamOrder::new(offer_price, visible, hidden, PricingSide::OFFER),
        );
        self.on_message(AlgoStream::new(stream))
    }
}

impl Default for AlgoStreamingService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for AlgoStreamingService {
    type Key = ProductId;
    type Value = AlgoStream;

    fn get_data(&self, key: &ProductId) -> Result<&AlgoStream, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: AlgoStream) -> Result<(), ServiceError> {
        self.store.publish(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<AlgoStream>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<AlgoStream>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<AlgoStream> {
        &mut self.connector
    }
}

/// Feeds pricing updates into the algo.
pub struct PricingToAlgoStreamingListener {
    service: Shared<AlgoStreamingService>,
}

impl PricingToAlgoStreamingListener {
    pub fn new(service: Shared<AlgoStreamingService>) -> Self {
        Self { service }
    }
}

impl ServiceListener<Price> for PricingToAlgoStreamingListener {
    fn process_add(&self, data: &Price) -> Result<(), ServiceError> {
        self.service.lock().publish_price(data)
    }

    fn process_remove(&self, _data: &Price) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &Price) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use types::product::{Bond, SecurityMaster};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bond(cusip: &str) -> Bond {
        SecurityMaster::treasuries().lookup(cusip).unwrap().clone()
    }

    #[test]
    fn test_quote_prices() {
        let mut service = AlgoStreamingService::new();
        let price = Price::new(bond("91282CFX4"), dec("100"), dec("0.011"));
        service.publish_price(&price).unwrap();

        let stream = &service
            .get_data(&ProductId::new("91282CFX4"))
            .unwrap()
            .price_stream;
        assert_eq!(stream.bid_order.price, dec("99.995"));
        assert_eq!(stream.offer_order.price, dec("100.0055"));
        assert_eq!(stream.bid_order.side, PricingSide::BID);
        assert_eq!(stream.offer_order.side, PricingSide::OFFER);
    }

    #[test]
    fn test_visible_size_alternates_across_products() {
        let mut service = AlgoStreamingService::new();
        let mut visible = Vec::new();

        for cusip in ["91282CFX4", "91282CFW6", "91282CFX4", "912810TL2"] {
            let price = Price::new(bond(cusip), dec("99.5"), dec("0.0078125"));
            service.publish_price(&price).unwrap();
            let stream = &service
                .get_data(&ProductId::new(cusip))
                .unwrap()
                .price_stream;
            assert_eq!(
                stream.bid_order.hidden_quantity,
                2 * stream.bid_order.visible_quantity
            );
            assert_eq!(
                stream.offer_order.visible_quantity,
                stream.bid_order.visible_quantity
            );
            visible.push(stream.bid_order.visible_quantity);
        }

        assert_eq!(visible, vec![1_000_000, 2_000_000, 1_000_000, 2_000_000]);
        assert_eq!(service.publish_count(), 4);
    }

    #[test]
    fn test_listener_drives_service() {
        let service = soa::shared(AlgoStreamingService::new());
        let listener = PricingToAlgoStreamingListener::new(Arc::clone(&service));

        let price = Price::new(bond("91282CFZ9"), dec("99"), dec("0.0078125"));
        listener.process_add(&price).unwrap();
        listener.process_update(&price).unwrap();
        listener.process_remove(&price).unwrap();

        assert_eq!(service.lock().publish_count(), 1);
    }
}
