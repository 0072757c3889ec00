//! Streaming service: publishes algo streams to the market

use std::sync::Arc;

use tracing::info;

use soa::{Connector, Service, ServiceListener, Shared, Store};
use types::errors::ServiceError;
use types::ids::ProductId;
use types::pricing::{AlgoStream, PriceStream};
use types::record::CsvRecord;

/// Publish-only connector. Streams go to the structured log.
#[derive(Debug, Default)]
pub struct StreamingConnector {
    published: u64,
}

impl StreamingConnector {
    pub fn published(&self) -> u64 {
        self.published
    }
}

impl Connector<PriceStream> for StreamingConnector {
    fn name(&self) -> &'static str {
        "StreamingConnector"
    }

    fn publish(&mut self, data: &PriceStream) -> Result<(), ServiceError> {
        self.published += 1;
        info!(stream = %data.fields().join(","), "Price stream published");
        Ok(())
    }
}

pub struct StreamingService {
    store: Store<PriceStream>,
    connector: StreamingConnector,
}

impl StreamingService {
    pub fn new() -> Self {
        info!("StreamingService initialized");
        Self {
            store: Store::new("streaming"),
            connector: StreamingConnector::default(),
        }
    }

    /// Publish a stream through the connector, store it and fan it out.
    pub fn publish_price(&mut self, stream: PriceStream) -> Result<(), ServiceError> {
        self.connector.publish(&stream)?;
        self.store.publish(stream)
    }

    pub fn published(&self) -> u64 {
        self.connector.published()
    }
}

impl Default for StreamingService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service for StreamingService {
    type Key = ProductId;
    type Value = PriceStream;

    fn get_data(&self, key: &ProductId) -> Result<&PriceStream, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: PriceStream) -> Result<(), ServiceError> {
        self.publish_price(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<PriceStream>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<PriceStream>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<PriceStream> {
        &mut self.connector
    }
}

/// Forwards algo streams to the streaming service.
pub struct AlgoStreamingToStreamingListener {
    service: Shared<StreamingService>,
}

impl AlgoStreamingToStreamingListener {
    pub fn new(service: Shared<StreamingService>) -> Self {
        Self { service }
    }
}

impl ServiceListener<AlgoStream> for AlgoStreamingToStreamingListener {
    fn process_add(&self, data: &AlgoStream) -> Result<(), ServiceError> {
        self.service.lock().publish_price(data.price_stream.clone())
    }

    fn process_remove(&self, _data: &AlgoStream) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &AlgoStream) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo_streaming::{AlgoStreamingService, PricingToAlgoStreamingListener};
    use rust_decimal::Decimal;
    use types::pricing::Price;
    use types::product::SecurityMaster;

    #[test]
    fn test_algo_chain_reaches_streaming() {
        let streaming = soa::shared(StreamingService::new());
        let algo = soa::shared(AlgoStreamingService::new());
        algo.lock()
            .add_listener(Arc::new(AlgoStreamingToStreamingListener::new(Arc::clone(
                &streaming,
            ))));
        let listener = PricingToAlgoStreamingListener::new(Arc::clone(&algo));

        let bond = SecurityMaster::treasuries()
            .lookup("91282CFY2")
            .unwrap()
            .clone();
        let price = Price::new(bond, Decimal::from(100), Decimal::new(78125, 7));
        listener.process_add(&price).unwrap();

        let streaming = streaming.lock();
        assert_eq!(streaming.published(), 1);
        let stream = streaming.get_data(&ProductId::new("91282CFY2")).unwrap();
        assert_eq!(stream.bid_order.visible_quantity, 1_000_000);
    }

    #[test]
    fn test_subscribe_unsupported() {
        let mut service = StreamingService::new();
        assert!(matches!(
            soa::subscribe(&mut service, "x\n".as_bytes()),
            Err(ServiceError::Config { .. })
        ));
    }
}
