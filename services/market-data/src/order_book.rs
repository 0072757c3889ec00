//! Market data service: the latest order book per product
//!
//! Books are replaced wholesale on each snapshot. Best bid/offer and
//! depth aggregation are computed on demand from the stored book.

use std::sync::Arc;

use tracing::{debug, info};

use soa::{Connector, Service, ServiceListener, Store};
use types::errors::ServiceError;
use types::ids::ProductId;
use types::order::{BidOffer, OrderBook};
use types::product::SecurityMaster;

use crate::ingestion::{MarketDataConfig, MarketDataConnector};

/// Keyed store of order books fed by `marketdata.txt`.
pub struct MarketDataService {
    config: MarketDataConfig,
    store: Store<OrderBook>,
    connector: MarketDataConnector,
}

impl MarketDataService {
    pub fn new(config: MarketDataConfig, master: Arc<SecurityMaster>) -> Self {
        info!(book_depth = config.book_depth, "MarketDataService initialized");

        let connector = MarketDataConnector::new(&config, master);
        Self {
            config,
            store: Store::new("market-data"),
            connector,
        }
    }

    pub fn with_defaults(master: Arc<SecurityMaster>) -> Self {
        Self::new(MarketDataConfig::default(), master)
    }

    /// Highest bid and lowest offer of the stored book.
    pub fn get_best_bid_offer(&self, product_id: &ProductId) -> Result<BidOffer, ServiceError> {
        self.store.get(product_id)?.best_bid_offer()
    }

    /// Stored book collapsed to one order per distinct price per side.
    pub fn aggregate_depth(&self, product_id: &ProductId) -> Result<OrderBook, ServiceError> {
        let book = self.store.get(product_id)?;
        let aggregated = book.aggregate_depth()?;
        debug!(
            product = %product_id,
            bid_levels = aggregated.bid_stack().len(),
            offer_levels = aggregated.offer_stack().len(),
            "Depth aggregated"
        );
        Ok(aggregated)
    }

    pub fn order_book_depth(&self) -> usize {
        self.config.book_depth
    }

    pub fn books_built(&self) -> u64 {
        self.connector.books_built()
    }
}

impl Service for MarketDataService {
    type Key = ProductId;
    type Value = OrderBook;

    fn get_data(&self, key: &ProductId) -> Result<&OrderBook, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: OrderBook) -> Result<(), ServiceError> {
        self.store.publish(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<OrderBook>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<OrderBook>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<OrderBook> {
        &mut self.connector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use types::order::Order;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_service(depth: usize) -> MarketDataService {
        MarketDataService::new(
            MarketDataConfig { book_depth: depth },
            Arc::new(SecurityMaster::treasuries()),
        )
    }

    struct BookCounter(Arc<Mutex<Vec<String>>>);

    impl ServiceListener<OrderBook> for BookCounter {
        fn process_add(&self, data: &OrderBook) -> Result<(), ServiceError> {
            self.0.lock().push(data.bid_stack().len().to_string());
            Ok(())
        }

        fn process_remove(&self, _data: &OrderBook) -> Result<(), ServiceError> {
            Ok(())
        }

        fn process_update(&self, _data: &OrderBook) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    #[test]
    fn test_subscribe_builds_books() {
        let mut service = make_service(2);
        let seen = Arc::new(Mutex::new(Vec::new()));
        service.add_listener(Arc::new(BookCounter(Arc::clone(&seen))));

        let input = "\
91282CFX4,99-316,1000000,BID
91282CFX4,100-002,1000000,OFFER
91282CFX4,99-314,2000000,BID
91282CFX4,100-004,2000000,OFFER
91282CFW6,99-316,1000000,BID
91282CFW6,100-002,1000000,OFFER
91282CFW6,99-316,2000000,BID
91282CFW6,100-000,2000000,OFFER
";
        let delivered = soa::subscribe(&mut service, input.as_bytes()).unwrap();

        assert_eq!(delivered, 2);
        assert_eq!(service.books_built(), 2);
        assert_eq!(*seen.lock(), vec!["2", "2"]);

        let bbo = service
            .get_best_bid_offer(&ProductId::new("91282CFX4"))
            .unwrap();
        assert_eq!(bbo.bid.price, dec("99.9921875"));
        assert_eq!(bbo.offer.price, dec("100.0078125"));

        let depth = service
            .aggregate_depth(&ProductId::new("91282CFW6"))
            .unwrap();
        assert_eq!(
            depth.bid_stack(),
            &[Order::bid(dec("99.9921875"), 3_000_000)]
        );
        assert_eq!(depth.offer_stack().len(), 2);
        assert_eq!(depth.offer_stack()[0].price, dec("100.0"));
    }

    #[test]
    fn test_unknown_product_not_found() {
        let service = make_service(10);
        assert!(matches!(
            service.get_best_bid_offer(&ProductId::new("91282CFX4")),
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            service.aggregate_depth(&ProductId::new("91282CFX4")),
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_snapshot_replaces_book() {
        let mut service = make_service(1);
        let input = "\
91282CFZ9,99-000,1,BID
91282CFZ9,99-010,1,OFFER
91282CFZ9,99-020,5,BID
91282CFZ9,99-030,5,OFFER
";
        soa::subscribe(&mut service, input.as_bytes()).unwrap();

        let book = service.get_data(&ProductId::new("91282CFZ9")).unwrap();
        assert_eq!(book.bid_stack(), &[Order::bid(dec("99.0625"), 5)]);
    }

    #[test]
    fn test_order_book_depth() {
        assert_eq!(make_service(10).order_book_depth(), 10);
        assert_eq!(
            MarketDataService::with_defaults(Arc::new(SecurityMaster::treasuries()))
                .order_book_depth(),
            10
        );
    }
}
