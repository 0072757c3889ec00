//! Inquiry lifecycle service

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use soa::{Connector, Service, ServiceListener, Store};
use types::errors::ServiceError;
use types::ids::InquiryId;
use types::inquiry::{Inquiry, InquiryState};
use types::product::SecurityMaster;

use crate::ingestion::InquiryConnector;

/// Latest state of every inquiry, keyed by inquiry id.
pub struct InquiryService {
    store: Store<Inquiry>,
    connector: InquiryConnector,
}

impl InquiryService {
    pub fn new(master: Arc<SecurityMaster>) -> Self {
        info!("InquiryService initialized");
        Self {
            store: Store::new("inquiry"),
            connector: InquiryConnector::new(master),
        }
    }

    /// Re-quote a stored inquiry at `price` and fan it out.
    pub fn send_quote(
        &mut self,
        inquiry_id: &InquiryId,
        price: Decimal,
    ) -> Result<(), ServiceError> {
        let inquiry = self.store.get_mut(inquiry_id)?;
        inquiry.price = price;
        debug!(inquiry_id = %inquiry_id, %price, "Quote updated");
        self.store.republish(inquiry_id)
    }

    /// Move a stored inquiry to REJECTED and fan it out.
    pub fn reject_inquiry(&mut self, inquiry_id: &InquiryId) -> Result<(), ServiceError> {
        let inquiry = self.store.get_mut(inquiry_id)?;
        inquiry.state = InquiryState::Rejected;
        warn!(inquiry_id = %inquiry_id, "Inquiry rejected");
        self.store.republish(inquiry_id)
    }

    pub fn quotes_sent(&self) -> u64 {
        self.connector.quotes_sent()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Service for InquiryService {
    type Key = InquiryId;
    type Value = Inquiry;

    fn get_data(&self, key: &InquiryId) -> Result<&Inquiry, ServiceError> {
        self.store.get(key)
    }

    /// RECEIVED inquiries are quoted through the connector, then completed.
    /// Terminal inquiries are stored as they are.
    fn on_message(&mut self, mut data: Inquiry) -> Result<(), ServiceError> {
        if data.state == InquiryState::Received {
            data.state = InquiryState::Quoted;
            self.connector.publish(&data)?;
        }
        if data.state == InquiryState::Quoted {
            data.state = InquiryState::Done;
        }

        debug!(inquiry_id = %data.inquiry_id, state = %data.state, "Inquiry processed");
        self.store.publish(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Inquiry>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Inquiry>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<Inquiry> {
        &mut self.connector
    }
}
