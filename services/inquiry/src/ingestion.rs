//! Inquiry connector over `inquiries.txt`
//! (`inquiryId,productId,side,quantity,price,state`).
//!
//! Publishing a value through the connector sends a quote back to the
//! customer.

use std::sync::Arc;

use tracing::info;

use soa::{Connector, Fields};
use types::errors::ServiceError;
use types::ids::InquiryId;
use types::inquiry::Inquiry;
use types::product::{Product, SecurityMaster};

/// Inquiry ids carry this prefix.
pub const INQUIRY_PREFIX: &str = "INQ";

pub struct InquiryConnector {
    master: Arc<SecurityMaster>,
    quotes_sent: u64,
}

impl InquiryConnector {
    pub fn new(master: Arc<SecurityMaster>) -> Self {
        Self {
            master,
            quotes_sent: 0,
        }
    }

    pub fn quotes_sent(&self) -> u64 {
        self.quotes_sent
    }
}

impl Connector<Inquiry> for InquiryConnector {
    fn name(&self) -> &'static str {
        "InquiryConnector"
    }

    fn publish(&mut self, data: &Inquiry) -> Result<(), ServiceError> {
        self.quotes_sent += 1;
        info!(
            inquiry_id = %data.inquiry_id,
            product = %data.product.product_id(),
            price = %types::numeric::format_fractional(data.price),
            state = %data.state,
            "Quote sent"
        );
        Ok(())
    }

    fn decode(&mut self, fields: &Fields<'_>) -> Result<Option<Inquiry>, ServiceError> {
        fields.expect_len(6)?;

        let inquiry_id = fields.str(0)?;
        if !inquiry_id.starts_with(INQUIRY_PREFIX) {
            return Err(fields.error(format!("invalid inquiry id '{}'", inquiry_id)));
        }
        let product = self.master.lookup(fields.str(1)?)?.clone();

        Ok(Some(Inquiry {
            inquiry_id: InquiryId::new(inquiry_id),
            product,
            side: fields.parse(2, "side")?,
            quantity: fields.parse(3, "quantity")?,
            price: fields.price(4)?,
            state: fields.parse(5, "state")?,
        }))
    }
}
