//! Customer inquiry types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::InquiryId;
use crate::numeric::format_fractional;
use crate::product::{Bond, Product};
use crate::record::{CsvRecord, Keyed};
use crate::trade::Side;

/// Inquiry lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryState {
    Received,
    Quoted,
    Done,
    Rejected,
    CustomerRejected,
}

impl InquiryState {
    /// No further transitions once done or rejected
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InquiryState::Done | InquiryState::Rejected | InquiryState::CustomerRejected
        )
    }
}

impl fmt::Display for InquiryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InquiryState::Received => "RECEIVED",
            InquiryState::Quoted => "QUOTED",
            InquiryState::Done => "DONE",
            InquiryState::Rejected => "REJECTED",
            InquiryState::CustomerRejected => "CUSTOMER_REJECTED",
        };
        f.write_str(s)
    }
}

impl FromStr for InquiryState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RECEIVED" => Ok(InquiryState::Received),
            "QUOTED" => Ok(InquiryState::Quoted),
            "DONE" => Ok(InquiryState::Done),
            "REJECTED" => Ok(InquiryState::Rejected),
            "CUSTOMER_REJECTED" => Ok(InquiryState::CustomerRejected),
            other => Err(format!("unknown inquiry state '{}'", other)),
        }
    }
}

/// Customer request for a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry<P = Bond> {
    pub inquiry_id: InquiryId,
    pub product: P,
    pub side: Side,
    pub quantity: i64,
    pub price: Decimal,
    pub state: InquiryState,
}

impl<P: Product> Keyed for Inquiry<P> {
    type Key = InquiryId;

    fn key(&self) -> InquiryId {
        self.inquiry_id.clone()
    }
}

impl<P: Product> CsvRecord for Inquiry<P> {
    fn fields(&self) -> Vec<String> {
        vec![
            self.inquiry_id.to_string(),
            self.product.product_id().to_string(),
            self.side.to_string(),
            self.quantity.to_string(),
            format_fractional(self.price),
            self.state.to_string(),
        ]
    }
}
