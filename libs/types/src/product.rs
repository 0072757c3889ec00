//! Products and the security master
//!
//! A `Product` is anything a service can key on. Treasuries are `Bond`s;
//! risk buckets (`BucketedSector`) are products too.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::ServiceError;
use crate::ids::ProductId;

/// Anything with a product identifier
pub trait Product: Clone + fmt::Debug + Send + Sync {
    fn product_id(&self) -> &ProductId;
}

/// US Treasury note or bond
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    product_id: ProductId,
    ticker: String,
    coupon: Decimal,
    maturity: NaiveDate,
    tenor_years: u32,
}

impl Bond {
    pub fn new(
        product_id: ProductId,
        tenor_years: u32,
        coupon: Decimal,
        maturity: NaiveDate,
    ) -> Self {
        Self {
            product_id,
            ticker: format!("US{}Y", tenor_years),
            coupon,
            maturity,
            tenor_years,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn coupon(&self) -> Decimal {
        self.coupon
    }

    pub fn maturity(&self) -> NaiveDate {
        self.maturity
    }

    pub fn tenor_years(&self) -> u32 {
        self.tenor_years
    }
}

impl Product for Bond {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.product_id, self.ticker, self.coupon, self.maturity
        )
    }
}

/// On-the-run Treasury curve: (tenor, CUSIP, coupon in 1e-5 units, maturity).
const ON_THE_RUN: [(u32, &str, i64, (i32, u32, u32)); 7] = [
    (2, "91282CFX4", 4500, (2024, 11, 30)),
    (3, "91282CFW6", 4000, (2025, 11, 15)),
    (5, "91282CFZ9", 3875, (2027, 11, 30)),
    (7, "91282CFY2", 3875, (2029, 11, 30)),
    (10, "91282CFV8", 4125, (2032, 11, 15)),
    (20, "912810TM0", 4000, (2042, 11, 30)),
    (30, "912810TL2", 4000, (2052, 11, 15)),
];

/// Reference data for every tradable product, injected into connectors
#[derive(Debug, Clone, Default)]
pub struct SecurityMaster {
    bonds: BTreeMap<ProductId, Bond>,
}

impl SecurityMaster {
    pub fn new(bonds: impl IntoIterator<Item = Bond>) -> Self {
        Self {
            bonds: bonds
                .into_iter()
                .map(|bond| (bond.product_id().clone(), bond))
                .collect(),
        }
    }

    /// The seven on-the-run Treasuries (2Y through 30Y).
    pub fn treasuries() -> Self {
        Self::new(ON_THE_RUN.iter().filter_map(|&(tenor, cusip, coupon, (y, m, d))| {
            let maturity = NaiveDate::from_ymd_opt(y, m, d)?;
            let coupon = Decimal::new(coupon, 5);
            Some(Bond::new(ProductId::new(cusip), tenor, coupon, maturity))
        }))
    }

    pub fn bond(&self, product_id: &ProductId) -> Result<&Bond, ServiceError> {
        self.bonds
            .get(product_id)
            .ok_or_else(|| ServiceError::not_found(product_id))
    }

    /// Look up by the raw CUSIP string as read from input files.
    pub fn lookup(&self, cusip: &str) -> Result<&Bond, ServiceError> {
        self.bond(&ProductId::new(cusip))
    }

    /// Bonds ordered by tenor, shortest first.
    pub fn by_tenor(&self) -> Vec<&Bond> {
        let mut bonds: Vec<&Bond> = self.bonds.values().collect();
        bonds.sort_by_key(|b| b.tenor_years());
        bonds
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}
