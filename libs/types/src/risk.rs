//! Interest-rate risk types
//!
//! PV01 is the price change for a one basis point move in yield, per unit
//! of face. Risk is `pv01 * quantity`, aggregated over sectors of the curve.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::ServiceError;
use crate::ids::ProductId;
use crate::product::{Bond, Product, SecurityMaster};
use crate::record::{CsvRecord, Keyed};

/// PV01 per unit and the signed quantity it applies to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pv01<P = Bond> {
    pub product: P,
    pub pv01: Decimal,
    pub quantity: i64,
}

impl<P: Product> Pv01<P> {
    pub fn new(product: P, pv01: Decimal, quantity: i64) -> Self {
        Self {
            product,
            pv01,
            quantity,
        }
    }

    /// Total risk: `pv01 * quantity`
    pub fn risk(&self) -> Decimal {
        self.pv01 * Decimal::from(self.quantity)
    }
}

impl<P: Product> Keyed for Pv01<P> {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.product.product_id().clone()
    }
}

impl<P: Product> CsvRecord for Pv01<P> {
    fn fields(&self) -> Vec<String> {
        vec![
            self.product.product_id().to_string(),
            self.pv01.to_string(),
            self.quantity.to_string(),
        ]
    }
}

/// A named group of products whose risk is reported together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketedSector<P = Bond> {
    name: ProductId,
    products: Vec<P>,
}

impl<P: Product> BucketedSector<P> {
    pub fn new(name: impl Into<String>, products: Vec<P>) -> Self {
        Self {
            name: ProductId::new(name),
            products,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn products(&self) -> &[P] {
        &self.products
    }
}

impl<P: Product> Product for BucketedSector<P> {
    fn product_id(&self) -> &ProductId {
        &self.name
    }
}

impl BucketedSector<Bond> {
    /// FrontEnd (2Y, 3Y), Belly (5Y, 7Y, 10Y) and LongEnd (20Y, 30Y).
    pub fn treasury_sectors(master: &SecurityMaster) -> Vec<Self> {
        let pick = |tenors: &[u32]| -> Vec<Bond> {
            master
                .by_tenor()
                .into_iter()
                .filter(|bond| tenors.contains(&bond.tenor_years()))
                .cloned()
                .collect()
        };

        vec![
            Self::new("FrontEnd", pick(&[2, 3])),
            Self::new("Belly", pick(&[5, 7, 10])),
            Self::new("LongEnd", pick(&[20, 30])),
        ]
    }
}

/// Per-security PV01 (per unit of face), injected into the risk service
#[derive(Debug, Clone, Default)]
pub struct Pv01Table {
    values: BTreeMap<ProductId, Decimal>,
}

impl Pv01Table {
    pub fn new(values: impl IntoIterator<Item = (ProductId, Decimal)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// PV01 for the on-the-run Treasuries
    pub fn treasuries() -> Self {
        Self::new(
            [
                ("91282CFX4", Decimal::new(1_967_211, 8)),
                ("91282CFW6", Decimal::new(28_849_852, 9)),
                ("91282CFZ9", Decimal::new(48_555_605, 9)),
                ("91282CFY2", Decimal::new(68_303_332, 9)),
                ("91282CFV8", Decimal::new(8_071_955, 8)),
                ("912810TM0", Decimal::new(118_325_668, 9)),
                ("912810TL2", Decimal::new(185_319_634, 9)),
            ]
            .into_iter()
            .map(|(cusip, pv01)| (ProductId::new(cusip), pv01)),
        )
    }

    pub fn pv01(&self, product_id: &ProductId) -> Result<Decimal, ServiceError> {
        self.values
            .get(product_id)
            .copied()
            .ok_or_else(|| ServiceError::not_found(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_risk_is_pv01_times_quantity() {
        let bond = SecurityMaster::treasuries()
            .lookup("91282CFX4")
            .unwrap()
            .clone();
        let pv01 = Pv01::new(bond, Decimal::from_str("0.05").unwrap(), -3);
        assert_eq!(pv01.risk(), Decimal::from_str("-0.15").unwrap());
    }

    #[test]
    fn test_treasury_sectors() {
        let master = SecurityMaster::treasuries();
        let sectors = BucketedSector::treasury_sectors(&master);

        let shape: Vec<(&str, usize)> = sectors
            .iter()
            .map(|s| (s.name(), s.products().len()))
            .collect();
        assert_eq!(shape, vec![("FrontEnd", 2), ("Belly", 3), ("LongEnd", 2)]);
        assert_eq!(sectors[1].product_id().as_str(), "Belly");
        assert_eq!(sectors[2].products()[1].ticker(), "US30Y");
    }

    #[test]
    fn test_pv01_table_lookup() {
        let table = Pv01Table::treasuries();
        assert_eq!(
            table.pv01(&ProductId::new("91282CFV8")).unwrap(),
            Decimal::from_str("0.08071955").unwrap()
        );
        assert!(matches!(
            table.pv01(&ProductId::new("UNKNOWN")),
            Err(ServiceError::NotFound { .. })
        ));
    }
}
