//! Risk value calculations
//!
//! Deterministic PV01 arithmetic shared by the risk service.

use rust_decimal::Decimal;
use types::ids::ProductId;
use types::product::Product;
use types::risk::{BucketedSector, Pv01};

/// Risk of one holding
///
/// `risk = pv01 × quantity`
pub fn position_risk(pv01: Decimal, quantity: i64) -> Decimal {
    pv01 * Decimal::from(quantity)
}

/// Total risk of a sector.
///
/// `sector_risk = Σ pv01(p) × quantity(p)` over members with a known PV01.
/// Members without one contribute nothing.
pub fn sector_risk<'a, P, F>(sector: &BucketedSector<P>, lookup: F) -> Decimal
where
    P: Product + 'a,
    F: Fn(&ProductId) -> Option<&'a Pv01<P>>,
{
    sector
        .products()
        .iter()
        .filter_map(|product| lookup(product.product_id()))
        .fold(Decimal::ZERO, |acc, pv01| {
            acc + position_risk(pv01.pv01, pv01.quantity)
        })
}
