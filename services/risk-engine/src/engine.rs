//! Risk service: PV01 per security and per sector
//!
//! Each position update is priced with the injected PV01 table and
//! stored as `PV01 { pv01 per unit, quantity = aggregate position }`.
//! Sector risk is aggregated on demand.

use std::sync::Arc;

use tracing::{debug, info};

use soa::{Connector, NoConnector, Service, ServiceListener, Shared, Store};
use types::errors::ServiceError;
use types::ids::ProductId;
use types::position::Position;
use types::product::Product;
use types::risk::{BucketedSector, Pv01, Pv01Table};

use crate::exposure;

pub struct RiskService {
    pv01_table: Pv01Table,
    store: Store<Pv01>,
    connector: NoConnector,
}

impl RiskService {
    pub fn new(pv01_table: Pv01Table) -> Self {
        info!("RiskService initialized");
        Self {
            pv01_table,
            store: Store::new("risk"),
            connector: NoConnector,
        }
    }

    /// Price a position update and fan out its PV01.
    pub fn add_position(&mut self, position: &Position) -> Result<(), ServiceError> {
        let product = position.product();
        let pv01 = self.pv01_table.pv01(product.product_id())?;
        let quantity = position.aggregate();

        debug!(
            product = %product.product_id(),
            %pv01,
            quantity,
            risk = %exposure::position_risk(pv01, quantity),
            "Risk updated"
        );

        self.store
            .publish(Pv01::new(product.clone(), pv01, quantity))
    }

    /// Total PV01 of `sector`, reported with quantity 1.
    pub fn get_bucketed_risk(&self, sector: &BucketedSector) -> Pv01<BucketedSector> {
        let total = exposure::sector_risk(sector, |id| self.store.get(id).ok());
        Pv01::new(sector.clone(), total, 1)
    }
}

impl Service for RiskService {
    type Key = ProductId;
    type Value = Pv01;

    fn get_data(&self, key: &ProductId) -> Result<&Pv01, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: Pv01) -> Result<(), ServiceError> {
        self.store.publish(data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Pv01>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Pv01>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<Pv01> {
        &mut self.connector
    }
}

/// Reprices risk on every position update.
pub struct PositionToRiskListener {
    service: Shared<RiskService>,
}

impl PositionToRiskListener {
    pub fn new(service: Shared<RiskService>) -> Self {
        Self { service }
    }
}

impl ServiceListener<Position> for PositionToRiskListener {
    fn process_add(&self, data: &Position) -> Result<(), ServiceError> {
        self.service.lock().add_position(data)
    }

    fn process_remove(&self, _data: &Position) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &Position) -> Result<(), ServiceError> {
        Ok(())
    }
}
