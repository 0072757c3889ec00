//! Historical data service and its generic listener

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use soa::{Clock, Connector, Service, ServiceListener, Shared, Store};
use types::errors::ServiceError;
use types::record::{CsvRecord, Keyed};

use crate::journal::{HistoryKind, JournalConnector};

/// Latest persisted value per key, with every value journaled to file.
pub struct HistoricalDataService<V: Keyed> {
    kind: HistoryKind,
    store: Store<V>,
    connector: JournalConnector<V>,
}

impl<V> HistoricalDataService<V>
where
    V: Keyed + CsvRecord,
{
    /// History for `kind`, written to its file under `output_dir`.
    pub fn new(kind: HistoryKind, output_dir: &Path, clock: Arc<dyn Clock>) -> Self {
        let path = kind.path_in(output_dir);
        info!(stream = %kind, path = %path.display(), "HistoricalDataService initialized");
        Self {
            kind,
            store: Store::new("historical"),
            connector: JournalConnector::new(path, clock),
        }
    }

    pub fn kind(&self) -> HistoryKind {
        self.kind
    }

    /// Store `data` and append it to the history file.
    ///
    /// The value is always stored under its own key; a different
    /// `persist_key` is logged and ignored.
    pub fn persist_data(&mut self, persist_key: &V::Key, data: V) -> Result<(), ServiceError> {
        let key = data.key();
        if *persist_key != key {
            warn!(stream = %self.kind, %persist_key, %key, "Persist key differs from value key");
        }

        self.connector.publish(&data)?;
        debug!(stream = %self.kind, %key, "Persisted");
        self.store.publish(data)
    }

    pub fn lines_written(&self) -> u64 {
        self.connector.lines_written()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<V> Service for HistoricalDataService<V>
where
    V: Keyed + CsvRecord,
{
    type Key = V::Key;
    type Value = V;

    fn get_data(&self, key: &V::Key) -> Result<&V, ServiceError> {
        self.store.get(key)
    }

    fn on_message(&mut self, data: V) -> Result<(), ServiceError> {
        let key = data.key();
        self.persist_data(&key, data)
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<V>>) {
        self.store.add_listener(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<V>>] {
        self.store.listeners()
    }

    fn connector(&mut self) -> &mut dyn Connector<V> {
        &mut self.connector
    }
}

/// Persists every value its upstream service adds.
pub struct HistoricalListener<V: Keyed> {
    service: Shared<HistoricalDataService<V>>,
}

impl<V: Keyed> HistoricalListener<V> {
    pub fn new(service: Shared<HistoricalDataService<V>>) -> Self {
        Self { service }
    }
}

impl<V> ServiceListener<V> for HistoricalListener<V>
where
    V: Keyed + CsvRecord + Clone + Send + 'static,
{
    fn process_add(&self, data: &V) -> Result<(), ServiceError> {
        self.service.lock().persist_data(&data.key(), data.clone())
    }

    fn process_remove(&self, _data: &V) -> Result<(), ServiceError> {
        Ok(())
    }

    fn process_update(&self, _data: &V) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_history;
    use rust_decimal::Decimal;
    use soa::ManualClock;
    use tempfile::TempDir;
    use types::ids::{InquiryId, ProductId};
    use types::inquiry::{Inquiry, InquiryState};
    use types::position::Position;
    use types::product::SecurityMaster;
    use types::risk::Pv01;
    use types::trade::Side;

    fn make_clock() -> Arc<dyn Clock> {
        Arc::new(ManualClock::new(1_669_887_000_000))
    }

    fn make_position(book: &str, quantity: i64) -> Position {
        let mut position = Position::new(
            SecurityMaster::treasuries()
                .lookup("912810TM0")
                .unwrap()
                .clone(),
        );
        position.add(book, quantity);
        position
    }

    #[test]
    fn test_persist_position_history() {
        let dir = TempDir::new().unwrap();
        let mut service =
            HistoricalDataService::<Position>::new(HistoryKind::Position, dir.path(), make_clock());

        let first = make_position("TRSY1", 10);
        service.persist_data(&first.key(), first.clone()).unwrap();
        let mut second = first.clone();
        second.add("TRSY2", -4);
        service.persist_data(&second.key(), second).unwrap();

        assert_eq!(service.len(), 1);
        assert_eq!(service.lines_written(), 2);
        assert_eq!(
            service
                .get_data(&ProductId::new("912810TM0"))
                .unwrap()
                .aggregate(),
            6
        );

        let lines = read_history(&dir.path().join("positions.txt")).unwrap();
        assert_eq!(lines[0].fields, vec!["912810TM0", "TRSY1:10", "10"]);
        assert_eq!(
            lines[1].fields,
            vec!["912810TM0", "TRSY1:10", "TRSY2:-4", "6"]
        );
        assert_eq!(lines[1].timestamp, "2022-12-01 09:30:00.000");
    }

    #[test]
    fn test_listener_forwards_to_history() {
        let dir = TempDir::new().unwrap();
        let service = soa::shared(HistoricalDataService::<Inquiry>::new(
            HistoryKind::Inquiry,
            dir.path(),
            make_clock(),
        ));
        let listener = HistoricalListener::new(Arc::clone(&service));

        let inquiry = Inquiry {
            inquiry_id: InquiryId::new("INQ42"),
            product: SecurityMaster::treasuries()
                .lookup("91282CFX4")
                .unwrap()
                .clone(),
            side: Side::SELL,
            quantity: 10_000_000,
            price: Decimal::new(995, 1),
            state: InquiryState::Done,
        };
        listener.process_add(&inquiry).unwrap();

        let lines = read_history(&HistoryKind::Inquiry.path_in(dir.path())).unwrap();
        assert_eq!(
            lines[0].fields,
            vec!["INQ42", "91282CFX4", "SELL", "10000000", "99-160", "DONE"]
        );
        assert!(service.lock().get_data(&InquiryId::new("INQ42")).is_ok());
    }

    #[test]
    fn test_unwritable_directory_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-dir");
        let mut service =
            HistoricalDataService::<Pv01>::new(HistoryKind::Risk, &missing, make_clock());

        let pv01 = Pv01::new(
            SecurityMaster::treasuries()
                .lookup("91282CFX4")
                .unwrap()
                .clone(),
            Decimal::new(1_967_211, 8),
            1,
        );
        let err = service.on_message(pv01).unwrap_err();
        assert!(matches!(err, ServiceError::Io { .. }));
        assert!(service.is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::reader::read_history;
    use proptest::prelude::*;
    use soa::ManualClock;
    use tempfile::TempDir;
    use types::position::Position;
    use types::product::SecurityMaster;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_one_line_per_persisted_value(
            updates in prop::collection::vec((0usize..7, -1_000i64..1_000), 1..40)
        ) {
            let dir = TempDir::new().unwrap();
            let master = SecurityMaster::treasuries();
            let bonds = master.by_tenor();
            let mut service = HistoricalDataService::<Position>::new(
                HistoryKind::Position,
                dir.path(),
                Arc::new(ManualClock::new(0)),
            );

            for (idx, qty) in &updates {
                let mut position = Position::new(bonds[*idx].clone());
                position.add("TRSY1", *qty);
                service.on_message(position).unwrap();
            }

            let lines = read_history(&dir.path().join("positions.txt")).unwrap();
            prop_assert_eq!(lines.len(), updates.len());
            prop_assert!(service.len() <= 7);
        }
    }
}
