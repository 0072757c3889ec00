//! Connectors: moving data between files and services
//!
//! Inbound data is line-oriented, comma-delimited and positional with no
//! header. The `subscribe` driver reads records, lets the service's
//! connector decode them, and feeds each decoded value to `on_message`.
//! Any malformed line aborts the pass with its line number. Empty lines
//! carry no record and are skipped.

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rust_decimal::Decimal;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error, info};

use types::errors::{Direction, ServiceError};
use types::numeric::parse_fractional;

use crate::service::Service;

/// Data movement for a single service.
///
/// Either direction may be unsupported; the default methods answer with a
/// `Config` error naming the connector.
pub trait Connector<V>: Send {
    fn name(&self) -> &'static str;

    /// Push a value to the external sink.
    fn publish(&mut self, _data: &V) -> Result<(), ServiceError> {
        Err(ServiceError::Config {
            connector: self.name().to_string(),
            direction: Direction::Publish,
        })
    }

    /// Decode one input record. `Ok(None)` means the record was buffered
    /// and nothing is ready for the service yet.
    fn decode(&mut self, _fields: &Fields<'_>) -> Result<Option<V>, ServiceError> {
        Err(ServiceError::Config {
            connector: self.name().to_string(),
            direction: Direction::Subscribe,
        })
    }

    /// Called once at end of input.
    fn finish(&mut self) -> Result<(), ServiceError> {
        Ok(())
    }
}

/// Connector for services fed only by upstream listeners
#[derive(Debug, Default, Clone, Copy)]
pub struct NoConnector;

impl<V> Connector<V> for NoConnector {
    fn name(&self) -> &'static str {
        "NoConnector"
    }
}

/// One input record with its line number
pub struct Fields<'a> {
    record: &'a StringRecord,
    line: u64,
}

impl<'a> Fields<'a> {
    pub fn new(record: &'a StringRecord, line: u64) -> Self {
        Self { record, line }
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// A `Parse` error at this record's line
    pub fn error(&self, reason: impl Into<String>) -> ServiceError {
        ServiceError::parse(self.line, reason)
    }

    pub fn expect_len(&self, expected: usize) -> Result<(), ServiceError> {
        if self.record.len() != expected {
            return Err(self.error(format!(
                "expected {} fields, found {}",
                expected,
                self.record.len()
            )));
        }
        Ok(())
    }

    pub fn str(&self, index: usize) -> Result<&'a str, ServiceError> {
        self.record
            .get(index)
            .ok_or_else(|| self.error(format!("missing field {}", index)))
    }

    /// Field in `D-FFx` notation
    pub fn price(&self, index: usize) -> Result<Decimal, ServiceError> {
        let raw = self.str(index)?;
        parse_fractional(raw).map_err(|e| self.error(e.to_string()))
    }

    pub fn parse<T>(&self, index: usize, what: &str) -> Result<T, ServiceError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self.str(index)?;
        raw.parse()
            .map_err(|e| self.error(format!("invalid {} '{}': {}", what, raw, e)))
    }
}

/// Drain `reader` into `service` through its connector.
///
/// Returns the number of values delivered to `on_message`.
pub fn subscribe<S, R>(service: &mut S, reader: R) -> Result<usize, ServiceError>
where
    S: Service + ?Sized,
    R: Read,
{
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let connector = service.connector().name();
    let mut record = StringRecord::new();
    let mut line = 0u64;
    let mut delivered = 0usize;

    loop {
        match reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                let at = err.position().map(|p| p.line()).unwrap_or(line + 1);
                error!(connector, line = at, error = %err, "Failed to read record");
                return Err(ServiceError::parse(at, err.to_string()));
            }
        }
        line = record.position().map(|p| p.line()).unwrap_or(line + 1);

        let fields = Fields::new(&record, line);
        let decoded = service.connector().decode(&fields).map_err(|e| {
            error!(connector, line, error = %e, "Failed to decode record");
            e
        })?;

        if let Some(value) = decoded {
            service.on_message(value)?;
            delivered += 1;
        } else {
            debug!(connector, line, "Record buffered");
        }
    }

    service.connector().finish().map_err(|e| {
        error!(connector, error = %e, "Input ended mid-batch");
        e
    })?;

    info!(connector, lines = line, delivered, "Subscription complete");
    Ok(delivered)
}

/// Open `path` and drain it into `service`.
pub fn subscribe_file<S>(service: &mut S, path: &Path) -> Result<usize, ServiceError>
where
    S: Service + ?Sized,
{
    let file = File::open(path).map_err(|e| ServiceError::io(path.display(), &e))?;
    info!(path = %path.display(), "Subscribing to input file");
    subscribe(service, file)
}

/// Append-only CSV output file
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file if needed.
    pub fn append(&self, fields: &[String]) -> Result<(), ServiceError> {
        let io_err = |reason: String| ServiceError::Io {
            path: self.path.display().to_string(),
            reason,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| io_err(e.to_string()))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .write_record(fields)
            .map_err(|e| io_err(e.to_string()))?;
        writer.flush().map_err(|e| io_err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::ServiceListener;
    use crate::service::Store;
    use std::sync::Arc;
    use tempfile::TempDir;
    use types::record::Keyed;

    #[derive(Debug, Clone, PartialEq)]
    struct Tick {
        symbol: String,
        price: Decimal,
    }

    impl Keyed for Tick {
        type Key = String;

        fn key(&self) -> String {
            self.symbol.clone()
        }
    }

    struct TickConnector;

    impl Connector<Tick> for TickConnector {
        fn name(&self) -> &'static str {
            "TickConnector"
        }

        fn decode(&mut self, fields: &Fields<'_>) -> Result<Option<Tick>, ServiceError> {
            fields.expect_len(2)?;
            Ok(Some(Tick {
                symbol: fields.str(0)?.to_string(),
                price: fields.price(1)?,
            }))
        }
    }

    struct TickService {
        store: Store<Tick>,
        connector: TickConnector,
    }

    impl Service for TickService {
        type Key = String;
        type Value = Tick;

        fn get_data(&self, key: &String) -> Result<&Tick, ServiceError> {
            self.store.get(key)
        }

        fn on_message(&mut self, data: Tick) -> Result<(), ServiceError> {
            self.store.publish(data)
        }

        fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Tick>>) {
            self.store.add_listener(listener);
        }

        fn listeners(&self) -> &[Arc<dyn ServiceListener<Tick>>] {
            self.store.listeners()
        }

        fn connector(&mut self) -> &mut dyn Connector<Tick> {
            &mut self.connector
        }
    }

    fn make_service() -> TickService {
        TickService {
            store: Store::new("ticks"),
            connector: TickConnector,
        }
    }

    #[test]
    fn test_subscribe_decodes_every_line() {
        let mut service = make_service();
        let input = "2Y,99-16+\n5Y,100-000\n2Y,99-170\n";

        let delivered = subscribe(&mut service, input.as_bytes()).unwrap();

        assert_eq!(delivered, 3);
        assert_eq!(
            service.get_data(&"2Y".to_string()).unwrap().price,
            Decimal::new(9_953_125, 5)
        );
    }

    #[test]
    fn test_subscribe_fails_fast_with_line_number() {
        let mut service = make_service();
        let input = "2Y,99-16+\n5Y,100.5\n7Y,101-000\n";

        let err = subscribe(&mut service, input.as_bytes()).unwrap_err();

        assert!(matches!(err, ServiceError::Parse { line: 2, .. }));
        assert!(service.get_data(&"7Y".to_string()).is_err());
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let mut service = make_service();
        let input = "2Y,99-16+\n\n5Y,100-000\n\n";

        let delivered = subscribe(&mut service, input.as_bytes()).unwrap();

        assert_eq!(delivered, 2);
        assert!(service.get_data(&"5Y".to_string()).is_ok());
    }

    #[test]
    fn test_wrong_field_count() {
        let mut service = make_service();
        let err = subscribe(&mut service, "2Y,99-000,extra\n".as_bytes()).unwrap_err();
        assert_eq!(
            err,
            ServiceError::Parse {
                line: 1,
                reason: "expected 2 fields, found 3".to_string()
            }
        );
    }

    #[test]
    fn test_unsupported_direction_is_config_error() {
        let mut connector = TickConnector;
        let tick = Tick {
            symbol: "2Y".to_string(),
            price: Decimal::ONE,
        };
        assert_eq!(
            connector.publish(&tick).unwrap_err(),
            ServiceError::Config {
                connector: "TickConnector".to_string(),
                direction: Direction::Publish,
            }
        );

        let record = StringRecord::from(vec!["2Y"]);
        let mut none = NoConnector;
        let result = Connector::<Tick>::decode(&mut none, &Fields::new(&record, 1));
        assert!(matches!(
            result,
            Err(ServiceError::Config {
                direction: Direction::Subscribe,
                ..
            })
        ));
    }

    #[test]
    fn test_subscribe_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut service = make_service();
        let err = subscribe_file(&mut service, &dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, ServiceError::Io { .. }));
    }

    #[test]
    fn test_sink_appends() {
        let dir = TempDir::new().unwrap();
        let sink = CsvFileSink::new(dir.path().join("out.txt"));

        sink.append(&["a".to_string(), "99-16+".to_string()])
            .unwrap();
        sink.append(&["b".to_string(), "".to_string(), "1".to_string()])
            .unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents, "a,99-16+\nb,,1\n");
    }
}
