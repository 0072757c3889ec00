//! Service construction, listener wiring and the input pass

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use execution::{
    AlgoExecutionService, AlgoExecutionToExecutionListener, ExecutionService,
    ExecutionToTradeBookingListener, MarketDataToAlgoExecutionListener, TradeBookingService,
};
use inquiry::InquiryService;
use market_data::MarketDataService;
use persistence::{HistoricalDataService, HistoricalListener, HistoryKind};
use pricing::{
    AlgoStreamingService, AlgoStreamingToStreamingListener, GuiConfig, GuiService,
    PricingService, PricingToAlgoStreamingListener, PricingToGuiListener, StreamingService,
};
use risk_engine::{
    PositionService, PositionToRiskListener, RiskService, TradeBookingToPositionListener,
};
use soa::{shared, subscribe_file, Clock, Service, Shared, SystemClock};
use types::errors::ServiceError;
use types::execution::ExecutionOrder;
use types::inquiry::Inquiry;
use types::position::Position;
use types::pricing::PriceStream;
use types::product::SecurityMaster;
use types::record::{CsvRecord, Keyed};
use types::risk::{BucketedSector, Pv01, Pv01Table};

use crate::config::Config;

pub const PRICES_FILE: &str = "prices.txt";
pub const TRADES_FILE: &str = "trades.txt";
pub const MARKET_DATA_FILE: &str = "marketdata.txt";
pub const INQUIRIES_FILE: &str = "inquiries.txt";

/// Counts from one pass over the inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub prices: usize,
    pub trades: usize,
    pub order_books: usize,
    pub inquiries: usize,
    pub gui_published: u64,
    pub gui_dropped: u64,
    pub executions: u64,
    pub positions_written: u64,
    pub risk_written: u64,
    pub executions_written: u64,
    pub streams_written: u64,
    pub inquiries_written: u64,
    /// Total PV01 per sector after the pass
    pub bucketed_risk: Vec<(String, Decimal)>,
}

/// Every service of the back office, wired together
pub struct BackOffice {
    master: Arc<SecurityMaster>,
    pub pricing: Shared<PricingService>,
    pub algo_streaming: Shared<AlgoStreamingService>,
    pub streaming: Shared<StreamingService>,
    pub gui: Shared<GuiService>,
    pub market_data: Shared<MarketDataService>,
    pub algo_execution: Shared<AlgoExecutionService>,
    pub execution: Shared<ExecutionService>,
    pub trade_booking: Shared<TradeBookingService>,
    pub position: Shared<PositionService>,
    pub risk: Shared<RiskService>,
    pub inquiry: Shared<InquiryService>,
    pub position_history: Shared<HistoricalDataService<Position>>,
    pub risk_history: Shared<HistoricalDataService<Pv01>>,
    pub execution_history: Shared<HistoricalDataService<ExecutionOrder>>,
    pub streaming_history: Shared<HistoricalDataService<PriceStream>>,
    pub inquiry_history: Shared<HistoricalDataService<Inquiry>>,
}

impl BackOffice {
    /// Construct every service and register the listeners.
    pub fn build(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let master = Arc::new(SecurityMaster::treasuries());
        let out = config.output_dir.as_path();

        let pricing = shared(PricingService::new(Arc::clone(&master)));
        let algo_streaming = shared(AlgoStreamingService::new());
        let streaming = shared(StreamingService::new());
        let gui = shared(GuiService::new(
            GuiConfig {
                output_path: config.gui_path(),
                ..config.gui.clone()
            },
            Arc::clone(&clock),
        ));
        let market_data = shared(MarketDataService::new(
            config.market_data.clone(),
            Arc::clone(&master),
        ));
        let algo_execution = shared(AlgoExecutionService::new(config.algo_execution.clone()));
        let execution = shared(ExecutionService::new());
        let trade_booking = shared(TradeBookingService::new(Arc::clone(&master)));
        let position = shared(PositionService::new());
        let risk = shared(RiskService::new(Pv01Table::treasuries()));
        let inquiry = shared(InquiryService::new(Arc::clone(&master)));

        let position_history = history::<Position>(HistoryKind::Position, out, &clock);
        let risk_history = history::<Pv01>(HistoryKind::Risk, out, &clock);
        let execution_history = history::<ExecutionOrder>(HistoryKind::Execution, out, &clock);
        let streaming_history = history::<PriceStream>(HistoryKind::Streaming, out, &clock);
        let inquiry_history = history::<Inquiry>(HistoryKind::Inquiry, out, &clock);

        // Prices: GUI first, then algo streaming
        {
            let mut pricing = pricing.lock();
            pricing.add_listener(Arc::new(PricingToGuiListener::new(Arc::clone(&gui))));
            let to_algo = PricingToAlgoStreamingListener::new(Arc::clone(&algo_streaming));
            pricing.add_listener(Arc::new(to_algo));
        }
        let to_streaming = AlgoStreamingToStreamingListener::new(Arc::clone(&streaming));
        algo_streaming.lock().add_listener(Arc::new(to_streaming));
        let streams_to_history = HistoricalListener::new(Arc::clone(&streaming_history));
        streaming.lock().add_listener(Arc::new(streams_to_history));

        // Market data through execution
        let to_algo_execution = MarketDataToAlgoExecutionListener::new(Arc::clone(&algo_execution));
        market_data.lock().add_listener(Arc::new(to_algo_execution));
        let to_execution = AlgoExecutionToExecutionListener::new(Arc::clone(&execution));
        algo_execution.lock().add_listener(Arc::new(to_execution));
        {
            let mut execution = execution.lock();
            // Stage 1: history; stage 2: trade booking
            let orders_to_history = HistoricalListener::new(Arc::clone(&execution_history));
            execution.add_listener(Arc::new(orders_to_history));
            let to_booking = ExecutionToTradeBookingListener::new(Arc::clone(&trade_booking));
            execution.add_execution_listener(Arc::new(to_booking));
        }

        // Trades through risk
        let to_position = TradeBookingToPositionListener::new(Arc::clone(&position));
        trade_booking.lock().add_listener(Arc::new(to_position));
        {
            let mut position = position.lock();
            position.add_listener(Arc::new(PositionToRiskListener::new(Arc::clone(&risk))));
            let positions_to_history = HistoricalListener::new(Arc::clone(&position_history));
            position.add_listener(Arc::new(positions_to_history));
        }
        let risk_to_history = HistoricalListener::new(Arc::clone(&risk_history));
        risk.lock().add_listener(Arc::new(risk_to_history));

        let inquiries_to_history = HistoricalListener::new(Arc::clone(&inquiry_history));
        inquiry.lock().add_listener(Arc::new(inquiries_to_history));

        info!(output = %out.display(), "Services linked");

        Self {
            master,
            pricing,
            algo_streaming,
            streaming,
            gui,
            market_data,
            algo_execution,
            execution,
            trade_booking,
            position,
            risk,
            inquiry,
            position_history,
            risk_history,
            execution_history,
            streaming_history,
            inquiry_history,
        }
    }

    /// Drain prices, trades, market data and inquiries from `data_dir`,
    /// each file to completion before the next.
    pub fn run(&self, data_dir: &Path) -> Result<RunSummary, ServiceError> {
        info!(data_dir = %data_dir.display(), "Processing price data");
        let prices = subscribe_file(&mut *self.pricing.lock(), &data_dir.join(PRICES_FILE))?;

        info!("Processing trade data");
        let trades = subscribe_file(
            &mut *self.trade_booking.lock(),
            &data_dir.join(TRADES_FILE),
        )?;

        info!("Processing market data");
        let order_books = subscribe_file(
            &mut *self.market_data.lock(),
            &data_dir.join(MARKET_DATA_FILE),
        )?;

        info!("Processing inquiry data");
        let inquiries = subscribe_file(
            &mut *self.inquiry.lock(),
            &data_dir.join(INQUIRIES_FILE),
        )?;

        let bucketed_risk = self
            .bucketed_risk()
            .into_iter()
            .map(|sector| {
                info!(sector = %sector.product.name(), pv01 = %sector.pv01, "Bucketed risk");
                (sector.product.name().to_string(), sector.pv01)
            })
            .collect();

        let gui = self.gui.lock();
        Ok(RunSummary {
            prices,
            trades,
            order_books,
            inquiries,
            gui_published: gui.published(),
            gui_dropped: gui.dropped(),
            executions: self.execution.lock().orders_sent(),
            positions_written: self.position_history.lock().lines_written(),
            risk_written: self.risk_history.lock().lines_written(),
            executions_written: self.execution_history.lock().lines_written(),
            streams_written: self.streaming_history.lock().lines_written(),
            inquiries_written: self.inquiry_history.lock().lines_written(),
            bucketed_risk,
        })
    }

    /// Current PV01 of each Treasury sector
    pub fn bucketed_risk(&self) -> Vec<Pv01<BucketedSector>> {
        let risk = self.risk.lock();
        BucketedSector::treasury_sectors(&self.master)
            .iter()
            .map(|sector| risk.get_bucketed_risk(sector))
            .collect()
    }
}

fn history<V>(
    kind: HistoryKind,
    dir: &Path,
    clock: &Arc<dyn Clock>,
) -> Shared<HistoricalDataService<V>>
where
    V: Keyed + CsvRecord,
{
    shared(HistoricalDataService::new(kind, dir, Arc::clone(clock)))
}

/// Prepare directories, optionally regenerate inputs, then run the back
/// office on the system clock.
pub fn run(config: &Config, init: bool) -> Result<RunSummary> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            config.output_dir.display()
        )
    })?;

    if init {
        fs::create_dir_all(&config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory: {}",
                config.data_dir.display()
            )
        })?;
        let master = SecurityMaster::treasuries();
        simulation::generate_all(&config.generator, &master, &config.data_dir)
            .context("Failed to generate input files")?;
    }

    let office = BackOffice::build(config, Arc::new(SystemClock));
    office
        .run(&config.data_dir)
        .context("Failed to process input files")
}
