//! Input file generators
//!
//! | File | Line |
//! |---|---|
//! | `prices.txt` | `productId,bid,offer` |
//! | `marketdata.txt` | `productId,price,quantity,BID\|OFFER` |
//! | `trades.txt` | `productId,tradeId,price,book,quantity,BUY\|SELL` |
//! | `inquiries.txt` | `inquiryId,productId,BUY\|SELL,quantity,price,RECEIVED` |
//!
//! Prices are written in `D-FFx` notation and always lie in [99, 101].

use csv::{Writer, WriterBuilder};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use types::numeric::{format_fractional, tick};
use types::product::{Product, SecurityMaster};

use crate::config::{GeneratorConfig, SNAPSHOT_LEVELS};
use crate::error::GenerationError;
use crate::walk::PriceWalk;

/// Order sizes, cycled by position
pub const VOLUMES: [i64; 5] = [10_000_000, 20_000_000, 30_000_000, 40_000_000, 50_000_000];

/// Full bid/offer spreads of successive snapshots, in ticks
const SNAPSHOT_SPREAD_TICKS: [i64; 4] = [2, 4, 6, 8];

const ID_ALPHABET: &[u8; 36] = b"ZAQWSXCDERFVBGTYHNMJUIKLOP1472583690";

/// Paths of one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub prices: PathBuf,
    pub market_data: PathBuf,
    pub trades: PathBuf,
    pub inquiries: PathBuf,
}

impl GeneratedFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            prices: dir.join("prices.txt"),
            market_data: dir.join("marketdata.txt"),
            trades: dir.join("trades.txt"),
            inquiries: dir.join("inquiries.txt"),
        }
    }
}

/// Seeded generator over a security master.
pub struct InputGenerator<'a> {
    config: GeneratorConfig,
    master: &'a SecurityMaster,
    rng: ChaCha8Rng,
}

impl<'a> InputGenerator<'a> {
    pub fn new(
        config: GeneratorConfig,
        master: &'a SecurityMaster,
    ) -> Result<Self, GenerationError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            master,
            rng,
        })
    }

    /// Two-sided quotes around a walking center, each side one or two
    /// ticks away at random.
    pub fn write_prices<W: Write>(&mut self, out: W) -> Result<(), GenerationError> {
        let mut writer = csv_writer(out);
        for bond in self.master.by_tenor() {
            info!(product = %bond.product_id(), "Generating prices");
            let mut walk = PriceWalk::around_par(2);

            for _ in 0..self.config.prices_per_product {
                let center = walk.center();
                let mut offer = center + tick();
                let mut bid = center - tick();
                if self.rng.gen_bool(0.5) {
                    offer += tick();
                }
                if self.rng.gen_bool(0.5) {
                    bid -= tick();
                }
                walk.step();

                writer.write_record([
                    bond.product_id().as_str(),
                    format_fractional(bid).as_str(),
                    format_fractional(offer).as_str(),
                ])?;
            }
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Snapshots of `SNAPSHOT_LEVELS` bids and offers. The top-of-book
    /// spread cycles through 2, 4, 6 and 8 ticks; deeper levels step one
    /// tick further out.
    pub fn write_market_data<W: Write>(&mut self, out: W) -> Result<(), GenerationError> {
        let mut writer = csv_writer(out);
        let snapshots = self.config.market_data_per_product / (2 * SNAPSHOT_LEVELS);

        for bond in self.master.by_tenor() {
            info!(product = %bond.product_id(), snapshots, "Generating market data");
            let mut walk = PriceWalk::around_par(1);

            for i in 0..snapshots {
                let half_spread =
                    tick() * Decimal::from(SNAPSHOT_SPREAD_TICKS[i % 4]) / Decimal::TWO;
                let top_bid = walk.center() - half_spread;
                let top_offer = walk.center() + half_spread;

                for level in 0..SNAPSHOT_LEVELS {
                    let depth = tick() * Decimal::from(level as i64);
                    let volume = VOLUMES[level % VOLUMES.len()].to_string();
                    writer.write_record([
                        bond.product_id().as_str(),
                        format_fractional(top_bid - depth).as_str(),
                        volume.as_str(),
                        "BID",
                    ])?;
                    writer.write_record([
                        bond.product_id().as_str(),
                        format_fractional(top_offer + depth).as_str(),
                        volume.as_str(),
                        "OFFER",
                    ])?;
                }
                walk.step();
            }
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Trades at a random price on [99, 101), alternating SELL/BUY, in a
    /// random TRSY book.
    pub fn write_trades<W: Write>(&mut self, out: W) -> Result<(), GenerationError> {
        let mut writer = csv_writer(out);
        for bond in self.master.by_tenor() {
            info!(product = %bond.product_id(), "Generating trades");
            for i in 0..self.config.trades_per_product {
                let price = self.random_price();
                let book = format!("TRSY{}", self.rng.gen_range(1..=3));
                let trade_id = self.random_id(12);
                writer.write_record([
                    bond.product_id().as_str(),
                    trade_id.as_str(),
                    format_fractional(price).as_str(),
                    book.as_str(),
                    VOLUMES[i % VOLUMES.len()].to_string().as_str(),
                    alternating_side(i),
                ])?;
            }
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// RECEIVED inquiries at a random price, alternating SELL/BUY.
    pub fn write_inquiries<W: Write>(&mut self, out: W) -> Result<(), GenerationError> {
        let mut writer = csv_writer(out);
        for bond in self.master.by_tenor() {
            info!(product = %bond.product_id(), "Generating inquiries");
            for i in 0..self.config.inquiries_per_product {
                let price = self.random_price();
                let inquiry_id = format!("INQ{}", self.random_id(9));
                writer.write_record([
                    inquiry_id.as_str(),
                    bond.product_id().as_str(),
                    alternating_side(i),
                    VOLUMES[i % VOLUMES.len()].to_string().as_str(),
                    format_fractional(price).as_str(),
                    "RECEIVED",
                ])?;
            }
        }
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// `99 + n/256` for a uniform `n` in `0..512`
    fn random_price(&mut self) -> Decimal {
        Decimal::from(99) + tick() * Decimal::from(self.rng.gen_range(0i64..512))
    }

    fn random_id(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

fn alternating_side(i: usize) -> &'static str {
    if i % 2 == 1 {
        "BUY"
    } else {
        "SELL"
    }
}

fn csv_writer<W: Write>(out: W) -> Writer<W> {
    WriterBuilder::new().has_headers(false).from_writer(out)
}

fn create(path: &Path) -> Result<File, GenerationError> {
    File::create(path).map_err(|source| GenerationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write all four input files into `dir`, replacing existing ones.
pub fn generate_all(
    config: &GeneratorConfig,
    master: &SecurityMaster,
    dir: &Path,
) -> Result<GeneratedFiles, GenerationError> {
    let files = GeneratedFiles::in_dir(dir);
    let mut generator = InputGenerator::new(config.clone(), master)?;

    info!(seed = config.seed, dir = %dir.display(), "Generating input files");
    generator.write_prices(create(&files.prices)?)?;
    generator.write_market_data(create(&files.market_data)?)?;
    generator.write_trades(create(&files.trades)?)?;
    generator.write_inquiries(create(&files.inquiries)?)?;
    debug!(?files, "Input files written");

    Ok(files)
}
