//! Deterministic synthetic price series used when no live data is requested.
//!
//! The seed for each series is the 64-bit FNV-1a hash of the ticker's UTF-8
//! bytes, fed into `fastrand`'s wyrand generator. The same `(ticker, points)`
//! pair therefore always yields the same series, on every platform.

use fastrand::Rng;

/// Number of points generated when the caller does not ask for a specific count.
pub const DEFAULT_POINTS: usize = 30;

/// Tickers offered by the explorer's mock-data picker.
pub const STOCK_TICKERS: [&str; 20] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "JPM", "V", "JNJ", "WMT", "PG",
    "MA", "UNH", "HD", "DIS", "NFLX", "ADBE", "INTC", "AMD",
];

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const BASE_PRICE_FLOOR: f64 = 50.0;
const BASE_PRICE_SPAN: f64 = 450.0;
const DAILY_DRIFT: f64 = 0.04;
const INTRADAY_SPREAD: f64 = 0.02;
const MIN_BASELINE: f64 = 1.0;
const MIN_PRICE: f64 = 0.01;

/// Three aligned sequences describing a synthetic daily price range.
#[derive(Debug, Clone, PartialEq)]
pub struct MockSeries {
    pub days: Vec<u32>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
}

impl MockSeries {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Iterate `(day, high, low)` rows in day order.
    pub fn rows(&self) -> impl Iterator<Item = (u32, f64, f64)> + '_ {
        self.days
            .iter()
            .zip(self.high.iter().zip(self.low.iter()))
            .map(|(day, (high, low))| (*day, *high, *low))
    }
}

/// Stable seed derived from the ticker text.
pub fn ticker_seed(ticker: &str) -> u64 {
    ticker.bytes().fold(FNV_OFFSET_BASIS, |acc, byte| {
        (acc ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Generate `num_points` days of synthetic high/low prices for `ticker`.
///
/// `num_points` must be positive; a zero count yields an empty series.
pub fn generate(ticker: &str, num_points: usize) -> MockSeries {
    let mut rng = Rng::with_seed(ticker_seed(ticker));
    let mut baseline = BASE_PRICE_FLOOR + rng.f64() * BASE_PRICE_SPAN;

    let mut series = MockSeries {
        days: Vec::with_capacity(num_points),
        high: Vec::with_capacity(num_points),
        low: Vec::with_capacity(num_points),
    };

    for day in 1..=num_points {
        let drift = (rng.f64() - 0.5) * DAILY_DRIFT * baseline;
        baseline = (baseline + drift).max(MIN_BASELINE);

        let high = baseline + rng.f64() * INTRADAY_SPREAD * baseline;
        let low = (baseline - rng.f64() * INTRADAY_SPREAD * baseline).max(MIN_PRICE);

        series.days.push(day as u32);
        series.high.push(round_cents(high));
        series.low.push(round_cents(low));
    }

    series
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
