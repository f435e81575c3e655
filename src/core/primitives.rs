use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// OHLCV record keyed by a domain position (bar index or unix seconds).
///
/// The viewport core never requires this type; it works with any record
/// through accessors. `Ohlcv` is the record most hosts feed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ohlcv {
    pub x: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv {
    /// Builds a validated record.
    ///
    /// Invariants:
    /// - all values are finite
    /// - `low <= high`, `open`/`close` within `[low, high]`
    /// - `volume >= 0`
    pub fn new(x: f64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> ChartResult<Self> {
        if [x, open, high, low, close, volume]
            .iter()
            .any(|value| !value.is_finite())
        {
            return Err(ChartError::InvalidData(
                "ohlcv values must be finite".to_owned(),
            ));
        }
        if low > high {
            return Err(ChartError::InvalidData(
                "ohlcv low must be <= high".to_owned(),
            ));
        }
        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "ohlcv open/close must be within low/high range".to_owned(),
            ));
        }
        if volume < 0.0 {
            return Err(ChartError::InvalidData(
                "ohlcv volume must be >= 0".to_owned(),
            ));
        }

        Ok(Self {
            x,
            open,
            high,
            low,
            close,
            volume,
        })
    }

    /// Converts a timestamped decimal quote into a record keyed by unix seconds.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
            decimal_to_f64(volume, "volume")?,
        )
    }

    /// Returns a copy re-keyed to an ordinal bar index.
    ///
    /// Gap-skipping time axes key bars by index; hosts map the index back to
    /// a timestamp through the display accessor.
    #[must_use]
    pub fn with_index(self, index: usize) -> Self {
        Self {
            x: index as f64,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::Ohlcv;

    #[test]
    fn decimal_quote_converts_to_unix_seconds() {
        let time = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).single().expect("valid time");
        let bar = Ohlcv::from_decimal_time(
            time,
            Decimal::new(1000, 2),
            Decimal::new(1200, 2),
            Decimal::new(900, 2),
            Decimal::new(1100, 2),
            Decimal::new(5, 0),
        )
        .expect("valid quote");
        assert!((bar.x - 1_704_153_600.0).abs() <= 1e-9);
        assert!((bar.high - 12.0).abs() <= 1e-12);
    }

    #[test]
    fn rejects_inverted_high_low() {
        let err = Ohlcv::new(0.0, 1.0, 0.5, 2.0, 1.0, 0.0).expect_err("low > high");
        assert!(format!("{err}").contains("low must be <= high"));
    }
}
