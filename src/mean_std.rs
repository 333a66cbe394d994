//! The cell value of the result tables: mean and (population)
//! standard deviation of a metric across repeated runs, stored as the
//! string `"{mean}/{std}"`. A statistic without any input values is
//! stored as `"nan/nan"`.

use std::{fmt::Display, num::ParseFloatError, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

impl MeanStd {
    /// The cell of a statistic over zero values.
    pub const MISSING: MeanStd = MeanStd {
        mean: f64::NAN,
        std: f64::NAN,
    };

    pub fn is_missing(&self) -> bool {
        self.mean.is_nan()
    }
}

/// Round to 2 decimal places, correctly rounded from the exact binary
/// value.
pub fn round2(x: f64) -> f64 {
    format!("{x:.2}")
        .parse()
        .expect("formatted float always parses")
}

/// The shortest representation that parses back to the same value,
/// always with a decimal point (`5.0`, `12.35`).
pub fn shortest_repr(x: f64) -> String {
    format!("{x:?}")
}

fn cell_repr(x: f64) -> String {
    if x.is_nan() {
        "nan".into()
    } else {
        shortest_repr(round2(x))
    }
}

impl Display for MeanStd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", cell_repr(self.mean), cell_repr(self.std))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MeanStdParseError {
    #[error("missing '/' between mean and standard deviation in {0:?}")]
    MissingSeparator(String),
    #[error("invalid mean in {0:?}: {1}")]
    InvalidMean(String, ParseFloatError),
    #[error("invalid standard deviation in {0:?}: {1}")]
    InvalidStd(String, ParseFloatError),
}

impl FromStr for MeanStd {
    type Err = MeanStdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mean, std) = s
            .split_once('/')
            .ok_or_else(|| MeanStdParseError::MissingSeparator(s.into()))?;
        let mean = mean
            .trim()
            .parse()
            .map_err(|e| MeanStdParseError::InvalidMean(s.into(), e))?;
        let std = std
            .trim()
            .parse()
            .map_err(|e| MeanStdParseError::InvalidStd(s.into(), e))?;
        Ok(MeanStd { mean, std })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_display() {
        let c = |mean, std| MeanStd { mean, std }.to_string();
        assert_eq!(c(5., 0.), "5.0/0.0");
        assert_eq!(c(100., 0.), "100.0/0.0");
        assert_eq!(c(12.3456, 1.004), "12.35/1.0");
        assert_eq!(c(0.126, 2.675), "0.13/2.67"); // 2.675 is 2.67499.. in binary
        assert_eq!(c(1234.5, 0.333333), "1234.5/0.33");
        assert_eq!(c(-0.001, 0.), "-0.0/0.0");
    }

    #[test]
    fn t_parse_recovers_rounded_values() {
        for (mean, std) in [(5., 0.), (8.123, 0.4567), (30.0, 12.999), (1e6 / 3., 0.5)] {
            let cell = MeanStd { mean, std };
            let back: MeanStd = cell.to_string().parse().unwrap();
            assert_eq!(back.mean, round2(mean));
            assert_eq!(back.std, round2(std));
        }
    }

    #[test]
    fn t_missing() -> Result<(), MeanStdParseError> {
        assert_eq!(MeanStd::MISSING.to_string(), "nan/nan");
        let back: MeanStd = "nan/nan".parse()?;
        assert!(back.is_missing());
        assert!(back.std.is_nan());
        assert!(!MeanStd { mean: 0., std: 0. }.is_missing());
        Ok(())
    }

    #[test]
    fn t_parse_errors() {
        assert_eq!(
            MeanStd::from_str("5.0"),
            Err(MeanStdParseError::MissingSeparator("5.0".into()))
        );
        assert!(matches!(
            MeanStd::from_str("x/1.0"),
            Err(MeanStdParseError::InvalidMean(_, _))
        ));
        assert!(matches!(
            MeanStd::from_str("1.0/"),
            Err(MeanStdParseError::InvalidStd(_, _))
        ));
    }
}
