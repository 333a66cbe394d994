//! Simple statistics (count, mean, standard deviation) over repeated
//! measurements, with the number unit (`ViewType`) verified in the
//! type system.

use std::marker::PhantomData;

use num_traits::{Pow, Zero};

use crate::mean_std::MeanStd;

/// `ViewType` is the type that the statistics is made for,
/// e.g. `MilliSeconds`; it must convert to and from f64.
#[derive(Debug)]
pub struct Stats<ViewType> {
    view_type: PhantomData<fn() -> ViewType>,
    pub num_values: usize,
    pub mean: f64,
    /// Mean squared difference from the mean (i.e. the population
    /// variance, divided by N)
    pub variance: f64,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("no inputs given")]
    NoInputs,
    #[error("input value is not a finite number: {0}")]
    NonFinite(f64),
}

impl<ViewType: Into<f64> + From<f64>> Stats<ViewType> {
    pub fn from_values(vals: Vec<ViewType>) -> Result<Self, StatsError> {
        let vals: Vec<f64> = vals.into_iter().map(Into::into).collect();
        Self::from_f64s(&vals)
    }

    pub fn mean_typed(&self) -> ViewType {
        self.mean.into()
    }
}

impl<ViewType> Stats<ViewType> {
    pub fn from_f64s(vals: &[f64]) -> Result<Self, StatsError> {
        let num_values = vals.len();
        if num_values.is_zero() {
            return Err(StatsError::NoInputs);
        }
        if let Some(v) = vals.iter().find(|v| !v.is_finite()) {
            return Err(StatsError::NonFinite(*v));
        }
        let sum: f64 = vals.iter().sum();
        let mean = sum / num_values as f64;
        let variance = {
            let sum: f64 = vals.iter().map(|v| (v - mean).pow(2)).sum();
            sum / num_values as f64
        };
        Ok(Stats {
            view_type: PhantomData,
            num_values,
            mean,
            variance,
        })
    }

    /// Population standard deviation (divided by N).
    pub fn standard_deviation(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Sample standard deviation (divided by N-1); 0 if there are
    /// fewer than 2 values.
    pub fn sample_standard_deviation(&self) -> f64 {
        if self.num_values < 2 {
            0.
        } else {
            let n = self.num_values as f64;
            (self.variance * n / (n - 1.)).sqrt()
        }
    }

    /// The cell value stored in the result tables.
    pub fn mean_std(&self) -> MeanStd {
        MeanStd {
            mean: self.mean,
            std: self.standard_deviation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use approx::assert_relative_eq;

    use crate::units::{MilliSeconds, RequestsPerSecond};

    use super::*;

    #[test]
    fn t_population_standard_deviation() -> Result<()> {
        let stats = Stats::<RequestsPerSecond>::from_values(vec![
            RequestsPerSecond(10.),
            RequestsPerSecond(20.),
        ])?;
        assert_eq!(stats.num_values, 2);
        assert_eq!(stats.mean, 15.);
        assert_eq!(stats.standard_deviation(), 5.); // not 7.07
        assert_relative_eq!(stats.sample_standard_deviation(), 7.0710678, epsilon = 1e-6);
        assert_eq!(stats.mean_typed(), RequestsPerSecond(15.));
        Ok(())
    }

    #[test]
    fn t_single_value() -> Result<()> {
        let stats = Stats::<MilliSeconds>::from_values(vec![MilliSeconds(5.)])?;
        assert_eq!(stats.mean, 5.);
        assert_eq!(stats.standard_deviation(), 0.);
        assert_eq!(stats.sample_standard_deviation(), 0.);
        assert_eq!(stats.mean_std().to_string(), "5.0/0.0");
        Ok(())
    }

    #[test]
    fn t_more_values() -> Result<()> {
        let stats = Stats::<MilliSeconds>::from_f64s(&[23., 4., 8., 30., 7.])?;
        assert_relative_eq!(stats.mean, 14.4);
        assert_relative_eq!(stats.variance, 104.24, epsilon = 1e-9);
        assert_relative_eq!(stats.standard_deviation(), 10.2097992144802, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn t_errors() {
        assert_eq!(
            Stats::<MilliSeconds>::from_f64s(&[]).err(),
            Some(StatsError::NoInputs)
        );
        assert!(matches!(
            Stats::<MilliSeconds>::from_f64s(&[1., f64::NAN]).err(),
            Some(StatsError::NonFinite(_))
        ));
    }
}
