//! The numbers behind the charts, derived from the aggregated CSV
//! tables.
//!
//! A bar for an HP model summarizes the column of that model: its
//! height is the mean over all BE partners (rows), its error bar the
//! sample standard deviation across those partners. The per-cell
//! standard deviations stored in the tables are not used. Cells
//! without results (`nan/nan`) are left out.

use std::marker::PhantomData;

use anyhow::{anyhow, Context, Result};

use crate::{
    csv_table::read_model_table,
    debug,
    mean_std::MeanStd,
    model_name::ModelName,
    model_table::ModelTable,
    results_layout::{ResultTable, ResultsLayout},
    stats::Stats,
    units::{MilliSeconds, RequestsPerSecond},
    warn,
};

/// Only the means of the cells of a table; NaN for missing cells.
pub fn read_mean_table(
    layout: &ResultsLayout,
    table: ResultTable,
    models: &[ModelName],
) -> Result<ModelTable<f64>> {
    let path = layout.table_path(table);
    debug!("reading table {:?} from {path:?}", table.title());
    let cells: ModelTable<MeanStd> = read_model_table(&path, models)
        .with_context(|| anyhow!("reading the {:?} table", table.title()))?;
    Ok(cells.map(|cell| if cell.is_missing() { f64::NAN } else { cell.mean }))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub value: f64,
    pub error: f64,
}

impl Bar {
    pub fn top(&self) -> f64 {
        self.value + self.error
    }
}

/// One bar per HP model, in model order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSeries<Unit> {
    unit: PhantomData<fn() -> Unit>,
    pub bars: Vec<Bar>,
}

impl<Unit> ColumnSeries<Unit> {
    pub fn from_table(table: &ModelTable<f64>) -> Result<Self> {
        let bars = table
            .models()
            .iter()
            .enumerate()
            .map(|(col, hp)| -> Result<Bar> {
                let values: Vec<f64> =
                    table.column(col).copied().filter(|v| !v.is_nan()).collect();
                if values.is_empty() {
                    warn!("no results in the column of HP model {hp}, its bar is left empty");
                    return Ok(Bar {
                        value: 0.,
                        error: 0.,
                    });
                }
                let stats = Stats::<Unit>::from_f64s(&values)
                    .with_context(|| anyhow!("column of HP model {hp}"))?;
                Ok(Bar {
                    value: stats.mean,
                    error: stats.sample_standard_deviation(),
                })
            })
            .collect::<Result<_>>()?;
        Ok(Self {
            unit: PhantomData,
            bars,
        })
    }

    pub fn max_top(&self) -> f64 {
        self.bars.iter().map(Bar::top).fold(0., f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LatencySeries {
    pub mps: ColumnSeries<MilliSeconds>,
    pub ideal: ColumnSeries<MilliSeconds>,
}

/// A stacked bar: HP throughput at the bottom, BE throughput on top.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedThroughput {
    pub hp: ColumnSeries<RequestsPerSecond>,
    pub be: ColumnSeries<RequestsPerSecond>,
}

impl StackedThroughput {
    /// Upper end of the highest error bar.
    pub fn max_top(&self) -> f64 {
        self.hp
            .bars
            .iter()
            .zip(&self.be.bars)
            .map(|(hp, be)| (hp.value + be.top()).max(hp.top()))
            .fold(0., f64::max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputSeries {
    pub mps: StackedThroughput,
    pub ideal: StackedThroughput,
}

/// MPS latency divided by ideal latency, per cell; 0 where the ideal
/// latency is not positive, NaN where the MPS latency is missing.
pub fn slowdown_table(
    mps_latency: &ModelTable<f64>,
    ideal_latency: &ModelTable<f64>,
) -> Result<ModelTable<f64>> {
    mps_latency
        .zip_with(ideal_latency, |mps, ideal| {
            if mps.is_nan() {
                f64::NAN
            } else if *ideal > 0. {
                mps / ideal
            } else {
                0.
            }
        })
        .ok_or_else(|| anyhow!("MPS and ideal latency tables are over different models"))
}

/// Everything the three charts show.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub models: Vec<ModelName>,
    pub latency: LatencySeries,
    pub throughput: ThroughputSeries,
    pub slowdown: ModelTable<f64>,
}

impl PlotData {
    /// Reads all six tables; fails before anything is drawn if one is
    /// missing or malformed.
    pub fn read(layout: &ResultsLayout, models: &[ModelName]) -> Result<Self> {
        let read = |table| read_mean_table(layout, table, models);
        let mps_latency = read(ResultTable::MpsLatency)?;
        let ideal_latency = read(ResultTable::IdealLatency)?;
        let mps_hp_throughput = read(ResultTable::MpsHpThroughput)?;
        let mps_be_throughput = read(ResultTable::MpsBeThroughput)?;
        let ideal_hp_throughput = read(ResultTable::IdealHpThroughput)?;
        let ideal_be_throughput = read(ResultTable::IdealBeThroughput)?;

        Ok(PlotData {
            models: models.to_owned(),
            latency: LatencySeries {
                mps: ColumnSeries::from_table(&mps_latency)?,
                ideal: ColumnSeries::from_table(&ideal_latency)?,
            },
            throughput: ThroughputSeries {
                mps: StackedThroughput {
                    hp: ColumnSeries::from_table(&mps_hp_throughput)?,
                    be: ColumnSeries::from_table(&mps_be_throughput)?,
                },
                ideal: StackedThroughput {
                    hp: ColumnSeries::from_table(&ideal_hp_throughput)?,
                    be: ColumnSeries::from_table(&ideal_be_throughput)?,
                },
            },
            slowdown: slowdown_table(&mps_latency, &ideal_latency)?,
        })
    }

    /// The slowdown matrix with cells formatted for the CSV file.
    pub fn slowdown_strings(&self) -> ModelTable<String> {
        self.slowdown.map(|x| {
            if x.is_nan() {
                "nan".into()
            } else {
                format!("{x:.2}")
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn models(names: &[&str]) -> Vec<ModelName> {
        names.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn t_column_series() -> Result<()> {
        let models = models(&["A", "B", "C"]);
        // value depends on the row only, so every column is 1, 2, 6
        let table = ModelTable::from_index_fn(&models, |row, _| [1., 2., 6.][row]);
        let series = ColumnSeries::<MilliSeconds>::from_table(&table)?;
        assert_eq!(series.bars.len(), 3);
        for bar in &series.bars {
            assert_relative_eq!(bar.value, 3.);
            // sample std: sqrt((4 + 1 + 9) / 2)
            assert_relative_eq!(bar.error, 7f64.sqrt());
        }
        assert_relative_eq!(series.max_top(), 3. + 7f64.sqrt());
        Ok(())
    }

    #[test]
    fn t_single_model_has_no_error() -> Result<()> {
        let models = models(&["A"]);
        let table = ModelTable::from_index_fn(&models, |_, _| 4.5);
        let series = ColumnSeries::<RequestsPerSecond>::from_table(&table)?;
        assert_eq!(series.bars, [Bar { value: 4.5, error: 0. }]);
        Ok(())
    }

    #[test]
    fn t_missing_cells_are_left_out() -> Result<()> {
        let models = models(&["A", "B", "C"]);
        let table = ModelTable::from_index_fn(&models, |row, col| match (row, col) {
            (1, 0) => f64::NAN,
            (_, 2) => f64::NAN,
            _ => [1., 2., 3.][row],
        });
        let series = ColumnSeries::<MilliSeconds>::from_table(&table)?;
        // column A: 1, 3
        assert_relative_eq!(series.bars[0].value, 2.);
        assert_relative_eq!(series.bars[0].error, 2f64.sqrt());
        assert_relative_eq!(series.bars[1].value, 2.);
        assert_eq!(series.bars[2], Bar { value: 0., error: 0. });
        assert_relative_eq!(series.max_top(), 2. + 2f64.sqrt());

        let ideal = ModelTable::from_index_fn(&models, |_, _| 2.);
        let slowdown = slowdown_table(&table, &ideal)?;
        assert!(slowdown.at(1, 0).is_nan());
        assert_eq!(*slowdown.at(0, 0), 0.5);
        Ok(())
    }

    #[test]
    fn t_slowdown() -> Result<()> {
        let models = models(&["A", "B"]);
        let mps = ModelTable::from_index_fn(&models, |row, col| (row * 2 + col + 1) as f64);
        let ideal = ModelTable::from_index_fn(&models, |_, col| [2., 0.][col]);
        let slowdown = slowdown_table(&mps, &ideal)?;
        assert_eq!(slowdown.row(0), [0.5, 0.]);
        assert_eq!(slowdown.row(1), [1.5, 0.]);

        let data_strings = slowdown.map(|x| format!("{x:.2}"));
        assert_eq!(data_strings.row(1), ["1.50", "0.00"]);

        let other = ModelTable::from_index_fn(&models[..1], |_, _| 1.);
        assert!(slowdown_table(&mps, &other).is_err());
        Ok(())
    }

    #[test]
    fn t_stacked_max_top() {
        let bar = |value, error| Bar { value, error };
        let stacked = StackedThroughput {
            hp: ColumnSeries {
                unit: PhantomData,
                bars: vec![bar(10., 1.), bar(100., 50.)],
            },
            be: ColumnSeries {
                unit: PhantomData,
                bars: vec![bar(5., 2.), bar(1., 0.)],
            },
        };
        // 10 + 5 + 2 = 17 vs. max(101, 150)
        assert_eq!(stacked.max_top(), 150.);
    }
}
