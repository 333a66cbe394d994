//! Turning the per-run JSON files into the summary tables.
//!
//! The ideal tables only depend on the one workload that ran alone:
//! the statistic of model `m` is repeated across the whole column
//! (HP tables) or row (BE table) of `m`. The MPS tables have one
//! statistic per (BE, HP) pair.
//!
//! All input files are read and all statistics computed before any
//! table is written, so a missing or invalid input leaves no output
//! behind.

use std::{borrow::Cow, io::Write};

use anyhow::{anyhow, Context, Result};

use crate::{
    csv_table::write_table_view_csv,
    experiment_config::ExperimentConfig,
    info,
    mean_std::MeanStd,
    model_name::ModelName,
    model_table::{ModelTable, NamedModelTable},
    raw_result::{IdealRunResult, MpsRunResult},
    results_layout::{ResultTable, ResultsLayout},
    stats::Stats,
    table_view::TableView,
    terminal_table::print_table_view,
    units::{MicroSeconds, MilliSeconds, RequestsPerSecond},
    warn,
};

/// Statistics over the ideal runs of one model.
#[derive(Debug)]
pub struct IdealModelStats {
    pub throughput: Stats<RequestsPerSecond>,
    pub latency: Stats<MicroSeconds>,
}

impl IdealModelStats {
    /// Averaged in microseconds, mean and standard deviation then
    /// converted to milliseconds.
    pub fn latency_mean_std(&self) -> MeanStd {
        MeanStd {
            mean: self.latency.mean_typed().to_millis().0,
            std: MicroSeconds(self.latency.standard_deviation())
                .to_millis()
                .0,
        }
    }
}

pub fn ideal_model_stats(
    layout: &ResultsLayout,
    model: &ModelName,
    num_runs: usize,
) -> Result<IdealModelStats> {
    let mut throughputs = Vec::with_capacity(num_runs);
    let mut latencies = Vec::with_capacity(num_runs);
    for run in 0..num_runs {
        let IdealRunResult {
            throughput,
            p95_latency,
        } = IdealRunResult::read_file(&layout.ideal_run_path(model, run))?;
        throughputs.push(throughput);
        latencies.push(p95_latency);
    }
    let ctx = || anyhow!("ideal results for model {model}");
    Ok(IdealModelStats {
        throughput: Stats::from_values(throughputs).with_context(ctx)?,
        latency: Stats::from_values(latencies).with_context(ctx)?,
    })
}

#[derive(Debug)]
pub struct MpsPairValues {
    pub hp_latency: Stats<MilliSeconds>,
    pub hp_throughput: Stats<RequestsPerSecond>,
    pub be_throughput: Stats<RequestsPerSecond>,
}

/// Statistics over the MPS runs of one (BE, HP) pair. Runs with an
/// empty result are skipped; `values` is `None` if no run has a
/// result.
#[derive(Debug)]
pub struct MpsPairStats {
    pub num_samples: usize,
    pub values: Option<MpsPairValues>,
}

impl MpsPairStats {
    fn cell<T>(&self, stats: impl Fn(&MpsPairValues) -> &Stats<T>) -> MeanStd {
        self.values
            .as_ref()
            .map_or(MeanStd::MISSING, |values| stats(values).mean_std())
    }

    pub fn hp_latency(&self) -> MeanStd {
        self.cell(|v| &v.hp_latency)
    }

    pub fn hp_throughput(&self) -> MeanStd {
        self.cell(|v| &v.hp_throughput)
    }

    pub fn be_throughput(&self) -> MeanStd {
        self.cell(|v| &v.be_throughput)
    }
}

pub fn mps_pair_stats(
    layout: &ResultsLayout,
    be: &ModelName,
    hp: &ModelName,
    num_runs: usize,
) -> Result<MpsPairStats> {
    let mut hp_latencies = Vec::with_capacity(num_runs);
    let mut hp_throughputs = Vec::with_capacity(num_runs);
    let mut be_throughputs = Vec::with_capacity(num_runs);
    for run in 0..num_runs {
        if let Some(MpsRunResult {
            hp_throughput,
            be_throughput,
            hp_p95_latency,
        }) = MpsRunResult::read_file(&layout.mps_run_path(hp, be, run))?
        {
            hp_latencies.push(hp_p95_latency.to_millis());
            hp_throughputs.push(hp_throughput);
            be_throughputs.push(be_throughput);
        }
    }
    let num_samples = hp_latencies.len();
    if num_samples == 0 {
        return Ok(MpsPairStats {
            num_samples,
            values: None,
        });
    }
    let ctx = || anyhow!("MPS results for HP model {hp} with BE model {be}, {num_runs} runs");
    Ok(MpsPairStats {
        num_samples,
        values: Some(MpsPairValues {
            hp_latency: Stats::from_values(hp_latencies).with_context(ctx)?,
            hp_throughput: Stats::from_values(hp_throughputs).with_context(ctx)?,
            be_throughput: Stats::from_values(be_throughputs).with_context(ctx)?,
        }),
    })
}

/// All tables the aggregator produces. Rows are BE, columns HP.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateTables {
    pub ideal_hp_throughput: ModelTable<MeanStd>,
    pub ideal_be_throughput: ModelTable<MeanStd>,
    pub ideal_latency: ModelTable<MeanStd>,
    pub mps_latency: ModelTable<MeanStd>,
    pub mps_hp_throughput: ModelTable<MeanStd>,
    pub mps_be_throughput: ModelTable<MeanStd>,
    /// How many non-empty MPS runs each cell of the MPS tables is
    /// based on
    pub mps_sample_counts: ModelTable<usize>,
}

impl AggregateTables {
    pub fn from_results(config: &ExperimentConfig, layout: &ResultsLayout) -> Result<Self> {
        let models = config.model_names();
        let num_runs = config.num_runs;

        info!("processing ideal results in {:?}", layout.ideal_dir());
        let ideal: Vec<IdealModelStats> = models
            .iter()
            .map(|model| ideal_model_stats(layout, model, num_runs))
            .collect::<Result<_>>()?;
        // HP values repeat down their column, BE values along their row
        let ideal_hp_throughput =
            ModelTable::from_index_fn(&models, |_be, hp| ideal[hp].throughput.mean_std());
        let ideal_be_throughput =
            ModelTable::from_index_fn(&models, |be, _hp| ideal[be].throughput.mean_std());
        let ideal_latency =
            ModelTable::from_index_fn(&models, |_be, hp| ideal[hp].latency_mean_std());

        info!("processing MPS results in {:?}", layout.mps_dir());
        let mps: ModelTable<MpsPairStats> =
            ModelTable::try_from_fn(&models, |be, hp| mps_pair_stats(layout, be, hp, num_runs))?;
        for (be, row) in mps.rows() {
            for (hp, pair) in models.iter().zip(row) {
                let n = pair.num_samples;
                if n == 0 {
                    warn!(
                        "MPS results for HP model {hp} with BE model {be}: none of the \
                         {num_runs} runs has a result, the cells are left as nan"
                    );
                } else if n < num_runs {
                    warn!(
                        "MPS results for HP model {hp} with BE model {be}: only {n} of \
                         {num_runs} runs have a result"
                    );
                }
            }
        }

        Ok(AggregateTables {
            ideal_hp_throughput,
            ideal_be_throughput,
            ideal_latency,
            mps_latency: mps.map(MpsPairStats::hp_latency),
            mps_hp_throughput: mps.map(MpsPairStats::hp_throughput),
            mps_be_throughput: mps.map(MpsPairStats::be_throughput),
            mps_sample_counts: mps.map(|p| p.num_samples),
        })
    }

    /// In the order they are printed.
    pub fn table_views(&self) -> Vec<(ResultTable, Box<dyn TableView + '_>)> {
        fn view<T: std::fmt::Display>(
            table: ResultTable,
            model_table: &ModelTable<T>,
        ) -> (ResultTable, Box<dyn TableView + '_>) {
            (
                table,
                Box::new(NamedModelTable {
                    name: Cow::Borrowed(table.title()),
                    table: model_table,
                }),
            )
        }
        vec![
            view(ResultTable::IdealHpThroughput, &self.ideal_hp_throughput),
            view(ResultTable::IdealBeThroughput, &self.ideal_be_throughput),
            view(ResultTable::IdealLatency, &self.ideal_latency),
            view(ResultTable::MpsLatency, &self.mps_latency),
            view(ResultTable::MpsHpThroughput, &self.mps_hp_throughput),
            view(ResultTable::MpsBeThroughput, &self.mps_be_throughput),
            view(ResultTable::MpsSampleCounts, &self.mps_sample_counts),
        ]
    }

    pub fn write_csv_files(&self, layout: &ResultsLayout) -> Result<()> {
        for (table, view) in self.table_views() {
            let path = layout.table_path(table);
            write_table_view_csv(&*view, &path)?;
        }
        Ok(())
    }

    pub fn print(&self, tsv_mode: bool, out: &mut impl Write) -> Result<()> {
        for (_, view) in self.table_views() {
            print_table_view(&*view, tsv_mode, out)?;
        }
        Ok(())
    }
}
