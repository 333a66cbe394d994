//! The fixed file layout below the results directory.

use std::path::{Path, PathBuf};

use crate::model_name::ModelName;

pub const IDEAL_SUBDIR: &str = "ideal";
pub const MPS_SUBDIR: &str = "mps";

/// The tables written by the aggregator, in the order they are
/// printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultTable {
    IdealHpThroughput,
    IdealBeThroughput,
    IdealLatency,
    MpsLatency,
    MpsHpThroughput,
    MpsBeThroughput,
    /// Number of non-empty MPS runs per cell
    MpsSampleCounts,
    /// Written by the plotter
    MpsSlowdown,
}

impl ResultTable {
    pub fn file_name(self) -> &'static str {
        match self {
            ResultTable::IdealHpThroughput => "ideal_hp_throughput.csv",
            ResultTable::IdealBeThroughput => "ideal_be_throughput.csv",
            ResultTable::IdealLatency => "ideal_latency.csv",
            ResultTable::MpsLatency => "mps_latency.csv",
            ResultTable::MpsHpThroughput => "mps_hp_throughput.csv",
            ResultTable::MpsBeThroughput => "mps_be_throughput.csv",
            ResultTable::MpsSampleCounts => "mps_sample_counts.csv",
            ResultTable::MpsSlowdown => "mps_slowdown.csv",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ResultTable::IdealHpThroughput => "Ideal HP Throughput",
            ResultTable::IdealBeThroughput => "Ideal BE Throughput",
            ResultTable::IdealLatency => "Ideal Latency (ms)",
            ResultTable::MpsLatency => "MPS Latency (ms)",
            ResultTable::MpsHpThroughput => "MPS HP Throughput",
            ResultTable::MpsBeThroughput => "MPS BE Throughput",
            ResultTable::MpsSampleCounts => "MPS Sample Counts",
            ResultTable::MpsSlowdown => "MPS Latency Slowdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chart {
    Latency,
    Throughput,
    SlowdownHeatmap,
}

impl Chart {
    pub fn file_name(self) -> &'static str {
        match self {
            Chart::Latency => "mps_vs_ideal_latency.png",
            Chart::Throughput => "mps_vs_ideal_throughput.png",
            Chart::SlowdownHeatmap => "mps_slowdown_heatmap.png",
        }
    }
}

/// Paths of all files below a results directory.
#[derive(Debug, Clone)]
pub struct ResultsLayout {
    base_dir: PathBuf,
}

impl ResultsLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn ideal_dir(&self) -> PathBuf {
        self.base_dir.join(IDEAL_SUBDIR)
    }

    pub fn mps_dir(&self) -> PathBuf {
        self.base_dir.join(MPS_SUBDIR)
    }

    /// `ideal/{model}_{run}_hp.json`
    pub fn ideal_run_path(&self, model: &ModelName, run: usize) -> PathBuf {
        self.ideal_dir().join(format!("{model}_{run}_hp.json"))
    }

    /// `mps/{hp}_{be}_{run}.json`
    pub fn mps_run_path(&self, hp: &ModelName, be: &ModelName, run: usize) -> PathBuf {
        self.mps_dir().join(format!("{hp}_{be}_{run}.json"))
    }

    pub fn table_path(&self, table: ResultTable) -> PathBuf {
        self.base_dir.join(table.file_name())
    }

    pub fn chart_path(&self, chart: Chart) -> PathBuf {
        self.base_dir.join(chart.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_paths() {
        let layout = ResultsLayout::new("results");
        let bert: ModelName = "BERT".parse().unwrap();
        let rnet: ModelName = "ResNet50".parse().unwrap();
        assert_eq!(
            layout.ideal_run_path(&bert, 0),
            PathBuf::from("results/ideal/BERT_0_hp.json")
        );
        assert_eq!(
            layout.mps_run_path(&bert, &rnet, 2),
            PathBuf::from("results/mps/BERT_ResNet50_2.json")
        );
        assert_eq!(
            layout.table_path(ResultTable::MpsLatency),
            PathBuf::from("results/mps_latency.csv")
        );
        assert_eq!(
            layout.chart_path(Chart::SlowdownHeatmap),
            PathBuf::from("results/mps_slowdown_heatmap.png")
        );
    }
}
