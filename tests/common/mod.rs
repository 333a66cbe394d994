//! A results directory in a temporary location, with helpers to
//! populate it with raw run results.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use anyhow::Result;
use gpushare_eval::{
    experiment_config::ExperimentConfig, model_name::ModelName, results_layout::ResultsLayout,
};
use tempfile::TempDir;

pub struct ResultsTree {
    // kept for its Drop
    pub dir: TempDir,
    pub config: ExperimentConfig,
    pub layout: ResultsLayout,
}

pub fn model(name: &str) -> ModelName {
    name.parse().expect("valid model name")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::create_dir_all(path.parent().expect("has parent"))?;
    std::fs::write(path, contents)?;
    Ok(())
}

impl ResultsTree {
    /// The default four models, `num_runs` runs each.
    pub fn new(num_runs: usize) -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let mut config = ExperimentConfig::default();
        config.num_runs = num_runs;
        config.results_dir = dir.path().join("results");
        let layout = config.results_layout()?;
        Ok(Self {
            dir,
            config,
            layout,
        })
    }

    pub fn results_dir(&self) -> PathBuf {
        self.layout.base_dir().to_owned()
    }

    pub fn write_ideal(&self, model_name: &str, run: usize, throughput: f64, p95_us: f64) -> Result<()> {
        write_file(
            &self.layout.ideal_run_path(&model(model_name), run),
            &format!(r#"{{"throughput": {throughput:?}, "p95_latency": {p95_us:?}}}"#),
        )
    }

    pub fn write_mps_json(&self, hp: &str, be: &str, run: usize, json: &str) -> Result<()> {
        write_file(&self.layout.mps_run_path(&model(hp), &model(be), run), json)
    }

    pub fn write_mps(
        &self,
        hp: &str,
        be: &str,
        run: usize,
        hp_throughput: f64,
        be_throughput: f64,
        hp_p95_us: f64,
    ) -> Result<()> {
        self.write_mps_json(
            hp,
            be,
            run,
            &format!(
                r#"{{"throughput-0": {hp_throughput:?}, "throughput-1": {be_throughput:?}, "p95-latency-0": {hp_p95_us:?}}}"#
            ),
        )
    }

    /// Every input file, all with the same values: ideal 200 req/s at
    /// 10 ms, MPS 100 + 50 req/s at 20 ms.
    pub fn fill_uniform(&self) -> Result<()> {
        let models = self.config.model_names();
        for run in 0..self.config.num_runs {
            for m in &models {
                self.write_ideal(m.as_str(), run, 200., 10000.)?;
            }
            for hp in &models {
                for be in &models {
                    self.write_mps(hp.as_str(), be.as_str(), run, 100., 50., 20000.)?;
                }
            }
        }
        Ok(())
    }

    /// Names of the plain files in the results directory, sorted.
    pub fn file_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.layout.base_dir())? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Names of the CSV files in the results directory.
    pub fn csv_files(&self) -> Result<Vec<String>> {
        Ok(self
            .file_names()?
            .into_iter()
            .filter(|name| name.ends_with(".csv"))
            .collect())
    }
}
