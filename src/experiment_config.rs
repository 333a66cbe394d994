//! The configuration shared by all three pipeline stages: which
//! models take part, how many runs there are per model or pair, where
//! the results live, and how the external launcher is invoked.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::PathBuf,
};

use anyhow::{bail, Result};

use crate::{
    config_file::LoadConfigFile,
    info,
    model_name::ModelName,
    results_layout::ResultsLayout,
    utillib::home::{home_dir, path_resolve_home},
};

/// A model taking part in the experiments, with the short name that
/// its launcher config file is named after.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    pub name: ModelName,
    /// E.g. "rnet" for `config_files/ideal/rnet_inf.json`
    pub short_name: String,
}

impl ModelSpec {
    fn new(name: &str, short_name: &str) -> Self {
        Self {
            name: name.parse().expect("built-in model names are valid"),
            short_name: short_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct LauncherConfig {
    /// The program to execute
    pub program: PathBuf,
    /// Arguments given before `--algo` and `--config_file`
    pub arguments: Vec<String>,
    /// Value of the `--algo` argument
    pub algo: String,
    /// Path given via `--config_file`, with `{short_name}` replaced by
    /// the model's short name
    pub config_file_template: String,
    /// Directory the launcher is run in, and where it leaves its
    /// output file
    pub working_dir: PathBuf,
    /// The file name the launcher writes its result to
    pub output_file: PathBuf,
    /// Environment variables to set for the launcher; `~/` at the
    /// start of any `:`-separated element is resolved to the home
    /// directory
    pub env: BTreeMap<String, String>,
}

const DEFAULT_LD_PRELOAD: &[&str] = &[
    "~/orion/src/cuda_capture/libinttemp.so",
    "~/.local/lib/python3.10/site-packages/nvidia/cudnn/lib/libcudnn.so.9",
    "~/.local/lib/python3.10/site-packages/nvidia/cublas/lib/libcublasLt.so.12",
    "~/.local/lib/python3.10/site-packages/nvidia/cublas/lib/libcublas.so.12",
];

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            program: "python3".into(),
            arguments: vec!["../../benchmarking/launch_jobs.py".into()],
            algo: "orion".into(),
            config_file_template: "config_files/ideal/{short_name}_inf.json".into(),
            working_dir: ".".into(),
            output_file: "client_0.json".into(),
            env: [("LD_PRELOAD".to_string(), DEFAULT_LD_PRELOAD.join(":"))].into(),
        }
    }
}

impl LauncherConfig {
    pub fn config_file_for(&self, model: &ModelSpec) -> String {
        self.config_file_template
            .replace("{short_name}", &model.short_name)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct PlotConfig {
    /// Shown in parentheses in the chart titles, e.g. the GPU name
    pub device_label: String,
    /// Image size in pixels
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            device_label: "RTX 6000".into(),
            width: 1200,
            height: 700,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct ExperimentConfig {
    /// The models, in table and chart order
    pub models: Vec<ModelSpec>,
    /// How many runs were done per model (ideal) or pair (MPS)
    pub num_runs: usize,
    pub results_dir: PathBuf,
    pub launcher: LauncherConfig,
    pub plot: PlotConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            models: vec![
                ModelSpec::new("ResNet50", "rnet"),
                ModelSpec::new("MobileNetV2", "mnet"),
                ModelSpec::new("ResNet101", "rnet101"),
                ModelSpec::new("BERT", "bert"),
            ],
            num_runs: 1,
            results_dir: "results".into(),
            launcher: LauncherConfig::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl ExperimentConfig {
    pub fn model_names(&self) -> Vec<ModelName> {
        self.models.iter().map(|m| m.name.clone()).collect()
    }

    pub fn check(&self) -> Result<()> {
        if self.models.is_empty() {
            bail!("the `models` list must not be empty")
        }
        let mut seen = BTreeSet::new();
        for model in &self.models {
            if !seen.insert(&model.name) {
                bail!("model {} is listed more than once", model.name)
            }
        }
        if self.num_runs == 0 {
            bail!("`num_runs` must be at least 1")
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            bail!("plot width and height must be non-zero")
        }
        Ok(())
    }

    pub fn results_layout(&self) -> Result<ResultsLayout> {
        Ok(ResultsLayout::new(path_resolve_home(&self.results_dir)?))
    }
}

/// The options shared by all programs for getting the configuration.
#[derive(clap::Args, Debug)]
pub struct ExperimentConfigOpts {
    /// Override the path to the config file (default: the paths
    /// `~/.gpushare-eval.*` where a single one exists where the `*` is
    /// the suffix for one of the supported config file formats (json5,
    /// json, yml, yaml, ron), and if those are missing, use
    /// compiled-in default config values)
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Override the `results_dir` setting from the config
    #[clap(long)]
    pub results_dir: Option<PathBuf>,
}

impl ExperimentConfigOpts {
    /// Load and check the config, with the overrides applied.
    pub fn load(&self) -> Result<ExperimentConfig> {
        let mut config = ExperimentConfig::load_config(self.config.as_ref(), |msg| {
            info!("{msg}; using the built-in defaults");
            Ok(ExperimentConfig::default())
        })?;
        if let Some(results_dir) = &self.results_dir {
            config.results_dir = results_dir.clone();
        }
        config.check()?;
        Ok(config)
    }
}

impl LoadConfigFile for ExperimentConfig {
    fn default_config_path_without_suffix() -> Result<Option<PathBuf>> {
        let home = home_dir()?;
        Ok(Some(home.join(".gpushare-eval")))
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config_file::ConfigBackend;

    use super::*;

    #[test]
    fn t_default_is_valid() -> Result<()> {
        let config = ExperimentConfig::default();
        config.check()?;
        let names: Vec<String> = config.model_names().iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["ResNet50", "MobileNetV2", "ResNet101", "BERT"]);
        assert_eq!(
            config.launcher.config_file_for(&config.models[2]),
            "config_files/ideal/rnet101_inf.json"
        );
        Ok(())
    }

    #[test]
    fn t_partial_json5_uses_defaults() -> Result<()> {
        let s = r#"{
            // two models only
            models: [ { name: "BERT", short_name: "bert" },
                      { name: "ResNet50", short_name: "rnet" } ],
            num_runs: 3,
        }"#;
        let config: ExperimentConfig =
            ConfigBackend::Json5.from_str_with_path(s, Path::new("test.json5"))?;
        config.check()?;
        assert_eq!(config.num_runs, 3);
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.results_dir, PathBuf::from("results"));
        assert_eq!(config.launcher, LauncherConfig::default());
        Ok(())
    }

    #[test]
    fn t_yaml() -> Result<()> {
        let s = "num_runs: 2\nresults_dir: out\nplot:\n  device_label: H100\n";
        let config: ExperimentConfig =
            ConfigBackend::Yaml.from_str_with_path(s, Path::new("test.yaml"))?;
        assert_eq!(config.results_dir, PathBuf::from("out"));
        assert_eq!(config.plot.device_label, "H100");
        assert_eq!(config.plot.width, 1200);
        Ok(())
    }

    #[test]
    fn t_check_rejects() {
        let mut config = ExperimentConfig::default();
        config.num_runs = 0;
        assert!(config.check().is_err());

        let mut config = ExperimentConfig::default();
        config.models.push(config.models[0].clone());
        assert!(config.check().is_err());

        let mut config = ExperimentConfig::default();
        config.models.clear();
        assert!(config.check().is_err());
    }

    #[test]
    fn t_opts_override() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("conf.yml");
        std::fs::write(&path, "num_runs: 4\n")?;
        let opts = ExperimentConfigOpts {
            config: Some(path),
            results_dir: Some("elsewhere".into()),
        };
        let config = opts.load()?;
        assert_eq!(config.num_runs, 4);
        assert_eq!(config.results_layout()?.base_dir(), Path::new("elsewhere"));

        std::fs::write(dir.path().join("bad.yml"), "num_runs: 0\n")?;
        let opts = ExperimentConfigOpts {
            config: Some(dir.path().join("bad.yml")),
            results_dir: None,
        };
        assert!(opts.load().is_err());
        Ok(())
    }

    #[test]
    fn t_unknown_field_rejected() {
        let s = "{ num_run: 2 }";
        assert!(ConfigBackend::Json5
            .from_str_with_path::<ExperimentConfig>(s, Path::new("x.json5"))
            .is_err());
    }
}
