//! Aggregation and plotting of GPU sharing benchmark results (MPS vs.
//! each model running alone), and the driver producing the latter.

pub mod aggregate;
pub mod config_file;
pub mod csv_table;
pub mod experiment_config;
pub mod io_utils;
pub mod mean_std;
pub mod model_name;
pub mod model_table;
pub mod plot;
pub mod raw_result;
pub mod results_layout;
pub mod run;
pub mod stats;
pub mod table_view;
pub mod terminal_table;
pub mod units;
pub mod utillib;

pub const GPUSHARE_EVAL_VERSION: &str = env!("CARGO_PKG_VERSION");
