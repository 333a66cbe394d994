use anyhow::Result;
use clap::Parser;

use gpushare_eval::{
    experiment_config::ExperimentConfigOpts,
    info,
    plot::plot_results,
    utillib::{
        get_terminal_width::get_terminal_width,
        logging::{set_log_level, LogLevelOpt},
    },
    GPUSHARE_EVAL_VERSION,
};

const PROGRAM_NAME: &str = "gpushare-plot";

#[derive(clap::Parser, Debug)]
#[clap(next_line_help = true)]
#[clap(set_term_width = get_terminal_width())]
#[clap(version)]
/// Draw the latency, throughput and slowdown charts from the CSV
/// tables written by `gpushare-aggregate`.
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpt,

    #[clap(flatten)]
    config_opts: ExperimentConfigOpts,
}

fn main() -> Result<()> {
    let Opts {
        log_level,
        config_opts,
    } = Opts::parse();

    set_log_level(log_level.try_into()?);
    info!("{PROGRAM_NAME} version {GPUSHARE_EVAL_VERSION}");

    let config = config_opts.load()?;
    let layout = config.results_layout()?;
    plot_results(&config, &layout)
}
