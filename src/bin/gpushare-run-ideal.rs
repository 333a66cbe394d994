use anyhow::Result;
use clap::Parser;

use gpushare_eval::{
    experiment_config::ExperimentConfigOpts,
    info,
    run::ideal::{run_ideal, DryRun},
    utillib::{
        get_terminal_width::get_terminal_width,
        logging::{set_log_level, LogLevelOpt},
    },
    GPUSHARE_EVAL_VERSION,
};

const PROGRAM_NAME: &str = "gpushare-run-ideal";

#[derive(clap::Parser, Debug)]
#[clap(next_line_help = true)]
#[clap(set_term_width = get_terminal_width())]
#[clap(version)]
/// Run every configured model alone via the launcher, `num_runs`
/// times, and move each result to `ideal/{model}_{run}_hp.json` in
/// the results directory.
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpt,

    #[clap(flatten)]
    config_opts: ExperimentConfigOpts,

    /// Only print the commands that would be run
    #[clap(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let Opts {
        log_level,
        config_opts,
        dry_run,
    } = Opts::parse();

    set_log_level(log_level.try_into()?);
    info!("{PROGRAM_NAME} version {GPUSHARE_EVAL_VERSION}");

    let config = config_opts.load()?;
    let layout = config.results_layout()?;
    run_ideal(
        &config,
        &layout,
        if dry_run {
            DryRun::Print
        } else {
            DryRun::Execute
        },
    )
}
