use std::io::stdout;

use anyhow::Result;
use clap::Parser;

use gpushare_eval::{
    aggregate::AggregateTables,
    experiment_config::ExperimentConfigOpts,
    info,
    utillib::{
        get_terminal_width::get_terminal_width,
        logging::{set_log_level, LogLevelOpt},
    },
    GPUSHARE_EVAL_VERSION,
};

const PROGRAM_NAME: &str = "gpushare-aggregate";

#[derive(clap::Parser, Debug)]
#[clap(next_line_help = true)]
#[clap(set_term_width = get_terminal_width())]
#[clap(version)]
/// Read the raw per-run JSON results (`ideal/` and `mps/` in the
/// results directory), write the summary CSV tables next to them and
/// print the tables.
struct Opts {
    #[clap(flatten)]
    log_level: LogLevelOpt,

    #[clap(flatten)]
    config_opts: ExperimentConfigOpts,

    /// Print the tables tab-separated instead of aligned
    #[clap(long)]
    tsv: bool,

    /// Do not print the tables, only write the CSV files
    #[clap(long)]
    no_print: bool,
}

fn main() -> Result<()> {
    let Opts {
        log_level,
        config_opts,
        tsv,
        no_print,
    } = Opts::parse();

    set_log_level(log_level.try_into()?);
    info!("{PROGRAM_NAME} version {GPUSHARE_EVAL_VERSION}");

    let config = config_opts.load()?;
    let layout = config.results_layout()?;

    let tables = AggregateTables::from_results(&config, &layout)?;
    tables.write_csv_files(&layout)?;
    if !no_print {
        tables.print(tsv, &mut stdout().lock())?;
    }
    Ok(())
}
