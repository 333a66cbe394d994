//! The plotter: reads the aggregated tables back and draws the
//! comparison charts.

pub mod charts;
pub mod colormap;
pub mod series;

use std::borrow::Cow;

use anyhow::Result;

use crate::{
    csv_table::write_table_view_csv,
    experiment_config::ExperimentConfig,
    info,
    model_table::NamedModelTable,
    results_layout::{Chart, ResultTable, ResultsLayout},
};

use self::{
    charts::{draw_latency_chart, draw_slowdown_heatmap, draw_throughput_chart},
    series::PlotData,
};

pub fn plot_results(config: &ExperimentConfig, layout: &ResultsLayout) -> Result<()> {
    let data = PlotData::read(layout, &config.model_names())?;

    let slowdown_strings = data.slowdown_strings();
    write_table_view_csv(
        &NamedModelTable {
            name: Cow::Borrowed(ResultTable::MpsSlowdown.title()),
            table: &slowdown_strings,
        },
        &layout.table_path(ResultTable::MpsSlowdown),
    )?;

    info!("creating latency comparison chart");
    draw_latency_chart(&data, &config.plot, &layout.chart_path(Chart::Latency))?;
    info!("creating throughput comparison chart");
    draw_throughput_chart(&data, &config.plot, &layout.chart_path(Chart::Throughput))?;
    info!("creating slowdown heatmap");
    draw_slowdown_heatmap(
        &data,
        &config.plot,
        &layout.chart_path(Chart::SlowdownHeatmap),
    )?;
    Ok(())
}
