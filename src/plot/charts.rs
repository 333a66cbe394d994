//! Rendering of the three PNG charts.

use std::path::Path;

use anyhow::Result;
use plotters::{
    coord::{cartesian::Cartesian2d, types::RangedCoordf64, Shift},
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    experiment_config::PlotConfig,
    io_utils::tempfile_utils::Tempfile,
    model_name::ModelName,
    units::{MilliSeconds, RequestsPerSecond, UnitShort},
};

use super::{
    colormap::{scaled_color, yl_or_rd},
    series::{Bar, ColumnSeries, PlotData, StackedThroughput},
};

const MPS_COLOR: RGBColor = RGBColor(65, 105, 225);
const IDEAL_COLOR: RGBColor = RGBColor(255, 140, 0);
/// Heatmap cells without MPS results.
const MISSING_COLOR: RGBColor = RGBColor(211, 211, 211);

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 26;
const AXIS_DESC_SIZE: u32 = 20;
const LABEL_SIZE: u32 = 16;

/// Width of one bar in x axis units; bar groups are 1 unit apart.
const BAR_WIDTH: f64 = 0.35;
/// Pixels of the error bar whiskers.
const WHISKER_WIDTH: u32 = 10;

type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type BarChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Draw into a temporary file next to `path`, then move it into place.
fn render_png(
    path: &Path,
    config: &PlotConfig,
    draw: impl FnOnce(&Root<'_>) -> Result<()>,
) -> Result<()> {
    let tempfile = Tempfile::new(path)?;
    {
        let root = BitMapBackend::new(&tempfile.temp_path, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    tempfile.finish()?;
    Ok(())
}

fn title(what: &str, config: &PlotConfig) -> String {
    if config.device_label.is_empty() {
        what.to_string()
    } else {
        format!("{what} ({})", config.device_label)
    }
}

/// Group `i` spans `i .. i + 2 * BAR_WIDTH`, label at its center.
fn group_x_range(num_models: usize) -> std::ops::Range<f64> {
    -0.25..(num_models as f64 - 1. + 2. * BAR_WIDTH + 0.25)
}

fn y_axis_max(max_value: f64) -> f64 {
    if max_value > 0. {
        max_value * 1.15
    } else {
        1.
    }
}

/// The model names below the x axis, centered under each bar group
/// (the automatic tick labels are disabled since their positions can't
/// be chosen).
fn draw_group_labels(
    root: &Root<'_>,
    chart: &BarChart<'_, '_>,
    models: &[ModelName],
) -> Result<()> {
    let style = TextStyle::from((FONT, LABEL_SIZE + 2).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, model) in models.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64 + BAR_WIDTH, 0.));
        root.draw(&Text::new(model.to_string(), (x, y + 8), style.clone()))?;
    }
    Ok(())
}

/// Error bars centered on the bars at `x_offset` in each group, on
/// top of `base(i) + bar.value`.
fn draw_error_bars(
    chart: &mut BarChart<'_, '_>,
    bars: &[Bar],
    x_offset: f64,
    base: impl Fn(usize) -> f64,
) -> Result<()> {
    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let y = base(i) + bar.value;
        ErrorBar::new_vertical(
            i as f64 + x_offset + BAR_WIDTH / 2.,
            y - bar.error,
            y,
            y + bar.error,
            BLACK.stroke_width(2),
            WHISKER_WIDTH,
        )
    }))?;
    Ok(())
}

/// Grouped bars: per HP model the mean p95 latency under MPS and
/// alone.
pub fn draw_latency_chart(data: &PlotData, config: &PlotConfig, path: &Path) -> Result<()> {
    let series: [(&str, &ColumnSeries<MilliSeconds>, RGBColor); 2] = [
        ("MPS", &data.latency.mps, MPS_COLOR),
        ("Ideal", &data.latency.ideal, IDEAL_COLOR),
    ];
    let y_max = y_axis_max(series.iter().map(|(_, s, _)| s.max_top()).fold(0., f64::max));

    render_png(path, config, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                title("MPS vs Ideal: P95 Latency Comparison", config),
                (FONT, TITLE_SIZE),
            )
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(80)
            .build_cartesian_2d(group_x_range(data.models.len()), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .x_desc("Model")
            .y_desc(format!("Average P95 Latency ({})", MilliSeconds::UNIT_SHORT))
            .axis_desc_style((FONT, AXIS_DESC_SIZE))
            .y_label_style((FONT, LABEL_SIZE))
            .draw()?;

        for (method_id, (label, series, color)) in series.iter().enumerate() {
            let x_offset = BAR_WIDTH * method_id as f64;
            let style = color.mix(0.8).filled();
            chart
                .draw_series(series.bars.iter().enumerate().map(|(i, bar)| {
                    let x0 = i as f64 + x_offset;
                    Rectangle::new([(x0, 0.), (x0 + BAR_WIDTH, bar.value)], style)
                }))?
                .label(*label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], style));
            draw_error_bars(&mut chart, &series.bars, x_offset, |_| 0.)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, LABEL_SIZE))
            .draw()?;

        draw_group_labels(root, &chart, &data.models)
    })
}

/// Stacked grouped bars: per HP model the HP throughput with the BE
/// partner's throughput on top, under MPS and alone.
pub fn draw_throughput_chart(data: &PlotData, config: &PlotConfig, path: &Path) -> Result<()> {
    let series: [(&str, &StackedThroughput, RGBColor); 2] = [
        ("MPS", &data.throughput.mps, MPS_COLOR),
        ("Ideal", &data.throughput.ideal, IDEAL_COLOR),
    ];
    let y_max = y_axis_max(series.iter().map(|(_, s, _)| s.max_top()).fold(0., f64::max));

    render_png(path, config, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                title("MPS vs Ideal: Total Throughput Comparison", config),
                (FONT, TITLE_SIZE),
            )
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(80)
            .build_cartesian_2d(group_x_range(data.models.len()), 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .x_desc("High-Priority Model")
            .y_desc(format!(
                "Total Throughput ({})",
                RequestsPerSecond::UNIT_SHORT
            ))
            .axis_desc_style((FONT, AXIS_DESC_SIZE))
            .y_label_style((FONT, LABEL_SIZE))
            .draw()?;

        for (method_id, (label, stacked, color)) in series.iter().enumerate() {
            let x_offset = BAR_WIDTH * method_id as f64;
            let hp_style = color.mix(0.6).filled();
            let be_style = color.mix(0.9).filled();
            let hp_bars = &stacked.hp.bars;
            let be_bars = &stacked.be.bars;

            chart.draw_series(hp_bars.iter().enumerate().map(|(i, hp)| {
                let x0 = i as f64 + x_offset;
                Rectangle::new([(x0, 0.), (x0 + BAR_WIDTH, hp.value)], hp_style)
            }))?;
            chart
                .draw_series(hp_bars.iter().zip(be_bars).enumerate().map(|(i, (hp, be))| {
                    let x0 = i as f64 + x_offset;
                    Rectangle::new(
                        [(x0, hp.value), (x0 + BAR_WIDTH, hp.value + be.value)],
                        be_style,
                    )
                }))?
                .label(*label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], be_style));
            // outline separating the HP and BE parts
            chart.draw_series(hp_bars.iter().enumerate().map(|(i, hp)| {
                let x0 = i as f64 + x_offset;
                PathElement::new(vec![(x0, hp.value), (x0 + BAR_WIDTH, hp.value)], WHITE)
            }))?;

            draw_error_bars(&mut chart, hp_bars, x_offset, |_| 0.)?;
            draw_error_bars(&mut chart, be_bars, x_offset, |i| hp_bars[i].value)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .label_font((FONT, LABEL_SIZE))
            .draw()?;

        draw_group_labels(root, &chart, &data.models)
    })
}

/// Annotated color grid of the slowdown, BE models as rows (top to
/// bottom), HP models as columns; a color bar on the right. NaN cells
/// (no MPS results) are gray and annotated "n/a".
pub fn draw_slowdown_heatmap(data: &PlotData, config: &PlotConfig, path: &Path) -> Result<()> {
    let slowdown = &data.slowdown;
    let n = slowdown.len();
    let (min, max) = (0..n)
        .flat_map(|row| slowdown.row(row).iter().copied())
        .filter(|x| !x.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
    let (min, max) = if max > min {
        (min, max)
    } else if min.is_finite() {
        (min - 0.5, min + 0.5)
    } else {
        (0., 1.)
    };

    render_png(path, config, |root| {
        let colorbar_width = 150u32.min(config.width / 4);
        let (grid_area, colorbar_area) =
            root.split_horizontally((config.width - colorbar_width) as i32);

        let nf = n as f64;
        let mut chart = ChartBuilder::on(&grid_area)
            .caption(
                title("MPS Latency Slowdown vs Ideal", config),
                (FONT, TITLE_SIZE),
            )
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(140)
            .build_cartesian_2d(0f64..nf, 0f64..nf)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_label_formatter(&|_| String::new())
            .y_label_formatter(&|_| String::new())
            .x_desc("High-Priority Model")
            .y_desc("Best-Effort Model")
            .axis_desc_style((FONT, AXIS_DESC_SIZE))
            .draw()?;

        // row 0 at the top
        let cell_y = |row: usize| nf - 1. - row as f64;

        chart.draw_series((0..n).flat_map(|row| {
            (0..n).map(move |col| {
                let value = *slowdown.at(row, col);
                let y = cell_y(row);
                let color = if value.is_nan() {
                    MISSING_COLOR
                } else {
                    scaled_color(value, min, max)
                };
                Rectangle::new([(col as f64, y), (col as f64 + 1., y + 1.)], color.filled())
            })
        }))?;

        let annotation_style = (FONT, LABEL_SIZE)
            .into_font()
            .style(FontStyle::Bold)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series((0..n).flat_map(|row| {
            let annotation_style = annotation_style.clone();
            (0..n).map(move |col| {
                let value = *slowdown.at(row, col);
                Text::new(
                    if value.is_nan() {
                        "n/a".to_string()
                    } else {
                        format!("{value:.2}x")
                    },
                    (col as f64 + 0.5, cell_y(row) + 0.5),
                    annotation_style.clone(),
                )
            })
        }))?;

        let column_label_style = TextStyle::from((FONT, LABEL_SIZE).into_font())
            .pos(Pos::new(HPos::Center, VPos::Top));
        let row_label_style = TextStyle::from((FONT, LABEL_SIZE).into_font())
            .pos(Pos::new(HPos::Right, VPos::Center));
        for (i, model) in data.models.iter().enumerate() {
            let (x, y) = chart.backend_coord(&(i as f64 + 0.5, 0.));
            root.draw(&Text::new(
                model.to_string(),
                (x, y + 8),
                column_label_style.clone(),
            ))?;
            let (x, y) = chart.backend_coord(&(0., cell_y(i) + 0.5));
            root.draw(&Text::new(
                model.to_string(),
                (x - 8, y),
                row_label_style.clone(),
            ))?;
        }

        let mut colorbar = ChartBuilder::on(&colorbar_area)
            .margin_top(80)
            .margin_bottom(90)
            .margin_right(20)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..1f64, min..max)?;
        colorbar
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc("Slowdown Factor")
            .axis_desc_style((FONT, LABEL_SIZE))
            .y_label_style((FONT, LABEL_SIZE - 2))
            .y_label_formatter(&|y| format!("{y:.2}"))
            .draw()?;
        const STEPS: usize = 100;
        let step = (max - min) / STEPS as f64;
        colorbar.draw_series((0..STEPS).map(|i| {
            let y0 = min + step * i as f64;
            Rectangle::new(
                [(0., y0), (1., y0 + step)],
                yl_or_rd((i as f64 + 0.5) / STEPS as f64).filled(),
            )
        }))?;

        Ok(())
    })
}
