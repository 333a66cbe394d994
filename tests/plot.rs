mod common;

use anyhow::Result;
use gpushare_eval::{
    aggregate::AggregateTables,
    plot::plot_results,
    results_layout::{Chart, ResultTable},
};

use common::ResultsTree;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

fn aggregate(tree: &ResultsTree) -> Result<()> {
    AggregateTables::from_results(&tree.config, &tree.layout)?.write_csv_files(&tree.layout)
}

fn assert_charts_written(tree: &ResultsTree) -> Result<()> {
    for chart in [Chart::Latency, Chart::Throughput, Chart::SlowdownHeatmap] {
        let png = std::fs::read(tree.layout.chart_path(chart))?;
        assert!(png.starts_with(PNG_SIGNATURE), "{}", chart.file_name());
    }
    let names = tree.file_names()?;
    assert!(
        names.iter().all(|name| !name.contains(".tmp~")),
        "{names:?}"
    );
    Ok(())
}

#[test]
fn writes_charts_and_slowdown_table() -> Result<()> {
    let tree = ResultsTree::new(2)?;
    tree.fill_uniform()?;
    tree.write_mps("BERT", "ResNet50", 1, 80., 20., 40000.)?;
    aggregate(&tree)?;

    plot_results(&tree.config, &tree.layout)?;
    assert_charts_written(&tree)?;

    let slowdown = std::fs::read_to_string(tree.layout.table_path(ResultTable::MpsSlowdown))?;
    let mut lines = slowdown.lines();
    assert_eq!(lines.next(), Some(",ResNet50,MobileNetV2,ResNet101,BERT"));
    // mean of 20 and 40 ms against 10 ms alone
    assert_eq!(lines.next(), Some("ResNet50,2.00,2.00,2.00,3.00"));
    assert_eq!(tree.file_names()?.len(), 3 + 8);
    Ok(())
}

#[test]
fn pair_without_results_is_plotted() -> Result<()> {
    let tree = ResultsTree::new(1)?;
    tree.fill_uniform()?;
    tree.write_mps_json("MobileNetV2", "BERT", 0, "{}")?;
    aggregate(&tree)?;

    plot_results(&tree.config, &tree.layout)?;
    assert_charts_written(&tree)?;

    let slowdown = std::fs::read_to_string(tree.layout.table_path(ResultTable::MpsSlowdown))?;
    assert!(slowdown.ends_with("BERT,2.00,nan,2.00,2.00\n"), "{slowdown}");
    Ok(())
}

#[test]
fn missing_table_draws_nothing() -> Result<()> {
    let tree = ResultsTree::new(1)?;
    tree.fill_uniform()?;
    aggregate(&tree)?;
    std::fs::remove_file(tree.layout.table_path(ResultTable::MpsBeThroughput))?;

    assert!(plot_results(&tree.config, &tree.layout).is_err());
    let names = tree.file_names()?;
    assert!(names.iter().all(|name| !name.ends_with(".png")), "{names:?}");
    assert!(!names.contains(&ResultTable::MpsSlowdown.file_name().to_string()));
    Ok(())
}
