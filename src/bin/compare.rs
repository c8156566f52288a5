use anyhow::Result;
use log::info;

use review_aspects::comparison::{self, ComparisonStats, ConfusionMatrix};
use review_aspects::config::PipelineConfig;
use review_aspects::env_loader;
use review_aspects::excel_writer;
use review_aspects::models::{ModelMapping, RuleMapping};
use review_aspects::plots;
use review_aspects::table_io;

fn main() -> Result<()> {
    env_loader::load_env();
    env_logger::init();

    let config = PipelineConfig::from_env();
    plots::init_font(config.font_path.as_deref());
    let rule: Vec<RuleMapping> = table_io::read_table(config.rule_mapping_path())?;
    let bert: Vec<ModelMapping> = table_io::read_table(config.bert_mapping_path())?;
    info!("Comparing {} rule-based rows with {} model-based rows.", rule.len(), bert.len());

    let merged = comparison::compare_mappings(&rule, &bert);
    let stats = ComparisonStats::from_records(&merged);
    let matrix = ConfusionMatrix::from_records(&merged);

    println!("✅ Compared {} overlapping sentence-aspect pairs", stats.total);
    println!("🤝 Agreement count: {}", stats.agreement);
    println!("📊 Agreement rate: {:.2}%", stats.agreement_rate * 100.0);

    table_io::write_table(config.comparison_path(), &merged)?;

    let figures_dir = config.comparison_figures_dir();
    let figures = plots::write_comparison_figures(&figures_dir, &stats, &matrix)?;
    let report_path = figures_dir.join("comparison_report.xlsx");
    excel_writer::write_comparison_report(&report_path, &stats, &matrix)?;
    println!("📊 {} visuals saved to: {:?}", figures.len(), figures_dir);
    println!("📒 Workbook saved to: {:?}", report_path);
    Ok(())
}
