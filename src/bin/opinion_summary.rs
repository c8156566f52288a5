use anyhow::Result;
use log::info;
use std::env;

use review_aspects::config::PipelineConfig;
use review_aspects::env_loader;
use review_aspects::excel_writer;
use review_aspects::opinion_summary::{self, SummaryMethod};
use review_aspects::plots;
use review_aspects::table_io;

fn main() -> Result<()> {
    env_loader::load_env();
    env_logger::init();

    // Method from the first argument, "bert" when absent
    let args: Vec<String> = env::args().collect();
    let method = match args.get(1) {
        Some(arg) => arg.parse::<SummaryMethod>()?,
        None => SummaryMethod::Bert,
    };

    let config = PipelineConfig::from_env();
    plots::init_font(config.font_path.as_deref());
    let labels = method.load_labels(&config)?;
    info!("Summarizing {} {}-based opinions.", labels.len(), method.as_str());

    let summary = opinion_summary::summarize(&labels);
    let output_path = config.opinion_summary_path(method.as_str());
    table_io::write_table(&output_path, &summary)?;
    println!("✅ Opinion summary saved to: {:?}", output_path);

    let overall = opinion_summary::overall_counts(&labels);
    let figures_dir = config.method_figures_dir(method.as_str());
    let figures = plots::write_opinion_figures(&figures_dir, method, &summary, overall)?;
    let report_path = figures_dir.join("opinion_report.xlsx");
    excel_writer::write_opinion_report(&report_path, method, &summary, overall)?;
    println!("📊 {} opinion charts saved to {:?}", figures.len(), figures_dir);
    println!("📒 Workbook saved to {:?}", report_path);
    Ok(())
}
