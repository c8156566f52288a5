use anyhow::Result;
use log::info;

use review_aspects::config::PipelineConfig;
use review_aspects::eda::EdaStats;
use review_aspects::env_loader;
use review_aspects::excel_writer;
use review_aspects::models::{CleanedRecord, Sentiment};
use review_aspects::plots;
use review_aspects::table_io;

fn main() -> Result<()> {
    env_loader::load_env();
    env_logger::init();

    let config = PipelineConfig::from_env();
    plots::init_font(config.font_path.as_deref());
    let records: Vec<CleanedRecord> = table_io::read_table(config.cleaned_reviews_path())?;
    let records: Vec<CleanedRecord> = records
        .into_iter()
        .filter(|r| !r.clean_sentence.is_empty() && !r.clean_feature.is_empty())
        .collect();

    let stats = EdaStats::compute(&records);
    info!("Computed exploratory statistics over {} rows.", stats.rows);

    println!("📊 Dataset rows: {}", stats.rows);
    println!("\n🎯 Sentiment distribution:");
    for label in Sentiment::ALL {
        println!("  {:<9} {}", label.as_str(), stats.sentiment_count(label));
    }
    println!("\n💥 Sentiment strength distribution:");
    for (strength, counts) in &stats.strength_counts {
        println!("  {} {}", strength, counts.iter().sum::<u64>());
    }
    println!("\n🏷️ Number of unique features: {}", stats.unique_features);
    println!("🏷️ Number of unique aspects: {}", stats.unique_aspects);
    println!(
        "🏷️ Number of unique domains: {}",
        stats.unique_domains.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string())
    );

    if let Some(tags) = &stats.top_pos_tags {
        println!("\n🧠 POS tag frequency (top 15):");
        for (tag, n) in tags {
            println!("  {:<6} {}", tag, n);
        }
    }
    if let Some(nps) = &stats.top_noun_phrases {
        println!("\n🧠 Top noun phrases:");
        for (np, n) in nps {
            println!("  {:<30} {}", np, n);
        }
    }
    if let Some(table) = &stats.aspect_domain {
        println!("\n📊 Aspect mention count by domain ({} aspects x {} domains)", table.aspects.len(), table.domains.len());
    }

    let figures = plots::write_eda_figures(&config.figures_dir, &stats)?;
    let report_path = config.figures_dir.join("eda_report.xlsx");
    excel_writer::write_eda_report(&report_path, &stats)?;
    println!("\n✅ {} EDA charts saved to {:?}", figures.len(), config.figures_dir);
    println!("📒 Workbook saved to {:?}", report_path);
    Ok(())
}
