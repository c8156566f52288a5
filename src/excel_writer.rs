use anyhow::{Context, Result};
use log::info;
use rust_xlsxwriter::{Chart, ChartDataLabel, ChartType, Format, Workbook, Worksheet};
use std::fs;
use std::path::Path;

use crate::comparison::{ComparisonStats, ConfusionMatrix};
use crate::eda::{EdaStats, TOP_DOMAIN_ASPECTS};
use crate::models::{OpinionSummaryRow, Sentiment};
use crate::opinion_summary::{self, SummaryMethod};

const TOP_ASPECTS: usize = 10;
const RADAR_ASPECTS: usize = 6;

/// One labelled series of (category, value) rows laid out as a two-column table.
struct CategoryTable<'a> {
    sheet: &'a str,
    title: &'a str,
    headers: [&'a str; 2],
    rows: Vec<(String, f64)>,
}

/// Writes the table at (row, col) and returns the chart placed next to it.
fn write_category_table(sheet: &mut Worksheet, row: u32, col: u16, table: &CategoryTable, chart_type: ChartType) -> Result<Option<Chart>> {
    let bold = Format::new().set_bold();
    sheet.write_string_with_format(row, col, table.headers[0], &bold)?;
    sheet.write_string_with_format(row, col + 1, table.headers[1], &bold)?;
    for (i, (category, value)) in table.rows.iter().enumerate() {
        let r = row + 1 + i as u32;
        sheet.write_string(r, col, category)?;
        sheet.write_number(r, col + 1, *value)?;
    }
    if table.rows.is_empty() {
        return Ok(None);
    }

    let last = row + table.rows.len() as u32;
    let mut chart = Chart::new(chart_type);
    chart
        .add_series()
        .set_name(table.headers[1])
        .set_categories((table.sheet, row + 1, col, last, col))
        .set_values((table.sheet, row + 1, col + 1, last, col + 1))
        .set_data_label(ChartDataLabel::new().show_value());
    chart.title().set_name(table.title);
    chart.x_axis().set_name(table.headers[0]);
    chart.y_axis().set_name(table.headers[1]);
    Ok(Some(chart))
}

/// Adds a sheet holding one table and its chart.
fn add_chart_sheet(workbook: &mut Workbook, table: CategoryTable, chart_type: ChartType) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(table.sheet)?;
    sheet.set_column_width(0, 28)?;
    sheet.set_column_width(1, 14)?;
    if let Some(chart) = write_category_table(sheet, 0, 0, &table, chart_type)? {
        sheet.insert_chart(1, 3, &chart)?;
    }
    Ok(())
}

fn write_generated_stamp(sheet: &mut Worksheet, row: u32) -> Result<()> {
    sheet.write_string(row, 0, "Generated")?;
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    sheet.write_string(row, 1, &timestamp)?;
    Ok(())
}

fn save(mut workbook: Workbook, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    workbook
        .save(file_path)
        .with_context(|| format!("Failed to save workbook {:?}", file_path))?;
    info!("Report workbook saved to {:?}", file_path);
    Ok(())
}

/// Exploratory report: distributions of sentiment, strength, sentence length,
/// POS tags, noun phrases and aspects per domain.
pub fn write_eda_report(file_path: &Path, stats: &EdaStats) -> Result<()> {
    info!("Initializing EDA workbook for file: {:?}", file_path);
    let mut workbook = Workbook::new();

    let overview = workbook.add_worksheet();
    overview.set_name("Overview")?;
    overview.set_column_width(0, 24)?;
    let na = |v: Option<usize>| v.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string());
    let lines = [
        ("Rows", stats.rows.to_string()),
        ("Unique features", stats.unique_features.to_string()),
        ("Unique aspects", stats.unique_aspects.to_string()),
        ("Unique domains", na(stats.unique_domains)),
    ];
    for (i, (label, value)) in lines.iter().enumerate() {
        overview.write_string(i as u32, 0, *label)?;
        overview.write_string(i as u32, 1, value)?;
    }
    write_generated_stamp(overview, lines.len() as u32 + 1)?;

    add_chart_sheet(
        &mut workbook,
        CategoryTable {
            sheet: "Sentiment",
            title: "Sentiment Distribution",
            headers: ["Sentiment", "Count"],
            rows: Sentiment::ALL
                .iter()
                .map(|s| (s.to_string(), stats.sentiment_count(*s) as f64))
                .filter(|(_, n)| *n > 0.0)
                .collect(),
        },
        ChartType::Column,
    )?;

    // Strength by polarity: one column per strength, one series per label.
    let strength = workbook.add_worksheet();
    strength.set_name("Strength")?;
    let bold = Format::new().set_bold();
    strength.write_string_with_format(0, 0, "Strength", &bold)?;
    for (j, label) in Sentiment::ALL.iter().enumerate() {
        strength.write_string_with_format(0, 1 + j as u16, label.as_str(), &bold)?;
    }
    for (i, (level, counts)) in stats.strength_counts.iter().enumerate() {
        strength.write_number(1 + i as u32, 0, *level as f64)?;
        for (j, n) in counts.iter().enumerate() {
            strength.write_number(1 + i as u32, 1 + j as u16, *n as f64)?;
        }
    }
    if !stats.strength_counts.is_empty() {
        let last = stats.strength_counts.len() as u32;
        let mut chart = Chart::new(ChartType::Column);
        for (j, label) in Sentiment::ALL.iter().enumerate() {
            chart
                .add_series()
                .set_name(label.as_str())
                .set_categories(("Strength", 1, 0, last, 0))
                .set_values(("Strength", 1, 1 + j as u16, last, 1 + j as u16));
        }
        chart.title().set_name("Sentiment Strength by Polarity");
        chart.x_axis().set_name("Strength (1-3)");
        chart.y_axis().set_name("Count");
        strength.insert_chart(1, 5, &chart)?;
    }

    add_chart_sheet(
        &mut workbook,
        CategoryTable {
            sheet: "SentenceLength",
            title: "Sentence Length Distribution",
            headers: ["Number of Words", "Frequency"],
            rows: stats.sentence_lengths.iter().map(|(len, n)| (len.to_string(), *n as f64)).collect(),
        },
        ChartType::Column,
    )?;

    match &stats.top_pos_tags {
        Some(tags) => add_chart_sheet(
            &mut workbook,
            CategoryTable {
                sheet: "PosTags",
                title: "Top 15 POS Tags",
                headers: ["POS Tag", "Frequency"],
                rows: tags.iter().map(|(t, n)| (t.clone(), *n as f64)).collect(),
            },
            ChartType::Bar,
        )?,
        None => info!("No POS tags available, skipping POS tag chart."),
    }

    match &stats.top_noun_phrases {
        Some(nps) => add_chart_sheet(
            &mut workbook,
            CategoryTable {
                sheet: "NounPhrases",
                title: "Top 15 Noun Phrases",
                headers: ["Noun Phrase", "Frequency"],
                rows: nps.iter().map(|(t, n)| (t.clone(), *n as f64)).collect(),
            },
            ChartType::Bar,
        )?,
        None => info!("No noun phrases available, skipping noun phrase chart."),
    }

    // Aspect distribution per domain: rows are domains, one stacked series per top aspect.
    if let Some(table) = stats.aspect_domain.as_ref().map(|t| t.top_aspects(TOP_DOMAIN_ASPECTS)) {
        let sheet = workbook.add_worksheet();
        sheet.set_name("AspectsPerDomain")?;
        sheet.write_string_with_format(0, 0, "Domain", &bold)?;
        for (a, aspect) in table.aspects.iter().enumerate() {
            sheet.write_string_with_format(0, 1 + a as u16, aspect, &bold)?;
        }
        for (d, domain) in table.domains.iter().enumerate() {
            sheet.write_string(1 + d as u32, 0, domain)?;
            for a in 0..table.aspects.len() {
                sheet.write_number(1 + d as u32, 1 + a as u16, table.counts[a][d] as f64)?;
            }
        }
        if !table.domains.is_empty() {
            let last = table.domains.len() as u32;
            let mut chart = Chart::new(ChartType::BarStacked);
            for (a, aspect) in table.aspects.iter().enumerate() {
                let col = 1 + a as u16;
                chart
                    .add_series()
                    .set_name(aspect.as_str())
                    .set_categories(("AspectsPerDomain", 1, 0, last, 0))
                    .set_values(("AspectsPerDomain", 1, col, last, col));
            }
            chart.title().set_name("Aspect Distribution per Domain");
            chart.x_axis().set_name("Domain");
            chart.y_axis().set_name("Count");
            sheet.insert_chart(last + 2, 0, &chart)?;
        }
    } else {
        info!("No domain column values, skipping aspect-per-domain chart.");
    }

    save(workbook, file_path)
}

/// Confusion matrix and agreement counts between the two mapping methods.
pub fn write_comparison_report(file_path: &Path, stats: &ComparisonStats, matrix: &ConfusionMatrix) -> Result<()> {
    info!("Initializing comparison workbook for file: {:?}", file_path);
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let percentage_format = Format::new().set_num_format("0.00%");

    let sheet = workbook.add_worksheet();
    sheet.set_name("ConfusionMatrix")?;
    sheet.set_column_width(0, 24)?;
    sheet.write_string_with_format(0, 0, "Rule-based \\ BERT", &bold)?;
    for (j, label) in Sentiment::ALL.iter().enumerate() {
        sheet.write_string_with_format(0, 1 + j as u16, label.as_str(), &bold)?;
    }
    for (i, rule_label) in Sentiment::ALL.iter().enumerate() {
        sheet.write_string_with_format(1 + i as u32, 0, rule_label.as_str(), &bold)?;
        for (j, bert_label) in Sentiment::ALL.iter().enumerate() {
            sheet.write_number(1 + i as u32, 1 + j as u16, matrix.get(*rule_label, *bert_label) as f64)?;
        }
    }

    let mut chart = Chart::new(ChartType::ColumnStacked);
    for (j, bert_label) in Sentiment::ALL.iter().enumerate() {
        let col = 1 + j as u16;
        chart
            .add_series()
            .set_name(bert_label.as_str())
            .set_categories(("ConfusionMatrix", 1, 0, 3, 0))
            .set_values(("ConfusionMatrix", 1, col, 3, col));
    }
    chart.title().set_name("Confusion Matrix: Rule vs BERT");
    chart.x_axis().set_name("Rule-based Sentiment");
    chart.y_axis().set_name("Pairs (stacked by BERT Sentiment)");
    sheet.insert_chart(5, 0, &chart)?;

    sheet.write_string(22, 0, "Compared pairs")?;
    sheet.write_number(22, 1, stats.total as f64)?;
    sheet.write_string(23, 0, "Agreement count")?;
    sheet.write_number(23, 1, stats.agreement as f64)?;
    sheet.write_string(24, 0, "Agreement rate")?;
    sheet.write_number_with_format(24, 1, stats.agreement_rate, &percentage_format)?;
    write_generated_stamp(sheet, 26)?;

    add_chart_sheet(
        &mut workbook,
        CategoryTable {
            sheet: "Agreement",
            title: "Agreement Between Rule and BERT",
            headers: ["Agreement (True/False)", "Count"],
            rows: vec![
                ("False".to_string(), (stats.total - stats.agreement) as f64),
                ("True".to_string(), stats.agreement as f64),
            ],
        },
        ChartType::Column,
    )?;

    save(workbook, file_path)
}

/// Top-aspect rankings, sentiment composition, ratio radar and overall pie for one method.
pub fn write_opinion_report(
    file_path: &Path,
    method: SummaryMethod,
    summary: &[OpinionSummaryRow],
    overall: [u64; 3],
) -> Result<()> {
    info!("Initializing opinion workbook for file: {:?}", file_path);
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let suffix = format!("({}-based)", method.title());

    let rankings: [(&str, &str, &str, fn(&OpinionSummaryRow) -> f64); 3] = [
        ("TopPositive", "Top 10 Positive Aspects", "Positive Ratio", |r| r.positive_ratio),
        ("TopNegative", "Top 10 Negative Aspects", "Negative Ratio", |r| r.negative_ratio),
        ("TopMentioned", "Top 10 Most Mentioned Aspects", "Total Mentions", |r| r.total_mentions as f64),
    ];
    for (sheet, title, metric, key) in rankings {
        let title = format!("{} {}", title, suffix);
        add_chart_sheet(
            &mut workbook,
            CategoryTable {
                sheet,
                title: &title,
                headers: ["Aspect", metric],
                rows: opinion_summary::top_by(summary, TOP_ASPECTS, key)
                    .into_iter()
                    .map(|r| (r.aspect.clone(), key(r)))
                    .collect(),
            },
            ChartType::Bar,
        )?;
    }

    // Composition of the most mentioned aspects, one stacked series per label.
    let top_mentioned = opinion_summary::top_by(summary, TOP_ASPECTS, |r| r.total_mentions as f64);
    let sheet = workbook.add_worksheet();
    sheet.set_name("Composition")?;
    sheet.write_string_with_format(0, 0, "Aspect", &bold)?;
    for (j, label) in Sentiment::ALL.iter().enumerate() {
        sheet.write_string_with_format(0, 1 + j as u16, label.as_str(), &bold)?;
    }
    for (i, row) in top_mentioned.iter().enumerate() {
        sheet.write_string(1 + i as u32, 0, &row.aspect)?;
        for (j, label) in Sentiment::ALL.iter().enumerate() {
            sheet.write_number(1 + i as u32, 1 + j as u16, row.count(*label) as f64)?;
        }
    }
    if !top_mentioned.is_empty() {
        let last = top_mentioned.len() as u32;
        let mut chart = Chart::new(ChartType::BarStacked);
        for (j, label) in Sentiment::ALL.iter().enumerate() {
            let col = 1 + j as u16;
            chart
                .add_series()
                .set_name(label.as_str())
                .set_categories(("Composition", 1, 0, last, 0))
                .set_values(("Composition", 1, col, last, col));
        }
        chart.title().set_name(format!("Sentiment Composition for Top Aspects {}", suffix).as_str());
        chart.x_axis().set_name("Aspect");
        chart.y_axis().set_name("Mentions");
        sheet.insert_chart(1, 5, &chart)?;
    }

    // Ratio radar: axes are the three labels, one series per aspect.
    let radar_rows = opinion_summary::top_by(summary, RADAR_ASPECTS, |r| r.total_mentions as f64);
    let sheet = workbook.add_worksheet();
    sheet.set_name("Radar")?;
    sheet.write_string_with_format(0, 0, "Ratio", &bold)?;
    for (i, label) in Sentiment::ALL.iter().enumerate() {
        sheet.write_string(1 + i as u32, 0, label.as_str())?;
    }
    for (a, row) in radar_rows.iter().enumerate() {
        let col = 1 + a as u16;
        sheet.write_string_with_format(0, col, &row.aspect, &bold)?;
        for (i, label) in Sentiment::ALL.iter().enumerate() {
            sheet.write_number(1 + i as u32, col, row.ratio(*label))?;
        }
    }
    if !radar_rows.is_empty() {
        let mut chart = Chart::new(ChartType::Radar);
        for (a, row) in radar_rows.iter().enumerate() {
            let col = 1 + a as u16;
            chart
                .add_series()
                .set_name(row.aspect.as_str())
                .set_categories(("Radar", 1, 0, 3, 0))
                .set_values(("Radar", 1, col, 3, col));
        }
        chart.title().set_name(format!("Sentiment Ratios Radar Chart {}", suffix).as_str());
        sheet.insert_chart(5, 0, &chart)?;
    }

    let pie_title = format!("Overall Sentiment Distribution {}", suffix);
    add_chart_sheet(
        &mut workbook,
        CategoryTable {
            sheet: "Overall",
            title: &pie_title,
            headers: ["Sentiment", "Count"],
            rows: Sentiment::ALL
                .iter()
                .map(|s| (s.to_string(), overall[s.index()] as f64))
                .filter(|(_, n)| *n > 0.0)
                .collect(),
        },
        ChartType::Pie,
    )?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;
    let headers = [
        "aspect", "positive", "neutral", "negative", "total_mentions",
        "positive_ratio", "neutral_ratio", "negative_ratio",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (i, row) in summary.iter().enumerate() {
        let r = 1 + i as u32;
        sheet.write_string(r, 0, &row.aspect)?;
        sheet.write_number(r, 1, row.positive as f64)?;
        sheet.write_number(r, 2, row.neutral as f64)?;
        sheet.write_number(r, 3, row.negative as f64)?;
        sheet.write_number(r, 4, row.total_mentions as f64)?;
        sheet.write_number(r, 5, row.positive_ratio)?;
        sheet.write_number(r, 6, row.neutral_ratio)?;
        sheet.write_number(r, 7, row.negative_ratio)?;
    }
    write_generated_stamp(sheet, summary.len() as u32 + 2)?;

    save(workbook, file_path)
}
