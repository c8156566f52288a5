//! Parsing of the raw annotated review corpus.
//!
//! Each dataset folder holds one `.txt` file per product domain. Lines starting
//! with `##` carry the review sentence; other lines carry `feature[+N]` /
//! `feature[-N]` annotations that refer to the most recent sentence.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::models::{ReviewRecord, Sentiment};

static ANNOTATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w\s\-&]+?)\[(\+|\-)([0-9])\]").unwrap());

/// Encodings tried in order for every file.
pub const ENCODINGS: [TextEncoding; 3] = [TextEncoding::Utf8, TextEncoding::Latin1, TextEncoding::Cp1252];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Cp1252,
}

impl TextEncoding {
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            TextEncoding::Cp1252 => bytes.iter().map(|&b| cp1252_char(b)).collect(),
        }
    }
}

// 0x80..=0x9F differ from Latin-1; five of those code points are undefined.
fn cp1252_char(byte: u8) -> Option<char> {
    const HIGH: [Option<char>; 32] = [
        Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'), Some('\u{201E}'), Some('\u{2026}'),
        Some('\u{2020}'), Some('\u{2021}'), Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'),
        Some('\u{2039}'), Some('\u{0152}'), None, Some('\u{017D}'), None, None, Some('\u{2018}'),
        Some('\u{2019}'), Some('\u{201C}'), Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'),
        Some('\u{2014}'), Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
        Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
    ];
    match byte {
        0x80..=0x9F => HIGH[(byte - 0x80) as usize],
        _ => Some(byte as char),
    }
}

/// Decodes with the first encoding in `ENCODINGS` that accepts the bytes.
pub fn decode_with_fallback(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    ENCODINGS
        .iter()
        .find_map(|enc| enc.decode(bytes).map(|text| (text, *enc)))
}

/// Parses the annotation format into one record per annotation occurrence.
pub fn parse_review_text(text: &str, domain: &str) -> Vec<ReviewRecord> {
    let mut records = Vec::new();
    let mut current_sentence = String::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("[t]") || line.starts_with("***") {
            continue;
        }

        if let Some(sentence) = line.strip_prefix("##") {
            current_sentence = sentence.trim().to_string();
            continue;
        }

        for caps in ANNOTATION_REGEX.captures_iter(line) {
            let Ok(strength) = caps[3].parse::<u8>() else {
                debug!("Dropping annotation '{}' with unreadable strength in {}", &caps[0], domain);
                continue;
            };
            if !(1..=3).contains(&strength) {
                debug!("Dropping annotation '{}' with out-of-range strength in {}", &caps[0], domain);
                continue;
            }
            records.push(ReviewRecord {
                domain: domain.to_string(),
                sentence: current_sentence.clone(),
                feature: caps[1].trim().to_string(),
                sentiment: if &caps[2] == "+" { Sentiment::Positive } else { Sentiment::Negative },
                strength,
            });
        }
    }

    records
}

/// Reads and parses one domain file. Undecodable files yield no records.
pub fn parse_review_file(path: &Path, domain: &str) -> Result<Vec<ReviewRecord>> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read review file {:?}", path))?;

    match decode_with_fallback(&bytes) {
        Some((text, encoding)) => {
            debug!("Decoded {:?} as {:?}", path, encoding);
            Ok(parse_review_text(&text, domain))
        }
        None => {
            warn!("Could not decode {:?} with any known encoding, skipping.", path);
            Ok(Vec::new())
        }
    }
}

#[derive(Debug, Default)]
pub struct IngestOutput {
    /// Records of every dataset, in dataset order.
    pub combined: Vec<ReviewRecord>,
    /// (dataset folder name, records) for folders that contained `.txt` files.
    pub per_dataset: Vec<(String, Vec<ReviewRecord>)>,
}

/// Parses every `<dataset>/<domain>.txt` file under `root`.
pub fn parse_all_reviews(root: &Path) -> Result<IngestOutput> {
    let mut output = IngestOutput::default();

    for dataset_path in sorted_entries(root)? {
        if !dataset_path.is_dir() {
            continue;
        }
        let dataset = file_name(&dataset_path);
        info!("Processing dataset folder: {}", dataset);

        let mut dataset_records = Vec::new();
        let mut file_count = 0;
        for path in sorted_entries(&dataset_path)? {
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            let domain = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let records = parse_review_file(&path, &domain)?;
            debug!("Parsed {} records from {:?}", records.len(), path);
            dataset_records.extend(records);
            file_count += 1;
        }

        if file_count > 0 {
            info!("Dataset '{}': {} records from {} files.", dataset, dataset_records.len(), file_count);
            output.combined.extend(dataset_records.iter().cloned());
            output.per_dataset.push((dataset, dataset_records));
        }
    }

    Ok(output)
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .with_context(|| format!("Failed to list directory {:?}", dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to read entry in {:?}", dir))?;
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn two_line_file_yields_single_record() {
        let records = parse_review_text("## The battery life is great\nbattery[+3]", "electronics");
        assert_eq!(
            records,
            vec![ReviewRecord {
                domain: "electronics".to_string(),
                sentence: "The battery life is great".to_string(),
                feature: "battery".to_string(),
                sentiment: Sentiment::Positive,
                strength: 3,
            }]
        );
    }

    #[test]
    fn multiple_annotations_share_the_current_sentence() {
        let text = "[t] great phone\n## screen is dim but sound is loud\nscreen[-2], sound quality[+1]\n*** footer\n\nnothing here";
        let records = parse_review_text(text, "phone");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].feature, "screen");
        assert_eq!(records[0].sentiment, Sentiment::Negative);
        assert_eq!(records[0].strength, 2);
        assert_eq!(records[1].feature, "sound quality");
        assert_eq!(records[1].sentiment, Sentiment::Positive);
        assert!(records.iter().all(|r| r.sentence == "screen is dim but sound is loud"));
    }

    #[test]
    fn unannotated_and_malformed_lines_emit_nothing() {
        let text = "## nice camera\nno annotation\ncamera[3]\ncamera[+]\n## another sentence";
        assert!(parse_review_text(text, "camera").is_empty());
    }

    #[test]
    fn out_of_range_strength_is_dropped() {
        let records = parse_review_text("## fine\nzoom[+7] lens[-1]", "camera");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].feature, "lens");
    }

    #[test]
    fn only_ascii_digits_count_as_strength() {
        let records = parse_review_text("## crisp photos\nzoom[+\u{FF13}] lens[-1] flash[+\u{0663}]", "camera");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].feature, "lens");
        assert_eq!(records[0].strength, 1);
    }

    #[test]
    fn latin1_bytes_fall_back_past_utf8() {
        let bytes = b"## caf\xe9 mode\nwifi[+2]";
        let (text, encoding) = decode_with_fallback(bytes).unwrap();
        assert_eq!(encoding, TextEncoding::Latin1);
        assert!(text.contains("café"));
    }

    #[test]
    fn cp1252_rejects_undefined_bytes() {
        assert!(TextEncoding::Cp1252.decode(&[0x81]).is_none());
        assert_eq!(TextEncoding::Cp1252.decode(&[0x80]).as_deref(), Some("€"));
    }

    #[test]
    fn walks_dataset_folders_in_name_order() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b_set");
        let a = dir.path().join("a_set");
        let empty = dir.path().join("c_empty");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::create_dir_all(&empty).unwrap();
        fs::write(a.join("router.txt"), "## fast wifi\nwifi[+2]").unwrap();
        fs::write(a.join("notes.md"), "## ignored\nwifi[+2]").unwrap();
        fs::write(b.join("camera.txt"), "## blurry pictures\npictures[-3]").unwrap();
        fs::write(dir.path().join("stray.txt"), "## top level\nx[+1]").unwrap();

        let output = parse_all_reviews(dir.path()).unwrap();

        let names: Vec<&str> = output.per_dataset.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a_set", "b_set"]);
        assert_eq!(output.combined.len(), 2);
        assert_eq!(output.combined[0].domain, "router");
        assert_eq!(output.combined[1].domain, "camera");
    }
}
