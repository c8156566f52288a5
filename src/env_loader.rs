use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;

const ENV_FILES: [&str; 3] = [".env", ".env.local", "../.env"];

// Values never echoed to the debug log
const SECRET_KEYS: [&str; 1] = ["HF_API_TOKEN"];

/// Loads pipeline settings from the first `.env` file found.
/// Variables already present in the process environment are never overridden.
pub fn load_env() {
    for path in ENV_FILES.iter() {
        if !Path::new(path).exists() {
            continue;
        }
        match load_env_from_file(path) {
            Ok(count) => {
                info!("Loaded {} environment variables from {}", count, path);
                return;
            }
            Err(e) => warn!("Failed to load environment from {}: {}", path, e),
        }
    }
    info!("No .env file found, using environment variables from system");
}

fn load_env_from_file(file_path: &str) -> Result<usize> {
    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read env file {}", file_path))?;

    let mut applied = 0;
    for (key, value) in parse_env_lines(&contents) {
        if std::env::var(&key).is_ok() {
            continue;
        }
        debug!(
            "Set env var from file: {} = {}",
            key,
            if SECRET_KEYS.contains(&key.as_str()) { "[hidden]" } else { value.as_str() }
        );
        std::env::set_var(&key, &value);
        applied += 1;
    }
    Ok(applied)
}

/// Parses `KEY=value` lines, skipping comments and blanks. Surrounding quotes are stripped.
fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .filter_map(|line| {
            let idx = line.find('=')?;
            let key = line[..idx].trim();
            if key.is_empty() {
                return None;
            }
            let value = line[idx + 1..].trim().trim_matches('"');
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_strips_quotes() {
        let parsed = parse_env_lines("# comment\n\nABSA_DATA_DIR = \"corpus\"\nHF_API_TOKEN=abc\nnot a pair\n=orphan\n");
        assert_eq!(
            parsed,
            vec![
                ("ABSA_DATA_DIR".to_string(), "corpus".to_string()),
                ("HF_API_TOKEN".to_string(), "abc".to_string()),
            ]
        );
    }
}
