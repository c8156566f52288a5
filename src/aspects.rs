use log::debug;
use std::collections::HashMap;

/// Canonical aspects and the feature strings that map onto them, in priority order.
pub const DEFAULT_ASPECT_SYNONYMS: &[(&str, &[&str])] = &[
    ("battery", &["battery", "battery life", "battery backup", "batteries"]),
    ("screen", &["screen", "display", "lcd", "monitor"]),
    ("sound", &["sound", "audio", "speaker", "volume"]),
    ("camera", &["camera", "photo", "image", "pictures"]),
    ("price", &["price", "cost", "value", "worth"]),
    ("performance", &["performance", "speed", "slow", "fast"]),
    ("memory", &["memory", "storage", "ram", "space"]),
    ("connectivity", &["wifi", "bluetooth", "connection", "connectivity"]),
    ("size", &["size", "weight", "dimension"]),
    ("design", &["design", "look", "build", "style"]),
];

/// Reverse synonym index. When a synonym is listed under several aspects,
/// the aspect defined first keeps it.
#[derive(Debug, Clone)]
pub struct AspectNormalizer {
    reverse: HashMap<String, String>,
}

impl Default for AspectNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ASPECT_SYNONYMS)
    }
}

impl AspectNormalizer {
    pub fn new(table: &[(&str, &[&str])]) -> Self {
        let mut reverse: HashMap<String, String> = HashMap::new();
        for (aspect, synonyms) in table {
            let aspect = aspect.to_lowercase();
            for synonym in synonyms.iter() {
                let key = synonym.to_lowercase();
                match reverse.get(&key) {
                    Some(existing) if *existing != aspect => {
                        debug!("Synonym '{}' already maps to '{}', ignoring '{}'", key, existing, aspect);
                    }
                    Some(_) => {}
                    None => {
                        reverse.insert(key, aspect.clone());
                    }
                }
            }
        }
        Self { reverse }
    }

    /// Maps a feature string to its canonical aspect, or its own lowercase form.
    pub fn normalize_feature(&self, feature: &str) -> String {
        let lowered = feature.to_lowercase();
        self.reverse.get(&lowered).cloned().unwrap_or(lowered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_to_canonical_aspect() {
        let normalizer = AspectNormalizer::default();
        assert_eq!(normalizer.normalize_feature("batteries"), "battery");
        assert_eq!(normalizer.normalize_feature("LCD"), "screen");
        assert_eq!(normalizer.normalize_feature("battery life"), "battery");
    }

    #[test]
    fn unknown_features_pass_through_lowercased() {
        let normalizer = AspectNormalizer::default();
        assert_eq!(normalizer.normalize_feature("xyz123"), "xyz123");
        assert_eq!(normalizer.normalize_feature("Zoom Lens"), "zoom lens");
    }

    #[test]
    fn first_defined_aspect_wins_collisions() {
        let table: &[(&str, &[&str])] = &[("price", &["value"]), ("quality", &["value", "build"])];
        let normalizer = AspectNormalizer::new(table);
        assert_eq!(normalizer.normalize_feature("value"), "price");
        assert_eq!(normalizer.normalize_feature("build"), "quality");
    }
}
