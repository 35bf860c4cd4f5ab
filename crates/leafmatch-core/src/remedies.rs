//! Disease remedy catalog
//!
//! Maps disease labels (the reference index labels) to recorded remedy
//! text. A builtin catalog covers the stock reference set; YAML files can
//! replace or extend it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Label to remedy lookup table.
///
/// Kept sorted by label so listings are stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemedyBook {
    remedies: BTreeMap<String, String>,
}

impl RemedyBook {
    /// The builtin remedy catalog for the stock reference labels.
    pub fn builtin() -> Self {
        let entries = [
            ("leaf_blight", "Spray copper fungicide; remove affected leaves."),
            ("powdery_mildew", "Apply sulfur dust or neem oil weekly."),
            ("root_rot", "Improve drainage; fungicide drench required."),
            ("bacterial_spot", "Use copper hydroxide spray; prune infected parts."),
            ("rust", "Plant resistant varieties; spray triazole fungicides."),
            ("yellow_leaf_curl", "Control whiteflies with neem oil or insecticides."),
            ("blast", "Use resistant seeds; carbendazim spray at 10-day intervals."),
            ("tikka_disease", "Spray chlorothalonil or mancozeb for 2-3 weeks."),
            ("wilt", "Rotate crops; soil solarization; fungicide treatment."),
            ("downy_mildew", "Spray metalaxyl + mancozeb; avoid overhead irrigation."),
            ("anthracnose", "Remove infected fruits; spray carbendazim."),
            ("early_blight", "Spray mancozeb or chlorothalonil at 7-10 day intervals."),
            ("late_blight", "Use metalaxyl + mancozeb spray, avoid excess irrigation."),
            ("stem_borer", "Apply carbofuran granules at base; maintain field hygiene."),
            ("fruit_rot", "Collect and destroy rotten fruits; apply fungicide sprays."),
            ("sooty_mold", "Wash leaves with mild soap solution; control honeydew insects."),
        ];

        Self {
            remedies: entries
                .iter()
                .map(|(label, remedy)| (label.to_string(), remedy.to_string()))
                .collect(),
        }
    }

    /// Look up the remedy recorded for a label.
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.remedies.get(label).map(|s| s.as_str())
    }

    /// Add or replace the remedy for a label.
    pub fn insert(&mut self, label: String, remedy: String) {
        self.remedies.insert(label, remedy);
    }

    /// Labels with recorded remedies, in sorted order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.remedies.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.remedies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remedies.is_empty()
    }
}

/// Load a remedy book from a YAML file
pub fn load_remedy_book<P: AsRef<Path>>(path: P) -> Result<RemedyBook, String> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read remedies file: {}", e))?;

    serde_yaml::from_str(&contents).map_err(|e| format!("Failed to parse remedies YAML: {}", e))
}

/// Save a remedy book to a YAML file
pub fn save_remedy_book<P: AsRef<Path>>(book: &RemedyBook, path: P) -> Result<(), String> {
    let yaml =
        serde_yaml::to_string(book).map_err(|e| format!("Failed to serialize remedies: {}", e))?;

    std::fs::write(path.as_ref(), yaml).map_err(|e| format!("Failed to write remedies file: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let book = RemedyBook::builtin();
        assert_eq!(book.len(), 16);
        assert!(book
            .lookup("rust")
            .unwrap()
            .contains("triazole fungicides"));
        assert_eq!(book.lookup("unknown_disease"), None);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut book = RemedyBook::builtin();
        book.insert("rust".to_string(), "Updated advice.".to_string());
        assert_eq!(book.lookup("rust"), Some("Updated advice."));
        assert_eq!(book.len(), 16);
    }

    #[test]
    fn test_labels_are_sorted() {
        let book = RemedyBook::builtin();
        let labels: Vec<&str> = book.labels().collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("remedies.yml");

        let mut book = RemedyBook::builtin();
        book.insert("new_disease".to_string(), "New remedy.".to_string());

        save_remedy_book(&book, &path).expect("save remedies");
        let loaded = load_remedy_book(&path).expect("load remedies");

        assert_eq!(loaded.len(), 17);
        assert_eq!(loaded.lookup("new_disease"), Some("New remedy."));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_remedy_book("/nonexistent/remedies.yml");
        assert!(result.is_err());
    }
}
