// src/edgar/models.rs
use crate::utils::AppError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The batch input: an ordered list of companies and the EDGAR filing URL
/// to analyze for each. Loaded from a JSON array so the processing order
/// matches the file.
///
/// ```json
/// [
///   { "name": "tesla", "url": "https://www.sec.gov/Archives/edgar/data/.../tsla-20221231.htm" },
///   { "name": "apple", "url": "https://www.sec.gov/Archives/edgar/data/.../aapl-20220924.htm" }
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSet(pub Vec<ReportSource>);

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSource {
    /// Identifier used for output file and folder names.
    pub name: String,
    /// URL of the primary 10-K document.
    pub url: String,
}

impl ReportSet {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let raw = fs::read_to_string(&path)?;
        let set: ReportSet = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("invalid report set: {}", e)))?;
        if set.0.is_empty() {
            return Err(AppError::Config("report set is empty".to_string()));
        }
        Ok(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportSource> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_set_parses_in_order() {
        let json = r#"[
            { "name": "tesla", "url": "https://example.com/tsla.htm" },
            { "name": "apple", "url": "https://example.com/aapl.htm" }
        ]"#;
        let set: ReportSet = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = set.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["tesla", "apple"]);
    }
}
