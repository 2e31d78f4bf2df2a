// src/storage/mod.rs
use crate::extractors::entities::IndustryMatch;
use crate::extractors::tables::ParsedTable;
use crate::utils::error::StorageError;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};

// Characters that break spreadsheet file naming; replaced with '_'.
const FILENAME_UNSAFE: [char; 8] = [' ', ',', '.', ':', ';', '$', '(', ')'];

/// Which of the two per-company summaries a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    Business,
    Financial,
}

impl SummaryKind {
    fn suffix(&self) -> &'static str {
        match self {
            SummaryKind::Business => "business_summary",
            SummaryKind::Financial => "financial_summary",
        }
    }
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager rooted at the given directory.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    fn subdir(&self, name: &str) -> Result<PathBuf, StorageError> {
        let dir = self.base_dir.join(name);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(StorageError::IoError)?;
        }
        Ok(dir)
    }

    /// Saves the extracted plain text of a filing.
    pub fn save_report_text(&self, company: &str, text: &str) -> Result<PathBuf, StorageError> {
        let path = self.subdir("reports_txt")?.join(format!("{}.txt", company));
        fs::write(&path, text).map_err(StorageError::IoError)?;
        tracing::info!("Saved report text to {}", path.display());
        Ok(path)
    }

    /// Saves the raw page source of a filing.
    pub fn save_report_html(&self, company: &str, html: &str) -> Result<PathBuf, StorageError> {
        let path = self.subdir("reports_html")?.join(format!("{}.html", company));
        fs::write(&path, html).map_err(StorageError::IoError)?;
        tracing::info!("Saved report HTML to {}", path.display());
        Ok(path)
    }

    /// Saves a summary exactly as passed; reading the file back yields the
    /// identical string.
    pub fn save_summary(
        &self,
        company: &str,
        kind: SummaryKind,
        summary: &str,
    ) -> Result<PathBuf, StorageError> {
        let path = self
            .subdir("summaries_txt")?
            .join(format!("{}_{}.txt", company, kind.suffix()));
        fs::write(&path, summary).map_err(StorageError::IoError)?;
        tracing::info!("Saved {} summary to {}", kind.suffix(), path.display());
        Ok(path)
    }

    /// Saves the entity report in its fixed two-line format:
    /// `Industry entities: 1 <name> 2 <name> ...` then
    /// `Product entities: 1 <name> ...`.
    pub fn save_entities(
        &self,
        company: &str,
        industries: &[IndustryMatch],
        products: &[String],
    ) -> Result<PathBuf, StorageError> {
        let mut report = String::from("Industry entities: ");
        for (i, industry) in industries.iter().enumerate() {
            report.push_str(&format!("{} {} ", i + 1, industry.name));
        }
        report.push('\n');
        report.push_str("Product entities: ");
        for (i, product) in products.iter().enumerate() {
            report.push_str(&format!("{} {} ", i + 1, product));
        }

        let path = self
            .subdir("entities_txt")?
            .join(format!("{}_entities.txt", company));
        fs::write(&path, report).map_err(StorageError::IoError)?;
        tracing::info!("Saved entity report to {}", path.display());
        Ok(path)
    }

    /// Writes one spreadsheet for a parsed financial table, named after
    /// its sanitized first cell, into the company's sheet folder.
    pub fn save_table_sheet(
        &self,
        company: &str,
        table: &ParsedTable,
    ) -> Result<PathBuf, StorageError> {
        let first_cell = table.first_cell().ok_or_else(|| StorageError::SpreadsheetError {
            name: String::from("<unnamed>"),
            reason: String::from("table has no cells to name it by"),
        })?;
        let sheet_name = sanitize_sheet_name(first_cell);

        let dir = self.subdir("financial_sheets")?.join(company);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(StorageError::IoError)?;
        }
        let path = dir.join(format!("{}.xlsx", sheet_name));

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in table.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                worksheet
                    .write_string(r as u32, c as u16, cell)
                    .map_err(|e| StorageError::SpreadsheetError {
                        name: sheet_name.clone(),
                        reason: e.to_string(),
                    })?;
            }
        }
        workbook
            .save(&path)
            .map_err(|e| StorageError::SpreadsheetError {
                name: sheet_name.clone(),
                reason: e.to_string(),
            })?;

        tracing::info!("Saved financial sheet to {}", path.display());
        Ok(path)
    }

    /// Debug aid: saves the located raw section text before summarization.
    pub fn save_raw_section(
        &self,
        company: &str,
        kind: SummaryKind,
        text: &str,
    ) -> Result<PathBuf, StorageError> {
        let path = self
            .subdir("debug")?
            .join(format!("{}_{}_raw.txt", company, kind.suffix()));
        fs::write(&path, text).map_err(StorageError::IoError)?;
        tracing::debug!("Saved raw section to {}", path.display());
        Ok(path)
    }

    /// Saves run metadata for one company in JSON format.
    pub fn save_run_metadata(
        &self,
        company: &str,
        metadata: &serde_json::Value,
    ) -> Result<PathBuf, StorageError> {
        let path = self
            .subdir("entities_txt")?
            .join(format!("{}_meta.json", company));

        let metadata_str = serde_json::to_string_pretty(metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&path, metadata_str).map_err(StorageError::IoError)?;
        tracing::info!("Saved metadata to {}", path.display());
        Ok(path)
    }
}

/// Replaces characters that are unsafe in spreadsheet file names.
fn sanitize_sheet_name(name: &str) -> String {
    name.chars()
        .map(|c| if FILENAME_UNSAFE.contains(&c) { '_' } else { c })
        .collect()
}
