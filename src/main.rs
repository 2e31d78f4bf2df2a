// src/main.rs
mod edgar;
mod extractors;
mod nlp;
mod storage;
mod utils;

use clap::Parser;
use edgar::client;
use edgar::models::{ReportSet, ReportSource};
use extractors::document::{Document, SectionRule};
use extractors::entities::{self, IndustryTaxonomy, DEFAULT_TAXONOMY};
use extractors::summary;
use extractors::tables;
use nlp::HeuristicTagger;
use storage::{StorageManager, SummaryKind};
use utils::AppError;

/// Command Line Interface for the EDGAR 10-K insight extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file listing companies and their 10-K filing URLs
    #[arg(short, long)]
    reports: String,

    /// Contact email sent in request headers, required by the SEC fetch policy
    #[arg(short, long)]
    agent_email: String,

    /// Output directory for text, summaries, entities and sheets
    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Proportion of the mean sentence score a sentence must reach to be
    /// included in a summary. Lower values give longer summaries.
    #[arg(long, default_value_t = 0.8)]
    threshold: f64,

    /// Which occurrence of the Item 1 "Business" markers starts the
    /// business section (heuristic, tuned on sample filings)
    #[arg(long, default_value_t = 3)]
    business_occurrence: usize,

    /// Which occurrence of the Item 7 "Discussion and Analysis" markers
    /// starts the financial section (heuristic, tuned on sample filings)
    #[arg(long, default_value_t = 4)]
    financial_occurrence: usize,

    /// JSON file overriding the built-in industry keyword taxonomy
    #[arg(long)]
    industry_keywords: Option<String>,

    /// Skip financial-table spreadsheet output
    #[arg(long)]
    skip_tables: bool,

    /// Debug mode - also save the located raw sections for inspection
    #[arg(short, long)]
    debug: bool,
}

/// What happened to one company of the batch. Failures carry their
/// reason; nothing is skipped silently.
#[derive(Debug)]
enum CompanyOutcome {
    Processed { sheets_written: usize, sheet_errors: Vec<String> },
    Failed { reason: String },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    // 3. Load the batch input and the taxonomy
    let reports = ReportSet::from_file(&args.reports)?;
    let taxonomy = match &args.industry_keywords {
        Some(path) => {
            tracing::info!("Loading industry taxonomy from {}", path);
            IndustryTaxonomy::from_file(path)?
        }
        None => DEFAULT_TAXONOMY.clone(),
    };

    // 4. Initialize storage
    let storage = StorageManager::new(&args.output_dir)?;

    tracing::info!("Processing {} companies", reports.len());

    // 5. Process each company sequentially; one failure skips that
    //    company with a recorded reason and the batch continues.
    let mut success_count = 0;
    let mut failure_count = 0;

    for source in reports.iter() {
        tracing::info!("Processing company: {}", source.name);

        match process_company(source, &args, &taxonomy, &storage).await {
            Ok(CompanyOutcome::Processed { sheets_written, sheet_errors }) => {
                success_count += 1;
                tracing::info!(
                    "Finished {}: {} sheets written, {} sheet errors",
                    source.name,
                    sheets_written,
                    sheet_errors.len()
                );
                for err in &sheet_errors {
                    tracing::warn!("{}: sheet error: {}", source.name, err);
                }
            }
            Ok(CompanyOutcome::Failed { reason }) | Err(AppError::Processing(reason)) => {
                failure_count += 1;
                tracing::error!("Skipping {}: {}", source.name, reason);
            }
            Err(e) => {
                failure_count += 1;
                tracing::error!("Skipping {}: {}", source.name, e);
            }
        }
    }

    tracing::info!(
        "Processing finished. Success: {}, Failures: {}",
        success_count,
        failure_count
    );

    if success_count == 0 && failure_count > 0 {
        return Err(AppError::Processing(format!(
            "Failed to process any of {} companies",
            failure_count
        )));
    }

    Ok(())
}

/// Runs the whole pipeline for one company: fetch, save raw text/HTML,
/// locate and summarize both sections, tag entities, write sheets.
async fn process_company(
    source: &ReportSource,
    args: &Args,
    taxonomy: &IndustryTaxonomy,
    storage: &StorageManager,
) -> Result<CompanyOutcome, AppError> {
    // Fetch once; text and tables both come from this body
    let html = client::fetch_document(&source.url, &args.agent_email).await?;
    tracing::info!("Downloaded {} bytes for {}", html.len(), source.name);

    let text = client::html_to_text(&html);
    storage.save_report_text(&source.name, &text)?;
    storage.save_report_html(&source.name, &html)?;

    let document = Document::from_text(&text);

    // Business section: locate, summarize, tag entities from the summary
    let business_rule = SectionRule::business(args.business_occurrence);
    let boundary = match document.locate(&business_rule) {
        Ok(b) => b,
        Err(e) => {
            return Ok(CompanyOutcome::Failed { reason: e.to_string() });
        }
    };
    let business_text = document.section_text(&boundary);
    if args.debug {
        storage.save_raw_section(&source.name, SummaryKind::Business, &business_text)?;
    }

    let business_summary = summary::summarize_section(&business_text, args.threshold);
    storage.save_summary(&source.name, SummaryKind::Business, &business_summary)?;

    let industries = taxonomy.top_industries(&business_summary);
    for industry in &industries {
        tracing::debug!("{}: {} ({})", source.name, industry.name, industry.count);
    }
    let products = entities::product_entities(&HeuristicTagger, &business_summary);
    storage.save_entities(&source.name, &industries, &products)?;

    // Financial section: same treatment, no entity pass
    let financial_rule = SectionRule::financial(args.financial_occurrence);
    match document.locate(&financial_rule) {
        Ok(boundary) => {
            let financial_text = document.section_text(&boundary);
            if args.debug {
                storage.save_raw_section(&source.name, SummaryKind::Financial, &financial_text)?;
            }
            let financial_summary = summary::summarize_section(&financial_text, args.threshold);
            storage.save_summary(&source.name, SummaryKind::Financial, &financial_summary)?;
        }
        Err(e) => {
            // The business outputs are already written; record and move on
            tracing::warn!("{}: no financial summary: {}", source.name, e);
        }
    }

    // Financial tables, one sheet per table; errors are collected per
    // table and the rest of the tables still get written
    let mut sheets_written = 0;
    let mut sheet_errors = Vec::new();
    if !args.skip_tables {
        let parsed = tables::parse_tables(&html);
        if let Some(toc) = tables::find_toc(&parsed) {
            tracing::debug!(
                "{}: table of contents detected with {} rows",
                source.name,
                toc.rows.len()
            );
        }
        for table in &parsed {
            match storage.save_table_sheet(&source.name, table) {
                Ok(_) => sheets_written += 1,
                Err(e) => sheet_errors.push(e.to_string()),
            }
        }
    }

    let metadata = serde_json::json!({
        "company": source.name,
        "url": source.url,
        "industries": industries.iter().map(|i| i.name.clone()).collect::<Vec<_>>(),
        "product_count": products.len(),
        "sheets_written": sheets_written,
        "sheet_errors": sheet_errors.clone(),
        "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
    });
    storage.save_run_metadata(&source.name, &metadata)?;

    Ok(CompanyOutcome::Processed { sheets_written, sheet_errors })
}
