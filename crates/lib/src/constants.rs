//! # Shared Constants
//!
//! Fixed analysis parameters, the section headings the analysis prompt asks for,
//! and the metadata keys written alongside every stored tender.

/// Tender text longer than this many characters is cut before prompting.
pub const MAX_TENDER_TEXT_CHARS: usize = 150_000;

/// Sampling temperature sent with every analysis request.
pub const ANALYSIS_TEMPERATURE: f32 = 0.7;

/// Upper bound on the number of tokens the model may emit for one analysis.
pub const ANALYSIS_MAX_TOKENS: u32 = 4000;

pub const SECTION_TENDER_SUMMARY: &str = "TENDER SUMMARY";
pub const SECTION_BASIC_INFORMATION: &str = "BASIC INFORMATION";
pub const SECTION_KEY_REQUIREMENTS: &str = "KEY REQUIREMENTS";
pub const SECTION_ELIGIBILITY_CRITERIA: &str = "ELIGIBILITY CRITERIA";
pub const SECTION_EVALUATION_CRITERIA: &str = "EVALUATION CRITERIA";
pub const SECTION_REQUIRED_DOCUMENTS: &str = "REQUIRED DOCUMENTS";
pub const SECTION_COMPLIANCE_CHECKLIST: &str = "COMPLIANCE CHECKLIST";
pub const SECTION_WINNING_STRATEGY: &str = "WINNING STRATEGY";
pub const SECTION_RISKS_AND_MITIGATIONS: &str = "RISKS AND MITIGATIONS";

/// The sections, in the order the prompt lists them.
pub const ANALYSIS_SECTIONS: [&str; 9] = [
    SECTION_TENDER_SUMMARY,
    SECTION_BASIC_INFORMATION,
    SECTION_KEY_REQUIREMENTS,
    SECTION_ELIGIBILITY_CRITERIA,
    SECTION_EVALUATION_CRITERIA,
    SECTION_REQUIRED_DOCUMENTS,
    SECTION_COMPLIANCE_CHECKLIST,
    SECTION_WINNING_STRATEGY,
    SECTION_RISKS_AND_MITIGATIONS,
];

pub const METADATA_FILENAME: &str = "filename";
pub const METADATA_TITLE: &str = "title";
pub const METADATA_ANALYSIS_SUMMARY: &str = "analysis_summary";
pub const METADATA_DOCUMENT_ID: &str = "document_id";

/// File name of the vector index inside the persist directory.
pub const INDEX_FILE_NAME: &str = "tenders.db";
