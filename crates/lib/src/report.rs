//! # Analysis Report
//!
//! Flattens the free-text sections of an analysis into the fields returned by
//! the upload endpoint. The rules are intentionally naive: bullets are lines
//! starting with `"- "`, key/value pairs are split on the first colon.

use crate::constants::{
    SECTION_BASIC_INFORMATION, SECTION_COMPLIANCE_CHECKLIST, SECTION_ELIGIBILITY_CRITERIA,
    SECTION_EVALUATION_CRITERIA, SECTION_KEY_REQUIREMENTS, SECTION_REQUIRED_DOCUMENTS,
    SECTION_RISKS_AND_MITIGATIONS, SECTION_TENDER_SUMMARY, SECTION_WINNING_STRATEGY,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The response-ready view of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenderReport {
    pub summary: String,
    pub basic_info: BTreeMap<String, String>,
    pub key_requirements: Vec<String>,
    pub eligibility_criteria: Vec<String>,
    pub evaluation_criteria: Vec<String>,
    pub required_documents: Vec<String>,
    pub compliance_checklist: Vec<String>,
    pub winning_strategy: String,
    pub risks_and_mitigations: Vec<BTreeMap<String, String>>,
}

impl TenderReport {
    /// Builds the report from parsed sections. Missing sections produce empty fields.
    pub fn from_sections(sections: &HashMap<String, String>) -> Self {
        let section = |name: &str| sections.get(name).map(String::as_str).unwrap_or_default();

        Self {
            summary: section(SECTION_TENDER_SUMMARY).to_string(),
            basic_info: key_value_pairs(section(SECTION_BASIC_INFORMATION)),
            key_requirements: bullet_items(section(SECTION_KEY_REQUIREMENTS)),
            eligibility_criteria: bullet_items(section(SECTION_ELIGIBILITY_CRITERIA)),
            evaluation_criteria: bullet_items(section(SECTION_EVALUATION_CRITERIA)),
            required_documents: bullet_items(section(SECTION_REQUIRED_DOCUMENTS)),
            compliance_checklist: bullet_items(section(SECTION_COMPLIANCE_CHECKLIST)),
            winning_strategy: section(SECTION_WINNING_STRATEGY).to_string(),
            risks_and_mitigations: risk_entries(section(SECTION_RISKS_AND_MITIGATIONS)),
        }
    }
}

/// Tender identification fields, drawn from the PDF metadata and the basic-info section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenderMeta {
    pub title: Option<String>,
    pub reference_number: Option<String>,
    pub issuing_organization: Option<String>,
    pub submission_deadline: Option<String>,
    pub estimated_budget: Option<String>,
}

impl TenderMeta {
    pub fn from_parts(pdf_title: Option<&str>, basic_info: &BTreeMap<String, String>) -> Self {
        let non_empty = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        let info = |key: &str| non_empty(basic_info.get(key).map(String::as_str));

        Self {
            title: non_empty(pdf_title),
            reference_number: info("tender_reference_number"),
            issuing_organization: info("issuing_organization"),
            submission_deadline: info("submission_deadline"),
            estimated_budget: info("estimated_budget"),
        }
    }
}

/// Collects `"- item"` lines (after trimming), with the marker removed.
/// Lines without the marker are dropped.
pub fn bullet_items(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.trim().strip_prefix("- "))
        .map(str::to_string)
        .collect()
}

/// Parses `key: value` lines into a map.
///
/// Keys are trimmed, lower-cased and have spaces replaced by underscores; a
/// leading `"- "` bullet marker is ignored. Lines without a colon are skipped.
pub fn key_value_pairs(body: &str) -> BTreeMap<String, String> {
    body.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix("- ").unwrap_or(line)
        })
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| {
            (
                key.trim().to_lowercase().replace(' ', "_"),
                value.trim().to_string(),
            )
        })
        .collect()
}

/// Turns `"- Risk: mitigation"` bullets into `{risk, mitigation}` maps.
pub fn risk_entries(body: &str) -> Vec<BTreeMap<String, String>> {
    bullet_items(body)
        .into_iter()
        .map(|item| {
            let (risk, mitigation) = item.split_once(':').unwrap_or((item.as_str(), ""));
            BTreeMap::from([
                ("risk".to_string(), risk.trim().to_string()),
                ("mitigation".to_string(), mitigation.trim().to_string()),
            ])
        })
        .collect()
}
