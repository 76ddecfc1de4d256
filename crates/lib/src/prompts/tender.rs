//! # Tender Analysis Prompts
//!
//! The system prompt and user prompt template for the structured tender analysis.
//! The user prompt pins the `# SECTION NAME` heading format that
//! [`crate::analysis::parse_sections`] relies on.

pub const TENDER_ANALYSIS_SYSTEM_PROMPT: &str =
    "You are an expert in analyzing tender documents with deep reasoning capabilities.";

/// The user prompt. `{tender_text}` is replaced with the (possibly truncated) tender text.
pub const TENDER_ANALYSIS_USER_PROMPT: &str = r#"Analyze this tender document thoroughly and provide a detailed breakdown.

Structure your response with these sections, each introduced by a heading line of the exact form "# SECTION NAME":

# TENDER SUMMARY
Summarize the tender opportunity in a concise paragraph.

# BASIC INFORMATION
- Tender Reference Number:
- Issuing Organization:
- Submission Deadline:
- Project Location:
- Estimated Budget:

# KEY REQUIREMENTS
List core technical, financial, and operational needs.

# ELIGIBILITY CRITERIA
List must-meet bidder criteria.

# EVALUATION CRITERIA
Detail how bids are scored.

# REQUIRED DOCUMENTS
List all submission documents.

# COMPLIANCE CHECKLIST
Critical compliance points checklist.

# WINNING STRATEGY
Strategic tips to win the tender.

# RISKS AND MITIGATIONS
Potential risks and how to mitigate them, one "- Risk: mitigation" line per risk.

# Tender Text:
{tender_text}
"#;

/// Fills the user prompt template with the tender text.
pub fn build_analysis_prompt(tender_text: &str) -> String {
    TENDER_ANALYSIS_USER_PROMPT.replace("{tender_text}", tender_text)
}
