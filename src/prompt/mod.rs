//! PRD prompt construction
//!
//! Turns a product idea into the instruction document handed to the
//! deep-search delegate. Pure and deterministic.

/// Query used for the startup warm-up generation
pub const WARMUP_QUERY: &str = "Generate a PRD for a simple to-do list application";

/// Section headings every prompt carries, in order
pub const SECTIONS: [&str; 8] = [
    "Overview and Objectives",
    "Target Users and User Stories",
    "Functional Requirements",
    "Technical Requirements",
    "User Interface and User Experience",
    "Non-Functional Requirements",
    "Implementation Phases",
    "Success Metrics and Acceptance Criteria",
];

const SECTION_HINTS: [&str; 8] = [
    "Provide a clear description of {query} and its main goals",
    "Define the target audience and key user stories",
    "List all essential features and functionality in detail",
    "Specify technologies, platforms, integrations, and technical constraints",
    "Describe the UI/UX, including key screens, workflows, and design principles",
    "Include performance, scalability, security, and accessibility requirements",
    "Outline development phases and priorities",
    "Define how to measure success and specific acceptance criteria",
];

/// Prefix of the line carrying the query; the delegate searches on what follows it
pub const QUERY_LINE_PREFIX: &str =
    "Generate a comprehensive Product Requirements Document (PRD) for: ";

/// Build the PRD instruction document for `query`.
///
/// The query appears verbatim on the opening line, as the document title,
/// and in the overview section.
/// Callers reject empty queries before reaching this point.
pub fn build_prd_prompt(query: &str) -> String {
    let mut prompt = String::with_capacity(1536 + query.len() * 2);

    prompt.push_str(QUERY_LINE_PREFIX);
    prompt.push_str(query);
    prompt.push_str("\n\nThe PRD should be suitable for AI code generation and include:\n\n");
    prompt.push_str(&format!("# {} - Product Requirements Document\n", query));

    for (heading, hint) in SECTIONS.iter().zip(SECTION_HINTS.iter()) {
        let hint = hint.replace("{query}", query);
        prompt.push_str(&format!("\n## {}\n[{}]\n", heading, hint));
    }

    prompt.push_str(
        "\nMake the PRD comprehensive, detailed, and immediately actionable for AI code generation.\n\
         Include specific requirements rather than vague statements.\n",
    );

    prompt
}

/// Recover the query from a prompt built by [`build_prd_prompt`]
pub fn extract_query(prompt: &str) -> Option<&str> {
    prompt
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.strip_prefix(QUERY_LINE_PREFIX.trim_end()))
        .map(str::trim)
        .filter(|q| !q.is_empty())
}
