//! Extraction prompt

/// Builds the JSON-only extraction prompt sent for each submission
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalysisPrompt;

impl AnalysisPrompt {
    /// Render the prompt for one document
    ///
    /// The document is cut to `max_text_length` characters; a cut document
    /// ends with `...` so the model knows the text continues.
    pub fn render(filename: &str, text: &str, max_text_length: usize) -> String {
        let (content, truncated) = truncate_chars(text, max_text_length);
        let indicator = if truncated { "..." } else { "" };

        format!(
            r#"
Analyze the Request for Information (RFI) response text from filename '{filename}'.
Extract information based *only* on the provided text.

**Output Format:**
Respond with a single, valid JSON object and nothing else. Do not wrap it in "```json" or "```" markers.
The JSON object must have these top-level keys:
- "submitter_name": string (The submitter's name, e.g. a university, company, association, person or "Anonymous". Use "Not Stated" if not found.)
- "inferred_submitter_type": string (One of: Academia, Industry-Large, Industry-Startup, Industry-Association, Professional-Society, Advocacy/Think Tank, Government, Individual, Anonymous, Unclear. Use "Unclear" if not determinable.)
- "mission_interest_summary": string (1-2 sentence summary of the submitter's mission or policy focus. Use "Not Stated" if not found.)
- "key_concerns": array of strings (Main concerns, barriers or risks, one string each. You MAY prefix a concern with "[From Section X: Section Name]" when the document has clear sections. Use [] if none are stated.)
- "policy_recommendations": array of strings (Main policy recommendations, one string each, optionally prefixed with section information like concerns. Use [] if none are proposed.)
- "identified_sections": array of strings (Names of the major sections you identified, e.g. ["Introduction", "Recommendations"]. Use [] if there are no clear sections.)

**RFI Response Text (first {max_text_length} characters if truncated):**
```markdown
{content}{indicator}
```

**Important Notes:**
- Escape special characters (quotes, newlines) inside JSON strings.
- Prefer an empty array [] over placeholder strings when nothing is found.
- Do not invent information. Stick strictly to the document content.

Begin the JSON object now:
"#
        )
    }
}

/// Cut `text` to at most `max_chars` characters, reporting whether it was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => (&text[..index], true),
        None => (text, false),
    }
}
