//! System prompt templates for the orchestrator.

/// Heading under which prior conversation is appended to the instructions.
pub const PRIOR_CONTEXT_HEADING: &str = "Previous conversation:";

/// Built-in base instructions.
pub const BASE_INSTRUCTIONS: &str = r#"You are an assistant for course materials and educational content. You may have tools that look up course information.

## Tools

- **get_course_outline**: course title, course link and the numbered lesson list. Use it for outline, syllabus and lesson-list questions.
- **search_course_content**: excerpts from the course materials. Use it for questions about specific topics or lesson details.

## Using tools in sequence

- You may call tools up to 2 times in sequence to gather what you need.
- Use the first call for initial information (an outline or a broad search), and the second to refine based on what the first returned.
- Break multi-part questions into sequential calls. For example, to find courses covering the same topic as a given lesson, fetch that course's outline first, then search for the lesson's topic.
- If tools return nothing relevant, say so plainly without offering alternatives.

## Answering

- General knowledge questions: answer from your own knowledge without tools.
- Course-specific questions: use the appropriate tool first, then answer.
- Give the answer only. Do not describe your reasoning, the tools you used, or the search results as such.
- When presenting an outline, show the course title, the course link if there is one, and every lesson with its number and title.

Keep answers brief, educational, clear, and backed by an example when one helps."#;

/// Build the system text for one run: base instructions plus, when present,
/// the prior conversation under [`PRIOR_CONTEXT_HEADING`].
pub fn build_system_context(instructions: &str, prior_context: Option<&str>) -> String {
    match prior_context.filter(|c| !c.trim().is_empty()) {
        Some(history) => format!("{instructions}\n\n{PRIOR_CONTEXT_HEADING}\n{history}"),
        None => instructions.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_prior_context_keeps_instructions_verbatim() {
        assert_eq!(build_system_context("Be brief.", None), "Be brief.");
        assert_eq!(build_system_context("Be brief.", Some("  \n")), "Be brief.");
    }

    #[test]
    fn prior_context_is_appended_under_heading() {
        let history = "User: Previous question\nAssistant: Previous answer";
        let system = build_system_context("Be brief.", Some(history));
        assert_eq!(
            system,
            format!("Be brief.\n\nPrevious conversation:\n{history}")
        );
    }
}
