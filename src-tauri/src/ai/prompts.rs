use crate::language::Language;

/// Build the one-shot summary prompt
pub fn build_summary_prompt(text: &str, language: Language) -> String {
    format!(
        r#"Provide a concise, easy-to-read summary of the following document. Use bullet points for key takeaways. IMPORTANT: Respond ONLY in the following language: {}. Document:

---

{}"#,
        language.label(),
        text
    )
}

/// Build the system instruction that grounds a conversation in one document
pub fn build_grounding_instruction(document_text: &str, language: Language) -> String {
    format!(
        r#"You are an expert AI assistant. Your purpose is to answer questions based *only* on the content of the document provided below. Do not use any external knowledge. If the answer cannot be found within the document, state clearly that the document does not contain the information. Be helpful and precise. IMPORTANT: Respond ONLY in the following language: {}.

Here is the document:
---
{}
---"#,
        language.label(),
        document_text
    )
}
