//! Prompt assembly for documentation questions

use crate::index::QueryMatch;

/// Concatenates matched documents into the context block.
///
/// Each match contributes `"{title}\nURL: {url}\nContent: {content}\n\n"`;
/// matches without metadata contribute nothing.
pub fn build_context(matches: &[QueryMatch]) -> String {
    matches
        .iter()
        .filter_map(|m| m.metadata.as_ref())
        .map(|meta| {
            format!(
                "{}\nURL: {}\nContent: {}\n\n",
                meta.title, meta.url, meta.content
            )
        })
        .collect()
}

/// Wraps the context and question in the assistant instructions
pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "\nYou are a helpful assistant for developer documentation. \
         Use the following context to answer the question. \
         Include relevant documentation URLs in your response:\n\n\
         Context:\n{}\n\n\
         Question: {}\n\n\
         Answer:\n",
        context, question
    )
}
