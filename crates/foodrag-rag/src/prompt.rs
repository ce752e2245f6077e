use foodrag_core::types::{ChatMessage, RetrievedDoc};

pub const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that answers questions about food based on the provided context. Be concise and accurate.";

/// Retrieved texts, one per line, in retrieval order.
pub fn build_context(docs: &[RetrievedDoc]) -> String {
    docs.iter().map(|d| d.original_text.as_str()).collect::<Vec<_>>().join("\n")
}

pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Use the following context to answer the question.\n\nContext:\n{context}\n\nQuestion: {question}\nAnswer:"
    )
}

pub fn build_messages(prompt: String) -> Vec<ChatMessage> {
    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)]
}
