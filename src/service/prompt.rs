//! Prompt assembly for contract question answering.

use std::fmt::Write as _;

/// Answer returned when retrieval produced no context.
pub const NO_CONTEXT_ANSWER: &str = "No contract context available to generate an answer.";

const EXCERPT_SEPARATOR: &str = "\n\n---\n\n";

/// Build the question-answering prompt.
///
/// Excerpt `i` is labelled with `contract_ids[i]` when such an id exists, otherwise with its
/// 1-based position.
pub fn build_prompt(
    query: &str,
    context_texts: &[String],
    contract_ids: Option<&[String]>,
) -> String {
    let ids = contract_ids.unwrap_or_default();
    let context = context_texts
        .iter()
        .enumerate()
        .map(|(index, text)| match ids.get(index) {
            Some(id) => format!("Contract ID: {id}\n{text}"),
            None => format!("Contract Excerpt {}:\n{text}", index + 1),
        })
        .collect::<Vec<_>>()
        .join(EXCERPT_SEPARATOR);

    let mut prompt = String::from(
        "You are a helpful assistant that answers questions about contracts using only the \
         contract excerpts provided below.\n\n\
         If the excerpts do not contain the information needed, say so clearly.\n\n",
    );
    let _ = write!(prompt, "Contract Excerpts:\n{context}\n\n");
    let _ = write!(prompt, "User Question: {query}\n\n");
    prompt.push_str(
        "Answer clearly and accurately based only on the excerpts above. When you reference \
         specific information, mention which contract it comes from if that is known.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn excerpts_without_ids_are_numbered() {
        let prompt = build_prompt("Who pays?", &texts(&["first", "second"]), None);

        assert!(prompt.contains("Contract Excerpt 1:\nfirst"));
        assert!(prompt.contains("Contract Excerpt 2:\nsecond"));
        assert!(prompt.contains("first\n\n---\n\nContract Excerpt 2"));
        assert!(!prompt.contains("Contract ID:"));
    }

    #[test]
    fn aligned_ids_replace_excerpt_numbers() {
        let ids = texts(&["C-1", "C-2"]);
        let prompt = build_prompt(
            "Who pays?",
            &texts(&["first", "second"]),
            Some(ids.as_slice()),
        );

        assert!(prompt.contains("Contract ID: C-1\nfirst"));
        assert!(prompt.contains("Contract ID: C-2\nsecond"));
        assert!(!prompt.contains("Contract Excerpt"));
    }

    #[test]
    fn short_id_list_falls_back_to_numbers() {
        let ids = texts(&["C-1"]);
        let prompt = build_prompt(
            "q",
            &texts(&["first", "second", "third"]),
            Some(ids.as_slice()),
        );

        assert!(prompt.contains("Contract ID: C-1\nfirst"));
        assert!(prompt.contains("Contract Excerpt 2:\nsecond"));
        assert!(prompt.contains("Contract Excerpt 3:\nthird"));
    }

    #[test]
    fn question_follows_excerpts() {
        let prompt = build_prompt("What is the notice period?", &texts(&["body"]), None);
        let excerpt_at = prompt.find("Contract Excerpts:").unwrap();
        let question_at = prompt.find("User Question: What is the notice period?").unwrap();

        assert!(excerpt_at < question_at);
        assert!(prompt.ends_with("if that is known."));
    }
}
