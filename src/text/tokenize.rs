//! Word tokenizer.
//!
//! Input reaching this point contains only word characters and whitespace,
//! so the Treebank rules that remain relevant are whitespace splitting and
//! the fused contractions below.

/// Fused forms split into two tokens, as `(prefix, suffix)`.
const CONTRACTIONS: &[(&str, &str)] = &[
    ("can", "not"),
    ("gim", "me"),
    ("gon", "na"),
    ("got", "ta"),
    ("lem", "me"),
    ("wan", "na"),
];

/// Split `text` into word tokens.
pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();

    for word in text.split_whitespace() {
        match split_contraction(word) {
            Some((head, tail)) => {
                tokens.push(head.to_string());
                tokens.push(tail.to_string());
            }
            None => tokens.push(word.to_string()),
        }
    }

    tokens
}

fn split_contraction(word: &str) -> Option<(&str, &str)> {
    if !word.is_ascii() {
        return None;
    }
    let lower = word.to_ascii_lowercase();
    CONTRACTIONS.iter().find_map(|(head, tail)| {
        if lower.len() == head.len() + tail.len()
            && lower.starts_with(head)
            && lower.ends_with(tail)
        {
            Some(word.split_at(head.len()))
        } else {
            None
        }
    })
}
