use crate::engine::ast::{Word, WordPart};
use std::env;

/// Expands a word against the process environment. Unset variables expand to nothing.
pub fn expand(word: &Word) -> String {
    expand_with(word, |name| env::var_os(name).map(|v| v.to_string_lossy().into_owned()))
}

/// Expands a word, resolving each variable fragment through `lookup`.
pub fn expand_with<F>(word: &Word, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    word.0.iter().fold(String::new(), |mut acc, part| {
        match part {
            WordPart::Literal(s) => acc.push_str(s),
            WordPart::Var(name) => {
                if let Some(val) = lookup(name) {
                    acc.push_str(&val);
                }
            }
        }
        acc
    })
}

/// One expanded string per parameter word.
pub fn expand_all(words: &[Word]) -> Vec<String> {
    words.iter().map(expand).collect()
}
