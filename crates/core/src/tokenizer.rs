//! Word-boundary tokenizer for Spanish text
//!
//! Numbers keep their decimal separators, words are Unicode word runs
//! (accents and ñ included), and every other non-space character is a token
//! of its own, so `¿` and `?` split off from the words they wrap.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::NlpError;
use crate::types::Token;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:[.,]\d+)*|\w+(?:['’]\w+)*|[^\w\s]").expect("Invalid regex")
});

/// Split text into surface tokens, preserving case
pub fn split_words(text: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Case-fold then split, numbering tokens from 1
pub fn try_tokenize(text: &str, max_chars: usize) -> Result<Vec<Token>, NlpError> {
    check_length(text, max_chars)?;
    let folded = text.to_lowercase();
    Ok(split_words(&folded)
        .into_iter()
        .enumerate()
        .map(|(i, word)| Token {
            text: word.to_string(),
            position: i + 1,
        })
        .collect())
}

pub(crate) fn check_length(text: &str, max_chars: usize) -> Result<(), NlpError> {
    let len = text.chars().count();
    if len > max_chars {
        return Err(NlpError::InputTooLong { len, max: max_chars });
    }
    Ok(())
}

/// True when the token is made of digits, optionally with decimal separators
pub fn is_numeric(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
        && token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

/// True when the token is a single punctuation or symbol character
pub fn is_punctuation(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_alphanumeric() && c != '_')
}
