//! Lexical tag suggestion.
//!
//! Scores known tags against free-text interest input by plain lexical
//! overlap. A heuristic relevance ranker, not a learned model: nothing is
//! trained and no score is persisted.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::DUTCH_STOP_WORDS;

/// Minimum input length before any suggestion is produced.
pub const MIN_SUGGEST_INPUT_LEN: usize = 10;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 8;

const EXACT_MATCH_SCORE: u32 = 10;
const TAG_CONTAINS_TOKEN_SCORE: u32 = 5;
const TOKEN_CONTAINS_TAG_SCORE: u32 = 3;
const SHARED_PREFIX_SCORE: u32 = 1;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// A known tag with its relevance score for the given input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSuggestion {
    pub tag: String,
    pub score: u32,
}

/// Ranks the known tags against free-text interest input.
///
/// Returns the top [`MAX_SUGGESTIONS`] tags by descending score; ties
/// keep corpus order. Input under [`MIN_SUGGEST_INPUT_LEN`] characters
/// yields nothing.
pub fn suggest_tags(input: &str, corpus: &[String]) -> Vec<TagSuggestion> {
    if input.trim().chars().count() < MIN_SUGGEST_INPUT_LEN {
        return Vec::new();
    }

    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut suggestions: Vec<TagSuggestion> = corpus
        .iter()
        .filter_map(|tag| {
            let score = score_tag(&tag.to_lowercase(), &tokens);
            (score > 0).then(|| TagSuggestion {
                tag: tag.clone(),
                score,
            })
        })
        .collect();

    // sort_by is stable, so equal scores keep corpus order
    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Splits free text into scoring tokens: lowercased, alphanumeric only,
/// stop words and short fragments dropped.
pub fn tokenize(input: &str) -> Vec<String> {
    let lowered = input.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|t| t.chars().count() >= 3)
        .filter(|t| !DUTCH_STOP_WORDS.contains(t))
        .map(|t| t.to_string())
        .collect()
}

/// Scores one (lowercased) tag against the token set. Per token the
/// strongest matching rule wins; token scores accumulate.
fn score_tag(tag: &str, tokens: &[String]) -> u32 {
    tokens
        .iter()
        .map(|token| {
            if token == tag {
                EXACT_MATCH_SCORE
            } else if tag.contains(token.as_str()) {
                TAG_CONTAINS_TOKEN_SCORE
            } else if tag.len() >= 3 && token.contains(tag) {
                TOKEN_CONTAINS_TAG_SCORE
            } else if shares_prefix(tag, token) {
                SHARED_PREFIX_SCORE
            } else {
                0
            }
        })
        .sum()
}

fn shares_prefix(tag: &str, token: &str) -> bool {
    let tag_prefix: Vec<char> = tag.chars().take(3).collect();
    let token_prefix: Vec<char> = token.chars().take(3).collect();
    tag_prefix.len() == 3 && tag_prefix == token_prefix
}
