//! Rough token count for pasted text, shown next to the composer and in the usage view.
//!
//! Not a tokenizer: about four latin characters per token and one token per CJK character.

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Latin characters per token unless configured otherwise.
pub const DEFAULT_CHARS_PER_TOKEN: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenEstimate {
    pub tokens: usize,
    pub chars: usize,
    pub words: usize,
    pub cjk_chars: usize,
}

fn cjk_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[\p{Han}\p{Hiragana}\p{Katakana}\p{Hangul}]").expect("static CJK pattern")
    })
}

fn word_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9]+(?:[\-'_][A-Za-z0-9]+)*").expect("static word pattern")
    })
}

pub fn estimate_tokens(text: &str) -> TokenEstimate {
    estimate_tokens_with(text, DEFAULT_CHARS_PER_TOKEN)
}

/// Estimate with a custom latin chars-per-token ratio (clamped to at least 1).
pub fn estimate_tokens_with(text: &str, chars_per_token: u32) -> TokenEstimate {
    let chars = text.chars().count();
    if text.trim().is_empty() {
        return TokenEstimate {
            chars,
            ..Default::default()
        };
    }

    let cjk = cjk_re();
    let cjk_chars = cjk.find_iter(text).count();
    let non_cjk_chars = chars - cjk_chars;

    let words = word_re().find_iter(&cjk.replace_all(text, " ")).count();

    let per_token = chars_per_token.max(1) as usize;
    let tokens = (non_cjk_chars.div_ceil(per_token) + cjk_chars).max(1);

    TokenEstimate {
        tokens,
        chars,
        words,
        cjk_chars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn est(tokens: usize, chars: usize, words: usize, cjk_chars: usize) -> TokenEstimate {
        TokenEstimate {
            tokens,
            chars,
            words,
            cjk_chars,
        }
    }

    #[test]
    fn empty_and_blank() {
        assert_eq!(estimate_tokens(""), est(0, 0, 0, 0));
        assert_eq!(estimate_tokens("   "), est(0, 3, 0, 0));
        assert_eq!(estimate_tokens("\n\t"), est(0, 2, 0, 0));
    }

    #[test]
    fn latin_text() {
        assert_eq!(estimate_tokens("hello world"), est(3, 11, 2, 0));
        assert_eq!(estimate_tokens("a"), est(1, 1, 1, 0));
    }

    #[test]
    fn cjk_text() {
        assert_eq!(estimate_tokens("你好"), est(2, 2, 0, 2));
        assert_eq!(estimate_tokens("abc你好"), est(3, 5, 1, 2));
        // hiragana, katakana, hangul
        assert_eq!(estimate_tokens("ひらカナ한국").cjk_chars, 6);
    }

    #[test]
    fn cjk_separates_words() {
        assert_eq!(estimate_tokens("foo中bar").words, 2);
    }

    #[test]
    fn joined_words_count_once() {
        let e = estimate_tokens("can't stop well-known snake_case v2 -- !");
        assert_eq!(e.words, 5);
    }

    #[test]
    fn punctuation_only_still_one_token() {
        assert_eq!(estimate_tokens("!"), est(1, 1, 0, 0));
    }

    #[test]
    fn custom_ratio() {
        assert_eq!(estimate_tokens_with("hello world", 2).tokens, 6);
        assert_eq!(estimate_tokens_with("hello world", 0).tokens, 11);
    }

    #[test]
    fn astral_characters_count_once() {
        // chars are Unicode scalars, not UTF-16 units
        assert_eq!(estimate_tokens("\u{20000}"), est(1, 1, 0, 1));
        assert_eq!(estimate_tokens("\u{1F600}").chars, 1);
    }

    #[test]
    fn deterministic() {
        let text = "Mixed 文本 with カタカナ and words";
        assert_eq!(estimate_tokens(text), estimate_tokens(text));
    }
}
