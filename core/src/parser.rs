//! Format string → ordered section list.
//!
//! Tokenization is greedy longest-match over the adapter's token list. Text
//! between the adapter's escape characters, and any character that does not
//! start a known token, is collected into literal sections. A format that
//! cannot produce a single editable section degrades to one literal section
//! spanning the whole string.

use std::cell::{Cell, RefCell};
use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::{trace, warn};

use crate::adapter::DateAdapter;
use crate::locale::LocaleText;
use crate::section::Section;
use crate::state::layout_sections;

/// Result of splitting a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFormat {
    pub sections: Vec<Section>,
    /// Set when the format fell back to a single literal section
    pub malformed: bool,
}

impl ParsedFormat {
    fn fallback(format: &str) -> Self {
        let mut sections = vec![Section::literal(format)];
        layout_sections(&mut sections);
        Self {
            sections,
            malformed: true,
        }
    }
}

/// Split `format` into sections without caching.
pub fn split_format<A: DateAdapter>(adapter: &A, locale: &LocaleText, format: &str) -> ParsedFormat {
    let (open, close) = adapter.escape_chars();
    let mut tokens = adapter.format_tokens();
    tokens.sort_by_key(|t| std::cmp::Reverse(t.len()));

    let mut sections: Vec<Section> = Vec::new();
    let mut literal = String::new();
    let mut pos = 0;

    while pos < format.len() {
        let rest = &format[pos..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        if ch == open {
            // A doubled quote is a literal quote character.
            if open == close && rest[ch.len_utf8()..].starts_with(close) {
                literal.push(close);
                pos += ch.len_utf8() + close.len_utf8();
                continue;
            }
            match scan_escaped(&rest[ch.len_utf8()..], open, close) {
                Some((text, consumed)) => {
                    literal.push_str(&text);
                    pos += ch.len_utf8() + consumed;
                    continue;
                }
                None => {
                    warn!(format, "unterminated escape in format");
                    return ParsedFormat::fallback(format);
                }
            }
        }

        let matched = tokens
            .iter()
            .find(|token| rest.starts_with(**token))
            .and_then(|token| adapter.token_info(token).map(|info| (*token, info)));

        match matched {
            Some((token, info)) => {
                if !literal.is_empty() {
                    sections.push(Section::literal(std::mem::take(&mut literal)));
                }
                let placeholder =
                    locale.placeholder(info.section_type, info.content_type, info.digit_count);
                sections.push(Section::from_token(token, info, placeholder));
                pos += token.len();
            }
            None => {
                literal.push(ch);
                pos += ch.len_utf8();
            }
        }
    }

    if !literal.is_empty() {
        sections.push(Section::literal(literal));
    }

    if !sections.iter().any(|s| s.editable) {
        warn!(format, "format has no editable section");
        return ParsedFormat::fallback(format);
    }

    layout_sections(&mut sections);
    ParsedFormat {
        sections,
        malformed: false,
    }
}

/// Read an escaped run up to the closing character.
///
/// Returns the literal text and the number of bytes consumed including the
/// closing character, or `None` when the run is never closed.
fn scan_escaped(input: &str, open: char, close: char) -> Option<(String, usize)> {
    let mut text = String::new();
    let mut iter = input.char_indices().peekable();
    while let Some((idx, c)) = iter.next() {
        if c == close {
            if open == close {
                if let Some(&(_, next)) = iter.peek() {
                    if next == close {
                        text.push(close);
                        iter.next();
                        continue;
                    }
                }
            }
            return Some((text, idx + c.len_utf8()));
        }
        text.push(c);
    }
    None
}

/// Format parser with an LRU cache of section templates.
///
/// Templates depend on the format string and the locale text; callers must
/// call `clear_cache` whenever the locale or adapter changes.
#[derive(Debug)]
pub struct FormatParser {
    cache: RefCell<LruCache<String, ParsedFormat>>,
    cache_hits: Cell<usize>,
    cache_misses: Cell<usize>,
}

impl FormatParser {
    /// Create a parser caching up to `capacity` formats.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RefCell::new(LruCache::new(capacity)),
            cache_hits: Cell::new(0),
            cache_misses: Cell::new(0),
        }
    }

    /// Parse `format`, reusing a cached template when available.
    pub fn parse<A: DateAdapter>(&self, adapter: &A, locale: &LocaleText, format: &str) -> ParsedFormat {
        if let Some(cached) = self.cache.borrow_mut().get(format) {
            self.cache_hits.set(self.cache_hits.get() + 1);
            trace!(format, "format template cache hit");
            return cached.clone();
        }

        self.cache_misses.set(self.cache_misses.get() + 1);
        let parsed = split_format(adapter, locale, format);
        self.cache
            .borrow_mut()
            .put(format.to_string(), parsed.clone());
        parsed
    }

    /// Drop every cached template.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// (hits, misses) since creation.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache_hits.get(), self.cache_misses.get())
    }
}

impl Default for FormatParser {
    fn default() -> Self {
        Self::new(64)
    }
}
