use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::card::DocCategory;
use crate::tables::{issuing_bodies_in, month_number};

/// "№ 123", "No 45/пр", "N 7" — identifier runs to the next whitespace.
static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(№|No|N)\s?(.+?)(\s|$)").expect("identifier pattern"));

/// Spelled-month date, optionally prefixed with "от": "от 2 декабря 2020".
static DATE_WORDY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"о?т?\s?(\d{1,2})\s([а-я]{3,8})\s(\d{4})").expect("wordy date pattern"));

/// Numeric date, optionally prefixed with "от": "от 02.12.2020".
static DATE_NUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"о?т?\s?(\d{2})\.(\d{2})\.(\d{4})").expect("numeric date pattern"));

/// Reference to the rule set a document amends: "к СП 22.13330.2016".
static RELATED_RULE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"к (СП [\d.]+)").expect("related rule pattern"));

/// Dotted numeral fallback used for SpecRule identifiers.
static DOTTED_NUMERAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+)").expect("dotted numeral pattern"));

/// Structured attributes recovered from one listing title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedFields {
    pub category: String,
    pub identifier: String,
    pub effective_date: String,
    pub related_rule: String,
    pub issuing_bodies: BTreeSet<String>,
}

/// Parses a free-text listing title into typed fields.
///
/// The scan is left-to-right and consuming: the category token is removed
/// first, then each field in the fixed order identifier -> date -> related
/// rule runs against the current remainder and removes the exact substring
/// it matched, so later fields never re-match text an earlier field already
/// claimed. Issuing bodies are collected last and consume nothing.
///
/// Absent matches yield empty values, never an error. An empty title yields
/// an empty category and every downstream field empty.
pub fn extract_fields(title: &str) -> ExtractedFields {
    let title = title.trim();
    let category = title
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();
    let kind = DocCategory::from_token(&category);
    let mut remainder = consume(title, &category);

    let (identifier, span) = extract_identifier(&remainder, kind);
    remainder = consume(&remainder, &span);

    let (effective_date, span) = extract_date(&remainder);
    remainder = consume(&remainder, &span);

    let (related_rule, span) = extract_related_rule(&remainder);
    remainder = consume(&remainder, &span);

    let issuing_bodies = issuing_bodies_in(&remainder);

    ExtractedFields {
        category,
        identifier,
        effective_date,
        related_rule,
        issuing_bodies,
    }
}

/// Removes the first occurrence of `span` from `remainder` and trims.
fn consume(remainder: &str, span: &str) -> String {
    if span.is_empty() {
        return remainder.trim().to_string();
    }
    remainder.replacen(span, "", 1).trim().to_string()
}

/// Identifier extraction: explicit marker first, then per-category fallback.
///
/// Returns `(value, consumed_span)`; the span is the full match, not just
/// the captured group.
fn extract_identifier(remainder: &str, kind: DocCategory) -> (String, String) {
    if let Some(caps) = IDENTIFIER_RE.captures(remainder) {
        if let (Some(whole), Some(id)) = (caps.get(0), caps.get(2)) {
            return (id.as_str().to_string(), whole.as_str().to_string());
        }
    }
    match kind {
        // Orders carry slash-formed identifiers like "897/пр"; the first
        // slash-bearing token wins when several exist.
        DocCategory::Order => {
            for token in remainder.split_whitespace() {
                if token.contains('/') {
                    return (token.to_string(), token.to_string());
                }
            }
            (String::new(), String::new())
        }
        // Rule sets are numbered with dotted numerals like "22.13330.2016".
        DocCategory::SpecRule => match DOTTED_NUMERAL_RE.captures(remainder) {
            Some(caps) => match (caps.get(0), caps.get(1)) {
                (Some(whole), Some(id)) => {
                    (id.as_str().to_string(), whole.as_str().to_string())
                }
                _ => (String::new(), String::new()),
            },
            None => (String::new(), String::new()),
        },
        _ => (String::new(), String::new()),
    }
}

/// Date extraction: spelled-month form first, then the numeric form.
///
/// The consumed span is the regex match extended by a trailing " г." or
/// " года" marker when one literally follows the match (" г." checked
/// first).
fn extract_date(remainder: &str) -> (String, String) {
    for pattern in [&*DATE_WORDY_RE, &*DATE_NUMERIC_RE] {
        let Some(caps) = pattern.captures(remainder) else {
            continue;
        };
        let (Some(whole), Some(day), Some(month), Some(year)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };

        let mut end = whole.end();
        let tail = &remainder[end..];
        for marker in [" г.", " года"] {
            if tail.starts_with(marker) {
                end += marker.len();
                break;
            }
        }
        let span = remainder[whole.start()..end].to_string();

        let day_num = day.as_str().parse::<u32>().unwrap_or_default();
        let month_text = month.as_str();
        let value = match month_number(month_text) {
            Some(month_num) => {
                format!("{day_num:02}.{month_num:02}.{}", year.as_str())
            }
            None if month_text.chars().all(|c| c.is_ascii_digit()) => {
                let month_num = month_text.parse::<u32>().unwrap_or_default();
                format!("{day_num:02}.{month_num:02}.{}", year.as_str())
            }
            None => format!("{day_num} {month_text} {}", year.as_str()),
        };
        return (value, span);
    }
    (String::new(), String::new())
}

fn extract_related_rule(remainder: &str) -> (String, String) {
    match RELATED_RULE_RE.captures(remainder) {
        Some(caps) => match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(rule)) => {
                (rule.as_str().to_string(), whole.as_str().to_string())
            }
            _ => (String::new(), String::new()),
        },
        None => (String::new(), String::new()),
    }
}
