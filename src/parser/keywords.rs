//! Gherkin keywords recognised by the parser, English and Japanese.

use crate::models::StepKind;

pub const FEATURE: &[&str] = &["Feature", "機能"];
pub const SCENARIO: &[&str] = &[
    "Scenario Outline",
    "Scenario",
    "シナリオアウトライン",
    "シナリオ",
];
pub const BACKGROUND: &[&str] = &["Background", "背景"];

pub const STEPS: &[(&str, StepKind)] = &[
    ("Given", StepKind::Given),
    ("前提", StepKind::Given),
    ("When", StepKind::When),
    ("もし", StepKind::When),
    ("Then", StepKind::Then),
    ("ならば", StepKind::Then),
    ("And", StepKind::And),
    ("かつ", StepKind::And),
    ("But", StepKind::And),
    ("しかし", StepKind::And),
];

/// Separators accepted after a marker keyword.
pub const COLONS: [char; 2] = [':', '：'];

/// Strip `keyword` from the start of `line`, returning the remainder.
///
/// English keywords must end at a word boundary (`Andrew` is not `And`);
/// Japanese keywords are matched as plain prefixes since the text that
/// follows is often not space separated.
pub fn match_keyword<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(keyword)?;
    if !keyword.is_ascii() {
        return Some(rest);
    }
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || COLONS.contains(&c) => Some(rest),
        _ => None,
    }
}

/// Match a `Keyword:` marker line of a group, returning the trimmed name
/// after the colon. A keyword without a colon is description text.
pub fn match_marker<'a>(line: &'a str, keywords: &[&str]) -> Option<&'a str> {
    keywords.iter().find_map(|k| {
        let rest = match_keyword(line, k)?.trim_start();
        let colon = rest.chars().next().filter(|c| COLONS.contains(c))?;
        Some(rest[colon.len_utf8()..].trim())
    })
}

/// Match a step keyword, returning its kind and the remaining text.
pub fn match_step(line: &str) -> Option<(StepKind, &str)> {
    STEPS
        .iter()
        .find_map(|(keyword, kind)| match_keyword(line, keyword).map(|rest| (*kind, rest)))
}
