//! Markup escaping and small value formatters.

use std::sync::LazyLock;

use regex::Regex;
use rv_odf::Length;

/// Outline styles: `Heading_20_1`, `Heading_20_2`, ...
static HEADING_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Heading_[^_]+_(\d+)$").unwrap());

/// Escape a value placed inside a `[...]` directive parameter.
///
/// Every `]` not already preceded by a backslash becomes `\]`, so applying
/// the function twice yields the same result as applying it once.
///
/// # Examples
///
/// ```
/// use rv_review::escape_param;
///
/// assert_eq!(escape_param("a]b"), r"a\]b");
/// assert_eq!(escape_param(r"a\]b"), r"a\]b");
/// ```
#[must_use]
pub fn escape_param(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = None;
    for c in text.chars() {
        if c == ']' && prev != Some('\\') {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Image width as a percentage of the page width.
///
/// Returns `None` when either value is unparseable, the units differ, or
/// the page width is not positive.
///
/// # Examples
///
/// ```
/// use rv_odf::Length;
/// use rv_review::width_percentage;
///
/// let page = Length::parse("15.1cm").unwrap();
/// assert_eq!(width_percentage("7.55cm", &page).as_deref(), Some("50.00%"));
/// assert_eq!(width_percentage("300px", &page), None);
/// ```
#[must_use]
pub fn width_percentage(width: &str, page: &Length) -> Option<String> {
    let width = Length::parse(width)?;
    if width.unit != page.unit || page.value <= 0.0 {
        return None;
    }
    Some(format!("{:.2}%", width.value / page.value * 100.0))
}

/// Output heading level for an outline style name.
///
/// `Heading_20_N` maps to `N + 1` (level 1 is reserved for the title) and
/// the generic `Heading` style to 2.
#[must_use]
pub fn heading_level(style: &str) -> Option<usize> {
    if style == "Heading" {
        return Some(2);
    }
    HEADING_STYLE_RE
        .captures(style)
        .and_then(|caps| caps[1].parse::<usize>().ok())
        .map(|n| n + 1)
}
