//! Stylesheet parser
//!
//! Flat `selector-list { declarations }` rules. At-rules are skipped
//! whole (including their nested blocks); a bad rule never takes the
//! rest of the sheet down with it.

use crate::{Rule, Selector, Style, Stylesheet};

/// Parse stylesheet text. Infallible at the sheet level: rules that
/// cannot be handled are dropped with a debug log.
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let css = strip_comments(css);
    let mut rules = Vec::new();
    let mut rest = css.as_str();

    while let Some(open) = rest.find('{') {
        let prelude = rest[..open].trim();
        let Some(close) = find_block_end(&rest[open..]) else {
            tracing::debug!("unbalanced block in stylesheet, rest of sheet dropped");
            break;
        };
        let body = &rest[open + 1..open + close];
        if prelude.starts_with('@') {
            tracing::debug!(rule = prelude, "at-rule skipped");
        } else if body.contains('{') {
            tracing::debug!(rule = prelude, "nested block skipped");
        } else if !prelude.is_empty() {
            let selectors: Vec<Selector> = prelude
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Selector::parse)
                .collect();
            if !selectors.is_empty() {
                rules.push(Rule {
                    selectors,
                    declarations: parse_declarations(body),
                });
            }
        }
        rest = &rest[open + close + 1..];
    }

    Stylesheet { rules }
}

/// Index (relative to the start of `s`, which begins with `{`) of the
/// matching closing brace.
fn find_block_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_declarations(body: &str) -> Style {
    let mut style = Style::new();
    for directive in body.split(';') {
        if let Some((name, value)) = directive.split_once(':') {
            let mut value = value.trim();
            if value.to_ascii_lowercase().ends_with("!important") {
                value = value[..value.len() - "!important".len()].trim_end();
            }
            style.set(name.trim().to_ascii_lowercase(), value);
        }
    }
    style
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}
