//! Vellum CSS
//!
//! Stylesheet parsing, selector matching, and the ordered `Style`
//! property map the cascade is built from. Selector support is the
//! subset SVG documents use: type, class, id, universal, attribute
//! tests, and the four combinators; rules with selectors outside that
//! subset are reported as skippable errors rather than mis-matched.

mod color;
mod parser;
mod selector;
mod style;

pub use color::Color;
pub use parser::parse_stylesheet;
pub use selector::{Selector, Specificity};
pub use style::Style;

/// Parsed stylesheet.
#[derive(Debug, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// CSS rule: a selector list and its declarations.
#[derive(Debug)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Style,
}

/// CSS errors.
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("unsupported selector `{0}`")]
    Selector(String),
}
