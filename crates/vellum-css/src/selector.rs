//! Selectors
//!
//! Hand-parsed selector subset: type, universal, class, id, attribute
//! tests, and the descendant/child/sibling combinators. Pseudo-classes
//! and anything namespaced are deliberately unsupported; such
//! selectors stay uncompiled and surface as a skippable `CssError`
//! when a candidate set is requested, never as a wrong match.

use crate::CssError;
use vellum_dom::{DomTree, NodeId};

/// Selector specificity (ids, classes+attributes, types). Computed
/// for every parsed selector; whether it participates in cascade
/// ordering is up to the consumer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Includes,
    DashMatch,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone)]
struct AttrTest {
    name: String,
    op: AttrOp,
    value: String,
}

/// One compound selector: every test must hold on the same element.
#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    universal: bool,
    ids: Vec<String>,
    classes: Vec<String>,
    attrs: Vec<AttrTest>,
}

#[derive(Debug, Clone)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i+1]`.
    combinators: Vec<Combinator>,
}

/// A single selector from a rule's selector list.
#[derive(Debug, Clone)]
pub struct Selector {
    text: String,
    compiled: Option<Complex>,
    specificity: Specificity,
}

impl Selector {
    /// Parse selector text. Never fails outright: unsupported syntax
    /// leaves the selector uncompiled.
    pub fn parse(text: &str) -> Selector {
        let text = text.trim().to_string();
        match compile(&text) {
            Some(complex) => {
                let specificity = complex.specificity();
                Selector {
                    text,
                    compiled: Some(complex),
                    specificity,
                }
            }
            None => {
                tracing::debug!(selector = %text, "unsupported selector left uncompiled");
                Selector {
                    text,
                    compiled: None,
                    specificity: Specificity::default(),
                }
            }
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    pub fn is_parsed(&self) -> bool {
        self.compiled.is_some()
    }

    /// `*` and nothing else.
    pub fn is_universal(&self) -> bool {
        match &self.compiled {
            Some(c) => {
                c.compounds.len() == 1 && {
                    let s = &c.compounds[0];
                    s.universal
                        && s.tag.is_none()
                        && s.ids.is_empty()
                        && s.classes.is_empty()
                        && s.attrs.is_empty()
                }
            }
            None => false,
        }
    }

    /// `.name` and nothing else.
    pub fn single_class(&self) -> Option<&str> {
        let c = self.compiled.as_ref()?;
        if c.compounds.len() != 1 {
            return None;
        }
        let s = &c.compounds[0];
        if s.tag.is_none()
            && !s.universal
            && s.ids.is_empty()
            && s.attrs.is_empty()
            && s.classes.len() == 1
        {
            Some(&s.classes[0])
        } else {
            None
        }
    }

    /// `#name` and nothing else.
    pub fn single_id(&self) -> Option<&str> {
        let c = self.compiled.as_ref()?;
        if c.compounds.len() != 1 {
            return None;
        }
        let s = &c.compounds[0];
        if s.tag.is_none()
            && !s.universal
            && s.classes.is_empty()
            && s.attrs.is_empty()
            && s.ids.len() == 1
        {
            Some(&s.ids[0])
        } else {
            None
        }
    }

    /// Whether this selector matches `node`. Uncompiled selectors
    /// match nothing.
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match &self.compiled {
            Some(c) => c.matches(tree, node),
            None => false,
        }
    }

    /// Every element under `root` (inclusive) this selector matches.
    /// Unsupported selectors report a skippable error.
    pub fn to_candidate_set(&self, tree: &DomTree, root: NodeId) -> Result<Vec<NodeId>, CssError> {
        let c = self
            .compiled
            .as_ref()
            .ok_or_else(|| CssError::Selector(self.text.clone()))?;
        Ok(tree
            .descendants(root)
            .into_iter()
            .filter(|&n| c.matches(tree, n))
            .collect())
    }
}

impl Complex {
    fn specificity(&self) -> Specificity {
        let mut s = Specificity(0, 0, 0);
        for c in &self.compounds {
            s.0 += c.ids.len() as u32;
            s.1 += (c.classes.len() + c.attrs.len()) as u32;
            if c.tag.is_some() {
                s.2 += 1;
            }
        }
        s
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.matches_at(tree, node, self.compounds.len() - 1)
    }

    fn matches_at(&self, tree: &DomTree, node: NodeId, idx: usize) -> bool {
        if !compound_matches(tree, node, &self.compounds[idx]) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => match tree.parent(node) {
                Some(p) => self.matches_at(tree, p, idx - 1),
                None => false,
            },
            Combinator::Descendant => {
                let mut cur = tree.parent(node);
                while let Some(p) = cur {
                    if self.matches_at(tree, p, idx - 1) {
                        return true;
                    }
                    cur = tree.parent(p);
                }
                false
            }
            Combinator::NextSibling => match prev_element_sibling(tree, node) {
                Some(s) => self.matches_at(tree, s, idx - 1),
                None => false,
            },
            Combinator::SubsequentSibling => {
                let mut cur = prev_element_sibling(tree, node);
                while let Some(s) = cur {
                    if self.matches_at(tree, s, idx - 1) {
                        return true;
                    }
                    cur = prev_element_sibling(tree, s);
                }
                false
            }
        }
    }
}

fn prev_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let parent = tree.parent(node)?;
    let siblings = tree.children(parent);
    let pos = siblings.iter().position(|&c| c == node)?;
    siblings[..pos]
        .iter()
        .rev()
        .copied()
        .find(|&c| tree.node(c).is_element())
}

fn compound_matches(tree: &DomTree, node: NodeId, compound: &Compound) -> bool {
    let Some(el) = tree.node(node).as_element() else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if el.tag() != tag {
            return false;
        }
    }
    for id in &compound.ids {
        if el.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    for class in &compound.classes {
        let has = el
            .attr("class")
            .is_some_and(|v| v.split_whitespace().any(|t| t == class));
        if !has {
            return false;
        }
    }
    for test in &compound.attrs {
        let value = el.attr(&test.name);
        let ok = match (test.op, value) {
            (AttrOp::Exists, v) => v.is_some(),
            (_, None) => false,
            (AttrOp::Equals, Some(v)) => v == test.value,
            (AttrOp::Includes, Some(v)) => v.split_whitespace().any(|t| t == test.value),
            (AttrOp::DashMatch, Some(v)) => {
                v == test.value || v.strip_prefix(&test.value).is_some_and(|r| r.starts_with('-'))
            }
            (AttrOp::Prefix, Some(v)) => v.starts_with(&test.value),
            (AttrOp::Suffix, Some(v)) => v.ends_with(&test.value),
            (AttrOp::Substring, Some(v)) => v.contains(&test.value),
        };
        if !ok {
            return false;
        }
    }
    true
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn compile(text: &str) -> Option<Complex> {
    if text.is_empty() {
        return None;
    }
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    loop {
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        if i >= chars.len() {
            break;
        }
        if !compounds.is_empty() {
            let comb = match chars[i] {
                '>' => {
                    i += 1;
                    Combinator::Child
                }
                '+' => {
                    i += 1;
                    Combinator::NextSibling
                }
                '~' => {
                    i += 1;
                    Combinator::SubsequentSibling
                }
                _ => Combinator::Descendant,
            };
            combinators.push(comb);
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
        }
        let (compound, next) = parse_compound(&chars, i)?;
        compounds.push(compound);
        i = next;
    }

    if compounds.is_empty() || combinators.len() + 1 != compounds.len() {
        return None;
    }
    Some(Complex {
        compounds,
        combinators,
    })
}

fn parse_compound(chars: &[char], mut i: usize) -> Option<(Compound, usize)> {
    let mut compound = Compound::default();
    let mut any = false;
    while i < chars.len() {
        match chars[i] {
            c if c.is_whitespace() => break,
            '>' | '+' | '~' => break,
            '*' => {
                compound.universal = true;
                i += 1;
                any = true;
            }
            '.' => {
                let (ident, next) = parse_ident(chars, i + 1)?;
                compound.classes.push(ident);
                i = next;
                any = true;
            }
            '#' => {
                let (ident, next) = parse_ident(chars, i + 1)?;
                compound.ids.push(ident);
                i = next;
                any = true;
            }
            '[' => {
                let close = (i + 1..chars.len()).find(|&j| chars[j] == ']')?;
                let body: String = chars[i + 1..close].iter().collect();
                compound.attrs.push(parse_attr_test(&body)?);
                i = close + 1;
                any = true;
            }
            c if is_ident_char(c) => {
                if compound.tag.is_some() || any {
                    // a type selector must come first in a compound
                    return None;
                }
                let (ident, next) = parse_ident(chars, i)?;
                compound.tag = Some(ident);
                i = next;
                any = true;
            }
            // pseudo-classes, namespaces, and the rest are unsupported
            _ => return None,
        }
    }
    if !any {
        return None;
    }
    Some((compound, i))
}

fn parse_ident(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start;
    while i < chars.len() && is_ident_char(chars[i]) {
        i += 1;
    }
    if i == start {
        return None;
    }
    Some((chars[start..i].iter().collect(), i))
}

fn parse_attr_test(body: &str) -> Option<AttrTest> {
    let body = body.trim();
    for (token, op) in [
        ("~=", AttrOp::Includes),
        ("|=", AttrOp::DashMatch),
        ("^=", AttrOp::Prefix),
        ("$=", AttrOp::Suffix),
        ("*=", AttrOp::Substring),
        ("=", AttrOp::Equals),
    ] {
        if let Some((name, value)) = body.split_once(token) {
            let name = name.trim();
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if name.is_empty() {
                return None;
            }
            return Some(AttrTest {
                name: name.to_string(),
                op,
                value: value.to_string(),
            });
        }
    }
    if body.is_empty() {
        return None;
    }
    Some(AttrTest {
        name: body.to_string(),
        op: AttrOp::Exists,
        value: String::new(),
    })
}
