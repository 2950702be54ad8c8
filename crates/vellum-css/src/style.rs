//! Style property map
//!
//! An insertion-ordered name→value map. Layered composition works by
//! addition: `a.add(b)` keeps `a`'s order, updates keys `b` overrides
//! in place, and appends keys only `b` has, so "later overrides
//! earlier" holds per property without shuffling the serialization.

use crate::Color;
use vellum_geom::units;

const COLOR_PROPS: &[&str] = &["stroke", "fill", "stop-color", "flood-color", "lighting-color"];
const OPACITY_PROPS: &[&str] = &["stroke-opacity", "fill-opacity", "opacity", "stop-opacity"];
const UNIT_PROPS: &[&str] = &["stroke-width"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    entries: Vec<(Box<str>, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an inline style attribute value. Directives without a
    /// colon are dropped; names are lowercased.
    pub fn parse(text: &str) -> Style {
        let mut style = Style::new();
        for directive in text.split(';') {
            if let Some((name, value)) = directive.split_once(':') {
                style.set(name.trim().to_ascii_lowercase(), value.trim());
            }
        }
        style
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property; an existing key keeps its position.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref();
        let value = value.into();
        for (k, v) in &mut self.entries {
            if &**k == name {
                *v = value;
                return;
            }
        }
        self.entries.push((name.into(), value));
    }

    /// Remove a property, returning its old value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| &**k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (&**k, v.as_str()))
    }

    /// Merge `other` into self (later overrides earlier).
    pub fn merge(&mut self, other: &Style) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    /// Compose two styles into a third; `other` wins per property.
    pub fn add(&self, other: &Style) -> Style {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Serialize as an inline style attribute value.
    pub fn to_attr(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(';');
            }
            out.push_str(k);
            out.push(':');
            out.push_str(v);
        }
        out
    }

    /// Rewrite `url(#old_id)` property values to reference `new_id`.
    pub fn update_urls(&mut self, old_id: &str, new_id: &str) {
        let old = format!("url(#{old_id})");
        for (_, v) in &mut self.entries {
            if *v == old {
                *v = format!("url(#{new_id})");
            }
        }
    }

    /// Interpolate toward `other`. Colors blend, opacities and stroke
    /// widths lerp, everything else keeps this style's value; so do
    /// properties `other` lacks and values that fail to parse
    /// (gradients via `url(...)` in particular).
    pub fn interpolate(&self, other: &Style, fraction: f64) -> Style {
        let mut out = Style::new();
        for (name, a) in self.iter() {
            let value = match other.get(name) {
                None => a.to_string(),
                Some(b) => interpolate_prop(name, a, b, fraction),
            };
            out.set(name, value);
        }
        out
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_attr())
    }
}

fn interpolate_prop(name: &str, a: &str, b: &str, t: f64) -> String {
    if COLOR_PROPS.contains(&name) {
        if a.starts_with("url(") || b.starts_with("url(") {
            return a.to_string();
        }
        match (Color::parse(a), Color::parse(b)) {
            (Some(ca), Some(cb)) => return ca.interpolate(&cb, t).to_hex(),
            _ => return a.to_string(),
        }
    }
    if OPACITY_PROPS.contains(&name) {
        if let (Ok(fa), Ok(fb)) = (a.parse::<f64>(), b.parse::<f64>()) {
            return format!("{}", fa + (fb - fa) * t);
        }
        return a.to_string();
    }
    if UNIT_PROPS.contains(&name) {
        // lerp the numbers, keep the first value's unit
        if let (Some((va, unit)), Some((vb, _))) = (units::parse_unit(a), units::parse_unit(b)) {
            return format!("{}{}", va + (vb - va) * t, unit);
        }
        return a.to_string();
    }
    a.to_string()
}
