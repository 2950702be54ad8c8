//! Color values
//!
//! Just enough sRGB to interpolate paint properties: hex forms,
//! `rgb()`/`rgba()`, and the named colors that show up in plot
//! exports. Anything else fails to parse and the caller keeps the
//! original string.

/// 8-bit sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn parse(input: &str) -> Option<Color> {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if let Some(body) = s.strip_prefix("rgb(").and_then(|t| t.strip_suffix(')')) {
            let parts = split_args(body);
            if parts.len() != 3 {
                return None;
            }
            return Some(Color::new(
                parse_channel(&parts[0])?,
                parse_channel(&parts[1])?,
                parse_channel(&parts[2])?,
            ));
        }
        if let Some(body) = s.strip_prefix("rgba(").and_then(|t| t.strip_suffix(')')) {
            let parts = split_args(body);
            if parts.len() != 4 {
                return None;
            }
            let mut c = Color::new(
                parse_channel(&parts[0])?,
                parse_channel(&parts[1])?,
                parse_channel(&parts[2])?,
            );
            c.a = parts[3].parse::<f64>().ok()?.clamp(0.0, 1.0);
            return Some(c);
        }
        named(&s)
    }

    fn parse_hex(hex: &str) -> Option<Color> {
        match hex.len() {
            3 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
                Some(Color::new(
                    (r * 17) as u8,
                    (g * 17) as u8,
                    (b * 17) as u8,
                ))
            }
            6 => {
                let v = u32::from_str_radix(hex, 16).ok()?;
                Some(Color::new(
                    ((v >> 16) & 0xff) as u8,
                    ((v >> 8) & 0xff) as u8,
                    (v & 0xff) as u8,
                ))
            }
            _ => None,
        }
    }

    /// Linear blend toward `other`; `fraction` 0 is self, 1 is other.
    pub fn interpolate(&self, other: &Color, fraction: f64) -> Color {
        let t = fraction.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Hex serialization (`#rrggbb`); alpha is carried separately by
    /// the opacity properties.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn split_args(body: &str) -> Vec<String> {
    body.split(',').map(|p| p.trim().to_string()).collect()
}

fn parse_channel(s: &str) -> Option<u8> {
    if let Some(pct) = s.strip_suffix('%') {
        let v: f64 = pct.trim().parse().ok()?;
        return Some((v / 100.0 * 255.0).round().clamp(0.0, 255.0) as u8);
    }
    let v: f64 = s.parse().ok()?;
    Some(v.round().clamp(0.0, 255.0) as u8)
}

fn named(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "lime" => (0, 255, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        _ => return None,
    };
    Some(Color::new(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#ff0000"), Some(Color::new(255, 0, 0)));
        assert_eq!(Color::parse("#f00"), Some(Color::new(255, 0, 0)));
        assert_eq!(Color::parse("#ABC"), Some(Color::new(0xaa, 0xbb, 0xcc)));
        assert_eq!(Color::parse("#12345"), None);
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(Color::parse("rgb(1, 2, 3)"), Some(Color::new(1, 2, 3)));
        assert_eq!(Color::parse("rgb(100%, 0%, 0%)"), Some(Color::new(255, 0, 0)));
        let c = Color::parse("rgba(0, 0, 0, 0.5)").expect("rgba");
        assert!((c.a - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("red"), Some(Color::new(255, 0, 0)));
        assert_eq!(Color::parse("none"), None);
        assert_eq!(Color::parse("url(#grad)"), None);
    }

    #[test]
    fn test_interpolate() {
        let a = Color::new(0, 0, 0);
        let b = Color::new(255, 0, 0);
        assert_eq!(a.interpolate(&b, 0.0), a);
        assert_eq!(a.interpolate(&b, 1.0), b);
        assert_eq!(a.interpolate(&b, 0.5).r, 128);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::new(255, 0, 0).to_hex(), "#ff0000");
    }
}
