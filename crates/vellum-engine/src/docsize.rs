//! Document geometry
//!
//! Resolves the root's width/height/viewBox/preserveAspectRatio into
//! the effective viewbox, user-unit scale factors, pixel size, and
//! page rectangles. Computed wholesale, cached on the document, and
//! dropped in full when any of the source attributes changes.

use std::rc::Rc;

use vellum_dom::NodeId;
use vellum_geom::{units, Rect};

use crate::SvgDocument;

/// One page rectangle, in user units and in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub uu: Rect,
    pub px: Rect,
}

/// Resolved document geometry.
#[derive(Debug, Clone)]
pub struct DocSize {
    /// The viewBox attribute as written, if present.
    pub raw_viewbox: Option<[f64; 4]>,
    /// viewBox after preserveAspectRatio alignment and meet/slice.
    pub effective_viewbox: [f64; 4],
    /// Width of one user unit in px.
    pub uuw: f64,
    /// Height of one user unit in px.
    pub uuh: f64,
    /// Isotropic user-unit size in px; `None` when the document
    /// scales the axes differently.
    pub uupx: Option<f64>,
    pub width_unit: String,
    pub height_unit: String,
    pub width_px: f64,
    pub height_px: f64,
    /// Pre-alignment per-axis factors; these place pages.
    pub raw_xf: f64,
    pub raw_yf: f64,
    pub pages: Vec<Page>,
}

impl DocSize {
    /// User-unit box to pixels, against the effective viewbox.
    pub fn uu_to_px(&self, r: Rect) -> Rect {
        Rect::new(
            (r.x - self.effective_viewbox[0]) * self.uuw,
            (r.y - self.effective_viewbox[1]) * self.uuh,
            r.w * self.uuw,
            r.h * self.uuh,
        )
    }

    /// Pixel box to user units, against the effective viewbox.
    pub fn px_to_uu(&self, r: Rect) -> Rect {
        Rect::new(
            r.x / self.uuw + self.effective_viewbox[0],
            r.y / self.uuh + self.effective_viewbox[1],
            r.w / self.uuw,
            r.h / self.uuh,
        )
    }

    /// Any absolute-unit string to user units: to px first, then
    /// reinterpreted. `None` when the document is anisotropic or the
    /// input does not parse.
    pub fn unit_to_uu(&self, input: &str) -> Option<f64> {
        let uupx = self.uupx?;
        Some(units::to_px(input)? / uupx)
    }

    /// Page variant of `uu_to_px`: pages scale by the raw factors and
    /// ignore the viewbox origin.
    pub fn uu_to_px_page(&self, r: Rect) -> Rect {
        Rect::new(
            r.x * self.raw_xf,
            r.y * self.raw_yf,
            r.w * self.raw_xf,
            r.h * self.raw_yf,
        )
    }

    pub fn px_to_uu_page(&self, r: Rect) -> Rect {
        Rect::new(
            r.x / self.raw_xf,
            r.y / self.raw_yf,
            r.w / self.raw_xf,
            r.h / self.raw_yf,
        )
    }
}

fn parse_viewbox(value: &str) -> Option<[f64; 4]> {
    let parts: Vec<f64> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if parts.len() != 4 {
        return None;
    }
    Some([parts[0], parts[1], parts[2], parts[3]])
}

fn parse_preserve_aspect_ratio(value: Option<&str>) -> (String, bool) {
    const ALIGNS: [&str; 10] = [
        "xMinYMin", "xMidYMin", "xMaxYMin", "xMinYMid", "xMidYMid", "xMaxYMid", "xMinYMax",
        "xMidYMax", "xMaxYMax", "none",
    ];
    let mut align = "xMidYMid".to_string();
    let mut meet = true;
    if let Some(v) = value {
        let tokens: Vec<&str> = v.split_whitespace().collect();
        match tokens.as_slice() {
            [one] => {
                if ALIGNS.contains(one) {
                    align = one.to_string();
                } else if *one == "meet" || *one == "slice" {
                    meet = *one == "meet";
                }
            }
            [a, ms] if ALIGNS.contains(a) && (*ms == "meet" || *ms == "slice") => {
                align = a.to_string();
                meet = *ms == "meet";
            }
            _ => {}
        }
    }
    (align, meet)
}

fn nonzero(v: f64) -> f64 {
    if v == 0.0 { 1.0 } else { v }
}

impl SvgDocument {
    /// Resolved document geometry, computed once and cached until a
    /// root geometry attribute changes.
    pub fn doc_size(&mut self) -> Rc<DocSize> {
        if let Some(ds) = &self.docsize {
            return Rc::clone(ds);
        }
        let ds = Rc::new(self.compute_doc_size());
        self.docsize = Some(Rc::clone(&ds));
        ds
    }

    /// Drop the cached geometry. Setters that write width, height, or
    /// viewBox do this themselves.
    pub fn clear_doc_size(&mut self) {
        self.docsize = None;
    }

    fn compute_doc_size(&self) -> DocSize {
        let raw_viewbox = self.attr(self.root, "viewBox").and_then(parse_viewbox);
        let wstr = self.attr(self.root, "width");
        let hstr = self.attr(self.root, "height");

        let mut vb = raw_viewbox.unwrap_or_else(|| {
            [
                0.0,
                0.0,
                wstr.and_then(units::implicit_px).unwrap_or(300.0),
                hstr.and_then(units::implicit_px).unwrap_or(150.0),
            ]
        });
        vb[2] = nonzero(vb[2]);
        vb[3] = nonzero(vb[3]);

        let parse_len = |s: Option<&str>, fallback: f64| -> (f64, String) {
            match s.and_then(units::parse_unit) {
                Some((n, u)) => {
                    let u = if u.is_empty() { "px" } else { u };
                    (n, u.to_string())
                }
                None => (fallback, "px".to_string()),
            }
        };
        let (mut wn, mut wu) = parse_len(wstr, vb[2]);
        let (mut hn, mut hu) = parse_len(hstr, vb[3]);

        // per-axis user-unit size in px, before any stretching
        let xf = if wu != "%" {
            wn * units::unit_factor(&wu).unwrap_or(1.0) / vb[2]
        } else {
            wn / 100.0
        };
        let yf = if hu != "%" {
            hn * units::unit_factor(&hu).unwrap_or(1.0) / vb[3]
        } else {
            hn / 100.0
        };
        let xf = nonzero(xf);
        let yf = nonzero(yf);

        let (align, meet) =
            parse_preserve_aspect_ratio(self.attr(self.root, "preserveAspectRatio"));

        if align != "none" {
            let f = nonzero(if meet { xf.min(yf) } else { xf.max(yf) });
            let xmf = match &align[0..4] {
                "xMin" => 0.0,
                "xMax" => 1.0,
                _ => 0.5,
            };
            let ymf = match &align[4..] {
                "YMin" => 0.0,
                "YMax" => 1.0,
                _ => 0.5,
            };
            let (old_w, old_h) = (vb[2], vb[3]);
            vb[0] += old_w * (1.0 - xf / f) * xmf;
            vb[2] = old_w / f * if wu != "%" { xf } else { 1.0 };
            vb[1] += old_h * (1.0 - yf / f) * ymf;
            vb[3] = old_h / f * if hu != "%" { yf } else { 1.0 };
            if wu == "%" {
                wn = vb[2] * f;
                wu = "px".to_string();
            }
            if hu == "%" {
                hn = vb[3] * f;
                hu = "px".to_string();
            }
        } else {
            if wu == "%" {
                let old = vb[2];
                wn = old;
                wu = "px".to_string();
                vb[2] = old / xf;
            }
            if hu == "%" {
                let old = vb[3];
                hn = old;
                hu = "px".to_string();
                vb[3] = old / yf;
            }
        }

        let width_px = wn * units::unit_factor(&wu).unwrap_or(1.0);
        let height_px = hn * units::unit_factor(&hu).unwrap_or(1.0);
        let uuw = width_px / nonzero(vb[2]);
        let uuh = height_px / nonzero(vb[3]);
        let uupx = if (uuw - uuh).abs() < 0.001 {
            Some(uuw)
        } else {
            None
        };

        let pages = self
            .page_elements()
            .iter()
            .map(|&pg| {
                let uu = Rect::new(
                    self.attr(pg, "x").and_then(units::implicit_px).unwrap_or(0.0),
                    self.attr(pg, "y").and_then(units::implicit_px).unwrap_or(0.0),
                    self.attr(pg, "width").and_then(units::implicit_px).unwrap_or(0.0),
                    self.attr(pg, "height").and_then(units::implicit_px).unwrap_or(0.0),
                );
                Page {
                    uu,
                    px: Rect::new(uu.x * xf, uu.y * yf, uu.w * xf, uu.h * yf),
                }
            })
            .collect();

        DocSize {
            raw_viewbox,
            effective_viewbox: vb,
            uuw,
            uuh,
            uupx,
            width_unit: wu,
            height_unit: hu,
            width_px,
            height_px,
            raw_xf: xf,
            raw_yf: yf,
            pages,
        }
    }

    /// Page elements under the root's `namedview`, in document order.
    pub(crate) fn page_elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for &child in self.tree.children(self.root) {
            if self.tag(child) != Some("namedview") {
                continue;
            }
            for &pg in self.tree.children(child) {
                if self.tag(pg) == Some("page") {
                    out.push(pg);
                }
            }
        }
        out
    }

    /// Rewrite width/height/viewBox to show `new_vb` user units at
    /// the current scale, keeping the declared units.
    pub fn set_viewbox(&mut self, new_vb: [f64; 4]) {
        let ds = self.doc_size();
        let (uuw, uuh) = (ds.uuw, ds.uuh);
        let (wu, hu) = (ds.width_unit.clone(), ds.height_unit.clone());
        let root = self.root;
        self.set_attr(root, "width", &units::render_px(new_vb[2] * uuw, &wu));
        self.set_attr(root, "height", &units::render_px(new_vb[3] * uuh, &hu));
        self.set_attr(
            root,
            "viewBox",
            &format!("{} {} {} {}", new_vb[0], new_vb[1], new_vb[2], new_vb[3]),
        );
    }

    /// Rewrite the document so the viewbox is expressed in pixels,
    /// updating pages so their pixel rectangles are unchanged.
    pub fn standardize_viewbox(&mut self) {
        let ds = self.doc_size();
        let pages_px: Vec<Rect> = ds.pages.iter().map(|p| p.px).collect();
        let vb = ds.effective_viewbox;
        let (wpx, hpx) = (ds.width_px, ds.height_px);
        let root = self.root;
        self.set_attr(
            root,
            "viewBox",
            &format!("{} {} {} {}", vb[0], vb[1], vb[2], vb[3]),
        );
        self.set_attr(root, "width", &format!("{wpx}"));
        self.set_attr(root, "height", &format!("{hpx}"));

        let ds = self.doc_size();
        let pages = self.page_elements();
        let updates: Vec<(NodeId, Rect)> = pages
            .into_iter()
            .zip(pages_px)
            .map(|(pg, px)| (pg, ds.px_to_uu_page(px)))
            .collect();
        for (pg, uu) in updates {
            self.set_attr(pg, "x", &format!("{}", uu.x));
            self.set_attr(pg, "y", &format!("{}", uu.y));
            self.set_attr(pg, "width", &format!("{}", uu.w));
            self.set_attr(pg, "height", &format!("{}", uu.h));
        }
        // the size computed mid-rewrite still holds the old pages
        self.docsize = None;
    }
}
