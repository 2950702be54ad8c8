//! SVG loading and serialization
//!
//! Parses SVG text into a document (namespace prefixes are dropped;
//! `xlink:href` and `sodipodi:namedview` read by local name),
//! registers ids in two phases so generated ids never collide with
//! declared ones, and collects `<style>` sheets in document order.
//! Serialization walks the tree back out with standard escaping.

use std::collections::HashSet;

use vellum_dom::{DomTree, NodeData, NodeId};

use crate::identity::IdentityIndex;
use crate::SvgDocument;

/// Document loading errors.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("root element is not <svg>")]
    NotSvg,
}

impl SvgDocument {
    /// Parse an SVG string into a document, building the identity
    /// index with a full tree scan. Declared ids register first (last
    /// one wins on duplicates, no error); everything else gets a
    /// generated id afterwards.
    pub fn parse(text: &str) -> Result<SvgDocument, LoadError> {
        let xml = roxmltree::Document::parse(text)?;
        let xroot = xml.root_element();
        if xroot.tag_name().name() != "svg" {
            return Err(LoadError::NotSvg);
        }

        let mut tree = DomTree::new();
        let root = build_node(&mut tree, xroot);
        let mut doc = SvgDocument {
            tree,
            root,
            caches: Vec::new(),
            ids: IdentityIndex::new(),
            stylesheets: Vec::new(),
            css: None,
            docsize: None,
            text_provider: None,
            bbox_guard: HashSet::new(),
        };
        doc.sync_caches();

        let all = doc.tree.descendants(root);
        for &d in &all {
            doc.caches[d.index()].attached = true;
        }
        for &d in &all {
            if let Some(id) = doc.attr(d, "id").map(String::from) {
                doc.ids.register(id, d);
            }
        }
        for &d in &all {
            if doc.attr(d, "id").is_none() {
                let prefix = doc.tag(d).unwrap_or("node").to_string();
                let fresh = doc.ids.generate(&prefix);
                doc.write_attr(d, "id", &fresh);
                doc.ids.register(fresh, d);
            }
        }

        for &d in &all {
            if doc.tag(d) == Some("style") {
                let mut css = String::new();
                for &child in doc.tree.children(d) {
                    if let Some(t) = doc.tree.node(child).as_text() {
                        css.push_str(t);
                    }
                }
                doc.stylesheets.push(vellum_css::parse_stylesheet(&css));
            }
        }
        Ok(doc)
    }

    /// Serialize the document back to SVG text.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        write_node(&self.tree, self.root, true, &mut out);
        out
    }
}

fn build_node(tree: &mut DomTree, xnode: roxmltree::Node<'_, '_>) -> NodeId {
    let id = tree.create_element(xnode.tag_name().name());
    for attr in xnode.attributes() {
        if let Some(el) = tree.node_mut(id).as_element_mut() {
            el.set_attr(attr.name(), attr.value());
        }
    }
    for child in xnode.children() {
        if child.is_element() {
            let c = build_node(tree, child);
            tree.append(id, c);
        } else if child.is_text() {
            let text = child.text().unwrap_or("");
            if !text.trim().is_empty() {
                let c = tree.create_text(text);
                tree.append(id, c);
            }
        } else if child.is_comment() {
            let c = tree.create_comment(child.text().unwrap_or(""));
            tree.append(id, c);
        }
    }
    id
}

fn write_node(tree: &DomTree, node: NodeId, is_root: bool, out: &mut String) {
    match tree.node(node).data() {
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(el.tag());
            if is_root && el.attr("xmlns").is_none() {
                out.push_str(" xmlns=\"http://www.w3.org/2000/svg\"");
            }
            for (name, value) in el.attrs() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            let children = tree.children(node);
            if children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for &child in children {
                    write_node(tree, child, false, out);
                }
                out.push_str("</");
                out.push_str(el.tag());
                out.push('>');
            }
        }
        NodeData::Text(t) => escape_into(t, false, out),
        NodeData::Comment(c) => {
            out.push_str("<!--");
            out.push_str(c);
            out.push_str("-->");
        }
    }
}

fn escape_into(value: &str, in_attr: bool, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
