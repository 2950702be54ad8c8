//! Edge cases
//!
//! Malformed input degrades to identity/absent instead of erroring,
//! per the engine's keep-the-editor-alive error policy.

use vellum_engine::{BboxFlags, Rect, SvgDocument};

#[test]
fn test_malformed_transform_reads_identity() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g id="a" transform="rotate(banana)"/>
             <g id="b" transform="none"/>
             <g id="c" transform=""/>
           </svg>"#,
    )
    .unwrap();
    for id in ["a", "b", "c"] {
        let n = doc.get_element_by_id(id).unwrap();
        assert!(doc.own_transform(n).is_identity(), "{id}");
        assert!(doc.composed_transform(n).is_identity(), "{id}");
    }
}

#[test]
fn test_unparsable_selector_skips_only_that_rule() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <style>
               rect:hover { fill: red; }
               .box { fill: blue; }
             </style>
             <rect id="r1" class="box"/>
           </svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    assert_eq!(doc.cascaded_style(r1).get("fill"), Some("blue"));
}

#[test]
fn test_at_rules_skipped() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <style>@media print { rect { fill: red; } } rect { fill: green; }</style>
             <rect id="r1"/>
           </svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    assert_eq!(doc.cascaded_style(r1).get("fill"), Some("green"));
}

#[test]
fn test_unknown_id_is_none() {
    let doc = SvgDocument::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
    assert!(doc.get_element_by_id("nope").is_none());
    assert!(doc.get_element_by_id("url(#nope)").is_none());
}

#[test]
fn test_duplicate_declared_ids_last_wins() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <rect id="dup" width="1" height="1"/>
             <circle id="dup" r="5"/>
           </svg>"#,
    )
    .unwrap();
    let winner = doc.get_element_by_id("dup").unwrap();
    assert_eq!(doc.tag(winner), Some("circle"));
}

#[test]
fn test_generated_ids_avoid_declared_ones() {
    // an element already holds "g0"; generation must skip it
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g id="g0"/>
             <g/>
           </svg>"#,
    )
    .unwrap();
    let named = doc.get_element_by_id("g0").unwrap();
    let root = doc.root();
    let other = doc
        .tree()
        .children(root)
        .iter()
        .copied()
        .find(|&c| c != named)
        .unwrap();
    let generated = doc.attr(other, "id").unwrap();
    assert_ne!(generated, "g0");
    assert_eq!(doc.get_element_by_id(generated), Some(other));
}

#[test]
fn test_empty_group_bbox_is_null() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><g id="g1"/></svg>"#,
    )
    .unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();
    assert!(doc.bbox(g1, BboxFlags::default()).is_null());
}

#[test]
fn test_mask_does_not_shrink_bbox() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <defs><mask id="m1"><rect width="1" height="1"/></mask></defs>
             <rect id="r1" x="0" y="0" width="20" height="20" mask="url(#m1)"/>
           </svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    let b = doc
        .bbox(r1, BboxFlags { include_stroke: false, ..Default::default() })
        .rect()
        .unwrap();
    assert_eq!(b, Rect::new(0.0, 0.0, 20.0, 20.0));
}

#[test]
fn test_rough_path_is_superset() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <path id="p1" d="M 0 0 C 10 30 20 30 30 0"/>
           </svg>"#,
    )
    .unwrap();
    let p1 = doc.get_element_by_id("p1").unwrap();
    let flags = BboxFlags { include_stroke: false, ..Default::default() };
    let exact = doc.bbox(p1, flags).rect().unwrap();
    let rough = doc
        .bbox(p1, BboxFlags { rough_path: true, ..flags })
        .rect()
        .unwrap();
    assert!(rough.h >= exact.h);
    assert!(rough.y <= exact.y && rough.y2() >= exact.y2());
}

#[test]
fn test_malformed_path_bbox_is_null() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="p1" d="M 1"/></svg>"#,
    )
    .unwrap();
    let p1 = doc.get_element_by_id("p1").unwrap();
    assert!(doc.bbox(p1, BboxFlags::default()).is_null());
}

#[test]
fn test_unpainted_stroke_adds_nothing() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <rect id="a" width="10" height="10" style="stroke-width:4"/>
             <rect id="b" width="10" height="10" style="stroke:none;stroke-width:4"/>
           </svg>"#,
    )
    .unwrap();
    for id in ["a", "b"] {
        let n = doc.get_element_by_id(id).unwrap();
        let b = doc.bbox(n, BboxFlags::default()).rect().unwrap();
        assert_eq!(b, Rect::new(0.0, 0.0, 10.0, 10.0), "{id}");
    }
}

#[test]
fn test_css_entry_survives_delete() {
    // deleting a node leaves its CSS index entry behind; a caller
    // that reassigns the id by hand inherits the old entry
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <style>#r1 { fill: purple; }</style>
             <rect id="r1"/>
           </svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    assert_eq!(doc.cascaded_style(r1).get("fill"), Some("purple"));

    doc.delete(r1);
    assert!(doc.get_element_by_id("r1").is_none());

    let replacement = doc.create_element("circle");
    doc.set_attr(replacement, "id", "r1");
    let root = doc.root();
    doc.append(root, replacement);
    assert_eq!(doc.attr(replacement, "id"), Some("r1"));
    assert_eq!(doc.cascaded_style(replacement).get("fill"), Some("purple"));
}

#[test]
fn test_percent_width_resolves_against_viewbox() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%"
               viewBox="0 0 200 100"/>"#,
    )
    .unwrap();
    let ds = doc.doc_size();
    assert_eq!(ds.width_px, 200.0);
    assert_eq!(ds.height_px, 100.0);
    assert_eq!(ds.uupx, Some(1.0));
}

#[test]
fn test_comments_are_not_children_for_caching() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g id="g1"><!-- note --><rect width="5" height="5"/></g>
           </svg>"#,
    )
    .unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();
    let b = doc
        .bbox(g1, BboxFlags { include_stroke: false, ..Default::default() })
        .rect()
        .unwrap();
    assert_eq!(b, Rect::new(0.0, 0.0, 5.0, 5.0));
    // the comment never entered the identity index
    assert_eq!(doc.tree().descendants(g1).len(), 2);
}

#[test]
fn test_set_style_property_roundtrips_attribute() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="r1"/></svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    doc.set_style_property(r1, "fill", Some("red"));
    doc.set_style_property(r1, "stroke", Some("blue"));
    assert_eq!(doc.attr(r1, "style"), Some("fill:red;stroke:blue"));

    doc.set_style_property(r1, "fill", None);
    assert_eq!(doc.attr(r1, "style"), Some("stroke:blue"));
}

#[test]
fn test_stylesheet_added_later_applies() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="r1" class="late"/></svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    assert_eq!(doc.cascaded_style(r1).get("fill"), None);

    doc.add_stylesheet(".late { fill: teal; }");
    assert_eq!(doc.cascaded_style(r1).get("fill"), Some("teal"));
}
