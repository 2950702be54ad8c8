//! Comprehensive engine tests
//!
//! Style cascade and inheritance, transform composition and
//! invalidation, bounding boxes, duplication, and document geometry
//! against real documents.

use std::rc::Rc;

use vellum_engine::{BBox, BboxFlags, FixedExtents, Matrix, Rect, SvgDocument};

const CASCADE_DOC: &str = r#"
<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <style>.box { stroke: blue; }</style>
  <g id="g1" style="fill:red">
    <rect id="r1" class="box" x="10" y="10" width="20" height="30"/>
  </g>
</svg>"#;

#[test]
fn test_cascaded_style_from_css() {
    let mut doc = SvgDocument::parse(CASCADE_DOC).unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    let cascaded = doc.cascaded_style(r1);
    assert_eq!(cascaded.get("stroke"), Some("blue"));
    assert_eq!(cascaded.get("fill"), None);
}

#[test]
fn test_specified_style_inherits() {
    let mut doc = SvgDocument::parse(CASCADE_DOC).unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    let specified = doc.specified_style(r1);
    assert_eq!(specified.get("stroke"), Some("blue"));
    assert_eq!(specified.get("fill"), Some("red"));
}

#[test]
fn test_specified_style_is_parent_plus_cascaded() {
    let mut doc = SvgDocument::parse(CASCADE_DOC).unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    let expected = doc.specified_style(g1).add(&doc.cascaded_style(r1));
    assert_eq!(*doc.specified_style(r1), expected);
}

#[test]
fn test_parent_style_change_reaches_child() {
    let mut doc = SvgDocument::parse(CASCADE_DOC).unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();

    assert_eq!(doc.specified_style(r1).get("fill"), Some("red"));
    doc.set_style_property(g1, "fill", Some("green"));
    assert_eq!(doc.specified_style(r1).get("fill"), Some("green"));
    // the attribute was re-serialized too
    assert_eq!(doc.attr(g1, "style"), Some("fill:green"));
}

#[test]
fn test_own_style_none_removes_property() {
    let mut doc = SvgDocument::parse(CASCADE_DOC).unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();
    doc.set_style_property(g1, "fill", None);
    assert_eq!(doc.own_style(g1).get("fill"), None);
    assert_eq!(doc.attr(g1, "style"), None);
}

#[test]
fn test_presentation_attributes_cascade() {
    let mut doc = SvgDocument::new();
    let root = doc.root();
    let r = doc.create_element("rect");
    doc.set_attr(r, "fill", "orange");
    doc.set_attr(r, "transform", "translate(1,2)");
    doc.append(root, r);

    let cascaded = doc.cascaded_style(r);
    assert_eq!(cascaded.get("fill"), Some("orange"));
    // excluded presentation attributes stay out of the cascade
    assert_eq!(cascaded.get("transform"), None);
}

#[test]
fn test_inline_style_beats_css_and_attributes() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <style>#r1 { fill: blue; }</style>
             <rect id="r1" fill="green" style="fill:red"/>
           </svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    assert_eq!(doc.cascaded_style(r1).get("fill"), Some("red"));
}

#[test]
fn test_css_rules_merge_in_declaration_order() {
    // both rules match; the later declaration wins regardless of
    // specificity
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <style>#r1 { fill: blue; } .box { fill: yellow; }</style>
             <rect id="r1" class="box"/>
           </svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    assert_eq!(doc.cascaded_style(r1).get("fill"), Some("yellow"));
}

#[test]
fn test_composed_transform_is_parent_chain() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g id="outer" transform="translate(10,0)">
               <g id="inner" transform="scale(2)">
                 <rect id="r1" transform="translate(1,1)"/>
               </g>
             </g>
           </svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();
    let inner = doc.get_element_by_id("inner").unwrap();

    let expected = doc.composed_transform(inner) * doc.own_transform(r1);
    assert_eq!(doc.composed_transform(r1), expected);
    assert_eq!(doc.composed_transform(r1).apply(0.0, 0.0), (12.0, 2.0));
}

#[test]
fn test_transform_write_invalidates_subtree() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g id="outer"><g id="inner"><rect id="r1"/></g></g>
           </svg>"#,
    )
    .unwrap();
    let outer = doc.get_element_by_id("outer").unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();

    // populate the caches
    assert!(doc.composed_transform(r1).is_identity());
    doc.set_transform(outer, Matrix::translate(5.0, 7.0));
    // every descendant recomputes instead of serving the stale slot
    assert_eq!(doc.composed_transform(r1).apply(0.0, 0.0), (5.0, 7.0));
}

#[test]
fn test_transform_attr_roundtrip() {
    let mut doc = SvgDocument::new();
    let root = doc.root();
    let g = doc.create_element("g");
    doc.append(root, g);
    doc.set_transform(g, Matrix::rotate(30.0));

    let reparsed = Matrix::parse(doc.attr(g, "transform").unwrap());
    let m = doc.own_transform(g);
    assert!((reparsed.a - m.a).abs() < 1e-12 && (reparsed.b - m.b).abs() < 1e-12);
}

#[test]
fn test_rect_bbox_with_stroke() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <rect id="r1" x="10" y="20" width="30" height="40"
                   style="stroke:black;stroke-width:4"/>
           </svg>"#,
    )
    .unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();

    let plain = doc.bbox(r1, BboxFlags { include_stroke: false, ..Default::default() });
    assert_eq!(plain.rect().unwrap(), Rect::new(10.0, 20.0, 30.0, 40.0));

    let stroked = doc.bbox(r1, BboxFlags::default());
    assert_eq!(stroked.rect().unwrap(), Rect::new(8.0, 18.0, 34.0, 44.0));
}

#[test]
fn test_group_bbox_unions_children_with_own_transforms() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g id="g1" transform="translate(100,0)">
               <rect x="0" y="0" width="10" height="10"/>
               <rect x="20" y="0" width="10" height="10" transform="translate(0,30)"/>
             </g>
           </svg>"#,
    )
    .unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();

    // local box: child transforms apply, the group's own does not
    let local = doc.bbox(g1, BboxFlags { apply_transform: false, ..Default::default() });
    assert_eq!(local.rect().unwrap(), Rect::new(0.0, 0.0, 30.0, 40.0));

    // transformed box shifts by the group's translate
    let placed = doc.bbox(g1, BboxFlags::default());
    assert_eq!(placed.rect().unwrap(), Rect::new(100.0, 0.0, 30.0, 40.0));
}

#[test]
fn test_clip_path_intersects_bbox() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <defs>
               <clipPath id="c1"><rect x="0" y="0" width="15" height="15"/></clipPath>
               <clipPath id="far"><rect x="500" y="500" width="5" height="5"/></clipPath>
             </defs>
             <rect id="clipped" x="10" y="10" width="20" height="20" clip-path="url(#c1)"/>
             <rect id="gone" x="10" y="10" width="20" height="20" clip-path="url(#far)"/>
           </svg>"#,
    )
    .unwrap();
    let clipped = doc.get_element_by_id("clipped").unwrap();
    let gone = doc.get_element_by_id("gone").unwrap();

    let flags = BboxFlags { include_stroke: false, ..Default::default() };
    assert_eq!(
        doc.bbox(clipped, flags).rect().unwrap(),
        Rect::new(10.0, 10.0, 5.0, 5.0)
    );
    assert!(doc.bbox(gone, flags).is_null());
}

#[test]
fn test_use_bbox_places_reference() {
    let mut doc = SvgDocument::parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg">
             <rect id="proto" x="0" y="0" width="10" height="10" transform="scale(2)"/>
             <use id="u1" href="#proto" x="100" y="50"/>
           </svg>"##,
    )
    .unwrap();
    let u1 = doc.get_element_by_id("u1").unwrap();
    let b = doc
        .bbox(u1, BboxFlags { include_stroke: false, ..Default::default() })
        .rect()
        .unwrap();
    // referenced box (untransformed) through translate(100,50) * scale(2)
    assert_eq!(b, Rect::new(100.0, 50.0, 20.0, 20.0));
}

#[test]
fn test_text_bbox_uses_provider() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="t1">hi</text></svg>"#,
    )
    .unwrap();
    let t1 = doc.get_element_by_id("t1").unwrap();
    assert!(doc.bbox(t1, BboxFlags::default()).is_null());

    doc.set_text_provider(Rc::new(FixedExtents::new(
        BBox::from_xywh(0.0, -8.0, 20.0, 10.0),
        BBox::from_xywh(1.0, -7.0, 18.0, 8.0),
    )));
    doc.set_bbox_dirty(t1);
    let logical = doc.bbox(t1, BboxFlags::default()).rect().unwrap();
    assert_eq!(logical.w, 20.0);
    let ink = doc
        .bbox(t1, BboxFlags { text_parsed: true, ..Default::default() })
        .rect()
        .unwrap();
    assert_eq!(ink.w, 18.0);
}

#[test]
fn test_bbox_recomputes_after_transform_write() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g id="g1"><rect id="r1" x="0" y="0" width="10" height="10"/></g>
           </svg>"#,
    )
    .unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();

    let flags = BboxFlags { include_stroke: false, ..Default::default() };
    assert_eq!(doc.bbox(r1, flags).rect().unwrap().x, 0.0);
    doc.set_transform(g1, Matrix::translate(40.0, 0.0));
    assert_eq!(doc.bbox(r1, flags).rect().unwrap().x, 40.0);
    // the group's cached box moved as well
    assert_eq!(doc.bbox(g1, flags).rect().unwrap().x, 40.0);
}

#[test]
fn test_duplicate_gets_fresh_ids_and_css() {
    let mut doc = SvgDocument::parse(CASCADE_DOC).unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();
    let r1 = doc.get_element_by_id("r1").unwrap();

    let copy = doc.duplicate(g1).unwrap();
    let copy_id = doc.attr(copy, "id").unwrap().to_string();
    assert_ne!(copy_id, "g1");
    assert_eq!(doc.get_element_by_id(&copy_id), Some(copy));

    // clone is the next sibling of the original
    let parent = doc.tree().parent(g1).unwrap();
    let children = doc.tree().children(parent);
    let gi = children.iter().position(|&c| c == g1).unwrap();
    assert_eq!(children[gi + 1], copy);

    // descendant ids are disjoint from every pre-existing id
    let copy_rect = doc.tree().children(copy)[0];
    let copy_rect_id = doc.attr(copy_rect, "id").unwrap().to_string();
    assert_ne!(copy_rect_id, "r1");

    // CSS entries were copied verbatim, so the clone styles the same
    assert_eq!(
        doc.cascaded_style(copy_rect).get("stroke"),
        doc.cascaded_style(r1).get("stroke")
    );
}

#[test]
fn test_duplicate_clip_moves_to_defs() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g><clipPath id="c1"><rect width="5" height="5"/></clipPath></g>
           </svg>"#,
    )
    .unwrap();
    let c1 = doc.get_element_by_id("c1").unwrap();
    let copy = doc.duplicate(c1).unwrap();

    let defs = doc.defs();
    assert_eq!(doc.tree().parent(copy), Some(defs));
}

#[test]
fn test_insert_with_colliding_id_regenerates() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="x1"/></svg>"#,
    )
    .unwrap();
    let existing = doc.get_element_by_id("x1").unwrap();

    let fresh = doc.create_element("circle");
    doc.set_attr(fresh, "id", "x1");
    let root = doc.root();
    doc.append(root, fresh);

    let new_id = doc.attr(fresh, "id").unwrap().to_string();
    assert_ne!(new_id, "x1");
    assert_eq!(doc.get_element_by_id(&new_id), Some(fresh));
    // the original keeps its id
    assert_eq!(doc.get_element_by_id("x1"), Some(existing));
}

#[test]
fn test_delete_unregisters_subtree() {
    let mut doc = SvgDocument::parse(CASCADE_DOC).unwrap();
    let g1 = doc.get_element_by_id("g1").unwrap();
    doc.delete(g1);
    assert_eq!(doc.get_element_by_id("g1"), None);
    assert_eq!(doc.get_element_by_id("r1"), None);
    let root = doc.root();
    assert!(doc.tree().children(root).iter().all(|&c| c != g1));
}

#[test]
fn test_generated_ids_are_deterministic() {
    let src = r#"<svg xmlns="http://www.w3.org/2000/svg">
                   <g><rect/><rect/></g><rect id="named"/>
                 </svg>"#;
    let a = SvgDocument::parse(src).unwrap();
    let b = SvgDocument::parse(src).unwrap();

    let ids = |doc: &SvgDocument| -> Vec<String> {
        doc.tree()
            .descendants(doc.root())
            .iter()
            .map(|&d| doc.attr(d, "id").unwrap().to_string())
            .collect()
    };
    assert_eq!(ids(&a), ids(&b));
}

#[test]
fn test_adopt_moves_node_across_documents() {
    let mut target = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="x1"/></svg>"#,
    )
    .unwrap();
    let mut source = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <style>#x1 { fill: orange; }</style>
             <rect id="x1" width="5" height="5"/>
           </svg>"#,
    )
    .unwrap();
    let moving = source.get_element_by_id("x1").unwrap();
    // materialize the source's CSS index so the entry can move
    assert_eq!(source.cascaded_style(moving).get("fill"), Some("orange"));

    let root = target.root();
    let adopted = target.adopt(&mut source, moving, root, 1);

    assert!(source.get_element_by_id("x1").is_none());
    let new_id = target.attr(adopted, "id").unwrap().to_string();
    assert_ne!(new_id, "x1");
    assert_eq!(target.get_element_by_id(&new_id), Some(adopted));
    // the CSS entry followed the node under its new id
    assert_eq!(target.cascaded_style(adopted).get("fill"), Some("orange"));
}

#[test]
fn test_doc_size_units() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="4in" height="2in"
               viewBox="0 0 100 50"/>"#,
    )
    .unwrap();
    let ds = doc.doc_size();
    assert_eq!(ds.width_px, 384.0);
    assert_eq!(ds.height_px, 192.0);
    assert!((ds.uuw - 3.84).abs() < 1e-9);
    assert_eq!(ds.uupx, Some(ds.uuw));
    // one inch, read back in user units
    assert!((ds.unit_to_uu("1in").unwrap() - 25.0).abs() < 1e-9);

    let px = ds.uu_to_px(Rect::new(0.0, 0.0, 100.0, 50.0));
    assert!((px.w - 384.0).abs() < 1e-9 && (px.h - 192.0).abs() < 1e-9);
    let back = ds.px_to_uu(px);
    assert!((back.w - 100.0).abs() < 1e-9 && (back.h - 50.0).abs() < 1e-9);
}

#[test]
fn test_doc_size_invalidated_by_attribute_write() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"
               viewBox="0 0 100 100"/>"#,
    )
    .unwrap();
    assert_eq!(doc.doc_size().width_px, 100.0);
    let root = doc.root();
    doc.set_attr(root, "width", "200");
    assert_eq!(doc.doc_size().width_px, 200.0);
    assert!((doc.doc_size().uuw - 2.0).abs() < 1e-9);
}

#[test]
fn test_standardize_viewbox_preserves_page_pixels() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="2in" height="1in"
               viewBox="0 0 100 50">
             <namedview>
               <page x="0" y="0" width="50" height="25"/>
               <page x="50" y="0" width="50" height="25"/>
             </namedview>
           </svg>"#,
    )
    .unwrap();
    let before: Vec<Rect> = doc.doc_size().pages.iter().map(|p| p.px).collect();
    doc.standardize_viewbox();
    let after: Vec<Rect> = doc.doc_size().pages.iter().map(|p| p.px).collect();

    assert_eq!(before.len(), 2);
    for (b, a) in before.iter().zip(&after) {
        assert!((b.x - a.x).abs() < 1e-9);
        assert!((b.y - a.y).abs() < 1e-9);
        assert!((b.w - a.w).abs() < 1e-9);
        assert!((b.h - a.h).abs() < 1e-9);
    }
    // the viewbox is now expressed in pixels
    assert_eq!(doc.attr(doc.root(), "width"), Some("192"));
}

#[test]
fn test_set_viewbox_keeps_units() {
    let mut doc = SvgDocument::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="2in" height="1in"
               viewBox="0 0 100 50"/>"#,
    )
    .unwrap();
    doc.set_viewbox([0.0, 0.0, 200.0, 100.0]);
    // same scale, twice the canvas, units kept
    let width = doc.attr(doc.root(), "width").unwrap().to_string();
    let value: f64 = width.trim_end_matches("in").parse().unwrap();
    assert!(width.ends_with("in"));
    assert!((value - 4.0).abs() < 1e-9);
    assert_eq!(doc.attr(doc.root(), "viewBox"), Some("0 0 200 100"));
    let ds = doc.doc_size();
    assert!((ds.uuw - 1.92).abs() < 1e-9);
}

#[test]
fn test_loader_roundtrip() {
    let mut doc = SvgDocument::parse(CASCADE_DOC).unwrap();
    let serialized = doc.to_svg_string();
    let mut reparsed = SvgDocument::parse(&serialized).unwrap();

    let r1 = reparsed.get_element_by_id("r1").unwrap();
    assert_eq!(reparsed.attr(r1, "x"), Some("10"));
    assert_eq!(reparsed.cascaded_style(r1).get("stroke"), Some("blue"));
    assert_eq!(
        doc.tree().descendants(doc.root()).len(),
        reparsed.tree().descendants(reparsed.root()).len()
    );
}
