// DOM -> model -> DOM -> model round trips, and the shapes the converters
// agree on in between.

use pretty_assertions::assert_eq;
use weaver_content_model::dom::{Dom, DomPosition, DomRange, DomSelection, NodeId};
use weaver_content_model::metadata::{EDITING_INFO, has_metadata};
use weaver_content_model::model::{ContentModelSegment, ListType};
use weaver_content_model::query::get_selected_segments;
use weaver_content_model::{
    ContentModelBlock, ContentModelDocument, DomToModelContext, DomToModelOption,
    content_model_to_fragment, dom_to_content_model, dom_to_content_model_with_option,
};

fn parse(html: &str) -> (Dom, NodeId) {
    let mut dom = Dom::new();
    let root = dom.create_element("div");
    dom.set_inner_html(root, html);
    (dom, root)
}

fn model_of(html: &str) -> ContentModelDocument {
    let (dom, root) = parse(html);
    dom_to_content_model_with_option(&dom, root, &DomToModelOption::default())
}

fn render(model: &ContentModelDocument) -> String {
    let mut dom = Dom::new();
    let output = content_model_to_fragment(&mut dom, model);
    dom.inner_html(output.root)
}

/// Read `html`, write it back out and read the result again. Returns the
/// written html after checking both models agree.
fn round_trip(html: &str) -> String {
    let first = model_of(html);
    let written = render(&first);
    let second = model_of(&written);
    assert_eq!(first, second, "model changed after writing {written}");
    written
}

#[test]
fn test_paragraphs_and_inline_format() {
    let html = round_trip("<div>hello <b>world</b></div><p>para</p>");
    assert_eq!(html, "<div>hello <b>world</b></div><p>para</p>");
}

#[test]
fn test_headings_do_not_repeat_implied_bold() {
    let html = round_trip(r#"<h2>Title</h2><div style="text-align: center">centered <i>text</i></div>"#);
    assert_eq!(
        html,
        r#"<h2>Title</h2><div style="text-align: center">centered <i>text</i></div>"#
    );
}

#[test]
fn test_links_and_decorations() {
    round_trip(r#"<div><a href="https://example.com">link</a> and <u><s>both</s></u></div>"#);
}

#[test]
fn test_flat_list() {
    let html = round_trip("<ol><li>one</li><li>two</li></ol><ul><li>bullet</li></ul>");
    assert_eq!(html, "<ol><li>one</li><li>two</li></ol><ul><li>bullet</li></ul>");

    let model = model_of(&html);
    let types: Vec<ListType> = model
        .blocks
        .iter()
        .filter_map(ContentModelBlock::as_list_item)
        .map(|item| item.levels[0].list_type)
        .collect();
    assert_eq!(types, vec![ListType::Ordered, ListType::Ordered, ListType::Unordered]);
}

#[test]
fn test_nested_list_numbering() {
    round_trip("<ol><li>one</li><li>two<ol><li>nested</li></ol></li><li>three</li></ol>");
}

#[test]
fn test_list_start_is_preserved() {
    let html = round_trip(r#"<ol start="3"><li>c</li><li>d</li></ol>"#);
    assert_eq!(html, r#"<ol start="3"><li>c</li><li>d</li></ol>"#);
}

#[test]
fn test_interrupted_list_continues_numbering() {
    let html = round_trip(r#"<ol><li>a</li></ol><div>x</div><ol start="2"><li>b</li></ol>"#);
    assert_eq!(
        html,
        r#"<ol><li>a</li></ol><div>x</div><ol start="2"><li>b</li></ol>"#
    );

    let model = model_of(&html);
    let overrides: Vec<Option<u32>> = model
        .blocks
        .iter()
        .filter_map(ContentModelBlock::as_list_item)
        .map(|item| item.levels[0].start_number_override)
        .collect();
    assert_eq!(overrides, vec![Some(1), None]);
}

#[test]
fn test_editor_table_round_trips() {
    let html = round_trip(concat!(
        r#"<table data-editing-info='{"hasHeaderRow":false}'><tbody>"#,
        r#"<tr><td style="width: 100px">a</td><td style="width: 50px">b</td></tr>"#,
        "</tbody></table>"
    ));
    assert!(html.contains(r#"<td style="width: 100px">a</td>"#));

    let model = model_of(&html);
    let table = model.blocks[0].as_table().expect("table block");
    assert_eq!(table.widths, vec![100.0, 50.0]);
    assert!(has_metadata(&table.dataset));
    assert!(table.dataset.contains_key(EDITING_INFO));
}

#[test]
fn test_spans_become_continuation_cells() {
    let model = model_of(concat!(
        r#"<table data-editing-info="{}"><tr><td colspan="2">wide</td></tr>"#,
        "<tr><td>a</td><td>b</td></tr></table>"
    ));
    let table = model.blocks[0].as_table().expect("table block");
    assert!(table.is_rectangular());
    assert!(table.rows[0].cells[1].span_left);
    assert!(table.rows[0].cells[1].blocks.is_empty());

    let html = render(&model);
    assert!(html.contains(r#"<td colspan="2">wide</td>"#), "{html}");
}

#[test]
fn test_foreign_table_is_frozen_as_entity() {
    let model = model_of("<table><tr><td>x</td></tr></table>");
    let ContentModelBlock::Entity(entity) = &model.blocks[0] else {
        panic!("expected an entity, got {:?}", model.blocks[0]);
    };
    assert!(entity.entity_format.is_fake_entity);
    assert!(entity.entity_format.is_readonly);

    let (dom, root) = parse("<table><tr><td>x</td></tr></table>");
    let option = DomToModelOption {
        freeze_foreign_tables: false,
        ..Default::default()
    };
    let model = dom_to_content_model_with_option(&dom, root, &option);
    assert!(model.blocks[0].as_table().is_some());
}

#[test]
fn test_selected_foreign_table_is_modelled() {
    let (dom, root) = parse("<table><tr><td>x</td></tr></table>");
    let table = dom.children(root)[0];
    let td = dom.descendants(table).find(|&node| dom.has_tag(node, "td")).expect("td");
    let text = dom.children(td)[0];
    let selection = DomSelection::Range {
        range: DomRange::collapsed(DomPosition::new(text, 0)),
    };
    let mut context =
        DomToModelContext::new(&dom, &DomToModelOption::default()).with_selection(Some(selection));
    let model = dom_to_content_model(root, &mut context);
    assert!(model.blocks[0].as_table().is_some());
}

#[test]
fn test_reduced_model_keeps_placeholders_around_selection() {
    let (dom, root) = parse("<div>one</div><div>two</div><div>three</div>");
    let second = dom.children(root)[1];
    let text = dom.children(second)[0];
    let selection = DomSelection::Range {
        range: DomRange::collapsed(DomPosition::new(text, 1)),
    };
    let option = DomToModelOption {
        reduced_model: true,
        ..Default::default()
    };
    let mut context = DomToModelContext::new(&dom, &option).with_selection(Some(selection));
    let model = dom_to_content_model(root, &mut context);

    assert_eq!(model.blocks.len(), 3);
    let texts: Vec<&str> = model
        .blocks
        .iter()
        .filter_map(ContentModelBlock::as_paragraph)
        .flat_map(|paragraph| paragraph.segments.iter())
        .filter_map(|segment| match segment {
            ContentModelSegment::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(texts, vec!["t", "wo"]);
    assert_eq!(get_selected_segments(&model).len(), 1);
}

#[test]
fn test_block_entity_round_trips() {
    let html = r#"<div class="_Entity _EType_widget _EId_w1 _EReadonly_1" contenteditable="false"><b>frozen</b></div>"#;
    assert_eq!(round_trip(html), html);

    let model = model_of(html);
    let ContentModelBlock::Entity(entity) = &model.blocks[0] else {
        panic!("expected an entity, got {:?}", model.blocks[0]);
    };
    assert_eq!(entity.entity_format.entity_type.as_deref(), Some("widget"));
    assert_eq!(entity.entity_format.id.as_deref(), Some("w1"));
    assert!(entity.entity_format.is_readonly);
    assert!(!entity.entity_format.is_fake_entity);
}

#[test]
fn test_inline_entity_round_trips() {
    let html = concat!(
        "<div>see ",
        r#"<span class="_Entity _EType_mention _EId_m1 _EReadonly_1" contenteditable="false">@bob</span>"#,
        " now</div>"
    );
    assert_eq!(round_trip(html), html);

    let model = model_of(html);
    let paragraph = model.blocks[0].as_paragraph().expect("paragraph");
    assert!(
        paragraph
            .segments
            .iter()
            .any(|segment| matches!(segment, ContentModelSegment::Entity(_)))
    );
}

#[test]
fn test_svg_is_carried_as_general_segment() {
    let html = r#"<div>icon <svg viewBox="0 0 2 2"><circle r="1"></circle></svg> end</div>"#;
    assert_eq!(round_trip(html), html);

    let model = model_of(html);
    let paragraph = model.blocks[0].as_paragraph().expect("paragraph");
    let general = paragraph
        .segments
        .iter()
        .find_map(|segment| match segment {
            ContentModelSegment::General(general) => Some(general),
            _ => None,
        })
        .expect("general segment");
    assert_eq!(general.element.tag(), "svg");
}

#[test]
fn test_image_selection_is_restored() {
    let (dom, root) = parse(r#"<div>before<img src="a.png">after</div>"#);
    let image = dom.descendants(root).find(|&node| dom.has_tag(node, "img")).expect("img");
    let mut context = DomToModelContext::new(&dom, &DomToModelOption::default())
        .with_selection(Some(DomSelection::Image { image }));
    let model = dom_to_content_model(root, &mut context);

    let mut out = Dom::new();
    let output = content_model_to_fragment(&mut out, &model);
    let Some(DomSelection::Image { image: restored }) = output.selection else {
        panic!("expected an image selection, got {:?}", output.selection);
    };
    assert!(out.has_tag(restored, "img"));
    assert!(out.contains(output.root, restored));
    assert_eq!(out.attribute(restored, "src"), Some("a.png"));
}

#[test]
fn test_hostile_spans_are_clamped() {
    let model = model_of(concat!(
        r#"<table data-editing-info="{}"><tr>"#,
        r#"<td colspan="0">a</td><td colspan="99999999">b</td>"#,
        r#"</tr><tr><td rowspan="4294967295">c</td></tr></table>"#
    ));
    let table = model.blocks[0].as_table().expect("table block");
    assert!(table.is_rectangular());
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0].cells.len(), 1001);
    assert!(!table.rows[0].cells[1].span_left);
    assert!(table.rows[0].cells[2].span_left);
    assert!(table.rows[1].cells.iter().all(|cell| !cell.span_above));

    let html = render(&model);
    assert!(html.contains(r#"<td colspan="1000">b</td>"#), "{html}");
    assert!(!html.contains("99999999"), "{html}");
}

#[test]
fn test_hostile_list_start_saturates() {
    let html = round_trip(r#"<ol start="4294967295"><li>a</li><li>b</li></ol>"#);
    assert_eq!(html, r#"<ol start="4294967295"><li>a</li><li>b</li></ol>"#);
}

#[test]
fn test_zero_list_start_is_preserved() {
    let html = round_trip(r#"<ol start="0"><li>a</li></ol>"#);
    assert_eq!(html, r#"<ol start="0"><li>a</li></ol>"#);

    let model = model_of(&html);
    let item = model.blocks[0].as_list_item().expect("list item");
    assert_eq!(item.levels[0].start_number_override, Some(0));
}

#[test]
fn test_table_without_cells_is_dropped() {
    let html = round_trip(r#"<table data-editing-info="{}"></table><div>x</div>"#);
    assert_eq!(html, "<div>x</div>");

    let html = round_trip(r#"<table data-editing-info="{}"><tr></tr></table><div>x</div>"#);
    assert_eq!(html, "<div>x</div>");
}
