// Editing flows through the editor host: read, change under a callback,
// write back, and share snapshots between peers.

use pretty_assertions::assert_eq;
use weaver_content_model::metadata::{TableMetadataFormat, get_metadata, table_metadata_definition};
use weaver_content_model::query::{find_paragraph_by_marker_mut, get_paragraphs};
use weaver_content_model::table::{
    TableRowInsertOperation, apply_table_format, insert_table_row, merge_table_cells,
};
use weaver_content_model::{
    CoauthoringServer, CoauthoringUpdate, ContentModelDocument, ContentModelEditor,
    ContentModelSegment, EditorOptions, Format, SmolStr,
};

const TABLE: &str = concat!(
    r#"<table data-editing-info="{}"><tbody>"#,
    "<tr><td>a</td><td>b</td></tr>",
    "<tr><td>c</td><td>d</td></tr>",
    "</tbody></table>"
);

fn options(namespace: &str) -> EditorOptions {
    EditorOptions {
        paragraph_marker_namespace: SmolStr::new(namespace),
        ..Default::default()
    }
}

fn set_text(document: &mut ContentModelDocument, marker: &str, text: &str) {
    let paragraph =
        find_paragraph_by_marker_mut(&mut document.blocks, marker).expect("paragraph with marker");
    paragraph.segments = vec![ContentModelSegment::text(text, Format::new())];
    paragraph.cached_element.clear();
}

#[test]
fn test_insert_row_through_editor() {
    let mut editor = ContentModelEditor::from_html(TABLE, EditorOptions::default());
    let changed = editor.format_content_model(|model| {
        let Some(table) = model.blocks[0].as_table_mut() else {
            return false;
        };
        table.rows[0].cells[0].is_selected = true;
        insert_table_row(table, TableRowInsertOperation::InsertBelow);
        true
    });

    assert!(changed);
    let html = editor.html();
    assert_eq!(html.matches("<tr").count(), 3, "{html}");
    assert!(html.contains("<td>a</td>"), "{html}");
}

#[test]
fn test_merge_cells_through_editor() {
    let mut editor = ContentModelEditor::from_html(TABLE, EditorOptions::default());
    editor.format_content_model(|model| {
        let Some(table) = model.blocks[0].as_table_mut() else {
            return false;
        };
        table.rows[0].cells[0].is_selected = true;
        table.rows[0].cells[1].is_selected = true;
        merge_table_cells(table);
        true
    });

    let html = editor.html();
    assert!(html.contains(r#"colspan="2""#), "{html}");
    assert_eq!(html.matches("<td").count(), 3, "{html}");

    // The merged table reads back with one continuation slot.
    let model = editor.create_content_model(None);
    let table = model.blocks[0].as_table().expect("table block");
    assert!(table.rows[0].cells[1].span_left);
    assert!(!table.rows[1].cells[1].span_left);
}

#[test]
fn test_table_format_is_stored_with_the_table() {
    let mut editor = ContentModelEditor::from_html(TABLE, EditorOptions::default());
    editor.format_content_model(|model| {
        let Some(table) = model.blocks[0].as_table_mut() else {
            return false;
        };
        let format = TableMetadataFormat {
            has_header_row: Some(true),
            header_row_color: Some("red".into()),
            ..Default::default()
        };
        apply_table_format(table, Some(format)).is_ok()
    });

    let html = editor.html();
    assert!(html.contains("<th"), "{html}");

    let model = editor.create_content_model(None);
    let table = model.blocks[0].as_table().expect("table block");
    let stored: TableMetadataFormat =
        get_metadata(&table.dataset, &table_metadata_definition()).expect("stored format");
    assert_eq!(stored.has_header_row, Some(true));
    assert_eq!(stored.header_row_color.as_deref(), Some("red"));
    assert!(table.rows[0].cells[0].is_header);
    assert_eq!(
        table.rows[0].cells[0].format.get("background-color"),
        Some("red")
    );
}

#[test]
fn test_markers_survive_a_write() {
    let mut editor = ContentModelEditor::from_html("<div>one</div><div>two</div>", options("me"));
    let mut model = editor.create_content_model(None);
    let markers: Vec<String> = get_paragraphs(&model)
        .iter()
        .filter_map(|paragraph| paragraph.marker.get().map(str::to_string))
        .collect();
    assert_eq!(markers.len(), 2);
    assert!(markers.iter().all(|marker| marker.starts_with("paragraph_me_")));

    editor.set_content_model(&mut model, None);
    let reread = editor.create_content_model(None);
    let reread_markers: Vec<String> = get_paragraphs(&reread)
        .iter()
        .filter_map(|paragraph| paragraph.marker.get().map(str::to_string))
        .collect();
    assert_eq!(markers, reread_markers);
}

#[test]
fn test_peers_edit_different_paragraphs() {
    let mut alice = ContentModelEditor::from_html("<div>one</div><div>two</div>", options("alice"));
    let initial = alice.create_content_model(None);
    let markers: Vec<String> = get_paragraphs(&initial)
        .iter()
        .filter_map(|paragraph| paragraph.marker.get().map(str::to_string))
        .collect();
    let mut server = CoauthoringServer::new(initial);

    let mut from_alice = server.latest().document.clone();
    let mut from_bob = server.latest().document.clone();
    set_text(&mut from_alice, &markers[0], "ONE");
    set_text(&mut from_bob, &markers[1], "TWO");

    server
        .apply_update(CoauthoringUpdate {
            client_id: "alice".into(),
            base_version: 0,
            document: from_alice,
        })
        .expect("alice's update");
    let version = server
        .apply_update(CoauthoringUpdate {
            client_id: "bob".into(),
            base_version: 0,
            document: from_bob,
        })
        .expect("bob's update");
    assert_eq!(version, 2);

    let mut latest = server.latest().document.clone();
    alice.set_content_model(&mut latest, None);
    assert_eq!(alice.html(), "<div>ONE</div><div>TWO</div>");
}
