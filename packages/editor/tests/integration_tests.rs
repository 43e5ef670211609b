//! Integration tests for the builder session

use pagecraft_blocks::{tree, BlockDefinition, BlockInstance, Column, MapRegistry, Page, SequentialIds};
use pagecraft_editor::{BuilderSession, EditorConfig, PageDocument};
use serde_json::json;
use std::sync::Arc;

fn registry() -> Arc<MapRegistry> {
    Arc::new(
        MapRegistry::new()
            .with(BlockDefinition::new("text", "Text").with_default("text", ""))
            .with(BlockDefinition::new("section", "Section"))
            .with(BlockDefinition::new("row", "Row"))
            .with(BlockDefinition::new("group", "Group")),
    )
}

fn session_with(blocks: Vec<BlockInstance>) -> BuilderSession {
    BuilderSession::from_page(
        registry(),
        Page {
            blocks,
            ..Page::default()
        },
        EditorConfig::default(),
    )
    .with_id_generator(Box::new(SequentialIds::new("new")))
}

#[test]
fn test_find_three_levels_deep_via_columns() {
    let session = session_with(vec![BlockInstance::new("l1", "row").with_columns(vec![Column::new(vec![
        BlockInstance::new("l2", "row").with_columns(vec![Column::new(vec![
            BlockInstance::new("l3", "row").with_columns(vec![Column::new(vec![BlockInstance::new("target", "text")])]),
        ])]),
    ])])]);

    assert_eq!(session.find_block_by_id("target").unwrap().block_type, "text");
}

#[test]
fn test_find_three_levels_deep_via_section_blocks() {
    let session = session_with(vec![BlockInstance::new("l1", "section").with_section(vec![
        BlockInstance::new("l2", "section").with_section(vec![
            BlockInstance::new("l3", "section").with_section(vec![BlockInstance::new("target", "text")]),
        ]),
    ])]);

    assert!(session.find_block_by_id("target").is_some());
}

#[test]
fn test_find_three_levels_deep_via_children() {
    let session = session_with(vec![BlockInstance::new("l1", "group").with_children(vec![
        BlockInstance::new("l2", "group").with_children(vec![
            BlockInstance::new("l3", "group").with_children(vec![BlockInstance::new("target", "text")]),
        ]),
    ])]);

    assert!(session.find_block_by_id("target").is_some());
    let path: Vec<String> = session
        .get_block_path("target")
        .into_iter()
        .map(|segment| segment.label)
        .collect();
    assert_eq!(path, vec!["Group", "Group", "Group", "Text"]);
}

#[test]
fn test_find_in_stored_json() {
    let page = Page::from_json(
        r#"{
            "blocks": [{
                "id": "hero",
                "type": "section",
                "settings": {
                    "blocks": [{
                        "id": "cols",
                        "type": "row",
                        "settings": {
                            "columns": [
                                { "width": "1/2", "blocks": [{ "id": "cta", "type": "button" }] }
                            ]
                        }
                    }]
                }
            }]
        }"#,
    )
    .unwrap();

    assert!(BuilderSession::find_block_by_id_in(&page.blocks, "cta").is_some());
}

#[test]
fn test_paste_always_issues_new_root_ids() {
    let mut session = session_with(vec![BlockInstance::new("src", "text").with_setting("text", "Hi")]);

    assert!(session.copy_block("src"));
    let first = session.paste_block(None).unwrap();
    let second = session.paste_block(None).unwrap();

    assert_ne!(first, "src");
    assert_ne!(second, "src");
    assert_ne!(first, second);
    assert_eq!(session.find_block_by_id(&second).unwrap().settings["text"], "Hi");
}

#[test]
fn test_paste_with_empty_clipboard_is_noop() {
    let mut session = session_with(vec![]);
    assert!(session.paste_block(None).is_none());
    assert!(!session.has_pending_snapshot());
}

#[test]
fn test_cut_removes_nested_block_and_pastes_at_root() {
    let mut session = session_with(vec![BlockInstance::new("g", "group")
        .with_children(vec![BlockInstance::new("inner", "text"), BlockInstance::new("keep", "text")])]);

    let cut = session.cut_block("inner").unwrap();
    assert_eq!(cut.id, "inner");
    assert!(session.find_block_by_id("inner").is_none());

    let pasted = session.paste_block(Some(0)).unwrap();
    assert_eq!(session.blocks()[0].id, pasted);
    assert_eq!(session.blocks()[1].children.as_ref().unwrap().len(), 1);
}

#[test]
fn test_duplicate_leaf_gets_new_id() {
    let mut session = session_with(vec![BlockInstance::new("a", "text")]);

    let copy = session.duplicate_block(0).unwrap();
    assert_eq!(session.blocks().len(), 2);
    assert_eq!(session.blocks()[0].id, "a");
    assert_eq!(session.blocks()[1].id, copy);
    assert_ne!(copy, "a");
}

#[test]
fn test_duplicate_container_keeps_nested_ids() {
    let mut session = session_with(vec![BlockInstance::new("a", "group")
        .with_children(vec![BlockInstance::new("child", "text")])]);

    session.duplicate_block(0).unwrap();

    let blocks = session.blocks();
    assert_ne!(blocks[0].id, blocks[1].id);
    assert_eq!(
        blocks[0].children.as_ref().unwrap()[0].id,
        blocks[1].children.as_ref().unwrap()[0].id
    );
    assert_eq!(tree::duplicate_ids(blocks), vec!["child".to_string()]);
}

#[test]
fn test_duplicate_does_not_reapply_defaults() {
    // "text" defaults include a `text` key; the stored block predates it
    let mut session = session_with(vec![BlockInstance::new("a", "text")]);
    session.duplicate_block(0);
    assert!(session.blocks()[1].settings.get("text").is_none());

    // Cloning through the palette path does fill it in
    let source = session.blocks()[0].clone();
    let id = session.add_block(source, None).unwrap();
    assert_eq!(session.find_block_by_id(&id).unwrap().settings["text"], json!(""));
}

#[test]
fn test_operations_on_empty_tree_are_noops() {
    let mut session = session_with(vec![]);

    assert!(session.remove_block(0).is_none());
    assert!(session.duplicate_block(0).is_none());
    assert!(!session.move_block_up(0));
    assert!(!session.move_block_down(0));
    assert!(!session.copy_block("x"));
    assert!(session.cut_block("x").is_none());
    assert!(!session.undo());
    assert!(!session.redo());
    assert!(!session.has_pending_snapshot());
}

#[test]
fn test_selection_snapshot_round_trip() {
    let mut session = session_with(vec![BlockInstance::new("a", "text"), BlockInstance::new("b", "text")]);

    session.select_block("b");
    session.move_block_up(1);
    session.take_snapshot();
    assert_eq!(session.editing_index(), Some(0));

    session.undo();
    assert_eq!(session.editing_index(), None);
    assert_eq!(session.active_block_id(), None);

    session.redo();
    assert_eq!(session.editing_index(), Some(0));
    assert_eq!(session.active_block_id(), Some("b"));
}

#[test]
fn test_restored_blocks_are_independent_copies() {
    let mut session = session_with(vec![]);
    let id = session.add_block("text", None).unwrap();
    session.take_snapshot();
    session.update_block_settings(&id, "text", json!("draft"));
    session.take_snapshot();

    session.undo();
    session.update_block_settings(&id, "text", json!("other"));
    session.take_snapshot();

    // The discarded "draft" entry is gone and the new one stands alone
    assert!(!session.can_redo());
    session.undo();
    assert_eq!(session.find_block_by_id(&id).unwrap().settings["text"], json!(""));
}

#[test]
fn test_document_to_session_and_back() -> anyhow::Result<()> {
    let doc = PageDocument::from_json(
        r#"{ "blocks": [{ "id": "a", "type": "text" }], "globalSettings": { "containerWidth": "1140px" } }"#,
    )?;

    let mut session = doc.open_session(registry(), EditorConfig::default());
    session.set_global_setting("spacing", json!("lg"));
    session.flush();

    let page = session.to_page();
    assert_eq!(page.global_settings["containerWidth"], "1140px");
    assert_eq!(page.global_settings["spacing"], "lg");

    session.undo();
    assert!(session.global_settings().get("spacing").is_none());
    Ok(())
}
