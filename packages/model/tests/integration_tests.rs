//! Integration tests for the model crate

use scribe_model::{
    Block, BlockKey, BlockType, ChangeType, CharacterMetadata, ContentState, EditorSession,
    Fragment, SelectionState,
};

#[test]
fn test_document_roundtrip_through_json() -> anyhow::Result<()> {
    let json = r#"{
        "blocks": [
            {"key": "intro", "type": "header-one", "text": "Title"},
            {"key": "body", "type": "unstyled", "text": "Body text"}
        ],
        "entities": {
            "link-1": {"type": "LINK", "mutability": "mutable", "data": {"url": "https://example.com"}}
        }
    }"#;

    let content: ContentState = serde_json::from_str(json)?;
    assert_eq!(content.blocks().len(), 2);
    assert_eq!(content.entities().len(), 1);

    let serialized = serde_json::to_string(&content)?;
    let reloaded: ContentState = serde_json::from_str(&serialized)?;
    assert_eq!(reloaded.plain_text(), "Title\nBody text");
    Ok(())
}

#[test]
fn test_session_paste_like_workflow() {
    let content = ContentState::from_blocks(vec![
        Block::new(BlockKey::new("a"), BlockType::Unstyled, "Before after"),
    ])
    .unwrap();
    let mut session = EditorSession::new("workflow", content);
    session
        .set_selection(SelectionState::collapsed(BlockKey::new("a"), 7))
        .unwrap();

    let bold = CharacterMetadata::default().with_style("BOLD");
    let fragment = Fragment::from_blocks(vec![
        Block::stamped(BlockKey::new("x"), BlockType::Unstyled, "one", bold.clone()),
        Block::stamped(BlockKey::new("y"), BlockType::Unstyled, "two ", bold),
    ]);

    session.insert_fragment(&fragment).unwrap();

    let texts: Vec<String> = session
        .state()
        .content()
        .blocks()
        .iter()
        .map(|b| b.text.clone())
        .collect();
    assert_eq!(texts, vec!["Before one", "two after"]);
    assert_eq!(session.history_len(), 1);
    assert_eq!(
        session.state().last_change_type(),
        Some(ChangeType::InsertFragment)
    );

    // The same fragment can be inserted again without key clashes
    session.insert_fragment(&fragment).unwrap();
    let keys: std::collections::HashSet<_> = session
        .state()
        .content()
        .blocks()
        .iter()
        .map(|b| b.key.clone())
        .collect();
    assert_eq!(keys.len(), session.state().content().blocks().len());
}
