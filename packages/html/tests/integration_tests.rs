//! Conversion of markup as produced by real clipboard sources

use scribe_html::{convert_html_to_blocks, BlockRenderRules, BOLD, ITALIC};
use scribe_model::{BlockType, KeyGenerator};

fn convert(html: &str) -> scribe_model::Fragment {
    let mut keys = KeyGenerator::new("integration");
    convert_html_to_blocks(html, &BlockRenderRules::default(), &mut keys).unwrap()
}

#[test]
fn test_docs_style_clipboard() {
    let html = concat!(
        "<meta charset=\"utf-8\">",
        "<b style=\"font-weight:normal;\" id=\"docs-internal-guid-1234\">",
        "<h1 dir=\"ltr\"><span style=\"font-size:20pt;font-weight:400\">Meeting notes</span></h1>",
        "<p dir=\"ltr\"><span style=\"font-weight:700\">Owner:</span><span> Sam</span></p>",
        "<ul><li dir=\"ltr\"><p dir=\"ltr\"><span style=\"font-style:italic\">Ship it</span></p></li></ul>",
        "</b>",
    );

    let fragment = convert(html);
    let blocks = fragment.blocks();

    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].block_type, BlockType::HeaderOne);
    assert_eq!(blocks[0].text, "Meeting notes");
    assert!(blocks[0].characters.iter().all(|c| !c.has_style(BOLD)));

    assert_eq!(blocks[1].text, "Owner: Sam");
    assert!(blocks[1].characters[0].has_style(BOLD));
    assert!(!blocks[1].characters[7].has_style(BOLD));

    assert_eq!(blocks[2].block_type, BlockType::UnorderedListItem);
    assert!(blocks[2].characters[0].has_style(ITALIC));
}

#[test]
fn test_browser_selection_clipboard() {
    let html = concat!(
        "<html><head><title>Page</title></head><body>",
        "<!--StartFragment-->",
        "<h2>Install</h2>",
        "<pre><code>cargo add scribe\ncargo build</code></pre>",
        "<p>See the <a href=\"https://example.com/docs\">docs</a>.</p>",
        "<!--EndFragment-->",
        "</body></html>",
    );

    let fragment = convert(html);
    let blocks = fragment.blocks();

    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].block_type, BlockType::HeaderTwo);
    assert_eq!(blocks[1].block_type, BlockType::CodeBlock);
    assert_eq!(blocks[1].text, "cargo add scribe\ncargo build");
    assert_eq!(blocks[2].text, "See the docs.");
    assert_eq!(fragment.entities().len(), 1);
}

#[test]
fn test_block_keys_are_unique() {
    let fragment = convert("<p>a</p><p>b</p><p>c</p><ol><li>d</li></ol>");
    let keys: std::collections::HashSet<_> = fragment.keys().collect();
    assert_eq!(keys.len(), 4);
}
