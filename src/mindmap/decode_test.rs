use super::*;
use crate::error::ErrorCode;

const TREE: &str = r#"{
  "id": "root",
  "text": "Rust",
  "children": [
    { "id": "own", "text": "Ownership", "children": [ { "id": "own-1", "text": "Borrowing" } ] },
    { "id": "async", "text": "Async", "children": [] }
  ]
}"#;

fn reply_with_summary(summary: &str) -> String {
    format!("Here is your mind map:\n\n```json\n{TREE}\n```\n\n## Summary\n\n{summary}\n")
}

#[test]
fn decodes_tree_and_summary() {
    let map = FencedJsonDecoder.decode(&reply_with_summary("Rust is safe and fast.")).unwrap();
    assert_eq!(map.data.id, "root");
    assert_eq!(map.data.text, "Rust");
    assert_eq!(map.data.children.len(), 2);
    assert_eq!(map.data.children[0].children[0].text, "Borrowing");
    assert!(map.data.children[1].is_leaf());
    assert_eq!(map.summary.as_deref(), Some("Rust is safe and fast."));
}

#[test]
fn summary_is_optional() {
    let reply = format!("```json\n{TREE}\n```");
    let map = FencedJsonDecoder.decode(&reply).unwrap();
    assert_eq!(map.summary, None);
}

#[test]
fn blank_summary_decodes_as_none() {
    let map = FencedJsonDecoder.decode(&reply_with_summary("   ")).unwrap();
    assert_eq!(map.summary, None);
}

#[test]
fn summary_stops_at_next_heading() {
    let reply = format!("```json\n{TREE}\n```\n\n## Summary\n\nFirst part.\nSecond line.\n## Notes\n\nignored");
    let map = FencedJsonDecoder.decode(&reply).unwrap();
    assert_eq!(map.summary.as_deref(), Some("First part.\nSecond line."));
}

#[test]
fn summary_stops_at_next_fence() {
    let reply = format!("## Summary\n\nLeading summary.\n```json\n{TREE}\n```");
    let map = FencedJsonDecoder.decode(&reply).unwrap();
    assert_eq!(map.summary.as_deref(), Some("Leading summary."));
    assert_eq!(map.data.id, "root");
}

#[test]
fn crlf_replies_are_normalized() {
    let reply = reply_with_summary("Windows line endings.").replace('\n', "\r\n");
    let map = FencedJsonDecoder.decode(&reply).unwrap();
    assert_eq!(map.data.children.len(), 2);
    assert_eq!(map.summary.as_deref(), Some("Windows line endings."));
}

#[test]
fn first_block_wins() {
    let reply = format!("```json\n{TREE}\n```\n\n```json\n{{\"id\":\"other\",\"text\":\"Other\"}}\n```");
    let map = FencedJsonDecoder.decode(&reply).unwrap();
    assert_eq!(map.data.id, "root");
}

#[test]
fn missing_block_is_terminal() {
    let err = FencedJsonDecoder.decode("Sorry, I cannot help with that.").unwrap_err();
    assert_eq!(err, DecodeError::MissingBlock);
    assert!(!err.retryable());
    assert_eq!(err.error_code(), "E_MISSING_BLOCK");
}

#[test]
fn untagged_fence_is_not_accepted() {
    let reply = format!("```\n{TREE}\n```");
    assert_eq!(FencedJsonDecoder.decode(&reply).unwrap_err(), DecodeError::MissingBlock);
}

#[test]
fn malformed_payload_is_terminal() {
    let err = FencedJsonDecoder.decode("```json\n{\"id\": \"root\", \n```").unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPayload(_)));
    assert!(!err.retryable());
}

#[test]
fn wrong_shape_is_malformed() {
    let err = FencedJsonDecoder.decode("```json\n[1, 2, 3]\n```").unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPayload(_)));
}

#[test]
fn duplicate_ids_are_rekeyed_on_ingest() {
    let reply = "```json\n{\"id\":\"root\",\"text\":\"T\",\"children\":[{\"id\":\"x\",\"text\":\"A\"},{\"id\":\"x\",\"text\":\"B\"}]}\n```";
    let map = FencedJsonDecoder.decode(reply).unwrap();
    assert_eq!(map.data.children[0].id, "x");
    assert_eq!(map.data.children[1].id, "root-2");
}
