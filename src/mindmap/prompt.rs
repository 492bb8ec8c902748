//! Prompt construction for mind-map generation.
//!
//! The prompt pins the reply format that [`super::decode::FencedJsonDecoder`]
//! expects: one ```` ```json ```` fenced tree followed by a `## Summary`
//! section. Keep the two in sync.

use std::fmt::Write;

use super::decode::SUMMARY_HEADING;

pub const SYSTEM_PROMPT: &str = "You are a professional mind-map assistant. You break a topic down into a clear, \
well-structured mind map and finish with a concise, insightful summary.";

const EXAMPLE_TREE: &str = r#"```json
{
  "id": "root",
  "text": "Topic name",
  "children": [
    {
      "id": "child1",
      "text": "Subtopic 1",
      "children": [
        { "id": "child1-1", "text": "Subtopic 1-1" }
      ]
    },
    {
      "id": "child2",
      "text": "Subtopic 2",
      "children": []
    }
  ]
}
```"#;

/// Render the user prompt for `topic` at `depth` levels.
#[must_use]
pub fn build_prompt(topic: &str, depth: u8) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Create a detailed mind map for the topic \"{}\" with a depth of {depth} levels.", topic.trim());
    out.push('\n');
    out.push_str("Return the mind map data in exactly this JSON format:\n\n");
    out.push_str(EXAMPLE_TREE);
    out.push_str("\n\nMake sure that:\n");
    out.push_str("1. The structure is clear and logically organized\n");
    out.push_str("2. Every node has a unique id\n");
    out.push_str("3. The content is rich and relevant to the topic\n");
    out.push_str("4. The JSON block follows the format strictly, with no commentary inside it\n");
    out.push('\n');
    out.push_str("After the mind map data, provide a concise summary of the topic's core points and key insights, ");
    out.push_str("formatted as follows:\n\n");
    let _ = writeln!(out, "{SUMMARY_HEADING}");
    out.push('\n');
    out.push_str("[A 200-300 word summary of the topic's core content and key insights]\n");
    out
}
