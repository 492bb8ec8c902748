//! Mind-map domain: tree model, prompt, reply decoding and layout.
//!
//! Generates nothing on its own; `services::generate` drives the LLM round
//! trip and this module supplies the pure pieces around it.

pub mod decode;
pub mod layout;
pub mod node;
pub mod prompt;

pub use decode::{DecodeError, FencedJsonDecoder, ResponseDecoder};
pub use layout::{Layout, LayoutConfig, LayoutVariant, layout};
pub use node::{MindMap, MindMapNode};
