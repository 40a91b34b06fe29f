//! Prompt assembly for grounded completions

mod grounded;

pub use grounded::{GroundedPrompt, DEFAULT_SYSTEM_INSTRUCTION};
