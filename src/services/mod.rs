pub mod analyzer;
pub mod extract;
pub mod llm;
pub mod parser;
pub mod prompt;
pub mod render;
