pub mod fetch;
pub mod gemini;
