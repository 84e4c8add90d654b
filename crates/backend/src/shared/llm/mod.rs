pub mod openai_provider;
pub mod types;

pub use types::*;
pub use openai_provider::OpenAiProvider;
