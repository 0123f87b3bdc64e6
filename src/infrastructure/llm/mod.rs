//! LLM provider implementations

mod openrouter;

pub use openrouter::OpenRouterProvider;
