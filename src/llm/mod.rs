pub mod completion;
pub mod extractor;
pub mod prompts;

#[cfg(feature = "gemini")]
pub mod client;
#[cfg(feature = "gemini")]
pub mod types;

pub use completion::*;
pub use extractor::*;
pub use prompts::*;

#[cfg(feature = "gemini")]
pub use client::*;
