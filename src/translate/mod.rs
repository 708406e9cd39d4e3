mod client;
mod interface;

pub use client::ServiceTranslator;
pub use interface::Translator;
