mod client;
mod interface;

pub use client::ServiceCodeGenerator;
pub use interface::CodeGenerator;
