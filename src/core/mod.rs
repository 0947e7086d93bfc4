pub mod diagnostics;
pub mod host;
pub mod profile;
pub mod resolve;
pub mod symbols;
