pub mod json;
pub mod output;
pub mod table;

pub use output::OutputBuffer;
