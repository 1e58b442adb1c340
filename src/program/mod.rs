pub mod data;
pub mod parser;
