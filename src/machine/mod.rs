pub mod engine;
pub mod registers;
