pub mod ast;
pub mod pretty;
