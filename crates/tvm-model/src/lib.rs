#![forbid(unsafe_code)]

pub mod ast;
pub mod model;
pub mod symbol;
pub mod ty;
