//! Core scanning domain: lexer -> comment filter -> namespace tracker ->
//! enum extractor -> aspect validator. No file I/O happens here.

pub mod aspect;
pub mod enum_decl;
pub mod error;
pub mod filter;
pub mod index;
pub mod lexer;
pub mod report;
pub mod scanner;
pub mod scope;
pub mod token;
