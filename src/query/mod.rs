// file: src/query/mod.rs
// description: query preparation module exports

pub mod escaper;

pub use escaper::{EscapedQuery, escape};
