//! Stream line parsing

mod parser;

pub use parser::parse_event;
