//! Writing tables back to delimited files.

mod writer;

pub use writer::{TableWriter, WriterConfig};
