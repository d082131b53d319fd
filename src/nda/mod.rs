//! NDA attribute file parser
//!
//! The attribute file declares a positional field list per layer, then a
//! data section holding one quoted, comma-separated line per record.
//!
//! - [`parser`] - Line classification and the stateful scan
//! - [`schema`] - `ATTRIB(...)` field declarations

pub mod parser;
pub mod schema;


pub use parser::{AttributeParseResult, NdaLine, NdaParser};
pub use schema::parse_field_definition;
