//! Binary query decoding.
//!
//! The query is a positional byte stream: version, command, locale, then
//! length-prefixed device id, policy key and device type, followed by opaque
//! command parameters. There is no total-length field, so each prefix must
//! be validated before the next field can be located.
//!
//! Fixed offsets live in `layout`, the forward cursor in `reader`, and the
//! decoding rules in `parser`. Policy key lengths other than 0 or 4 are
//! rejected rather than skipped.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::QueryError;
pub use parser::{DecodedQuery, parse_query};
