//! # Rev Serde
//!
//! JSON and XML adapters for `rev-mapper`.
//!
//! Each adapter only translates between wire bytes and the mapper's
//! [`GenericNode`](rev_mapper::GenericNode) tree; binding the tree to typed
//! entities, including deciding what is a sequence, is the mapper's job.
//!
//! ## Features
//!
//! - **JSON**: `serde_json` based, key order preserved, sequences always
//!   wrapped in arrays.
//! - **XML** (`xml` feature): `quick-xml` based, sequences as repeated sibling
//!   elements.
//!
//! ## Layouts
//!
//! | Items | JSON | XML |
//! |-------|------|-----|
//! | many  | `{"artist": [{..}, {..}]}` | `<artist>..</artist><artist>..</artist>` |
//! | one   | `{"artist": [{..}]}` | `<artist>..</artist>` |
//! | none  | `{"artist": []}` | *(nothing)* |
//!
//! Both read back into the same entity.
//!
//! ## Examples
//!
//! ```ignore
//! use rev_serde::{from_json_str, to_xml_string};
//!
//! let json = r#"{"artist-list": {"artist": [{"name": "Fleetwood Mac"}]}}"#;
//! let list: ArtistList = from_json_str(&mapper, json)?;
//! let xml = to_xml_string(&mapper, &list)?;
//! ```

pub mod error;
pub mod format;
pub mod json;

#[cfg(feature = "xml")]
pub mod xml;

pub use error::{Result, SerdeError};
pub use format::Format;

pub use json::{
    JsonFormat, from_json_slice, from_json_str, parse_json_slice, parse_json_str, to_json_string,
    to_json_string_pretty, write_json_string, write_json_string_pretty, write_json_vec,
};

#[cfg(feature = "xml")]
pub use xml::{
    XmlFormat, from_xml_slice, from_xml_str, parse_xml_reader, parse_xml_slice, parse_xml_str,
    to_xml_string, to_xml_string_pretty, write_xml_string, write_xml_string_pretty,
    write_xml_vec, write_xml_writer,
};
