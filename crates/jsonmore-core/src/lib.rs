//! # jsonmore-core
//!
//! Convenience helpers on top of `serde_json` for code that treats JSON
//! objects as bags of numeric fields.
//!
//! - Read one value at a time from a stream of concatenated JSON values,
//!   with an incremental grammar check deciding where each value ends.
//! - Pull integers, doubles and fixed-length numeric arrays out of objects,
//!   with an explicit policy for missing fields and nulls.
//! - Build numeric arrays and attach fields to objects, using `null` for
//!   `NaN`.
//! - Find the object that owns a given key anywhere in a tree.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonmore_core::{add_double_array, read_double_array, stream};
//!
//! let mut input: &[u8] = br#"{"pose": [1.0, 2.5, null]} trailing"#;
//! let value = stream::read(&mut input).unwrap().unwrap();
//!
//! let mut pose = [0.0; 3];
//! assert!(read_double_array(&value, "pose", &mut pose, f64::NAN).unwrap());
//! assert_eq!(&pose[..2], &[1.0, 2.5]);
//! assert!(pose[2].is_nan());
//!
//! let mut out = serde_json::Map::new();
//! add_double_array(&mut out, "pose", &pose);
//! assert_eq!(serde_json::Value::Object(out).to_string(), r#"{"pose":[1.0,2.5,null]}"#);
//! ```
//!
//! ## Modules
//!
//! - [`checker`]: byte-at-a-time JSON grammar checker
//! - [`stream`]: `skip` / `read` one value from a `BufRead`
//! - [`accessor`]: typed field readers
//! - [`builder`]: node constructors and `add_*` helpers
//! - [`search`]: find the object owning a key
//! - [`error`]: error types

pub mod accessor;
pub mod builder;
pub mod checker;
pub mod error;
pub mod search;
pub mod stream;

pub use accessor::{double_or_nan, read_double, read_double_array, read_int, read_int_array};
pub use builder::{
    add_double, add_double_array, add_int, add_int_array, double_or_null, new_double_array,
    new_int_array,
};
pub use checker::{Checker, Step, SyntaxError};
pub use error::{ErrorKind, JsonMoreError};
pub use search::{find_object_with_name, find_object_with_name_mut};
pub use stream::{parse_slice, skip_whitespace, values, ReadLimits, Values};
