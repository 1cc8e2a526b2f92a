#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod bytelen;
pub use bytelen::byte_length;

mod value;
pub use value::{MapKey, Value};

mod error;
pub use error::{ParseError, ParseErrorKind};

mod serialize;
pub use serialize::{SerializeOptions, to_string, to_string_with_options};

mod parse;
pub use parse::from_str;
