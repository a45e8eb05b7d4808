//! Fixed-width word primitives.
//!
//! Everything the Hack machine moves around is a 16-bit two's-complement
//! word. [`Word16`] wraps that value and provides bit indexing and slicing
//! so the decoder and memory map can pick fields out of it by position.

mod word16;

pub use word16::{Word16, ParseError};
