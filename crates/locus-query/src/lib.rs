//! Query token slicing for locus.
//!
//! Splits a free-text search query into normalized tokens that the category matcher and the
//! retrieval layer consume:
//!
//! - **Normalization**: compatibility decomposition, diacritic removal and lowercasing, so
//!   `Café` and `cafe` produce the same token
//! - **Delimiters**: whitespace and a punctuation set, optionally extended per locale
//! - **Offsets**: every token remembers the byte range it came from in the source query
//! - **Emoji**: joiners and variation selectors never split, so compound emoji stay whole
//!
//! # Example
//!
//! ```
//! use locus_query::{Delimiters, slice};
//!
//! let tokens = slice("Café, Hotel", &Delimiters::default());
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens.get(0).unwrap().text(), "cafe");
//! assert_eq!(tokens.get(1).unwrap().range(), 6..11);
//! ```

#![warn(missing_docs)]

mod delimiters;
mod normalize;
mod slice;

pub use delimiters::{DEFAULT_DELIMITERS, Delimiters};
pub use normalize::normalize;
pub use slice::{Token, TokenSlice, slice};
