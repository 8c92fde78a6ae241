//! Prelude module for `s3dat_internal`.
//!
//! This module provides a convenient way to import commonly used types and
//! traits.
//!
//! # Examples
//!
//! ```
//! use s3dat_internal::prelude::*;
//!
//! let empty = Sequence::<SettlerFrame>::empty();
//! assert!(empty.is_empty());
//! ```

// Re-export everything from s3dat_types::prelude
#[doc(inline)]
pub use s3dat_types::prelude::*;

// Re-export the entire s3dat_types module for advanced usage
#[doc(inline)]
pub use s3dat_types;
