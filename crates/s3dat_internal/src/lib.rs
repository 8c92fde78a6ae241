//! Internal crate for `s3dat-rs`.
//!
//! This crate only re-exports the member crates behind the `s3dat-rs`
//! facade, and should not be used directly.
//!
//! # Examples
//!
//! ```
//! use s3dat_internal::prelude::*;
//!
//! // All commonly used types are available
//! let placeholder = Image::Null;
//! assert!(placeholder.is_null());
//! ```

/// `use s3dat_internal::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export s3dat_types for convenience
pub use s3dat_types;
