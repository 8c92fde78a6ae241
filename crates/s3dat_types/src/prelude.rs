//! Prelude module for `s3dat_types`.
//!
//! This module provides a convenient way to import commonly used types and
//! traits.
//!
//! # Examples
//!
//! ```no_run
//! use s3dat_types::prelude::*;
//!
//! # fn main() -> Result<(), DatError> {
//! # let translators = todo!();
//! let dat = DatFile::open("siedler3_02.7c003e01f.dat", DatFileType::Rgb555, translators, true)?;
//! let landscape = dat.landscape_safe(0);
//! # Ok(())
//! # }
//! ```

// Container types
#[doc(inline)]
pub use crate::file::{
	// Script records and composition
	AnimationFrameInfo,

	// Image values
	Bitmap,
	ByteCursor,

	// Translator plumbing
	DatBitmapTranslator,
	DatError,

	// The catalog itself
	DatFile,
	DatFileResolver,
	DatFileType,
	Image,

	Sequence,
	SequenceCategory,
	SettlerFrame,
	TranslatorSet,
	compose_animation,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
