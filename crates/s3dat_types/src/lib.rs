//! This crate provides the core data types and the container reader for the
//! `s3dat-rs` project.
//!
//! # File Formats
//!
//! - **DAT**: monolithic graphics containers bundling settler, torso, shadow,
//!   landscape, and GUI sprites plus animation scripts, read lazily through
//!   a per-category bitmap translator
//!
//! # Examples
//!
//! ```no_run
//! use s3dat_types::file::{DatFile, DatFileType, SequenceCategory, TranslatorSet};
//! # use s3dat_types::file::dat::{ByteCursor, DatBitmapTranslator};
//! # use s3dat_types::file::{Bitmap, DatError};
//! # #[derive(Clone)]
//! # struct RawRgba;
//! # impl DatBitmapTranslator for RawRgba {
//! #     fn decode(&self, _: &mut ByteCursor, _: DatFileType) -> Result<Bitmap, DatError> {
//! #         Ok(Bitmap::new(0, 0, 0, 0, Vec::new()))
//! #     }
//! # }
//!
//! # fn main() -> Result<(), s3dat_types::file::DatError> {
//! let dat = DatFile::open(
//!     "siedler3_00.f8007e01f.dat",
//!     DatFileType::Rgb565,
//!     TranslatorSet::uniform(RawRgba),
//!     true,
//! )?;
//! println!("{} landscape tiles", dat.sequence_count(SequenceCategory::Landscape));
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod prelude;

// Re-export commonly used types at crate root for convenience
pub use file::{
	AnimationFrameInfo, Bitmap, ByteCursor, DatBitmapTranslator, DatError, DatFile,
	DatFileResolver, DatFileType, Image, Sequence, SequenceCategory, SettlerFrame, TranslatorSet,
};
