//! File format support for the `s3dat-rs` project.

mod error;

pub mod dat;

/// Number of index-table slots in a container header
pub const SEQUENCE_TYPE_COUNT: usize = dat::constants::SEQUENCE_TYPE_COUNT;

// Re-export error type
pub use error::DatError;

// Re-export main container types
pub use dat::{
	AnimationFrameInfo, Bitmap, ByteCursor, DatBitmapTranslator, DatFile, DatFileResolver,
	DatFileType, Image, Sequence, SequenceCategory, SettlerFrame, TranslatorSet, compose_animation,
};
