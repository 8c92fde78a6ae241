//! Error types for DAT container parsing.
//!
//! This module provides the unified [`DatError`] type used by every parsing
//! and lookup operation in the crate.
//!
//! # Examples
//!
//! ```
//! use s3dat_types::file::DatError;
//!
//! fn handle_error(err: DatError) {
//!     if err.is_length_mismatch() {
//!         eprintln!("file was truncated or padded: {}", err);
//!     } else {
//!         eprintln!("container rejected: {}", err);
//!     }
//! }
//! ```

use thiserror::Error;

use crate::file::dat::SequenceCategory;

/// Unified error type for all DAT container operations
#[derive(Debug, Error)]
pub enum DatError {
	/// A fixed literal or structural constraint in the file did not hold
	#[error("format mismatch at offset {offset:#x}: {detail}")]
	FormatMismatch {
		/// Absolute file offset where the constraint was checked
		offset: u64,
		/// Human-readable description of the violated constraint
		detail: String,
	},

	/// The file-size field in the header does not match the real file length
	#[error("declared file size {declared} does not match actual length {actual}")]
	LengthMismatch {
		/// Size recorded in the container header
		declared: u64,
		/// Length of the underlying file or buffer
		actual: u64,
	},

	/// The file ended in the middle of a read
	#[error("unexpected end of file at offset {offset:#x}")]
	Truncated {
		/// Absolute offset of the read that ran past the end
		offset: u64,
	},

	/// A bitmap translator rejected a frame payload
	#[error("bitmap translator failed: {message}")]
	TranslatorFailure {
		/// Description supplied by the translator
		message: String,
	},

	/// A caller-supplied index is outside the category table
	#[error("{category} index {index} out of range (table length {len})")]
	IndexOutOfRange {
		/// Category whose table was indexed
		category: SequenceCategory,
		/// Index that was requested
		index: usize,
		/// Length of the table
		len: usize,
	},

	/// An animation record referenced a container, sequence, or frame that
	/// does not exist
	#[error("animation record references missing data in file {file}: {detail}")]
	CrossReferenceMissing {
		/// Numeric id of the referenced container file
		file: u16,
		/// Description of the missing sequence or frame
		detail: String,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl DatError {
	/// Create a [`DatError::FormatMismatch`] for a literal that read back
	/// differently than expected
	pub fn unexpected_bytes(offset: u64, expected: &[u8], actual: &[u8]) -> Self {
		Self::FormatMismatch {
			offset,
			detail: format!("expected {expected:02X?}, got {actual:02X?}"),
		}
	}

	/// Create a [`DatError::FormatMismatch`] for an index block whose byte
	/// count disagrees with its pointer count
	pub fn inconsistent_index_block(offset: u64, byte_count: u16, pointer_count: u16) -> Self {
		Self::FormatMismatch {
			offset,
			detail: format!(
				"index block byte count {byte_count} and pointer count {pointer_count} are not consistent"
			),
		}
	}

	/// Returns true if this is an I/O error
	pub fn is_io_error(&self) -> bool {
		matches!(self, Self::Io(_))
	}

	/// Returns true if this is a format mismatch
	pub fn is_format_mismatch(&self) -> bool {
		matches!(self, Self::FormatMismatch { .. })
	}

	/// Returns true if this is a declared-size mismatch
	pub fn is_length_mismatch(&self) -> bool {
		matches!(self, Self::LengthMismatch { .. })
	}

	/// Returns true if this is a truncated-read error
	pub fn is_truncated(&self) -> bool {
		matches!(self, Self::Truncated { .. })
	}

	/// Returns true if this is an out-of-range index error
	pub fn is_index_out_of_range(&self) -> bool {
		matches!(self, Self::IndexOutOfRange { .. })
	}
}
