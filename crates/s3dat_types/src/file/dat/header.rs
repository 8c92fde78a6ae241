//! Container header parsing.
//!
//! The header is a fixed 96-byte preamble: two constant byte runs bracketing
//! the pixel-format magic, the declared file size, the eight category-table
//! offsets, and a constant closing run. Only the declared size and the eight
//! offsets vary between files.

use super::constants;
use super::cursor::ByteCursor;
use super::file_type::DatFileType;
use crate::file::DatError;

/// Validates the fixed preamble and returns the eight category-table offsets.
///
/// The slot position of an offset carries no meaning; each table declares its
/// own category tag and is dispatched by value when the table is read.
///
/// # Errors
///
/// - [`DatError::FormatMismatch`] when any fixed literal differs
/// - [`DatError::LengthMismatch`] when the declared size is not the real length
/// - [`DatError::Truncated`] when the file ends inside the preamble
pub(crate) fn read_category_offsets(
	cursor: &mut ByteCursor,
	file_type: DatFileType,
) -> Result<[u32; constants::SEQUENCE_TYPE_COUNT], DatError> {
	cursor.seek(0)?;
	cursor.expect(&constants::FILE_START1)?;
	cursor.expect(file_type.start_magic())?;
	cursor.expect(&constants::FILE_START2)?;

	let declared = u64::from(cursor.read_u32()?);
	if declared != cursor.len() {
		return Err(DatError::LengthMismatch {
			declared,
			actual: cursor.len(),
		});
	}

	let mut offsets = [0u32; constants::SEQUENCE_TYPE_COUNT];
	for slot in &mut offsets {
		*slot = cursor.read_u32()?;
	}

	cursor.expect(&constants::FILE_HEADER_END)?;
	Ok(offsets)
}
