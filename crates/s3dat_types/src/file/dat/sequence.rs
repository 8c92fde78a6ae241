//! Frame sequences and sequence headers.
//!
//! A sequence groups the frames of one animation within a category. On disk
//! a sequence header is the 7-byte start marker, a `u8` frame count, and one
//! `u32` offset per frame; frame offsets are stored relative to the sequence
//! header and are rebased to absolute positions here.
//!
//! [`Sequence`] itself is an immutable, cheaply clonable frame list. Clones
//! share one allocation, which is how the catalog hands out the same loaded
//! sequence to every caller.

use std::sync::Arc;

use super::constants;
use super::cursor::ByteCursor;
use crate::file::DatError;

/// Immutable shared list of frames.
#[derive(Debug)]
pub struct Sequence<T> {
	frames: Arc<[T]>,
}

impl<T> Sequence<T> {
	/// Creates a sequence from a frame list.
	pub fn new(frames: Vec<T>) -> Self {
		Self {
			frames: frames.into(),
		}
	}

	/// Creates a sequence with no frames.
	pub fn empty() -> Self {
		Self {
			frames: Arc::new([]),
		}
	}

	/// Number of frames.
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns true if the sequence has no frames.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Returns the frame at `index`, or `None` when out of range.
	pub fn get(&self, index: usize) -> Option<&T> {
		self.frames.get(index)
	}

	/// Iterates over the frames.
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.frames.iter()
	}

	/// Returns true if both sequences share the same underlying allocation.
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.frames, &b.frames)
	}
}

impl<T> Clone for Sequence<T> {
	fn clone(&self) -> Self {
		Self {
			frames: Arc::clone(&self.frames),
		}
	}
}

impl<T> Default for Sequence<T> {
	fn default() -> Self {
		Self::empty()
	}
}

impl<T> From<Vec<T>> for Sequence<T> {
	fn from(frames: Vec<T>) -> Self {
		Self::new(frames)
	}
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Reads the sequence header at `position` and returns absolute frame offsets.
///
/// The returned vector may be empty; a frame count of zero is legal.
///
/// # Errors
///
/// Returns [`DatError::FormatMismatch`] when the start marker is missing, or
/// a read error when the header is truncated.
pub(crate) fn read_frame_offsets(
	cursor: &mut ByteCursor,
	position: u64,
) -> Result<Vec<u64>, DatError> {
	cursor.seek(position)?;
	cursor.expect(&constants::SEQUENCE_START)?;

	let frame_count = cursor.read_u8()?;
	let mut offsets = Vec::with_capacity(usize::from(frame_count));
	for _ in 0..frame_count {
		offsets.push(u64::from(cursor.read_u32()?) + position);
	}
	Ok(offsets)
}
