//! Random-access byte reader for DAT containers.
//!
//! [`ByteCursor`] wraps a seekable byte source and provides the little-endian
//! integer reads and literal checks the container layout is described in.
//! A file-backed cursor only reads the ranges it is asked for, so opening a
//! large container never pulls the whole file into memory.
//!
//! # Examples
//!
//! ```
//! use s3dat_types::file::dat::ByteCursor;
//!
//! let mut cursor = ByteCursor::from_bytes(vec![0x02, 0x14, 0x2A, 0x00]);
//! cursor.expect(&[0x02, 0x14])?;
//! assert_eq!(cursor.read_u16()?, 42);
//! assert_eq!(cursor.position(), 4);
//! # Ok::<(), s3dat_types::file::DatError>(())
//! ```

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::file::DatError;

/// Byte source a [`ByteCursor`] can read from.
pub trait ByteSource: Read + Seek + Send {}

impl<T: Read + Seek + Send> ByteSource for T {}

/// Seekable little-endian reader over a file or an in-memory buffer.
///
/// The cursor tracks its absolute position so failed reads can report where
/// in the file they happened. Callers must not rely on the position across
/// unrelated operations; every parser seeks before it reads.
pub struct ByteCursor {
	reader: BufReader<Box<dyn ByteSource>>,
	position: u64,
	length: u64,
}

impl ByteCursor {
	/// Opens a file-backed cursor.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be opened or its length queried.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, DatError> {
		let file = File::open(path)?;
		let length = file.metadata()?.len();
		let source: Box<dyn ByteSource> = Box::new(file);
		Ok(Self {
			reader: BufReader::new(source),
			position: 0,
			length,
		})
	}

	/// Creates a cursor over an in-memory buffer.
	pub fn from_bytes(data: Vec<u8>) -> Self {
		let length = data.len() as u64;
		let source: Box<dyn ByteSource> = Box::new(Cursor::new(data));
		Self {
			reader: BufReader::new(source),
			position: 0,
			length,
		}
	}

	/// Total length of the underlying source in bytes.
	pub fn len(&self) -> u64 {
		self.length
	}

	/// Returns true if the underlying source is empty.
	pub fn is_empty(&self) -> bool {
		self.length == 0
	}

	/// Current absolute position.
	pub fn position(&self) -> u64 {
		self.position
	}

	/// Moves the cursor to an absolute offset.
	///
	/// Seeking beyond the end is not an error; the next read fails with
	/// [`DatError::Truncated`] instead.
	pub fn seek(&mut self, offset: u64) -> Result<(), DatError> {
		self.reader.seek(SeekFrom::Start(offset))?;
		self.position = offset;
		Ok(())
	}

	/// Reads one byte.
	pub fn read_u8(&mut self) -> Result<u8, DatError> {
		let value = self.reader.read_u8().map_err(|e| self.read_error(e))?;
		self.position += 1;
		Ok(value)
	}

	/// Reads an unsigned 16-bit little-endian integer.
	pub fn read_u16(&mut self) -> Result<u16, DatError> {
		let value = self.reader.read_u16::<LittleEndian>().map_err(|e| self.read_error(e))?;
		self.position += 2;
		Ok(value)
	}

	/// Reads a signed 16-bit little-endian integer.
	pub fn read_i16(&mut self) -> Result<i16, DatError> {
		let value = self.reader.read_i16::<LittleEndian>().map_err(|e| self.read_error(e))?;
		self.position += 2;
		Ok(value)
	}

	/// Reads an unsigned 32-bit little-endian integer.
	pub fn read_u32(&mut self) -> Result<u32, DatError> {
		let value = self.reader.read_u32::<LittleEndian>().map_err(|e| self.read_error(e))?;
		self.position += 4;
		Ok(value)
	}

	/// Reads `buf.len()` bytes into `buf`.
	pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DatError> {
		self.reader.read_exact(buf).map_err(|e| self.read_error(e))?;
		self.position += buf.len() as u64;
		Ok(())
	}

	/// Asserts that the next bytes equal `expected`.
	///
	/// # Errors
	///
	/// Returns [`DatError::FormatMismatch`] carrying the offset of the check
	/// and both byte runs when they differ.
	pub fn expect(&mut self, expected: &[u8]) -> Result<(), DatError> {
		let start = self.position;
		let mut actual = vec![0u8; expected.len()];
		self.read_exact(&mut actual)?;
		if actual != expected {
			return Err(DatError::unexpected_bytes(start, expected, &actual));
		}
		Ok(())
	}

	fn read_error(&self, err: io::Error) -> DatError {
		if err.kind() == io::ErrorKind::UnexpectedEof {
			DatError::Truncated {
				offset: self.position,
			}
		} else {
			DatError::Io(err)
		}
	}
}

impl std::fmt::Debug for ByteCursor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ByteCursor")
			.field("position", &self.position)
			.field("length", &self.length)
			.finish()
	}
}
