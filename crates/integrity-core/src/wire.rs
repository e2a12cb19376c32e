//! Little-endian field reading over seekable byte sources.
//!
//! [`FieldReader`] knows the total stream length up front, so every read and
//! seek is bounds-checked before touching the stream. Attacker-controlled
//! lengths and offsets fail with a [`WireError`] naming the field instead of
//! over-reading or allocating.

use std::io::{self, Cursor, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

/// Field-level decode errors.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Not enough bytes left for the field.
    #[error("unexpected end of data reading {field}: need {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        field: &'static str,
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// An absolute offset points past the end of the stream.
    #[error("{field} offset {offset} lies outside the {len}-byte stream")]
    OffsetOutOfBounds {
        field: &'static str,
        offset: u64,
        len: u64,
    },

    #[error("i/o error reading {field}: {source}")]
    Io {
        field: &'static str,
        #[source]
        source: io::Error,
    },
}

pub type WireResult<T> = Result<T, WireError>;

/// Sequential, seekable little-endian reader.
#[derive(Debug)]
pub struct FieldReader<R> {
    inner: R,
    pos: u64,
    len: u64,
}

impl<'a> FieldReader<Cursor<&'a [u8]>> {
    /// Reader over an in-memory buffer.
    pub fn from_slice(data: &'a [u8]) -> Self {
        Self {
            inner: Cursor::new(data),
            pos: 0,
            len: data.len() as u64,
        }
    }
}

impl<R: Read + Seek> FieldReader<R> {
    /// Wrap a stream, measuring its length and rewinding to the start.
    pub fn new(mut inner: R) -> WireResult<Self> {
        let len = inner
            .seek(SeekFrom::End(0))
            .map_err(|source| WireError::Io {
                field: "stream length",
                source,
            })?;
        inner.seek(SeekFrom::Start(0)).map_err(|source| WireError::Io {
            field: "stream start",
            source,
        })?;
        Ok(Self { inner, pos: 0, len })
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total stream length, measured once at construction.
    pub fn stream_len(&self) -> u64 {
        self.len
    }

    pub fn remaining(&self) -> u64 {
        self.len.saturating_sub(self.pos)
    }

    /// Seek to an absolute offset. Seeking exactly to the end is allowed.
    pub fn seek_to(&mut self, field: &'static str, offset: u64) -> WireResult<()> {
        if offset > self.len {
            return Err(WireError::OffsetOutOfBounds {
                field,
                offset,
                len: self.len,
            });
        }
        self.inner
            .seek(SeekFrom::Start(offset))
            .map_err(|source| WireError::Io { field, source })?;
        self.pos = offset;
        Ok(())
    }

    /// Fail unless `needed` bytes remain at the current position.
    pub fn ensure(&self, field: &'static str, needed: u64) -> WireResult<()> {
        if self.remaining() < needed {
            return Err(WireError::Truncated {
                field,
                offset: self.pos,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&mut self, field: &'static str) -> WireResult<u8> {
        self.ensure(field, 1)?;
        let value = self.inner.read_u8().map_err(|e| self.map_io(field, 1, e))?;
        self.pos += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self, field: &'static str) -> WireResult<u16> {
        self.ensure(field, 2)?;
        let value = self
            .inner
            .read_u16::<LittleEndian>()
            .map_err(|e| self.map_io(field, 2, e))?;
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self, field: &'static str) -> WireResult<u32> {
        self.ensure(field, 4)?;
        let value = self
            .inner
            .read_u32::<LittleEndian>()
            .map_err(|e| self.map_io(field, 4, e))?;
        self.pos += 4;
        Ok(value)
    }

    pub fn read_u64(&mut self, field: &'static str) -> WireResult<u64> {
        self.ensure(field, 8)?;
        let value = self
            .inner
            .read_u64::<LittleEndian>()
            .map_err(|e| self.map_io(field, 8, e))?;
        self.pos += 8;
        Ok(value)
    }

    pub fn read_array<const N: usize>(&mut self, field: &'static str) -> WireResult<[u8; N]> {
        self.ensure(field, N as u64)?;
        let mut out = [0_u8; N];
        self.inner
            .read_exact(&mut out)
            .map_err(|e| self.map_io(field, N as u64, e))?;
        self.pos += N as u64;
        Ok(out)
    }

    /// Read `len` bytes. The length is checked against the stream before
    /// anything is allocated.
    pub fn read_vec(&mut self, field: &'static str, len: u64) -> WireResult<Vec<u8>> {
        self.ensure(field, len)?;
        let size = usize::try_from(len).map_err(|_| WireError::Truncated {
            field,
            offset: self.pos,
            needed: len,
            available: self.remaining(),
        })?;
        let mut out = vec![0_u8; size];
        self.inner
            .read_exact(&mut out)
            .map_err(|e| self.map_io(field, len, e))?;
        self.pos += len;
        Ok(out)
    }

    fn map_io(&self, field: &'static str, needed: u64, source: io::Error) -> WireError {
        // The stream shrank underneath us; report it like any other short read.
        if source.kind() == io::ErrorKind::UnexpectedEof {
            WireError::Truncated {
                field,
                offset: self.pos,
                needed,
                available: 0,
            }
        } else {
            WireError::Io { field, source }
        }
    }
}
