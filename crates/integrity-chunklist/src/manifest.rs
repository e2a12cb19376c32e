//! Chunklist decoding.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use serde::Serialize;

use integrity_core::FieldReader;

use crate::error::{ChunklistError, ChunklistResult};
use crate::format::{
    ChunkLength, ChunkRecord, SignatureMethod, CHUNKLIST_MAGIC, CHUNK_METHOD_1_0,
    CHUNK_RECORD_LEN, FILE_VERSION_1_0,
};
use crate::limits::DecodeLimits;
use crate::signature::{CertificateSignature, RawKeySignature, Signature};

/// Decoded fixed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunklistHeader {
    pub magic: u32,
    pub header_size: u32,
    pub file_version: u8,
    pub chunk_method: u8,
    pub signature_method: u8,
    pub reserved: u8,
    pub chunk_count: u64,
    pub chunk_table_offset: u64,
    pub signature_offset: u64,
}

/// A fully decoded chunklist.
///
/// Construction either succeeds completely or fails; there is no partially
/// decoded state. The bytes covered by the signature are captured at decode
/// time so verification never needs the manifest stream again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunklist {
    header: ChunklistHeader,
    chunks: Vec<ChunkRecord>,
    signature: Signature,
    signed_region: Vec<u8>,
}

impl Chunklist {
    /// Decode a chunklist from a seekable stream.
    pub fn decode<R: Read + Seek>(reader: R, limits: &DecodeLimits) -> ChunklistResult<Self> {
        let mut reader = FieldReader::new(reader)?;
        Self::decode_fields(&mut reader, limits)
    }

    pub fn from_bytes(bytes: &[u8]) -> ChunklistResult<Self> {
        Self::from_bytes_with_limits(bytes, &DecodeLimits::default())
    }

    pub fn from_bytes_with_limits(bytes: &[u8], limits: &DecodeLimits) -> ChunklistResult<Self> {
        Self::decode_fields(&mut FieldReader::from_slice(bytes), limits)
    }

    pub fn open(path: impl AsRef<Path>) -> ChunklistResult<Self> {
        Self::open_with_limits(path, &DecodeLimits::default())
    }

    pub fn open_with_limits(path: impl AsRef<Path>, limits: &DecodeLimits) -> ChunklistResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::decode(BufReader::new(file), limits)
    }

    fn decode_fields<R: Read + Seek>(
        reader: &mut FieldReader<R>,
        limits: &DecodeLimits,
    ) -> ChunklistResult<Self> {
        let stream_len = reader.stream_len();

        // Each field is checked as soon as it is read, so an unsupported
        // manifest never touches the chunk table or signature.
        let magic = reader.read_u32("magic")?;
        if magic != CHUNKLIST_MAGIC {
            return Err(ChunklistError::BadMagic(magic));
        }
        let header_size = reader.read_u32("header size")?;
        let file_version = reader.read_u8("file version")?;
        if file_version != FILE_VERSION_1_0 {
            return Err(ChunklistError::UnsupportedVersion(file_version));
        }
        let chunk_method = reader.read_u8("chunk method")?;
        if chunk_method != CHUNK_METHOD_1_0 {
            return Err(ChunklistError::UnsupportedChunkMethod(chunk_method));
        }
        let signature_method = reader.read_u8("signature method")?;
        let method = SignatureMethod::from_code(signature_method)
            .ok_or(ChunklistError::UnsupportedSignatureMethod(signature_method))?;
        let reserved = reader.read_u8("reserved")?;
        let chunk_count = reader.read_u64("chunk count")?;
        let chunk_table_offset = reader.read_u64("chunk table offset")?;
        let signature_offset = reader.read_u64("signature offset")?;

        let header = ChunklistHeader {
            magic,
            header_size,
            file_version,
            chunk_method,
            signature_method,
            reserved,
            chunk_count,
            chunk_table_offset,
            signature_offset,
        };
        tracing::debug!(
            chunk_count,
            chunk_table_offset,
            signature_offset,
            signature_method,
            "decoded chunklist header"
        );

        if chunk_count > limits.max_chunk_count {
            return Err(ChunklistError::TooManyChunks {
                count: chunk_count,
                limit: limits.max_chunk_count,
            });
        }
        let table_end = chunk_count
            .checked_mul(CHUNK_RECORD_LEN)
            .and_then(|size| size.checked_add(chunk_table_offset));
        if table_end.map_or(true, |end| end > stream_len) {
            return Err(ChunklistError::ChunkTableOutOfBounds {
                offset: chunk_table_offset,
                count: chunk_count,
                len: stream_len,
            });
        }

        if let Some(size) = method.signature_len() {
            if signature_offset
                .checked_add(size)
                .map_or(true, |end| end > stream_len)
            {
                return Err(ChunklistError::SignatureOutOfBounds {
                    offset: signature_offset,
                    size,
                    len: stream_len,
                });
            }
        }
        if signature_offset > limits.max_signed_region_bytes {
            return Err(ChunklistError::SignedRegionTooLarge {
                size: signature_offset,
                limit: limits.max_signed_region_bytes,
            });
        }

        reader.seek_to("chunk table", chunk_table_offset)?;
        let chunks = read_chunk_table(reader, chunk_count)?;

        reader.seek_to("signature", signature_offset)?;
        let signature = match method {
            SignatureMethod::Rev1 => Signature::RawKey(RawKeySignature::decode(reader)?),
            SignatureMethod::IntegrityData => {
                return Err(ChunklistError::NotImplemented("integrity data signatures"));
            }
            SignatureMethod::Rev2 => {
                // Decode the structure so malformed blocks still fail as
                // structural errors, then refuse the variant.
                let _certificate = CertificateSignature::decode(reader)?;
                return Err(ChunklistError::NotImplemented("certificate signatures"));
            }
        };

        reader.seek_to("signed region", 0)?;
        let signed_region = reader.read_vec("signed region", signature_offset)?;

        Ok(Self {
            header,
            chunks,
            signature,
            signed_region,
        })
    }

    pub fn header(&self) -> &ChunklistHeader {
        &self.header
    }

    pub fn file_version(&self) -> u8 {
        self.header.file_version
    }

    pub fn chunk_method(&self) -> u8 {
        self.header.chunk_method
    }

    pub fn signature_method(&self) -> SignatureMethod {
        self.signature.method()
    }

    pub fn chunk_count(&self) -> u64 {
        self.header.chunk_count
    }

    pub fn chunk_table_offset(&self) -> u64 {
        self.header.chunk_table_offset
    }

    pub fn signature_offset(&self) -> u64 {
        self.header.signature_offset
    }

    pub fn chunks(&self) -> &[ChunkRecord] {
        &self.chunks
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Manifest bytes `[0, signature_offset)`, the input to the signature.
    pub fn signed_region(&self) -> &[u8] {
        &self.signed_region
    }

    /// Sum of the fixed chunk lengths, or `None` when the last chunk runs to
    /// the end of the target.
    pub fn declared_len(&self) -> Option<u64> {
        self.chunks.iter().try_fold(0_u64, |total, chunk| match chunk.length {
            ChunkLength::Fixed(n) => total.checked_add(u64::from(n.get())),
            ChunkLength::Remainder => None,
        })
    }
}

fn read_chunk_table<R: Read + Seek>(
    reader: &mut FieldReader<R>,
    count: u64,
) -> ChunklistResult<Vec<ChunkRecord>> {
    // Bounded by the table-within-stream check above.
    let count = usize::try_from(count).map_err(|_| ChunklistError::TooManyChunks {
        count,
        limit: usize::MAX as u64,
    })?;
    let mut chunks = Vec::with_capacity(count);
    for index in 0..count {
        let length = ChunkLength::from_raw(reader.read_u32("chunk size")?);
        let hash = reader.read_array::<32>("chunk hash")?;
        if length.is_remainder() && index + 1 != count {
            return Err(ChunklistError::RemainderNotLast { index });
        }
        chunks.push(ChunkRecord { length, hash });
    }
    Ok(chunks)
}
