//! # Binary encoding of `Estimator`
//!
//! Schema version 1. Every encoded estimator starts with a 3-byte header:
//! - byte 0        - `version << 4 | layout` (layout: 1 empty, 2 explicit, 3 sparse, 4 full)
//! - byte 1        - `(regwidth - 1) << 5 | log2m`
//! - byte 2        - `sparse << 6 | expthresh` (`63` auto, `0` disabled, `1..=18` exponent),
//!   bit 7 is reserved and must be zero
//!
//! Payload by layout:
//! - empty         - nothing
//! - explicit      - big-endian 8-byte hashes in strictly ascending order
//! - sparse        - `(log2m + regwidth)`-bit chunks `index << regwidth | rank`, ascending by index,
//!   zero ranks are not allowed
//! - full          - `M` chunks of `regwidth` bits, one per register
//!
//! Bit-packed payloads are written most significant bit first and zero-padded to a whole byte.
//! Decoding rejects non-zero padding bits and padding of a whole byte or more.
//!
//! Decoded content is normalized into the canonical in-memory representation, so a sparse
//! payload for a configuration with sparse disabled decodes into full registers.

use tracing::trace;

use crate::config::{ExplicitThreshold, PrecisionConfig};
use crate::error::DecodeError;
use crate::estimator::Estimator;
use crate::representation::{Layout, Representation};

/// Current schema version
pub const SCHEMA_VERSION: u8 = 1;
/// Number of header bytes
pub const HEADER_LEN: usize = 3;
/// `expthresh` header value for automatic explicit threshold
const EXPTHRESH_AUTO: u8 = 63;
const EXPTHRESH_MASK: u8 = 0x3f;
const SPARSE_BIT: u8 = 0x40;
const RESERVED_BIT: u8 = 0x80;

/// Encode estimator into bytes
pub fn encode(estimator: &Estimator) -> Vec<u8> {
    let config = estimator.config();
    let layout = estimator.layout();
    let mut bytes = Vec::with_capacity(HEADER_LEN + config.full_bytes());
    bytes.extend_from_slice(&encode_header(layout, &config));

    match estimator.representation() {
        Representation::Explicit(explicit) => {
            for h in explicit.items() {
                bytes.extend_from_slice(&h.to_be_bytes());
            }
        }
        Representation::Sparse(sparse) => {
            let width = config.sparse_entry_bits();
            let mut writer = BitWriter::new(bytes);
            for (idx, rank) in sparse.iter() {
                let chunk = (u64::from(idx) << config.regwidth()) | u64::from(rank);
                writer.write(chunk, width);
            }
            bytes = writer.finish();
        }
        Representation::Full(full) => {
            let width = usize::from(config.regwidth());
            let mut writer = BitWriter::new(bytes);
            for rank in full.iter(&config) {
                writer.write(u64::from(rank), width);
            }
            bytes = writer.finish();
        }
    }

    bytes
}

/// Decode estimator from bytes
pub fn decode(bytes: &[u8]) -> Result<Estimator, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    let (layout, config) = decode_header([bytes[0], bytes[1], bytes[2]])?;
    let payload = &bytes[HEADER_LEN..];
    trace!(?layout, %config, payload = payload.len(), "decoding estimator");

    match layout {
        Layout::Empty => {
            if !payload.is_empty() {
                return Err(DecodeError::TrailingBytes(payload.len()));
            }
            Ok(Estimator::empty(config))
        }
        Layout::Explicit => {
            let chunks = payload.chunks_exact(8);
            let remainder = chunks.remainder().len();
            if remainder != 0 {
                return Err(DecodeError::Truncated {
                    expected: bytes.len() + 8 - remainder,
                    actual: bytes.len(),
                });
            }
            let mut estimator = Estimator::empty(config);
            let mut previous = None;
            for chunk in chunks {
                let mut hash = [0u8; 8];
                hash.copy_from_slice(chunk);
                let hash = u64::from_be_bytes(hash);
                // ascending order keeps every insert an append
                if previous.is_some_and(|previous| hash <= previous) {
                    return Err(DecodeError::InvalidPayload(
                        "explicit hashes are not strictly ascending",
                    ));
                }
                previous = Some(hash);
                estimator.insert_hash(hash);
            }
            Ok(estimator)
        }
        Layout::Sparse => {
            let width = config.sparse_entry_bits();
            let value_mask = (1u64 << config.regwidth()) - 1;
            let mut reader = BitReader::new(payload);
            let mut registers = Vec::with_capacity(payload.len() * 8 / width);
            while let Some(chunk) = reader.read(width) {
                let idx = (chunk >> config.regwidth()) as u32;
                let rank = (chunk & value_mask) as u8;
                if rank > 0 {
                    registers.push(check_rank(&config, idx, rank)?);
                } else if chunk != 0 || reader.remaining() + width >= 8 {
                    // an all-zero chunk is only allowed as part of the final byte padding
                    return Err(DecodeError::InvalidPayload("zero register in sparse payload"));
                }
            }
            check_padding(&mut reader)?;
            let repr = Representation::from_registers(&config, registers);
            Ok(Estimator::from_parts(config, repr))
        }
        Layout::Full => {
            let expected = HEADER_LEN + config.full_bytes();
            if bytes.len() < expected {
                return Err(DecodeError::Truncated {
                    expected,
                    actual: bytes.len(),
                });
            }
            if bytes.len() > expected {
                return Err(DecodeError::TrailingBytes(bytes.len() - expected));
            }
            let width = usize::from(config.regwidth());
            let mut reader = BitReader::new(payload);
            let mut registers = Vec::new();
            for idx in 0..config.registers() as u32 {
                // payload length was checked above
                let rank = reader.read(width).unwrap_or(0) as u8;
                if rank > 0 {
                    registers.push(check_rank(&config, idx, rank)?);
                }
            }
            check_padding(&mut reader)?;
            let repr = Representation::from_registers(&config, registers);
            Ok(Estimator::from_parts(config, repr))
        }
    }
}

/// Reject register values a hash could never produce
#[inline]
fn check_rank(config: &PrecisionConfig, idx: u32, rank: u8) -> Result<(u32, u8), DecodeError> {
    if rank > config.max_rank() {
        return Err(DecodeError::RegisterOverflow {
            index: idx,
            value: rank,
            max: config.max_rank(),
        });
    }
    Ok((idx, rank))
}

/// Reject bit-packed payloads padded with anything but fewer than 8 zero bits
fn check_padding(reader: &mut BitReader<'_>) -> Result<(), DecodeError> {
    let remaining = reader.remaining();
    if remaining >= 8 {
        return Err(DecodeError::TrailingBytes(remaining / 8));
    }
    if reader.read(remaining) != Some(0) {
        return Err(DecodeError::InvalidPayload("non-zero padding bits"));
    }
    Ok(())
}

fn encode_header(layout: Layout, config: &PrecisionConfig) -> [u8; HEADER_LEN] {
    let expthresh = match config.explicit() {
        ExplicitThreshold::Auto => EXPTHRESH_AUTO,
        ExplicitThreshold::Disabled => 0,
        ExplicitThreshold::Exponent(k) => k,
    };
    let sparse = if config.sparse() { SPARSE_BIT } else { 0 };
    [
        (SCHEMA_VERSION << 4) | layout as u8,
        ((config.regwidth() - 1) << 5) | config.log2m(),
        sparse | expthresh,
    ]
}

fn decode_header(header: [u8; HEADER_LEN]) -> Result<(Layout, PrecisionConfig), DecodeError> {
    let version = header[0] >> 4;
    if version != SCHEMA_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    let layout = Layout::try_from(header[0] & 0x0f).map_err(DecodeError::UnknownLayout)?;

    if header[2] & RESERVED_BIT != 0 {
        return Err(DecodeError::InvalidHeader("reserved bit is set"));
    }
    let expthresh = match header[2] & EXPTHRESH_MASK {
        EXPTHRESH_AUTO => ExplicitThreshold::Auto,
        0 => ExplicitThreshold::Disabled,
        k => ExplicitThreshold::Exponent(k),
    };

    let config = PrecisionConfig::new(header[1] & 0x1f, (header[1] >> 5) + 1)?
        .with_explicit_threshold(expthresh)?
        .with_sparse(header[2] & SPARSE_BIT != 0);

    Ok((layout, config))
}

/// Appends fixed-width values to a byte vector, most significant bit first
struct BitWriter {
    bytes: Vec<u8>,
    acc: u64,
    len: usize,
}

impl BitWriter {
    fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, acc: 0, len: 0 }
    }

    /// Write lowest `width` bits of `value`, `width` must not exceed 56
    #[inline]
    fn write(&mut self, value: u64, width: usize) {
        self.acc = (self.acc << width) | (value & ((1 << width) - 1));
        self.len += width;
        while self.len >= 8 {
            self.len -= 8;
            self.bytes.push((self.acc >> self.len) as u8);
        }
        self.acc &= (1 << self.len) - 1;
    }

    /// Flush remaining bits padded with zeros
    fn finish(mut self) -> Vec<u8> {
        if self.len > 0 {
            self.bytes.push((self.acc << (8 - self.len)) as u8);
        }
        self.bytes
    }
}

/// Reads fixed-width values from a byte slice, most significant bit first
struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Number of unread bits
    #[inline]
    fn remaining(&self) -> usize {
        self.bytes.len() * 8 - self.pos
    }

    /// Read next `width` bits, or `None` if fewer bits are left
    #[inline]
    fn read(&mut self, width: usize) -> Option<u64> {
        if width > self.remaining() {
            return None;
        }
        let mut value = 0u64;
        for _ in 0..width {
            let bit = (self.bytes[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | u64::from(bit);
            self.pos += 1;
        }
        Some(value)
    }
}
