use crate::errors::CoreError;

/// Magic bytes identifying a Coinfolio store file.
pub const MAGIC: &[u8; 4] = b"CFOL";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Header size in bytes:
/// magic(4) + version(2) + kind(1) + payload_len(8) = 15
pub const HEADER_SIZE: usize = 15;

/// What a file's payload contains. The portfolio store and the price
/// cache are separate files; tagging the payload keeps one from being
/// loaded as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Portfolio,
    PriceCache,
}

impl PayloadKind {
    fn to_byte(self) -> u8 {
        match self {
            PayloadKind::Portfolio => 1,
            PayloadKind::PriceCache => 2,
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(PayloadKind::Portfolio),
            2 => Some(PayloadKind::PriceCache),
            _ => None,
        }
    }
}

/// File header read from a store file.
#[derive(Debug)]
pub struct FileHeader {
    pub version: u16,
    pub kind: PayloadKind,
    pub payload_len: u64,
}

/// Write a complete store file to bytes.
///
/// Layout:
/// ```text
/// [CFOL: 4B] [version: 2B LE] [kind: 1B] [payload_len: 8B LE] [payload: variable]
/// ```
pub fn write_file(version: u16, kind: PayloadKind, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.push(kind.to_byte());
    buf.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    buf.extend_from_slice(payload);

    buf
}

/// Parse the header from raw file bytes and validate it against the
/// payload kind the caller expects. Returns the header and the payload
/// slice.
pub fn read_file(data: &[u8], expected: PayloadKind) -> Result<(FileHeader, &[u8]), CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a valid Coinfolio store file".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not a Coinfolio store file".into(),
        ));
    }

    let mut offset = 4;

    let version = u16::from_le_bytes([data[offset], data[offset + 1]]);
    offset += 2;

    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kind = PayloadKind::from_byte(data[offset]).ok_or_else(|| {
        CoreError::InvalidFileFormat(format!("Unknown payload kind: {}", data[offset]))
    })?;
    offset += 1;

    if kind != expected {
        return Err(CoreError::InvalidFileFormat(format!(
            "Payload kind mismatch: expected {expected:?}, found {kind:?}"
        )));
    }

    let payload_len = u64::from_le_bytes(
        data[offset..offset + 8]
            .try_into()
            .map_err(|_| CoreError::InvalidFileFormat("Failed to read payload length".into()))?,
    );
    offset += 8;

    let expected_end = offset + payload_len as usize;
    if data.len() < expected_end {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {} bytes of payload, got {}",
            payload_len,
            data.len() - offset
        )));
    }

    let payload = &data[offset..expected_end];

    Ok((
        FileHeader {
            version,
            kind,
            payload_len,
        },
        payload,
    ))
}
