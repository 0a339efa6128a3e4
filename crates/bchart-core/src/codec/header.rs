use serde::Serialize;

use crate::error::Result;
use crate::io::{ByteBuffer, ByteWriter};

/// Contents of the `BCHF` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub version: u16,
    pub resolution: u16,
    pub instrument_count: u16,
}

impl FileHeader {
    pub fn write(&self, out: &mut ByteWriter) {
        out.write_u16(self.version);
        out.write_u16(self.resolution);
        out.write_u16(self.instrument_count);
    }

    /// Parses a header payload. Bytes past the known fields are ignored.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut buf = ByteBuffer::new(payload);
        Ok(Self {
            version: buf.read_u16()?,
            resolution: buf.read_u16()?,
            instrument_count: buf.read_u16()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = FileHeader {
            version: 1,
            resolution: 480,
            instrument_count: 2,
        };
        let mut out = ByteWriter::new();
        header.write(&mut out);

        let data = out.into_inner();
        assert_eq!(data, vec![1, 0, 0xE0, 0x01, 2, 0]);
        assert_eq!(FileHeader::parse(&data).unwrap(), header);
    }

    #[test]
    fn test_short_header_is_truncated() {
        assert!(FileHeader::parse(&[1, 0, 192]).unwrap_err().is_truncated());
    }
}
