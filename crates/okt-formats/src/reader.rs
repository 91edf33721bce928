//! Bounds-checked cursor over a byte slice.
//!
//! All multi-byte reads are big-endian (the format is an Amiga native).
//! Every accessor verifies its range against the buffer before touching it
//! and reports a shortfall as [`FormatError::UnexpectedEof`]; nothing here
//! panics on hostile input.

use crate::FormatError;

pub(crate) struct OktReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> OktReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current absolute position in the buffer.
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Advance the cursor by `n` bytes.
    pub(crate) fn skip(&mut self, n: usize) -> Result<(), FormatError> {
        if n > self.remaining() {
            return Err(FormatError::UnexpectedEof);
        }
        self.pos += n;
        Ok(())
    }

    /// Read `n` bytes and advance.
    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if n > self.remaining() {
            return Err(FormatError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Look at the 4-byte chunk tag at the cursor without advancing.
    /// `None` if fewer than 4 bytes remain.
    pub(crate) fn peek_tag(&self) -> Option<[u8; 4]> {
        let slice = self.data.get(self.pos..self.pos + 4)?;
        Some([slice[0], slice[1], slice[2], slice[3]])
    }

    /// Byte at cursor-relative `offset`, without advancing.
    pub(crate) fn byte_at(&self, offset: usize) -> Result<u8, FormatError> {
        self.data
            .get(self.pos + offset)
            .copied()
            .ok_or(FormatError::UnexpectedEof)
    }

    /// `count` bytes starting at cursor-relative `offset`, without advancing.
    pub(crate) fn bytes_at(&self, offset: usize, count: usize) -> Result<&'a [u8], FormatError> {
        let start = self
            .pos
            .checked_add(offset)
            .ok_or(FormatError::UnexpectedEof)?;
        let end = start.checked_add(count).ok_or(FormatError::UnexpectedEof)?;
        self.data.get(start..end).ok_or(FormatError::UnexpectedEof)
    }

    /// Big-endian u32 at cursor-relative `offset`, without advancing.
    pub(crate) fn u32_be_at(&self, offset: usize) -> Result<u32, FormatError> {
        let b = self.bytes_at(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_bytes_advances_and_bounds_checks() {
        let mut r = OktReader::new(&[1, 2, 3, 4, 5]);
        assert_eq!(r.read_bytes(3).unwrap(), &[1, 2, 3]);
        assert_eq!(r.pos(), 3);
        assert_eq!(r.remaining(), 2);
        assert_eq!(r.read_bytes(3), Err(FormatError::UnexpectedEof));
        // Failed read leaves the cursor in place
        assert_eq!(r.pos(), 3);
    }

    #[test]
    fn skip_rejects_overrun() {
        let mut r = OktReader::new(&[0; 8]);
        assert!(r.skip(8).is_ok());
        assert_eq!(r.skip(1), Err(FormatError::UnexpectedEof));
    }

    #[test]
    fn peek_tag_needs_four_bytes() {
        let mut r = OktReader::new(b"PBODx");
        assert_eq!(r.peek_tag(), Some(*b"PBOD"));
        r.skip(2).unwrap();
        assert_eq!(r.peek_tag(), None);
    }

    #[test]
    fn relative_reads_do_not_advance() {
        let r = OktReader::new(&[0xDE, 0xAD, 0xBE, 0xEF, 0x07]);
        assert_eq!(r.u32_be_at(0).unwrap(), 0xDEADBEEF);
        assert_eq!(r.byte_at(4).unwrap(), 0x07);
        assert_eq!(r.byte_at(5), Err(FormatError::UnexpectedEof));
        assert_eq!(r.u32_be_at(2), Err(FormatError::UnexpectedEof));
        assert_eq!(r.pos(), 0);
    }

    #[test]
    fn bytes_at_overflow_is_eof() {
        let r = OktReader::new(&[0; 16]);
        assert_eq!(r.bytes_at(usize::MAX, 2), Err(FormatError::UnexpectedEof));
        assert_eq!(r.bytes_at(2, usize::MAX), Err(FormatError::UnexpectedEof));
    }
}
