//! Bounds-checked reader over one inbound payload.
//!
//! Every field of a request is taken through [`Cursor::consume`], and every
//! request ends with [`Cursor::finish`]. Reading past the declared length
//! or leaving bytes behind means the peer and this process disagree on the
//! message layout; both are reported as [`ProtocolError`]s.

use std::ffi::CStr;

use crate::error::ProtocolError;

/// Read position over a frame payload.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
}

impl<'a> Cursor<'a> {
    /// Start at the beginning of `payload`.
    pub fn new(payload: &'a [u8]) -> Self {
        Self { data: payload }
    }

    /// Bytes not consumed yet.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Take the next `n` bytes.
    ///
    /// A zero-length consume always succeeds and does not move the cursor.
    pub fn consume(&mut self, n: usize) -> Result<&'a [u8], ProtocolError> {
        if n > self.data.len() {
            return Err(ProtocolError::LengthExceeded {
                wanted: n,
                remaining: self.data.len(),
            });
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    /// Take a host-order `u32`.
    pub fn read_u32(&mut self) -> Result<u32, ProtocolError> {
        let bytes = self.consume(4)?;
        Ok(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Take a host-order `i32`.
    pub fn read_i32(&mut self) -> Result<i32, ProtocolError> {
        let bytes = self.consume(4)?;
        Ok(i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Take the rest of the payload as a NUL-terminated key.
    ///
    /// The remaining bytes must be non-empty and end with NUL. The key handed
    /// back stops at the first NUL; anything after it is consumed too.
    pub fn key(&mut self) -> Result<&'a CStr, ProtocolError> {
        match self.data.last() {
            None => return Err(ProtocolError::MissingKey),
            Some(&last) if last != 0 => return Err(ProtocolError::UnterminatedKey),
            Some(_) => {}
        }
        let rest = self.consume(self.data.len())?;
        CStr::from_bytes_until_nul(rest).map_err(|_| ProtocolError::UnterminatedKey)
    }

    /// Assert the whole payload was consumed.
    pub fn finish(&self) -> Result<(), ProtocolError> {
        if !self.data.is_empty() {
            return Err(ProtocolError::TrailingBytes(self.data.len()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_advances() {
        let mut cursor = Cursor::new(b"abcdef");
        assert_eq!(cursor.consume(2).unwrap(), b"ab");
        assert_eq!(cursor.remaining(), 4);
        assert_eq!(cursor.consume(4).unwrap(), b"cdef");
        assert!(cursor.finish().is_ok());
    }

    #[test]
    fn test_consume_past_end_fails() {
        let mut cursor = Cursor::new(b"abc");
        let err = cursor.consume(4).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::LengthExceeded {
                wanted: 4,
                remaining: 3
            }
        );
        // Nothing was consumed by the failed call.
        assert_eq!(cursor.remaining(), 3);
    }

    #[test]
    fn test_zero_length_consume_is_noop() {
        let mut cursor = Cursor::new(b"");
        assert_eq!(cursor.consume(0).unwrap(), b"");
        assert!(cursor.finish().is_ok());
    }

    #[test]
    fn test_finish_with_trailing_bytes() {
        let mut cursor = Cursor::new(b"\x01\0\0\0xy");
        cursor.read_u32().unwrap();
        assert_eq!(cursor.finish(), Err(ProtocolError::TrailingBytes(2)));
    }

    #[test]
    fn test_read_integers_host_order() {
        let mut payload = (-1i32).to_ne_bytes().to_vec();
        payload.extend_from_slice(&7u32.to_ne_bytes());
        let mut cursor = Cursor::new(&payload);

        assert_eq!(cursor.read_i32().unwrap(), -1);
        assert_eq!(cursor.read_u32().unwrap(), 7);
        assert!(cursor.finish().is_ok());
    }

    #[test]
    fn test_short_integer() {
        let mut cursor = Cursor::new(b"\x01\0");
        assert!(matches!(
            cursor.read_u32(),
            Err(ProtocolError::LengthExceeded { wanted: 4, .. })
        ));
    }

    #[test]
    fn test_key_terminated() {
        let mut cursor = Cursor::new(b"user@example.org\0");
        let key = cursor.key().unwrap();
        assert_eq!(key.to_bytes(), b"user@example.org");
        assert!(cursor.finish().is_ok());
    }

    #[test]
    fn test_key_missing() {
        let mut cursor = Cursor::new(b"");
        assert_eq!(cursor.key(), Err(ProtocolError::MissingKey));
    }

    #[test]
    fn test_key_unterminated() {
        let mut cursor = Cursor::new(b"abc");
        assert_eq!(cursor.key(), Err(ProtocolError::UnterminatedKey));
        assert_eq!(cursor.remaining(), 3);
    }

    #[test]
    fn test_key_stops_at_first_nul_and_consumes_rest() {
        let mut cursor = Cursor::new(b"a\0b\0");
        assert_eq!(cursor.key().unwrap().to_bytes(), b"a");
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn test_empty_key_string_is_allowed() {
        let mut cursor = Cursor::new(b"\0");
        assert_eq!(cursor.key().unwrap().to_bytes(), b"");
    }
}
