//! Bounded output buffer for value-returning handlers.
//!
//! LOOKUP and FETCH handlers write their answer into a [`ValueBuf`]. The
//! buffer has a fixed capacity that counts the NUL terminator added on the
//! wire, so at most `capacity - 1` bytes fit. Values are raw bytes: any
//! byte except NUL is allowed, UTF-8 or not.
//!
//! # Example
//!
//! ```
//! use std::fmt::Write;
//! use table_api::handler::ValueBuf;
//!
//! let mut value = ValueBuf::with_capacity(16);
//! write!(value, "{}:{}", "user", 1000).unwrap();
//! assert_eq!(value.as_bytes(), b"user:1000");
//!
//! value.set_bytes(b"caf\xe9").unwrap();
//! assert_eq!(value.to_str(), None);
//!
//! assert!(value.set("this does not fit in sixteen").is_err());
//! ```

use std::fmt;

use crate::error::ValueError;

/// Default value capacity, NUL terminator included.
pub const DEFAULT_VALUE_CAPACITY: usize = 4096;

/// Fixed-capacity byte buffer.
#[derive(Debug, Clone)]
pub struct ValueBuf {
    value: Vec<u8>,
    capacity: usize,
}

impl ValueBuf {
    /// Create an empty buffer holding at most `capacity - 1` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            value: Vec::new(),
            capacity,
        }
    }

    /// Capacity in bytes, NUL terminator included.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current length in bytes, without terminator.
    #[inline]
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The value written so far.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// The value as text, or `None` if it is not valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    /// Drop the current contents.
    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Replace the contents with `s`.
    ///
    /// On error the previous contents are kept.
    pub fn set(&mut self, s: &str) -> Result<(), ValueError> {
        self.set_bytes(s.as_bytes())
    }

    /// Replace the contents with raw bytes.
    ///
    /// On error the previous contents are kept.
    pub fn set_bytes(&mut self, data: &[u8]) -> Result<(), ValueError> {
        self.check(data.len(), data)?;
        self.value.clear();
        self.value.extend_from_slice(data);
        Ok(())
    }

    /// Append `s` to the current contents.
    pub fn push_str(&mut self, s: &str) -> Result<(), ValueError> {
        self.push_bytes(s.as_bytes())
    }

    /// Append raw bytes to the current contents.
    pub fn push_bytes(&mut self, data: &[u8]) -> Result<(), ValueError> {
        self.check(self.value.len() + data.len(), data)?;
        self.value.extend_from_slice(data);
        Ok(())
    }

    fn check(&self, new_len: usize, data: &[u8]) -> Result<(), ValueError> {
        if data.contains(&0) {
            return Err(ValueError::EmbeddedNul);
        }
        if new_len >= self.capacity {
            return Err(ValueError::TooLong {
                len: new_len,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

impl Default for ValueBuf {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_VALUE_CAPACITY)
    }
}

impl fmt::Write for ValueBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }
}
