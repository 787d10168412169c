use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

use crate::{ClassFileError, Result};

type Endian = BigEndian;

/// Sequential big-endian reader over a byte stream.
///
/// Every read goes through one scratch buffer owned by the cursor. The buffer
/// grows to the largest read requested so far and is never handed out except
/// as a borrowed slice of exactly the requested length.
pub struct ByteCursor<R> {
    r: R,
    scratch: Vec<u8>,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(r: R) -> Self {
        Self {
            r,
            scratch: Vec::new(),
        }
    }

    /// Reads exactly `n` bytes into the scratch buffer and borrows them.
    pub fn fill(&mut self, n: usize) -> Result<&[u8]> {
        if n <= self.scratch.len() {
            self.r.read_exact(&mut self.scratch[..n])?;
        } else {
            // Grow through `take` so an oversized length in a corrupt file
            // cannot reserve more memory than the input actually holds.
            self.scratch.clear();
            let read = (&mut self.r)
                .take(n as u64)
                .read_to_end(&mut self.scratch)?;
            if read < n {
                return Err(ClassFileError::TruncatedInput);
            }
        }

        Ok(&self.scratch[..n])
    }

    /// Reads exactly `n` bytes and copies them out.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.fill(n)?.to_vec())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.fill(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(Endian::read_u16(self.fill(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(Endian::read_u32(self.fill(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(Endian::read_i32(self.fill(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(Endian::read_i64(self.fill(8)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(Endian::read_u64(self.fill(8)?))
    }

    #[cfg(test)]
    fn scratch_len(&self) -> usize {
        self.scratch.len()
    }
}
