/*!
 * Block Random Reader
 * Random access over a source that can only serve byte ranges
 */

use std::io::{self, Read, Seek, SeekFrom};

use super::traits::RandomAccessRead;
use super::types::{VfsError, VfsResult};

/// Byte-range source backing a [`BlockRandomReader`]
pub trait BlockSource: Send {
    /// Fetch up to `len` bytes starting at `offset`
    fn fetch(&mut self, offset: u64, len: usize) -> VfsResult<Vec<u8>>;
}

/// Random access reader with a single buffered window
///
/// A seek discards the window; the next read fetches exactly one window
/// starting at the new position. Contiguous reads are served from the buffer.
pub struct BlockRandomReader<S: BlockSource> {
    source: S,
    length: u64,
    block_size: usize,
    position: u64,
    block: Vec<u8>,
    block_pos: usize,
    closed: bool,
}

impl<S: BlockSource> BlockRandomReader<S> {
    pub fn new(source: S, length: u64, block_size: usize) -> Self {
        Self {
            source,
            length,
            block_size: block_size.max(1),
            position: 0,
            block: Vec::new(),
            block_pos: 0,
            closed: false,
        }
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes currently buffered past the read position
    #[inline]
    pub fn buffered(&self) -> usize {
        self.block.len() - self.block_pos
    }

    fn discard_block(&mut self) {
        self.block.clear();
        self.block_pos = 0;
    }

    fn fill_block(&mut self) -> VfsResult<()> {
        let remaining = self.length - self.position;
        let len = (self.block_size as u64).min(remaining) as usize;
        self.block = self.source.fetch(self.position, len)?;
        self.block.truncate(len);
        self.block_pos = 0;
        Ok(())
    }
}

impl<S: BlockSource> Read for BlockRandomReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::Other, "stream is closed"));
        }
        if buf.is_empty() || self.position >= self.length {
            return Ok(0);
        }
        if self.buffered() == 0 {
            self.fill_block().map_err(io::Error::from)?;
            if self.block.is_empty() {
                return Ok(0);
            }
        }

        let n = buf.len().min(self.buffered());
        buf[..n].copy_from_slice(&self.block[self.block_pos..self.block_pos + n]);
        self.block_pos += n;
        self.position += n as u64;
        Ok(n)
    }
}

impl<S: BlockSource> Seek for BlockRandomReader<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::Other, "stream is closed"));
        }
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.length.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        }
        .ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "seek before start of stream")
        })?;

        self.discard_block();
        self.position = target;
        Ok(target)
    }
}

impl<S: BlockSource> RandomAccessRead for BlockRandomReader<S> {
    fn length(&self) -> u64 {
        self.length
    }

    fn close(&mut self) -> VfsResult<()> {
        self.closed = true;
        self.block = Vec::new();
        self.block_pos = 0;
        Ok(())
    }
}

impl<S: BlockSource> std::fmt::Debug for BlockRandomReader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockRandomReader")
            .field("length", &self.length)
            .field("position", &self.position)
            .field("buffered", &self.buffered())
            .finish()
    }
}

/// In-memory source, mostly useful to exercise readers
impl BlockSource for Vec<u8> {
    fn fetch(&mut self, offset: u64, len: usize) -> VfsResult<Vec<u8>> {
        let start = usize::try_from(offset)
            .map_err(|_| VfsError::InvalidArgument(format!("offset {} too large", offset)))?;
        let start = start.min(self.len());
        let end = start.saturating_add(len).min(self.len());
        Ok(self[start..end].to_vec())
    }
}
