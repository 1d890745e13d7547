//! Random-access byte sources
//!
//! Font containers are read through a seekable stream so the codec can
//! binary-search the index and skip glyph data without loading the file.

/// Errors from byte source operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// Fewer bytes remained than were requested
    UnexpectedEof,
    /// Seek target lies outside the source
    OutOfBounds,
    /// The underlying storage failed
    Io,
}

impl core::fmt::Display for SourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SourceError::UnexpectedEof => f.write_str("unexpected end of source"),
            SourceError::OutOfBounds => f.write_str("seek out of bounds"),
            SourceError::Io => f.write_str("source I/O failure"),
        }
    }
}

/// Seekable byte stream
pub trait ByteSource {
    /// Fill `buf` completely from the current position
    fn read(&mut self, buf: &mut [u8]) -> Result<(), SourceError>;

    /// Move to an absolute offset
    fn seek(&mut self, offset: u32) -> Result<(), SourceError>;

    /// Current absolute offset
    fn tell(&self) -> u32;

    /// Read a big-endian `u32`
    fn read_u32_be(&mut self) -> Result<u32, SourceError> {
        let mut buf = [0u8; 4];
        self.read(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Advance the position by `count` bytes
    fn skip(&mut self, count: u32) -> Result<(), SourceError> {
        let target = self
            .tell()
            .checked_add(count)
            .ok_or(SourceError::OutOfBounds)?;
        self.seek(target)
    }
}

/// In-memory source over a byte slice (flash-mapped blobs, tests)
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    /// Create a source positioned at offset 0
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Total length of the underlying data
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying data is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<(), SourceError> {
        let end = self
            .pos
            .checked_add(buf.len())
            .ok_or(SourceError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(SourceError::UnexpectedEof)?;
        buf.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }

    fn seek(&mut self, offset: u32) -> Result<(), SourceError> {
        let offset = offset as usize;
        if offset > self.data.len() {
            return Err(SourceError::OutOfBounds);
        }
        self.pos = offset;
        Ok(())
    }

    fn tell(&self) -> u32 {
        self.pos as u32
    }
}

/// Source over any `std::io` reader that can seek (font files on a host)
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    pos: u32,
}

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> IoSource<R> {
    /// Wrap a reader, rewinding it to offset 0
    pub fn new(mut inner: R) -> Result<Self, SourceError> {
        inner
            .seek(std::io::SeekFrom::Start(0))
            .map_err(|_| SourceError::Io)?;
        Ok(Self { inner, pos: 0 })
    }

    /// Return the wrapped reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read + std::io::Seek> ByteSource for IoSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<(), SourceError> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => SourceError::UnexpectedEof,
            _ => SourceError::Io,
        })?;
        self.pos = self.pos.saturating_add(buf.len() as u32);
        Ok(())
    }

    fn seek(&mut self, offset: u32) -> Result<(), SourceError> {
        self.inner
            .seek(std::io::SeekFrom::Start(u64::from(offset)))
            .map_err(|_| SourceError::Io)?;
        self.pos = offset;
        Ok(())
    }

    fn tell(&self) -> u32 {
        self.pos
    }
}
