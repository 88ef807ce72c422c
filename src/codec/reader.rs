use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::foundation::core::RECORD_HEADER_LEN;
use crate::foundation::error::{ScError, ScResult};

/// `[type:u8][length:i32]` header shared by top-level records and shape chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RecordHeader {
    /// Absolute offset of the type byte.
    pub(crate) offset: u64,
    pub(crate) kind: u8,
    pub(crate) length: u64,
}

impl RecordHeader {
    pub(crate) fn payload_start(&self) -> u64 {
        self.offset + RECORD_HEADER_LEN
    }

    pub(crate) fn end(&self) -> u64 {
        self.payload_start() + self.length
    }
}

/// Little-endian reader over an in-memory byte stream.
///
/// Every read past the end of the buffer is reported as [`ScError::MalformedContainer`]; the
/// format has no recoverable truncation.
pub(crate) struct RecordReader<'a> {
    cursor: Cursor<&'a [u8]>,
    base: u64,
}

impl<'a> RecordReader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self::with_base(bytes, 0)
    }

    /// Reader whose positions are reported relative to `base`, the absolute file offset of
    /// `bytes[0]`.
    pub(crate) fn with_base(bytes: &'a [u8], base: u64) -> Self {
        Self {
            cursor: Cursor::new(bytes),
            base,
        }
    }

    pub(crate) fn position(&self) -> u64 {
        self.base + self.cursor.position()
    }

    pub(crate) fn end(&self) -> u64 {
        self.base + self.cursor.get_ref().len() as u64
    }

    pub(crate) fn remaining(&self) -> u64 {
        self.end().saturating_sub(self.position())
    }

    pub(crate) fn seek_to(&mut self, at: u64) -> ScResult<()> {
        if at < self.base || at > self.end() {
            return Err(ScError::malformed(format!(
                "seek to offset {at} outside stream [{}, {}]",
                self.base,
                self.end()
            )));
        }
        self.cursor.set_position(at - self.base);
        Ok(())
    }

    pub(crate) fn skip(&mut self, n: u64) -> ScResult<()> {
        if n > self.remaining() {
            return Err(self.truncated("skipped bytes", n));
        }
        self.cursor.set_position(self.cursor.position() + n);
        Ok(())
    }

    pub(crate) fn u8(&mut self, what: &str) -> ScResult<u8> {
        self.read(what, 1, |c| c.read_u8())
    }

    pub(crate) fn u16(&mut self, what: &str) -> ScResult<u16> {
        self.read(what, 2, |c| c.read_u16::<LittleEndian>())
    }

    pub(crate) fn i16(&mut self, what: &str) -> ScResult<i16> {
        self.read(what, 2, |c| c.read_i16::<LittleEndian>())
    }

    pub(crate) fn u32(&mut self, what: &str) -> ScResult<u32> {
        self.read(what, 4, |c| c.read_u32::<LittleEndian>())
    }

    pub(crate) fn i32(&mut self, what: &str) -> ScResult<i32> {
        self.read(what, 4, |c| c.read_i32::<LittleEndian>())
    }

    pub(crate) fn bytes(&mut self, n: usize, what: &str) -> ScResult<&'a [u8]> {
        let buf: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let Some(end) = start.checked_add(n).filter(|&end| end <= buf.len()) else {
            return Err(self.truncated(what, n as u64));
        };
        self.cursor.set_position(end as u64);
        Ok(&buf[start..end])
    }

    /// One length byte followed by that many bytes. A length of 255 carries no bytes.
    pub(crate) fn short_bytes(&mut self, what: &str) -> ScResult<Option<&'a [u8]>> {
        let len = self.u8(what)?;
        if len == u8::MAX {
            return Ok(None);
        }
        self.bytes(usize::from(len), what).map(Some)
    }

    /// [`Self::short_bytes`] decoded as UTF-8. Invalid sequences are replaced and logged; the
    /// raw bytes stay untouched in the stream.
    pub(crate) fn short_string(&mut self, what: &str) -> ScResult<Option<String>> {
        let at = self.position();
        Ok(self.short_bytes(what)?.map(|bytes| {
            let text = String::from_utf8_lossy(bytes);
            if let std::borrow::Cow::Owned(_) = text {
                tracing::warn!(offset = at, what, "name is not valid UTF-8; decoded lossily");
            }
            text.into_owned()
        }))
    }

    pub(crate) fn record_header(&mut self) -> ScResult<RecordHeader> {
        let offset = self.position();
        let kind = self.u8("record type")?;
        let length = self.i32("record length")?;
        let length = u64::try_from(length).map_err(|_| {
            ScError::malformed(format!(
                "record type {kind} at offset {offset} declares negative length {length}"
            ))
        })?;
        Ok(RecordHeader {
            offset,
            kind,
            length,
        })
    }

    /// Fail when the payload declared by `header` runs past the end of the stream.
    pub(crate) fn ensure_payload(&self, header: &RecordHeader) -> ScResult<()> {
        if header.end() > self.end() {
            return Err(ScError::malformed(format!(
                "record type {} at offset {} declares {} bytes but only {} remain",
                header.kind,
                header.offset,
                header.length,
                self.end().saturating_sub(header.payload_start())
            )));
        }
        Ok(())
    }

    fn read<T>(
        &mut self,
        what: &str,
        width: u64,
        f: impl FnOnce(&mut Cursor<&'a [u8]>) -> std::io::Result<T>,
    ) -> ScResult<T> {
        if width > self.remaining() {
            return Err(self.truncated(what, width));
        }
        f(&mut self.cursor).map_err(|_| self.truncated(what, width))
    }

    fn truncated(&self, what: &str, wanted: u64) -> ScError {
        ScError::malformed(format!(
            "truncated stream reading {what} at offset {}: need {wanted} bytes, {} remain",
            self.position(),
            self.remaining()
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/reader.rs"]
mod tests;
