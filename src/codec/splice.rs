use crate::codec::reader::RecordReader;
use crate::foundation::error::ScResult;

/// Rebuilds a record by walking its source bytes, copying fields it does not model and
/// substituting the ones it does.
pub(crate) struct RecordSplicer<'a> {
    src: RecordReader<'a>,
    out: Vec<u8>,
}

impl<'a> RecordSplicer<'a> {
    pub(crate) fn new(record: &'a [u8], base: u64) -> Self {
        Self {
            src: RecordReader::with_base(record, base),
            out: Vec::with_capacity(record.len()),
        }
    }

    /// Bytes emitted so far, i.e. the output position relative to the record start.
    pub(crate) fn written(&self) -> u64 {
        self.out.len() as u64
    }

    pub(crate) fn copy(&mut self, n: u64) -> ScResult<()> {
        let n = usize::try_from(n).unwrap_or(usize::MAX);
        let bytes = self.src.bytes(n, "copied record bytes")?;
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn copy_u8(&mut self) -> ScResult<u8> {
        let v = self.src.u8("copied byte")?;
        self.out.push(v);
        Ok(v)
    }

    pub(crate) fn copy_i16(&mut self) -> ScResult<i16> {
        let v = self.src.i16("copied i16")?;
        self.out.extend_from_slice(&v.to_le_bytes());
        Ok(v)
    }

    pub(crate) fn copy_i32(&mut self) -> ScResult<i32> {
        let v = self.src.i32("copied i32")?;
        self.out.extend_from_slice(&v.to_le_bytes());
        Ok(v)
    }

    /// Drop `n` source bytes and emit `bytes` in their place.
    pub(crate) fn replace(&mut self, n: u64, bytes: &[u8]) -> ScResult<()> {
        self.src.skip(n)?;
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    /// Copy a length byte and, unless it is 255, the bytes it announces.
    pub(crate) fn copy_short_string(&mut self) -> ScResult<()> {
        let len = self.copy_u8()?;
        if len != u8::MAX {
            self.copy(u64::from(len))?;
        }
        Ok(())
    }

    /// Copy whatever is left of the source record.
    pub(crate) fn copy_remaining(&mut self) -> ScResult<()> {
        let rest = self.src.remaining();
        self.copy(rest)
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/splice.rs"]
mod tests;
