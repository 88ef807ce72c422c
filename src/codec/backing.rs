use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};

use crate::foundation::core::RECORD_HEADER_LEN;
use crate::foundation::error::{ScError, ScResult};

/// Read one complete record (header included) from the backing file at `offset`.
///
/// Clones and the patch writer go through here instead of the live entity graph so that
/// unflushed edits to the source entity never leak into the copy.
pub(crate) fn read_record(path: &Path, offset: u64) -> ScResult<Vec<u8>> {
    let file = File::open(path)?;
    let mut file = BufReader::new(file);
    file.seek(SeekFrom::Start(offset))?;

    let mut record = vec![0u8; RECORD_HEADER_LEN as usize];
    file.read_exact(&mut record)
        .map_err(|e| truncated(e, path, offset))?;
    let length = LittleEndian::read_i32(&record[1..]);
    let length = usize::try_from(length).map_err(|_| {
        ScError::malformed(format!(
            "record at offset {offset} of '{}' declares negative length {length}",
            path.display()
        ))
    })?;

    record.resize(RECORD_HEADER_LEN as usize + length, 0);
    file.read_exact(&mut record[RECORD_HEADER_LEN as usize..])
        .map_err(|e| truncated(e, path, offset))?;
    Ok(record)
}

fn truncated(err: std::io::Error, path: &Path, offset: u64) -> ScError {
    if err.kind() == ErrorKind::UnexpectedEof {
        ScError::malformed(format!(
            "record at offset {offset} runs past the end of '{}'",
            path.display()
        ))
    } else {
        ScError::Io(err)
    }
}
