use crate::codec::reader::{RecordHeader, RecordReader};
use crate::codec::record::{
    CLIP_TAG_END, CLIP_TAG_FRAME, CLIP_TAG_LABEL, CLIP_WITH_ENTRY_BYTES, CLIP_WITHOUT_TRANSFORMS,
};
use crate::entity::shape::Shape;
use crate::foundation::core::Offset;
use crate::foundation::error::{ScError, ScResult};

/// One entry of a clip's display list.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ClipEntry {
    /// Id as stored in the record. May name a shape, another clip or a text field.
    pub id: i16,
    /// Index of the shape with that id, when one was loaded before the clip.
    pub shape: Option<usize>,
}

/// A labelled frame from the clip's tag stream.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FrameLabel {
    /// Frame index the label marks.
    pub frame: i16,
    /// Label text, `None` when the length byte is 255.
    pub label: Option<String>,
}

/// An animation clip. Only its id and the display-list ids are modeled; frame data is carried
/// through untouched on save.
#[derive(Clone, Debug)]
pub struct MovieClip {
    pub(crate) id: i16,
    pub(crate) record_type: u8,
    pub(crate) frame_count: i16,
    pub(crate) transform_count: usize,
    pub(crate) entries: Vec<ClipEntry>,
    pub(crate) frame_labels: Vec<FrameLabel>,
    pub(crate) offset: Offset,
}

impl MovieClip {
    /// Clip id targeted by exports.
    pub fn id(&self) -> i16 {
        self.id
    }

    /// Record sub-format (3, 10, 12 or 14).
    pub fn record_type(&self) -> u8 {
        self.record_type
    }

    /// Declared frame count.
    pub fn frame_count(&self) -> i16 {
        self.frame_count
    }

    /// Number of 3-word transform entries. Always 0 for sub-format 14.
    pub fn transform_count(&self) -> usize {
        self.transform_count
    }

    /// Display list in record order.
    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }

    /// Indices of the shapes the clip references, in display-list order.
    pub fn shapes(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().filter_map(|e| e.shape)
    }

    /// Labels found in the tag stream.
    pub fn frame_labels(&self) -> &[FrameLabel] {
        &self.frame_labels
    }

    /// Where the clip record lives.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub(crate) fn parse(
        header: &RecordHeader,
        r: &mut RecordReader<'_>,
        shapes: &[Shape],
    ) -> ScResult<Self> {
        let id = r.i16("movie clip id")?;
        r.skip(1)?;
        let frame_count = r.i16("movie clip frame count")?;

        let mut transform_count = 0;
        if header.kind != CLIP_WITHOUT_TRANSFORMS {
            let n = r.i32("movie clip transform count")?;
            transform_count = usize::try_from(n).map_err(|_| {
                ScError::malformed(format!("movie clip {id} has transform count {n}"))
            })?;
            r.skip(transform_count as u64 * 6)?;
        }

        let n = r.i16("movie clip entry count")?;
        let count = usize::try_from(n)
            .map_err(|_| ScError::malformed(format!("movie clip {id} has entry count {n}")))?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let id = r.i16("movie clip entry id")?;
            let shape = shapes.iter().position(|s| s.id == id);
            entries.push(ClipEntry { id, shape });
        }
        if header.kind == CLIP_WITH_ENTRY_BYTES {
            r.skip(count as u64)?;
        }
        for _ in 0..count {
            r.short_bytes("movie clip entry name")?;
        }

        let mut frame_labels = Vec::new();
        loop {
            let tag = r.u8("movie clip tag")?;
            let _len = r.u32("movie clip tag length")?;
            match tag {
                CLIP_TAG_FRAME => {}
                CLIP_TAG_LABEL => {
                    let frame = r.i16("frame label index")?;
                    let label = r.short_string("frame label")?;
                    frame_labels.push(FrameLabel { frame, label });
                }
                CLIP_TAG_END => break,
                other => {
                    tracing::warn!(clip = id, tag = other, "unknown movie clip tag; stopping");
                    break;
                }
            }
        }
        tracing::debug!(clip = id, entries = entries.len(), "movie clip");

        Ok(Self {
            id,
            record_type: header.kind,
            frame_count,
            transform_count,
            entries,
            frame_labels,
            offset: Offset::Existing(header.offset),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/movie_clip.rs"]
mod tests;
