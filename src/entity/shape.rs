use crate::codec::reader::{RecordHeader, RecordReader};
use crate::entity::texture::Texture;
use crate::foundation::core::{Offset, Point};
use crate::foundation::error::{ScError, ScResult};

/// On-disk XY coordinates are integers in twentieths of a unit.
const XY_UNITS: f64 = 20.0;

const NORMALIZED_UV_MAX: f64 = 65535.0;

/// How a chunk stores its texture coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ChunkKind {
    /// Chunk type 17: UVs are raw texture pixel coordinates.
    PlainUv,
    /// Chunk type 22: UVs are fractions of the texture size scaled to `0..=65535`.
    NormalizedUv,
}

impl ChunkKind {
    /// Chunk kind for a chunk type byte.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            17 => Some(Self::PlainUv),
            22 => Some(Self::NormalizedUv),
            _ => None,
        }
    }

    /// Chunk type byte.
    pub fn tag(self) -> u8 {
        match self {
            Self::PlainUv => 17,
            Self::NormalizedUv => 22,
        }
    }
}

/// One textured polygon of a [`Shape`].
///
/// `points_xy` and `points_uv` are parallel: vertex `i` of the destination polygon samples
/// texture coordinate `i`.
#[derive(Clone, Debug)]
pub struct ShapeChunk {
    pub(crate) index: usize,
    pub(crate) shape_id: i16,
    pub(crate) kind: ChunkKind,
    pub(crate) texture_id: u8,
    pub(crate) points_xy: Vec<Point>,
    pub(crate) points_uv: Vec<Point>,
    /// Position of the texture id byte.
    pub(crate) offset: Offset,
}

impl ShapeChunk {
    /// Index of the chunk within its shape.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Id of the owning shape.
    pub fn shape_id(&self) -> i16 {
        self.shape_id
    }

    /// UV storage kind.
    pub fn kind(&self) -> ChunkKind {
        self.kind
    }

    /// Id of the texture the chunk samples.
    pub fn texture_id(&self) -> u8 {
        self.texture_id
    }

    /// Destination polygon in shape space.
    pub fn points_xy(&self) -> &[Point] {
        &self.points_xy
    }

    /// Source polygon in texture pixel space.
    pub fn points_uv(&self) -> &[Point] {
        &self.points_uv
    }

    /// Where the chunk's bytes live.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub(crate) fn parse(
        kind: ChunkKind,
        index: usize,
        shape_id: i16,
        r: &mut RecordReader<'_>,
        textures: &[Texture],
    ) -> ScResult<Self> {
        let offset = Offset::Existing(r.position());
        let texture_id = r.u8("chunk texture id")?;
        let count = usize::from(r.u8("chunk point count")?);

        let mut points_xy = Vec::with_capacity(count);
        for _ in 0..count {
            let x = r.i32("chunk x")?;
            let y = r.i32("chunk y")?;
            points_xy.push(Point::new(f64::from(x) / XY_UNITS, f64::from(y) / XY_UNITS));
        }

        let size = match kind {
            ChunkKind::PlainUv => None,
            ChunkKind::NormalizedUv => {
                let texture = textures.get(usize::from(texture_id)).ok_or_else(|| {
                    ScError::malformed(format!(
                        "shape {shape_id} chunk {index} references texture {texture_id}, \
                         which is not loaded"
                    ))
                })?;
                Some((f64::from(texture.width), f64::from(texture.height)))
            }
        };
        let mut points_uv = Vec::with_capacity(count);
        for _ in 0..count {
            let (u, v) = (f64::from(r.u16("chunk u")?), f64::from(r.u16("chunk v")?));
            points_uv.push(match size {
                None => Point::new(u, v),
                Some((w, h)) => Point::new(u * w / NORMALIZED_UV_MAX, v * h / NORMALIZED_UV_MAX),
            });
        }

        Ok(Self {
            index,
            shape_id,
            kind,
            texture_id,
            points_xy,
            points_uv,
            offset,
        })
    }

    /// Chunk payload: texture id, point count, XY pairs, UV pairs.
    pub(crate) fn encode_payload(&self, textures: &[Texture]) -> ScResult<Vec<u8>> {
        let count = u8::try_from(self.points_xy.len())
            .ok()
            .filter(|_| self.points_xy.len() == self.points_uv.len())
            .ok_or_else(|| {
                ScError::validation(format!(
                    "shape {} chunk {} has {} xy and {} uv points",
                    self.shape_id,
                    self.index,
                    self.points_xy.len(),
                    self.points_uv.len()
                ))
            })?;

        let mut out = Vec::with_capacity(2 + usize::from(count) * 12);
        out.push(self.texture_id);
        out.push(count);
        for p in &self.points_xy {
            out.extend_from_slice(&((p.x * XY_UNITS).round() as i32).to_le_bytes());
            out.extend_from_slice(&((p.y * XY_UNITS).round() as i32).to_le_bytes());
        }

        let size = match self.kind {
            ChunkKind::PlainUv => None,
            ChunkKind::NormalizedUv => {
                let texture = textures
                    .get(usize::from(self.texture_id))
                    .filter(|t| t.width > 0 && t.height > 0)
                    .ok_or_else(|| {
                        ScError::unknown_entity(format!(
                            "texture {} for normalized chunk {} of shape {}",
                            self.texture_id, self.index, self.shape_id
                        ))
                    })?;
                Some((f64::from(texture.width), f64::from(texture.height)))
            }
        };
        for p in &self.points_uv {
            let (u, v) = match size {
                None => (p.x, p.y),
                Some((w, h)) => (p.x * NORMALIZED_UV_MAX / w, p.y * NORMALIZED_UV_MAX / h),
            };
            out.extend_from_slice(&(u.round() as u16).to_le_bytes());
            out.extend_from_slice(&(v.round() as u16).to_le_bytes());
        }
        Ok(out)
    }
}

/// A shape: an ordered list of textured polygons drawn back to front.
#[derive(Clone, Debug)]
pub struct Shape {
    pub(crate) id: i16,
    pub(crate) record_type: u8,
    pub(crate) reserved: [u16; 2],
    pub(crate) chunks: Vec<ShapeChunk>,
    pub(crate) offset: Offset,
}

impl Shape {
    /// Shape id referenced by movie clips.
    pub fn id(&self) -> i16 {
        self.id
    }

    /// Record type byte (2 or 18).
    pub fn record_type(&self) -> u8 {
        self.record_type
    }

    /// Chunks in draw order.
    pub fn chunks(&self) -> &[ShapeChunk] {
        &self.chunks
    }

    /// Where the shape record lives.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Parse the payload of a shape record. `r` must sit right after the record header.
    pub(crate) fn parse(
        header: &RecordHeader,
        r: &mut RecordReader<'_>,
        textures: &[Texture],
    ) -> ScResult<Self> {
        let id = r.i16("shape id")?;
        let reserved = [r.u16("shape reserved word")?, r.u16("shape reserved word")?];

        let mut chunks = Vec::new();
        loop {
            let chunk = r.record_header()?;
            if let Some(kind) = ChunkKind::from_tag(chunk.kind) {
                chunks.push(ShapeChunk::parse(kind, chunks.len(), id, r, textures)?);
                if r.position() < chunk.end() {
                    r.seek_to(chunk.end())?;
                }
                continue;
            }
            if chunk.kind == 0 {
                break;
            }
            tracing::warn!(shape = id, chunk_type = chunk.kind, "unmanaged shape chunk type");
            r.skip(chunk.length)?;
        }
        tracing::debug!(shape = id, chunks = chunks.len(), "shape");

        Ok(Self {
            id,
            record_type: header.kind,
            reserved,
            chunks,
            offset: Offset::Existing(header.offset),
        })
    }

    /// Serialize the whole record from the model, terminator chunk included.
    ///
    /// Returns the record bytes and the position of each chunk's texture id byte relative to
    /// the record start.
    pub(crate) fn encode_record(&self, textures: &[Texture]) -> ScResult<(Vec<u8>, Vec<u64>)> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&self.id.to_le_bytes());
        for word in self.reserved {
            payload.extend_from_slice(&word.to_le_bytes());
        }

        let mut positions = Vec::with_capacity(self.chunks.len());
        for chunk in &self.chunks {
            let body = chunk.encode_payload(textures)?;
            payload.push(chunk.kind.tag());
            payload.extend_from_slice(&record_len(body.len())?.to_le_bytes());
            positions.push(5 + payload.len() as u64);
            payload.extend_from_slice(&body);
        }
        payload.extend_from_slice(&[0; 5]);

        let mut record = Vec::with_capacity(5 + payload.len());
        record.push(self.record_type);
        record.extend_from_slice(&record_len(payload.len())?.to_le_bytes());
        record.extend_from_slice(&payload);
        Ok((record, positions))
    }
}

fn record_len(len: usize) -> ScResult<i32> {
    i32::try_from(len).map_err(|_| ScError::validation(format!("record of {len} bytes is too large")))
}

#[cfg(test)]
#[path = "../../tests/unit/entity/shape.rs"]
mod tests;
