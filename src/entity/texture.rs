use crate::codec::reader::{RecordHeader, RecordReader};
use crate::foundation::core::{Offset, Raster};
use crate::foundation::error::{ScError, ScResult};
use crate::pixel::PixelFormat;

/// Bytes of `[tag:u8][width:u16][height:u16]` in front of every pixel payload.
pub(crate) const TEXTURE_METADATA_LEN: usize = 5;

/// One texture record: a decoded raster plus the codec tag it is stored with.
#[derive(Clone, Debug)]
pub struct Texture {
    pub(crate) id: u16,
    pub(crate) record_type: u8,
    pub(crate) format_tag: u8,
    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) image: Option<Raster>,
    pub(crate) offset: Offset,
    /// Record holding the pixels in the split layout's companion file.
    pub(crate) companion: Option<u64>,
}

impl Texture {
    /// Texture id, equal to its index in the container at creation time.
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Record type byte (1, 16 or 19).
    pub fn record_type(&self) -> u8 {
        self.record_type
    }

    /// Raw codec tag as stored on disk.
    pub fn format_tag(&self) -> u8 {
        self.format_tag
    }

    /// Codec for the tag, or `None` for placeholder textures.
    pub fn format(&self) -> Option<PixelFormat> {
        PixelFormat::from_tag(self.format_tag)
    }

    /// Width in pixels.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Decoded pixels. Placeholders with an unsupported codec have none.
    pub fn image(&self) -> Option<&Raster> {
        self.image.as_ref()
    }

    /// Where the texture record lives.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// `true` when the codec tag is unsupported and no pixels were decoded.
    pub fn is_placeholder(&self) -> bool {
        self.image.is_none()
    }

    pub(crate) fn from_raster(
        id: u16,
        record_type: u8,
        format: PixelFormat,
        raster: Raster,
    ) -> ScResult<Self> {
        let (width, height) = raster.dimensions();
        let dim = |v: u32| {
            u16::try_from(v).map_err(|_| {
                ScError::validation(format!("texture dimension {v} does not fit in u16"))
            })
        };
        Ok(Self {
            id,
            record_type,
            format_tag: format.tag(),
            width: dim(width)?,
            height: dim(height)?,
            image: Some(raster),
            offset: Offset::Pending,
            companion: None,
        })
    }

    /// Parse a single-file texture record: metadata followed by the inline pixel payload.
    pub(crate) fn parse(id: u16, header: &RecordHeader, r: &mut RecordReader<'_>) -> ScResult<Self> {
        let mut texture = Self::parse_metadata(id, header, r)?;
        texture.image = texture.decode_pixels(r)?;
        Ok(texture)
    }

    /// Parse a split-layout texture: metadata from the primary stream, pixels from the next
    /// record of the companion stream.
    pub(crate) fn parse_split(
        id: u16,
        header: &RecordHeader,
        r: &mut RecordReader<'_>,
        companion: &mut RecordReader<'_>,
    ) -> ScResult<Self> {
        let mut texture = Self::parse_metadata(id, header, r)?;

        let pixels = companion.record_header()?;
        companion.ensure_payload(&pixels)?;
        let tag = companion.u8("companion texture tag")?;
        let width = companion.u16("companion texture width")?;
        let height = companion.u16("companion texture height")?;
        if (tag, width, height) != (texture.format_tag, texture.width, texture.height) {
            tracing::warn!(
                texture = id,
                tag,
                width,
                height,
                "companion texture metadata disagrees with the primary stream; using primary"
            );
        }

        texture.image = texture.decode_pixels(companion)?;
        texture.companion = Some(pixels.offset);
        if companion.position() < pixels.end() {
            companion.seek_to(pixels.end())?;
        }
        Ok(texture)
    }

    fn parse_metadata(id: u16, header: &RecordHeader, r: &mut RecordReader<'_>) -> ScResult<Self> {
        let format_tag = r.u8("texture format tag")?;
        let width = r.u16("texture width")?;
        let height = r.u16("texture height")?;
        tracing::debug!(texture = id, format_tag, width, height, "texture");
        Ok(Self {
            id,
            record_type: header.kind,
            format_tag,
            width,
            height,
            image: None,
            offset: Offset::Existing(header.offset),
            companion: None,
        })
    }

    fn decode_pixels(&self, r: &mut RecordReader<'_>) -> ScResult<Option<Raster>> {
        let Some(format) = self.format() else {
            tracing::warn!(
                texture = self.id,
                tag = self.format_tag,
                "unsupported pixel format; loading as placeholder"
            );
            return Ok(None);
        };
        let (width, height) = (u32::from(self.width), u32::from(self.height));
        let bytes = r.bytes(format.payload_len(width, height)?, "texture pixels")?;
        format.decode(bytes, width, height).map(Some)
    }

    /// `[tag][width][height]` as written in front of the pixels.
    pub(crate) fn encode_metadata(&self) -> [u8; TEXTURE_METADATA_LEN] {
        let [w0, w1] = self.width.to_le_bytes();
        let [h0, h1] = self.height.to_le_bytes();
        [self.format_tag, w0, w1, h0, h1]
    }

    /// Pixel payload in the texture's own codec.
    pub(crate) fn encode_pixels(&self) -> ScResult<Vec<u8>> {
        match (self.format(), &self.image) {
            (Some(format), Some(image)) => Ok(format.encode(image)),
            _ => Err(ScError::UnsupportedPixelFormat(self.format_tag)),
        }
    }

    /// Full record `[type][length][tag][w][h]` plus the pixels when `with_pixels` is set.
    pub(crate) fn encode_record(&self, record_type: u8, with_pixels: bool) -> ScResult<Vec<u8>> {
        let pixels = if with_pixels {
            self.encode_pixels()?
        } else {
            Vec::new()
        };
        let length = i32::try_from(TEXTURE_METADATA_LEN + pixels.len())
            .map_err(|_| ScError::validation(format!("texture {} payload too large", self.id)))?;

        let mut record = Vec::with_capacity(5 + TEXTURE_METADATA_LEN + pixels.len());
        record.push(record_type);
        record.extend_from_slice(&length.to_le_bytes());
        record.extend_from_slice(&self.encode_metadata());
        record.extend_from_slice(&pixels);
        Ok(record)
    }

    pub(crate) fn image_mut(&mut self) -> ScResult<&mut Raster> {
        let tag = self.format_tag;
        self.image
            .as_mut()
            .ok_or(ScError::UnsupportedPixelFormat(tag))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/texture.rs"]
mod tests;
