use crate::foundation::core::Offset;

/// A named entry point into the clip graph.
#[derive(Clone, Debug)]
pub struct Export {
    pub(crate) id: i16,
    pub(crate) name: String,
    pub(crate) movie_clip: Option<usize>,
    /// Position of the id slot in the export block.
    pub(crate) offset: Offset,
}

impl Export {
    pub(crate) fn new(id: i16, name: String, offset: Offset) -> Self {
        Self {
            id,
            name,
            movie_clip: None,
            offset,
        }
    }

    /// Id of the target clip.
    pub fn id(&self) -> i16 {
        self.id
    }

    /// Export name. Empty when stored with the 255 length marker.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the resolved clip, if a clip with [`Export::id`] exists.
    pub fn movie_clip(&self) -> Option<usize> {
        self.movie_clip
    }

    /// Where the id slot lives.
    pub fn offset(&self) -> Offset {
        self.offset
    }
}
