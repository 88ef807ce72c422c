use std::path::{Path, PathBuf};

/// How texture pixels are stored.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum ContainerLayout {
    /// Pixels sit inline in the texture records of the primary file.
    Single,
    /// Texture records carry metadata only; pixels live in a companion record stream.
    Split {
        /// Companion file path.
        texture_path: PathBuf,
    },
}

/// Layout selection when opening a container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutHint {
    /// Split when the companion file exists next to the primary, single otherwise.
    #[default]
    Auto,
    /// Always read the primary file alone.
    Single,
    /// Require the companion file.
    Split,
}

/// Options for [`crate::Container::open_with`].
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Layout selection.
    pub layout: LayoutHint,
    /// Appended to the primary file stem to locate the companion file.
    pub texture_suffix: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            layout: LayoutHint::Auto,
            texture_suffix: "_tex".to_string(),
        }
    }
}

impl LoadOptions {
    /// `<dir>/<stem><suffix>.<ext>` for a primary file at `path`.
    pub fn companion_path(&self, path: &Path) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut name = format!("{stem}{}", self.texture_suffix);
        if let Some(ext) = path.extension() {
            name.push('.');
            name.push_str(&ext.to_string_lossy());
        }
        path.with_file_name(name)
    }

    pub(crate) fn resolve(&self, path: &Path) -> ContainerLayout {
        let texture_path = self.companion_path(path);
        match self.layout {
            LayoutHint::Single => ContainerLayout::Single,
            LayoutHint::Split => ContainerLayout::Split { texture_path },
            LayoutHint::Auto if texture_path.is_file() => ContainerLayout::Split { texture_path },
            LayoutHint::Auto => ContainerLayout::Single,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/layout.rs"]
mod tests;
