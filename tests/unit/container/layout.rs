use super::*;

#[test]
fn companion_path_appends_the_suffix_to_the_stem() {
    let opts = LoadOptions::default();
    assert_eq!(
        opts.companion_path(Path::new("assets/ui.sc")),
        PathBuf::from("assets/ui_tex.sc")
    );
    assert_eq!(
        opts.companion_path(Path::new("noext")),
        PathBuf::from("noext_tex")
    );
}

#[test]
fn custom_suffix() {
    let opts = LoadOptions {
        texture_suffix: "-pixels".to_string(),
        ..LoadOptions::default()
    };
    assert_eq!(
        opts.companion_path(Path::new("a.sc")),
        PathBuf::from("a-pixels.sc")
    );
}

#[test]
fn auto_picks_split_only_when_the_companion_exists() {
    let dir = tempfile::tempdir().unwrap();
    let primary = dir.path().join("ui.sc");
    let opts = LoadOptions::default();
    assert_eq!(opts.resolve(&primary), ContainerLayout::Single);

    std::fs::write(dir.path().join("ui_tex.sc"), [0u8; 5]).unwrap();
    assert_eq!(
        opts.resolve(&primary),
        ContainerLayout::Split {
            texture_path: dir.path().join("ui_tex.sc")
        }
    );
}

#[test]
fn explicit_hints_override_detection() {
    let single = LoadOptions {
        layout: LayoutHint::Single,
        ..LoadOptions::default()
    };
    let split = LoadOptions {
        layout: LayoutHint::Split,
        ..LoadOptions::default()
    };
    let path = Path::new("missing/ui.sc");
    assert_eq!(single.resolve(path), ContainerLayout::Single);
    assert!(matches!(split.resolve(path), ContainerLayout::Split { .. }));
}
