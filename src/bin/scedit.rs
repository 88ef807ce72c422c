use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use scedit::{ChunkRef, Container, EntityRef, LayoutHint, LoadOptions, RenderOptions};

#[derive(Parser, Debug)]
#[command(name = "scedit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every entity of a container.
    Info(InfoArgs),
    /// Render a texture, shape or chunk as a PNG.
    Render(RenderArgs),
    /// Append a copy of a texture.
    DuplicateTexture(DuplicateTextureArgs),
    /// Duplicate the clip behind an export and publish it under a new name.
    DuplicateExport(DuplicateExportArgs),
    /// Paint a PNG into the texture region under a chunk.
    ReplaceChunk(ReplaceChunkArgs),
    /// Point a chunk at another texture.
    SetChunkTexture(SetChunkTextureArgs),
}

#[derive(Args, Debug)]
struct Input {
    /// Input SC file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Texture storage layout.
    #[arg(long, value_enum, default_value_t = LayoutChoice::Auto)]
    layout: LayoutChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutChoice {
    Auto,
    Single,
    Split,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    #[command(flatten)]
    input: Input,

    /// Emit JSON lines instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: Input,

    /// Texture id to render.
    #[arg(long, conflicts_with_all = ["shape", "chunk"])]
    texture: Option<u16>,

    /// Shape id to render.
    #[arg(long, conflicts_with = "chunk")]
    shape: Option<i16>,

    /// Chunk to render, as `SHAPE_ID:CHUNK_INDEX`.
    #[arg(long)]
    chunk: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Stroke polygon outlines.
    #[arg(long)]
    polygons: bool,
}

#[derive(Parser, Debug)]
struct DuplicateTextureArgs {
    #[command(flatten)]
    input: Input,

    /// Texture id to copy.
    #[arg(long)]
    texture: u16,
}

#[derive(Parser, Debug)]
struct DuplicateExportArgs {
    #[command(flatten)]
    input: Input,

    /// Existing export name.
    #[arg(long)]
    export: String,

    /// Name for the new export.
    #[arg(long)]
    name: String,
}

#[derive(Parser, Debug)]
struct ReplaceChunkArgs {
    #[command(flatten)]
    input: Input,

    /// Chunk to repaint, as `SHAPE_ID:CHUNK_INDEX`.
    #[arg(long)]
    chunk: String,

    /// Replacement PNG.
    #[arg(long)]
    png: PathBuf,
}

#[derive(Parser, Debug)]
struct SetChunkTextureArgs {
    #[command(flatten)]
    input: Input,

    /// Chunk to retarget, as `SHAPE_ID:CHUNK_INDEX`.
    #[arg(long)]
    chunk: String,

    /// New texture id.
    #[arg(long)]
    texture: u8,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Render(args) => cmd_render(args),
        Command::DuplicateTexture(args) => cmd_duplicate_texture(args),
        Command::DuplicateExport(args) => cmd_duplicate_export(args),
        Command::ReplaceChunk(args) => cmd_replace_chunk(args),
        Command::SetChunkTexture(args) => cmd_set_chunk_texture(args),
    }
}

fn open(input: &Input) -> anyhow::Result<Container> {
    let opts = LoadOptions {
        layout: match input.layout {
            LayoutChoice::Auto => LayoutHint::Auto,
            LayoutChoice::Single => LayoutHint::Single,
            LayoutChoice::Split => LayoutHint::Split,
        },
        ..LoadOptions::default()
    };
    Container::open_with(&input.in_path, &opts)
        .with_context(|| format!("open container '{}'", input.in_path.display()))
}

fn save(container: &mut Container, path: &Path) -> anyhow::Result<()> {
    container
        .save_in_place()
        .with_context(|| format!("save container '{}'", path.display()))?;
    eprintln!("saved {}", path.display());
    Ok(())
}

fn parse_chunk(container: &Container, arg: &str) -> anyhow::Result<ChunkRef> {
    let (shape, chunk) = arg
        .split_once(':')
        .with_context(|| format!("chunk '{arg}' is not SHAPE_ID:CHUNK_INDEX"))?;
    let shape_id: i16 = shape
        .parse()
        .with_context(|| format!("parse shape id '{shape}'"))?;
    let chunk: usize = chunk
        .parse()
        .with_context(|| format!("parse chunk index '{chunk}'"))?;
    let shape = container
        .shape_index(shape_id)
        .with_context(|| format!("no shape with id {shape_id}"))?;
    Ok(ChunkRef { shape, chunk })
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let container = open(&args.input)?;
    if !args.json {
        let counts = container.header_counts();
        println!(
            "{}: {} textures, {} shapes, {} movie clips, {} exports",
            container.path().display(),
            counts.textures,
            counts.shapes,
            counts.movie_clips,
            container.exports().len()
        );
    }
    for entity in container.entities() {
        let info = container.describe(entity)?;
        if args.json {
            println!("{}", serde_json::to_string(&info)?);
        } else {
            println!("== {}", container.name(entity)?);
            print!("{info}");
        }
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let container = open(&args.input)?;
    let entity = match (&args.texture, &args.shape, &args.chunk) {
        (Some(id), _, _) => EntityRef::Texture(usize::from(*id)),
        (_, Some(id), _) => EntityRef::Shape(
            container
                .shape_index(*id)
                .with_context(|| format!("no shape with id {id}"))?,
        ),
        (_, _, Some(arg)) => EntityRef::Chunk(parse_chunk(&container, arg)?),
        _ => anyhow::bail!("pass one of --texture, --shape or --chunk"),
    };

    let opts = RenderOptions {
        show_polygons: args.polygons,
        ..RenderOptions::default()
    };
    let raster = container
        .render(entity, &opts)?
        .with_context(|| format!("{} has no image", container.name(entity).unwrap_or_default()))?;
    scedit::export_raster_to_png(&raster, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_duplicate_texture(args: DuplicateTextureArgs) -> anyhow::Result<()> {
    let mut container = open(&args.input)?;
    let id = container.duplicate_texture(args.texture)?;
    println!("texture {id}");
    save(&mut container, &args.input.in_path)
}

fn cmd_duplicate_export(args: DuplicateExportArgs) -> anyhow::Result<()> {
    let mut container = open(&args.input)?;
    let (clip, _) = container.duplicate_movie_clip_via_export(&args.export, &args.name)?;
    println!("movie clip {}", container.movie_clips()[clip].id());
    save(&mut container, &args.input.in_path)
}

fn cmd_replace_chunk(args: ReplaceChunkArgs) -> anyhow::Result<()> {
    let mut container = open(&args.input)?;
    let at = parse_chunk(&container, &args.chunk)?;
    let replacement = scedit::load_png(&args.png)?;
    container.replace_chunk_pixels(at, &replacement)?;
    save(&mut container, &args.input.in_path)
}

fn cmd_set_chunk_texture(args: SetChunkTextureArgs) -> anyhow::Result<()> {
    let mut container = open(&args.input)?;
    let at = parse_chunk(&container, &args.chunk)?;
    container.set_chunk_texture_id(at, args.texture)?;
    save(&mut container, &args.input.in_path)
}
