use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use motiversera::{
    BackgroundLoader, BackgroundSource, EditorConfig, ExportFormat, ExportOptions, FsImageFetcher,
    JsonFileStore, Scene, SceneSnapshot, SceneStore as _, ThemeId,
};

#[derive(Parser, Debug)]
#[command(name = "motiversera", version)]
struct Cli {
    /// Log debug diagnostics to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a scene snapshot to PNG or JPEG.
    Export(ExportArgs),
    /// Write the default scene snapshot.
    Init(InitArgs),
    /// Print the syntax classification of a code snippet.
    Tokenize(TokenizeArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input scene snapshot JSON. Defaults to the persisted editor state.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// `png` or `jpg`. Defaults to the output extension, then `MOTIVERSERA_EXPORT_FORMAT`.
    #[arg(long)]
    format: Option<ExportFormat>,

    /// JPEG quality (1-100).
    #[arg(long)]
    quality: Option<u8>,

    /// Cut the image to the scene's crop rectangle.
    #[arg(long)]
    crop: bool,

    /// Directory background image paths are resolved against. Defaults to the snapshot's
    /// directory.
    #[arg(long)]
    assets_root: Option<PathBuf>,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Skip system font discovery.
    #[arg(long)]
    no_system_fonts: bool,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Output snapshot path. Defaults to the persisted editor state.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum)]
    theme: Option<ThemeChoice>,
}

#[derive(Parser, Debug)]
struct TokenizeArgs {
    /// Snippet to classify. Read from `--in` when omitted.
    text: Option<String>,

    #[arg(long = "in", conflicts_with = "text")]
    in_path: Option<PathBuf>,

    /// Emit JSON instead of one `role<TAB>text` line per token.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThemeChoice {
    DarkCode,
    Midnight,
    Paper,
}

impl From<ThemeChoice> for ThemeId {
    fn from(value: ThemeChoice) -> Self {
        match value {
            ThemeChoice::DarkCode => ThemeId::DarkCode,
            ThemeChoice::Midnight => ThemeId::Midnight,
            ThemeChoice::Paper => ThemeId::Paper,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = EditorConfig::from_env();
    match cli.cmd {
        Command::Export(args) => cmd_export(args, config),
        Command::Init(args) => cmd_init(args, config),
        Command::Tokenize(args) => cmd_tokenize(args),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<Scene> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open snapshot '{}'", path.display()))?;
    let snapshot = SceneSnapshot::from_json(&json).with_context(|| "parse snapshot JSON")?;
    Ok(Scene::from_snapshot(snapshot))
}

fn cmd_export(args: ExportArgs, mut config: EditorConfig) -> anyhow::Result<()> {
    let scene = match &args.in_path {
        Some(path) => read_scene(path)?,
        None => motiversera::load_scene_or_default(&JsonFileStore::new(&config.state_path)),
    };

    config.font_dirs.extend(args.font_dirs.iter().cloned());
    if args.no_system_fonts {
        config.load_system_fonts = false;
    }
    let mut backend =
        motiversera::create_backend(motiversera::BackendKind::Cpu, &config.render_settings())?;

    let assets_root = args
        .assets_root
        .clone()
        .or_else(|| {
            args.in_path
                .as_deref()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
        })
        .unwrap_or_else(|| PathBuf::from("."));
    let mut loader = BackgroundLoader::new();
    loader.load_blocking(
        &FsImageFetcher::new(assets_root),
        scene.background_image_source(),
    );

    let mut format = args
        .format
        .or_else(|| ExportFormat::from_path(&args.out))
        .unwrap_or(config.export_format);
    if let (ExportFormat::Jpeg { quality }, Some(q)) = (&mut format, args.quality) {
        *quality = q;
    }
    let opts = ExportOptions {
        format,
        apply_crop: args.crop,
    };

    let image = motiversera::export_scene(
        backend.as_mut(),
        &scene,
        BackgroundSource::from_loader(&scene, &loader),
        &opts,
    )?;
    image.write_to(&args.out)?;

    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        image.width,
        image.height
    );
    Ok(())
}

fn cmd_init(args: InitArgs, config: EditorConfig) -> anyhow::Result<()> {
    let mut scene = Scene::new();
    if let Some(theme) = args.theme.map(ThemeId::from).or(config.theme) {
        scene.set_theme(theme);
    }

    let out = args.out.unwrap_or(config.state_path);
    let mut store = JsonFileStore::new(&out);
    store.clear()?;
    store.save(&scene.snapshot())?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_tokenize(args: TokenizeArgs) -> anyhow::Result<()> {
    let text = match (args.text, &args.in_path) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read snippet '{}'", path.display()))?,
        (None, None) => anyhow::bail!("pass a snippet or --in <file>"),
    };

    let tokens = motiversera::tokenize(&text);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
        return Ok(());
    }
    for token in tokens {
        println!("{}\t{:?}", token.role.as_str(), token.text);
    }
    Ok(())
}
