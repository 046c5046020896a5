use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use backdrop::{
    BackdropView, CpuSurfaceProvider, Fps, FrameOutput, FramePacer, FrameScheduler,
    PngSequenceSink, SceneConfig, Viewport, ViewportWatcher,
};

#[derive(Parser, Debug)]
#[command(name = "backdrop", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run N display refreshes and write the last frame as a PNG.
    Frame(FrameArgs),
    /// Render a run of frames into a directory of numbered PNGs.
    Render(RenderArgs),
    /// Print the default scene configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Fixed scene seed (overrides the config file).
    #[arg(long)]
    seed: Option<u64>,

    /// Scene configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SceneArgs {
    fn scene_config(&self) -> anyhow::Result<SceneConfig> {
        let mut cfg = match &self.config {
            Some(path) => SceneConfig::from_path(path)?,
            None => SceneConfig::default(),
        };
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        Ok(cfg)
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Frame counter value to stop at (1 is the first rendered frame).
    #[arg(long, default_value_t = 1)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Number of display refreshes to run.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Display refresh rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Resize the viewport before refresh F, as `WxH@F`. Repeatable.
    #[arg(long = "resize")]
    resizes: Vec<ResizeAt>,

    /// Pace refreshes to wall-clock time instead of running flat out.
    #[arg(long)]
    realtime: bool,

    /// Output directory for the PNG sequence.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Write to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug)]
struct ResizeAt {
    viewport: Viewport,
    at: u64,
}

impl FromStr for ResizeAt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (size, at) = s
            .split_once('@')
            .ok_or_else(|| format!("resize '{s}' is not WxH@FRAME"))?;
        let viewport = Viewport::from_str(size).map_err(|e| e.to_string())?;
        let at = at
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("resize '{s}': {e}"))?;
        Ok(Self { viewport, at })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn mount(
    scheduler: &mut FrameScheduler,
    watcher: &ViewportWatcher,
    cfg: &SceneConfig,
    output: Option<FrameOutput>,
) -> anyhow::Result<BackdropView> {
    BackdropView::mount(scheduler, &mut CpuSurfaceProvider, watcher, cfg, output)?
        .with_context(|| format!("no drawing surface for viewport {}", watcher.current()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.frame >= 1, "--frame must be >= 1");
    let cfg = args.scene.scene_config()?;
    let watcher = ViewportWatcher::new(args.scene.viewport());
    let mut scheduler = FrameScheduler::new();
    let view = mount(&mut scheduler, &watcher, &cfg, None)?;

    for _ in 0..args.frame {
        scheduler.tick();
    }
    let frame = view.frame();
    let stats = view.unmount(&mut scheduler)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    backdrop::write_png(&args.out, &frame)?;

    eprintln!(
        "wrote {} ({} frames rendered)",
        args.out.display(),
        stats.frames_rendered
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = args.scene.scene_config()?;
    let fps = Fps::new(args.fps, 1)?;
    let sink = Box::new(PngSequenceSink::new(&args.out));

    let watcher = ViewportWatcher::new(args.scene.viewport());
    let mut scheduler = FrameScheduler::new();
    let view = mount(&mut scheduler, &watcher, &cfg, Some(FrameOutput { sink, fps }))?;

    let mut pacer = args.realtime.then(|| FramePacer::new(fps));
    for refresh in 1..=args.frames {
        for r in args.resizes.iter().filter(|r| r.at == refresh) {
            watcher.notify_resize(r.viewport);
        }
        if let Some(p) = pacer.as_mut() {
            p.wait();
        }
        scheduler.tick();
    }

    let stats = view.unmount(&mut scheduler)?;
    eprintln!(
        "wrote {} ({} frames rendered, {} skipped)",
        args.out.display(),
        stats.frames_rendered,
        stats.frames_skipped
    );
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let json = SceneConfig::default().to_json_pretty()?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("write config '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
