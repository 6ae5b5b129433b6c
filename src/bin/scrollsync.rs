use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollsync::{
    AssetMetadata, CountingScheduler, PointerEvent, RecordingPlayerLoader, RecordingSurface,
    ScrollSession, SessionConfig, StaticDocument, TargetId, Viewport,
};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "scrollsync", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay scroll input against a page description and print the final surface state.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Page description JSON (viewport, elements, CSS variables).
    #[arg(long)]
    page: PathBuf,

    /// Session configuration JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input script JSON: `[{"atFrame": 0, "wheel": 400}, ...]`.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Wheel delta applied on consecutive frames starting at frame 0. Repeatable.
    #[arg(long, allow_negative_numbers = true)]
    wheel: Vec<f64>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 180)]
    frames: u64,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Behave as if the user prefers reduced motion.
    #[arg(long)]
    reduced_motion: bool,

    /// Frame count the vector animation reports once loaded; it stays pending when omitted.
    #[arg(long)]
    lottie_frames: Option<f64>,

    /// Also print CSS declarations for every styled element.
    #[arg(long)]
    css: bool,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ScriptStep {
    at_frame: u64,
    #[serde(flatten)]
    action: Action,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
enum Action {
    Wheel(f64),
    Touch(f64),
    NativeScroll(f64),
    Resize(Viewport),
    Pointer { target: String, event: PointerEvent },
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be finite and > 0"
    );

    let mut doc: StaticDocument = read_json(&args.page, "page")?;
    doc.validate()?;
    let cfg: SessionConfig = match &args.config {
        Some(p) => read_json(p, "config")?,
        None => SessionConfig::default(),
    };
    let mut script: Vec<ScriptStep> = match &args.script {
        Some(p) => read_json(p, "script")?,
        None => Vec::new(),
    };
    script.extend(args.wheel.iter().enumerate().map(|(i, &delta)| ScriptStep {
        at_frame: i as u64,
        action: Action::Wheel(delta),
    }));
    script.sort_by_key(|s| s.at_frame);

    let mut loader = RecordingPlayerLoader::new();
    if let Some(n) = args.lottie_frames {
        loader.resolve(AssetMetadata::Ready { total_frames: n });
    }
    let mut surface = RecordingSurface::new();
    let mut frames = CountingScheduler::new();

    let mut session = ScrollSession::install(
        cfg,
        &args.reduced_motion,
        &doc,
        &mut loader,
        &mut surface,
        &mut frames,
        0.0,
    )
    .context("install scroll session")?;

    let frame_ms = 1000.0 / args.fps;
    let mut steps = script.iter().peekable();
    for frame in 0..args.frames {
        while let Some(step) = steps.next_if(|s| s.at_frame <= frame) {
            match &step.action {
                Action::Wheel(d) => session.on_wheel(*d),
                Action::Touch(o) => session.on_touch(*o),
                Action::NativeScroll(o) => session.on_native_scroll(*o),
                Action::Resize(vp) => {
                    let vp = Viewport::new(vp.width, vp.height)?;
                    doc.set_viewport(vp);
                    session.on_resize(&doc, &mut surface);
                }
                Action::Pointer { target, event } => {
                    session.on_pointer(&TargetId::new(target.as_str()), *event, frame as f64 * frame_ms)
                }
            }
        }
        session.scan_reveals(&doc, &mut surface);
        // Frames only run while the session keeps asking for them.
        if frames.take() {
            session.on_frame((frame + 1) as f64 * frame_ms, &doc, &mut surface, &mut frames);
        }
    }

    let regions: Vec<_> = session
        .coordinator()
        .regions()
        .map(|r| {
            serde_json::json!({
                "name": r.spec().name,
                "start": r.start(),
                "end": r.end(),
                "progress": r.progress(),
                "lifecycle": r.lifecycle(),
            })
        })
        .collect();
    let log = loader.log();
    let mut out = serde_json::json!({
        "reducedMotion": session.is_reduced_motion(),
        "framesRequested": frames.requested,
        "snapshot": session.snapshot(),
        "regions": regions,
        "player": {
            "loads": log.requests.len(),
            "seeks": log.seeks.len(),
            "lastFrame": log.seeks.last().map(|(f, _)| *f),
        },
        "surface": &surface,
    });
    if args.css {
        let css: serde_json::Map<String, serde_json::Value> = surface
            .elements
            .iter()
            .map(|(id, el)| {
                let decls: serde_json::Map<String, serde_json::Value> = el
                    .style
                    .css_declarations()
                    .into_iter()
                    .map(|(k, v)| (k.to_owned(), serde_json::Value::String(v)))
                    .collect();
                (id.to_string(), serde_json::Value::Object(decls))
            })
            .collect();
        out["css"] = serde_json::Value::Object(css);
    }

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
