use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "scrollweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a scene description.
    Check(CheckArgs),
    /// Drive a scene through scroll positions and dump the rendered element states.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Scroll offsets to visit, in order.
    #[arg(long, value_delimiter = ',', required = true)]
    scroll: Vec<f64>,

    /// Frames to run at each scroll offset.
    #[arg(long, default_value_t = 60)]
    frames_per_step: usize,

    /// Seconds per frame.
    #[arg(long, default_value_t = 0.016)]
    dt: f64,

    /// Override the viewport width from the scene.
    #[arg(long)]
    width: Option<f64>,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct Step {
    requested: f64,
    scroll_y: f64,
    frames: usize,
    transitions: Vec<scrollweave::ZoneEvent>,
    timeline_events: Vec<scrollweave::TimelineEvent>,
    pins: Vec<scrollweave::PinEvent>,
    breakpoints: Vec<scrollweave::BreakpointChange>,
    elements: Vec<scrollweave::RenderedElement>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn load(path: &std::path::Path) -> anyhow::Result<scrollweave::SceneSpec> {
    scrollweave::SceneSpec::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let spec = load(&args.in_path)?;
    let issues = spec.issues();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("{issue}");
        }
        anyhow::bail!(
            "{} issue(s) in '{}'",
            issues.len(),
            args.in_path.display()
        );
    }
    let scene = scrollweave::ScrollScene::from_spec(&spec)
        .with_context(|| format!("build scene '{}'", args.in_path.display()))?;
    println!(
        "ok: {} elements, {} zones, {} timelines, {} pins, {} parallax bindings, {} breakpoint rules, {} sections",
        spec.elements.len(),
        scene.registry().len(),
        scene.engine().len(),
        scene.pins().len(),
        scene.parallax().len(),
        scene.gate().len(),
        spec.sections.len(),
    );
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.frames_per_step > 0, "--frames-per-step must be > 0");
    anyhow::ensure!(
        args.dt.is_finite() && args.dt >= 0.0,
        "--dt must be a non-negative number"
    );
    let spec = load(&args.in_path)?;
    let mut scene = scrollweave::ScrollScene::from_spec(&spec)
        .with_context(|| format!("build scene '{}'", args.in_path.display()))?;
    if let Some(width) = args.width {
        let vp = scrollweave::Viewport::new(width, spec.viewport.height)
            .context("--width override")?;
        scene.resize(vp);
    }

    let mut steps = Vec::with_capacity(args.scroll.len());
    for &requested in &args.scroll {
        scene.scroll_to(requested);
        let mut step = Step {
            requested,
            scroll_y: 0.0,
            frames: args.frames_per_step,
            transitions: Vec::new(),
            timeline_events: Vec::new(),
            pins: Vec::new(),
            breakpoints: Vec::new(),
            elements: Vec::new(),
        };
        for _ in 0..args.frames_per_step {
            let r = scene.frame(args.dt);
            step.scroll_y = r.scroll_y;
            step.transitions.extend(r.transitions);
            step.timeline_events.extend(r.timeline_events);
            step.pins.extend(r.pins);
            step.breakpoints.extend(r.breakpoints);
        }
        step.elements = scene.document().rendered_all();
        steps.push(step);
    }

    let json = serde_json::to_string_pretty(&steps).context("serialize simulation")?;
    match &args.out {
        Some(out) => {
            if let Some(parent) = out.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(out, json).with_context(|| format!("write '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
