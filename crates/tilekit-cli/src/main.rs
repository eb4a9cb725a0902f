use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use glam::Vec2;
use tilekit_core::config::{CardinalPriority, FrameLayout};
use tilekit_core::direction::Direction;
use tilekit_core::model::{TextureChunk, TextureId, Tile8Connections};
use tilekit_core::pipeline::{Scene, SceneOutput, build_scene};
use tilekit_core::solvers::TileSolver;
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "tilekit",
    about = "Build tile meshes from scene descriptions",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build every scene and write `<scene>.mesh.json`
    Build(BuildArgs),
    /// Build scenes in memory and print stats + timing
    Stats(BuildArgs),
    /// Solve a single tile against the full atlas and print the sprite as JSON
    Solve(SolveArgs),
}

#[derive(Parser, Debug, Clone)]
struct BuildArgs {
    // Input/Output
    /// Scene file (.json/.yaml/.yml) or a directory of them
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Solver overrides
    /// Frame layout for directional atlases: auto | horizontal | vertical
    #[arg(long, help_heading = "Solver")]
    layout: Option<String>,
    /// Diagonal reduction for 4-directional atlases: vertical | horizontal
    #[arg(long, help_heading = "Solver")]
    priority: Option<String>,
    /// Vertices reserved per layer builder
    #[arg(long, help_heading = "Solver")]
    initial_capacity: Option<usize>,
    /// Build layers in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Solver")]
    parallel: bool,

    // Export
    /// Export aggregated stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration of each scene (after overrides) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: build meshes and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct SolveArgs {
    /// Solver: normal | directional8 | directional4 | rpgmaker_a2 | rpgmaker_a4_wall
    #[arg(long, default_value = "normal")]
    solver: String,
    /// Facing for directional solvers (down, up_left, ne, ...)
    #[arg(long, default_value = "down")]
    direction: String,
    /// Connected neighbors for autotiles, comma separated (e.g. up,left,up_left)
    #[arg(long, value_delimiter = ',')]
    connect: Vec<String>,
    /// Diagonal reduction for 4-directional atlases: vertical | horizontal
    #[arg(long, default_value = "vertical")]
    priority: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Build(args) => run_build(args, cli.progress && !cli.quiet, false),
        Commands::Stats(args) => {
            let mut a = args.clone();
            a.dry_run = true;
            run_build(&a, false, true)
        }
        Commands::Solve(args) => run_solve(args),
    }
}

fn run_build(cli: &BuildArgs, show_progress: bool, print_stats: bool) -> anyhow::Result<()> {
    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    if paths.is_empty() {
        anyhow::bail!("no scene files found under {}", cli.input.display());
    }
    let mut scenes = load_scenes_with_progress(&paths, show_progress)?;
    if scenes.is_empty() {
        anyhow::bail!(
            "none of the {} scene file(s) under {} could be loaded",
            paths.len(),
            cli.input.display()
        );
    }
    info!(count = scenes.len(), "loaded scenes");

    for (_, scene) in scenes.iter_mut() {
        apply_overrides(cli, scene)?;
    }

    if cli.print_config {
        for (path, scene) in &scenes {
            println!("# {}", path.display());
            match cli.print_config_format.as_str() {
                "yaml" => println!("{}", serde_yaml::to_string(&scene.config)?),
                _ => println!("{}", serde_json::to_string_pretty(&scene.config)?),
            }
        }
        return Ok(());
    }

    if !cli.dry_run {
        fs::create_dir_all(&cli.out_dir)
            .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    }

    let mut totals = Vec::with_capacity(scenes.len());
    for (path, scene) in &scenes {
        let start = Instant::now();
        let out = build_scene(scene).with_context(|| format!("build {}", path.display()))?;
        let dur = start.elapsed();
        let stats = out.stats();
        info!(
            scene = %path.display(),
            layers = stats.num_layers,
            tiles = stats.num_tiles,
            vertices = stats.num_vertices,
            time = fmt_dur(dur),
            "scene built"
        );
        if print_stats {
            println!("{}: {} time={}", path.display(), stats.summary(), fmt_dur(dur));
        }
        if !cli.dry_run {
            write_scene(&cli.out_dir, path, &out)?;
        }
        totals.push((path.clone(), stats));
    }

    if let Some(stats_path) = &cli.export_stats {
        let per_scene: Vec<serde_json::Value> = totals
            .iter()
            .map(|(p, s)| serde_json::json!({"scene": p.to_string_lossy(), "stats": s}))
            .collect();
        let value = serde_json::json!({
            "scenes": per_scene,
            "tiles": totals.iter().map(|(_, s)| s.num_tiles).sum::<usize>(),
            "vertices": totals.iter().map(|(_, s)| s.num_vertices).sum::<usize>(),
        });
        fs::write(stats_path, serde_json::to_string_pretty(&value)?)
            .with_context(|| format!("write {}", stats_path.display()))?;
    }
    Ok(())
}

fn apply_overrides(cli: &BuildArgs, scene: &mut Scene) -> anyhow::Result<()> {
    if let Some(layout) = &cli.layout {
        scene.config.layout = parse_layout(layout)?;
    }
    if let Some(priority) = &cli.priority {
        scene.config.priority = parse_priority(priority)?;
    }
    if let Some(cap) = cli.initial_capacity {
        scene.config.mesh.initial_capacity = cap;
    }
    if cli.parallel {
        if cfg!(not(feature = "parallel")) {
            warn!("--parallel has no effect without the `parallel` feature");
        }
        scene.config.parallel = true;
    }
    Ok(())
}

fn write_scene(out_dir: &Path, scene_path: &Path, out: &SceneOutput) -> anyhow::Result<()> {
    let stem = scene_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scene");
    let json_path = out_dir.join(format!("{}.mesh.json", stem));
    let json_value = tilekit_core::scene_to_json(out);
    let json = serde_json::to_string_pretty(&json_value)?;
    fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
    info!(?json_path, layers = out.layers.len(), "meshes written");
    Ok(())
}

fn run_solve(args: &SolveArgs) -> anyhow::Result<()> {
    let direction: Direction = args.direction.parse()?;
    let mut connections = Tile8Connections::default();
    for name in &args.connect {
        let d: Direction = name.trim().parse()?;
        let flag = match d {
            Direction::DOWN => &mut connections.down,
            Direction::DOWN_RIGHT => &mut connections.down_right,
            Direction::RIGHT => &mut connections.right,
            Direction::UP_RIGHT => &mut connections.up_right,
            Direction::UP => &mut connections.up,
            Direction::UP_LEFT => &mut connections.up_left,
            Direction::LEFT => &mut connections.left,
            _ => &mut connections.down_left,
        };
        *flag = true;
    }
    let solver = match args.solver.to_ascii_lowercase().replace('-', "_").as_str() {
        "normal" => TileSolver::Normal {
            target_size: Vec2::ONE,
        },
        "directional8" | "8" => TileSolver::Directional8 {
            direction,
            target_size: Vec2::ONE,
        },
        "directional4" | "4" => TileSolver::Directional4 {
            direction,
            target_size: Vec2::ONE,
        },
        "rpgmaker_a2" | "a2" => TileSolver::RpgmakerA2 { connections },
        "rpgmaker_a4_wall" | "a4_wall" | "a4" => TileSolver::RpgmakerA4Wall {
            connections: connections.into(),
        },
        other => anyhow::bail!("unknown solver: {}", other),
    };
    let cfg = tilekit_core::SolverConfig::builder()
        .priority(parse_priority(&args.priority)?)
        .build();
    let sprite = solver.solve(&TextureChunk::full(TextureId(0)), &cfg)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&tilekit_core::sprite_to_json(&sprite))?
    );
    Ok(())
}

fn parse_layout(s: &str) -> anyhow::Result<FrameLayout> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown layout: {}", s))
}

fn parse_priority(s: &str) -> anyhow::Result<CardinalPriority> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown priority: {}", s))
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_scene(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_scene(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    list.sort();
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_scene(p: &Path) -> bool {
    let name = p.to_string_lossy();
    if name.ends_with(".mesh.json") {
        return false;
    }
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "json" | "yaml" | "yml")
    )
}

fn load_scenes_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<(PathBuf, Scene)>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        match load_scene(p) {
            Ok(scene) => list.push((p.clone(), scene)),
            Err(e) => {
                error!(?p, error = %e, "skip scene");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn load_scene(p: &Path) -> anyhow::Result<Scene> {
    let text = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let is_yaml = matches!(
        p.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let scene = if is_yaml {
        serde_yaml::from_str(&text)?
    } else {
        serde_json::from_str(&text)?
    };
    Ok(scene)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
