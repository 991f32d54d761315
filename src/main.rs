use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use kestrel_browser::collaborators::{
    CommandLauncher, DecodingProbe, EditorLauncher, ImageProbe, TileKind,
};
use kestrel_browser::layout::{GridConfig, GridPlanner, GridShape, ResponsiveGrid};
use kestrel_browser::{
    BrowserConfig, BrowserSession, ImageRecord, NavigationModel, SceneId, SceneSummary,
};

/// Fallback container width when none is given.
const DEFAULT_WIDTH: f32 = 1600.0;

#[derive(Parser, Debug)]
#[command(name = "kestrel-browser", version, about = "Browse Kestrel wildlife photo scenes")]
struct Cli {
    /// Directory containing the .kestrel folder
    root: PathBuf,

    /// Species keyword (case-insensitive substring)
    #[arg(short, long, default_value = "")]
    search: String,

    /// Container width in pixels; repeat to replay a resize sequence
    #[arg(short, long = "width", value_name = "PX")]
    widths: Vec<f32>,

    /// Open a scene and list its images best-first
    #[arg(long, value_name = "SCENE_ID")]
    scene: Option<String>,

    /// Open this image of the opened scene in the external editor
    #[arg(long, value_name = "FILENAME", requires = "scene")]
    edit: Option<String>,

    /// Open this image of the opened scene with the system's default viewer
    #[arg(long, value_name = "FILENAME", requires = "scene")]
    open: Option<String>,

    /// Config file (default: XDG config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Check whether tile images can be decoded
    #[arg(long)]
    probe: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kestrel_browser=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BrowserConfig::load(path)?,
        None => BrowserConfig::load_default()?,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run(cli, config))
}

async fn run(cli: Cli, config: BrowserConfig) -> Result<()> {
    let session = BrowserSession::new(config.clone());
    let snapshot = session
        .load_dir(&cli.root)
        .with_context(|| format!("Error loading database from {}", cli.root.display()))?;

    let widths = if cli.widths.is_empty() {
        vec![DEFAULT_WIDTH]
    } else {
        cli.widths.clone()
    };
    let final_width = widths.last().copied().unwrap_or(DEFAULT_WIDTH);

    let view = snapshot.filter(&cli.search);
    println!("{}", view.status_line());

    if view.is_empty() {
        println!("No scenes found matching the search criteria.");
    } else {
        let keys: Vec<String> = view.iter().map(|s| s.scene_id().to_string()).collect();
        let shape =
            settle_layout(config.scene_grid, config.relayout_window(), keys, &widths).await?;
        println!("{} columns x {} rows", shape.columns, shape.rows);
        for (scene, row, col) in shape.cells(view.scenes()) {
            print_scene_tile(scene, row, col, &config, cli.probe);
        }
    }

    let Some(scene_arg) = cli.scene.as_deref() else {
        return Ok(());
    };
    let scene_id = SceneId::parse(scene_arg).context("Scene id must not be blank")?;
    let scene = snapshot
        .find_scene(&scene_id)
        .with_context(|| format!("No scene {scene_id} in {}", cli.root.display()))?;

    let mut nav = snapshot.navigation();
    let images = nav.open_scene(scene).to_vec();
    let placement = GridPlanner::new(config.image_grid).plan(&images, final_width);
    println!();
    println!("Scene {scene_id} detail ({} columns)", placement.columns);
    for cell in &placement.cells {
        print_image_tile(cell.item, cell.row, cell.col, cli.probe);
    }

    for (filename, launcher) in launch_requests(&cli, &config) {
        open_image(&nav, &images, &scene_id, filename, &launcher)?;
    }

    nav.close_scene();
    Ok(())
}

/// `--edit` goes to the configured editor, `--open` to the system opener.
fn launch_requests<'a>(cli: &'a Cli, config: &BrowserConfig) -> Vec<(&'a str, CommandLauncher)> {
    let mut requests = Vec::new();
    if let Some(filename) = cli.edit.as_deref() {
        requests.push((filename, CommandLauncher::new(config.editor_program.clone())));
    }
    if let Some(filename) = cli.open.as_deref() {
        requests.push((filename, CommandLauncher::system_opener()));
    }
    requests
}

/// Shows the detail panel for `filename` and hands its base file to `launcher`.
fn open_image(
    nav: &NavigationModel,
    images: &[ImageRecord],
    scene_id: &SceneId,
    filename: &str,
    launcher: &dyn EditorLauncher,
) -> Result<()> {
    let record = images
        .iter()
        .find(|r| r.filename == filename)
        .with_context(|| format!("No image {filename} in scene {scene_id}"))?;
    let detail = nav.select_image(record);
    println!();
    for line in detail.info_lines() {
        println!("{line}");
    }

    let probe = DecodingProbe.probe_optional(record.crop_path());
    if let Some(text) = probe.placeholder(TileKind::Crop) {
        println!("Crop: {}", text);
    }

    if let Err(e) = launcher.launch(&detail.resolved_base_file) {
        // Advisory: report and keep going.
        warn!(program = launcher.program(), error = %e, "Could not open base file");
        eprintln!("{e}");
    }
    Ok(())
}

/// Lays out `keys` at the first width, then replays the remaining widths as a
/// resize burst and waits for the debounced relayout to settle.
async fn settle_layout(
    grid_config: GridConfig,
    window: Duration,
    keys: Vec<String>,
    widths: &[f32],
) -> Result<Arc<GridShape>> {
    let mut grid = ResponsiveGrid::spawn(grid_config, window);
    let mut shapes = grid.subscribe();

    grid.set_items(keys);
    if let Some((first, rest)) = widths.split_first() {
        grid.set_width_now(*first);
        shapes.borrow_and_update();
        for width in rest {
            grid.resize(*width);
        }
        if !rest.is_empty() {
            // Same column count means nothing new is published; stop waiting
            // once the window has clearly passed.
            let _ = tokio::time::timeout(window * 3, shapes.changed()).await;
        }
    }

    let shape = grid.shape().context("Grid was never laid out")?;
    grid.shutdown();
    Ok(shape)
}

fn print_scene_tile(
    scene: &SceneSummary,
    row: usize,
    col: usize,
    config: &BrowserConfig,
    probe: bool,
) {
    let species = scene.species_caption(config.species_preview_count);
    println!("[{row},{col}] {}  |  {species}", scene.headline());
    if probe {
        let representative = scene.representative_image();
        let availability = DecodingProbe.probe(representative.export_path());
        if let Some(text) = availability.placeholder(TileKind::Scene) {
            println!("        {}", text.replace('\n', " "));
        }
    }
}

fn print_image_tile(record: &ImageRecord, row: usize, col: usize, probe: bool) {
    println!("[{row},{col}] {}  ({})", record.caption(), record.species);
    if probe {
        let availability = DecodingProbe.probe(record.export_path());
        if let Some(text) = availability.placeholder(TileKind::Image) {
            println!("        {}", text.replace('\n', " "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_uses_system_opener() {
        let cli = Cli::try_parse_from([
            "kestrel-browser",
            "/photos",
            "--scene",
            "3",
            "--edit",
            "IMG_1.CR3",
            "--open",
            "IMG_2.CR3",
        ])
        .unwrap();
        let config = BrowserConfig {
            editor_program: "rawtherapee".to_string(),
            ..BrowserConfig::default()
        };

        let requests = launch_requests(&cli, &config);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "IMG_1.CR3");
        assert_eq!(requests[0].1.program(), "rawtherapee");
        assert_eq!(requests[1].0, "IMG_2.CR3");
        assert_eq!(requests[1].1, CommandLauncher::system_opener());
    }

    #[test]
    fn test_open_requires_scene() {
        let result = Cli::try_parse_from(["kestrel-browser", "/photos", "--open", "IMG_1.CR3"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_launch_without_flags() {
        let cli = Cli::try_parse_from(["kestrel-browser", "/photos", "--scene", "3"]).unwrap();
        assert!(launch_requests(&cli, &BrowserConfig::default()).is_empty());
    }
}
