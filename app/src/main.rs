use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use empire_core::utils::{height_image, shaded_height_image, terrain_image};
use empire_core::{GeneratedMap, MapConfig, MapError, MapGenerator, MapSize, TerrainType};
use empire_storage::models::MapDoc;
use empire_storage::{MapStore, StorageError};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
const DB_NAME: &str = "empire";
const COLLECTION: &str = "maps";

#[derive(Error, Debug)]
enum AppError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("cannot read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("cannot write {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("cannot start async runtime: {0}")]
    Runtime(std::io::Error),

    #[error("no stored map named {0:?}")]
    NotFound(String),
}

#[derive(Parser, Debug)]
#[command(name = "empire-map")]
#[command(about = "Generate seeded terrain maps with blend-tile masks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a map and optionally write previews or store it
    Generate(GenerateArgs),
    /// Print terrain, height and sand/grass blend mask at one cell
    Inspect {
        #[command(flatten)]
        map: MapArgs,
        x: usize,
        y: usize,
    },
    /// Load a stored map by name and write its previews
    Load {
        name: String,
        #[arg(long, default_value = DEFAULT_MONGO_URI)]
        mongo_uri: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List stored map names
    List {
        #[arg(long, default_value = DEFAULT_MONGO_URI)]
        mongo_uri: String,
    },
}

#[derive(Args, Debug)]
struct MapArgs {
    /// TOML file with a full map config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Map width in cells (10..=3000)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Map height in cells (10..=3000)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Square preset: small, medium or large
    #[arg(long)]
    size: Option<String>,

    /// Seed text (random if not given)
    #[arg(short, long)]
    seed: Option<String>,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Write the terrain classes as a PNG, one pixel per cell
    #[arg(long)]
    terrain_png: Option<PathBuf>,

    /// Write the raw heights as a grayscale PNG
    #[arg(long)]
    height_png: Option<PathBuf>,

    /// Write heights tinted water-to-snow
    #[arg(long)]
    shaded_png: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    map: MapArgs,

    #[command(flatten)]
    output: OutputArgs,

    /// Store the map in MongoDB under this name
    #[arg(long)]
    store: Option<String>,

    #[arg(long, default_value = DEFAULT_MONGO_URI)]
    mongo_uri: String,
}

impl MapArgs {
    fn to_config(&self) -> Result<MapConfig, AppError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MapConfig::from_size(MapSize::default()),
        };
        if let Some(size) = &self.size {
            let side = MapSize::parse_or_default(size).side();
            config.width = side;
            config.height = side;
        }
        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        if let Some(seed) = &self.seed {
            config.seed = Some(seed.clone());
        }
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<MapConfig, AppError> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn generate(config: MapConfig) -> Result<GeneratedMap, AppError> {
    let start = Instant::now();
    let map = MapGenerator::new(config)?.generate();
    info!(
        "Generated {}x{} map in {:.2} ms (seed {:?})",
        map.width(),
        map.height(),
        start.elapsed().as_secs_f32() * 1000.0,
        map.seed.as_str()
    );
    Ok(map)
}

fn saved(path: &Path, result: image::ImageResult<()>) -> Result<(), AppError> {
    result.map_err(|source| AppError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Saved {}", path.display());
    Ok(())
}

fn write_outputs(map: &GeneratedMap, output: &OutputArgs) -> Result<(), AppError> {
    if let Some(path) = &output.terrain_png {
        saved(path, terrain_image(&map.terrain_grid).save(path))?;
    }
    if let Some(path) = &output.height_png {
        saved(path, height_image(&map.height_field).save(path))?;
    }
    if let Some(path) = &output.shaded_png {
        saved(path, shaded_height_image(&map.height_field).save(path))?;
    }
    Ok(())
}

fn print_summary(map: &GeneratedMap) {
    let cells = (map.width() * map.height()) as f32;
    for t in TerrainType::ALL {
        let share = map.terrain_grid.count(t) as f32 / cells * 100.0;
        println!("{:>10} {:6.2}%", t.name(), share);
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, AppError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)
}

fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Generate(args) => {
            let config = args.map.to_config()?;
            let map = generate(config.clone())?;
            print_summary(&map);
            write_outputs(&map, &args.output)?;

            if let Some(name) = &args.store {
                let doc = MapDoc::from_generated(name, &config, &map);
                let rt = runtime()?;
                rt.block_on(async {
                    let store = MapStore::init(&args.mongo_uri, DB_NAME, COLLECTION).await?;
                    store.create(doc).await
                })?;
                info!("Stored map {:?} (seed {:?})", name, map.seed.as_str());
            }
        }
        Command::Inspect { map, x, y } => {
            let map = generate(map.to_config()?)?;
            if x >= map.width() || y >= map.height() {
                warn!("({}, {}) is outside the {}x{} map", x, y, map.width(), map.height());
                return Ok(());
            }
            let terrain = map.terrain_grid.get(x, y);
            println!(
                "[{}, {}] {} height {:.4}",
                x,
                y,
                terrain,
                map.height_field.get(x, y)
            );
            match map.probe_sand_mask(x, y) {
                Some((mask, Some(tile))) => println!("mask {} -> blend tile {}", mask.bits(), tile),
                Some((mask, None)) => println!("mask {} -> no blend tile", mask.bits()),
                None => println!("not a sand tile, no blend mask"),
            }
        }
        Command::Load {
            name,
            mongo_uri,
            output,
        } => {
            let rt = runtime()?;
            let doc = rt
                .block_on(async {
                    let store = MapStore::init(&mongo_uri, DB_NAME, COLLECTION).await?;
                    store.read_by_name(&name).await
                })?
                .ok_or_else(|| AppError::NotFound(name.clone()))?;
            let map = doc.into_generated().map_err(StorageError::from)?;
            info!("Loaded {:?} ({}x{})", name, map.width(), map.height());
            print_summary(&map);
            write_outputs(&map, &output)?;
        }
        Command::List { mongo_uri } => {
            let rt = runtime()?;
            let names = rt.block_on(async {
                let store = MapStore::init(&mongo_uri, DB_NAME, COLLECTION).await?;
                store.list_names().await
            })?;
            for name in names {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run(Cli::parse()) {
        error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn preset_and_overrides() {
        let cli = parse(&["empire-map", "generate", "--size", "small", "-H", "100", "-s", "abc"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = args.map.to_config().unwrap();
        assert_eq!(config.width, 256);
        assert_eq!(config.height, 100);
        assert_eq!(config.seed.as_deref(), Some("abc"));
    }

    #[test]
    fn default_is_medium() {
        let cli = parse(&["empire-map", "generate"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = args.map.to_config().unwrap();
        assert_eq!((config.width, config.height), (512, 512));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn config_file_is_read() {
        let path = std::env::temp_dir().join("empire_map_cli_test.toml");
        std::fs::write(
            &path,
            "width = 40\nheight = 30\nseed = \"file\"\n[forest]\ndensity = 0.6\n",
        )
        .unwrap();
        let cli = parse(&[
            "empire-map",
            "inspect",
            "--config",
            path.to_str().unwrap(),
            "-W",
            "50",
            "3",
            "4",
        ]);
        let Command::Inspect { map, x, y } = cli.command else {
            panic!("expected inspect");
        };
        let config = map.to_config().unwrap();
        assert_eq!((config.width, config.height), (50, 30));
        assert_eq!(config.seed.as_deref(), Some("file"));
        assert_eq!(config.forest.density, 0.6);
        assert_eq!(config.terrain.octaves, 6);
        assert_eq!((x, y), (3, 4));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_config_is_reported() {
        let err = load_config(Path::new("/nonexistent/empire.toml")).unwrap_err();
        assert!(matches!(err, AppError::ConfigRead { .. }));
    }

    #[test]
    fn out_of_range_size_fails_fast() {
        let config = MapConfig::new(9, 100);
        assert!(matches!(generate(config), Err(AppError::Map(_))));
    }
}
