//! Command-line interface implementation

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::codec::{decode_tile_set, encode_tile_set};
use crate::import::{import_image, ImportOptions};
use crate::optimize::optimize;
use crate::palette::{Palette, PaletteList};
use crate::palettes;
use crate::snapshot::Project;
use crate::system::System;
use crate::tilemap::TileMapList;

/// Exit codes
const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Tilegfx - tile graphics codecs and bundle optimizer for 8-bit consoles
#[derive(Parser)]
#[command(name = "tilegfx")]
#[command(about = "Tilegfx - tile graphics codecs and bundle optimizer for 8-bit consoles")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encode a project's tile set to the system's binary tile format
    Encode {
        /// Input project JSON file
        input: PathBuf,

        /// Output binary file
        #[arg(short, long)]
        output: PathBuf,

        /// Run the bundle optimizer before encoding
        #[arg(long)]
        optimise: bool,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Decode a binary tile buffer into a project JSON file
    Decode {
        /// Input binary file of concatenated encoded tiles
        input: PathBuf,

        /// Target system tag: ms, gg, gb or nes
        #[arg(short, long)]
        system: String,

        /// Output project JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Tile set width in tiles (1-64, default: 8)
        #[arg(long, default_value = "8", value_parser = clap::value_parser!(u8).range(1..=64))]
        columns: u8,
    },
    /// Import an image into a tile project via colour quantization
    Import {
        /// Input image file (PNG etc.)
        input: PathBuf,

        /// Target system tag: ms, gg, gb or nes
        #[arg(short, long)]
        system: String,

        /// Output project JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Match against a built-in hardware palette instead of deriving
        /// colours freely (master-system, game-boy, nes)
        #[arg(long)]
        match_palette: Option<String>,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Optimize a project into a minimal deduplicated bundle
    Optimize {
        /// Input project JSON file
        input: PathBuf,

        /// Output project JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { input, output, optimise, strict } => {
            run_encode(&input, &output, optimise, strict)
        }
        Commands::Decode { input, system, output, columns } => {
            run_decode(&input, &system, &output, columns)
        }
        Commands::Import { input, system, output, match_palette, strict } => {
            run_import(&input, &system, &output, match_palette.as_deref(), strict)
        }
        Commands::Optimize { input, output, strict } => run_optimize(&input, &output, strict),
    }
}

/// Load a project document, reporting failures as invalid-args
fn load_project(input: &Path) -> Result<Project, ExitCode> {
    let json = fs::read_to_string(input).map_err(|e| {
        eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    Project::from_json(&json).map_err(|e| {
        eprintln!("Error: Cannot parse '{}': {}", input.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Print warnings, or fail on them in strict mode
fn report_warnings(warnings: &[String], strict: bool) -> Result<(), ExitCode> {
    if strict && !warnings.is_empty() {
        for warning in warnings {
            eprintln!("Error: {}", warning);
        }
        return Err(ExitCode::from(EXIT_ERROR));
    }
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    Ok(())
}

fn parse_system(tag: &str) -> Result<System, ExitCode> {
    tag.parse::<System>().map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

fn run_encode(input: &Path, output: &Path, optimise: bool, strict: bool) -> ExitCode {
    let project = match load_project(input) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let tile_set = if optimise {
        let bundle = optimize(&project.tile_maps, &project.tile_set, &project.palettes);
        if let Err(code) = report_warnings(&bundle.warnings, strict) {
            return code;
        }
        bundle.tile_set
    } else {
        project.tile_set
    };

    let bytes = encode_tile_set(project.system, &tile_set);
    if let Err(e) = fs::write(output, &bytes) {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {} ({} tiles, {} bytes)", output.display(), tile_set.len(), bytes.len());
    ExitCode::from(EXIT_SUCCESS)
}

fn run_decode(input: &Path, system: &str, output: &Path, columns: u8) -> ExitCode {
    let system = match parse_system(system) {
        Ok(s) => s,
        Err(code) => return code,
    };
    let bytes = match fs::read(input) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: Cannot open input file '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let tile_set = match decode_tile_set(system, &bytes, columns as usize) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "decoded".to_string());
    let mut palettes = PaletteList::new();
    palettes.add(Palette::new("palette0", title.clone(), system));
    let tile_count = tile_set.len();
    let project = Project {
        title,
        system,
        tile_set,
        tile_maps: TileMapList::new(),
        palettes,
    };

    match save_project(&project, output) {
        Ok(()) => {
            println!("Saved: {} ({} tiles)", output.display(), tile_count);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(code) => code,
    }
}

fn run_import(
    input: &Path,
    system: &str,
    output: &Path,
    match_palette: Option<&str>,
    strict: bool,
) -> ExitCode {
    let system = match parse_system(system) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let mut options = ImportOptions::new(system);
    options.title = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "imported".to_string());
    if let Some(name) = match_palette {
        match palettes::get_builtin(name) {
            Some(table) => options.match_palette = Some(table.to_vec()),
            None => {
                eprintln!(
                    "Error: Built-in palette '{}' not found, available: {}",
                    name,
                    palettes::list_builtins().join(", ")
                );
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    let result = match import_image(input, &options) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(code) = report_warnings(&result.warnings, strict) {
        return code;
    }

    match save_project(&result.project, output) {
        Ok(()) => {
            println!(
                "Saved: {} ({} tiles, {} colours)",
                output.display(),
                result.project.tile_set.len(),
                result.project.palettes.get(0).map_or(0, |p| p.colours().len())
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(code) => code,
    }
}

fn run_optimize(input: &Path, output: &Path, strict: bool) -> ExitCode {
    let project = match load_project(input) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let bundle = optimize(&project.tile_maps, &project.tile_set, &project.palettes);
    if let Err(code) = report_warnings(&bundle.warnings, strict) {
        return code;
    }

    let before = project.tile_set.len();
    let optimized = Project {
        title: project.title,
        system: project.system,
        tile_set: bundle.tile_set,
        tile_maps: bundle.tile_maps,
        palettes: bundle.palettes,
    };

    match save_project(&optimized, output) {
        Ok(()) => {
            println!(
                "Saved: {} ({} -> {} tiles)",
                output.display(),
                before,
                optimized.tile_set.len()
            );
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(code) => code,
    }
}

fn save_project(project: &Project, output: &Path) -> Result<(), ExitCode> {
    let json = project.to_json().map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    fs::write(output, json).map_err(|e| {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}
