//! Procedural voxel tree generator
//!
//! Generates MagicaVoxel .vox tree models from a style preset or a
//! JSON parameter file.
//!
//! Usage:
//!     voxtree [OPTIONS] <OUTPUT>
//!
//! Options:
//!     -s, --style <STYLE>     Tree style: tree or pine (default: tree)
//!     -n, --count <N>         Number of trees to generate (default: 1)
//!     --seed <SEED>           RNG seed in 1..=9999 (default: 1)
//!     --params <FILE>         JSON parameter file (overrides --style)
//!     --palette <FILE>        256-color palette PNG (default: built-in)
//!     -h, --help              Show this help message

use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use voxtree::generation::{TreeGenerator, TreeParams, TreeStyle};
use voxtree::vox;
use voxtree::voxel::{Palette, PaletteIndexMap};

fn print_help() {
    eprintln!("voxtree - Procedural voxel tree generator");
    eprintln!();
    eprintln!("Usage: voxtree [OPTIONS] <OUTPUT>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -s, --style <STYLE>     Tree style: tree or pine (default: tree)");
    eprintln!("    -n, --count <N>         Number of trees to generate (default: 1)");
    eprintln!("    --seed <SEED>           RNG seed in 1..=9999 (default: 1)");
    eprintln!("    --params <FILE>         JSON parameter file (overrides --style)");
    eprintln!("    --palette <FILE>        256-color palette PNG (default: built-in)");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("With --count above 1, successive seeds are used and each model is");
    eprintln!("written next to OUTPUT as <stem>_<seed>.vox.");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    voxtree -s pine --seed 42 out/pine.vox");
    eprintln!("    voxtree -n 10 --seed 100 out/tree.vox");
}

#[derive(Debug)]
struct Args {
    output: PathBuf,
    style: TreeStyle,
    seed: Option<u64>,
    count: u32,
    params_file: Option<PathBuf>,
    palette_file: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        return Err("Missing output path".to_string());
    }

    let mut style = TreeStyle::Broadleaf;
    let mut seed: Option<u64> = None;
    let mut count: u32 = 1;
    let mut params_file: Option<PathBuf> = None;
    let mut palette_file: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-s" | "--style" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --style".to_string());
                }
                style = match args[i].to_lowercase().as_str() {
                    "tree" | "broadleaf" => TreeStyle::Broadleaf,
                    "pine" | "conifer" => TreeStyle::Conifer,
                    other => return Err(format!("Unknown style: {}. Valid styles: tree, pine", other)),
                };
            }
            "-n" | "--count" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --count".to_string());
                }
                count = args[i].parse().map_err(|_| format!("Invalid count: {}", args[i]))?;
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --seed".to_string());
                }
                seed = Some(args[i].parse().map_err(|_| format!("Invalid seed: {}", args[i]))?);
            }
            "--params" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --params".to_string());
                }
                params_file = Some(PathBuf::from(&args[i]));
            }
            "--palette" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --palette".to_string());
                }
                palette_file = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            path => {
                if output.is_some() {
                    return Err("Multiple output paths specified".to_string());
                }
                output = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let output = output.ok_or("Missing output path")?;

    Ok(Args {
        output,
        style,
        seed,
        count,
        params_file,
        palette_file,
    })
}

fn load_params(path: &Path) -> Result<TreeParams, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("invalid parameter file {}: {}", path.display(), e))
}

/// Generate `count` trees on successive seeds, in parallel.
fn generate_batch(
    output: &Path,
    params: &TreeParams,
    count: u32,
    palette: &Palette,
    slots: &PaletteIndexMap,
) -> voxtree::core::types::Result<()> {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("tree")
        .to_string();
    let dir = output.parent().map(Path::to_path_buf).unwrap_or_default();
    let base = params.seed.clamp(1, 9999);

    log::info!("Generating {} trees from base seed {}...", count, base);

    (0..count).into_par_iter().try_for_each(|i| {
        // Successive seeds wrap within the valid range
        let seed = (base - 1 + i as u64) % 9999 + 1;
        let generator = TreeGenerator::new(TreeParams { seed, ..params.clone() });
        let bytes = generator.generate(palette, slots);
        let path = dir.join(format!("{}_{:04}.vox", stem, seed));
        log::debug!("Writing {}", path.display());
        vox::write(&path, &bytes)
    })
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    voxtree::core::logging::init();

    let mut params = match &args.params_file {
        Some(path) => match load_params(path) {
            Ok(params) => params,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => TreeParams::from_style(args.style),
    };
    if let Some(seed) = args.seed {
        params.seed = seed;
    }

    let (palette, slots) = match &args.palette_file {
        Some(path) => match Palette::from_png(path) {
            Ok(palette) => {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                (palette, PaletteIndexMap::for_palette(name))
            }
            Err(e) => {
                eprintln!("Error loading palette {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => (Palette::builtin(), PaletteIndexMap::default()),
    };

    println!("Voxel Tree Generator");
    println!("====================");
    println!("Output: {}", args.output.display());
    println!("Style: {:?}", params.style);
    println!("Seed: {}", params.seed);
    println!("Count: {}", args.count);
    println!();

    let start = Instant::now();

    let result = if args.count <= 1 {
        let generator = TreeGenerator::new(params);
        let bytes = generator.generate(&palette, &slots);
        vox::write(&args.output, &bytes)
    } else {
        generate_batch(&args.output, &params, args.count, &palette, &slots)
    };

    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }

    let elapsed = start.elapsed();
    println!("Summary:");
    println!("  Trees generated: {}", args.count.max(1));
    println!("  Total time: {:.2}s", elapsed.as_secs_f64());
    println!("  Output: {}", args.output.display());
}
