use crate::cli::VoxelizeArgs;
use crate::config::{AppConfig, PartialConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use itertools::Itertools;
use molvox::{
    core::io::{
        npy::{self, GridLayout},
        voxels,
    },
    engine::progress::ProgressReporter,
    workflows::voxelize::{self, VoxelizationResult},
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn run(args: VoxelizeArgs) -> Result<()> {
    let partial_config = PartialConfig::load(&args.grid)?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args.grid, args.channels_first)?;

    match args.input.as_slice() {
        [] => Err(CliError::Argument(
            "At least one input structure is required.".to_string(),
        )),
        [single] => run_single(single, &args, &config),
        many => run_batch(many, &args, &config),
    }
}

fn layout_for(config: &AppConfig) -> GridLayout {
    if config.channels_first {
        GridLayout::ChannelsFirst
    } else {
        GridLayout::ChannelsLast
    }
}

fn run_single(input: &Path, args: &VoxelizeArgs, config: &AppConfig) -> Result<()> {
    info!("Voxelizing {:?}", input);
    let result = voxelize::run(input, &config.core, &ProgressReporter::new())?;

    write_outputs(&result, &args.output, args.voxels_csv.as_deref(), config)?;
    print_summary(&result, &args.output);
    Ok(())
}

fn run_batch(inputs: &[PathBuf], args: &VoxelizeArgs, config: &AppConfig) -> Result<()> {
    let stems: Vec<String> = inputs.iter().map(|input| file_stem(input)).collect();
    if let Some(stem) = stems.iter().duplicates().next() {
        return Err(CliError::Argument(format!(
            "Several inputs are named '{}'; their grids would all be written to '{}.npy'. \
             Rename them or voxelize them in separate runs.",
            stem, stem
        )));
    }

    ensure_dir(&args.output)?;
    if let Some(csv_dir) = &args.voxels_csv {
        ensure_dir(csv_dir)?;
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Voxelizing {} structures...", inputs.len());
    let results = voxelize::run_batch(inputs, &config.core, &reporter)?;

    let total = results.len();
    let mut failed = 0;
    for ((input, stem), outcome) in inputs.iter().zip(&stems).zip(results) {
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                warn!("Skipping {:?}: {}", input, e);
                failed += 1;
                continue;
            }
        };

        let npy_path = args.output.join(format!("{}.npy", stem));
        let csv_path = args
            .voxels_csv
            .as_ref()
            .map(|dir| dir.join(format!("{}.voxels.csv", stem)));

        write_outputs(&result, &npy_path, csv_path.as_deref(), config)?;
        print_summary(&result, &npy_path);
    }

    if failed > 0 {
        return Err(CliError::BatchFailed { failed, total });
    }
    Ok(())
}

fn write_outputs(
    result: &VoxelizationResult,
    npy_path: &Path,
    csv_path: Option<&Path>,
    config: &AppConfig,
) -> Result<()> {
    if let Some(parent) = npy_path.parent() {
        ensure_dir(parent)?;
    }

    let layout = layout_for(config);
    info!(?layout, "Writing grid to {:?}", npy_path);
    npy::write_to_path(&result.grid, layout, npy_path).map_err(|e| CliError::Output {
        path: npy_path.to_path_buf(),
        source: e.into(),
    })?;

    if let Some(csv_path) = csv_path {
        let rows =
            voxels::write_occupied_csv_to_path(&result.grid, csv_path).map_err(|e| {
                CliError::Output {
                    path: csv_path.to_path_buf(),
                    source: e.into(),
                }
            })?;
        info!(rows, "Occupied voxels written to {:?}", csv_path);
    }
    Ok(())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    std::fs::create_dir_all(dir).map_err(|e| CliError::Output {
        path: dir.to_path_buf(),
        source: e.into(),
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "structure".to_string())
}

fn print_summary(result: &VoxelizationResult, output: &Path) {
    let [nx, ny, nz, nc] = result.grid.shape();
    println!(
        "✓ {} -> {} (shape {}x{}x{}x{}, {} atoms, {} skipped)",
        result.source.display(),
        output.display(),
        nx,
        ny,
        nz,
        nc,
        result.summary.total_atoms,
        result.summary.skipped_atoms
    );
    for channel in &result.summary.channels {
        println!(
            "    {:<3} {:>6} atoms {:>8} voxels",
            channel.element.symbol(),
            channel.atoms,
            channel.occupied_cells
        );
    }
}
