use crate::core::io::format::{StructureReadError, read_atoms};
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::grid::VoxelGrid;
use crate::engine::config::{ConfigError, VoxelizationConfig};
use crate::engine::error::VoxelError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::voxelizer::VoxelGridBuilder;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read structure '{path}': {source}", path = path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: StructureReadError,
    },

    #[error("Failed to voxelize '{path}': {source}", path = path.display())]
    Voxelize {
        path: PathBuf,
        #[source]
        source: VoxelError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSummary {
    pub element: Element,
    /// Atoms of this element in the input.
    pub atoms: usize,
    /// Cells set in this channel. At most `atoms`.
    pub occupied_cells: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoxelizationSummary {
    pub total_atoms: usize,
    /// Atoms whose element has no channel.
    pub skipped_atoms: usize,
    pub element_counts: BTreeMap<Element, usize>,
    pub channels: Vec<ChannelSummary>,
}

#[derive(Debug, Clone)]
pub struct VoxelizationResult {
    pub source: PathBuf,
    pub grid: VoxelGrid,
    pub summary: VoxelizationSummary,
}

impl VoxelizationSummary {
    /// Symbols of elements present in the structure but not tracked.
    pub fn untracked_elements(&self, tracked: &[Element]) -> Vec<String> {
        self.element_counts
            .keys()
            .filter(|e| !tracked.contains(e))
            .map(|e| e.to_string())
            .collect()
    }
}

pub fn count_elements(atoms: &[Atom]) -> BTreeMap<Element, usize> {
    atoms.iter().map(|a| a.element).counts().into_iter().collect()
}

/// Per-channel and skipped-atom statistics for a grid built from `atoms`.
pub fn summarize(atoms: &[Atom], grid: &VoxelGrid) -> VoxelizationSummary {
    let element_counts = count_elements(atoms);
    let channels: Vec<ChannelSummary> = grid
        .channels()
        .iter()
        .enumerate()
        .map(|(channel, &element)| ChannelSummary {
            element,
            atoms: element_counts.get(&element).copied().unwrap_or(0),
            occupied_cells: grid.occupied_count(channel),
        })
        .collect();
    let tracked_atoms: usize = channels.iter().map(|c| c.atoms).sum();

    VoxelizationSummary {
        total_atoms: atoms.len(),
        skipped_atoms: atoms.len() - tracked_atoms,
        element_counts,
        channels,
    }
}

/// Voxelizes atoms that are already in memory.
pub fn voxelize_atoms(
    source: &Path,
    atoms: &[Atom],
    config: &VoxelizationConfig,
) -> Result<VoxelizationResult, WorkflowError> {
    let grid = VoxelGridBuilder::from_config(config)
        .build(atoms)
        .map_err(|source_err| WorkflowError::Voxelize {
            path: source.to_path_buf(),
            source: source_err,
        })?;
    let summary = summarize(atoms, &grid);

    if summary.skipped_atoms > 0 {
        warn!(
            file = %source.display(),
            skipped = summary.skipped_atoms,
            elements = %summary.untracked_elements(&config.tracked_elements).join(","),
            "Skipped atoms with untracked elements."
        );
    }

    Ok(VoxelizationResult {
        source: source.to_path_buf(),
        grid,
        summary,
    })
}

/// Reads one structure file and builds its occupancy grid.
#[instrument(skip_all, name = "voxelize_workflow", fields(path = %path.display()))]
pub fn run(
    path: &Path,
    config: &VoxelizationConfig,
    reporter: &ProgressReporter,
) -> Result<VoxelizationResult, WorkflowError> {
    config.validate()?;
    let name = path.display().to_string();
    reporter.report(Progress::FileStart { name: name.clone() });

    let atoms = read_atoms(path).map_err(|source| WorkflowError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(num_atoms = atoms.len(), "Structure loaded.");

    let result = voxelize_atoms(path, &atoms, config)?;

    if result.summary.skipped_atoms > 0 {
        reporter.report(Progress::Message(format!(
            "{}: skipped {} atom(s) of untracked elements ({})",
            name,
            result.summary.skipped_atoms,
            result
                .summary
                .untracked_elements(&config.tracked_elements)
                .join(",")
        )));
    }

    reporter.report(Progress::FileFinish {
        name,
        occupied_cells: result.grid.total_occupied(),
    });
    Ok(result)
}

/// Voxelizes every file independently. A failing file produces an `Err`
/// entry in its slot and does not stop the others. Results keep input order.
#[instrument(skip_all, name = "voxelize_batch_workflow", fields(num_files = paths.len()))]
pub fn run_batch(
    paths: &[PathBuf],
    config: &VoxelizationConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<Result<VoxelizationResult, WorkflowError>>, WorkflowError> {
    config.validate()?;
    reporter.report(Progress::BatchStart {
        total_files: paths.len() as u64,
    });

    let process = |path: &PathBuf| {
        let outcome = run(path, config, reporter);
        if let Err(e) = &outcome {
            reporter.report(Progress::FileFailed {
                name: path.display().to_string(),
                reason: e.to_string(),
            });
        }
        outcome
    };

    #[cfg(not(feature = "parallel"))]
    let iterator = paths.iter();

    #[cfg(feature = "parallel")]
    let iterator = paths.par_iter();

    let results: Vec<_> = iterator.map(process).collect();

    reporter.report(Progress::BatchFinish);
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        succeeded = results.len() - failed,
        failed, "Batch voxelization complete."
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::VoxelizationConfigBuilder;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    const PEPTIDE_PDB: &str = "\
ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  GLY A   1       1.450   0.000   0.000  1.00  0.00           C
ATOM      3  C   GLY A   1       2.000   1.400   0.000  1.00  0.00           C
ATOM      4  O   GLY A   1       1.300   2.400   0.000  1.00  0.00           O
ATOM      5  H   GLY A   1      -0.500  -0.800   0.000  1.00  0.00           H
END
";

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn run_reads_voxelizes_and_summarizes() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "gly.pdb", PEPTIDE_PDB);

        let result = run(&path, &VoxelizationConfig::default(), &ProgressReporter::new()).unwrap();

        assert_eq!(result.source, path);
        assert_eq!(result.grid.shape(), [4, 5, 1, 4]);
        assert_eq!(result.summary.total_atoms, 5);
        assert_eq!(result.summary.skipped_atoms, 1);
        assert_eq!(result.summary.element_counts[&Element::C], 2);
        assert_eq!(
            result.summary.channels[0],
            ChannelSummary {
                element: Element::C,
                atoms: 2,
                occupied_cells: 2
            }
        );
        assert_eq!(result.summary.channels[3].atoms, 0);
        assert_eq!(result.summary.channels[3].occupied_cells, 0);
    }

    #[test]
    fn run_rejects_invalid_config_before_reading() {
        let config = VoxelizationConfig {
            tracked_elements: vec![],
            voxel_size: 1.0,
        };
        let result = run(Path::new("does-not-exist.pdb"), &config, &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(WorkflowError::Config(ConfigError::NoTrackedElements))
        ));
    }

    #[test]
    fn run_wraps_read_errors_with_path() {
        let err = run(
            Path::new("missing.pdb"),
            &VoxelizationConfig::default(),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Read { .. }));
        assert!(err.to_string().contains("missing.pdb"));
    }

    #[test]
    fn voxelize_atoms_reports_empty_input() {
        let err = voxelize_atoms(Path::new("mem"), &[], &VoxelizationConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Voxelize {
                source: VoxelError::EmptyInput,
                ..
            }
        ));
    }

    #[test]
    fn summarize_counts_atoms_per_channel() {
        let atoms = vec![
            Atom::at(Element::C, 0.0, 0.0, 0.0),
            Atom::at(Element::C, 0.1, 0.1, 0.1),
            Atom::at(Element::O, 3.0, 0.0, 0.0),
            Atom::at(Element::Zn, 1.0, 1.0, 1.0),
        ];
        let config = VoxelizationConfigBuilder::new()
            .tracked_elements(vec![Element::C, Element::O])
            .build()
            .unwrap();
        let grid = VoxelGridBuilder::from_config(&config).build(&atoms).unwrap();
        let summary = summarize(&atoms, &grid);

        assert_eq!(summary.skipped_atoms, 1);
        assert_eq!(summary.channels[0].atoms, 2);
        assert_eq!(summary.channels[0].occupied_cells, 1);
        assert_eq!(summary.channels[1].occupied_cells, 1);
        assert_eq!(summary.element_counts.get(&Element::Zn), Some(&1));
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let dir = tempdir().unwrap();
        let good = write_file(&dir, "a.pdb", PEPTIDE_PDB);
        let bad = write_file(&dir, "b.pdb", "HEADER ONLY\n");
        let mol2 = write_file(&dir, "c.mol2", "@<TRIPOS>ATOM\n 1 S1 0.0 0.0 0.0 S.3\n");

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));

        let results = run_batch(
            &[good.clone(), bad.clone(), mol2.clone()],
            &VoxelizationConfig::default(),
            &reporter,
        )
        .unwrap();
        drop(reporter);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().source, good);
        assert!(matches!(results[1], Err(WorkflowError::Read { .. })));
        assert_eq!(results[2].as_ref().unwrap().grid.shape(), [1, 1, 1, 4]);

        let events = events.into_inner().unwrap();
        assert_eq!(events.first(), Some(&Progress::BatchStart { total_files: 3 }));
        assert_eq!(events.last(), Some(&Progress::BatchFinish));
        let failures = events
            .iter()
            .filter(|e| matches!(e, Progress::FileFailed { .. }))
            .count();
        assert_eq!(failures, 1);
    }

    #[test]
    fn run_reports_skipped_untracked_atoms() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "gly.pdb", PEPTIDE_PDB);

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        run(&path, &VoxelizationConfig::default(), &reporter).unwrap();
        drop(reporter);

        let messages: Vec<String> = events
            .into_inner()
            .unwrap()
            .into_iter()
            .filter_map(|e| match e {
                Progress::Message(msg) => Some(msg),
                _ => None,
            })
            .collect();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].ends_with("gly.pdb: skipped 1 atom(s) of untracked elements (H)"));
    }

    #[test]
    fn fully_tracked_structure_emits_no_message() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "s.mol2", "@<TRIPOS>ATOM\n 1 S1 0.0 0.0 0.0 S.3\n");

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        run(&path, &VoxelizationConfig::default(), &reporter).unwrap();
        drop(reporter);

        assert!(
            !events
                .into_inner()
                .unwrap()
                .iter()
                .any(|e| matches!(e, Progress::Message(_)))
        );
    }
}
