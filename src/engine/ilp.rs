// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! ILP solver artifact emission.
//!
//! The external solver consumes four whitespace-separated text files: a
//! tensor size vector and one binary occupancy matrix per scratchpad. The
//! matrices encode the initial slot assignment (inputs on pads 0 and 1, the
//! output on pad 2), row `i` describing schedule step `i`. The formats are
//! frozen; do not change the separators or the file names.
//!
//! Artifacts are rendered in memory first and written in one pass. If any
//! write fails, files already written are removed so callers never observe a
//! partial artifact set.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BackendConfig;
use crate::engine::Schedule;
use crate::errors::ArtifactError;
use crate::graph::{Network, TensorId};
use crate::observability::messages::artifact::{ArtifactsDiscarded, ArtifactsWritten};
use crate::observability::messages::StructuredLog;

const SIZE_FILE: &str = "sizeFile.txt";
const MATRIX_FILES: [&str; 3] = ["matrixFile0.txt", "matrixFile1.txt", "matrixFile2.txt"];

/// In-memory form of the solver artifacts.
///
/// `matrices[s][i][j]` is 1 iff tensor `j` occupies scratchpad `s` at step
/// `i` under the initial assignment. `sizes[j]` is the tensor's storage in
/// bytes, clamped at the scratchpad capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IlpArtifacts {
    pub sizes: Vec<u64>,
    pub matrices: [Vec<Vec<u8>>; 3],
}

/// Builds and writes the ILP solver artifacts.
pub struct IlpMatrixEmitter<'a> {
    network: &'a Network,
    schedule: &'a Schedule,
    config: &'a BackendConfig,
}

impl<'a> IlpMatrixEmitter<'a> {
    pub fn new(network: &'a Network, schedule: &'a Schedule, config: &'a BackendConfig) -> Self {
        Self {
            network,
            schedule,
            config,
        }
    }

    /// Build the occupancy matrices and the clamped size vector.
    ///
    /// Tensor ids are assigned by first appearance across the schedule's
    /// concatenated `inputs ++ outputs` lists, so the numbering is a pure
    /// function of the schedule.
    pub fn build(&self) -> IlpArtifacts {
        let mut ids: HashMap<TensorId, usize> = HashMap::new();
        let mut numbered: Vec<TensorId> = Vec::new();
        let mut slots_per_step: Vec<Vec<TensorId>> = Vec::with_capacity(self.schedule.len());

        for (_, op_id) in self.schedule.iter() {
            let op = self.network.operator(op_id);
            let slots: Vec<TensorId> = op
                .inputs()
                .iter()
                .chain(op.outputs().iter())
                .copied()
                .collect();
            for &tensor in &slots {
                if !ids.contains_key(&tensor) {
                    ids.insert(tensor, numbered.len());
                    numbered.push(tensor);
                }
            }
            slots_per_step.push(slots);
        }

        let steps = self.schedule.len();
        let tensor_count = numbered.len();
        let empty_row = vec![0u8; tensor_count];
        let mut matrices: [Vec<Vec<u8>>; 3] = [
            vec![empty_row.clone(); steps],
            vec![empty_row.clone(); steps],
            vec![empty_row; steps],
        ];

        for (step, slots) in slots_per_step.iter().enumerate() {
            match slots.len() {
                0 => {}
                // A producer with no inputs only occupies the output pad
                1 => matrices[2][step][ids[&slots[0]]] = 1,
                // One input and one output: first slot to pad 0, last to
                // pad 2, pad 1 stays empty
                2 => {
                    matrices[0][step][ids[&slots[0]]] = 1;
                    matrices[2][step][ids[&slots[1]]] = 1;
                }
                _ => {
                    for (pad, &tensor) in slots.iter().take(3).enumerate() {
                        matrices[pad][step][ids[&tensor]] = 1;
                    }
                }
            }
        }

        let sizes = numbered
            .iter()
            .map(|&t| {
                self.network
                    .tensor(t)
                    .storage_bytes()
                    .min(self.config.spm_capacity)
            })
            .collect();

        IlpArtifacts { sizes, matrices }
    }

    /// Write all four artifacts into `directory`.
    ///
    /// The directory must already exist; the planner never creates it.
    pub fn write(&self, directory: &Path) -> Result<IlpArtifacts, ArtifactError> {
        if !directory.is_dir() {
            return Err(ArtifactError::MissingDirectory {
                path: directory.to_path_buf(),
            });
        }

        let artifacts = self.build();
        let mut rendered: Vec<(PathBuf, String)> = Vec::with_capacity(4);
        rendered.push((directory.join(SIZE_FILE), render_sizes(&artifacts.sizes)));
        for (pad, file) in MATRIX_FILES.iter().enumerate() {
            rendered.push((directory.join(file), render_matrix(&artifacts.matrices[pad])));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(rendered.len());
        for (path, content) in &rendered {
            if let Err(source) = fs::write(path, content) {
                ArtifactsDiscarded {
                    directory,
                    written: written.len(),
                }
                .log();
                for stale in &written {
                    // Cleanup is best-effort; the original error is what
                    // the caller needs to see
                    let _ = fs::remove_file(stale);
                }
                return Err(ArtifactError::Write {
                    path: path.clone(),
                    source,
                });
            }
            written.push(path.clone());
        }

        ArtifactsWritten {
            directory,
            steps: self.schedule.len(),
            tensor_count: artifacts.sizes.len(),
        }
        .log();

        Ok(artifacts)
    }
}

/// Single line, every size followed by one space.
fn render_sizes(sizes: &[u64]) -> String {
    let mut out = String::new();
    for size in sizes {
        out.push_str(&size.to_string());
        out.push(' ');
    }
    out
}

/// One line per schedule step, every cell followed by one space.
fn render_matrix(matrix: &[Vec<u8>]) -> String {
    let mut out = String::new();
    for row in matrix {
        for cell in row {
            out.push_str(&cell.to_string());
            out.push(' ');
        }
        out.push('\n');
    }
    out
}
