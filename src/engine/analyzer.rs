// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The static graph analyzer: orchestration of the planning passes.
//!
//! A planning pass runs, in order: the tiling hook, the scheduler, the
//! liveness builder, the pin planner, both validation phases, the
//! scratchpad status timeline, and finally artifact emission. The analyzer
//! owns every intermediate structure for the lifetime of the pass and
//! rebuilds all of them from scratch on each run, so planning twice over
//! the same graph produces identical results.
//!
//! The pass is strictly single-threaded and performs no I/O other than the
//! final artifact write. On any failure the analyzer discards partial state:
//! queries only ever observe the output of a fully successful pass.

use std::collections::HashMap;
use std::path::Path;

use crate::config::BackendConfig;
use crate::engine::ilp::IlpMatrixEmitter;
use crate::engine::liveness::{LivenessBuilder, LivenessRecord};
use crate::engine::pin_planner::collect_candidates;
use crate::engine::pin_validator::PinValidator;
use crate::engine::spm_manager::SpmManager;
use crate::engine::spm_mapper::{SpmAssignment, SpmMapper};
use crate::engine::spm_status::{build_timeline, SpmStatus};
use crate::engine::{topological_schedule, PinTable, Schedule};
use crate::errors::{AnalysisError, PlanError};
use crate::graph::{Network, OpId, TensorId};
use crate::observability::messages::analysis::{
    AnalysisStarted, BuildOrderCompared, LivenessRecorded, PlanCompleted, ScheduleBuilt,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Tiler;

/// Everything one successful pass produces. Dry runs stop after liveness
/// and carry no pin state.
struct PassState {
    schedule: Schedule,
    liveness: HashMap<TensorId, LivenessRecord>,
    pins: Option<PinState>,
}

struct PinState {
    table: PinTable,
    timeline: Vec<Vec<SpmStatus>>,
    manager: SpmManager,
}

/// Static analyzer and scratchpad-pinning planner for one network.
///
/// An analyzer instance owns its intermediate state and is not safe for
/// concurrent reuse. Instances over disjoint networks share nothing and may
/// run side by side.
pub struct GraphAnalyzer<'a> {
    network: &'a Network,
    config: BackendConfig,
    state: Option<PassState>,
}

impl<'a> GraphAnalyzer<'a> {
    pub fn new(network: &'a Network, config: BackendConfig) -> Self {
        Self {
            network,
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Full planning pass: analyze the graph and write the ILP artifacts
    /// into `map_path`. The directory must already exist.
    pub fn plan(&mut self, tiler: &mut dyn Tiler, map_path: &Path) -> Result<(), PlanError> {
        self.state = None;
        let mut pass = self.profile(tiler)?;
        pass.pins = Some(self.plan_pins(&pass)?);

        IlpMatrixEmitter::new(self.network, &pass.schedule, &self.config).write(map_path)?;

        self.log_completion(&pass);
        self.state = Some(pass);
        Ok(())
    }

    /// Alternative finisher for callers that will not invoke an external
    /// solver: analyze the graph, then search for a scratchpad assignment
    /// in process.
    pub fn map_with_search(
        &mut self,
        tiler: &mut dyn Tiler,
    ) -> Result<SpmAssignment, AnalysisError> {
        self.state = None;
        let mut pass = self.profile(tiler)?;
        pass.pins = Some(self.plan_pins(&pass)?);
        let assignment = self.build_mapper(&pass.schedule).solve();

        self.log_completion(&pass);
        self.state = Some(pass);
        Ok(assignment)
    }

    /// Schedule and profile the network without planning any pins or
    /// touching disk. Leaves the schedule and liveness queryable.
    pub fn dry_run(&mut self, tiler: &mut dyn Tiler) -> Result<(), AnalysisError> {
        self.state = None;
        let pass = self.profile(tiler)?;
        self.state = Some(pass);
        Ok(())
    }

    fn log_completion(&self, pass: &PassState) {
        PlanCompleted {
            steps: pass.schedule.len(),
            pinned_total: pass
                .pins
                .as_ref()
                .map(|p| p.table.total_pins())
                .unwrap_or(0),
        }
        .log();
    }

    /// Tile, schedule and build liveness: the shared front half of every
    /// pass.
    fn profile(&self, tiler: &mut dyn Tiler) -> Result<PassState, AnalysisError> {
        AnalysisStarted {
            network: self.network.name(),
            operator_count: self.network.op_count(),
        }
        .log();

        // Tiling is delegated; the hook sees every operator once, in
        // insertion order, before scheduling.
        for op_id in self.network.build_order() {
            tiler.tile(self.network.operator(op_id));
        }

        let schedule = topological_schedule(self.network)?;
        ScheduleBuilt {
            steps: schedule.len(),
        }
        .log();

        let build_order: Vec<OpId> = self.network.build_order().collect();
        BuildOrderCompared {
            steps: schedule.len(),
            matches_build_order: schedule.order() == build_order.as_slice(),
        }
        .log();

        let liveness = LivenessBuilder::build(self.network, &schedule);
        LivenessRecorded {
            tensor_count: liveness.len(),
        }
        .log();

        Ok(PassState {
            schedule,
            liveness,
            pins: None,
        })
    }

    /// Pin planning and validation: the back half of a full pass.
    fn plan_pins(&self, pass: &PassState) -> Result<PinState, AnalysisError> {
        let mut table = collect_candidates(self.network, &pass.schedule);
        PinValidator::new(self.network, &pass.schedule, &pass.liveness, &self.config)
            .validate(&mut table)?;

        let timeline = build_timeline(self.network, &pass.schedule, &self.config);
        let manager = SpmManager::from_plan(self.network, &pass.schedule, &table, &self.config);

        Ok(PinState {
            table,
            timeline,
            manager,
        })
    }

    fn build_mapper(&self, schedule: &Schedule) -> SpmMapper {
        let mut input_sizes = Vec::with_capacity(schedule.len());
        let mut output_sizes = Vec::with_capacity(schedule.len());
        for (_, op_id) in schedule.iter() {
            let op = self.network.operator(op_id);
            input_sizes.push(
                op.inputs()
                    .iter()
                    .map(|&t| self.network.tensor(t).storage_bytes())
                    .collect::<Vec<u64>>(),
            );
            output_sizes.push(
                op.outputs()
                    .first()
                    .map(|&t| self.network.tensor(t).storage_bytes())
                    .unwrap_or(0),
            );
        }

        // step -> downstream steps reusing the step's output as an input
        let mut reuse_edges: Vec<Vec<usize>> = vec![Vec::new(); schedule.len()];
        for (step, op_id) in schedule.iter() {
            if let Some(&output) = self.network.operator(op_id).outputs().first() {
                for (later, later_id) in schedule.iter().skip(step + 1) {
                    if self.network.operator(later_id).inputs().contains(&output) {
                        reuse_edges[step].push(later);
                    }
                }
            }
        }

        SpmMapper::new(
            self.config.spm_capacity,
            input_sizes,
            output_sizes,
            reuse_edges,
        )
    }

    /// The schedule of the last successful pass.
    pub fn schedule(&self) -> Option<&Schedule> {
        self.state.as_ref().map(|s| &s.schedule)
    }

    /// Step-indexed pin assignments of the last successful pass.
    pub fn pin_map(&self) -> Option<&PinTable> {
        self.pins().map(|p| &p.table)
    }

    /// Name-keyed pin assignments of the last successful pass.
    pub fn pin_map_by_name(&self) -> Option<&HashMap<String, Vec<TensorId>>> {
        self.pins().map(|p| p.table.by_name())
    }

    fn pins(&self) -> Option<&PinState> {
        self.state.as_ref().and_then(|s| s.pins.as_ref())
    }

    /// Liveness profile of one tensor.
    pub fn liveness(&self, tensor: TensorId) -> Result<&LivenessRecord, AnalysisError> {
        self.state
            .as_ref()
            .and_then(|s| s.liveness.get(&tensor))
            .ok_or_else(|| AnalysisError::UnknownTensor {
                tensor: self.network.tensor(tensor).name().to_string(),
            })
    }

    /// Scratchpad occupancy at one step under the initial slot assignment.
    pub fn spm_status(&self, step: usize) -> Option<&[SpmStatus]> {
        self.pins()
            .and_then(|p| p.timeline.get(step))
            .map(|pads| pads.as_slice())
    }

    /// Runtime lookup snapshot of the last successful pass.
    pub fn spm_manager(&self) -> Option<&SpmManager> {
        self.pins().map(|p| &p.manager)
    }

    /// Graph insertion order, for comparison against the schedule.
    pub fn build_order(&self) -> Vec<OpId> {
        self.network.build_order().collect()
    }
}
