//! Case execution: geometry, templating, solver, parsing, comparison.

use std::path::{Path, PathBuf};
use std::time::Instant;

use av_core::timing::AccumulatingTimer;
use av_geometry::{GeometryBuilder, ScriptModelApi};
use av_results::{
    IterationRecord, RunReport, RunStore, SolverRecord, compute_run_id, read_load_distribution,
    read_polar,
};
use av_script::{OutputFiles, SolverCommand, SweepInputs, configure_sweep_analysis, template_file};
use tracing::{debug, info};

use crate::case::{CaseDef, Iteration};
use crate::case_service;
use crate::config::{AnalysisDriver, HarnessConfig};
use crate::error::{AppError, AppResult};
use crate::evaluate::{EvalContext, IterationOutput, evaluate_analysis};
use crate::progress::{RunProgressEvent, RunStage};
use crate::references::ReferenceSet;

/// Control script written to the output directory when none is configured.
pub const BUNDLED_SWEEP_SCRIPT: &str = include_str!("../../../scripts/runVSPAEROSweep.vspscript");

/// Options for running a case.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Write the geometry and control scripts but never start the solver.
    pub dry_run: bool,
}

/// Request to execute a case.
pub struct RunRequest<'a> {
    pub case_path: &'a Path,
    pub config: &'a HarnessConfig,
    pub options: RunOptions,
}

#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub solver_time_s: f64,
    pub solver_runs: u64,
    pub total_time_s: f64,
}

/// Response from a case execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub report: RunReport,
    pub report_path: PathBuf,
    pub timing: RunTimingSummary,
}

struct Pipeline<'a> {
    case: &'a CaseDef,
    config: &'a HarnessConfig,
    dry_run: bool,
    iterations: usize,
    started: Instant,
    solver_timer: AccumulatingTimer,
}

impl Pipeline<'_> {
    fn emit(
        &self,
        progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
        stage: RunStage,
        iteration: Option<usize>,
        message: Option<String>,
    ) {
        if let Some(cb) = progress_cb.as_deref_mut() {
            let event = RunProgressEvent::stage(
                stage,
                self.iterations,
                self.started.elapsed().as_secs_f64(),
                message,
            );
            cb(match iteration {
                Some(index) => event.for_iteration(index),
                None => event,
            });
        }
    }

    fn solver(&self, script: &str) -> SolverCommand {
        SolverCommand::new(&self.config.solver, script, &self.config.output_dir)
            .with_exit_policy(self.config.exit_policy)
    }

    fn sweep_inputs(&self, it: &Iteration) -> SweepInputs {
        let flow = &self.case.flow;
        let mut inputs = SweepInputs::default()
            .model_file(&self.case.model_file)
            .alpha_range(it.alpha_start, it.alpha_end, it.alpha_npts)
            .mach(flow.mach.mach())
            .ref_chord(
                flow.ref_chord
                    .unwrap_or_else(|| it.wing.mean_geometric_chord()),
            );
        if let Some(cg) = &flow.cg {
            let (x, y, z) = cg.resolve(&it.wing);
            inputs = inputs.cg(x, y, z);
        }
        inputs
    }

    fn run_iteration(
        &self,
        it: &Iteration,
        progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    ) -> AppResult<(IterationRecord, Option<IterationOutput>)> {
        let config = self.config;
        info!(iteration = %it.label, index = it.index, "iteration");
        self.emit(
            progress_cb,
            RunStage::BuildingGeometry,
            Some(it.index),
            Some(format!("Building {}", it.label)),
        );

        let mut api = ScriptModelApi::new();
        GeometryBuilder::new(&self.case.model_file).build(&mut api, &it.wing)?;
        let inputs = self.sweep_inputs(it);
        let model_script = model_script_name(&self.case.model_file);
        let model_script_path = config.output_dir.join(&model_script);

        let analysis_script = match config.analysis_driver {
            AnalysisDriver::TemplatedScript => {
                api.write_to(&model_script_path)?;
                if !self.dry_run {
                    self.solver(&model_script).run()?;
                }
                self.emit(progress_cb, RunStage::TemplatingScript, Some(it.index), None);
                let touched = template_file(&config.script_path(), &inputs, &config.template)?;
                debug!(lines = touched.len(), "control script templated");
                config.script.clone()
            }
            AnalysisDriver::ModelApi => {
                configure_sweep_analysis(&mut api, &inputs)?;
                api.write_to(&model_script_path)?;
                model_script
            }
        };

        let mut record = IterationRecord {
            label: it.label.clone(),
            swept_value: it.swept_value,
            model_file: self.case.model_file.clone(),
            solver: None,
            polar: None,
        };
        if self.dry_run {
            return Ok((record, None));
        }

        // A failed run must not leave the previous iteration's files behind.
        let files = OutputFiles::for_model(&config.output_dir, &self.case.model_file);
        files.clear_stale()?;

        self.emit(progress_cb, RunStage::RunningSolver, Some(it.index), None);
        let run = self.solver(&analysis_script).run()?;
        self.solver_timer.record(run.elapsed_s);
        record.solver = Some(SolverRecord {
            exit_code: run.code,
            success: run.success,
            elapsed_s: run.elapsed_s,
        });

        self.emit(progress_cb, RunStage::ParsingResults, Some(it.index), None);
        let polar = read_polar(&files.polar, &config.polar)?;
        let load = if self.case.needs_load_distribution() {
            Some(read_load_distribution(
                &files.load_distribution,
                &config.load,
                it.wing.mesh.spanwise_tess,
            )?)
        } else {
            None
        };
        record.polar = Some(polar.clone());

        Ok((
            record,
            Some(IterationOutput {
                iteration: it.clone(),
                polar,
                load,
                solver_s: run.elapsed_s,
            }),
        ))
    }
}

/// `<model base>_model.vspscript`: the script that builds the model.
pub fn model_script_name(model_file: &str) -> String {
    let base = Path::new(model_file)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| model_file.to_string());
    format!("{base}_model.vspscript")
}

/// Put the control script in the output directory.
fn prepare_control_script(config: &HarnessConfig) -> AppResult<PathBuf> {
    let target = config.script_path();
    match &config.script_source {
        Some(source) => {
            std::fs::copy(source, &target).map_err(|e| {
                AppError::Script(format!(
                    "Failed to copy {} to {}: {}",
                    source.display(),
                    target.display(),
                    e
                ))
            })?;
        }
        None if !target.exists() => {
            std::fs::write(&target, BUNDLED_SWEEP_SCRIPT)?;
            debug!(path = %target.display(), "wrote bundled control script");
        }
        None => {}
    }
    Ok(target)
}

/// Execute a case.
pub fn run_case(request: &RunRequest) -> AppResult<RunResponse> {
    run_case_with_progress(request, None)
}

/// Execute a case and stream progress events.
pub fn run_case_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let config = request.config;
    let dry_run = request.options.dry_run;

    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            RunStage::LoadingCase,
            0,
            0.0,
            Some("Loading case".to_string()),
        ));
    }

    config.validate()?;
    let case = case_service::load_case(request.case_path)?;
    case_service::validate_case(&case)?;
    let base_dir = request
        .case_path
        .parent()
        .unwrap_or_else(|| Path::new("."));
    // Reference data is only needed for comparisons.
    let references = if dry_run {
        ReferenceSet::default()
    } else {
        ReferenceSet::resolve(&case, base_dir)?
    };

    let iterations = case.iterations();
    let pipeline = Pipeline {
        case: &case,
        config,
        dry_run,
        iterations: iterations.len(),
        started,
        solver_timer: AccumulatingTimer::new(),
    };
    info!(
        case = %case.id,
        iterations = iterations.len(),
        dry_run,
        "running case"
    );

    std::fs::create_dir_all(&config.output_dir)?;
    if config.analysis_driver == AnalysisDriver::TemplatedScript {
        pipeline.emit(&mut progress_cb, RunStage::PreparingScript, None, None);
        prepare_control_script(config)?;
    }

    let mut records = Vec::with_capacity(iterations.len());
    let mut outputs = Vec::with_capacity(iterations.len());
    for it in &iterations {
        let (record, output) = pipeline.run_iteration(it, &mut progress_cb)?;
        records.push(record);
        outputs.extend(output);
    }

    let mut metrics = Vec::new();
    let mut plots = Vec::new();
    if !dry_run {
        pipeline.emit(&mut progress_cb, RunStage::Comparing, None, None);
        std::fs::create_dir_all(&config.graphics_dir)?;
        let ctx = EvalContext {
            case: &case,
            references: &references,
            graphics_dir: &config.graphics_dir,
            style: &config.plot,
        };
        for analysis in &case.analyses {
            let evaluation = evaluate_analysis(&ctx, analysis, &outputs)?;
            metrics.extend(evaluation.metrics);
            plots.extend(evaluation.plots.iter().map(|p| p.display().to_string()));
        }
    }

    pipeline.emit(&mut progress_cb, RunStage::SavingReport, None, None);
    let solver = config.solver.display().to_string();
    let run_id = compute_run_id(&case, &solver, dry_run);
    let report = RunReport {
        run_id: run_id.clone(),
        case_id: case.id.clone(),
        case_name: case.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        solver,
        dry_run,
        iterations: records,
        metrics,
        plots,
    };
    let store = RunStore::for_output_dir(&config.output_dir)?;
    if store.has_run(&run_id) {
        debug!(run_id = %run_id, "replacing stored report");
    }
    let report_path = store.save_report(&report)?;

    let timing = RunTimingSummary {
        solver_time_s: pipeline.solver_timer.total_seconds(),
        solver_runs: pipeline.solver_timer.count(),
        total_time_s: started.elapsed().as_secs_f64(),
    };
    info!(
        case = %case.id,
        run_id = %run_id,
        solver_s = format!("{:.3}", timing.solver_time_s),
        "case finished"
    );
    pipeline.emit(
        &mut progress_cb,
        RunStage::Completed,
        None,
        Some(format!("Report written to {}", report_path.display())),
    );

    Ok(RunResponse {
        run_id,
        report,
        report_path,
        timing,
    })
}

/// Stored reports for a case, oldest first.
pub fn list_runs(config: &HarnessConfig, case_id: &str) -> AppResult<Vec<RunReport>> {
    let store = RunStore::for_output_dir(&config.output_dir)?;
    Ok(store.list_runs(case_id)?)
}

pub fn load_run(config: &HarnessConfig, run_id: &str) -> AppResult<RunReport> {
    let store = RunStore::for_output_dir(&config.output_dir)?;
    Ok(store.load_report(run_id)?)
}

pub fn delete_run(config: &HarnessConfig, run_id: &str) -> AppResult<()> {
    let store = RunStore::for_output_dir(&config.output_dir)?;
    if !store.has_run(run_id) {
        return Err(AppError::RunNotFound(run_id.to_string()));
    }
    store.delete_run(run_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_script_is_named_after_the_model() {
        assert_eq!(
            model_script_name("validation_cs_10.vsp3"),
            "validation_cs_10_model.vspscript"
        );
        assert_eq!(model_script_name("plain"), "plain_model.vspscript");
    }

    #[test]
    fn bundled_script_declares_every_substitution_point() {
        for name in ["fname", "alpha_i", "alpha_f", "alpha_npts", "mach_i", "chord_mgc"] {
            assert!(
                BUNDLED_SWEEP_SCRIPT.contains(&format!(" {name} = ")),
                "missing {name}"
            );
        }
    }
}
