use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use av_app::{
    AnalysisDriver, AppResult, HarnessConfig, RunOptions, RunProgressEvent, RunRequest,
    case_service, load_config, run_service,
};
use av_results::{MetricRecord, PolarColumns, RunReport, read_polar};
use av_script::{ExitPolicy, SweepInputs, TemplateMode, template_file};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "aeroval.yaml";

#[derive(Parser)]
#[command(name = "aeroval")]
#[command(about = "aeroval - OpenVSP/VSPAERO validation harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file
    Validate {
        /// Path to the case YAML file
        case_path: PathBuf,
    },
    /// List the cases in a directory
    Cases {
        #[arg(default_value = "cases")]
        dir: PathBuf,
    },
    /// Run a validation case end to end
    Run {
        /// Path to the case YAML file
        case_path: PathBuf,
        #[command(flatten)]
        harness: HarnessArgs,
        /// Solver executable (overrides the config)
        #[arg(long)]
        solver: Option<PathBuf>,
        /// What to do when the solver exits with a failure status
        #[arg(long, value_enum)]
        exit_policy: Option<ExitPolicyArg>,
        /// Configure the analysis through the model API instead of the
        /// templated control script
        #[arg(long)]
        model_api: bool,
        /// Write scripts only; never start the solver
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored reports for a case
    Runs {
        case_id: String,
        #[command(flatten)]
        harness: HarnessArgs,
    },
    /// Show a stored report
    ShowRun {
        run_id: String,
        #[command(flatten)]
        harness: HarnessArgs,
    },
    /// Delete a stored report
    DeleteRun {
        run_id: String,
        #[command(flatten)]
        harness: HarnessArgs,
    },
    /// Rewrite the sweep parameters of a control script in place
    Template {
        /// Control script to rewrite
        script: PathBuf,
        #[arg(long)]
        model_file: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        alpha_start: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        alpha_end: Option<f64>,
        #[arg(long)]
        alpha_npts: Option<u32>,
        #[arg(long)]
        mach: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        x_cg: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        y_cg: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        z_cg: Option<f64>,
        #[arg(long)]
        ref_chord: Option<f64>,
        /// Address lines by their fixed index instead of by variable name
        #[arg(long)]
        positional: bool,
    },
    /// Print CL, CDi and CM from a polar file
    Polar {
        polar_path: PathBuf,
    },
}

#[derive(clap::Args)]
struct HarnessArgs {
    /// Harness config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for scripts, solver outputs and reports
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Directory for plots
    #[arg(long)]
    graphics_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExitPolicyArg {
    Ignore,
    Warn,
    Strict,
}

impl From<ExitPolicyArg> for ExitPolicy {
    fn from(arg: ExitPolicyArg) -> Self {
        match arg {
            ExitPolicyArg::Ignore => ExitPolicy::Ignore,
            ExitPolicyArg::Warn => ExitPolicy::Warn,
            ExitPolicyArg::Strict => ExitPolicy::Strict,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Cases { dir } => cmd_cases(&dir),
        Commands::Run {
            case_path,
            harness,
            solver,
            exit_policy,
            model_api,
            dry_run,
        } => {
            let mut config = harness.resolve()?;
            if let Some(solver) = solver {
                config.solver = solver;
            }
            if let Some(policy) = exit_policy {
                config.exit_policy = policy.into();
            }
            if model_api {
                config.analysis_driver = AnalysisDriver::ModelApi;
            }
            cmd_run(&case_path, &config, dry_run)
        }
        Commands::Runs { case_id, harness } => cmd_runs(&harness.resolve()?, &case_id),
        Commands::ShowRun { run_id, harness } => cmd_show_run(&harness.resolve()?, &run_id),
        Commands::DeleteRun { run_id, harness } => {
            run_service::delete_run(&harness.resolve()?, &run_id)?;
            println!("✓ Deleted run {}", run_id);
            Ok(())
        }
        Commands::Template {
            script,
            model_file,
            alpha_start,
            alpha_end,
            alpha_npts,
            mach,
            x_cg,
            y_cg,
            z_cg,
            ref_chord,
            positional,
        } => {
            let inputs = SweepInputs {
                model_file,
                alpha_start,
                alpha_end,
                alpha_npts,
                mach,
                x_cg,
                y_cg,
                z_cg,
                ref_chord,
            };
            cmd_template(&script, &inputs, positional)
        }
        Commands::Polar { polar_path } => cmd_polar(&polar_path),
    }
}

impl HarnessArgs {
    fn resolve(&self) -> AppResult<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None if Path::new(DEFAULT_CONFIG).exists() => load_config(Path::new(DEFAULT_CONFIG))?,
            None => HarnessConfig::default(),
        };
        debug!(config = ?self.config, "harness config loaded");
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &self.graphics_dir {
            config.graphics_dir = dir.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn cmd_validate(case_path: &Path) -> AppResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = case_service::load_case(case_path)?;
    case_service::validate_case(&case)?;
    let summary = case_service::summarize(case_path, &case);
    println!(
        "✓ Case is valid: {} ({} iterations; {})",
        summary.id,
        summary.iterations,
        summary.analyses.join(", ")
    );
    Ok(())
}

fn cmd_cases(dir: &Path) -> AppResult<()> {
    let cases = case_service::list_cases(dir)?;
    if cases.is_empty() {
        println!("No cases found in {}", dir.display());
    } else {
        println!("Cases in {}:", dir.display());
        for case in cases {
            println!(
                "  {} - {} ({} iterations; {})",
                case.id,
                case.name,
                case.iterations,
                case.analyses.join(", ")
            );
        }
    }
    Ok(())
}

fn cmd_run(case_path: &Path, config: &HarnessConfig, dry_run: bool) -> AppResult<()> {
    println!("Running case: {}", case_path.display());

    let request = RunRequest {
        case_path,
        config,
        options: RunOptions { dry_run },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = String::new();
    let response = run_service::run_case_with_progress(
        &request,
        Some(&mut |event| {
            let stage_key = format!("{:?}{:?}", event.stage, event.iteration);
            if stage_key != last_stage || last_emit.elapsed().as_millis() >= 100 {
                render_cli_progress(&event);
                last_stage = stage_key;
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if dry_run {
        println!("✓ Scripts written to {}", config.output_dir.display());
    } else {
        println!("✓ Case completed: {}", response.run_id);
    }
    print_report(&response.report);

    let timing = &response.timing;
    let total = timing.total_time_s.max(1.0e-12);
    println!("\nTiming summary:");
    println!(
        "  Solver:  {:.3}s over {} runs ({:.1}%)",
        timing.solver_time_s,
        timing.solver_runs,
        100.0 * timing.solver_time_s / total
    );
    println!("  Total:   {:.3}s", timing.total_time_s);
    println!("  Report:  {}", response.report_path.display());
    Ok(())
}

fn cmd_runs(config: &HarnessConfig, case_id: &str) -> AppResult<()> {
    let runs = run_service::list_runs(config, case_id)?;
    if runs.is_empty() {
        println!("No stored runs found for case: {}", case_id);
    } else {
        println!("Stored runs for case '{}':", case_id);
        for report in runs {
            let kind = if report.dry_run { "  dry run" } else { "" };
            println!("  {} ({}){}", report.run_id, report.timestamp, kind);
        }
    }
    Ok(())
}

fn cmd_show_run(config: &HarnessConfig, run_id: &str) -> AppResult<()> {
    let report = run_service::load_run(config, run_id)?;
    println!("Run {} of case '{}'", report.run_id, report.case_id);
    println!("  Name:      {}", report.case_name);
    println!("  Timestamp: {}", report.timestamp);
    println!("  Solver:    {}", report.solver);
    print_report(&report);
    Ok(())
}

fn cmd_template(script: &Path, inputs: &SweepInputs, positional: bool) -> AppResult<()> {
    let mode = if positional {
        TemplateMode::Positional {
            layout: Default::default(),
            verify: true,
        }
    } else {
        TemplateMode::Named
    };
    let touched = template_file(script, inputs, &mode)?;
    println!(
        "✓ Rewrote {} lines in {}",
        touched.len(),
        script.display()
    );
    Ok(())
}

fn cmd_polar(polar_path: &Path) -> AppResult<()> {
    let polar = read_polar(polar_path, &PolarColumns::default())?;
    println!("{:>8} {:>10} {:>10} {:>10}", "AoA", "CL", "CDi", "CM");
    for i in 0..polar.len() {
        println!(
            "{:>8.2} {:>10.5} {:>10.5} {:>10.5}",
            polar.alpha[i], polar.cl[i], polar.cdi[i], polar.cm[i]
        );
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("  Iterations: {}", report.iterations.len());
    if !report.metrics.is_empty() {
        println!("\nMetrics:");
        for m in &report.metrics {
            println!("  {}", format_metric(m));
        }
    }
    if !report.plots.is_empty() {
        println!("\nPlots:");
        for plot in &report.plots {
            println!("  {}", plot);
        }
    }
}

fn format_metric(m: &MetricRecord) -> String {
    let mut line = format!("{}/{}", m.analysis, m.name);
    if let Some(it) = &m.iteration {
        line.push_str(&format!(" [{}]", it));
    }
    line.push_str(&format!(" = {:.5}", m.value));
    if let (Some(reference), Some(label)) = (m.reference, &m.reference_label) {
        line.push_str(&format!("  vs {} {:.5}", label, reference));
    }
    match m.error_percent {
        Some(err) => line.push_str(&format!("  error {:.2}%", err)),
        None if m.reference_label.is_some() => line.push_str("  error n/a"),
        None => {}
    }
    line
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let spinner = ['|', '/', '-', '\\'];
    let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
    let mut line = format!(
        "\r{} {}  elapsed={:.2}s",
        spinner[spin_idx],
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(index) = event.iteration {
        line.push_str(&format!("  iteration={}/{}", index + 1, event.iterations));
    }
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}
