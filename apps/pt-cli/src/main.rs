use clap::{Parser, Subcommand};
use pt_core::console::{Colour, Style, info_out};
use pt_core::{ExecutionContext, FieldKind};
use pt_mesh::FacetCategory;
use pt_problem::{CaseDef, ProblemError, load_case};
use pt_results::{ResultsError, RunStore};
use pt_sim::{Algorithm, AlgorithmParameters, IterationEvent, SOLVER_VERSION, SimError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "peryton")]
#[command(about = "Peryton - steady-state RANS solver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file and the problem it describes
    Validate {
        /// Path to the case YAML/JSON file
        case_path: PathBuf,
    },
    /// Describe the mesh, facets and conditions of a case
    Info {
        /// Path to the case YAML/JSON file
        case_path: PathBuf,
    },
    /// Iterate a case to a steady state
    Run {
        /// Path to the case YAML/JSON file
        case_path: PathBuf,
        /// Parent directory for the run directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Override the iteration budget
        #[arg(long)]
        max_iterations: Option<usize>,
        /// Override the dump period (0 dumps every iteration)
        #[arg(long)]
        dump_period: Option<usize>,
        /// Override the convergence tolerance
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// List runs stored under a results directory
    Runs {
        /// Results directory
        output_dir: PathBuf,
        /// Only show runs of this case
        #[arg(long)]
        case: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Problem(#[from] ProblemError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error(transparent)]
    Results(#[from] ResultsError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Info { case_path } => cmd_info(&case_path),
        Commands::Run {
            case_path,
            output_dir,
            max_iterations,
            dump_period,
            tolerance,
        } => cmd_run(
            &case_path,
            RunOverrides {
                output_dir,
                max_iterations,
                dump_period,
                tolerance,
            },
        ),
        Commands::Runs { output_dir, case } => cmd_runs(output_dir, case.as_deref()),
    }
}

fn welcome(ctx: ExecutionContext) {
    info_out(
        ctx,
        "\n\nPeryton \nSteady-state RANS solver\n",
        Style::colour(Colour::Purple).bold(),
    );
    let started = chrono::Local::now().format("%d/%m/%Y - %H:%M:%S");
    info_out(
        ctx,
        &format!("{started} Peryton version: {SOLVER_VERSION}"),
        Style::PLAIN,
    );
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case: {}", case_path.display());
    let case = load_case(case_path)?;
    case.build_problem()?;
    println!("✓ Case is valid");
    Ok(())
}

fn cmd_info(case_path: &Path) -> CliResult<()> {
    let case = load_case(case_path)?;
    let problem = case.build_problem()?;
    let domain = problem.domain();
    let mesh = domain.mesh();
    let (h_min, h_max) = mesh.cell_size_range();

    println!("Case: {}", case.name);
    println!(
        "  Mesh: {}-D, {} cells, {} vertices, cell size {h_min:.4}..{h_max:.4}",
        problem.dimension(),
        mesh.num_cells(),
        mesh.num_vertices()
    );
    println!("  Facets:");
    for facet in mesh.facet_ids() {
        let label = domain.label(facet).unwrap_or("-");
        let category = domain
            .category_of(facet)
            .map_or("-", FacetCategory::as_str);
        println!("    {facet}: {label} ({category})");
    }
    for kind in FieldKind::ALL {
        let resolved = problem.boundary_conditions().resolved(kind);
        let on: Vec<String> = resolved.iter().map(|bc| bc.facet.to_string()).collect();
        println!(
            "  {} conditions: {} on facets [{}]",
            kind.name(),
            resolved.len(),
            on.join(", ")
        );
    }
    println!(
        "  Physics: rho = {}, nu = {}, body force = {:?}",
        problem.density(),
        problem.viscosity(),
        problem.body_forces()
    );

    let params = AlgorithmParameters::from_case(&case);
    println!(
        "  Iteration: max {} passes, dt = {}, tolerance = {:e}, dump period = {}",
        problem.max_iterations(),
        problem.dt(),
        params.convergence_tolerance,
        params.backend.dump_period
    );
    println!("  Output: {}", params.backend.output_dir.display());
    Ok(())
}

struct RunOverrides {
    output_dir: Option<PathBuf>,
    max_iterations: Option<usize>,
    dump_period: Option<usize>,
    tolerance: Option<f64>,
}

fn apply_overrides(case: &mut CaseDef, overrides: &RunOverrides) {
    if let Some(n) = overrides.max_iterations {
        case.max_iterations = n;
    }
    if let Some(p) = overrides.dump_period {
        case.algorithm.dump_period = Some(p);
    }
    if let Some(tol) = overrides.tolerance {
        case.algorithm.convergence_tolerance = Some(tol);
    }
    if let Some(dir) = &overrides.output_dir {
        case.algorithm.output_dir = Some(dir.clone());
    }
}

fn cmd_run(case_path: &Path, overrides: RunOverrides) -> CliResult<()> {
    let ctx = ExecutionContext::SERIAL;
    welcome(ctx);

    let mut case = load_case(case_path)?;
    apply_overrides(&mut case, &overrides);
    let problem = case.build_problem()?;
    let max_iterations = problem.max_iterations();
    let params = AlgorithmParameters::from_case(&case);

    println!("Running case: {}", case.name);
    let mut algorithm = Algorithm::new(params, problem)?;

    let started = Instant::now();
    let mut last_emit = Instant::now();
    let report = algorithm.run_with_progress(|event| {
        if event.iteration == max_iterations || last_emit.elapsed().as_millis() >= 100 {
            render_progress(event, max_iterations, started);
            last_emit = Instant::now();
        }
    });
    clear_progress_line();
    let report = report?;

    println!(
        "✓ {:?} after {} iterations, pseudo-time {}",
        report.outcome, report.iterations, report.pseudo_time
    );
    println!("  Final residual: {:e}", report.final_residual);
    println!("  Dumps written: {}", report.dumps_written);
    if let Some(dir) = &report.output_dir {
        println!("  Output: {}", dir.display());
    }
    println!("  Wall time: {:.2}s", started.elapsed().as_secs_f64());
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_progress(event: &IterationEvent, max_iterations: usize, started: Instant) {
    let width = 28usize;
    let fraction = event.iteration as f64 / max_iterations.max(1) as f64;
    let filled = ((fraction * width as f64).round() as usize).min(width);
    print!(
        "\r[{}{}] iter {}/{}  t={:.3}  du={:.3e}  dp={:.3e}  cg={}  elapsed={:.1}s",
        "#".repeat(filled),
        "-".repeat(width - filled),
        event.iteration,
        max_iterations,
        event.pseudo_time,
        event.residuals[FieldKind::Velocity],
        event.residuals[FieldKind::Pressure],
        event.scheme.pressure_iterations,
        started.elapsed().as_secs_f64()
    );
    let _ = io::stdout().flush();
}

fn cmd_runs(output_dir: PathBuf, case: Option<&str>) -> CliResult<()> {
    let store = RunStore::new(output_dir)?;
    let runs = store.list_runs(case)?;

    if runs.is_empty() {
        println!("No runs found in {}", store.root_dir().display());
        return Ok(());
    }
    println!("Runs in {}:", store.root_dir().display());
    for manifest in runs {
        let dumps = store.list_dumps(&manifest.run_id)?.len();
        let outcome = match store.load_summary(&manifest.run_id)? {
            Some(summary) => format!("{:?} after {}", summary.outcome, summary.iterations),
            None => "unfinished".to_string(),
        };
        println!(
            "  {}  {}  {} dumps  hash {}",
            manifest.run_id,
            outcome,
            dumps,
            &manifest.case_hash[..12.min(manifest.case_hash.len())]
        );
    }
    Ok(())
}
