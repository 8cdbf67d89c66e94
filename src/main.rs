//! Main CLI application for the trajectory intersection solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use trajectory_intersection::{
    config::{CliOverrides, Settings, SolverBackend},
    intersection::{IntersectionProblem, TrajectoryValidator},
    observations::{create_example_observations, load_observations_from_file, parse_observation, Trajectory},
    utils::{ColorOutput, SolutionFormatter},
};

#[derive(Parser)]
#[command(name = "trajectory_intersection")]
#[command(about = "Trajectory Intersection Solver")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a trajectory intersection problem
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Observations file (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Linear backend (overrides config)
        #[arg(short, long)]
        backend: Option<BackendArg>,

        /// Solve time budget in seconds (overrides config)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print only the position-sum integer
        #[arg(short, long)]
        quiet: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create example configuration and input files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Check a trajectory against an observations file
    Validate {
        /// Trajectory file: a single `px, py, pz @ vx, vy, vz` line
        #[arg(short = 'r', long)]
        trajectory: PathBuf,

        /// Observations file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Analyze an observations file for solvability
    Analyze {
        /// Observations file
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// CLI-facing backend selector, mapped onto the config enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Lu,
    Elimination,
}

impl From<BackendArg> for SolverBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Lu => SolverBackend::Lu,
            BackendArg::Elimination => SolverBackend::Elimination,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve {
            config,
            input,
            backend,
            timeout,
            output,
            quiet,
            verbose,
        } => solve_command(config, input, backend, timeout, output, quiet, verbose),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Validate { trajectory, input } => validate_command(trajectory, input),
        Commands::Analyze { input } => analyze_command(input),
    }
}

fn solve_command(
    config_path: PathBuf,
    input_file: Option<PathBuf>,
    backend: Option<BackendArg>,
    timeout_seconds: Option<u64>,
    output_dir: Option<PathBuf>,
    quiet: bool,
    verbose: bool,
) -> Result<()> {
    // Load configuration
    let mut settings = if config_path.exists() {
        Settings::from_file(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        if !quiet {
            println!(
                "{}",
                ColorOutput::warning(&format!(
                    "Config file {} not found, using defaults",
                    config_path.display()
                ))
            );
        }
        Settings::default()
    };

    // Apply CLI overrides
    let cli_overrides = CliOverrides {
        observations_file: input_file,
        backend: backend.map(Into::into),
        timeout_seconds,
        output_dir: output_dir.clone(),
    };
    settings.merge_with_cli(&cli_overrides);

    settings
        .validate()
        .context("Configuration validation failed")?;

    if verbose && !quiet {
        println!("Configuration:");
        println!("  Observations: {}", settings.input.observations_file.display());
        println!("  Backend: {:?}", settings.solver.backend);
        println!("  Timeout: {}s", settings.solver.timeout_seconds);
        println!();
    }

    let start_time = Instant::now();
    let mut problem = IntersectionProblem::new(settings.clone())
        .context("Failed to create intersection problem")?;

    if !quiet {
        println!(
            "{}",
            ColorOutput::info(&format!(
                "Solving for a trajectory intersecting {} observed point(s)...",
                problem.points().len()
            ))
        );
        if verbose {
            println!("{}", problem.estimate_solvability());
        }
    }

    let solution = problem.solve()?;

    if quiet {
        println!("{}", solution.position_sum());
        return Ok(());
    }

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Solved in {:.3}s",
            start_time.elapsed().as_secs_f64()
        ))
    );
    println!();
    println!("{}", SolutionFormatter::format_solution(&solution, verbose));

    if settings.output.save_solution || output_dir.is_some() {
        SolutionFormatter::save_solution(
            &solution,
            &settings.output.output_directory,
            &settings.output.format,
        )
        .context("Failed to save solution")?;
        println!(
            "{}",
            ColorOutput::info(&format!(
                "Solution saved to {}",
                settings.output.output_directory.display()
            ))
        );
    }

    println!("{}", solution.position_sum());

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/observations");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let default_settings = Settings::default();
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_observations(&input_dir).context("Failed to create example observations")?;
    println!("Created example observations in: {}", input_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Put your observations in {}", input_dir.display());
    println!("2. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}

fn validate_command(trajectory_path: PathBuf, input_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("Validating trajectory..."));

    let trajectory_content = std::fs::read_to_string(&trajectory_path)
        .with_context(|| format!("Failed to read trajectory from {}", trajectory_path.display()))?;
    let candidate = parse_observation(trajectory_content.trim())
        .with_context(|| format!("Invalid trajectory in {}", trajectory_path.display()))?;
    let trajectory = Trajectory::new(candidate.position, candidate.velocity);

    let points = load_observations_from_file(&input_path)?;

    let result = TrajectoryValidator::new().validate(&trajectory, &points);
    print!("{}", SolutionFormatter::format_validation(&result));

    if result.is_valid {
        println!("{}", ColorOutput::success("Trajectory is valid!"));
        Ok(())
    } else {
        println!("{}", ColorOutput::error("Trajectory is invalid"));
        anyhow::bail!("trajectory does not meet every observed point")
    }
}

fn analyze_command(input_path: PathBuf) -> Result<()> {
    println!("{}", ColorOutput::info("Analyzing observations..."));

    let points = load_observations_from_file(&input_path)?;
    let problem = IntersectionProblem::with_points(Settings::default(), points);

    println!("{}", problem.estimate_solvability());

    Ok(())
}
