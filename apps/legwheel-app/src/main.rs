//! legwheel descriptor inspector.
//!
//! - `robot` / `terrain`: print a preset descriptor as TOML or JSON, or write
//!   it to a file
//! - `motors`: print the motor datasheet table
//! - `joints`: show which actuator group drives each joint
//! - `check`: load and validate a descriptor file
//! - `info`: print crate versions

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use legwheel_actuator_core::presets::DATASHEETS;
use legwheel_assets::prelude::*;
use legwheel_assets::robots::wheel_leg_humanoid::JOINT_NAMES;
use legwheel_core::config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Inspect, export and check wheel-leg humanoid descriptors.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log filter (overridden by `RUST_LOG`).
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Toml,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Toml => Self::Toml,
            OutputFormat::Json => Self::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DescriptorKind {
    Robot,
    Terrain,
}

#[derive(Subcommand)]
enum Commands {
    /// Print or save the wheel-leg humanoid articulation descriptor.
    Robot {
        /// Output format. Defaults to the output file's extension, else TOML.
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Assets data directory the URDF path is resolved against.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print or save the drivable terrain descriptor.
    Terrain {
        /// Output format. Defaults to the output file's extension, else TOML.
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the motor datasheet table.
    Motors,

    /// Show the actuator group, limits and gains of every joint.
    Joints {
        /// Robot descriptor file; defaults to the built-in preset.
        #[arg(short, long)]
        robot: Option<PathBuf>,
    },

    /// Load and validate a descriptor file.
    Check {
        path: PathBuf,

        #[arg(short, long, value_enum)]
        kind: DescriptorKind,
    },

    /// Print crate information.
    Info,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

fn init_logging(default_filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn emit<T: serde::Serialize + Validate>(
    value: &T,
    format: Option<OutputFormat>,
    output: Option<&Path>,
) -> Result<(), ConfigError> {
    match output {
        Some(path) => {
            let format = match format {
                Some(f) => Format::from(f),
                None => Format::from_path(path).unwrap_or_default(),
            };
            config::save_as(value, path, format)?;
            println!("wrote {} ({format:?})", path.display());
        }
        None => print!("{}", Format::from(format.unwrap_or_default()).serialize(value)?),
    }
    Ok(())
}

fn run_robot(
    format: Option<OutputFormat>,
    data_dir: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), ConfigError> {
    let robot = match data_dir {
        Some(dir) => wheel_leg_humanoid_in(dir),
        None => wheel_leg_humanoid(),
    };
    emit(&robot, format, output)
}

fn run_terrain(format: Option<OutputFormat>, output: Option<&Path>) -> Result<(), ConfigError> {
    let terrain = drivable_terrains();
    emit(&terrain, format, output)?;
    let unassigned = terrain.unassigned_proportion();
    if unassigned > 0.0 {
        eprintln!(
            "note: {:.0}% of tiles are not assigned to any sub-terrain",
            unassigned * 100.0
        );
    }
    Ok(())
}

fn run_motors() {
    println!(
        "{:<10} {:<9} {:>10} {:>10} {:>8} {:>10}",
        "part", "maker", "peak [Nm]", "rated [Nm]", "V", "rad/s"
    );
    for sheet in &DATASHEETS {
        for point in &sheet.rated_points {
            println!(
                "{:<10} {:<9} {:>10.1} {:>10.1} {:>8.0} {:>10.4}",
                sheet.part_number,
                sheet.manufacturer,
                sheet.peak_torque,
                sheet.rated_torque,
                point.voltage,
                rpm_to_rad_per_s(point.rpm)
            );
        }
    }

    println!();
    for sheet in &DATASHEETS {
        println!(
            "{}: overload ratio {:.2} (peak / rated torque)",
            sheet.part_number,
            sheet.spec().overload_ratio()
        );
    }

    let envelope = DriveEnvelope::wheel_leg_humanoid();
    println!();
    println!(
        "drive envelope: {:.3} m/s forward, {:.3} rad/s yaw",
        envelope.max_linear_velocity(),
        envelope.max_angular_velocity()
    );
}

fn fmt_gain(v: Option<f64>) -> String {
    v.map_or_else(|| "-".into(), |v| format!("{v}"))
}

fn run_joints(robot: Option<&Path>) -> Result<(), ConfigError> {
    let robot: ArticulationDescriptor = match robot {
        Some(path) => config::load(path)?,
        None => wheel_leg_humanoid(),
    };
    let assignment = if robot.init_state.joint_pos.is_empty() {
        robot.resolve_joints(JOINT_NAMES)?
    } else {
        robot.resolve_own_joints()?
    };

    println!(
        "{:<20} {:<11} {:>8} {:>9} {:>6} {:>6} {:>6}",
        "joint", "group", "effort", "velocity", "kp", "kd", "arm"
    );
    for j in &assignment.joints {
        println!(
            "{:<20} {:<11} {:>8.1} {:>9.3} {:>6} {:>6} {:>6}",
            j.joint,
            j.group,
            j.effort_limit,
            j.velocity_limit,
            fmt_gain(j.stiffness),
            fmt_gain(j.damping),
            fmt_gain(j.armature)
        );
    }
    for joint in &assignment.unclaimed {
        println!("{joint:<20} (undriven)");
    }
    for (group, pattern) in &assignment.unmatched_patterns {
        println!("pattern \"{pattern}\" of group {group} matches no joint");
    }
    Ok(())
}

fn run_check(path: &Path, kind: DescriptorKind) -> Result<(), ConfigError> {
    match kind {
        DescriptorKind::Robot => {
            let robot: ArticulationDescriptor = config::load(path)?;
            let assignment = robot.resolve_own_joints()?;
            println!(
                "{}: ok ({} groups, {} driven joints, {} undriven)",
                path.display(),
                robot.actuators.len(),
                assignment.joints.len(),
                assignment.unclaimed.len()
            );
        }
        DescriptorKind::Terrain => {
            let terrain: TerrainGeneratorDescriptor = config::load(path)?;
            println!(
                "{}: ok ({} tiles, {} sub-terrains, {:.2} unassigned)",
                path.display(),
                terrain.num_tiles(),
                terrain.sub_terrains.len(),
                terrain.unassigned_proportion()
            );
        }
    }
    Ok(())
}

fn run_info() {
    println!("legwheel v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("crates:");
    println!("  legwheel-core          {}", env!("CARGO_PKG_VERSION"));
    println!("  legwheel-actuator-core {}", env!("CARGO_PKG_VERSION"));
    println!("  legwheel-assets        {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("assets data dir: {}", legwheel_assets::ASSETS_DATA_DIR);
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let result = match cli.command {
        Some(Commands::Robot {
            format,
            data_dir,
            output,
        }) => run_robot(format, data_dir.as_deref(), output.as_deref()),
        Some(Commands::Terrain { format, output }) => run_terrain(format, output.as_deref()),
        Some(Commands::Motors) => {
            run_motors();
            Ok(())
        }
        Some(Commands::Joints { robot }) => run_joints(robot.as_deref()),
        Some(Commands::Check { path, kind }) => run_check(&path, kind),
        Some(Commands::Info) | None => {
            run_info();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
