//! # Girder Stability CLI
//!
//! Runs lifting and hauling checks on `.pgs` model files.
//!
//! ```text
//! stab_cli new girder.pgs
//! stab_cli lift girder.pgs
//! stab_cli haul girder.pgs --json
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stab_core::artifact::{GoverningFs, StressExtreme};
use stab_core::file_io::{load_model_with_lock_check, save_model, FileLock};
use stab_core::girder::{Face, GirderType};
use stab_core::units::{Feet, Inches, Kips, Ksi};
use stab_core::StabilityModel;

#[derive(Parser)]
#[command(name = "stab_cli")]
#[command(about = "Lateral stability checks for precast girders during lifting and hauling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default model
    New {
        path: PathBuf,

        /// Start from the non-prismatic girder
        #[arg(long)]
        non_prismatic: bool,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Run the lifting check
    Lift {
        path: PathBuf,

        /// Print the full check artifact as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the hauling check
    Haul {
        path: PathBuf,

        /// Print the full check artifact as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a model
    Show { path: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stab_cli=info,stab_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::New {
            path,
            non_prismatic,
            force,
        } => new_model(&path, non_prismatic, force),
        Commands::Lift { path, json } => lift(&path, json),
        Commands::Haul { path, json } => haul(&path, json),
        Commands::Show { path } => show(&path),
    }
}

fn open(path: &Path) -> Result<StabilityModel> {
    let (model, lock) =
        load_model_with_lock_check(path).with_context(|| format!("Failed to load {}", path.display()))?;
    if let Some(lock) = lock {
        warn!(user = %lock.user_id, machine = %lock.machine, "Model is open elsewhere");
    }
    Ok(model)
}

fn new_model(path: &Path, non_prismatic: bool, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists, use --force to overwrite", path.display());
    }
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "stab_cli".to_string());
    let _lock = FileLock::acquire(path, user).with_context(|| format!("Failed to lock {}", path.display()))?;

    let mut model = StabilityModel::default();
    if non_prismatic {
        model.set_girder_type(GirderType::NonPrismatic);
    }
    save_model(&model, path).with_context(|| format!("Failed to save {}", path.display()))?;
    info!(path = %path.display(), "Created model");
    Ok(())
}

fn lift(path: &Path, json: bool) -> Result<()> {
    let model = open(path)?;
    let artifact = model.get_lifting_check_artifact().context("Lifting check failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
        return Ok(());
    }

    let results = artifact.results();
    println!("Lifting check: {}", verdict(results.passed()));
    println!("  Girder length      {:>10.2} ft", Feet::from_base(artifact.girder_length).value());
    println!("  Lift point         {:>10.2} ft", Feet::from_base(artifact.lift_point).value());
    println!("  Weight             {:>10.2} kip", Kips::from_base(artifact.weight).value());
    print_fs("FS cracking", &results.fs_cracking, artifact.criteria.min_fs_cracking, |c| {
        c.display_name().to_string()
    });
    print_fs("FS failure", &results.fs_failure, artifact.criteria.min_fs_failure, |c| {
        c.display_name().to_string()
    });
    print_stress("Max tension", results.max_tension.as_ref(), results.allowables.tension);
    print_stress(
        "Max compression",
        results.max_compression_peak.as_ref(),
        results.allowables.compression_peak,
    );
    Ok(())
}

fn haul(path: &Path, json: bool) -> Result<()> {
    let model = open(path)?;
    let artifact = model.get_hauling_check_artifact().context("Hauling check failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&artifact)?);
        return Ok(());
    }

    let results = artifact.results();
    let describe = |c: &stab_core::artifact::HaulingCase| {
        format!("{}, {}", c.slope.display_name(), c.impact.display_name())
    };
    println!("Hauling check: {}", verdict(results.passed()));
    println!("  Girder length      {:>10.2} ft", Feet::from_base(artifact.girder_length).value());
    println!(
        "  Bunks              {:>10.2} ft / {:.2} ft",
        Feet::from_base(artifact.bunks.0).value(),
        Feet::from_base(artifact.bunks.1).value()
    );
    println!("  Weight             {:>10.2} kip", Kips::from_base(artifact.weight).value());
    print_fs("FS cracking", &results.fs_cracking, artifact.criteria.min_fs_cracking, describe);
    print_fs("FS rollover", &results.fs_rollover, artifact.criteria.min_fs_rollover, describe);
    for slope in &results.slopes {
        print_stress(
            &format!("Max tension ({})", slope.slope.display_name()),
            slope.max_tension.as_ref(),
            slope.allowables.tension,
        );
    }
    Ok(())
}

fn show(path: &Path) -> Result<()> {
    let model = open(path)?;
    let girder = model.girder();
    println!("Girder type        {}", model.girder_type().display_name());
    println!("Sections           {}", girder.section_count());
    for (i, section) in girder.sections().iter().enumerate() {
        let depth = |face| girder.section_face(i, face).map_or(0.0, |p| Inches::from_base(p.hg).value());
        println!(
            "  {:>3}  {:>8.2} ft  depth {:.2} in / {:.2} in",
            i + 1,
            Feet::from_base(section.length).value(),
            depth(Face::Start),
            depth(Face::End)
        );
    }
    println!("Length             {:.2} ft", Feet::from_base(girder.girder_length()).value());
    println!("Point loads        {}", girder.point_loads().len());
    println!(
        "Lift point         {:.2} ft",
        Feet::from_base(model.lifting_problem().lift_point).value()
    );
    let (left, right) = model.hauling_problem().support_locations();
    println!(
        "Bunks              {:.2} ft / {:.2} ft",
        Feet::from_base(left).value(),
        Feet::from_base(right).value()
    );
    println!("Specification      {}", model.settings().lrfd_edition.display_name());
    Ok(())
}

fn verdict(passed: bool) -> &'static str {
    if passed {
        "PASS"
    } else {
        "FAIL"
    }
}

fn format_fs(fs: f64) -> String {
    if fs >= f64::MAX {
        "inf".to_string()
    } else {
        format!("{fs:.2}")
    }
}

fn print_fs<C>(label: &str, governing: &GoverningFs<C>, minimum: f64, describe: impl Fn(&C) -> String) {
    println!(
        "  {label:<18} {:>10} (min {minimum:.2}, {})",
        format_fs(governing.fs),
        describe(&governing.case)
    );
}

fn print_stress<C>(label: &str, extreme: Option<&StressExtreme<C>>, allowable: f64) {
    match extreme {
        Some(e) => println!(
            "  {label:<18} {:>10.3} ksi at {:.2} ft (allowable {:.3} ksi)",
            Ksi::from_base(e.stress).value(),
            Feet::from_base(e.x).value(),
            Ksi::from_base(allowable).value()
        ),
        None => println!("  {label:<18} {:>10}", "-"),
    }
}
