use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::{Path, PathBuf};

use difficulty_core::config::{self, EditorConfig};
use difficulty_core::{
    bulk_assign, default_output_path, edits_from_records, load_path, write_save, EditorError,
    Record, Result,
};

#[derive(Debug, Parser)]
#[command(name = "syx-difficulty", version, about = "Songs of Syx save difficulty editor")]
struct Args {
    /// Config file to use instead of the per-user one.
    #[arg(long, global = true, value_name = "JSON")]
    config: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the difficulty settings stored in a save.
    List {
        save: PathBuf,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Change settings and write an edited copy of the save.
    Edit {
        save: PathBuf,

        /// Apply a named preset (e.g. normal, hard, easy) to every setting.
        #[arg(long, conflicts_with = "all")]
        preset: Option<String>,

        /// Set every setting to this value.
        #[arg(long, value_name = "VALUE")]
        all: Option<f64>,

        /// Set one setting, applied after --preset / --all.
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, f64)>,

        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Write the default configuration file.
    InitConfig,
}

fn parse_assignment(raw: &str) -> std::result::Result<(String, f64), String> {
    let (name, value) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value in '{raw}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

fn config_file(args_path: Option<&Path>) -> Option<PathBuf> {
    args_path.map(Path::to_path_buf).or_else(config::config_path)
}

fn print_records(records: &[Record]) {
    println!("{:>4}  {:<40} {:>12}  {:>10}", "#", "Setting Name", "Value", "Offset");
    for (i, record) in records.iter().enumerate() {
        println!(
            "{:>4}  {:<40} {:>12}  {:>#10x}",
            i, record.name, record.value, record.value_offset
        );
    }
}

fn list(save: &Path, json: bool) -> Result<()> {
    let file = load_path(save)?;
    for warning in file.warnings() {
        eprintln!("Warning: {warning}");
    }

    let records = file.records();
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_records(&records);
        println!("Found {} settings.", records.len());
    }
    Ok(())
}

fn apply_assignments(records: &mut [Record], assignments: &[(String, f64)]) -> Result<()> {
    for (name, value) in assignments {
        let mut matched = false;
        for record in records.iter_mut().filter(|r| &r.name == name) {
            record.value = *value;
            matched = true;
        }
        if !matched {
            return Err(EditorError::Config(format!("no setting named '{name}' in this save")));
        }
    }
    Ok(())
}

fn edit(
    cfg: &EditorConfig,
    save: &Path,
    preset: Option<&str>,
    all: Option<f64>,
    assignments: &[(String, f64)],
    output: Option<PathBuf>,
) -> Result<()> {
    let mut file = load_path(save)?;
    for warning in file.warnings() {
        eprintln!("Warning: {warning}");
    }

    let mut records = file.records();

    if let Some(name) = preset {
        let preset = cfg.preset(name).ok_or_else(|| {
            let known: Vec<&str> = cfg.presets.iter().map(|p| p.name.as_str()).collect();
            EditorError::Config(format!(
                "unknown preset '{name}' (available: {})",
                known.join(", ")
            ))
        })?;
        bulk_assign(&mut records, preset.value);
    } else if let Some(value) = all {
        bulk_assign(&mut records, value);
    }

    apply_assignments(&mut records, assignments)?;

    let bytes = file.save(&edits_from_records(&records))?;
    let output = output.unwrap_or_else(|| default_output_path(save, &cfg.output_prefix));
    write_save(&output, &bytes)?;

    println!("File saved to: {}", output.display());
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let cfg_path = config_file(args.config.as_deref());
    let cfg = match cfg_path.as_deref() {
        Some(path) => config::load_config_from(path),
        None => EditorConfig::default(),
    };

    match args.command {
        Command::List { save, json } => list(&save, json),
        Command::Edit {
            save,
            preset,
            all,
            set,
            output,
        } => edit(&cfg, &save, preset.as_deref(), all, &set, output),
        Command::InitConfig => {
            let path = cfg_path.ok_or_else(|| {
                EditorError::Config("could not determine a config directory".to_string())
            })?;
            config::save_config_to(&path, &EditorConfig::default())?;
            println!("Wrote default config to {}", path.display());
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
