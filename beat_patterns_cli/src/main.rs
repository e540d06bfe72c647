use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use beat_patterns::{
    create_rng, generate_beatmap_with_options, GenerateOptions, GeneratorContext, PatternLibrary,
    Preferences, Song, CONFIG_FILE_NAME,
};
use beatmap_schema::LevelDifficulty;
use clap::{Parser, Subcommand};
use log::info;

mod chart_io;
mod stats;

#[derive(Debug, Parser)]
#[command(name = "beat-patterns")]
#[command(about = "Pattern-based Beat Saber chart generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate charts from the pattern library.
    Generate {
        #[arg(long)]
        bpm: u32,
        /// Song length in seconds.
        #[arg(long)]
        duration: f64,
        /// Easy, Normal, Hard, Expert, ExpertPlus or All.
        #[arg(short, long, default_value = "All")]
        difficulty: LevelDifficulty,
        /// Pattern file or directory.
        #[arg(short, long)]
        patterns: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        initial_silence: Option<f64>,
        #[arg(long)]
        min_delay: Option<f64>,
        #[arg(long)]
        max_delay: Option<f64>,
        /// 1 snaps patterns to whole beats, 2 to half beats.
        #[arg(long)]
        snap: Option<u32>,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Print statistics for an existing chart.
    Stats {
        chart: PathBuf,
        #[arg(long)]
        bpm: u32,
        #[arg(long)]
        duration: f64,
    },
    /// Write a default preferences file.
    Init {
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            bpm,
            duration,
            difficulty,
            patterns,
            config,
            seed,
            initial_silence,
            min_delay,
            max_delay,
            snap,
            output_dir,
        } => {
            let prefs = load_preferences(config.as_deref())?;
            let patterns_path = patterns
                .or_else(|| prefs.find_patterns_dir())
                .context("no pattern library found; pass --patterns or set patternsPath")?;
            let library = PatternLibrary::load(&patterns_path)
                .with_context(|| format!("failed to load patterns: {}", patterns_path.display()))?;
            info!("loaded {} patterns from {}", library.len(), patterns_path.display());

            let song = Song::new(duration, bpm);
            let context = GeneratorContext {
                patterns: &library,
                defaults: &prefs.difficulty_defaults,
            };
            let options = GenerateOptions {
                initial_silence,
                minimum_delay: min_delay,
                maximum_delay: max_delay,
                pattern_snap_to: snap,
            };
            let levels = match difficulty {
                LevelDifficulty::All => LevelDifficulty::LEVELS.to_vec(),
                level => vec![level],
            };

            // Nothing is written unless every difficulty generates.
            let mut rng = create_rng(seed);
            let mut charts = Vec::with_capacity(levels.len());
            for level in levels {
                let chart = generate_beatmap_with_options(context, song, level, &mut rng, options)
                    .with_context(|| format!("generation failed for {level}"))?;
                info!("{level}: {} notes", chart.note_count());
                charts.push((level, chart));
            }

            fs::create_dir_all(&output_dir)
                .with_context(|| format!("failed to create: {}", output_dir.display()))?;
            for (level, chart) in &charts {
                let out_path = output_dir.join(level.beatmap_filename());
                chart_io::save_chart(&out_path, chart)?;
                println!("{}", out_path.display());
            }
        }
        Command::Stats {
            chart,
            bpm,
            duration,
        } => {
            let data = chart_io::load_chart(&chart)?;
            stats::print_stats(&data, duration, bpm);
        }
        Command::Init { config, force } => {
            let path = config.unwrap_or_else(default_config_path);
            if path.exists() && !force {
                bail!("{} already exists; pass --force to overwrite", path.display());
            }
            Preferences::default()
                .save(&path)
                .with_context(|| format!("failed to write preferences: {}", path.display()))?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// An explicit path must load. Otherwise the home config is used if present.
fn load_preferences(path: Option<&Path>) -> anyhow::Result<Preferences> {
    if let Some(path) = path {
        return Preferences::load(path)
            .with_context(|| format!("failed to load preferences: {}", path.display()));
    }
    let default_path = default_config_path();
    if default_path.is_file() {
        return Preferences::load(&default_path)
            .with_context(|| format!("failed to load preferences: {}", default_path.display()));
    }
    Ok(Preferences::default())
}

fn default_config_path() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(CONFIG_FILE_NAME)
}
