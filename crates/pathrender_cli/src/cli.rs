use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use pathrender_renderer::{RenderMode, RenderSettings, SceneConfig};
use std::path::{Path, PathBuf};

/// Log levels accepted by `--log-level`
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Rendering algorithm selected by `--mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Monte Carlo path tracing
    Path,
    /// Flat material colors from one primary ray per pixel
    Raycast,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Path => RenderMode::PathTrace,
            Mode::Raycast => RenderMode::RayCast,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "pathrender")]
#[command(about = "Offline CPU path tracer")]
pub struct Args {
    /// Scene file (.yaml, .yml, .json or .obj)
    #[arg(short, long)]
    pub scene: PathBuf,

    /// Output image path (.ppm or .png); defaults to a timestamped file in --output-dir
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for timestamped output files
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Samples per pixel
    #[arg(long)]
    pub samples: Option<u32>,

    /// Maximum path length in segments
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Master random seed for reproducible renders
    #[arg(long)]
    pub seed: Option<u64>,

    /// Enable explicit light sampling at every bounce
    #[arg(long)]
    pub direct_lighting: bool,

    #[arg(long, value_enum, default_value = "path")]
    pub mode: Mode,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Defaults, then the scene's `render:` section, then command line flags.
    pub fn render_settings(&self, config: &SceneConfig) -> RenderSettings {
        let mut settings = config.settings(&RenderSettings::default());

        if let Some(samples) = self.samples {
            settings.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = max_depth;
        }
        if let Some(threads) = self.threads {
            settings.threads = threads;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if self.direct_lighting {
            settings.direct_lighting.enabled = true;
        }
        settings.mode = self.mode.into();
        settings.show_progress = !self.no_progress;

        settings
    }

    /// Where the image goes: `--output` if given, otherwise
    /// `<output-dir>/render_<timestamp>.<ext>`.
    pub fn output_path(&self, config: &SceneConfig, now: NaiveDateTime) -> PathBuf {
        if let Some(output) = &self.output {
            return output.clone();
        }

        let extension = config
            .filename
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .unwrap_or("ppm");

        self.output_dir
            .join(format!("render_{}.{}", timestamp(now), extension))
    }
}

/// `YYYYmmdd_HHMMSS_mmm`
pub fn timestamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d_%H%M%S_%3f").to_string()
}
