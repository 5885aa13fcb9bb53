use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, ValueEnum};
use num_traits::AsPrimitive;
use string_loom::{
    export::Stroke,
    image::{self as loom_image, render_path, render_residual},
    verboser::{Message, Verboser},
    Config, Float, PathBuilder, PixelData, ResidualFloor,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg()]
    input: PathBuf,

    /// JSON file with a run configuration. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the results are written to. Defaults to `output/` next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of pins surrounding the image.
    #[arg(short, long)]
    pins: Option<usize>,

    /// Radius in pixels the image is resized to.
    #[arg(short, long)]
    radius: Option<u32>,

    /// Pin the thread starts from.
    #[arg(long)]
    initial_pin: Option<usize>,

    /// Maximum number of lines.
    #[arg(short = 'n', long)]
    max_lines: Option<usize>,

    /// Disallow loops shorter than this many lines.
    #[arg(long)]
    min_loop: Option<usize>,

    /// Thickness of a thread, in pixels.
    #[arg(long)]
    line_width: Option<usize>,

    /// Darkness a single thread removes.
    #[arg(long)]
    line_weight: Option<f64>,

    /// Angle of the first pin, in radians.
    #[arg(long, allow_hyphen_values = true)]
    angular_offset: Option<f64>,

    /// What happens to residual darkness pushed below zero.
    #[arg(long)]
    floor: Option<Floor>,

    /// Precision of calculations (Single/Double).
    #[arg(long, default_value_t = Precision::Single)]
    precision: Precision,

    /// Stroke width of the exported SVG path.
    #[arg(long, default_value_t = 0.5)]
    stroke_width: f32,

    /// Log more (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("opening config {}", path.display()))?;
                serde_json::from_reader(file)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Config::default(),
        };
        if let Some(pins) = self.pins {
            config.pin_count = pins;
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(pin) = self.initial_pin {
            config.initial_pin = pin;
        }
        if let Some(lines) = self.max_lines {
            config.max_lines = lines;
        }
        if let Some(min_loop) = self.min_loop {
            config.min_loop = min_loop;
        }
        if let Some(width) = self.line_width {
            config.line_width = width;
        }
        if let Some(weight) = self.line_weight {
            config.line_weight = weight;
        }
        if let Some(offset) = self.angular_offset {
            config.angular_offset = offset;
        }
        if let Some(floor) = self.floor {
            config.floor = floor.into();
        }
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug)]
enum Precision {
    Single,
    Double,
}

impl ValueEnum for Precision {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Single, Self::Double]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Single => clap::builder::PossibleValue::new("Single")
                .alias("single")
                .alias("f32"),
            Self::Double => clap::builder::PossibleValue::new("Double")
                .alias("double")
                .alias("f64"),
        })
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => f.write_str("Single"),
            Self::Double => f.write_str("Double"),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Floor {
    Unclamped,
    Zero,
}

impl ValueEnum for Floor {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Unclamped, Self::Zero]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Unclamped => clap::builder::PossibleValue::new("Unclamped")
                .alias("unclamped")
                .alias("none"),
            Self::Zero => clap::builder::PossibleValue::new("Zero")
                .alias("zero")
                .alias("clamp"),
        })
    }
}

impl From<Floor> for ResidualFloor {
    fn from(floor: Floor) -> Self {
        match floor {
            Floor::Unclamped => ResidualFloor::Unclamped,
            Floor::Zero => ResidualFloor::Zero,
        }
    }
}

/// Logs progress every `every` iterations and the phase switch.
struct Progress {
    max_lines: usize,
    every: usize,
    chords: usize,
}

impl Verboser for Progress {
    fn verbose(&mut self, message: Message) {
        match message {
            Message::Computing(iteration) if iteration % self.every == 0 && iteration > 0 => {
                tracing::info!("computing line {} of {} ({} drawn)", iteration, self.max_lines, self.chords);
            }
            Message::Chord { .. } => self.chords += 1,
            Message::PhaseSwitched { at_pin } => {
                tracing::info!(at_pin, "dark lines computed, starting light lines");
            }
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    match args.precision {
        Precision::Single => with_precision::<f32>(&args),
        Precision::Double => with_precision::<f64>(&args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn with_precision<S: Float>(args: &Args) -> anyhow::Result<()>
where
    f64: AsPrimitive<S>,
    u8: AsPrimitive<S>,
{
    let config = args.config()?;
    config.validate()?;

    let darkness: PixelData<S> = loom_image::open(&args.input, config.radius)
        .with_context(|| format!("loading {}", args.input.display()))?;
    tracing::info!(input = %args.input.display(), radius = config.radius, "image preprocessed for threading");

    let mut progress = Progress {
        max_lines: config.max_lines,
        every: (config.max_lines / 20).max(1),
        chords: 0,
    };
    let computation = PathBuilder::new(&config, darkness, &mut progress)?.compute(&mut progress);
    tracing::info!(
        chords = computation.path.len(),
        dark = computation.dark_chords,
        light = computation.light_chords,
        termination = ?computation.termination,
        "image threaded"
    );

    let out_folder = match &args.output {
        Some(folder) => folder.clone(),
        None => args.input.parent().unwrap_or(Path::new(".")).join("output"),
    };
    std::fs::create_dir_all(&out_folder)
        .with_context(|| format!("creating {}", out_folder.display()))?;
    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no usable name")?;

    let (vector, table) = computation.export();
    let grid = config.grid();
    let stroke = Stroke {
        width: args.stroke_width,
        ..Stroke::default()
    };

    let svg_path = out_folder.join(format!("{stem}.svg"));
    svg::save(&svg_path, &vector.to_svg(grid, &stroke))
        .with_context(|| format!("writing {}", svg_path.display()))?;

    let csv_path = out_folder.join(format!("{stem}.csv"));
    let csv = File::create(&csv_path).with_context(|| format!("creating {}", csv_path.display()))?;
    table
        .write_csv(BufWriter::new(csv))
        .with_context(|| format!("writing {}", csv_path.display()))?;

    let preview_path = out_folder.join(format!("{stem}_threaded.png"));
    render_path(&computation.pins, &computation.path, grid)
        .save(&preview_path)
        .with_context(|| format!("writing {}", preview_path.display()))?;

    let residual_path = out_folder.join(format!("{stem}_residual.png"));
    render_residual(computation.residual.data())
        .save(&residual_path)
        .with_context(|| format!("writing {}", residual_path.display()))?;

    let config_path = out_folder.join(format!("{stem}_config.json"));
    let config_file =
        File::create(&config_path).with_context(|| format!("creating {}", config_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(config_file), &config)
        .with_context(|| format!("writing {}", config_path.display()))?;

    tracing::info!(folder = %out_folder.display(), "results saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "string_loom",
            "in.png",
            "-p",
            "64",
            "--min-loop",
            "5",
            "--angular-offset",
            "-1.5",
            "--floor",
            "zero",
            "--precision",
            "f64",
        ])
        .unwrap();
        let config = args.config().unwrap();
        assert_eq!(config.pin_count, 64);
        assert_eq!(config.min_loop, 5);
        assert_eq!(config.angular_offset, -1.5);
        assert_eq!(config.floor, ResidualFloor::Zero);
        assert_eq!(config.radius, Config::default().radius);
        assert!(matches!(args.precision, Precision::Double));
    }

    #[test]
    fn no_flags_means_default_config() {
        let args = Args::try_parse_from(["string_loom", "in.png"]).unwrap();
        assert_eq!(args.config().unwrap(), Config::default());
    }
}
