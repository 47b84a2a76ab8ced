use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glyphfield_common::TextureHandle;
use glyphfield_field::{AnimatedCharacterField, FieldConfig};
use glyphfield_render::{DebugTextRenderer, RenderView, Renderer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glyphfield-cli", about = "CLI tool for animated character fields")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON field configuration; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the frame loop headless and report blend weights
    Simulate {
        /// Number of updates to run
        #[arg(short, long, default_value = "120")]
        ticks: u32,
        /// Seconds per update
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// Seed override for per-cell randoms
        #[arg(short, long)]
        seed: Option<u64>,
        /// Activate a channel at a tick, e.g. `30:2`. Repeatable.
        #[arg(short, long = "activate", value_name = "TICK:CHANNEL")]
        activations: Vec<Activation>,
        /// Print weights every N ticks (0 prints only the final state)
        #[arg(long, default_value = "10")]
        every: u32,
    },
    /// Print a text dump of a freshly built field
    Inspect {
        /// Cells to list individually
        #[arg(long, default_value = "4")]
        cells: usize,
        /// Seconds to advance before dumping
        #[arg(long, default_value = "0")]
        advance: f32,
    },
}

/// A scheduled `activate_animation` call.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Activation {
    tick: u32,
    channel: u8,
}

impl FromStr for Activation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tick, channel) = s
            .split_once(':')
            .ok_or_else(|| format!("expected TICK:CHANNEL, got `{s}`"))?;
        let tick = tick
            .trim()
            .parse()
            .map_err(|e| format!("bad tick `{tick}`: {e}"))?;
        let channel = channel
            .trim()
            .parse()
            .map_err(|e| format!("bad channel `{channel}`: {e}"))?;
        Ok(Self { tick, channel })
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<FieldConfig> {
    match path {
        Some(path) => FieldConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(FieldConfig::default()),
    }
}

/// Build a field and bind the layout implied by its glyph string. No GPU
/// texture exists here, so a placeholder handle stands in.
fn bound_field(config: &FieldConfig) -> anyhow::Result<AnimatedCharacterField> {
    let layout = config.glyph_layout()?;
    let mut field = AnimatedCharacterField::from_config(config, layout)?;
    field.bind_atlas(TextureHandle(0), layout)?;
    Ok(field)
}

fn format_weights(weights: [f32; 3]) -> String {
    format!("w1={:.4} w2={:.4} w3={:.4}", weights[0], weights[1], weights[2])
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("glyphfield-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", glyphfield_common::crate_info());
            println!("mesh: {}", glyphfield_mesh::crate_info());
            println!("render: {}", glyphfield_render::crate_info());
            println!("animation: {}", glyphfield_animation::crate_info());
            println!("field: {}", glyphfield_field::crate_info());
            println!("atlas: {}", glyphfield_atlas::crate_info());
        }
        Commands::Simulate {
            ticks,
            dt,
            seed,
            activations,
            every,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if seed.is_some() {
                config.seed = seed;
            }
            let mut field = bound_field(&config)?;
            println!(
                "Simulating {} cells for {ticks} ticks (dt={dt})",
                field.num_cells()
            );

            for tick in 0..ticks {
                for a in activations.iter().filter(|a| a.tick == tick) {
                    field
                        .activate_animation(a.channel)
                        .with_context(|| format!("activation at tick {tick}"))?;
                    println!("tick {tick:>5}: activate channel {}", a.channel);
                }
                field.update(dt)?;
                if every > 0 && (tick + 1) % every == 0 {
                    println!("tick {:>5}: {}", tick + 1, format_weights(field.weights()));
                }
            }

            println!(
                "Final: time={:.4} {} transitioning={}",
                field.time(),
                format_weights(field.weights()),
                field.blend().is_transitioning()
            );
        }
        Commands::Inspect { cells, advance } => {
            let config = load_config(cli.config.as_ref())?;
            let mut field = bound_field(&config)?;
            if advance > 0.0 {
                field.update(advance)?;
            }
            let text =
                DebugTextRenderer::with_max_cells(cells).render(&field, &RenderView::default());
            print!("{text}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activation_parses() {
        assert_eq!(
            "30:2".parse::<Activation>().unwrap(),
            Activation {
                tick: 30,
                channel: 2
            }
        );
        assert_eq!(
            " 0 : 3 ".parse::<Activation>().unwrap(),
            Activation {
                tick: 0,
                channel: 3
            }
        );
    }

    #[test]
    fn activation_rejects_malformed() {
        assert!("30".parse::<Activation>().is_err());
        assert!("x:1".parse::<Activation>().is_err());
        assert!("1:-2".parse::<Activation>().is_err());
    }

    #[test]
    fn cli_parses_simulate() {
        let cli = Cli::try_parse_from([
            "glyphfield-cli",
            "simulate",
            "--ticks",
            "5",
            "-a",
            "1:2",
            "-a",
            "3:1",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate {
                ticks, activations, ..
            } => {
                assert_eq!(ticks, 5);
                assert_eq!(activations.len(), 2);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn bound_field_from_defaults() {
        let config = FieldConfig {
            num_cells: 8,
            seed: Some(3),
            ..FieldConfig::default()
        };
        let mut field = bound_field(&config).unwrap();
        assert!(field.is_bound());
        field.activate_animation(3).unwrap();
        field.update(2.0).unwrap();
        assert_eq!(field.weights(), [0.0, 0.0, 1.0]);
    }
}
