use anyhow::Result;
use aquaforge_core::detection::{DefaultLoader, DetectionInvoker};
use aquaforge_schemas::water::{ColorDescriptor, SmellDescriptor};
use clap::{Parser, Subcommand};
use render::OutputFormat;
use std::path::PathBuf;

mod config;
mod render;
mod telemetry;
mod workflow;

/// Tech-powered approaches to safe and green aquaculture.
#[derive(Debug, Parser)]
#[command(name = "aquaforge", version, about)]
struct Cli {
    /// Settings file (YAML). Defaults to ./aquaforge.yaml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Personal protective equipment guidance.
    Ppe,
    /// Diagnose water quality from a single reading.
    Water {
        /// Water pH; values outside 0-14 are clamped.
        #[arg(long, default_value_t = 7.0, allow_negative_numbers = true)]
        ph: f64,
        /// Clear, Light Green, Dark Green, Brown or Murky.
        #[arg(long, default_value = "clear")]
        color: ColorDescriptor,
        /// Fresh, Earthy, Fishy or Rotten.
        #[arg(long, default_value = "fresh")]
        smell: SmellDescriptor,
    },
    /// Diagnose every row of a `ph,color,smell` CSV file.
    WaterBatch {
        input: PathBuf,
        /// Write verdict rows here instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Detect algal bloom regions in pond images (jpg, jpeg, png).
    Bloom {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        /// Path for the annotated image; only valid with a single input image.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Application and detection backend information.
    About,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let ctx = config::AppContext::init(cli.config.as_deref())?;
    let format = cli.format;

    let rendered = match cli.command {
        Command::Ppe => workflow::show_ppe(format)?,
        Command::Water { ph, color, smell } => workflow::run_water_check(ph, color, smell, format)?,
        Command::WaterBatch { input, output } => workflow::run_water_batch(&input, output.as_deref(), format)?,
        Command::Bloom { images, output } => {
            if output.is_some() && images.len() > 1 {
                anyhow::bail!("--output can only be used with a single image");
            }
            let invoker = DetectionInvoker::new(DefaultLoader::default(), ctx.settings.model.clone());
            workflow::run_bloom_detection(&ctx, &invoker, &images, output.as_deref(), format)?
        }
        Command::About => workflow::show_about(&ctx, format)?,
    };

    print!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn water_arguments_accept_display_labels_and_negative_ph() {
        let cli = Cli::parse_from(["aquaforge", "water", "--ph", "-1.5", "--color", "Light Green", "--smell", "rotten"]);
        match cli.command {
            Command::Water { ph, color, smell } => {
                assert_eq!(ph, -1.5);
                assert_eq!(color, ColorDescriptor::LightGreen);
                assert_eq!(smell, SmellDescriptor::Rotten);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn bloom_requires_an_image() {
        assert!(Cli::try_parse_from(["aquaforge", "bloom"]).is_err());
    }
}
