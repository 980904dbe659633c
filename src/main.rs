use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Duration;

use signsight::core::{AugmentOptions, Dataset, DirectorySink, augment};
use signsight::{
    FramePipeline, HttpPredictionClient, PipelineConfig, PipelineEvent, PipelineMode,
    PredictionClient, ReplaySource, SignLabel, logging,
};

#[derive(Parser)]
#[command(name = "signsight")]
#[command(about = "Classify hand poses into signs and manage captured sign datasets")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay recorded landmark frames through the classifier
    Replay {
        /// JSON file: array of frames, each an array of hands of {x,y,z} points
        #[arg(value_name = "FRAMES")]
        frames: PathBuf,

        /// Let a remote prediction service at this URL override the rules
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Remote request timeout in milliseconds
        #[arg(long, default_value_t = 5000)]
        timeout_ms: u64,

        /// Ignore remote answers for frames older than one already shown
        #[arg(long)]
        drop_stale: bool,

        /// Capture every frame that has a hand under this label
        #[arg(long, value_name = "LABEL")]
        capture: Option<SignLabel>,

        /// Export the captured dataset into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },

    /// Print the per-label sample counts of a dataset
    Stats {
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,
    },

    /// Balance a dataset by adding jittered copies of under-represented labels
    Augment {
        #[arg(value_name = "DATASET")]
        dataset: PathBuf,

        /// Where to write the augmented dataset
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Sample count each listed label is topped up to
        #[arg(long, default_value_t = 135)]
        target: usize,

        /// Maximum offset added to each coordinate
        #[arg(long, default_value_t = 0.01)]
        noise: f64,

        /// Label to augment (repeatable; defaults to Fist, C-shape, Peace, L-shape)
        #[arg(long = "label", value_name = "LABEL")]
        labels: Vec<SignLabel>,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    match cli.command {
        Command::Replay {
            frames,
            endpoint,
            timeout_ms,
            drop_stale,
            capture,
            export,
        } => {
            let mut source = ReplaySource::load(&frames)?;
            let config = PipelineConfig {
                drop_stale_remote: drop_stale,
            };
            match endpoint {
                Some(url) => {
                    let client = HttpPredictionClient::new(url)
                        .with_timeout(Duration::from_millis(timeout_ms));
                    let pipeline =
                        FramePipeline::new(PipelineMode::RemoteOverride(client)).with_config(config);
                    replay(pipeline, &mut source, capture, export).await
                }
                None => {
                    let pipeline = FramePipeline::rule_only().with_config(config);
                    replay(pipeline, &mut source, capture, export).await
                }
            }
        }
        Command::Stats { dataset } => {
            let dataset = Dataset::load(&dataset)?;
            println!("Class distribution ({} samples):", dataset.len());
            for (label, count) in dataset.class_distribution() {
                println!("  {}: {}", label, count);
            }
            Ok(())
        }
        Command::Augment {
            dataset,
            output,
            target,
            noise,
            labels,
            seed,
        } => {
            let input = Dataset::load(&dataset)?;
            let mut options = AugmentOptions {
                target_count: target,
                noise,
                ..AugmentOptions::default()
            };
            if !labels.is_empty() {
                options.labels = labels;
            }
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };

            let report = augment(&input, &options, &mut rng)?;
            for (label, added) in &report.added {
                if *added > 0 {
                    println!("Augmented {}: added {} samples.", label, added);
                } else {
                    println!("No augmentation needed for {}.", label);
                }
            }
            std::fs::write(&output, report.dataset.to_json()?)
                .with_context(|| format!("Failed to write augmented dataset {:?}", output))?;
            println!(
                "Augmentation complete: {} samples saved to {}",
                report.dataset.len(),
                output.display()
            );
            Ok(())
        }
    }
}

async fn replay<C: PredictionClient>(
    mut pipeline: FramePipeline<C>,
    source: &mut ReplaySource,
    capture: Option<SignLabel>,
    export: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(label) = capture {
        pipeline.state_mut().select_label(label)?;
    }

    pipeline
        .run(source, |event, state| match event {
            PipelineEvent::Frame(seq) => {
                println!("frame {:>4}: {}", seq, state.displayed());
                if capture.is_some() {
                    state.capture();
                }
            }
            PipelineEvent::Remote(seq) => {
                println!("  remote {:>4}: {}", seq, state.displayed());
            }
        })
        .await?;

    // Late remote answers still update what the user would see.
    pipeline.settle().await;
    println!("final: {}", pipeline.state().displayed());

    let state = pipeline.into_state();
    if let Some(dir) = export {
        let mut sink = DirectorySink::new(&dir);
        if state.export_to(&mut sink)? {
            println!(
                "Exported {} samples to {}",
                state.dataset().len(),
                sink.target_path().display()
            );
        } else {
            println!("Nothing captured; export skipped");
        }
    }

    Ok(())
}
