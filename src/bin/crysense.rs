// crysense CLI - classify a cry recording from the command line
//
// Decodes a WAV file, loads a model artifact plus a label source, and
// prints the prediction as JSON on stdout.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crysense::model::DEFAULT_LABEL_COLUMN;
use crysense::{read_wav_path, LabelSpace, PredictionService};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crysense", about = "Classify an infant cry recording")]
struct Args {
    /// WAV file to classify
    wav: PathBuf,

    /// Path to the model artifact (JSON)
    #[arg(long)]
    model: PathBuf,

    /// Training CSV whose label column defines the label space
    #[arg(long, conflicts_with = "label")]
    labels_csv: Option<PathBuf>,

    /// Column of the training CSV holding label names
    #[arg(long, default_value = DEFAULT_LABEL_COLUMN)]
    label_column: String,

    /// Explicit label name (repeat once per category)
    #[arg(long)]
    label: Vec<String>,

    /// Include the extracted feature vector in the output
    #[arg(long)]
    features: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Report {
    prediction: crysense::Prediction,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<crysense::FeatureVector>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let labels = if let Some(csv) = &args.labels_csv {
        LabelSpace::from_csv_path(csv, &args.label_column)
            .with_context(|| format!("reading label space from {}", csv.display()))?
    } else if !args.label.is_empty() {
        LabelSpace::from_labels(args.label.clone()).context("building label space")?
    } else {
        bail!("provide a label source: --labels-csv <csv> or --label <name>...");
    };

    let service = PredictionService::load(&args.model, labels)
        .with_context(|| format!("loading model from {}", args.model.display()))?;

    let waveform = read_wav_path(&args.wav)
        .with_context(|| format!("decoding {}", args.wav.display()))?;

    let features = service
        .extract(&waveform)
        .with_context(|| format!("extracting features from {}", args.wav.display()))?;
    let prediction = service
        .predict(features.as_slice())
        .context("running inference")?;

    let report = Report {
        prediction,
        features: args.features.then_some(features),
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&report).context("serializing report")?
    } else {
        serde_json::to_string(&report).context("serializing report")?
    };
    println!("{json}");

    Ok(())
}
