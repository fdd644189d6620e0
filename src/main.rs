//! sigma-nn CLI: train, evaluate and query digit classifiers on IDX data.

use std::fs::OpenOptions;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sigma_nn::data::{open_mnist_test, open_mnist_training, pixels, MnistSet};
use sigma_nn::{
    evaluate, train_loop, Matrix, Network, NetworkOptionsUpdate, Result, SampleStream, TrainConfig,
};

#[derive(Parser)]
#[command(name = "sigma-nn")]
#[command(about = "Sigmoid feed-forward network trained by manual back-propagation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a network on the MNIST training set
    Train {
        /// Directory holding the four MNIST IDX files
        #[arg(short, long)]
        data: PathBuf,

        /// Layer sizes of a fresh network, e.g. 784,200,80,10
        #[arg(long, value_delimiter = ',', required_unless_present = "model")]
        layers: Vec<usize>,

        /// Continue training an existing model instead of starting fresh
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Where to write the trained model (must not exist yet)
        #[arg(short, long)]
        out: PathBuf,

        #[arg(short, long, default_value = "1")]
        epochs: usize,

        #[arg(long)]
        batch_size: Option<usize>,

        #[arg(long)]
        learning_rate: Option<f64>,

        /// Multiply the batch size by this factor after every epoch
        #[arg(long, default_value = "1")]
        batch_growth: usize,

        /// Use at most this many training samples per epoch
        #[arg(long)]
        limit: Option<usize>,

        /// Log every applied batch
        #[arg(long)]
        progress: bool,

        /// Feed raw 0-255 pixel bytes instead of values scaled to [0, 1]
        #[arg(long)]
        raw_pixels: bool,
    },

    /// Report accuracy of a model on the MNIST test set
    Eval {
        #[arg(short, long)]
        data: PathBuf,

        #[arg(short, long)]
        model: PathBuf,

        #[arg(long)]
        limit: Option<usize>,

        /// Feed raw 0-255 pixel bytes instead of values scaled to [0, 1]
        #[arg(long)]
        raw_pixels: bool,
    },

    /// Classify a single image file
    Predict {
        #[arg(short, long)]
        model: PathBuf,

        /// PNG, JPEG, BMP or GIF; resized to the model's input size
        image: PathBuf,

        #[arg(long, default_value = "28")]
        width: u32,

        #[arg(long, default_value = "28")]
        height: u32,

        /// Feed raw 0-255 pixel values instead of values scaled to [0, 1]
        #[arg(long)]
        raw_pixels: bool,
    },

    /// Export the first test samples as a JSON fixture
    ExportTest {
        #[arg(short, long)]
        data: PathBuf,

        #[arg(short, long)]
        out: PathBuf,

        #[arg(long, default_value = "100")]
        limit: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Train {
            data,
            layers,
            model,
            out,
            epochs,
            batch_size,
            learning_rate,
            batch_growth,
            limit,
            progress,
            raw_pixels,
        } => {
            let options = NetworkOptionsUpdate {
                learning_rate,
                batch_size,
                progress: progress.then_some(true),
            };
            let mut config = TrainConfig::new(epochs);
            config.options = options;
            config.batch_growth = batch_growth;
            config.limit = limit;
            cmd_train(&data, layers, model.as_deref(), &out, &config, raw_pixels)
        }
        Commands::Eval { data, model, limit, raw_pixels } => cmd_eval(&data, &model, limit, raw_pixels),
        Commands::Predict { model, image, width, height, raw_pixels } => {
            cmd_predict(&model, &image, width, height, raw_pixels)
        }
        Commands::ExportTest { data, out, limit } => cmd_export_test(&data, &out, limit),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Switches the set's images to raw bytes when asked.
fn with_pixels(set: MnistSet, raw_pixels: bool) -> MnistSet {
    if raw_pixels {
        MnistSet { images: set.images.raw_pixels(), labels: set.labels }
    } else {
        set
    }
}

fn cmd_train(
    data: &Path,
    layers: Vec<usize>,
    model: Option<&Path>,
    out: &Path,
    config: &TrainConfig,
    raw_pixels: bool,
) -> Result<()> {
    let mut network = match model {
        Some(path) => Network::from_json_file(path)?,
        None => Network::new(layers),
    };
    info!(layers = ?network.layers(), options = ?network.options(), "starting training");

    train_loop(
        &mut network,
        |_| {
            let training = with_pixels(open_mnist_training(data)?, raw_pixels);
            Ok((training.images, training.labels))
        },
        config,
    )?;
    network.serialize().save_json(out)?;

    let test = with_pixels(open_mnist_test(data)?, raw_pixels);
    let eval = evaluate(&network, test.images, test.labels)?;
    println!("test accuracy: {:.4} ({}/{})", eval.accuracy, eval.correct, eval.samples);
    Ok(())
}

fn cmd_eval(data: &Path, model: &Path, limit: Option<usize>, raw_pixels: bool) -> Result<()> {
    let network = Network::from_json_file(model)?;
    let mut test = with_pixels(open_mnist_test(data)?, raw_pixels);
    if let Some(limit) = limit {
        test.limit(limit);
    }
    let eval = evaluate(&network, test.images, test.labels)?;
    println!("accuracy: {:.4} ({}/{})", eval.accuracy, eval.correct, eval.samples);
    println!("mean loss: {:.6}", eval.mean_loss);
    Ok(())
}

fn cmd_predict(model: &Path, image: &Path, width: u32, height: u32, raw_pixels: bool) -> Result<()> {
    let network = Network::from_json_file(model)?;
    let mut input = pixels::grayscale_input_from_file(image, width, height)?;
    if raw_pixels {
        input = input.scalar_multiply(255.0);
    }
    let output = network.feed_forward(&input)?;
    for (class, score) in output.column_values().iter().enumerate() {
        println!("{}: {:.4}", class, score);
    }
    match output.argmax() {
        Some(class) => println!("prediction: {}", class),
        None => println!("prediction: none (empty output)"),
    }
    Ok(())
}

#[derive(Serialize)]
struct TestFixture {
    images: Vec<Matrix>,
    labels: Vec<Matrix>,
}

fn cmd_export_test(data: &Path, out: &Path, limit: usize) -> Result<()> {
    let mut test = open_mnist_test(data)?;
    test.limit(limit);

    let mut fixture = TestFixture { images: Vec::new(), labels: Vec::new() };
    while let (Some(image), Some(label)) = (test.images.next_sample(), test.labels.next_sample()) {
        fixture.images.push(image);
        fixture.labels.push(label);
    }

    let file = OpenOptions::new().write(true).create_new(true).open(out)?;
    serde_json::to_writer(BufWriter::new(file), &fixture)?;
    info!(path = %out.display(), samples = fixture.images.len(), "exported test fixture");
    Ok(())
}
