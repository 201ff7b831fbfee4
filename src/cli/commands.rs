// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `predict`, and
// their flags. clap's derive macros generate --help, error
// messages for missing args and the string → number parsing.

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;
use crate::domain::house::HouseFeatures;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate data, train the MLP with early stopping and report test metrics
    Train(TrainArgs),

    /// Predict the price of one house from a trained checkpoint
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory for the best checkpoint, scalers and reports
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of synthetic houses to generate
    #[arg(long, default_value_t = 2000)]
    pub num_samples: usize,

    /// Seed for data generation and splitting
    #[arg(long, default_value_t = 42)]
    pub data_seed: u64,

    /// Share of all samples held out for the final test
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Share of the remaining samples used for validation
    #[arg(long, default_value_t = 0.2)]
    pub val_fraction: f64,

    /// Samples per optimiser step
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Upper bound on the number of epochs
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Epochs without validation improvement before stopping
    #[arg(long, default_value_t = 10)]
    pub patience: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Seed for weight init, dropout and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            checkpoint_dir: a.checkpoint_dir,
            num_samples:    a.num_samples,
            data_seed:      a.data_seed,
            test_fraction:  a.test_fraction,
            val_fraction:   a.val_fraction,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            patience:       a.patience,
            lr:             a.lr,
            seed:           a.seed,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Floor area in square metres
    #[arg(long)]
    pub area: f32,

    #[arg(long)]
    pub rooms: u32,

    #[arg(long)]
    pub floor: u32,

    /// Building age in years
    #[arg(long)]
    pub age: u32,

    /// Distance to the nearest metro station in km
    #[arg(long)]
    pub metro_distance: f32,

    /// The house is in a sought-after school district
    #[arg(long)]
    pub school_district: bool,

    /// 0 = basic, 1 = fine, 2 = luxury
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=2))]
    pub decoration: u32,

    /// Directory where `train` saved its checkpoint
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}

impl PredictArgs {
    pub fn house(&self) -> HouseFeatures {
        HouseFeatures {
            area:            self.area,
            rooms:           self.rooms,
            floor:           self.floor,
            age:             self.age,
            metro_distance:  self.metro_distance,
            school_district: self.school_district,
            decoration:      self.decoration,
        }
    }
}
