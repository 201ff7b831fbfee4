// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and prints results. All work is
// delegated to Layer 2 (application).
//
//   1. `train`   — generate data, train, evaluate, save checkpoint
//   2. `predict` — load the checkpoint and price one house

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, TrainArgs};

use crate::application::train_use_case::TrainReport;

#[derive(Parser, Debug)]
#[command(
    name = "house-price-trainer",
    version,
    about = "Train an MLP house-price regressor with early stopping, then predict prices."
)]
pub struct Cli {
    /// The subcommand to run (train or predict)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)   => run_train(args),
            Commands::Predict(args) => run_predict(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training, checkpoints go to '{}'", args.checkpoint_dir);
    let report = TrainUseCase::new(args.into()).execute()?;
    print_report(&report);
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(&args.checkpoint_dir)?;
    let house    = args.house();
    let price    = use_case.predict(&house)?;
    println!(
        "\n{:.0} m², {} rooms, floor {}, {} years, {:.1} km to metro, school district: {}, {} decoration",
        house.area,
        house.rooms,
        house.floor,
        house.age,
        house.metro_distance,
        if house.school_district { "yes" } else { "no" },
        house.decoration_label(),
    );
    println!("Predicted price: {:.0}", price);
    Ok(())
}

fn print_report(r: &TrainReport) {
    println!("\nTraining {} after {} epochs", r.status, r.epochs_run);
    println!("Best epoch: {} (val_loss={:.6})", r.best_epoch, r.best_val_loss);

    println!("\nTest set");
    println!("  MSE  : {:.2}", r.test.mse);
    println!("  RMSE : {:.2}", r.test.rmse());
    println!("  MAE  : {:.2}", r.test.mae);
    println!("  R²   : {:.4}", r.test.r2);
    println!("  MAPE : {:.2}%", r.test.mape * 100.0);

    println!("\nFeature importance (mean |first-layer weight|)");
    for (name, weight) in &r.feature_importance {
        println!("  {:<16} {:.4}", name, weight);
    }

    println!("\nExample predictions");
    for (house, price) in &r.example_predictions {
        println!(
            "  {:>5.0} m², {} rooms, floor {:>2}, {:>2} years, metro {:.1} km, school {}, {:<7} → {:>10.0}",
            house.area,
            house.rooms,
            house.floor,
            house.age,
            house.metro_distance,
            if house.school_district { "yes" } else { "no " },
            house.decoration_label(),
            price,
        );
    }
    println!("\nCheckpoint and reports saved in '{}'", r.checkpoint_dir.display());
}
