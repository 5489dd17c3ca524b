use std::{error::Error, process::exit};

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use stash_rs::{initialize_db, run_seed};

/// A utility for populating a Stash database with a demo user, a demo
/// account, and two months of sample transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database to seed.
    #[arg(long, short)]
    db_path: String,
}

/// Seed sample data for local development.
fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(filter::LevelFilter::INFO))
        .init();

    let args = Args::parse();

    if let Err(error) = seed(&args) {
        tracing::error!("Seeding failed: {error}");
        exit(1);
    }
}

fn seed(args: &Args) -> Result<(), Box<dyn Error>> {
    println!("Seeding Stash demo data into {}", args.db_path);

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    let today = OffsetDateTime::now_utc().date();
    let count = run_seed(&mut rand::thread_rng(), today, &connection)?;

    println!("Created {count} transactions");
    println!("Seeding complete!");

    Ok(())
}
