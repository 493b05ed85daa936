use clap::Parser;
use env_logger::Env;
use log::error;
use sloka_api::loader::{self, Outcome};
use sloka_api::store::{Store, StoreSettings};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Loads a JSON array of slokas into the database, replacing what is there.
#[derive(Parser, Debug)]
#[command(name = "sloka-seed", version)]
struct Args {
    /// Dataset to load.
    #[arg(long, default_value = "data/verses.json")]
    file: PathBuf,

    /// Database location; defaults to `DATABASE_URL`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Replace existing verses without asking.
    #[arg(long, short = 'y')]
    yes: bool,
}

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let args = Args::parse();

    if let Err(e) = seed(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn seed(args: Args) -> Result<(), loader::LoadError> {
    let dataset = loader::read_dataset(&args.file)?;
    if !dataset.rejected.is_empty() {
        println!(
            "{} of {} entries in {} are invalid and will be skipped",
            dataset.rejected.len(),
            dataset.rejected.len() + dataset.verses.len(),
            args.file.display()
        );
    }

    let store = Store::new(StoreSettings::new(
        &args.database_url,
        Duration::from_secs(5),
    ));
    store.connect().await?;

    let stdin = io::stdin();
    let outcome = loader::run(
        &store,
        dataset,
        args.yes,
        &mut stdin.lock(),
        &mut io::stdout(),
    )
    .await;
    store.close().await?;

    match outcome? {
        Outcome::Loaded(report) => println!("Inserted {} slokas", report.inserted),
        Outcome::Cancelled => println!("Operation cancelled."),
    }
    Ok(())
}
