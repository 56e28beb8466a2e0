use anyhow::Context;
use clap::{Parser, Subcommand};
use shelfmatch_core::{BookRecord, Preference, Recommender, RecommenderConfig};
use shelfmatch_storage::CsvCorpus;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend books from a personal library
#[derive(Parser, Debug)]
#[command(name = "shelfmatch")]
#[command(about = "Content-based book recommendations", long_about = None)]
struct Args {
    /// Path to the library CSV
    #[arg(short, long, default_value = "./books.csv")]
    library: PathBuf,

    /// Optional JSON recommender configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Books most similar to the given one
    Similar {
        /// Id (ISBN-13) of the reference book
        id: String,

        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Books closest to stated preferences
    Prefer {
        /// Preferred category, repeatable
        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(long)]
        min_rating: Option<f64>,

        #[arg(long)]
        year_from: Option<i32>,

        #[arg(long, default_value_t = 6)]
        top: usize,
    },
    /// Categories in the library, most frequent first
    Categories {
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            RecommenderConfig::from_json(&json)?
        }
        None => RecommenderConfig::default(),
    };

    info!("Starting shelfmatch v{}", env!("CARGO_PKG_VERSION"));
    info!("Library: {:?}", args.library);

    let recommender = Recommender::new(CsvCorpus::new(&args.library), config)?;
    recommender
        .refresh()
        .with_context(|| format!("building model from {}", args.library.display()))?;

    match args.command {
        Command::Similar { id, top } => {
            for (book, score) in recommender.recommend_similar(&id, top)? {
                print_row(score, &book);
            }
        }
        Command::Prefer {
            categories,
            min_rating,
            year_from,
            top,
        } => {
            let preference = Preference {
                categories: categories.into_iter().collect(),
                min_rating,
                year_from,
            };
            for (book, distance) in recommender.recommend_by_preference(&preference, top)? {
                print_row(distance, &book);
            }
        }
        Command::Categories { top } => {
            for (category, count) in recommender.categories()?.into_iter().take(top) {
                println!("{}\t{}", count, category);
            }
        }
    }

    Ok(())
}

fn print_row(value: f32, book: &BookRecord) {
    println!(
        "{:.4}\t{}\t{}\t{}",
        value,
        book.id,
        book.title(),
        book.authors()
    );
}
