use movierec::app::catalog::{Catalog, TmdbCatalog};
use movierec::app::genres::GenreSelection;
use movierec::app::ratings::RatingStore;
use movierec::app::types::{MovieSummary, QueryKind};
use movierec::app::utils::{vote_label, year_label};
use movierec::config::load_config;
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args: Vec<String> = env::args().collect();
    if args.len() == 1 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let cfg = load_config();

    if args.iter().any(|a| a == "--ratings") {
        let store = RatingStore::load(cfg.ratings_path());
        println!("{} ratings in {}", store.len(), store.path().display());
        for (id, rating) in store.iter() {
            println!("{id:>10}  {}", "★".repeat(usize::from(rating)));
        }
        return;
    }

    let kind = if args.iter().any(|a| a == "--popular") {
        QueryKind::Popular
    } else if let Some(text) = value_after(&args, "--search") {
        if text.is_empty() {
            eprintln!("--search needs a non-empty query");
            std::process::exit(1);
        }
        QueryKind::Search(text)
    } else if let Some(list) = value_after(&args, "--genres") {
        let mut selection = GenreSelection::default();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if let Err(e) = selection.toggle_by_name(name) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        if selection.is_empty() {
            eprintln!("Please select at least one genre first!");
            std::process::exit(1);
        }
        QueryKind::Discover(selection.joined_ids())
    } else {
        print_usage();
        std::process::exit(1);
    };

    let catalog = match TmdbCatalog::new(&cfg) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match catalog.fetch(&kind) {
        Ok(movies) => print_movies(&movies),
        Err(e) => {
            eprintln!("{} request failed: {e}", kind.label());
            std::process::exit(2);
        }
    }
}

fn value_after(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .map(|i| args.get(i + 1).cloned().unwrap_or_default())
}

fn print_movies(movies: &[MovieSummary]) {
    println!("{} movies", movies.len());
    for m in movies {
        println!(
            "{:>10}  {:>4}  {:>4}  {}",
            m.id,
            year_label(m.release_date.as_deref()),
            vote_label(m.vote_average),
            m.title
        );
    }
}

fn print_usage() {
    println!(
        r#"MovieRec catalog probe.

Usage:
  cargo run --bin catalog_probe -- --popular
      First page of the popular list.

  cargo run --bin catalog_probe -- --search <text>
      Free-text search.

  cargo run --bin catalog_probe -- --genres Horror,Thriller
      Discovery by genre, sorted by popularity.

  cargo run --bin catalog_probe -- --ratings
      Dump stored personal ratings.

Reads config.json / MOVIEREC_API_KEY like the app does.
"#
    );
}
