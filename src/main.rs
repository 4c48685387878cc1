use clap::Parser;
use std::path::PathBuf;
use valentine::config::{self, Credentials, RunConfig};
use valentine::imaging::{CardBackend, RustBackend};
use valentine::platform::RestClient;
use valentine::{output, pipeline};

#[derive(Parser)]
#[command(name = "valentine")]
#[command(about = "Send a personalized valentine image to every follower")]
#[command(long_about = "\
Send a personalized valentine image to every follower

One invocation runs the whole pipeline: wipe the output directory, load the
base image and font, log in, fetch one page of followers, render a card per
follower (handle drawn onto a clone of the base image), upload each card and
post \"@handle <message>\" with it attached.

Credentials come from the environment (a .env file is honored):

  CONSUMER_TOKEN          OAuth consumer key
  CONSUMER_TOKEN_SECRET   OAuth consumer secret
  ACCESS_TOKEN            OAuth access token
  ACCESS_TOKEN_SECRET     OAuth access token secret

Optional:

  VALENTINE_MESSAGES      |-separated greeting candidates (one is picked
                          uniformly at random per follower)

Follower sets larger than one page (100 accounts) are truncated — the
fetch never paginates.")]
#[command(version)]
struct Cli {
    /// Base image every card is cloned from
    #[arg(long, default_value = "beaver.jpg")]
    image: PathBuf,

    /// TrueType font for the handle overlay
    #[arg(long, default_value = "font.ttf")]
    font: PathBuf,

    /// Directory for rendered cards (wiped on every run)
    #[arg(long, default_value = ".tmp/valentines")]
    output_dir: PathBuf,

    /// Greet every follower, not just mutuals
    #[arg(long)]
    everyone: bool,

    /// Follower page size (capped at 100 — the fetch never paginates)
    #[arg(long, default_value_t = config::MAX_PAGE_SIZE)]
    count: u32,
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
    std::process::exit(0);
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let credentials = Credentials::from_env()?;
    let config = RunConfig {
        image_path: cli.image,
        font_path: cli.font,
        output_dir: cli.output_dir,
        mutual_only: !cli.everyone,
        page_size: cli.count,
        messages: std::env::var("VALENTINE_MESSAGES")
            .ok()
            .and_then(|raw| config::parse_messages(&raw))
            .unwrap_or_else(|| {
                config::DEFAULT_MESSAGES
                    .iter()
                    .map(|m| m.to_string())
                    .collect()
            }),
        ..RunConfig::default()
    }
    .validated()?;

    output::print_stage("Loading assets");
    let backend = RustBackend::open(&config.image_path, &config.font_path)?;
    let dims = backend.dimensions();
    println!("Loaded template {}x{}", dims.width, dims.height);
    let client = RestClient::new(credentials)?;

    let report = pipeline::run(&config, &backend, &client)?;
    output::print_report(&report);
    println!("done :)");
    Ok(())
}
