use std::env;
use std::error::Error;
use std::fmt::Display;
use std::io;
use std::process::exit;
use std::str::FromStr;

use getopts::{Matches, Options};
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod game;
mod json_output;
mod presentation;
mod referee;
mod session;
mod strategies;
mod strategy;

use crate::game::{GameConfig, Operation, DEFAULT_MAX_MOVE, DEFAULT_UPPER_BOUND};
use crate::session::ConsoleSession;
use crate::strategy::{StrategyRegistry, DEFAULT_STRATEGY_KEY};

fn print_usage(program: &str, opts: &Options) {
    print!("{}", opts.usage(&format!("Usage: {} [options]", program)));
}

fn opt_or<T>(matches: &Matches, name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    match matches.opt_str(name) {
        Some(text) => text
            .parse()
            .map_err(|err| format!("invalid value for --{}: {}", name, err)),
        None => Ok(default),
    }
}

fn run(matches: &Matches, registry: &StrategyRegistry) -> Result<(), Box<dyn Error>> {
    let operation: Operation = match matches.opt_str("o") {
        Some(text) => text.parse()?,
        None => Operation::Addition,
    };
    let config = GameConfig {
        operation,
        upper_bound: opt_or(matches, "b", DEFAULT_UPPER_BOUND)?,
        max_move: opt_or(matches, "m", DEFAULT_MAX_MOVE)?,
        ..GameConfig::default()
    };
    config.validate()?;

    let seed = match matches.opt_str("seed") {
        Some(text) => text
            .parse()
            .map_err(|err| format!("invalid value for --seed: {}", err))?,
        None => rand::thread_rng().next_u64(),
    };
    let key = matches
        .opt_str("s")
        .map(|text| text.to_lowercase())
        .unwrap_or_else(|| DEFAULT_STRATEGY_KEY.to_string());
    let strategy = registry.resolve(&key, ChaChaRng::seed_from_u64(seed))?;
    info!(
        "{} game to {} with moves up to {}, {} strategy, seed {}",
        config.operation, config.upper_bound, config.max_move, key, seed
    );

    let mut session = ConsoleSession::new(config, strategy, matches.opt_present("j"));
    session.run(&mut io::stdout())?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args[0].clone();
    let registry = StrategyRegistry::new();

    let mut opts = Options::new();
    opts.optopt(
        "b",
        "bound",
        &format!(
            "target count (addition) or starting count (subtraction); default {}",
            DEFAULT_UPPER_BOUND
        ),
        "BOUND",
    );
    opts.optopt(
        "m",
        "max",
        &format!(
            "maximum amount added or subtracted per move; default {}",
            DEFAULT_MAX_MOVE
        ),
        "MAX",
    );
    opts.optopt(
        "o",
        "operation",
        "direction of play, 'add' or 'subtract'; default add",
        "OPERATION",
    );
    opts.optopt(
        "s",
        "strategy",
        &format!(
            "computer strategy, one of '{}'; default {}",
            registry.keys().join("', '"),
            DEFAULT_STRATEGY_KEY
        ),
        "STRATEGY",
    );
    opts.optopt("", "seed", "seed for the computer's random choices", "SEED");
    opts.optopt(
        "l",
        "loglevel",
        "log level: trace, debug, info, warn or error; default warn",
        "LOGLEVEL",
    );
    opts.optflag("j", "json", "print a JSON transcript of each finished game");
    opts.optflag("h", "help", "print this help menu");

    let matches = match opts.parse(&args[1..]) {
        Ok(matches) => matches,
        Err(failure) => {
            eprintln!("{}", failure);
            print_usage(&program, &opts);
            exit(2);
        }
    };
    if matches.opt_present("h") {
        print_usage(&program, &opts);
        return;
    }

    let level = matches.opt_str("l").unwrap_or_else(|| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(&matches, &registry) {
        eprintln!("{}", err);
        print_usage(&program, &opts);
        exit(1);
    }
}
