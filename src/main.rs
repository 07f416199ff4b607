#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

use std::process;
use std::time::Duration;

use congestion::{source, Config, LogObserver, Pipeline};
use docopt::Docopt;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const USAGE: &str = "
Report the most congested traffic lights.

Each input line is `<timestamp>,<lightID>,<vehicleCount>`. Without an
input file a small built in sample is processed.

Usage:
  congestion [options] [<input>]
  congestion (-h | --help)
  congestion (-v | --version)

Options:
  -h --help         Show this screen.
  -v --version      Show version.
  -p <producers>    number of producer threads [default: 2].
  -c <consumers>    number of consumer threads, 0 for one per cpu [default: 2].
  -q <size>         queue capacity [default: 10].
  -n <top>          number of lights to report [default: 3].
  -d <millis>       pause of each producer after a push [default: 0].
  -w <millis>       pause of each consumer after a line [default: 0].
";

#[derive(Debug, Deserialize)]
struct Args {
    arg_input: Option<String>,
    flag_p: usize,
    flag_c: usize,
    flag_q: usize,
    flag_n: usize,
    flag_d: u64,
    flag_w: u64,
    flag_v: bool,
}

fn main() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if args.flag_v {
        return println!("congestion: {}", VERSION);
    }

    let mut config = Config::new();
    config
        .set_producers(args.flag_p)
        .set_consumers(args.flag_c)
        .set_queue_size(args.flag_q)
        .set_top_n(args.flag_n)
        .set_throttle(Duration::from_millis(args.flag_d))
        .set_consumer_throttle(Duration::from_millis(args.flag_w));

    let lines = match args.arg_input {
        Some(ref path) => match source::from_path(path) {
            Ok(lines) => lines,
            Err(e) => {
                error!("{}: {}", path, e);
                process::exit(1);
            }
        },
        None => source::sample(),
    };

    let outcome = match Pipeline::new(config).run(&lines, &LogObserver) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    println!("Top {} congested traffic lights:", args.flag_n);
    for entry in &outcome.ranking {
        println!("{}", entry);
    }
}
