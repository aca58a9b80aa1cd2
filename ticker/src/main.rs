use clap::Parser;
use ticker::{Ticker, TickerConfiguration, TickerResult};
use timekeeping::error::CommonError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        default_value_t = String::from("ticker/configurations/ticker_config.json")
    )]
    config_file: String,
    #[arg(short, long, default_value_t = String::from("ticker/log_config.yml"))]
    log_config: String,
}

#[derive(Debug)]
struct App {
    config: TickerConfiguration,
}

impl App {
    fn new(config: TickerConfiguration) -> Self {
        Self { config }
    }

    fn run(&self) -> Result<(), CommonError> {
        log::debug!("{:?}", self.config);
        let ticker = Ticker::new(self.config.clone());
        let (result, outcome) = match ticker.execute() {
            Ok(result) => (result, Ok(())),
            Err(e) => (TickerResult::from_error(e.to_string()), Err(e)),
        };

        let report = serde_json::to_string_pretty(&result)
            .map_err(|e| CommonError::Config(format!("failed to serialize result: {}", e)))?;
        log::info!("Result {:#}", report);

        outcome
    }
}

fn main() {
    let args = Cli::parse();
    let _ = log4rs::init_file(&args.log_config, Default::default());

    let config = match TickerConfiguration::from_file(&args.config_file) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load {}: {}", args.config_file, e);
            std::process::exit(1);
        }
    };

    let app = App::new(config);
    if let Err(e) = app.run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
