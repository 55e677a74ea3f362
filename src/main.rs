use clap::Parser;
use popsolar::utils::error::ErrorSeverity;
use popsolar::utils::{logger, validation::Validate};
use popsolar::{
    Callbacks, CliConfig, Command, DataClient, Delivery, DispatchState, FetchError, FetchHandle,
    PopulationResponse, PopulationSummary, SolarData, SolarQuery, SolarRow,
};

fn print_population(country: &str, response: PopulationResponse) {
    match PopulationSummary::from_response(&response) {
        Some(summary) => {
            println!("Population of {}", country);
            println!("  Today:    {}", summary.today_text);
            println!("  Tomorrow: {}", summary.tomorrow_text);
        }
        None => eprintln!("❌ Response did not contain today and tomorrow"),
    }
}

fn print_solar(data: SolarData) {
    for row in SolarRow::rows(&data) {
        println!("{:<32} {:>8}", row.title, row.value);
        for (month, value) in row.description_lines() {
            println!("    {:<6} {:>8}", month, value);
        }
    }
}

fn report_error(error: FetchError) {
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 Suggestion: {}", error.recovery_suggestion());
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn start(client: &DataClient, command: &Command) -> popsolar::Result<FetchHandle> {
    match command {
        Command::Population { country } => {
            let name = country.clone();
            let callbacks = Callbacks::new(move |response: PopulationResponse| {
                print_population(&name, response)
            })
            .with_error(report_error);
            client.population(country, callbacks)
        }
        Command::Solar { params } => {
            let query: SolarQuery = params.iter().cloned().collect();
            let callbacks = Callbacks::new(print_solar).with_error(report_error);
            client.solar(&query, callbacks)
        }
    }
}

fn prepare(cli: &CliConfig) -> popsolar::Result<FetchHandle> {
    let config = cli.resolve()?;
    config.validate()?;
    let client = DataClient::from_config(&config)?;
    start(&client, &cli.command)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let handle = match prepare(&cli) {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(
                "❌ Could not start fetch: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            let code = exit_code(e.severity());
            report_error(e);
            std::process::exit(code);
        }
    };

    let token = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, cancelling fetch");
            token.cancel();
        }
    });

    match handle.join().await {
        DispatchState::Delivered(Delivery::Value) => Ok(()),
        DispatchState::Delivered(Delivery::Error) => std::process::exit(1),
        DispatchState::Delivered(Delivery::Suppressed) => {
            eprintln!("⚠️  No data received (run with --strict or --verbose for details)");
            std::process::exit(2);
        }
        DispatchState::Cancelled | DispatchState::Pending => {
            eprintln!("Cancelled");
            std::process::exit(130);
        }
    }
}
