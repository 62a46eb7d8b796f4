use clap::Parser;

use greader_notify::cli::Cli;
use greader_notify::config::Config;
use greader_notify::errors::NotifierResult;
use greader_notify::logging;
use greader_notify::reader::{GReaderClient, ReaderApi};
use greader_notify::services::{AppriseDispatcher, Dispatcher, DryRunDispatcher, PollService};

fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> NotifierResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    let reader = GReaderClient::new(&config.freshrss_url, config.request_timeout)?;

    if cli.dry_run {
        tracing::info!("Dry run: notifications will be logged, not sent");
        poll(reader, DryRunDispatcher, &config, cli.once)
    } else {
        poll(reader, AppriseDispatcher::from_config(&config), &config, cli.once)
    }
}

fn poll<R: ReaderApi, D: Dispatcher>(
    reader: R,
    dispatcher: D,
    config: &Config,
    once: bool,
) -> NotifierResult<()> {
    tracing::info!(url = %config.freshrss_url, "Connecting to feed reader");

    let mut service = PollService::start(reader, dispatcher, &config.username, &config.password)?;

    if once {
        service.run_with(config.poll_interval, Some(0), |_| {});
    } else {
        service.run(config.poll_interval);
    }

    Ok(())
}
