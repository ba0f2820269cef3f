use anyhow::Result;
use clap::Parser;
use colored::*;

use testing_tools::output::print_test_summary;
use testing_tools::scenarios::{self, SETTLE};
use testing_tools::ws_client::Connection;

#[derive(Parser)]
#[command(name = "relay-test-client")]
#[command(about = "Broadcast relay integration testing tool")]
struct Cli {
    /// WebSocket base URL of the server (e.g., ws://localhost:3000)
    #[arg(long, default_value = "ws://localhost:3000")]
    base_url: String,

    /// Test scenario to run
    #[arg(long, value_enum, default_value = "all")]
    scenario: ScenarioChoice,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone)]
enum ScenarioChoice {
    /// Sender and another client both receive a string message
    Broadcast,
    /// Object payloads arrive deep-equal
    ObjectPayload,
    /// A late joiner receives no earlier messages
    NoReplay,
    /// A departed client does not disturb the broadcast
    Disconnect,
    /// Run every scenario
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{}", "=== SETUP PHASE ===".bright_white().bold());

    println!("\n{} Establishing socket connections...", "→".blue());
    let mut a = Connection::establish(&cli.base_url, "Client A (sender)".to_string()).await?;
    let mut b = Connection::establish(&cli.base_url, "Client B".to_string()).await?;
    tokio::time::sleep(SETTLE).await;

    println!("{} Client A connection established", "✓".green());
    println!("{} Client B connection established", "✓".green());

    println!("\n{}", "=== TEST PHASE ===".bright_white().bold());

    let mut results = Vec::new();

    match cli.scenario {
        ScenarioChoice::Broadcast => {
            results.push(scenarios::test_broadcast(&mut a, &mut b).await?);
        }
        ScenarioChoice::ObjectPayload => {
            results.push(scenarios::test_object_payload(&mut a, &mut b).await?);
        }
        ScenarioChoice::NoReplay => {
            results.push(scenarios::test_no_replay(&cli.base_url, &mut a, &mut b).await?);
        }
        ScenarioChoice::Disconnect => {
            results.push(scenarios::test_disconnect(&cli.base_url, &mut a, &mut b).await?);
        }
        ScenarioChoice::All => {
            results.push(scenarios::test_broadcast(&mut a, &mut b).await?);
            results.push(scenarios::test_object_payload(&mut a, &mut b).await?);
            results.push(scenarios::test_no_replay(&cli.base_url, &mut a, &mut b).await?);
            results.push(scenarios::test_disconnect(&cli.base_url, &mut a, &mut b).await?);
        }
    }

    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(&results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All tests passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some tests failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
