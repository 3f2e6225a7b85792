// Terminal client for the prompt optimization service.
//
// Streams agent logs as they arrive, prints the optimized prompt, and keeps
// the session open for "refine again" rounds until a blank line is entered.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use prompt_optimizer::render;
use prompt_optimizer::types::options::BASE_URL_ENV;
use prompt_optimizer::{ClientOptions, OptimizerClient, SessionStatus, SessionUpdate, UpdateFeed};

#[derive(Debug, Parser)]
#[command(name = "prompt-optimizer", version, about = "Multi-agent prompt optimizer client")]
struct Cli {
    /// Server base URL
    #[arg(long, env = BASE_URL_ENV, default_value = prompt_optimizer::types::options::DEFAULT_BASE_URL)]
    url: String,

    /// Prompt to optimize; reads prompts interactively when omitted
    #[arg(long, short)]
    prompt: Option<String>,

    /// Exit after the first submission
    #[arg(long)]
    once: bool,

    /// Connect timeout in seconds
    #[arg(long)]
    connect_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut builder = ClientOptions::builder().base_url(&cli.url);
    if let Some(secs) = cli.connect_timeout {
        builder = builder.connect_timeout(std::time::Duration::from_secs(secs));
    }
    let options = builder.build();
    let client = OptimizerClient::from_options(&options).context("failed to create client")?;

    // Status bar is informational; don't hold up the first prompt for it
    let status_client = client.clone();
    tokio::spawn(async move {
        let display = status_client.load_model_status().await;
        println!("{}", render::model_status_bar(&display));
    });

    let mut updates = client.subscribe();

    if let Some(prompt) = cli.prompt.as_deref() {
        run_round(&client, &mut updates, prompt).await;
        if cli.once {
            return exit_for(&client.status());
        }
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} > ", render::submit_label(&client.snapshot()));
        std::io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = stdin.next_line().await.context("failed to read stdin")? else {
            break;
        };
        match line.trim() {
            "" => break,
            ":reset" => {
                client.reset();
                print_updates(updates.drain());
            }
            ":status" => println!("{}", render::model_status_bar(&client.model_status())),
            ":show" => print!("{}", render::session_view(&client.snapshot())),
            prompt => {
                run_round(&client, &mut updates, prompt).await;
                if cli.once {
                    break;
                }
            }
        }
    }

    exit_for(&client.status())
}

/// Submit one prompt, echoing updates as they arrive
///
/// The result and status are printed only after every update of the round.
async fn run_round(client: &OptimizerClient, updates: &mut UpdateFeed, prompt: &str) {
    let submit = client.submit(prompt);
    tokio::pin!(submit);
    let status = loop {
        tokio::select! {
            status = &mut submit => break status,
            Some(update) = updates.next() => print_updates([update]),
        }
    };
    print_updates(updates.drain());

    if status.is_none() {
        return;
    }
    let session = client.snapshot();
    if !session.result().is_empty() {
        println!("\n== Optimized Result ==\n{}\n", session.result());
    }
    println!("{}", render::status_line(session.status()));
}

fn print_updates(updates: impl IntoIterator<Item = SessionUpdate>) {
    for update in updates {
        if let Some(line) = render::update_line(&update) {
            println!("{line}");
        }
    }
}

fn exit_for(status: &SessionStatus) -> Result<()> {
    match status {
        SessionStatus::Failed(message) => anyhow::bail!("optimization failed: {message}"),
        _ => Ok(()),
    }
}
