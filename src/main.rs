use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use lumopack_studio_lib::api::{pricing_request_from, ApiClient, ChatBackend};
use lumopack_studio_lib::config::{resolve_config, PartialConfig};
use lumopack_studio_lib::models::steps::progress_percent;
use lumopack_studio_lib::models::{step_label, FluteType, FormField, MessageRole};
use lumopack_studio_lib::projection::StudioProjection;
use lumopack_studio_lib::session::{
    for_each_event, IgnoredReason, SendOutcome, SessionSynchronizer, SyncEvent,
};

/// LumoPack Studio - talk to the packaging quotation assistant from a terminal
#[derive(Parser, Debug)]
#[command(name = "lumopack-studio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the quotation backend
    #[arg(long)]
    api_url: Option<String>,

    /// Config file to use instead of ~/.lumopack/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long)]
    timeout: Option<u64>,

    /// Resume an existing session on startup
    #[arg(long, env = "LUMOPACK_SESSION")]
    session: Option<String>,
}

const HELP: &str = "\
Commands:
  <text>                 send a message to the assistant
  /reset                 start a new conversation
  /dismiss               clear the current error
  /form <field>=<value>  edit length, width, height or weight
  /flute <A|B|C|E|BC>    set the flute type
  /image <on|off>        mark a design image as uploaded
  /analyze               run the strength check on the form
  /price                 price the collected specification
  /history               print the transcript
  /resume <session_id>   load an existing session
  /health                check the backend
  /state                 print the preview state
  /quit                  exit";

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::init();

    let overrides = PartialConfig {
        api_base_url: cli.api_url.clone(),
        request_timeout_secs: cli.timeout,
        ..Default::default()
    };
    let config = resolve_config(cli.config.as_deref(), overrides)?;

    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    rt.block_on(run(config, cli.session))
}

async fn run(config: lumopack_studio_lib::StudioConfig, resume: Option<String>) -> Result<()> {
    let client = ApiClient::new(&config)?;
    if !client.check_health().await {
        log::warn!("Backend at {} is not responding", client.base_url());
    }

    let sync = SessionSynchronizer::with_history_limit(client.clone(), config.history_limit);
    let mut studio = StudioProjection::new();

    tokio::spawn(for_each_event(sync.subscribe(), |event| match event {
        SyncEvent::StateChanged(state) => log::debug!(
            "State changed: step {}, {} messages, loading={}",
            state.current_step,
            state.messages.len(),
            state.is_loading
        ),
        SyncEvent::Reset => log::debug!("Conversation reset"),
    }));

    if let Some(session_id) = resume {
        resume_session(&sync, &mut studio, &session_id).await;
    }

    println!("LumoPack Studio connected to {}", client.base_url());
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{}", HELP),
            "/reset" => {
                sync.reset_chat().await;
                studio.sync_from(&sync.snapshot());
                println!("Started a new conversation");
            }
            "/dismiss" => sync.clear_error(),
            "/form" => match edit_form(&mut studio, arg) {
                Ok(()) => print_render(&studio),
                Err(e) => println!("{}", e),
            },
            "/flute" => match arg.parse::<FluteType>() {
                Ok(flute) => {
                    studio.set_flute(flute);
                    println!("Flute set to {}", flute);
                }
                Err(e) => println!("{}", e),
            },
            "/image" => {
                studio.set_image(matches!(arg, "on" | "yes" | "true"));
                print_render(&studio);
            }
            "/analyze" => analyze(&client, &mut studio).await,
            "/price" => price(&client, &sync.snapshot().collected_data).await,
            "/history" => print_transcript(&sync),
            "/resume" => resume_session(&sync, &mut studio, arg).await,
            "/health" => {
                let up = client.check_health().await;
                println!("Backend is {}", if up { "up" } else { "down" });
            }
            "/state" => print_render(&studio),
            _ if command.starts_with('/') => println!("Unknown command {}", command),
            _ => send(&sync, &mut studio, line).await,
        }
    }

    Ok(())
}

async fn send<B: ChatBackend>(
    sync: &SessionSynchronizer<B>,
    studio: &mut StudioProjection,
    text: &str,
) {
    match sync.send_message(text).await {
        SendOutcome::Delivered { step } => {
            let state = sync.snapshot();
            if let Some(reply) = state.last_message() {
                println!("\n{}\n", reply.content);
            }
            println!(
                "[step {} - {} - {}%]",
                step,
                step_label(step),
                progress_percent(step)
            );
            if studio.sync_from(&state) {
                print_render(studio);
            }
            if state.is_complete {
                print_order_complete(&state.collected_data);
            }
        }
        SendOutcome::Failed(err) => {
            if let Some(bubble) = sync.snapshot().last_message() {
                println!("\n{}", bubble.content);
            }
            println!("Error: {} (status {})", err, err.status());
        }
        SendOutcome::Ignored(IgnoredReason::InFlight) => {
            println!("Still waiting for the previous reply")
        }
        SendOutcome::Ignored(IgnoredReason::Complete) => {
            println!("This order is complete. Use /reset to start a new quotation.")
        }
        SendOutcome::Ignored(IgnoredReason::Blank) | SendOutcome::Discarded => {}
    }
}

fn print_order_complete(collected: &lumopack_studio_lib::models::CollectedData) {
    match collected.grand_total() {
        Some(total) => println!("Order complete. Grand total {:.2} THB", total),
        None => println!("Order complete"),
    }
}

async fn resume_session<B: ChatBackend>(
    sync: &SessionSynchronizer<B>,
    studio: &mut StudioProjection,
    session_id: &str,
) {
    match sync.resume_session(session_id).await {
        Ok(()) => {
            studio.sync_from(&sync.snapshot());
            print_transcript(sync);
        }
        Err(e) => println!("Could not resume session: {}", e),
    }
}

fn edit_form(studio: &mut StudioProjection, arg: &str) -> Result<()> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Usage: /form <field>=<value>"))?;
    let field: FormField = field.trim().parse()?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a number", value.trim()))?;
    studio.edit_field(field, value)?;
    Ok(())
}

async fn analyze(client: &ApiClient, studio: &mut StudioProjection) {
    let request = match studio.analysis_request() {
        Ok(request) => request,
        Err(e) => {
            println!("Cannot analyze: {}", e);
            return;
        }
    };

    match client.analyze_strength(&request).await {
        Ok(analysis) => {
            println!(
                "{:?}: safety score {}, max load {:.1} kg. {}",
                analysis.status, analysis.safety_score, analysis.max_load_kg, analysis.recommendation
            );
            studio.set_analysis(Some(analysis));
            print_render(studio);
        }
        Err(e) => println!("Strength check failed: {}", e),
    }
}

async fn price(client: &ApiClient, collected: &lumopack_studio_lib::models::CollectedData) {
    let request = match pricing_request_from(collected) {
        Ok(request) => request,
        Err(e) => {
            println!("Cannot price yet: {}", e);
            return;
        }
    };

    match client.calculate_price(&request).await {
        Ok(quote) => println!(
            "Total {:.2} THB ({:.2} per box, VAT {:.2})",
            quote.grand_total, quote.price_per_box, quote.vat
        ),
        Err(e) => println!("Pricing failed: {}", e),
    }
}

fn print_transcript<B: ChatBackend>(sync: &SessionSynchronizer<B>) {
    let state = sync.snapshot();
    for message in &state.messages {
        let who = match message.role {
            MessageRole::User => "you",
            MessageRole::Assistant if message.is_error => "error",
            MessageRole::Assistant => "assistant",
        };
        println!("{:>9}: {}", who, message.content);
    }
    if let Some(error) = &state.error {
        println!("Last error: {}", error);
    }
}

fn print_render(studio: &StudioProjection) {
    let render = studio.render_state();
    let d = render.dimensions;
    print!(
        "Preview: {} {} x {} x {} cm, {}",
        render.shape_label, d.length, d.width, d.height, render.mode
    );
    match render.model_path {
        Some(path) => println!(" ({})", path),
        None => println!(),
    }
}
