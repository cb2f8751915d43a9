//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::canned_adapter::{CannedGenerationAdapter, CannedSpeechAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::gemini_adapter::GeminiAdapter;
use crate::domain::error::SaathiError;
use crate::domain::learning;
use crate::domain::ledger::PortfolioSnapshot;
use crate::domain::risk_profile::{self, QUESTION_COUNT};
use crate::domain::session::Session;
use crate::domain::settings::{FeedSettings, SessionSettings};
use crate::ports::config_port::ConfigPort;
use crate::ports::generation_port::{GenerationPort, GenerationRequest, GenerationResponse};
use crate::ports::speech_port::SpeechPort;

#[derive(Parser, Debug)]
#[command(
    name = "niveshsaathi",
    about = "Investment education platform with a simulated trading arena"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Use the canned offline adapter instead of the generation service
        #[arg(long)]
        offline: bool,
    },
    /// Run the market simulation headless and print the resulting ledger
    Simulate {
        #[arg(long, default_value_t = 10)]
        ticks: u32,
        /// Seed the price RNG for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Score a completed risk questionnaire
    Profile {
        /// Comma-separated answers, e.g. 1,2,3,2
        #[arg(long)]
        answers: String,
    },
    /// List the learning modules
    Modules,
    /// Generate a quiz question for a learning module
    Quiz {
        #[arg(long)]
        slug: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        offline: bool,
    },
    /// Ask the advisor a one-off question
    Chat {
        query: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        offline: bool,
    },
    /// Translate and summarize a financial text file
    Summarize {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        language: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        offline: bool,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config, offline } => run_serve(config.as_ref(), offline),
        Command::Simulate {
            ticks,
            seed,
            config,
        } => run_simulate(ticks, seed, config.as_ref()),
        Command::Profile { answers } => run_profile(&answers),
        Command::Modules => run_modules(),
        Command::Quiz {
            slug,
            config,
            offline,
        } => run_quiz(&slug, config.as_ref(), offline),
        Command::Chat {
            query,
            config,
            offline,
        } => run_chat(&query, config.as_ref(), offline),
        Command::Summarize {
            file,
            language,
            config,
            offline,
        } => run_summarize(&file, &language, config.as_ref(), offline),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SaathiError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn load_optional_config(path: Option<&PathBuf>) -> Result<Option<FileConfigAdapter>, ExitCode> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            load_config(p).map(Some)
        }
        None => Ok(None),
    }
}

/// Resolve the generation/speech adapters: canned when `--offline`, the
/// Gemini adapter (which needs a configured API key) otherwise.
fn build_services(
    config: Option<&FileConfigAdapter>,
    offline: bool,
) -> Result<
    (
        Arc<dyn GenerationPort + Send + Sync>,
        Arc<dyn SpeechPort + Send + Sync>,
    ),
    ExitCode,
> {
    if offline {
        return Ok((
            Arc::new(CannedGenerationAdapter),
            Arc::new(CannedSpeechAdapter),
        ));
    }
    let Some(config) = config else {
        eprintln!("error: a config with [generation] api_key is required (or pass --offline)");
        return Err(ExitCode::from(2));
    };
    match GeminiAdapter::from_config(config) {
        Ok(adapter) => {
            let adapter = Arc::new(adapter);
            let generation: Arc<dyn GenerationPort + Send + Sync> = adapter.clone();
            let speech: Arc<dyn SpeechPort + Send + Sync> = adapter;
            Ok((generation, speech))
        }
        Err(e) => {
            eprintln!("error: {e}");
            Err(ExitCode::from(&e))
        }
    }
}

fn session_from_config(config: Option<&FileConfigAdapter>) -> Result<Session, ExitCode> {
    let settings = match config {
        Some(c) => SessionSettings::from_config(c).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        })?,
        None => SessionSettings::default(),
    };
    Ok(Session::new(&settings))
}

fn run_serve(config_path: Option<&PathBuf>, offline: bool) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use std::net::SocketAddr;
        use std::time::Duration;

        let config = match load_optional_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let (generation, speech) = match build_services(config.as_ref(), offline) {
            Ok(services) => services,
            Err(code) => return code,
        };

        let session = match session_from_config(config.as_ref()) {
            Ok(s) => s,
            Err(code) => return code,
        };

        let feed_settings = match config.as_ref() {
            Some(c) => match FeedSettings::from_config(c) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(&e);
                }
            },
            None => FeedSettings::default(),
        };

        let addr: SocketAddr = config
            .as_ref()
            .and_then(|c| c.get_string("web", "listen"))
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:3000".parse().unwrap());

        let static_dir = config
            .as_ref()
            .and_then(|c| c.get_string("web", "static_dir"))
            .unwrap_or_else(|| "static".to_string());

        let state = Arc::new(crate::adapters::web::AppState::new(
            session, generation, speech,
        ));
        let router = crate::adapters::web::build_router(state.clone(), &static_dir);

        eprintln!("Starting web server on {addr}");

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(1);
            }
        };

        let served: Result<(), std::io::Error> = runtime.block_on(async {
            let ticker = crate::adapters::web::spawn_ticker(
                state.clone(),
                Duration::from_secs(feed_settings.tick_seconds),
            );
            let listener = tokio::net::TcpListener::bind(addr).await?;
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await;
            // the feed must not outlive the server
            ticker.abort();
            result
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(1)
            }
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (config_path, offline);
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}

fn run_simulate(ticks: u32, seed: Option<u64>, config_path: Option<&PathBuf>) -> ExitCode {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let mut session = match session_from_config(config.as_ref()) {
        Ok(s) => s,
        Err(code) => return code,
    };

    eprintln!("Simulating {ticks} ticks...");
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    for _ in 0..ticks {
        session.tick_with(&mut rng);
    }

    println!("Market after {ticks} ticks:");
    println!(
        "{:<12} {:<28} {:>10} {:>10} {:>8}",
        "SYMBOL", "NAME", "PRICE", "CHANGE", "CHG%"
    );
    for instrument in session.feed().instruments() {
        println!(
            "{:<12} {:<28} {:>10.2} {:>+10.2} {:>+7.2}%",
            instrument.symbol,
            instrument.name,
            instrument.price,
            instrument.change,
            instrument.change_percent
        );
    }

    println!();
    print_snapshot(&session.snapshot());
    ExitCode::SUCCESS
}

fn print_snapshot(snapshot: &PortfolioSnapshot) {
    println!("Portfolio:");
    for holding in &snapshot.holdings {
        println!(
            "  {:<12} {:>6} shares  avg {:>10.2}  now {:>10.2}",
            holding.symbol, holding.shares, holding.avg_price, holding.current_price
        );
    }
    if snapshot.holdings.is_empty() {
        println!("  (no holdings)");
    }
    let m = &snapshot.metrics;
    println!("  Cash balance:     {:>14.2}", snapshot.cash);
    println!("  Market value:     {:>14.2}", m.total_value);
    println!("  Invested:         {:>14.2}", m.total_investment);
    println!("  Unrealized P/L:   {:>+14.2}", m.pnl);
    println!(
        "  Day change:       {:>+14.2} ({:+.2}%)",
        m.day_change, m.day_change_percent
    );
    println!(
        "  Risk profile:     {} (score {})",
        snapshot.risk_category, snapshot.risk_score
    );
}

fn run_profile(answers: &str) -> ExitCode {
    let parsed: Result<Vec<u8>, _> = answers
        .split(',')
        .map(|s| s.trim().parse::<u8>())
        .collect();
    let answers = match parsed {
        Ok(a) => a,
        Err(_) => {
            let err = SaathiError::IncompleteQuestionnaire {
                reason: format!("answers must be {QUESTION_COUNT} comma-separated numbers"),
            };
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    };

    match risk_profile::score_answers(&answers) {
        Ok(profile) => {
            println!("{} (score {})", profile.category.title(), profile.score);
            println!("{}", profile.category.description());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn run_modules() -> ExitCode {
    println!(
        "{:<28} {:<14} {:<12} TITLE",
        "SLUG", "LEVEL", "CATEGORY"
    );
    for module in learning::catalog() {
        println!(
            "{:<28} {:<14} {:<12} {}",
            module.slug,
            format!("{:?}", module.level),
            module.category,
            module.title
        );
    }
    ExitCode::SUCCESS
}

/// Run one generation request on a fresh runtime and print via `render`.
fn run_generation_command(
    config_path: Option<&PathBuf>,
    offline: bool,
    request: GenerationRequest,
    render: fn(GenerationResponse) -> Result<(), SaathiError>,
) -> ExitCode {
    let config = match load_optional_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let (generation, _speech) = match build_services(config.as_ref(), offline) {
        Ok(services) => services,
        Err(code) => return code,
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    };

    let result = runtime
        .block_on(generation.generate(request))
        .and_then(render);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

fn unexpected_response() -> SaathiError {
    SaathiError::GenerationFailed {
        reason: "service returned a response of the wrong shape".into(),
    }
}

fn run_quiz(slug: &str, config_path: Option<&PathBuf>, offline: bool) -> ExitCode {
    let module = match learning::find_module(slug) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };
    eprintln!("Generating quiz for \"{}\"...", module.title);

    run_generation_command(
        config_path,
        offline,
        GenerationRequest::QuizGeneration {
            topic_title: module.title.to_string(),
            topic_content: module.content.to_string(),
        },
        |response| match response {
            GenerationResponse::Quiz { questions } => {
                for question in &questions {
                    if let Some(scenario) = &question.scenario {
                        println!("Scenario: {scenario}\n");
                    }
                    println!("{}", question.question);
                    for (i, option) in question.options.iter().enumerate() {
                        let marker = if *option == question.correct_answer {
                            "*"
                        } else {
                            " "
                        };
                        println!("  {marker} {}. {option}", i + 1);
                    }
                }
                Ok(())
            }
            _ => Err(unexpected_response()),
        },
    )
}

fn run_chat(query: &str, config_path: Option<&PathBuf>, offline: bool) -> ExitCode {
    run_generation_command(
        config_path,
        offline,
        GenerationRequest::Chat {
            query: query.to_string(),
        },
        |response| match response {
            GenerationResponse::Chat { response } => {
                println!("{response}");
                Ok(())
            }
            _ => Err(unexpected_response()),
        },
    )
}

fn run_summarize(
    file: &PathBuf,
    language: &str,
    config_path: Option<&PathBuf>,
    offline: bool,
) -> ExitCode {
    let text = match fs::read_to_string(file) {
        Ok(t) => t,
        Err(e) => {
            let err = SaathiError::Io(e);
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    };

    run_generation_command(
        config_path,
        offline,
        GenerationRequest::TranslateSummarize {
            text,
            language: language.to_string(),
        },
        |response| match response {
            GenerationResponse::TranslateSummarize {
                translated_text,
                summary,
            } => {
                println!("Translation:\n{translated_text}\n");
                println!("Summary:\n{summary}");
                Ok(())
            }
            _ => Err(unexpected_response()),
        },
    )
}
