use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use buffett_score::analyze::Analyzer;
use buffett_score::config::Config;
use buffett_score::providers::{create_http_client, AlphaVantageClient, YahooClient};
use buffett_score::ticker::{normalize_tickers, TickerPolicy};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_EXPORT: i32 = 5;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Aligned table, color-keyed by score
    Table,
    /// Tab-separated with a header row
    Tsv,
    /// JSON array of results
    Json,
}

#[derive(Args, Debug)]
struct SuffixArgs {
    /// Exchange suffix for bare symbols of up to 5 characters (overrides config)
    #[arg(long, conflicts_with = "no_suffix")]
    suffix: Option<String>,

    /// Leave bare symbols unchanged
    #[arg(long)]
    no_suffix: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch fundamentals and score up to 10 tickers
    Analyze {
        /// Ticker symbols, comma-separated and/or as separate arguments
        #[arg(required = true)]
        tickers: Vec<String>,

        #[command(flatten)]
        suffix: SuffixArgs,

        /// Minimum spacing between Alpha Vantage requests (e.g. "12s")
        #[arg(long)]
        interval: Option<String>,

        /// Also write results to a file (.csv, .tsv or .json)
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Output format for stdout
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Show the pass/fail breakdown for every check (table format only)
        #[arg(long)]
        explain: bool,
    },
    /// Show how tickers would be normalized, without fetching anything
    Normalize {
        /// Ticker symbols, comma-separated and/or as separate arguments
        #[arg(required = true)]
        tickers: Vec<String>,

        #[command(flatten)]
        suffix: SuffixArgs,
    },
    /// Store a new Alpha Vantage API key in the system keyring
    SetKey,
    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "buffett-score")]
#[command(about = "Score stocks on six Buffett-style fundamentals", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/buffett-score/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    buffett_score::logging::init(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);
    let code = match cli.command {
        Commands::Init { force } => run_init(config_path, force),
        Commands::SetKey => run_set_key().await,
        Commands::Normalize { tickers, suffix } => match load_config(config_path) {
            Ok(config) => run_normalize(&config, &tickers, &suffix),
            Err(code) => code,
        },
        Commands::Analyze {
            tickers,
            suffix,
            interval,
            export,
            format,
            explain,
        } => match load_config(config_path) {
            Ok(config) => {
                let options = AnalyzeOptions {
                    interval,
                    export,
                    format,
                    explain,
                };
                run_analyze(&config, &tickers, &suffix, options).await
            }
            Err(code) => code,
        },
    };

    std::process::exit(code);
}

/// Load and validate config, printing every problem found
fn load_config(path: Option<PathBuf>) -> Result<Config, i32> {
    let config = match buffett_score::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return Err(EXIT_CONFIG);
        }
    };

    if let Err(errors) = buffett_score::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(EXIT_CONFIG);
    }

    tracing::debug!("Loaded config: {:?}", config);
    Ok(config)
}

fn ticker_policy(config: &Config, args: &SuffixArgs) -> TickerPolicy {
    if args.no_suffix {
        TickerPolicy::passthrough()
    } else if let Some(suffix) = &args.suffix {
        TickerPolicy::new(Some(suffix))
    } else {
        config.ticker_policy()
    }
}

fn run_init(path: Option<PathBuf>, force: bool) -> i32 {
    match buffett_score::config::write_default_config(path, force) {
        Ok(path) => {
            println!("Config written to {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            EXIT_CONFIG
        }
    }
}

async fn run_set_key() -> i32 {
    match buffett_score::credentials::replace_stored_key().await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Credential error: {:#}", e);
            EXIT_AUTH
        }
    }
}

fn run_normalize(config: &Config, tickers: &[String], suffix: &SuffixArgs) -> i32 {
    let policy = ticker_policy(config, suffix);
    let normalized = normalize_tickers(&tickers.join(","), &policy);

    if normalized.is_empty() {
        eprintln!("No tickers given.");
        return EXIT_CONFIG;
    }

    for ticker in normalized {
        println!("{}", ticker);
    }
    EXIT_SUCCESS
}

struct AnalyzeOptions {
    interval: Option<String>,
    export: Option<PathBuf>,
    format: OutputFormat,
    explain: bool,
}

async fn run_analyze(
    config: &Config,
    tickers: &[String],
    suffix: &SuffixArgs,
    options: AnalyzeOptions,
) -> i32 {
    let start_time = Instant::now();

    if let Err(msg) = check_output_flags(options.format, options.explain) {
        eprintln!("{}", msg);
        return EXIT_CONFIG;
    }

    let policy = ticker_policy(config, suffix);
    let tickers = normalize_tickers(&tickers.join(","), &policy);
    if tickers.is_empty() {
        eprintln!("No tickers given. Example: buffett-score analyze \"AAPL, MSFT, HEX\"");
        return EXIT_CONFIG;
    }

    let interval = match request_interval(config, options.interval.as_deref()) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };
    let timeout = match config.request_timeout() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    let api_key = match buffett_score::credentials::resolve_api_key().await {
        Ok(k) => k,
        Err(e) => {
            eprintln!("Credential error: {:#}", e);
            return EXIT_AUTH;
        }
    };

    let http = match create_http_client(timeout) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{:#}", e);
            return EXIT_NETWORK;
        }
    };

    let yahoo = YahooClient::new(http.clone(), config.yahoo_base_url.as_str());
    let alpha_vantage = AlphaVantageClient::new(
        http,
        config.alpha_vantage_base_url.as_str(),
        api_key,
        interval,
    );
    let analyzer = Analyzer::new(&yahoo, &alpha_vantage, &config.scoring);

    let results = analyzer.analyze_batch(&tickers).await;

    let use_colors = buffett_score::output::should_use_colors();
    match options.format {
        OutputFormat::Table => {
            println!(
                "{}",
                buffett_score::output::format_results_table(&results, use_colors)
            );
            if options.explain {
                for result in &results {
                    println!();
                    println!(
                        "{}",
                        buffett_score::output::format_explain(result, use_colors)
                    );
                }
            }
        }
        OutputFormat::Tsv => println!("{}", buffett_score::output::format_tsv(&results)),
        OutputFormat::Json => match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize results: {}", e);
                return EXIT_EXPORT;
            }
        },
    }

    if let Some(path) = options.export {
        match buffett_score::output::export_results(&path, &results) {
            Ok(format) => eprintln!("Results written to {} ({:?})", path.display(), format),
            Err(e) => {
                eprintln!("Export failed: {:#}", e);
                return EXIT_EXPORT;
            }
        }
    }

    tracing::debug!(
        "Total: {} tickers in {}",
        results.len(),
        humantime::format_duration(Duration::from_millis(start_time.elapsed().as_millis() as u64))
    );

    EXIT_SUCCESS
}

/// `--explain` output is only printed alongside the table
fn check_output_flags(format: OutputFormat, explain: bool) -> Result<(), String> {
    match format {
        OutputFormat::Table => Ok(()),
        _ if !explain => Ok(()),
        other => Err(format!(
            "--explain only works with --format table (got {:?})",
            other
        )),
    }
}

fn request_interval(config: &Config, cli_value: Option<&str>) -> anyhow::Result<Duration> {
    match cli_value {
        Some(value) => humantime::parse_duration(value.trim())
            .map_err(|e| anyhow::anyhow!("Invalid --interval '{}': {}", value, e)),
        None => config.request_interval(),
    }
}
