use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use kestrel_cli::{OutputFormat, commands};
use url::Url;

#[derive(Parser)]
#[command(name = "kestrel")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A session-refresh hook for DAST scanners",
    long_about = "Kestrel keeps an authenticated scan session alive: it re-logs into the \
                  target application, extracts a fresh bearer token, and patches the \
                  scanner's context so outgoing requests carry a valid Authorization header. \
                  Wire it into the scanner's scan-lifecycle hooks and let the scanner decide \
                  when to invoke it."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-authenticate and refresh the scanner's Authorization header
    Refresh {
        /// Login endpoint of the application under scan
        #[arg(long, default_value = kestrel_core::config::DEFAULT_LOGIN_URL)]
        login_url: Url,

        /// Base URL of the scanner's JSON API
        #[arg(long, default_value = kestrel_core::config::DEFAULT_SCANNER_API)]
        scanner_api: Url,

        /// API key the scanner requires on API calls
        #[arg(long, env = "ZAP_API_KEY")]
        api_key: Option<String>,

        /// Scanner context to patch
        #[arg(long, default_value_t = kestrel_core::config::DEFAULT_CONTEXT_ID)]
        context_id: u32,

        /// Login username; when set together with --password the environment
        /// variables are not consulted
        #[arg(long, requires = "password")]
        username: Option<String>,

        /// Login password (prefer ZAP_USERNAME/ZAP_PASSWORD over this flag;
        /// command lines leak into process listings)
        #[arg(long, requires = "username")]
        password: Option<String>,

        /// Technology name to pin on the context (repeatable)
        #[arg(long = "tech", value_name = "NAME")]
        technologies: Vec<String>,

        /// Pause after patching, in milliseconds
        #[arg(long, default_value_t = 1000)]
        settle_delay_ms: u64,

        /// Exit non-zero when any refresh step fails (by default the hook
        /// always exits 0 and reports outcomes in its output)
        #[arg(long)]
        strict: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Refresh {
            login_url,
            scanner_api,
            api_key,
            context_id,
            username,
            password,
            technologies,
            settle_delay_ms,
            strict,
        } => commands::refresh::execute(
            commands::refresh::RefreshArgs {
                login_url,
                scanner_api,
                api_key,
                context_id,
                username,
                password,
                technologies,
                settle_delay_ms,
                strict,
            },
            cli.format,
        ),
        Commands::Completion { shell } => {
            commands::completion::execute(shell, &mut Cli::command())
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("kestrel=debug,kestrel_cli=debug,kestrel_core=debug")
    } else {
        EnvFilter::new("kestrel=info,kestrel_cli=info,kestrel_core=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
