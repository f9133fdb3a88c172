use crate::OutputFormat;
use anyhow::Result;
use kestrel_core::{CredentialSource, RefreshConfig, RefreshReport, Secret, SessionRefresher};
use std::time::Duration;
use url::Url;

pub struct RefreshArgs {
    pub login_url: Url,
    pub scanner_api: Url,
    pub api_key: Option<String>,
    pub context_id: u32,
    pub username: Option<String>,
    pub password: Option<String>,
    pub technologies: Vec<String>,
    pub settle_delay_ms: u64,
    pub strict: bool,
}

pub fn execute(args: RefreshArgs, format: OutputFormat) -> Result<()> {
    let credentials = match (args.username, args.password) {
        (Some(username), Some(password)) => CredentialSource::Inline {
            username,
            password: Secret::new(password),
        },
        _ => CredentialSource::default(),
    };

    let config = RefreshConfig {
        login_url: args.login_url,
        scanner_api: args.scanner_api,
        scanner_api_key: args.api_key,
        context_id: args.context_id,
        credentials,
        technologies: args.technologies,
        settle_delay: Duration::from_millis(args.settle_delay_ms),
    };

    tracing::info!(
        "Refreshing session for context {} via {}",
        config.context_id,
        config.scanner_api
    );

    let client = reqwest::Client::new();
    let refresher = SessionRefresher::from_config(config, client);

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async { refresher.run().await });

    match format {
        OutputFormat::Json => output_json(&report)?,
        OutputFormat::Pretty => output_pretty(&report),
    }

    if args.strict && !report.succeeded() {
        anyhow::bail!("session refresh failed");
    }

    Ok(())
}

fn output_json(report: &RefreshReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn output_pretty(report: &RefreshReport) {
    use console::style;

    println!(
        "\n{}",
        style(format!("Session Refresh: context {}", report.context_id))
            .bold()
            .cyan()
    );
    println!();

    for outcome in &report.steps {
        match &outcome.error {
            None => println!("  {} {}", style("[OK]").green(), outcome.step.describe()),
            Some(error) => println!(
                "  {} {} ({})",
                style("[FAIL]").red().bold(),
                outcome.step.describe(),
                error
            ),
        }
    }

    println!();
    if report.succeeded() {
        println!("{}", style("Session refreshed").green().bold());
    } else if report.skipped_patch() {
        println!(
            "{}",
            style("Authentication failed - scanner context untouched").yellow()
        );
    } else {
        println!(
            "{}",
            style(format!(
                "Refresh completed with {} failed step(s)",
                report.failed_steps().count()
            ))
            .yellow()
        );
    }
}
