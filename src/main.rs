//! elisa-bridge - submission bridge for acquisition proposals.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elisa_bridge::{
    api::{self, ApiState},
    config::BridgeConfig,
    elisa::HttpElisaClient,
    mail::SmtpMailer,
    subject::HttpSubjectClient,
    submit::Submitter,
};

/// Bridge between the acquisition-proposal form and ELi:SA.
#[derive(Parser)]
#[command(name = "elisa-bridge", about = "Submission bridge for acquisition proposals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bridge.
    Serve {
        /// Address to bind the API server.
        #[arg(long, default_value = "0.0.0.0:8080", env = "ELISA_BRIDGE_BIND")]
        bind: String,

        /// Base URL of the ELi:SA API.
        #[arg(long, env = "ELISA_API_URL")]
        elisa_url: String,

        /// Base URL of the settings backend for the account lookup.
        #[arg(long, env = "ELISA_SUBJECT_URL")]
        subject_url: String,

        /// SMTP relay host for fallback notifications.
        #[arg(long, env = "ELISA_SMTP_HOST", default_value = "localhost")]
        smtp_host: String,

        /// Caller id assigned by the hbz.
        #[arg(long, env = "ELISA_CALLER_ID")]
        caller_id: String,

        /// Shared secret assigned by the hbz.
        #[arg(long, env = "ELISA_SECRET", hide_env_values = true)]
        secret: String,

        /// Recipient of fallback notifications.
        #[arg(long, env = "ELISA_FALLBACK_EMAIL")]
        fallback_email: String,

        /// Sender address on fallback notifications.
        #[arg(long, env = "ELISA_FROM_EMAIL", default_value = "eike.spielberg@uni-due.de")]
        from_email: String,

        /// Default ELi:SA account for forwarded titles without a target.
        #[arg(long, env = "ELISA_DEFAULT_ACCOUNT", default_value = "")]
        default_account: String,

        /// Timeout in seconds for remote calls.
        #[arg(long, env = "ELISA_REMOTE_TIMEOUT", default_value_t = 30)]
        remote_timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "elisa_bridge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            elisa_url,
            subject_url,
            smtp_host,
            caller_id,
            secret,
            fallback_email,
            from_email,
            default_account,
            remote_timeout,
        } => {
            let config = BridgeConfig::new(caller_id, secret, fallback_email)
                .with_from_address(from_email)
                .with_default_account(default_account)
                .with_remote_timeout(Duration::from_secs(remote_timeout));

            let elisa = HttpElisaClient::new(&elisa_url, config.remote_timeout)?;
            let subject = HttpSubjectClient::new(&subject_url, config.remote_timeout)?;
            let mailer = SmtpMailer::new(&smtp_host)?;

            let submitter = Submitter::new(
                config,
                Arc::new(elisa),
                Arc::new(subject),
                Arc::new(mailer),
            );
            let state = Arc::new(ApiState::new(submitter));

            api::serve(state, &bind).await?;
        }
    }

    Ok(())
}
