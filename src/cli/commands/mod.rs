//! CLI command definitions and dispatch.
//!
//! Every subcommand maps to one catalog operation; the handlers live in
//! `songs`. Flags given on the command line take precedence over the config
//! file.

mod songs;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use crate::catalog::{CatalogService, RequestContext};
use crate::config::{Config, ProviderConfig};
use crate::error::{Error, ErrorKind};
use crate::musicinfo::{MusicInfoApi, MusicInfoClient};
use crate::{db, model};

pub use songs::{cmd_create, cmd_delete, cmd_list, cmd_show, cmd_update, cmd_verse};

/// Songbook CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (default: from config, else ./songbook.db)
    #[arg(long, global = true, env = "SONGBOOK_DB")]
    pub db: Option<PathBuf>,

    /// Config file (default: OS config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Metadata provider endpoint; enrichment is skipped when unset
    #[arg(long, global = true, env = "MUSIC_INFO_URL")]
    pub provider_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Add a song, enriching it from the metadata provider
    Create {
        /// Performing group
        group: String,
        /// Song title
        song: String,
    },
    /// List songs page by page
    List {
        /// Only songs with an id greater than this
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        cursor: i64,
        /// Page size
        #[arg(long, default_value_t = 10)]
        limit: u32,
        /// Column to filter on: group, title, releaseDate, link
        #[arg(long)]
        filter: Option<String>,
        /// Exact value the filter column must equal
        #[arg(long)]
        value: Option<String>,
        /// Print the page as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one song
    Show {
        id: i64,
        /// Print the song as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one verse of a song's lyrics
    Verse {
        id: i64,
        /// Verse number, starting at 0
        index: usize,
    },
    /// Change selected fields of a song
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        release_date: Option<String>,
        #[arg(long)]
        lyrics: Option<String>,
        #[arg(long)]
        link: Option<String>,
    },
    /// Delete a song
    Delete { id: i64 },
}

/// Connection settings after applying command-line overrides.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub db_path: Option<PathBuf>,
    pub max_connections: u32,
    pub provider: ProviderConfig,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        let mut provider = config.provider.clone();
        if let Some(url) = &cli.provider_url {
            provider.base_url = Some(url.clone());
        }

        Self {
            db_path: cli.db.clone().or_else(|| config.database.path.clone()),
            max_connections: config.database.max_connections,
            provider,
        }
    }

    /// Service-level bound on one lookup: connect plus request time.
    pub fn enrichment_timeout(&self) -> Duration {
        Duration::from_secs(
            self.provider
                .timeout_secs
                .saturating_add(self.provider.connect_timeout_secs),
        )
    }
}

/// Run the parsed command to completion.
///
/// Catalog errors are reduced to their public message; internal details are
/// logged instead of printed.
pub fn run_command(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let settings = Settings::resolve(cli, config);

    rt.block_on(async {
        let service = open_catalog(&settings).await?;
        let ctx = RequestContext::new(format!("cli-{}", std::process::id()));

        dispatch(&service, &ctx, &cli.command)
            .await
            .map_err(|e| report(&ctx, e))
    })
}

async fn open_catalog(settings: &Settings) -> anyhow::Result<CatalogService> {
    let db_url = db::db_url(settings.db_path.as_deref());
    let pool = db::init_db(&db_url, settings.max_connections)
        .await
        .with_context(|| format!("Failed to open database {db_url}"))?;

    let music_info = MusicInfoClient::from_config(&settings.provider)
        .context("Failed to create metadata provider client")?
        .map(|client| Arc::new(client) as Arc<dyn MusicInfoApi>);
    if music_info.is_none() {
        tracing::info!("No metadata provider configured, songs will not be enriched");
    }

    Ok(CatalogService::new(pool, music_info)
        .with_failure_policy(settings.provider.failure_policy)
        .with_enrichment_timeout(settings.enrichment_timeout()))
}

async fn dispatch(
    service: &CatalogService,
    ctx: &RequestContext,
    command: &Commands,
) -> crate::error::Result<()> {
    match command {
        Commands::Create { group, song } => {
            cmd_create(service, ctx, &model::CreateSong::new(group, song)).await
        }
        Commands::List {
            cursor,
            limit,
            filter,
            value,
            json,
        } => {
            let query =
                model::ListQuery::from_parts(*cursor, *limit, filter.as_deref(), value.as_deref())?;
            cmd_list(service, ctx, &query, *json).await
        }
        Commands::Show { id, json } => cmd_show(service, ctx, *id, *json).await,
        Commands::Verse { id, index } => cmd_verse(service, ctx, *id, *index).await,
        Commands::Update {
            id,
            title,
            release_date,
            lyrics,
            link,
        } => {
            let patch = model::SongPatch {
                id: *id,
                title: title.clone(),
                release_date: release_date.clone(),
                lyrics: lyrics.clone(),
                link: link.clone(),
            };
            cmd_update(service, ctx, &patch).await
        }
        Commands::Delete { id } => cmd_delete(service, ctx, *id).await,
    }
}

/// Log the full error where it matters, hand back only the public message.
fn report(ctx: &RequestContext, err: Error) -> anyhow::Error {
    match err.kind() {
        ErrorKind::InvalidArgument | ErrorKind::NotFound => {
            tracing::debug!(request_id = ctx.request_id(), error = %err, "Request rejected");
        }
        _ => {
            tracing::error!(request_id = ctx.request_id(), error = ?err, "Request failed");
        }
    }
    anyhow::anyhow!(err.public_message())
}
