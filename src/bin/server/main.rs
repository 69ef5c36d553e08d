#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for loading a draft and sending it to recipients

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use phisherman::{
    domain::campaigns::{DispatchServiceImpl, InMemoryDraftStore},
    infrastructure::{
        email::TransportConfig,
        http::{state::AppState, HttpServer, HttpServerConfig},
    },
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The outbound mail transport configuration
    #[clap(flatten)]
    pub transport: TransportConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phisherman=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let provisioned = args
        .transport
        .provision()
        .await
        .context("failed to provision mail transport")?;

    info!(sender = %provisioned.identity.address, "mail transport ready");

    let drafts = Arc::new(InMemoryDraftStore::new(Some(provisioned.identity)));
    let dispatcher =
        DispatchServiceImpl::new(Arc::clone(&drafts), Arc::new(provisioned.transport))
            .with_send_timeout(args.transport.send_timeout());

    let state = AppState::new(drafts, dispatcher);

    HttpServer::new(state, args.server).await?.run().await
}
