// SPDX-FileCopyrightText: 2022 Profian Inc. <opensource@profian.com>
// SPDX-License-Identifier: Apache-2.0

#![warn(rust_2018_idioms, unused_lifetimes, unused_qualifications, clippy::all)]

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use warden_server::app;

/// TCB appraisal service for confidential workloads.
///
/// Accepts TCB-info documents over HTTP and answers whether each one is
/// structurally fit to feed a trust decision.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "WARDEN_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    tracing::debug!("listening on {}", args.addr);
    axum::Server::bind(&args.addr)
        .serve(app().into_make_service())
        .await
        .context("server failed")?;

    Ok(())
}
