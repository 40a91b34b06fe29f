//! Command line interface
//!
//! - `serve`: HTTP server exposing `/v1/answer`
//! - `ask`: answer one question and exit
//! - `seed`: load documents into the knowledge collection

pub mod ask;
pub mod seed;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Assistant that answers from a document collection and caches answers by meaning
#[derive(Parser)]
#[command(name = "rag-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Answer a single question
    Ask {
        /// Question text
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Insert documents from a JSON array file
    Seed {
        /// Path to the documents file
        file: PathBuf,
    },
}

/// Load `.env` and the layered configuration
pub fn load_config() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    Ok(AppConfig::load()?)
}
