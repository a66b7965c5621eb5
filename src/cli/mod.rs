//! CLI module - Command-line interface for the catalog service

mod commands;

use clap::{Parser, Subcommand};

/// Catalog - categories and items behind a token-authenticated REST API
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create a user directly in the store
    AddUser {
        /// Username for the new account
        username: String,
        /// Password for the new account
        password: String,
    },

    /// Print a fresh bearer token for an existing user
    Token {
        /// Username to issue the token for
        username: String,
    },

    /// Create default config file
    #[command(alias = "init")]
    InitConfig,
}

pub use commands::*;
