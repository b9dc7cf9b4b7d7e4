//! seqvenn CLI library
//!
//! Command-line front end for comparing sequence-similarity search methods.
//!
//! # Overview
//!
//! - **phmmer**: HMMER protein search against an EBI sequence database (`seqvenn phmmer`)
//! - **BLAST**: NCBI BLAST searches through the URL API (`seqvenn blast`)
//! - **ID mapping**: translate accessions with UniProt (`seqvenn map`)
//! - **Comparison**: run every method, map hits to RefSeq and compute their
//!   overlap (`seqvenn compare`)

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// seqvenn - compare protein search methods by the accessions they find
#[derive(Parser, Debug)]
#[command(name = "seqvenn")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with per-service settings
    #[arg(long, env = "SEQVENN_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format: table, json, csv, tsv (default: table on a terminal, tsv otherwise)
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Write the result table to a file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Give up on any job still pending after this many seconds
    #[arg(long, global = true)]
    pub max_wait: Option<u64>,

    /// Give up on any job after this many status requests
    #[arg(long, global = true)]
    pub max_polls: Option<u32>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search a protein sequence with HMMER phmmer
    Phmmer {
        /// FASTA file with the query sequence ('-' for stdin)
        #[arg(long)]
        fasta: PathBuf,

        /// Target sequence database
        #[arg(long, default_value = seqvenn_jobs::hmmer::DEFAULT_PHMMER_DATABASE)]
        database: String,
    },

    /// Search a sequence with NCBI BLAST
    Blast {
        /// BLAST program: blastp, blastn, blastx, tblastn, tblastx
        #[arg(short, long, default_value = "blastp")]
        program: String,

        /// FASTA file with the query sequence ('-' for stdin)
        #[arg(long)]
        fasta: PathBuf,

        /// Target BLAST database
        #[arg(long, default_value = seqvenn_jobs::blast::DEFAULT_BLAST_DATABASE)]
        database: String,

        /// Expect value threshold
        #[arg(long)]
        expect: Option<f64>,

        /// Maximum number of hits to report
        #[arg(long)]
        hitlist_size: Option<u32>,

        /// Entrez query restricting the database (e.g. "txid9606[ORGN]")
        #[arg(long)]
        entrez_query: Option<String>,
    },

    /// Map accessions between databases with UniProt ID mapping
    Map {
        /// Source database namespace
        #[arg(long, default_value = seqvenn_jobs::idmapping::UNIPROTKB_AC_ID)]
        from: String,

        /// Target database namespace
        #[arg(long, default_value = seqvenn_jobs::idmapping::REFSEQ_PROTEIN)]
        to: String,

        /// Comma-separated accessions
        #[arg(long, value_delimiter = ',', conflicts_with = "ids_file")]
        ids: Vec<String>,

        /// File with accessions separated by whitespace or commas ('-' for stdin)
        #[arg(long)]
        ids_file: Option<PathBuf>,
    },

    /// Run phmmer and BLAST, map hits to RefSeq and report their overlap
    Compare {
        /// FASTA file with the query protein ('-' for stdin)
        #[arg(long)]
        fasta: PathBuf,

        /// phmmer target database
        #[arg(long, default_value = seqvenn_jobs::hmmer::DEFAULT_PHMMER_DATABASE)]
        hmmer_database: String,

        /// BLAST programs to run (repeatable)
        #[arg(long = "blast-program", default_value = "blastp")]
        blast_programs: Vec<String>,

        /// BLAST target database
        #[arg(long, default_value = seqvenn_jobs::blast::DEFAULT_BLAST_DATABASE)]
        blast_database: String,

        /// Directory for the per-method CSV files and overlap.csv
        #[arg(long, default_value = "seqvenn-results")]
        output_dir: PathBuf,
    },
}
