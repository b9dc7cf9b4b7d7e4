//! Build automation tasks for seqvenn
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for seqvenn", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in Markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<seqvenn_cli::Cli>();

    let content = format!(
        r#"# seqvenn CLI Reference

This documentation is generated from the CLI source code. Last updated: {}.

## Overview

seqvenn runs protein similarity searches (HMMER phmmer and NCBI BLAST),
maps the hits into the RefSeq protein namespace with UniProt ID mapping and
reports which accessions each combination of methods found.

## Quick Start

```bash
# One phmmer search, printed as a table
seqvenn phmmer --fasta query.fasta

# BLAST with a tighter threshold, saved as CSV
seqvenn blast --program blastx --fasta query.fasta --expect 1e-10 --format csv --output blastx.csv

# Map UniProt accessions to RefSeq
seqvenn map --ids P69905,P68871

# Full comparison
seqvenn compare --fasta query.fasta --blast-program blastp --blast-program tblastn --output-dir results
```

## Commands

{}

## Output Columns

- `phmmer`: `accession`, `identifier`, `uniprot_accession`, `phylum`, `species`
- `blast`: `hit_id`, `hit_def`, `accession`, `e_value`, `identities`, `alignment_length`, `bit_score`, `query_start`, `query_end`, `subject_start`, `subject_end` (one row per HSP)
- `map`: `source_id` (the submitted identifier, e.g. the UniProt accession), `mapped_id`; unmapped identifiers are listed on stderr
- `compare`: `methods`, `count`, `accessions` (one row per overlap region)

## Environment Variables

- `SEQVENN_CONFIG` - TOML config file (same as `--config`)
- `SEQVENN_USER_AGENT` - User-Agent sent to every service
- `SEQVENN_{{HMMER,BLAST,IDMAPPING}}_BASE_URL` - Service endpoint
- `SEQVENN_{{HMMER,BLAST,IDMAPPING}}_POLL_INTERVAL_MS` - Wait between status requests
- `SEQVENN_{{HMMER,BLAST,IDMAPPING}}_RETRY_INTERVAL_MS` - Wait after a retry status
- `SEQVENN_{{HMMER,BLAST,IDMAPPING}}_MAX_RETRIES` - Retry budget per job
- `SEQVENN_{{HMMER,BLAST,IDMAPPING}}_MAX_POLLS` - Status requests before giving up
- `SEQVENN_{{HMMER,BLAST,IDMAPPING}}_MAX_WAIT_SECS` - Seconds before giving up
- `SEQVENN_{{HMMER,BLAST,IDMAPPING}}_REQUEST_TIMEOUT_SECS` - Per-request HTTP timeout
- `SEQVENN_LOG_LEVEL`, `SEQVENN_LOG_OUTPUT`, `SEQVENN_LOG_FORMAT`, `SEQVENN_LOG_DIR`, `SEQVENN_LOG_FILTER` - Logging

## Configuration

Settings are layered: built-in defaults, then the `--config` file, then
environment variables, then `--max-wait` / `--max-polls`.

```toml
user_agent = "my-lab-pipeline/1.0"

[hmmer]
poll_interval_ms = 5000
max_retries = 20

[blast]
max_wait_secs = 1800
```

---

*This documentation is automatically generated from the CLI source code. To update, run `cargo run -p xtask -- generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
