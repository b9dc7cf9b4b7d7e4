//! `seqvenn blast`

use super::Context;
use crate::error::Result;
use crate::input::{fasta_query, read_source};
use crate::output::{emit, report_diagnostics};
use crate::progress::with_spinner;
use seqvenn_jobs::blast::{BlastClient, BlastProgram, BlastRequest};
use std::path::Path;

/// Options of one BLAST search
#[derive(Debug, Clone, Default)]
pub struct BlastOptions {
    pub expect: Option<f64>,
    pub hitlist_size: Option<u32>,
    pub entrez_query: Option<String>,
}

impl BlastOptions {
    fn apply(&self, mut request: BlastRequest) -> BlastRequest {
        if let Some(expect) = self.expect {
            request = request.with_expect(expect);
        }
        if let Some(size) = self.hitlist_size {
            request = request.with_hitlist_size(size);
        }
        if let Some(entrez) = &self.entrez_query {
            request = request.with_entrez_query(entrez.clone());
        }
        request
    }
}

pub async fn run(ctx: &Context, program: &str, fasta: &Path, database: &str, options: &BlastOptions) -> Result<()> {
    let program: BlastProgram = program.parse()?;
    let query = fasta_query(&read_source(fasta)?)?;
    let client = BlastClient::new(&ctx.config.blast, &ctx.config.user_agent)?;
    let request = options.apply(BlastRequest::new(program, query).with_database(database));

    let hits = with_spinner(
        &format!("Running {} against {}...", program, database),
        client.search(&request, &ctx.cancel),
    )
    .await?;

    report_diagnostics(program.as_str(), &hits.diagnostics);
    emit(&hits.table(), ctx.format, ctx.output.as_deref())
}
