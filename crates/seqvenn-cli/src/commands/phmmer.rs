//! `seqvenn phmmer`

use super::Context;
use crate::error::Result;
use crate::input::{fasta_query, read_source};
use crate::output::{emit, report_diagnostics};
use crate::progress::with_spinner;
use seqvenn_jobs::hmmer::{HmmerClient, PhmmerRequest};
use std::path::Path;

pub async fn run(ctx: &Context, fasta: &Path, database: &str) -> Result<()> {
    let query = fasta_query(&read_source(fasta)?)?;
    let client = HmmerClient::new(&ctx.config.hmmer, &ctx.config.user_agent)?;
    let request = PhmmerRequest::new(query).with_database(database);

    let hits = with_spinner(
        &format!("Running phmmer against {}...", database),
        client.search(&request, &ctx.cancel),
    )
    .await?;

    report_diagnostics("phmmer", &hits.diagnostics);
    emit(&hits.table(), ctx.format, ctx.output.as_deref())
}
