//! `seqvenn map`

use super::Context;
use crate::error::{CliError, Result};
use crate::input::{parse_ids, read_source};
use crate::output::{emit, report_diagnostics};
use crate::progress::with_spinner;
use seqvenn_jobs::idmapping::{accession_list, IdMappingClient, IdMappingRequest};
use std::path::Path;

pub async fn run(ctx: &Context, from: &str, to: &str, ids: &[String], ids_file: Option<&Path>) -> Result<()> {
    let ids = match ids_file {
        Some(path) => parse_ids(&read_source(path)?),
        None => accession_list(ids),
    };
    if ids.is_empty() {
        return Err(CliError::invalid_input("no accessions given; use --ids or --ids-file"));
    }

    let client = IdMappingClient::new(&ctx.config.idmapping, &ctx.config.user_agent)?;
    let request = IdMappingRequest::new(from, to, ids);

    let mapping = with_spinner(
        &format!("Mapping {} ids from {} to {}...", request.ids.len(), from, to),
        client.map(&request, &ctx.cancel),
    )
    .await?;

    report_diagnostics("identifiers could not be mapped", &mapping.diagnostics);
    emit(&mapping.table(), ctx.format, ctx.output.as_deref())
}
