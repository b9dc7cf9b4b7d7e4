//! `seqvenn compare`
//!
//! Runs phmmer and each requested BLAST program one after another, maps every
//! method's hits into the RefSeq protein namespace and reports which
//! accessions each combination of methods found.

use super::Context;
use crate::error::Result;
use crate::input::{fasta_query, read_source};
use crate::output::{emit, prepare_dir, report_diagnostics};
use crate::progress::with_spinner;
use seqvenn_common::{OutputFormat, Table};
use seqvenn_jobs::blast::{map_blast_hits, BlastClient, BlastProgram, BlastRequest};
use seqvenn_jobs::hmmer::{HmmerClient, PhmmerRequest};
use seqvenn_jobs::idmapping::{IdMappingClient, IdMappingRequest, MappedId, REFSEQ_PROTEIN, UNIPROTKB_AC_ID};
use seqvenn_jobs::{Normalized, Overlap};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

/// Arguments of one comparison run
#[derive(Debug, Clone)]
pub struct CompareArgs<'a> {
    pub fasta: &'a Path,
    pub hmmer_database: &'a str,
    pub blast_programs: &'a [String],
    pub blast_database: &'a str,
    pub output_dir: &'a Path,
}

pub async fn run(ctx: &Context, args: CompareArgs<'_>) -> Result<()> {
    let programs = parse_programs(args.blast_programs)?;
    let query = fasta_query(&read_source(args.fasta)?)?;
    prepare_dir(args.output_dir)?;

    let user_agent = &ctx.config.user_agent;
    let hmmer = HmmerClient::new(&ctx.config.hmmer, user_agent)?;
    let blast = BlastClient::new(&ctx.config.blast, user_agent)?;
    let idmapping = IdMappingClient::new(&ctx.config.idmapping, user_agent)?;

    let mut sets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    let request = PhmmerRequest::new(query.clone()).with_database(args.hmmer_database);
    let hits = with_spinner("Running phmmer...", hmmer.search(&request, &ctx.cancel)).await?;
    write_csv(&hits.table(), args.output_dir, "phmmer_hits.csv")?;

    let accessions: Vec<&str> = hits.rows.iter().filter_map(|hit| hit.accession.as_deref()).collect();
    let mapping = if accessions.is_empty() {
        info!("phmmer returned no accessions, skipping ID mapping");
        Normalized::default()
    } else {
        let request = IdMappingRequest::new(UNIPROTKB_AC_ID, REFSEQ_PROTEIN, accessions);
        with_spinner("Mapping phmmer hits to RefSeq...", idmapping.map(&request, &ctx.cancel)).await?
    };
    record_method(&mut sets, "phmmer", &mapping, args.output_dir)?;

    for program in programs {
        let request = BlastRequest::new(program, query.clone()).with_database(args.blast_database);
        let hits = with_spinner(&format!("Running {}...", program), blast.search(&request, &ctx.cancel)).await?;
        write_csv(&hits.table(), args.output_dir, &format!("{}_hits.csv", program))?;

        let mapping = with_spinner(
            &format!("Mapping {} hits to RefSeq...", program),
            map_blast_hits(&idmapping, &hits.rows, &ctx.cancel),
        )
        .await?;
        record_method(&mut sets, program.as_str(), &mapping, args.output_dir)?;
    }

    let overlap = Overlap::from_sets(&sets);
    let table = Table::from_records(&overlap.regions);
    write_csv(&table, args.output_dir, "overlap.csv")?;
    info!(
        methods = sets.len(),
        regions = overlap.regions.len(),
        shared = overlap.shared_by_all().len(),
        "Comparison complete"
    );

    emit(&table, ctx.format, ctx.output.as_deref())
}

/// Parse program names, keeping the first occurrence of each
fn parse_programs(names: &[String]) -> Result<Vec<BlastProgram>> {
    let mut programs = Vec::new();
    for name in names {
        let program: BlastProgram = name.parse()?;
        if !programs.contains(&program) {
            programs.push(program);
        }
    }
    Ok(programs)
}

/// RefSeq accession without its `.version` suffix
fn strip_version(accession: &str) -> &str {
    accession.split_once('.').map_or(accession, |(base, _)| base)
}

fn record_method(
    sets: &mut BTreeMap<String, BTreeSet<String>>,
    method: &str,
    mapping: &Normalized<MappedId>,
    dir: &Path,
) -> Result<()> {
    report_diagnostics(&format!("{}: unmapped identifiers", method), &mapping.diagnostics);
    write_csv(&mapping.table(), dir, &format!("{}_mapping.csv", method))?;

    let accessions = mapping
        .rows
        .iter()
        .map(|row| strip_version(&row.mapped_id).to_string())
        .collect();
    sets.insert(method.to_string(), accessions);
    Ok(())
}

fn write_csv(table: &Table, dir: &Path, name: &str) -> Result<()> {
    table.write_to_path(OutputFormat::Csv, &dir.join(name))?;
    Ok(())
}
