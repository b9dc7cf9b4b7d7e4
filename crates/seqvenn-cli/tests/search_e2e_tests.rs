//! End-to-end tests for `seqvenn phmmer`, `seqvenn blast` and `seqvenn map`
//!
//! Each test runs the real binary against a wiremock server standing in for
//! the remote services.

mod common;

use common::{fasta_file, json, search_info, seqvenn, Sequence, PUT_PAGE};
use predicates::prelude::*;
use serde_json::json;
use std::io::Write;
use wiremock::{
    matchers::{body_json, body_string_contains, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn phmmer_result() -> serde_json::Value {
    json!({
        "status": "SUCCESS",
        "result": {"hits": [
            {"metadata": {
                "accession": "P12345",
                "identifier": "SAMPLE_PROT",
                "uniprot_accession": "UP12345",
                "phylum": "Proteobacteria",
                "species": "Escherichia coli"
            }},
            {"metadata": {"accession": "Q99999"}}
        ]}
    })
}

async fn mount_phmmer(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/search/phmmer"))
        .respond_with(json(json!({"id": "job123"})))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/result/job123"))
        .respond_with(Sequence::new(vec![
            json(json!({"status": "STARTED"})),
            json(phmmer_result()),
        ]))
        .mount(server)
        .await;
}

// ============================================================================
// phmmer
// ============================================================================

#[tokio::test]
async fn test_phmmer_prints_tsv_when_piped() {
    let server = MockServer::start().await;
    mount_phmmer(&server).await;
    let fasta = fasta_file();

    seqvenn(&server)
        .arg("phmmer")
        .arg("--fasta")
        .arg(fasta.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "accession\tidentifier\tuniprot_accession\tphylum\tspecies",
        ))
        .stdout(predicate::str::contains("P12345\tSAMPLE_PROT\tUP12345\tProteobacteria\tEscherichia coli"))
        .stdout(predicate::str::contains("Q99999\t\t\t\t"));
}

#[tokio::test]
async fn test_phmmer_json_output_has_nulls() {
    let server = MockServer::start().await;
    mount_phmmer(&server).await;
    let fasta = fasta_file();

    seqvenn(&server)
        .args(["phmmer", "--format", "json", "--fasta"])
        .arg(fasta.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"accession\": \"Q99999\""))
        .stdout(predicate::str::contains("\"species\": null"));
}

#[tokio::test]
async fn test_phmmer_sends_database() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/phmmer"))
        .and(body_json(json!({
            "input": ">query\nMTEITAAMVKELRESTGAGMMDCKNALSEAN\n",
            "database": "swissprot"
        })))
        .respond_with(json(json!({"id": "job123"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/result/job123"))
        .respond_with(json(phmmer_result()))
        .mount(&server)
        .await;

    let fasta = fasta_file();
    seqvenn(&server)
        .args(["phmmer", "--database", "swissprot", "--fasta"])
        .arg(fasta.path())
        .assert()
        .success();
}

#[tokio::test]
async fn test_phmmer_failure_exits_with_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/phmmer"))
        .respond_with(json(json!({"id": "job123"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/result/job123"))
        .respond_with(json(json!({"status": "FAILURE"})))
        .mount(&server)
        .await;

    let fasta = fasta_file();
    seqvenn(&server)
        .arg("phmmer")
        .arg("--fasta")
        .arg(fasta.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("FAILURE"));
}

#[tokio::test]
async fn test_max_polls_gives_up() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search/phmmer"))
        .respond_with(json(json!({"id": "job123"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/result/job123"))
        .respond_with(json(json!({"status": "RUNNING"})))
        .expect(3)
        .mount(&server)
        .await;

    let fasta = fasta_file();
    seqvenn(&server)
        .args(["phmmer", "--max-polls", "3", "--fasta"])
        .arg(fasta.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not finish"));
}

#[tokio::test]
async fn test_missing_fasta_file() {
    let server = MockServer::start().await;

    seqvenn(&server)
        .args(["phmmer", "--fasta", "/nonexistent/query.fasta"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

// ============================================================================
// blast
// ============================================================================

#[tokio::test]
async fn test_blast_outputs_one_row_per_hsp() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/Blast.cgi"))
        .and(body_string_contains("PROGRAM=blastx"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PUT_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Blast.cgi"))
        .and(query_param("FORMAT_OBJECT", "SearchInfo"))
        .respond_with(Sequence::new(vec![search_info("WAITING"), search_info("READY")]))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Blast.cgi"))
        .and(query_param("FORMAT_TYPE", "JSON2_S"))
        .respond_with(json(json!({
            "BlastOutput2": [{"report": {"results": {"search": {"hits": [{
                "description": [{"id": "gb|AAB12345.1|", "accession": "AAB12345", "title": "kinase"}],
                "hsps": [
                    {"evalue": 1e-50, "identity": 90, "align_len": 100, "bit_score": 200.5},
                    {"evalue": 0.01, "identity": 10, "align_len": 20, "bit_score": 30.0}
                ]
            }]}}}}]
        })))
        .mount(&server)
        .await;

    let fasta = fasta_file();
    let assert = seqvenn(&server)
        .args(["blast", "--program", "blastx", "--format", "csv", "--fasta"])
        .arg(fasta.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("hit_id,hit_def,accession,e_value"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(stdout.lines().filter(|line| line.starts_with("gb|AAB12345.1|")).count(), 2);
}

#[tokio::test]
async fn test_blast_unknown_program_is_rejected() {
    let server = MockServer::start().await;
    let fasta = fasta_file();

    seqvenn(&server)
        .args(["blast", "--program", "psiblast", "--fasta"])
        .arg(fasta.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown BLAST program"));
}

// ============================================================================
// map
// ============================================================================

async fn mount_mapping(server: &MockServer, results: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/idmapping/run"))
        .respond_with(json(json!({"jobId": "map1"})))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/idmapping/status/map1"))
        .respond_with(json(json!({"jobStatus": "FINISHED"})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/idmapping/results/map1"))
        .respond_with(json(results))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_map_reports_failed_ids_on_stderr() {
    let server = MockServer::start().await;
    mount_mapping(&server, json!({"results": [{"from": "P1", "to": "X1"}], "failedIds": ["P2"]})).await;

    seqvenn(&server)
        .args(["map", "--ids", "P1,P2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("source_id\tmapped_id"))
        .stdout(predicate::str::contains("P1\tX1"))
        .stdout(predicate::str::contains("P2").not())
        .stderr(predicate::str::contains("P2"));
}

#[tokio::test]
async fn test_map_reads_ids_file_and_writes_output() {
    let server = MockServer::start().await;
    mount_mapping(&server, json!({"results": [{"from": "P1", "to": "X1"}], "failedIds": []})).await;

    let mut ids = tempfile::NamedTempFile::new().unwrap();
    writeln!(ids, "P1\nP1\n").unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join("mapping.csv");

    seqvenn(&server)
        .args(["map", "--format", "csv", "--ids-file"])
        .arg(ids.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, "source_id,mapped_id\nP1,X1\n");
}

#[tokio::test]
async fn test_map_without_ids_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(json(json!({"jobId": "map1"})))
        .expect(0)
        .mount(&server)
        .await;

    seqvenn(&server)
        .arg("map")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no accessions"));
}

#[tokio::test]
async fn test_invalid_config_file_is_reported() {
    let server = MockServer::start().await;
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "[hmmer]\npoll_every = 3").unwrap();

    seqvenn(&server)
        .args(["map", "--ids", "P1", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file"));
}
