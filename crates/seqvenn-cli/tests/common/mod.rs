//! Shared helpers for the CLI end-to-end tests

#![allow(dead_code)]

use assert_cmd::Command;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;
use wiremock::{MockServer, Request, Respond, ResponseTemplate};

/// `seqvenn` pointed at the mock server for every service, with no waiting
pub fn seqvenn(server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("seqvenn").unwrap();
    for (service, base_url) in [
        ("HMMER", server.uri()),
        ("BLAST", format!("{}/Blast.cgi", server.uri())),
        ("IDMAPPING", server.uri()),
    ] {
        cmd.env(format!("SEQVENN_{}_BASE_URL", service), base_url)
            .env(format!("SEQVENN_{}_POLL_INTERVAL_MS", service), "0")
            .env(format!("SEQVENN_{}_RETRY_INTERVAL_MS", service), "0");
    }
    cmd.env("SEQVENN_LOG_LEVEL", "error").env_remove("SEQVENN_CONFIG");
    cmd
}

pub fn fasta_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, ">query\nMTEITAAMVKELRESTGAGMMDCKNALSEAN").unwrap();
    file
}

/// Responds with each template in turn, then repeats the last one
pub struct Sequence {
    responses: Vec<ResponseTemplate>,
    calls: AtomicUsize,
}

impl Sequence {
    pub fn new(responses: Vec<ResponseTemplate>) -> Self {
        Self {
            responses,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses[call.min(self.responses.len() - 1)].clone()
    }
}

pub fn json(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn search_info(status: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        "<!--\nQBlastInfoBegin\n\tStatus={}\nQBlastInfoEnd\n-->",
        status
    ))
}

pub const PUT_PAGE: &str = "<!--QBlastInfoBegin\n    RID = RID42\n    RTOE = 10\nQBlastInfoEnd\n-->";
