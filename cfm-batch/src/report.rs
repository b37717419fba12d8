//! Console output for the command line client.
//!
//! Human readable progress goes to stdout. With `--json` it moves to stderr and
//! stdout carries a single JSON outcome document instead, so scripts can tell
//! failure categories apart without scraping text.

use cfm_core::{BatchRequest, BatchSuccess, ClientError};
use serde::Serialize;
use url::Url;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<'a> {
    Success {
        #[serde(flatten)]
        result: &'a BatchSuccess,
    },
    Spectrum {
        smiles: &'a str,
        spectrum: &'a str,
    },
    Failure {
        kind: &'static str,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        http_status: Option<u16>,
    },
}

impl<'a> Outcome<'a> {
    pub fn failure(err: &ClientError) -> Self {
        Outcome::Failure {
            kind: err.kind(),
            message: err.to_string(),
            http_status: err.http_status(),
        }
    }
}

pub struct Reporter {
    json: bool,
}

impl Reporter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn say(&self, line: &str) {
        if self.json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn banner(&self) {
        let rule = "=".repeat(50);
        self.say(&rule);
        self.say("CFM-ID batch prediction test");
        self.say(&rule);
    }

    pub fn upload_started(&self, request: &BatchRequest, base_url: &Url) {
        for line in upload_lines(request, base_url) {
            self.say(&line);
        }
    }

    pub fn success(&self, result: &BatchSuccess) {
        for line in success_lines(result) {
            self.say(&line);
        }
        self.emit(&Outcome::Success { result });
    }

    pub fn spectrum(&self, smiles: &str, spectrum: &str) {
        if self.json {
            self.emit(&Outcome::Spectrum { smiles, spectrum });
        } else {
            print!("{}", spectrum);
            if !spectrum.ends_with('\n') {
                println!();
            }
        }
    }

    pub fn failure(&self, err: &ClientError) {
        for line in failure_lines(err) {
            self.say(&line);
        }
        self.emit(&Outcome::failure(err));
    }

    fn emit(&self, outcome: &Outcome<'_>) {
        if !self.json {
            return;
        }
        match serde_json::to_string(outcome) {
            Ok(doc) => println!("{}", doc),
            Err(e) => eprintln!("failed to encode outcome: {}", e),
        }
    }
}

pub fn upload_lines(request: &BatchRequest, base_url: &Url) -> Vec<String> {
    vec![
        format!("🌐 Service: {}", base_url),
        format!("📤 Uploading file: {}", request.input_file.display()),
        format!("📊 Probability threshold: {}", request.prob_thresh),
        "⏳ Processing...".to_string(),
    ]
}

pub fn success_lines(result: &BatchSuccess) -> Vec<String> {
    let mut lines = vec![
        "✅ Prediction complete!".to_string(),
        format!("📁 Results saved to: {}", result.output_file.display()),
        format!("📏 File size: {:.2} KB", result.size_kb()),
    ];
    if let Some(name) = &result.suggested_filename {
        lines.push(format!("   Server suggested filename: {}", name));
    }
    lines
}

pub fn failure_lines(err: &ClientError) -> Vec<String> {
    match err {
        ClientError::InputFileMissing { path } => vec![format!(
            "❌ Error: input file '{}' does not exist",
            path.display()
        )],
        ClientError::ConnectionFailed { base_url, message } => vec![
            "❌ Error: cannot connect to server".to_string(),
            format!("   Make sure the service is running: {}", base_url),
            format!("   ({})", message),
        ],
        ClientError::Timeout { after } => vec![format!(
            "❌ Error: request timed out after {} (the batch may contain too many molecules)",
            humantime::format_duration(*after)
        )],
        ClientError::HttpError { status, body } => vec![
            format!("❌ Error: HTTP {}", status),
            format!("Response body: {}", body),
        ],
        ClientError::UnexpectedError(description) => vec![format!("❌ Error: {}", description)],
    }
}
