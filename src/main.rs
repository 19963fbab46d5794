//! Manual tester for the document upload endpoint.
//!
//! Posts a local PDF with its document type and prints the extracted metadata. Upload
//! failures are reported on stdout and do not change the exit status; only usage errors do.
use clap::{CommandFactory, Parser, error::ErrorKind};
use docrag::{
    config,
    logging,
    upload::{self, DocumentType, UploadClient},
};
use std::{ffi::OsString, path::PathBuf, process::ExitCode, time::Duration};

#[derive(Parser)]
#[command(
    name = "docrag-upload",
    about = "Upload an invoice or contract PDF to the document processing API"
)]
struct Cli {
    /// Document type: `invoice` or `contract`.
    document_type: String,
    /// Path to the PDF file.
    path: PathBuf,
    /// Upload endpoint (defaults to `UPLOAD_URL`).
    #[arg(long)]
    endpoint: Option<String>,
    /// Request timeout in seconds (defaults to `UPLOAD_TIMEOUT_SECS`).
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// What the command line asked for.
enum Invocation {
    /// Arguments are valid; upload the document.
    Upload(Cli, DocumentType),
    /// Print `output` and exit without uploading.
    Exit { output: String, success: bool },
}

fn parse_invocation<I, T>(args: I) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Invocation::Exit {
                output: err.render().to_string(),
                success: true,
            };
        }
        Err(_) => {
            return Invocation::Exit {
                output: usage(),
                success: false,
            };
        }
    };

    match cli.document_type.parse::<DocumentType>() {
        Ok(document_type) => Invocation::Upload(cli, document_type),
        Err(err) => Invocation::Exit {
            output: format!("Error: {err}\n"),
            success: false,
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let (cli, document_type) = match parse_invocation(std::env::args_os()) {
        Invocation::Upload(cli, document_type) => (cli, document_type),
        Invocation::Exit { output, success } => {
            print!("{output}");
            return if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
    };

    logging::init_tracing("warn");
    let mut config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            println!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(endpoint) = cli.endpoint {
        config.upload_url = endpoint;
    }
    if let Some(secs) = cli.timeout_secs {
        config.upload_timeout = Duration::from_secs(secs);
    }

    run(&config, document_type, cli.path).await;
    ExitCode::SUCCESS
}

async fn run(config: &config::Config, document_type: DocumentType, path: PathBuf) {
    let client = match UploadClient::from_config(config) {
        Ok(client) => client,
        Err(err) => {
            print!("{}", upload::render_error(&err));
            return;
        }
    };

    let document = match upload::read_document(&path).await {
        Ok(document) => document,
        Err(err) => {
            print!("{}", upload::render_error(&err));
            return;
        }
    };

    println!("Uploading {document_type}: {}...", path.display());
    match client.send(document_type, document).await {
        Ok(outcome) => print!("{}", upload::render_outcome(&outcome)),
        Err(err) => {
            tracing::debug!(error = %err, endpoint = client.endpoint(), "Upload failed");
            print!("{}", upload::render_error(&err));
        }
    }
}

fn usage() -> String {
    let name = Cli::command().get_name().to_string();
    format!(
        "Usage:\n  {name} invoice <path_to_invoice.pdf>\n  \
         {name} contract <path_to_contract.pdf>\n"
    )
}
