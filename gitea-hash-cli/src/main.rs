use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use gitea_hash_core::config::{
    RunConfig, DEFAULT_DESTINATION, DEFAULT_REPO_URL, DEFAULT_RESULT_FILE,
};
use gitea_hash_core::manifest::write_manifest;
use gitea_hash_core::pipeline;
use gitea_hash_core::tree::HttpFetcher;
use gitea_hash_core::verify::verify;

#[derive(Parser)]
#[command(name = "gitea-hash", version, about = "SHA-256 manifest of a Gitea repository")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Download a repository, hash every file and write the manifest
    Run {
        #[arg(long, default_value = DEFAULT_REPO_URL)]
        repo_url: String,
        #[arg(long, default_value = DEFAULT_DESTINATION)]
        destination: PathBuf,
        #[arg(long, default_value = DEFAULT_RESULT_FILE)]
        result_file: String,
        /// Keep the downloaded tree instead of removing it
        #[arg(long, default_value_t = false)]
        keep: bool,
    },
    /// Write a manifest for a tree that is already on disk
    Hash { root: PathBuf, output: PathBuf },
    /// Re-hash a tree and compare it with a manifest
    Verify { manifest: PathBuf, root: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Run { repo_url, destination, result_file, keep } => {
            let cfg = RunConfig {
                repo_url,
                destination,
                result_file_name: result_file,
                keep_destination: keep,
            };
            run(&cfg)?;
        }
        Cmd::Hash { root, output } => hash(&root, &output)?,
        Cmd::Verify { manifest, root } => verify_tree(&manifest, &root)?,
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(cfg: &RunConfig) -> Result<()> {
    let fetcher = HttpFetcher::new()?;
    let summary = pipeline::run(cfg, &fetcher, &mut io::stdout().lock())?;
    eprintln!(
        "Files listed={}, written={}, skipped={}; manifest {}",
        summary.files_listed,
        summary.download.written(),
        summary.download.skipped(),
        summary.manifest_path.display()
    );
    Ok(())
}

fn hash(root: &Path, output: &Path) -> Result<()> {
    if !root.is_dir() {
        bail!("{} is not a directory", root.display());
    }
    let records = write_manifest(root, output, &mut io::stdout().lock())?;
    eprintln!("Hashed {} file(s) into {}", records.len(), output.display());
    Ok(())
}

fn verify_tree(manifest: &Path, root: &Path) -> Result<()> {
    let rep = verify(manifest, root)?;
    for p in &rep.mismatched {
        eprintln!("MISMATCH {p}");
    }
    for p in &rep.missing {
        eprintln!("MISSING {p}");
    }
    for p in &rep.extra {
        eprintln!("EXTRA {p}");
    }
    eprintln!(
        "Files ok={}, mismatched={}, missing={}, extra={}",
        rep.ok.len(),
        rep.mismatched.len(),
        rep.missing.len(),
        rep.extra.len()
    );
    if rep.is_clean() {
        println!("OK");
        Ok(())
    } else {
        println!("BAD");
        bail!("tree does not match {}", manifest.display())
    }
}
