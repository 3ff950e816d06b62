// ! Eligibility Node Main Program
//!
//! Implements the complete voting-round flow:
//! 1. Load configuration
//! 2. Issue a round (mint secrets + Merkle commitment)
//! 3. Export the fixed-format artifact for the voting page
//! 4. Prove eligibility from a secret (voter side)
//! 5. Inspect an artifact (rebuild root + spot-check proofs)

mod artifact;
mod config;
mod error;
mod issuer;
mod types;
mod voter;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber;

use crate::issuer::RoundIssuer;
use crate::types::{EligibilityConfig, RoundArtifact};
use crate::voter::{EligibilityProver, VoteOutcome};

/// Anonymous Voting Eligibility Commitment Node
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Issue a new voting round
    #[arg(short, long, default_value_t = false)]
    issue: bool,

    /// Number of secrets to mint (issue mode, defaults to config value)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Artifact output path (issue mode, defaults to config value)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Secret to prove eligibility with (prove mode)
    #[arg(short, long)]
    secret: Option<String>,

    /// Inspect an existing round artifact
    #[arg(long, default_value_t = false)]
    inspect: bool,

    /// Round artifact path (prove/inspect mode, defaults to config value)
    #[arg(short, long)]
    round: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Initialize logging
    init_logging(&args.log_level)?;

    info!("🚀 Starting Eligibility Node v{}", env!("CARGO_PKG_VERSION"));
    info!("──────────────────────────────────────────────");

    // 2. Load configuration
    let config = load_configuration(&args.config)?;

    // 3. Display configuration
    display_configuration(&config);

    // 4. Run based on mode
    if args.issue {
        run_issue(&config, args.count, args.output.as_deref())?;
    } else if let Some(secret) = args.secret {
        run_prove(&config, &secret, args.round.as_deref())?;
    } else if args.inspect {
        run_inspect(&config, args.round.as_deref())?;
    } else {
        error!("❌ No operation mode specified");
        error!("   Use --issue to mint a new voting round");
        error!("   Use --secret <SECRET> to prove eligibility");
        error!("   Use --inspect to check a round artifact");
        std::process::exit(1);
    }

    info!("👋 Eligibility node exiting");
    Ok(())
}

/// Initialize logging system
fn init_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => {
            eprintln!("⚠️  Unknown log level: {}, using INFO", log_level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

/// Load configuration file
fn load_configuration(config_path: &Path) -> Result<EligibilityConfig> {
    info!("📋 Loading configuration: {}", config_path.display());

    if !config_path.exists() {
        warn!("Configuration file does not exist, using defaults");
        return Ok(EligibilityConfig::default());
    }

    config::load_config(config_path).context("Failed to load configuration")
}

/// Display effective configuration
fn display_configuration(config: &EligibilityConfig) {
    info!("🔍 Effective configuration:");
    info!("   - Node name: {}", config.node_name);
    info!(
        "   - Secret count range: {} - {}",
        config.min_secret_count, config.max_secret_count
    );
    info!("   - Default secret count: {}", config.default_secret_count);
    info!("   - Spot checks per inspection: {}", config.spot_check_count);
    info!("   - Default artifact path: {}", config.artifact_path);
}

/// Issue a new voting round and export its artifact
fn run_issue(
    config: &EligibilityConfig,
    count: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let count = count.unwrap_or(config.default_secret_count);

    info!("──────────────────────────────────────────────");
    info!("🗳️  Issue Round Mode");
    info!("   Participants: {}", count);
    info!("──────────────────────────────────────────────\n");

    // 1. Mint secrets and build the Merkle commitment
    info!("1️⃣ Minting secrets and building Merkle commitment...");
    let issuer = RoundIssuer::new(config.clone());
    let round = issuer.issue_round(count).context("Failed to issue round")?;

    info!(
        "   ✅ Round issued: {} participants, {} tree levels",
        round.secrets.len(),
        round.tree.level_count()
    );
    info!("   - Merkle root: {}", round.tree.root());
    info!("   - Issued at: {}", round.created_at.to_rfc3339());

    // 2. Export the artifact for the voting page
    info!("\n2️⃣ Exporting round artifact...");
    let artifact = RoundArtifact::from_round(&round);
    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.artifact_path));

    artifact::export_json(&artifact, &output_path).context("Failed to export artifact")?;
    info!("   ✅ Artifact written: {}", output_path.display());

    // 3. Print secrets for distribution to participants
    info!("\n3️⃣ Secrets for distribution:");
    for (i, secret) in round.secrets.iter().enumerate() {
        info!("   [{}] {}", i, secret);
    }

    info!("\n✅ Issue process completed!");

    Ok(())
}

/// Prove eligibility for a secret against a round artifact
fn run_prove(config: &EligibilityConfig, secret: &str, round_path: Option<&Path>) -> Result<()> {
    let artifact_path = round_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.artifact_path));

    info!("──────────────────────────────────────────────");
    info!("🎫 Prove Eligibility Mode");
    info!("   Artifact: {}", artifact_path.display());
    info!("──────────────────────────────────────────────\n");

    // 1. Load the round artifact
    info!("1️⃣ Loading round artifact...");
    let artifact = artifact::load_json(&artifact_path).context("Failed to load artifact")?;
    info!("   ✅ Loaded {} leaf hashes", artifact.leaf_hashes.len());

    // 2. Build the prover from public data only
    info!("\n2️⃣ Building eligibility prover...");
    let prover =
        EligibilityProver::from_artifact(&artifact).context("Failed to build prover")?;
    info!("   - Published root: {}", prover.published_root());

    // 3. Attempt the vote
    info!("\n3️⃣ Attempting eligibility proof...");
    let attempt = prover.attempt_vote(secret).context("Vote attempt failed")?;

    info!("   - Secret hash: {}", attempt.secret_hash);
    match attempt.outcome {
        VoteOutcome::Verified => {
            let leaf_index = attempt.leaf_index.unwrap_or_default();
            info!("   - Leaf index: {}", leaf_index);
            if let Some(proof) = &attempt.proof {
                info!("   - Proof path ({} siblings):", proof.depth());
                for (level, sibling) in proof.siblings.iter().enumerate() {
                    info!("     [{}] {}", level, sibling);
                }
            }
            info!("\n✅ ELIGIBLE: proof reaches the published root");
        }
        VoteOutcome::NotEligible => {
            warn!("\n❌ NOT ELIGIBLE: secret hash is not in the participant list");
        }
        VoteOutcome::RootMismatch => {
            error!("\n❌ ROOT MISMATCH: proof does not reach the published root");
            error!("   The leaf list or the published root has been tampered with");
        }
    }

    info!("\n✅ Prove process completed!");

    Ok(())
}

/// Inspect a round artifact for consistency
fn run_inspect(config: &EligibilityConfig, round_path: Option<&Path>) -> Result<()> {
    let artifact_path = round_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.artifact_path));

    info!("──────────────────────────────────────────────");
    info!("🔎 Inspect Artifact Mode");
    info!("   Artifact: {}", artifact_path.display());
    info!("   Spot checks: {}", config.spot_check_count);
    info!("──────────────────────────────────────────────\n");

    // 1. Load the round artifact
    info!("1️⃣ Loading round artifact...");
    let artifact = artifact::load_json(&artifact_path).context("Failed to load artifact")?;
    info!("   ✅ Loaded {} leaf hashes", artifact.leaf_hashes.len());

    // 2. Rebuild the commitment and spot-check proofs
    info!("\n2️⃣ Verifying artifact consistency...");
    let check = artifact::verify_artifact(&artifact, config.spot_check_count)
        .context("Artifact verification failed")?;

    info!("   - Leaf count: {}", check.leaf_count);
    info!(
        "   - Root match: {}",
        if check.root_matches { "✅ PASS" } else { "❌ FAIL" }
    );
    info!(
        "   - Secrets consistent: {}",
        if check.secrets_consistent { "✅ PASS" } else { "❌ FAIL" }
    );
    info!(
        "   - Spot checks: {}/{} passed",
        check.passed_spot_checks, check.total_spot_checks
    );
    info!("   - Computed root: {}", check.computed_root);

    // 3. Verdict
    if check.is_sound() {
        info!("\n✅ Artifact is sound");
    } else {
        error!("\n❌ Artifact FAILED inspection");
        std::process::exit(1);
    }

    Ok(())
}
