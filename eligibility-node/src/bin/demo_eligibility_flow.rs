// ! Demo Eligibility Flow Binary
//!
//! This program exercises the complete voting-round workflow

use anyhow::Result;
use eligibility_node::artifact;
use eligibility_node::issuer::RoundIssuer;
use eligibility_node::types::RoundArtifact;
use eligibility_node::voter::{EligibilityProver, VoteAttempt, VoteOutcome};
use tracing_subscriber;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║              Anonymous Voting Eligibility Demo                 ║");
    println!("╚════════════════════════════════════════════════════════════════╝\n");

    let artifact_path = "/tmp/voting-round.json";

    println!("📋 Demo Configuration:");
    println!("   Participants: 5");
    println!("   Leaf hash: SHA-256 of the secret");
    println!("   Parent hash: SHA-256 over concatenated child hex strings");
    println!("   Artifact path: {}\n", artifact_path);

    println!("🚀 Starting demo flow...\n");

    // 1. Issuer mints secrets and commits to the participant set
    println!("1️⃣ Issuing voting round...");
    let issuer = RoundIssuer::with_defaults();
    let round = match issuer.issue_round(5) {
        Ok(round) => round,
        Err(e) => {
            eprintln!("❌ Issue failed: {}", e);
            std::process::exit(1);
        }
    };
    println!("   Merkle root: {}", round.tree.root());

    // 2. Export the fixed-format artifact for the voting page
    println!("\n2️⃣ Exporting round artifact...");
    let exported = RoundArtifact::from_round(&round);
    artifact::export_json(&exported, artifact_path)?;
    println!("   Written: {}", artifact_path);

    // 3. Reload from disk, exactly as the voting page would
    println!("\n3️⃣ Reloading artifact from disk...");
    let loaded = artifact::load_json(artifact_path)?;
    println!("   Loaded {} leaf hashes", loaded.leaf_hashes.len());

    // 4. A participant proves eligibility with their secret
    println!("\n4️⃣ Participant proves eligibility...\n");
    let prover = EligibilityProver::from_artifact(&loaded)?;
    let attempt = prover.attempt_vote(&round.secrets[2])?;
    print_attempt_results(&attempt);

    if !attempt.is_verified() {
        eprintln!("❌ Expected the issued secret to verify");
        std::process::exit(1);
    }

    // 5. An outsider tries a secret that was never issued
    println!("\n5️⃣ Outsider attempts with an unissued secret...");
    let outsider = prover.attempt_vote("not-a-participant")?;
    match outsider.outcome {
        VoteOutcome::NotEligible => println!("   ✅ Correctly rejected: NOT ELIGIBLE"),
        other => {
            eprintln!("❌ Expected NOT ELIGIBLE, got {:?}", other);
            std::process::exit(1);
        }
    }

    // 6. A tampered artifact is caught by inspection
    println!("\n6️⃣ Inspecting a tampered artifact...");
    let mut tampered = loaded.clone();
    let flipped = if tampered.merkle_root.starts_with('f') { "0" } else { "f" };
    tampered.merkle_root.replace_range(0..1, flipped);

    let check = artifact::verify_artifact(&tampered, 3)?;
    if check.root_matches {
        eprintln!("❌ Tampered root was not detected");
        std::process::exit(1);
    }
    println!(
        "   ✅ Tampering detected: {}/{} spot checks failed against the forged root",
        check.failed_spot_checks, check.total_spot_checks
    );

    println!("\n✅ Demo completed!");
    println!("\n💡 Next step: point the voting page at {}", artifact_path);
    println!("   The page only needs leafHashes and merkleRoot to verify voters\n");

    Ok(())
}

fn print_attempt_results(attempt: &VoteAttempt) {
    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║                     Vote Attempt Results                       ║");
    println!("╚════════════════════════════════════════════════════════════════╝\n");

    println!("🔐 Proof Material:");
    println!("   Secret hash: {}", attempt.secret_hash);
    if let Some(index) = attempt.leaf_index {
        println!("   Leaf index: {}", index);
    }
    if let Some(proof) = &attempt.proof {
        println!("   Sibling path:");
        for (level, sibling) in proof.siblings.iter().enumerate() {
            println!("     [{}] {}", level, sibling);
        }
    }
    println!();

    println!("✅ Outcome: {:?}", attempt.outcome);
}
