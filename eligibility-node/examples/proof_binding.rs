//! 證明綁定性演示
//!
//! 成員證明綁定特定的葉子索引：把一個參與者的證明
//! 套用到另一個參與者的葉子上，或對偽造的根驗證，
//! 都會得到正常的拒絕結果而不是錯誤。
//!
//! 執行方式：
//! ```bash
//! cd eligibility-node
//! cargo run --example proof_binding
//! ```

use eligibility_node::issuer::RoundIssuer;
use merkle_commit::{hash_secret, prove_membership};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日誌
    tracing_subscriber::fmt::init();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║          匿名投票資格系統 - 證明綁定性演示                     ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    // ========== 步驟 1: 構建一輪四人投票 ==========
    println!("\n📍 步驟 1: 構建一輪四人投票");

    let issuer = RoundIssuer::with_defaults();
    let secrets = ["alice", "bob", "carol", "dave"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let round = issuer.issue_round_with_secrets(secrets)?;
    let root = round.tree.root();
    let leaves = round.tree.leaves();

    println!("   ✓ 默克爾根: {}", root);

    // ========== 步驟 2: alice 的證明對自己的葉子有效 ==========
    println!("\n📍 步驟 2: alice 的證明對自己的葉子有效");

    let alice_proof = prove_membership(leaves, 0)?;
    let alice_ok = alice_proof.verify(&hash_secret("alice"), root);

    println!("   ✓ verify(alice 葉子, alice 證明) = {}", alice_ok);
    assert!(alice_ok);

    // ========== 步驟 3: 套用到 bob 的葉子會被拒絕 ==========
    println!("\n📍 步驟 3: 同一份證明套用到 bob 的葉子");

    let stolen = alice_proof.verify(&hash_secret("bob"), root);

    println!("   ✓ verify(bob 葉子, alice 證明) = {}", stolen);
    assert!(!stolen);

    // ========== 步驟 4: 對偽造的根驗證也會失敗 ==========
    println!("\n📍 步驟 4: 對偽造的根驗證");

    let forged_root = hash_secret("forged");
    let forged = alice_proof.verify(&hash_secret("alice"), &forged_root);

    println!("   ✓ verify(alice 葉子, 偽造根) = {}", forged);
    assert!(!forged);

    println!("\n✅ 證明綁定性驗證完成: 證明不可轉移、根不可偽造");

    Ok(())
}
