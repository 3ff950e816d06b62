//! 端到端投票輪流程演示
//!
//! 這個示例展示完整的資格承諾流程：
//! 1. 發行方鑄造秘密並構建默克爾承諾
//! 2. 導出投票頁面使用的固定格式憑證
//! 3. 投票者憑秘密生成並驗證資格證明
//! 4. 檢驗憑證一致性（重建根 + 隨機抽查）
//!
//! 執行方式：
//! ```bash
//! cd eligibility-node
//! cargo run --example end_to_end_round
//! ```

use eligibility_node::artifact;
use eligibility_node::issuer::RoundIssuer;
use eligibility_node::types::RoundArtifact;
use eligibility_node::voter::EligibilityProver;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日誌
    tracing_subscriber::fmt::init();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║          匿名投票資格系統 - 端到端流程演示                     ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    // ========== 步驟 1: 發行投票輪 ==========
    println!("\n📍 步驟 1: 發行投票輪");
    println!("   目標: 鑄造 5 個秘密並構建默克爾承諾");

    let issuer = RoundIssuer::with_defaults();
    let round = issuer.issue_round(5)?;

    println!("\n   結果:");
    println!("   ✓ 參與者數量: {}", round.secrets.len());
    println!("   ✓ 樹層數:     {}", round.tree.level_count());
    println!("   ✓ 默克爾根:   {}", round.tree.root());

    // ========== 步驟 2: 導出憑證 ==========
    println!("\n📍 步驟 2: 導出投票輪憑證");

    let artifact_path = "/tmp/demo_voting_round.json";
    let exported = RoundArtifact::from_round(&round);
    artifact::export_json(&exported, artifact_path)?;

    println!("   ✓ 憑證已寫入: {}", artifact_path);

    // ========== 步驟 3: 投票者證明資格 ==========
    println!("\n📍 步驟 3: 投票者憑秘密證明資格");
    println!("   操作: 加載憑證 → 定位葉子 → 重算證明 → 對根驗證");

    let loaded = artifact::load_json(artifact_path)?;
    let prover = EligibilityProver::from_artifact(&loaded)?;

    let attempt = prover.attempt_vote(&round.secrets[3])?;

    println!("\n   結果:");
    println!("   ✓ 葉子哈希: {}", attempt.secret_hash);
    println!("   ✓ 葉子索引: {:?}", attempt.leaf_index);
    println!("   ✓ 裁定:     {:?}", attempt.outcome);
    assert!(attempt.is_verified());

    // ========== 步驟 4: 檢驗憑證一致性 ==========
    println!("\n📍 步驟 4: 檢驗憑證一致性");

    let check = artifact::verify_artifact(&loaded, 3)?;

    println!("   ✓ 根一致:   {}", check.root_matches);
    println!("   ✓ 秘密一致: {}", check.secrets_consistent);
    println!(
        "   ✓ 抽查通過: {}/{}",
        check.passed_spot_checks, check.total_spot_checks
    );

    println!("\n✅ 端到端流程完成!");

    Ok(())
}
