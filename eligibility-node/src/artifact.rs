//! 投票輪憑證模塊
//!
//! 本模塊負責投票輪的導出、加載與一致性檢驗。
//!
//! 憑證是一個固定格式的 JSON 文件：
//!
//! ```json
//! {
//!   "secrets": ["..."],
//!   "leafHashes": ["..."],
//!   "merkleRoot": "..."
//! }
//! ```
//!
//! 投票頁面按原樣加載此文件，因此三個字段名是互操作契約。
//! 檢驗流程會重建默克爾樹並抽查隨機葉子的成員證明，
//! 以確認文件未被篡改。

use crate::error::{NodeError, Result};
use crate::types::{RoundArtifact, VotingRound};
use merkle_commit::{hash_secret, Digest, MerkleTree};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// 憑證檢驗結果
///
/// 包含單次檢驗的所有關鍵信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactCheck {
    /// 葉子數量
    pub leaf_count: usize,

    /// 重建的根是否與憑證聲明的根一致
    pub root_matches: bool,

    /// 秘密列表與葉子哈希是否一一對應
    pub secrets_consistent: bool,

    /// 抽查的成員證明總數
    pub total_spot_checks: usize,

    /// 驗證通過的抽查次數
    pub passed_spot_checks: usize,

    /// 驗證失敗的抽查次數
    pub failed_spot_checks: usize,

    /// 由葉子哈希重建出的默克爾根
    pub computed_root: Digest,
}

impl ArtifactCheck {
    /// 憑證是否完全通過檢驗
    pub fn is_sound(&self) -> bool {
        self.root_matches && self.secrets_consistent && self.failed_spot_checks == 0
    }
}

impl RoundArtifact {
    /// 從投票輪生成憑證
    ///
    /// 秘密、葉子哈希與根全部轉換為十六進制字符串形式
    pub fn from_round(round: &VotingRound) -> Self {
        Self {
            secrets: round.secrets.clone(),
            leaf_hashes: round
                .tree
                .leaves()
                .iter()
                .map(|leaf| leaf.as_str().to_string())
                .collect(),
            merkle_root: round.tree.root().as_str().to_string(),
        }
    }

    /// 解析葉子哈希列表
    ///
    /// # 返回
    /// - `Ok(Vec<Digest>)`: 全部葉子均為合法摘要
    /// - `Err(NodeError)`: 某個葉子不是 64 位小寫十六進制
    pub fn to_leaves(&self) -> Result<Vec<Digest>> {
        self.leaf_hashes
            .iter()
            .enumerate()
            .map(|(i, hash)| {
                Digest::from_hex(hash).map_err(|e| {
                    NodeError::InvalidArtifact(format!("leaf {} is not a valid digest: {}", i, e))
                })
            })
            .collect()
    }

    /// 解析憑證聲明的默克爾根
    pub fn root_digest(&self) -> Result<Digest> {
        Digest::from_hex(&self.merkle_root).map_err(|e| {
            NodeError::InvalidArtifact(format!("merkleRoot is not a valid digest: {}", e))
        })
    }
}

/// 將憑證導出為 JSON 文件
///
/// # 參數
/// - `artifact`: 待導出的投票輪憑證
/// - `output_path`: 輸出文件路徑
///
/// # 返回
/// - `Ok(())`: 導出成功
/// - `Err(NodeError)`: 序列化失敗或文件寫入失敗
pub fn export_json<P: AsRef<Path>>(artifact: &RoundArtifact, output_path: P) -> Result<()> {
    info!("Exporting round artifact to JSON: {:?}", output_path.as_ref());

    let json = serde_json::to_string_pretty(artifact)
        .map_err(|e| NodeError::Serialization(format!("Failed to serialize artifact: {}", e)))?;

    std::fs::write(output_path.as_ref(), &json).map_err(|e| {
        NodeError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write artifact file: {}", e),
        ))
    })?;

    info!("Round artifact exported successfully ({} bytes)", json.len());

    Ok(())
}

/// 從 JSON 文件加載憑證
///
/// # 參數
/// - `input_path`: 憑證文件路徑
///
/// # 返回
/// - `Ok(RoundArtifact)`: 加載成功
/// - `Err(NodeError)`: 文件不存在、讀取失敗或 JSON 格式錯誤
///
/// 缺少 `secrets`、`leafHashes` 或 `merkleRoot` 任一字段
/// 都視為格式錯誤；未知字段會被忽略
pub fn load_json<P: AsRef<Path>>(input_path: P) -> Result<RoundArtifact> {
    info!("Loading round artifact from JSON: {:?}", input_path.as_ref());

    if !input_path.as_ref().exists() {
        return Err(NodeError::Config(format!(
            "Artifact file not found: {:?}",
            input_path.as_ref()
        )));
    }

    let json = std::fs::read_to_string(input_path.as_ref()).map_err(|e| {
        NodeError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read artifact file: {}", e),
        ))
    })?;

    let artifact: RoundArtifact = serde_json::from_str(&json)
        .map_err(|e| NodeError::Serialization(format!("Failed to parse artifact JSON: {}", e)))?;

    info!(
        "Round artifact loaded successfully ({} leaves)",
        artifact.leaf_hashes.len()
    );

    Ok(artifact)
}

/// 檢驗憑證的一致性
///
/// 執行完整的檢驗流程：
/// 1. 核對秘密列表與葉子哈希是否一一對應
/// 2. 由葉子哈希重建默克爾樹，核對聲明的根
/// 3. 隨機抽查若干葉子，驗證其成員證明能通向聲明的根
///
/// # 參數
/// - `artifact`: 待檢驗的憑證
/// - `spot_checks`: 期望的抽查次數（超過葉子數時自動收斂）
///
/// # 返回
/// - `Ok(ArtifactCheck)`: 檢驗完成，各項結果見字段
/// - `Err(NodeError)`: 憑證中的哈希字段無法解析
pub fn verify_artifact(artifact: &RoundArtifact, spot_checks: usize) -> Result<ArtifactCheck> {
    info!(
        "Verifying round artifact: {} secrets, {} leaves",
        artifact.secrets.len(),
        artifact.leaf_hashes.len()
    );

    // 1. 核對秘密與葉子哈希的對應關係
    let mut secrets_consistent = artifact.secrets.len() == artifact.leaf_hashes.len();
    if !secrets_consistent {
        warn!(
            "Secret count {} does not match leaf count {}",
            artifact.secrets.len(),
            artifact.leaf_hashes.len()
        );
    } else {
        for (i, secret) in artifact.secrets.iter().enumerate() {
            if hash_secret(secret).as_str() != artifact.leaf_hashes[i] {
                warn!("✗ Secret {} does not hash to its recorded leaf", i);
                secrets_consistent = false;
            }
        }
    }

    // 2. 重建默克爾樹並核對根
    let leaves = artifact.to_leaves()?;
    let declared_root = artifact.root_digest()?;

    let tree = MerkleTree::build(leaves)?;
    let computed_root = tree.root().clone();
    let root_matches = computed_root == declared_root;

    if root_matches {
        info!("Merkle root matches: {}...", &computed_root.as_str()[..16]);
    } else {
        warn!(
            "MERKLE ROOT MISMATCH!\n  Declared: {}\n  Computed: {}",
            declared_root, computed_root
        );
    }

    // 3. 隨機抽查成員證明
    let leaf_count = tree.leaf_count();
    let total_spot_checks = if leaf_count == 1 {
        1 // 單葉子的投票輪只抽查一次
    } else {
        std::cmp::min(spot_checks, leaf_count)
    };

    let mut passed_spot_checks = 0usize;
    let mut failed_spot_checks = 0usize;

    info!("Spot-checking {} membership proofs", total_spot_checks);

    let mut rng = rand::thread_rng();
    let mut checked_indices = std::collections::HashSet::new();

    for check_num in 0..total_spot_checks {
        // 隨機選擇一個未被抽查過的葉子索引
        let leaf_index = if leaf_count == 1 {
            0
        } else {
            loop {
                let idx = rng.gen_range(0..leaf_count);
                if !checked_indices.contains(&idx) {
                    checked_indices.insert(idx);
                    break idx;
                }
            }
        };

        debug!(
            "Spot check {}/{}: leaf {}",
            check_num + 1,
            total_spot_checks,
            leaf_index
        );

        let proof = match tree.prove(leaf_index) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to generate proof for leaf {}: {}", leaf_index, e);
                failed_spot_checks += 1;
                continue;
            }
        };

        // 針對憑證聲明的根驗證，而非自己重建的根
        if proof.verify(&tree.leaves()[leaf_index], &declared_root) {
            passed_spot_checks += 1;
            debug!("✓ Leaf {} proof verified", leaf_index);
        } else {
            failed_spot_checks += 1;
            warn!("✗ Leaf {} proof FAILED against declared root", leaf_index);
        }
    }

    info!(
        "Artifact check completed: root match={}, secrets consistent={}, spot checks {}/{} passed",
        root_matches, secrets_consistent, passed_spot_checks, total_spot_checks
    );

    Ok(ArtifactCheck {
        leaf_count,
        root_matches,
        secrets_consistent,
        total_spot_checks,
        passed_spot_checks,
        failed_spot_checks,
        computed_root,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::RoundIssuer;
    use tempfile::NamedTempFile;

    fn create_test_artifact() -> RoundArtifact {
        let issuer = RoundIssuer::with_defaults();
        let secrets = vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
            "dave".to_string(),
        ];
        let round = issuer.issue_round_with_secrets(secrets).unwrap();
        RoundArtifact::from_round(&round)
    }

    #[test]
    fn test_artifact_field_mapping() {
        let artifact = create_test_artifact();

        assert_eq!(artifact.secrets.len(), 4);
        assert_eq!(artifact.leaf_hashes.len(), 4);
        for hash in &artifact.leaf_hashes {
            assert_eq!(hash.len(), 64);
        }
        assert_eq!(artifact.leaf_hashes[0], hash_secret("alice").as_str());
        assert_eq!(artifact.merkle_root.len(), 64);
    }

    #[test]
    fn test_export_and_load_json() {
        let artifact = create_test_artifact();

        let temp_file = NamedTempFile::new().unwrap();
        export_json(&artifact, temp_file.path()).unwrap();

        // 檢查線上格式使用約定的字段名
        let raw = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(raw.contains("\"secrets\""));
        assert!(raw.contains("\"leafHashes\""));
        assert!(raw.contains("\"merkleRoot\""));

        let loaded = load_json(temp_file.path()).unwrap();
        assert_eq!(loaded.secrets, artifact.secrets);
        assert_eq!(loaded.leaf_hashes, artifact.leaf_hashes);
        assert_eq!(loaded.merkle_root, artifact.merkle_root);
    }

    #[test]
    fn test_load_json_missing_file() {
        let result = load_json("/nonexistent/round.json");

        match result {
            Err(NodeError::Config(msg)) => assert!(msg.contains("not found")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_json_rejects_missing_field() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"{ "secrets": ["a"], "leafHashes": ["ff"] }"#,
        )
        .unwrap();

        let result = load_json(temp_file.path());
        assert!(matches!(result, Err(NodeError::Serialization(_))));
    }

    #[test]
    fn test_load_json_ignores_unknown_fields() {
        let artifact = create_test_artifact();

        let temp_file = NamedTempFile::new().unwrap();
        let mut value = serde_json::to_value(&artifact).unwrap();
        value["version"] = serde_json::json!(2);
        std::fs::write(temp_file.path(), serde_json::to_string(&value).unwrap()).unwrap();

        let loaded = load_json(temp_file.path()).unwrap();
        assert_eq!(loaded.merkle_root, artifact.merkle_root);
    }

    #[test]
    fn test_to_leaves_rejects_bad_digest() {
        let mut artifact = create_test_artifact();
        artifact.leaf_hashes[1] = "not-a-digest".to_string();

        let result = artifact.to_leaves();
        match result {
            Err(NodeError::InvalidArtifact(msg)) => assert!(msg.contains("leaf 1")),
            other => panic!("Expected InvalidArtifact error, got {:?}", other),
        }
    }

    #[test]
    fn test_verify_artifact_sound() {
        let artifact = create_test_artifact();

        let check = verify_artifact(&artifact, 3).unwrap();
        assert!(check.root_matches);
        assert!(check.secrets_consistent);
        assert_eq!(check.leaf_count, 4);
        assert_eq!(check.total_spot_checks, 3);
        assert_eq!(check.passed_spot_checks, 3);
        assert_eq!(check.failed_spot_checks, 0);
        assert!(check.is_sound());
        assert_eq!(check.computed_root.as_str(), artifact.merkle_root);
    }

    #[test]
    fn test_verify_artifact_caps_spot_checks_at_leaf_count() {
        let artifact = create_test_artifact();

        let check = verify_artifact(&artifact, 100).unwrap();
        assert_eq!(check.total_spot_checks, 4);
        assert_eq!(check.passed_spot_checks, 4);
    }

    #[test]
    fn test_verify_artifact_detects_tampered_root() {
        let mut artifact = create_test_artifact();
        let flipped = if artifact.merkle_root.starts_with('f') { "0" } else { "f" };
        artifact.merkle_root.replace_range(0..1, flipped);

        let check = verify_artifact(&artifact, 4).unwrap();
        assert!(!check.root_matches);
        assert_eq!(check.failed_spot_checks, check.total_spot_checks);
        assert!(!check.is_sound());
    }

    #[test]
    fn test_verify_artifact_detects_tampered_leaf() {
        let mut artifact = create_test_artifact();
        let flipped = if artifact.leaf_hashes[2].starts_with('f') { "0" } else { "f" };
        artifact.leaf_hashes[2].replace_range(0..1, flipped);

        let check = verify_artifact(&artifact, 4).unwrap();
        assert!(!check.root_matches);
        assert!(!check.secrets_consistent);
        assert!(!check.is_sound());
    }

    #[test]
    fn test_verify_artifact_detects_tampered_secret() {
        let mut artifact = create_test_artifact();
        artifact.secrets[0] = "mallory".to_string();

        let check = verify_artifact(&artifact, 4).unwrap();
        assert!(!check.secrets_consistent);
        // 葉子列表本身未被改動，根仍然一致
        assert!(check.root_matches);
        assert!(!check.is_sound());
    }

    #[test]
    fn test_verify_artifact_single_leaf() {
        let issuer = RoundIssuer::with_defaults();
        let round = issuer
            .issue_round_with_secrets(vec!["solo".to_string()])
            .unwrap();
        let artifact = RoundArtifact::from_round(&round);

        let check = verify_artifact(&artifact, 5).unwrap();
        assert_eq!(check.leaf_count, 1);
        assert_eq!(check.total_spot_checks, 1);
        assert!(check.is_sound());
    }
}
