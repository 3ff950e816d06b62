//! 投票輪發行模塊
//!
//! 本模塊實現資格發行方的核心流程：鑄造參與者秘密、
//! 計算葉子哈希並構建默克爾承諾。
//!
//! # 發行策略
//!
//! 每個參與者秘密是一個隨機 UUID v4 字符串。秘密列表的順序
//! 決定葉子索引，發行過程不排序、不去重：
//!
//! 1. **秘密**（發行方持有）: 參與者憑此生成資格證明
//! 2. **葉子哈希**（公開分發）: 秘密的 SHA-256 十六進制摘要
//! 3. **默克爾根**（公開發布）: 整輪參與者集合的唯一承諾

use crate::error::{NodeError, Result};
use crate::types::{EligibilityConfig, VotingRound};
use chrono::Utc;
use merkle_commit::{hash_secret, Digest, MerkleTree};
use tracing::{debug, info};
use uuid::Uuid;

/// 投票輪發行方
///
/// 負責鑄造秘密並產生帶默克爾承諾的投票輪
pub struct RoundIssuer {
    /// 節點配置
    config: EligibilityConfig,
}

impl RoundIssuer {
    /// 創建新的發行方
    ///
    /// # 參數
    /// - `config`: 節點配置（限定單輪秘密數量範圍）
    ///
    /// # 示例
    /// ```
    /// use eligibility_node::issuer::RoundIssuer;
    /// use eligibility_node::types::EligibilityConfig;
    ///
    /// let issuer = RoundIssuer::new(EligibilityConfig::default());
    /// let round = issuer.issue_round(5).unwrap();
    /// assert_eq!(round.secrets.len(), 5);
    /// ```
    pub fn new(config: EligibilityConfig) -> Self {
        info!(
            "Created RoundIssuer (secret range: {}..={})",
            config.min_secret_count, config.max_secret_count
        );

        Self { config }
    }

    /// 創建使用默認配置的發行方
    pub fn with_defaults() -> Self {
        Self::new(EligibilityConfig::default())
    }

    /// 發行一個新的投票輪
    ///
    /// 執行完整的發行流程：
    /// 1. 鑄造 `count` 個隨機秘密（UUID v4）
    /// 2. 對每個秘密計算 SHA-256 葉子哈希
    /// 3. 構建默克爾樹並取得承諾根
    ///
    /// # 參數
    /// - `count`: 本輪參與者數量
    ///
    /// # 返回
    /// - `Ok(VotingRound)`: 發行成功的投票輪
    /// - `Err(NodeError)`: 數量超出配置範圍
    pub fn issue_round(&self, count: usize) -> Result<VotingRound> {
        if count < self.config.min_secret_count || count > self.config.max_secret_count {
            return Err(NodeError::Config(format!(
                "secret count {} outside allowed range [{}, {}]",
                count, self.config.min_secret_count, self.config.max_secret_count
            )));
        }

        info!("Issuing voting round with {} secrets", count);

        // 1. 鑄造隨機秘密
        let secrets: Vec<String> = (0..count).map(|_| Uuid::new_v4().to_string()).collect();

        self.issue_round_with_secrets(secrets)
    }

    /// 使用給定的秘密列表發行投票輪
    ///
    /// 秘密順序即葉子索引順序，重複的秘密不會被去重。
    /// 主要用於測試和從既有名單重建承諾
    pub fn issue_round_with_secrets(&self, secrets: Vec<String>) -> Result<VotingRound> {
        // 2. 計算葉子哈希（與秘密一一對應）
        let leaves: Vec<Digest> = secrets.iter().map(|s| hash_secret(s)).collect();
        debug!("Hashed {} secrets into leaf digests", leaves.len());

        // 3. 構建默克爾樹
        let tree = MerkleTree::build(leaves)?;

        info!(
            "Voting round issued: {} participants, {} levels, root: {}...",
            secrets.len(),
            tree.level_count(),
            &tree.root().as_str()[..16]
        );

        Ok(VotingRound {
            secrets,
            tree,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_round_generates_unique_secrets() {
        let issuer = RoundIssuer::with_defaults();
        let round = issuer.issue_round(10).unwrap();

        assert_eq!(round.secrets.len(), 10);

        let distinct: std::collections::HashSet<_> = round.secrets.iter().collect();
        assert_eq!(distinct.len(), 10);

        for secret in &round.secrets {
            assert!(Uuid::parse_str(secret).is_ok());
        }
    }

    #[test]
    fn test_issued_leaves_match_secret_hashes() {
        let issuer = RoundIssuer::with_defaults();
        let round = issuer.issue_round(6).unwrap();

        assert_eq!(round.tree.leaf_count(), 6);
        for (i, secret) in round.secrets.iter().enumerate() {
            assert_eq!(round.tree.leaves()[i], hash_secret(secret));
        }
    }

    #[test]
    fn test_issue_round_respects_bounds() {
        let issuer = RoundIssuer::with_defaults();

        let too_few = issuer.issue_round(0);
        assert!(matches!(too_few, Err(NodeError::Config(_))));

        let too_many = issuer.issue_round(101);
        assert!(matches!(too_many, Err(NodeError::Config(_))));
    }

    #[test]
    fn test_fixed_secrets_reproduce_known_root() {
        let issuer = RoundIssuer::with_defaults();
        let secrets = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let round = issuer.issue_round_with_secrets(secrets).unwrap();

        assert_eq!(round.tree.level_count(), 3);
        assert_eq!(
            round.tree.root().as_str(),
            "0bdf27bf7ec894ca7cadfe491ec1a3ece840f117989e8c5e9bd7086467bf6c38"
        );
    }

    #[test]
    fn test_duplicate_secrets_preserved() {
        let issuer = RoundIssuer::with_defaults();
        let secrets = vec!["x".to_string(), "x".to_string(), "y".to_string()];
        let round = issuer.issue_round_with_secrets(secrets).unwrap();

        assert_eq!(round.tree.leaf_count(), 3);
        assert_eq!(round.tree.leaves()[0], round.tree.leaves()[1]);
    }

    #[test]
    fn test_empty_secret_list_rejected() {
        let issuer = RoundIssuer::with_defaults();
        let result = issuer.issue_round_with_secrets(Vec::new());
        assert!(matches!(result, Err(NodeError::Merkle(_))));
    }
}
