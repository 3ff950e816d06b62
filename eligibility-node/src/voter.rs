//! 投票資格證明模塊
//!
//! 本模塊實現投票者一側的流程：從公開分發的葉子哈希列表
//! 與發布的默克爾根出發，憑秘密生成並驗證資格證明。
//!
//! # 匿名性
//!
//! 投票者只需出示「某個葉子在承諾中」的成員證明，
//! 無需出示自己是哪位參與者。證明綁定葉子索引，
//! 不能轉移給其他索引使用。
//!
//! 注意：當同一個秘密被發行多次時，定位永遠返回第一個
//! 匹配的索引，後續重複葉子無法被單獨證明。

use crate::error::Result;
use crate::types::RoundArtifact;
use merkle_commit::{hash_secret, locate_leaf, prove_membership, Digest, MerkleProof};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 投票嘗試結果
///
/// 包含單次資格證明嘗試的所有中間產物
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteAttempt {
    /// 秘密的 SHA-256 葉子哈希
    pub secret_hash: Digest,

    /// 定位到的葉子索引（秘密不在名單中時為空）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub leaf_index: Option<usize>,

    /// 生成的成員證明（秘密不在名單中時為空）
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proof: Option<MerkleProof>,

    /// 最終裁定
    pub outcome: VoteOutcome,
}

impl VoteAttempt {
    /// 本次嘗試是否通過資格驗證
    pub fn is_verified(&self) -> bool {
        self.outcome == VoteOutcome::Verified
    }
}

/// 投票裁定枚舉
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteOutcome {
    /// 秘密在名單中且證明通向發布的根
    Verified,
    /// 證明生成成功但與發布的根不符（名單或根被篡改）
    RootMismatch,
    /// 秘密的哈希不在葉子列表中
    NotEligible,
}

/// 資格證明器
///
/// 持有投票者可見的公開數據：葉子哈希列表與發布的根。
/// 明文秘密只在單次 [`attempt_vote`](EligibilityProver::attempt_vote)
/// 調用中經過，不會被保存
pub struct EligibilityProver {
    /// 公開分發的葉子哈希列表
    leaves: Vec<Digest>,

    /// 發行方發布的默克爾根
    published_root: Digest,
}

impl EligibilityProver {
    /// 創建新的證明器
    ///
    /// # 參數
    /// - `leaves`: 公開分發的葉子哈希列表（順序即索引）
    /// - `published_root`: 發行方發布的默克爾根
    pub fn new(leaves: Vec<Digest>, published_root: Digest) -> Self {
        info!(
            "Created EligibilityProver with {} leaves, root: {}...",
            leaves.len(),
            &published_root.as_str()[..16]
        );

        Self {
            leaves,
            published_root,
        }
    }

    /// 從投票輪憑證創建證明器
    ///
    /// # 返回
    /// - `Ok(EligibilityProver)`: 憑證中的哈希字段全部合法
    /// - `Err(NodeError)`: 某個葉子或根不是合法摘要
    pub fn from_artifact(artifact: &RoundArtifact) -> Result<Self> {
        let leaves = artifact.to_leaves()?;
        let published_root = artifact.root_digest()?;

        Ok(Self::new(leaves, published_root))
    }

    /// 葉子數量
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// 發布的默克爾根
    pub fn published_root(&self) -> &Digest {
        &self.published_root
    }

    /// 嘗試證明投票資格
    ///
    /// 執行完整的證明流程：
    /// 1. 對秘密計算 SHA-256 葉子哈希
    /// 2. 在葉子列表中定位對應索引
    /// 3. 由葉子列表重新計算成員證明
    /// 4. 將證明對發布的根驗證
    ///
    /// # 參數
    /// - `secret`: 參與者持有的明文秘密
    ///
    /// # 返回
    /// - `Ok(VoteAttempt)`: 嘗試完成，`outcome` 指示裁定；
    ///   秘密不在名單中是正常裁定而非錯誤
    ///
    /// # 示例
    /// ```
    /// use eligibility_node::issuer::RoundIssuer;
    /// use eligibility_node::types::RoundArtifact;
    /// use eligibility_node::voter::EligibilityProver;
    ///
    /// let issuer = RoundIssuer::with_defaults();
    /// let round = issuer
    ///     .issue_round_with_secrets(vec!["alice".to_string(), "bob".to_string()])
    ///     .unwrap();
    /// let artifact = RoundArtifact::from_round(&round);
    ///
    /// let prover = EligibilityProver::from_artifact(&artifact).unwrap();
    /// let attempt = prover.attempt_vote("bob").unwrap();
    /// assert!(attempt.is_verified());
    /// ```
    pub fn attempt_vote(&self, secret: &str) -> Result<VoteAttempt> {
        // 1. 計算葉子哈希（不記錄明文秘密）
        let secret_hash = hash_secret(secret);
        debug!("Secret hashes to {}...", &secret_hash.as_str()[..16]);

        // 2. 在公開葉子列表中定位
        let leaf_index = match locate_leaf(&self.leaves, &secret_hash) {
            Some(index) => index,
            None => {
                warn!("Secret hash not present in leaf list, not eligible");
                return Ok(VoteAttempt {
                    secret_hash,
                    leaf_index: None,
                    proof: None,
                    outcome: VoteOutcome::NotEligible,
                });
            }
        };

        debug!("Located secret at leaf index {}", leaf_index);

        // 3. 由葉子列表重新計算成員證明
        let proof = prove_membership(&self.leaves, leaf_index)?;
        debug!("Generated membership proof with {} siblings", proof.depth());

        // 4. 對發布的根驗證
        let outcome = if proof.verify(&secret_hash, &self.published_root) {
            info!("✓ Eligibility verified for leaf {}", leaf_index);
            VoteOutcome::Verified
        } else {
            warn!(
                "✗ Proof for leaf {} does not reach published root {}...",
                leaf_index,
                &self.published_root.as_str()[..16]
            );
            VoteOutcome::RootMismatch
        };

        Ok(VoteAttempt {
            secret_hash,
            leaf_index: Some(leaf_index),
            proof: Some(proof),
            outcome,
        })
    }
}
