//! 共享數據類型定義
//!
//! 本模塊定義資格節點中各個子系統共享的數據結構

use chrono::{DateTime, Utc};
use merkle_commit::MerkleTree;
use serde::{Deserialize, Serialize};

/// 投票輪
///
/// 發行方在內存中持有的完整投票輪狀態，
/// 包含明文秘密與對應的默克爾樹
#[derive(Debug, Clone)]
pub struct VotingRound {
    /// 參與者秘密（明文，僅發行方可見）
    pub secrets: Vec<String>,

    /// 由秘密哈希構建的默克爾樹
    pub tree: MerkleTree,

    /// 投票輪創建時間
    pub created_at: DateTime<Utc>,
}

/// 投票輪憑證
///
/// 發行方導出的固定格式 JSON 文件，供投票頁面加載。
/// 字段名（`secrets`、`leafHashes`、`merkleRoot`）是與
/// 網頁端投票頁面的互操作契約，不可更改
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundArtifact {
    /// 參與者秘密（演示用；真實部署中不會隨憑證分發）
    pub secrets: Vec<String>,

    /// 葉子哈希列表（與秘密一一對應，順序即葉子索引）
    #[serde(rename = "leafHashes")]
    pub leaf_hashes: Vec<String>,

    /// 默克爾根（十六進制字符串）
    #[serde(rename = "merkleRoot")]
    pub merkle_root: String,
}

/// 配置結構（將在 config.rs 中使用）
///
/// 資格節點運行時配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// 節點名稱（用於日誌標識）
    pub node_name: String,

    /// 默認發行的秘密數量
    pub default_secret_count: usize,

    /// 單輪最少秘密數量
    pub min_secret_count: usize,

    /// 單輪最多秘密數量
    pub max_secret_count: usize,

    /// 檢驗憑證時的抽查證明次數
    pub spot_check_count: usize,

    /// 投票輪憑證默認輸出路徑
    pub artifact_path: String,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            node_name: std::env::var("NODE_NAME")
                .unwrap_or_else(|_| "eligibility-node".to_string()),
            default_secret_count: std::env::var("DEFAULT_SECRET_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            min_secret_count: std::env::var("MIN_SECRET_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
            max_secret_count: std::env::var("MAX_SECRET_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            spot_check_count: std::env::var("SPOT_CHECK_COUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3),
            artifact_path: std::env::var("ARTIFACT_PATH")
                .unwrap_or_else(|_| "./voting-round.json".to_string()),
        }
    }
}
