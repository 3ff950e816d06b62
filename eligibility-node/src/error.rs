//! 資格節點統一錯誤類型定義
//!
//! 本模塊定義了資格節點運行過程中可能遇到的所有錯誤類型，
//! 使用 thiserror crate 提供良好的錯誤鏈和上下文信息。

use thiserror::Error;

/// 資格節點錯誤類型
///
/// 涵蓋所有子系統的錯誤情況：
/// - 默克爾承諾構建與證明
/// - 投票輪憑證文件解析
/// - 配置管理
/// - 文件讀寫
#[derive(Error, Debug)]
pub enum NodeError {
    /// 默克爾承諾錯誤
    ///
    /// 當建樹或生成證明失敗時返回此錯誤
    #[error("Merkle commitment error: {0}")]
    Merkle(String),

    /// 無效的投票輪憑證
    ///
    /// 當憑證文件中的哈希字段格式不正確時返回此錯誤
    /// 這表示文件可能已損壞或被篡改
    #[error("Invalid round artifact: {0}")]
    InvalidArtifact(String),

    /// 配置錯誤
    ///
    /// 當配置文件格式錯誤或缺少必要參數時返回此錯誤
    #[error("Configuration error: {0}")]
    Config(String),

    /// 序列化/反序列化錯誤
    ///
    /// 當投票輪 JSON 序列化失敗時返回此錯誤
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O 錯誤
    ///
    /// 當文件操作失敗時返回此錯誤
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 通用錯誤
    ///
    /// 用於包裝其他未分類的錯誤
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 類型別名
///
/// 使用統一的錯誤類型簡化函數簽名
pub type Result<T> = std::result::Result<T, NodeError>;

/// 從 JSON 錯誤轉換
impl From<serde_json::Error> for NodeError {
    fn from(err: serde_json::Error) -> Self {
        NodeError::Serialization(err.to_string())
    }
}

/// 從默克爾庫錯誤轉換
impl From<merkle_commit::MerkleError> for NodeError {
    fn from(err: merkle_commit::MerkleError) -> Self {
        NodeError::Merkle(err.to_string())
    }
}
