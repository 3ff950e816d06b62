//! 匿名投票資格承諾節點
//!
//! 本 crate 實現了一個完整的資格發行與證明節點，負責:
//! 1. 為每輪投票鑄造參與者秘密
//! 2. 以默克爾樹對參與者集合做出承諾
//! 3. 導出投票頁面使用的固定格式 JSON 憑證
//! 4. 憑秘密生成並驗證匿名資格證明
//!
//! # 架構
//!
//! ```text
//! ┌─────────────┐      ┌───────────────────┐
//! │ RoundIssuer │      │ EligibilityProver │
//! └──────┬──────┘      └─────────┬─────────┘
//!        │                       │
//!        ├──────────┬────────────┤
//!        ▼          ▼            ▼
//!    Artifact    Config    merkle-commit
//! ```
//!
//! # 示例用法
//!
//! ```
//! use eligibility_node::issuer::RoundIssuer;
//! use eligibility_node::types::RoundArtifact;
//! use eligibility_node::voter::EligibilityProver;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 發行方：鑄造秘密並做出承諾
//!     let issuer = RoundIssuer::with_defaults();
//!     let round = issuer.issue_round(5)?;
//!     let artifact = RoundArtifact::from_round(&round);
//!
//!     // 投票者：憑秘密證明資格
//!     let prover = EligibilityProver::from_artifact(&artifact)?;
//!     let attempt = prover.attempt_vote(&round.secrets[2])?;
//!     assert!(attempt.is_verified());
//!
//!     Ok(())
//! }
//! ```

// 公開模塊
pub mod artifact; // 憑證導出/加載/檢驗
pub mod config;
pub mod error;
pub mod issuer;
pub mod types;
pub mod voter; // 投票者一側的資格證明

// Re-export 常用類型
pub use error::{NodeError, Result};
pub use issuer::RoundIssuer;
pub use types::{EligibilityConfig, RoundArtifact, VotingRound};
pub use voter::{EligibilityProver, VoteAttempt, VoteOutcome};
