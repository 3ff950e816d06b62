//! 配置管理模塊
//!
//! 負責加載和驗證資格節點配置

use crate::error::{NodeError, Result};
use crate::types::EligibilityConfig;
use config::{Config, File};
use std::path::Path;

/// 從配置文件加載資格節點配置
///
/// # 參數
/// - `config_path`: 配置文件路徑（支持 TOML、JSON、YAML）
///
/// # 返回
/// - `Ok(EligibilityConfig)`: 成功加載的配置
/// - `Err(NodeError)`: 配置文件格式錯誤或缺少必要字段
///
/// # 示例
/// ```no_run
/// use eligibility_node::config::load_config;
///
/// let config = load_config("config.toml").expect("Failed to load config");
/// println!("Artifact path: {}", config.artifact_path);
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<EligibilityConfig> {
    let config = Config::builder()
        .add_source(File::from(config_path.as_ref()))
        .build()
        .map_err(|e| NodeError::Config(format!("Failed to load config file: {}", e)))?;

    let eligibility_config: EligibilityConfig = config
        .try_deserialize()
        .map_err(|e| NodeError::Config(format!("Failed to parse config: {}", e)))?;

    validate_config(&eligibility_config)?;

    Ok(eligibility_config)
}

/// 從環境變量加載配置（用於容器化部署）
///
/// 環境變量前綴: `ELIGIBILITY_`
/// 示例: `ELIGIBILITY_NODE_NAME`, `ELIGIBILITY_MAX_SECRET_COUNT`
pub fn load_config_from_env() -> Result<EligibilityConfig> {
    let config = Config::builder()
        .add_source(config::Environment::with_prefix("ELIGIBILITY"))
        .build()
        .map_err(|e| NodeError::Config(format!("Failed to load env vars: {}", e)))?;

    let eligibility_config: EligibilityConfig = config
        .try_deserialize()
        .map_err(|e| NodeError::Config(format!("Failed to parse env config: {}", e)))?;

    validate_config(&eligibility_config)?;

    Ok(eligibility_config)
}

/// 驗證配置的有效性
///
/// 檢查:
/// - 秘密數量範圍是否合理
/// - 默認數量是否落在範圍內
/// - 憑證路徑是否非空
fn validate_config(config: &EligibilityConfig) -> Result<()> {
    // 驗證秘密數量範圍
    if config.min_secret_count == 0 {
        return Err(NodeError::Config(
            "min_secret_count must be greater than 0".to_string(),
        ));
    }

    if config.max_secret_count < config.min_secret_count {
        return Err(NodeError::Config(
            "max_secret_count must be >= min_secret_count".to_string(),
        ));
    }

    if config.default_secret_count < config.min_secret_count
        || config.default_secret_count > config.max_secret_count
    {
        return Err(NodeError::Config(format!(
            "default_secret_count {} outside [{}, {}]",
            config.default_secret_count, config.min_secret_count, config.max_secret_count
        )));
    }

    // 驗證抽查次數
    if config.spot_check_count == 0 {
        return Err(NodeError::Config(
            "spot_check_count must be greater than 0".to_string(),
        ));
    }

    // 驗證憑證路徑
    if config.artifact_path.is_empty() {
        return Err(NodeError::Config(
            "artifact_path must not be empty".to_string(),
        ));
    }

    Ok(())
}
