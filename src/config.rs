// src/config.rs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 地址规范化配置（只读）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressNormalizationConfig {
    /// 默认地区（如 "Пензенская обл."），地址中没有地区分段时补上
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_region: Option<String>,
}

impl AddressNormalizationConfig {
    pub fn with_default_region(region: impl Into<String>) -> Self {
        Self {
            default_region: Some(region.into()),
        }
    }

    /// 默认地区，空白视为未设置
    pub fn default_region(&self) -> Option<&str> {
        self.default_region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法获取配置目录"))?;
        let app_dir = config_dir.join("AddressNormalizer");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("config.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// 从指定路径加载，文件不存在时使用默认配置
    pub fn load_from(path: &Path) -> Result<Self> {
        tracing::info!("尝试从以下路径加载配置: {:?}", path);

        if !path.exists() {
            tracing::warn!("配置文件不存在，使用默认配置: {:?}", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("配置文件格式错误 {:?}: {}", path, e))?;

        if config.default_region.is_some() && config.default_region().is_none() {
            tracing::warn!("default_region 为空白，已忽略");
            config.default_region = None;
        }

        tracing::info!("配置加载成功: default_region={:?}", config.default_region);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AddressNormalizationConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, AddressNormalizationConfig::default());
    }

    #[test]
    fn test_load_default_region() {
        let file = write_config(r#"{"default_region": "Пензенская обл."}"#);
        let config = AddressNormalizationConfig::load_from(file.path()).unwrap();
        assert_eq!(config.default_region(), Some("Пензенская обл."));
    }

    #[test]
    fn test_load_empty_object() {
        let file = write_config("{}");
        let config = AddressNormalizationConfig::load_from(file.path()).unwrap();
        assert_eq!(config.default_region, None);
    }

    #[test]
    fn test_blank_region_ignored() {
        let file = write_config(r#"{"default_region": "   "}"#);
        let config = AddressNormalizationConfig::load_from(file.path()).unwrap();
        assert_eq!(config.default_region, None);

        let config = AddressNormalizationConfig::with_default_region("");
        assert_eq!(config.default_region(), None);
    }

    #[test]
    fn test_malformed_json() {
        let file = write_config("{ default_region: ");
        assert!(AddressNormalizationConfig::load_from(file.path()).is_err());
    }
}
