//! 配置文件加载
//!
//! 优先级：命令行参数 > 配置文件 > 默认值

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use route53_client::{Credential, DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use serde::Deserialize;

/// 配置文件内容（`config.toml`）
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub endpoint: Option<String>,
    pub api_version: Option<String>,
    pub credentials: Option<CredentialsSection>,
}

/// `[credentials]` 表
#[derive(Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CredentialsSection {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for CredentialsSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsSection")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl From<CredentialsSection> for Credential {
    fn from(section: CredentialsSection) -> Self {
        let credential = Self::new(section.access_key_id, section.secret_access_key);
        match section.session_token {
            Some(token) => credential.with_session_token(token),
            None => credential,
        }
    }
}

impl ConfigFile {
    /// `<config_dir>/route53/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("route53").join("config.toml"))
    }

    /// 加载配置
    ///
    /// 显式指定的路径必须存在；默认路径不存在时返回空配置。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::read(&path),
            _ => Ok(Self::default()),
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

/// 合并后的运行设置
#[derive(Debug)]
pub struct Settings {
    pub endpoint: String,
    pub api_version: String,
    /// 配置文件中的固定凭证；为空时走默认凭证链
    pub credential: Option<Credential>,
}

impl Settings {
    pub fn resolve(
        file: ConfigFile,
        endpoint: Option<String>,
        api_version: Option<String>,
    ) -> Self {
        Self {
            endpoint: endpoint
                .or(file.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_version: api_version
                .or(file.api_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            credential: file.credentials.map(Credential::from),
        }
    }
}
