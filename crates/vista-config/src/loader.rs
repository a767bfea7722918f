use anyhow::{anyhow, Result};
use config::{Config, File, FileFormat};
use std::path::{Path, PathBuf};

use crate::VistaConfig;

/// 配置加载器
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(config_path: P) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// 加载配置
    ///
    /// 配置文件不存在时返回默认配置。
    pub fn load(&self) -> Result<VistaConfig> {
        if !self.config_path.exists() {
            return Ok(VistaConfig::default());
        }

        let config = Config::builder()
            .add_source(File::new(
                self.config_path
                    .to_str()
                    .ok_or_else(|| anyhow!("Invalid config path"))?,
                FileFormat::Toml,
            ))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        let config = self.load()?;

        if config.broker.host.is_empty() {
            return Err(anyhow!("broker.host must not be empty"));
        }

        if config.broker.reconnect_secs == 0 {
            return Err(anyhow!("broker.reconnect_secs must be greater than 0"));
        }

        if config.subscriptions.topics.is_empty() {
            return Err(anyhow!("subscriptions.topics must not be empty"));
        }

        Ok(())
    }
}
