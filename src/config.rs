use super::form::UploadFormBuilder;
use log::{error, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, sync::RwLock};
use tap::prelude::*;
use thiserror::Error;

const CONFIG_ENV: &str = "S3_FORM_UPLOAD";

/// 表单默认配置信息
///
/// 构建上传表单时未显式指定的身份字段可以由该配置统一提供
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Debug, Default)]
pub struct Config {
    #[serde(alias = "ak")]
    access_key: String,
    #[serde(alias = "sk")]
    secret_key: String,

    bucket: String,

    acl: Option<String>,
}

impl Config {
    /// 创建表单默认配置构建器
    pub fn builder(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> ConfigBuilder {
        ConfigBuilder::new(access_key, secret_key, bucket)
    }

    pub(crate) fn parse(path: &Path, bytes: &[u8]) -> Result<Self, ConfigParseError> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => toml::from_slice(bytes).map_err(|err| err.into()),
            Some("json") => serde_json::from_slice(bytes).map_err(|err| err.into()),
            _ => panic!("S3_FORM_UPLOAD env can only support to be given .toml or .json file"),
        }
    }

    /// 获取 Access Key
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// 设置 Access Key
    #[inline]
    pub fn set_access_key(&mut self, access_key: impl Into<String>) -> &mut Self {
        self.access_key = access_key.into();
        self
    }

    /// 获取 Secret Key
    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// 设置 Secret Key
    #[inline]
    pub fn set_secret_key(&mut self, secret_key: impl Into<String>) -> &mut Self {
        self.secret_key = secret_key.into();
        self
    }

    /// 获取存储空间
    #[inline]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// 设置存储空间
    #[inline]
    pub fn set_bucket(&mut self, bucket: impl Into<String>) -> &mut Self {
        self.bucket = bucket.into();
        self
    }

    /// 获取上传对象的访问控制
    #[inline]
    pub fn acl(&self) -> Option<&str> {
        self.acl.as_deref()
    }

    /// 设置上传对象的访问控制
    #[inline]
    pub fn set_acl(&mut self, acl: Option<impl Into<String>>) -> &mut Self {
        self.acl = acl.map(|acl| acl.into());
        self
    }
}

/// 表单默认配置构建器
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// 创建表单默认配置构建器
    /// # Arguments
    ///
    /// * `access_key` - Access Key
    /// * `secret_key` - Secret Key
    /// * `bucket` - 存储空间
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            config: Config {
                access_key: access_key.into(),
                secret_key: secret_key.into(),
                bucket: bucket.into(),
                acl: None,
            },
        }
    }

    /// 设置上传对象的访问控制
    #[inline]
    pub fn acl(mut self, acl: impl Into<String>) -> Self {
        self.config.acl = Some(acl.into());
        self
    }

    /// 构建表单默认配置
    #[inline]
    pub fn build(self) -> Config {
        self.config
    }
}

/// 表单默认配置解析错误
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigParseError {
    /// 配置信息 JSON 解析错误
    #[error("Parse config as json error: {0}")]
    JSONError(#[from] serde_json::Error),

    /// 配置信息 TOML 解析错误
    #[error("Parse config as toml error: {0}")]
    TOMLError(#[from] toml::de::Error),
}

static FORM_CONFIG: Lazy<RwLock<Option<Config>>> = Lazy::new(|| RwLock::new(load_config()));

fn load_config() -> Option<Config> {
    env::var_os(CONFIG_ENV)
        .tap_none(|| warn!("S3_FORM_UPLOAD Env IS NOT ENABLED"))
        .and_then(|config_path| {
            fs::read(&config_path)
                .tap_err(|err| {
                    error!(
                        "S3 form upload config file ({:?}) cannot be open: {}",
                        config_path, err
                    )
                })
                .ok()
                .and_then(|bytes| {
                    Config::parse(Path::new(&config_path), &bytes)
                        .tap_err(|err| {
                            error!(
                                "S3 form upload config file ({:?}) cannot be deserialized: {}",
                                config_path, err
                            )
                        })
                        .ok()
                })
        })
}

/// 判断当前是否已经加载表单默认配置
#[inline]
pub fn is_form_config_enabled() -> bool {
    FORM_CONFIG.read().unwrap().is_some()
}

/// 手动设置表单默认配置
#[inline]
pub fn set_form_config(config: Config) {
    *FORM_CONFIG.write().unwrap() = Some(config);
}

/// 基于指定表单默认配置创建上传表单构建器
pub fn build_upload_form_builder_from_config(
    object_key: impl Into<String>,
    redirect_url: impl Into<String>,
    config: &Config,
) -> UploadFormBuilder {
    let mut builder = UploadFormBuilder::new(object_key, redirect_url)
        .access_key(config.access_key())
        .secret_key(config.secret_key())
        .bucket(config.bucket());
    if let Some(acl) = config.acl() {
        builder = builder.acl(acl);
    }
    builder
}

/// 基于已加载的表单默认配置创建上传表单构建器
///
/// 尚未加载任何配置时返回 None
pub fn build_upload_form_builder_from_env(
    object_key: impl Into<String>,
    redirect_url: impl Into<String>,
) -> Option<UploadFormBuilder> {
    FORM_CONFIG
        .read()
        .unwrap()
        .as_ref()
        .map(|config| build_upload_form_builder_from_config(object_key, redirect_url, config))
}
