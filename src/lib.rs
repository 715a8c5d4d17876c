#![warn(missing_docs)]

//! # s3-form-upload
//!
//! ## S3 表单直传 SDK
//!
//! 负责构建浏览器直传 S3 的 POST 上传表单。
//! 服务端基于凭证签发带有过期时间的上传策略，
//! 浏览器将文件与策略直接提交给存储服务，字节流不经过应用服务器

mod base;
mod config;
mod form;

pub use base::credential::Credential;
pub use config::{
    build_upload_form_builder_from_config, build_upload_form_builder_from_env,
    is_form_config_enabled, set_form_config, Config, ConfigBuilder, ConfigParseError,
};
pub use form::{RenderError, UploadForm, UploadFormBuilder};
