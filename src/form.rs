use super::base::{
    credential::Credential,
    upload_policy::UploadPolicy,
    upload_signature::{encode_upload_policy, sign_encoded_policy},
};
use std::{
    env,
    time::{Duration, SystemTime},
};
use thiserror::Error;

const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
const BUCKET_ENV: &str = "AWS_S3_BUCKET";

const DEFAULT_ACL: &str = "private";
const DEFAULT_INNER_CONTENT: &str = "<input name=\"file\" type=\"file\">\
<input type=\"submit\" value=\"Upload File\" class=\"btn btn-primary\">";

const POLICY_LIFETIME: Duration = Duration::from_secs(10 * 60 * 60);

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// 表单渲染错误
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderError {
    /// 渲染完整表单所需的属性未被指定
    #[error("{0} has not been specified.")]
    MissingRequiredAttribute(&'static str),
}

/// 上传表单构建器
pub struct UploadFormBuilder {
    object_key: String,
    redirect_url: String,
    access_key: Option<String>,
    secret_key: Option<String>,
    bucket: Option<String>,
    acl: Option<String>,
    starts_with: Option<String>,
    extra_form_attributes: Option<String>,
    inner_content: Option<String>,
    env_lookup: Option<EnvLookup>,
}

impl UploadFormBuilder {
    /// 创建上传表单构建器
    /// # Arguments
    ///
    /// * `object_key` - 上传对象名称，最后一段可以是由浏览器端替换的占位符
    /// * `redirect_url` - 上传成功后存储服务跳转回的 URL
    #[inline]
    pub fn new(object_key: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        Self {
            object_key: object_key.into(),
            redirect_url: redirect_url.into(),
            access_key: None,
            secret_key: None,
            bucket: None,
            acl: None,
            starts_with: None,
            extra_form_attributes: None,
            inner_content: None,
            env_lookup: None,
        }
    }

    /// 设置 Access Key，不设置时从环境变量回填
    #[inline]
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// 设置 Secret Key，不设置时从环境变量回填
    #[inline]
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// 设置存储空间，不设置时从环境变量回填
    #[inline]
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// 设置上传对象的访问控制，默认为 private
    #[inline]
    pub fn acl(mut self, acl: impl Into<String>) -> Self {
        self.acl = Some(acl.into());
        self
    }

    /// 覆盖 starts-with 条件的前缀，默认从对象名称推导
    #[inline]
    pub fn starts_with(mut self, starts_with: impl Into<String>) -> Self {
        self.starts_with = Some(starts_with.into());
        self
    }

    /// 设置附加在 form 起始标签上的额外属性片段
    ///
    /// 片段按原样插入，需要以空格开头
    #[inline]
    pub fn extra_form_attributes(mut self, extra_form_attributes: impl Into<String>) -> Self {
        self.extra_form_attributes = Some(extra_form_attributes.into());
        self
    }

    /// 设置隐藏字段与表单结束标签之间的内容
    #[inline]
    pub fn inner_content(mut self, inner_content: impl Into<String>) -> Self {
        self.inner_content = Some(inner_content.into());
        self
    }

    /// 通过回调生成表单内部内容，回调立即执行一次
    #[inline]
    pub fn inner_content_with(mut self, supplier: impl FnOnce() -> String) -> Self {
        self.inner_content = Some(supplier());
        self
    }

    /// 设置环境变量查询回调，默认读取进程环境变量
    #[inline]
    pub fn env_lookup(mut self, lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        self.env_lookup = Some(Box::new(lookup));
        self
    }

    /// 构建上传表单
    ///
    /// 未指定的身份字段在此时统一回填一次，之后不再读取环境变量
    pub fn build(self) -> UploadForm {
        let lookup = self
            .env_lookup
            .unwrap_or_else(|| Box::new(|name| env::var(name).ok()));
        UploadForm {
            object_key: self.object_key,
            redirect_url: self.redirect_url,
            access_key: self.access_key.or_else(|| lookup(ACCESS_KEY_ENV)),
            secret_key: self.secret_key.or_else(|| lookup(SECRET_KEY_ENV)),
            bucket: self.bucket.or_else(|| lookup(BUCKET_ENV)),
            acl: self.acl.unwrap_or_else(|| DEFAULT_ACL.to_owned()),
            starts_with: self.starts_with,
            extra_form_attributes: self.extra_form_attributes,
            inner_content: self
                .inner_content
                .unwrap_or_else(|| DEFAULT_INNER_CONTENT.to_owned()),
        }
    }
}

/// 浏览器直传 S3 的 POST 上传表单
///
/// 渲染输出为一段完整的 `<form>` HTML，可直接嵌入页面。
/// 字段值按原样插入，不做任何 HTML 转义，
/// 可能包含不可信内容的字段值须由调用方预先清理
pub struct UploadForm {
    object_key: String,
    redirect_url: String,
    access_key: Option<String>,
    secret_key: Option<String>,
    bucket: Option<String>,
    acl: String,
    starts_with: Option<String>,
    extra_form_attributes: Option<String>,
    inner_content: String,
}

impl UploadForm {
    /// 创建上传表单构建器
    /// # Arguments
    ///
    /// * `object_key` - 上传对象名称
    /// * `redirect_url` - 上传成功后存储服务跳转回的 URL
    #[inline]
    pub fn builder(
        object_key: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> UploadFormBuilder {
        UploadFormBuilder::new(object_key, redirect_url)
    }

    /// 获取上传对象名称
    #[inline]
    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    /// 设置上传对象名称
    #[inline]
    pub fn set_object_key(&mut self, object_key: impl Into<String>) -> &mut Self {
        self.object_key = object_key.into();
        self
    }

    /// 获取跳转 URL
    #[inline]
    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    /// 设置跳转 URL
    #[inline]
    pub fn set_redirect_url(&mut self, redirect_url: impl Into<String>) -> &mut Self {
        self.redirect_url = redirect_url.into();
        self
    }

    /// 获取 Access Key
    #[inline]
    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    /// 设置 Access Key
    #[inline]
    pub fn set_access_key(&mut self, access_key: impl Into<String>) -> &mut Self {
        self.access_key = Some(access_key.into());
        self
    }

    /// 获取 Secret Key
    #[inline]
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    /// 设置 Secret Key
    #[inline]
    pub fn set_secret_key(&mut self, secret_key: impl Into<String>) -> &mut Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// 获取存储空间
    #[inline]
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// 设置存储空间
    #[inline]
    pub fn set_bucket(&mut self, bucket: impl Into<String>) -> &mut Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// 获取上传对象的访问控制
    #[inline]
    pub fn acl(&self) -> &str {
        &self.acl
    }

    /// 设置上传对象的访问控制
    #[inline]
    pub fn set_acl(&mut self, acl: impl Into<String>) -> &mut Self {
        self.acl = acl.into();
        self
    }

    /// 获取 starts-with 条件的前缀
    ///
    /// 默认为对象名称最后一个 `/` 之前的部分，可被显式覆盖。
    /// 浏览器端只替换最后一段文件名时前缀匹配依然成立
    #[inline]
    pub fn starts_with(&self) -> &str {
        self.starts_with
            .as_deref()
            .unwrap_or_else(|| starts_with_prefix(&self.object_key))
    }

    /// 覆盖 starts-with 条件的前缀
    #[inline]
    pub fn set_starts_with(&mut self, starts_with: impl Into<String>) -> &mut Self {
        self.starts_with = Some(starts_with.into());
        self
    }

    /// 获取 form 起始标签上的额外属性片段
    #[inline]
    pub fn extra_form_attributes(&self) -> Option<&str> {
        self.extra_form_attributes.as_deref()
    }

    /// 设置 form 起始标签上的额外属性片段
    #[inline]
    pub fn set_extra_form_attributes(
        &mut self,
        extra_form_attributes: impl Into<String>,
    ) -> &mut Self {
        self.extra_form_attributes = Some(extra_form_attributes.into());
        self
    }

    /// 获取表单内部内容
    #[inline]
    pub fn inner_content(&self) -> &str {
        &self.inner_content
    }

    /// 设置表单内部内容
    #[inline]
    pub fn set_inner_content(&mut self, inner_content: impl Into<String>) -> &mut Self {
        self.inner_content = inner_content.into();
        self
    }

    /// 生成 base64 编码后的上传策略
    ///
    /// 过期时间为当前时间加 10 小时，每次调用基于当前时钟重新计算，不做缓存
    pub fn policy(&self) -> String {
        encode_upload_policy(&self.policy_document(SystemTime::now() + POLICY_LIFETIME))
    }

    /// 生成上传策略的 HMAC-SHA1 签名
    ///
    /// 签名覆盖 base64 编码后的策略字符串，与策略同样每次调用重新计算
    pub fn signature(&self) -> String {
        let credential = Credential::new(
            self.access_key.as_deref().unwrap_or_default(),
            self.secret_key.as_deref().unwrap_or_default(),
        );
        sign_encoded_policy(&credential, &self.policy())
    }

    pub(crate) fn policy_document(&self, deadline: SystemTime) -> UploadPolicy {
        UploadPolicy::new_for_form(
            self.bucket.as_deref().unwrap_or_default(),
            self.starts_with(),
            &self.acl,
            &self.redirect_url,
            deadline,
        )
    }

    /// 生成单个隐藏字段的 HTML 片段，字段值不做转义
    #[inline]
    pub fn hidden_field(name: impl AsRef<str>, value: impl AsRef<str>) -> String {
        format!(
            "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
            name.as_ref(),
            value.as_ref()
        )
    }

    /// 按固定顺序生成全部六个隐藏字段
    ///
    /// 依次为 key、AWSAccessKeyId、acl、success_action_redirect、policy、signature。
    /// Secret Key 不会出现在任何隐藏字段中
    pub fn hidden_fields(&self) -> Vec<String> {
        vec![
            Self::hidden_field("key", &self.object_key),
            Self::hidden_field(
                "AWSAccessKeyId",
                self.access_key.as_deref().unwrap_or_default(),
            ),
            Self::hidden_field("acl", &self.acl),
            Self::hidden_field("success_action_redirect", &self.redirect_url),
            Self::hidden_field("policy", self.policy()),
            Self::hidden_field("signature", self.signature()),
        ]
    }

    /// 生成表单起始标签
    pub fn header(&self) -> String {
        format!(
            "<form action=\"https://{}.s3.amazonaws.com/\" method=\"post\" \
             enctype=\"multipart/form-data\"{}>",
            self.bucket.as_deref().unwrap_or_default(),
            self.extra_form_attributes.as_deref().unwrap_or_default(),
        )
    }

    /// 生成表单结束标签
    #[inline]
    pub fn footer(&self) -> String {
        "</form>".to_owned()
    }

    /// 渲染完整表单 HTML
    ///
    /// 渲染前检查必填属性，缺失时返回 [`RenderError::MissingRequiredAttribute`]
    pub fn to_html(&self) -> Result<String, RenderError> {
        self.validate_required()?;
        let mut content = self.header();
        for field in self.hidden_fields() {
            content.push_str(&field);
        }
        content.push_str(&self.inner_content);
        content.push_str(&self.footer());
        Ok(content)
    }

    // 只区分未设置与已设置，显式的空字符串视为已设置
    fn validate_required(&self) -> Result<(), RenderError> {
        for (attr, value) in [
            ("bucket", self.bucket.as_deref()),
            ("secret_key", self.secret_key.as_deref()),
            ("key", Some(self.object_key.as_str())),
            ("access_key", self.access_key.as_deref()),
            ("acl", Some(self.acl.as_str())),
            ("redirect_url", Some(self.redirect_url.as_str())),
        ] {
            if value.is_none() {
                return Err(RenderError::MissingRequiredAttribute(attr));
            }
        }
        Ok(())
    }
}

// 对象名称的目录部分，即最后一个 `/` 之前的子串，没有 `/` 时为空
fn starts_with_prefix(object_key: &str) -> &str {
    object_key
        .rsplit_once('/')
        .map(|(prefix, _)| prefix)
        .unwrap_or("")
}
