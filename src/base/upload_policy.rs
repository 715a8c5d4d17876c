use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value as JSONValue};

// 字段顺序即序列化顺序，签名覆盖序列化后的字节，不可调整
#[derive(Serialize)]
pub(crate) struct UploadPolicy {
    expiration: String,
    conditions: Vec<JSONValue>,
}

impl UploadPolicy {
    pub(crate) fn new_for_form(
        bucket: &str,
        key_prefix: &str,
        acl: &str,
        redirect_url: &str,
        deadline: SystemTime,
    ) -> Self {
        Self {
            expiration: format_expiration(deadline),
            conditions: vec![
                json!({ "bucket": bucket }),
                json!(["starts-with", "$key", key_prefix]),
                json!({ "acl": acl }),
                json!({ "success_action_redirect": redirect_url }),
            ],
        }
    }

    pub(crate) fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}

// S3 要求秒级精度，毫秒部分固定为 .000
fn format_expiration(deadline: SystemTime) -> String {
    DateTime::<Utc>::from(deadline)
        .format("%Y-%m-%dT%H:%M:%S.000Z")
        .to_string()
}
