use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::base64;

/// 表单上传凭证
///
/// 存储空间所在账户的 Access Key 与 Secret Key
pub struct Credential {
    access_key: String,
    secret_key: String,
}

impl Credential {
    /// 创建表单上传凭证
    #[inline]
    pub fn new(ak: impl Into<String>, sk: impl Into<String>) -> Credential {
        Credential {
            access_key: ak.into(),
            secret_key: sk.into(),
        }
    }

    /// 获取 Access Key
    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// 使用 Secret Key 对数据计算 HMAC-SHA1 签名
    ///
    /// 返回 base64 编码后的摘要，不含换行
    pub fn sign(&self, data: &[u8]) -> String {
        let mut hmac = Hmac::<Sha1>::new_from_slice(self.secret_key.as_bytes()).unwrap();
        hmac.update(data);
        base64::standard(&hmac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{boxed::Box, error::Error, result::Result, sync::Arc, thread};

    #[test]
    fn test_sign() -> Result<(), Box<dyn Error>> {
        let credential = Arc::new(Credential::new("test_access_key", "test_secret_key"));
        let mut threads = Vec::new();
        {
            threads.push(thread::spawn(move || {
                assert_eq!(credential.sign(b"hello"), "KfRRJckL9vrcsLEnD13gfc+vsB0=");
                assert_eq!(credential.sign(b"world"), "X27WdTEXv0u5if38toIjUZ8GA9g=");
            }));
        }
        {
            let credential = Arc::new(Credential::new("test_access_key", "test_secret_key"));
            threads.push(thread::spawn(move || {
                assert_eq!(credential.sign(b"-test"), "FPbWbWWuWJPxTi/U3BIy57vyHRY=");
                assert_eq!(credential.sign(b"ba#a-"), "WnNhe3Goq0wGSd9mRKtFAxSgslc=");
            }));
        }
        threads
            .into_iter()
            .for_each(|thread| thread.join().unwrap());
        Ok(())
    }

    #[test]
    fn test_access_key() {
        let credential = Credential::new("test_access_key", "test_secret_key");
        assert_eq!(credential.access_key(), "test_access_key");
    }
}
