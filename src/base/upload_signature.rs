use super::{base64, credential::Credential, upload_policy::UploadPolicy};

pub(crate) fn encode_upload_policy(policy: &UploadPolicy) -> String {
    base64::standard(policy.to_json().as_bytes())
}

// 签名覆盖 base64 编码后的策略字符串，而非原始 JSON
pub(crate) fn sign_encoded_policy(credential: &Credential, encoded_policy: &str) -> String {
    credential.sign(encoded_policy.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::time::{Duration, UNIX_EPOCH};

    const ENCODED_POLICY: &str =
        "eyJleHBpcmF0aW9uIjoiMjAyMC0wOS0xM1QxMjoyNjo0MC4wMDBaIiwiY29uZGl0aW9ucyI6W3siYnVja2V0Ijo\
         idGVzdF9idWNrZXQifSxbInN0YXJ0cy13aXRoIiwiJGtleSIsInNvbWUvdGVzdCJdLHsiYWNsIjoicHJpdmF0ZSJ\
         9LHsic3VjY2Vzc19hY3Rpb25fcmVkaXJlY3QiOiJodHRwOi8vZXhhbXBsZS5jb20vYmFjayJ9XX0=";

    #[test]
    fn test_encode_upload_policy() -> Result<()> {
        let policy = UploadPolicy::new_for_form(
            "test_bucket",
            "some/test",
            "private",
            "http://example.com/back",
            UNIX_EPOCH + Duration::from_secs(1_600_000_000),
        );
        let encoded = encode_upload_policy(&policy);
        assert_eq!(encoded, ENCODED_POLICY);
        assert!(!encoded.contains('\n'));
        assert!(!encoded.contains('\r'));
        assert_eq!(::base64::decode(&encoded)?, policy.to_json().into_bytes());
        Ok(())
    }

    #[test]
    fn test_sign_encoded_policy() {
        let credential = Credential::new("test_access_key", "test_secret_key");
        assert_eq!(
            sign_encoded_policy(&credential, ENCODED_POLICY),
            "pZiATdwzy2DLxxUpFP9rE1RNqbY="
        );
    }
}
