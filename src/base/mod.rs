pub(crate) mod base64;
pub(crate) mod credential;
pub(crate) mod upload_policy;
pub(crate) mod upload_signature;
