// S3 的策略与签名字段均使用标准字母表，且必须是不含换行的单行字符串
#[inline]
pub(crate) fn standard(data: &[u8]) -> String {
    base64::encode(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_is_single_line() {
        // 长输入也不允许出现折行
        let encoded = standard(&[b'x'; 4096]);
        assert!(!encoded.contains('\n'));
        assert!(!encoded.contains('\r'));
        assert_eq!(::base64::decode(&encoded).unwrap(), vec![b'x'; 4096]);
    }
}
