use rand::Rng;

const CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 生成指定长度的大写字母数字随机码（去除易混淆字符 I/O/0/1）
pub fn generate_random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// 生成随机初始密码（满足密码策略：大小写字母 + 数字）
pub fn generate_initial_password() -> String {
    let mut rng = rand::rng();
    let body: String = (0..10)
        .map(|_| CODE_CHARSET[rng.random_range(0..CODE_CHARSET.len())] as char)
        .collect();
    format!("Sk{}{}", body, rng.random_range(10..100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_and_charset() {
        let code = generate_random_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn test_initial_password_passes_policy() {
        let password = generate_initial_password();
        assert!(crate::utils::validate::validate_password(&password).is_valid);
    }
}
