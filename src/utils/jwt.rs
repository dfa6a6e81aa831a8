use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型: "access" 或 "refresh"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

// Token 响应结构体
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

const ACCESS_TOKEN: &str = "access";
const REFRESH_TOKEN: &str = "refresh";

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            user_id,
            role,
            ACCESS_TOKEN,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    // 生成 Refresh Token
    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        token_expiry: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        match token_expiry {
            Some(expiry) => Self::generate_token_with_expiry(user_id, role, REFRESH_TOKEN, expiry),
            None => Self::generate_token_with_expiry(
                user_id,
                role,
                REFRESH_TOKEN,
                chrono::Duration::days(config.jwt.refresh_token_expiry),
            ),
        }
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::encode_with_secret(
            &Self::get_secret(),
            user_id,
            role,
            token_type,
            expiry_duration,
        )
    }

    // 使用指定密钥签发 Token
    fn encode_with_secret(
        secret: &str,
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    // 使用指定密钥校验 Token 并检查类型
    fn decode_with_secret(
        secret: &str,
        token: &str,
        expected_type: Option<&str>,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let claims = decode::<Claims>(token, &decoding_key, &Validation::default())?.claims;
        if let Some(expected) = expected_type
            && claims.token_type != expected
        {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    // 生成完整的 Token 响应（包含 access 和 refresh token）
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access_token = Self::generate_access_token(user_id, role)?;
        let refresh_token = Self::generate_refresh_token(user_id, role, refresh_token_expiry)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(&Self::get_secret(), token, Some(ACCESS_TOKEN))
    }

    // 验证 Refresh Token
    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with_secret(&Self::get_secret(), token, Some(REFRESH_TOKEN))
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(refresh_token: &str) -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build("refresh_token", refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::days(
                config.jwt.refresh_token_expiry,
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production()) // 生产环境下使用 HTTPS
            .finish()
    }

    /// 创建空的 Refresh Token Cookie（用于注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build("refresh_token", "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    /// 从请求中提取 Refresh Token
    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie("refresh_token")
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_token_round_trip_keeps_claims() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            42,
            "teacher",
            ACCESS_TOKEN,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        let claims = JwtUtils::decode_with_secret(SECRET, &token, Some(ACCESS_TOKEN)).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_refresh_token_rejected_as_access_token() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "admin",
            REFRESH_TOKEN,
            chrono::Duration::days(1),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret(SECRET, &token, Some(ACCESS_TOKEN)).is_err());
        assert!(JwtUtils::decode_with_secret(SECRET, &token, Some(REFRESH_TOKEN)).is_ok());
    }

    #[test]
    fn test_wrong_secret_and_expired_token_rejected() {
        let token = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "student",
            ACCESS_TOKEN,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret("other-secret", &token, None).is_err());

        let expired = JwtUtils::encode_with_secret(
            SECRET,
            1,
            "student",
            ACCESS_TOKEN,
            chrono::Duration::hours(-2),
        )
        .unwrap();
        assert!(JwtUtils::decode_with_secret(SECRET, &expired, None).is_err());
    }
}
