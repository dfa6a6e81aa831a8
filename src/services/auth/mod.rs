pub mod login;
pub mod logout;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{Outcome, storage_from_request};
use crate::config::AppConfig;
use crate::models::auth::LoginRequest;
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Outcome<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    // 获取当前用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    // 登出
    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(request).await
    }
}
