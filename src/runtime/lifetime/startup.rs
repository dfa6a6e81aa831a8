use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolSysError};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_initial_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

const FALLBACK_CACHE: &str = "moka";

async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let Some(constructor) = get_object_cache_plugin(name) else {
        warn!("Cache backend '{}' not found in registry", name);
        return None;
    };

    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }

    if cache_type != FALLBACK_CACHE {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = build_cache(FALLBACK_CACHE).await {
            return Ok(cache);
        }
    }

    Err(SchoolSysError::cache_connection(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 初始化默认管理员账号
/// 数据库中没有任何用户时创建 admin 账号
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量中的密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_initial_password();
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        username: "admin".to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("Administrator".to_string()),
        school_id: None,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            info!(
                "Default admin account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文：存储、迁移、管理员账号与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // redis 的 rustls 连接需要全局加密提供者，重复安装时忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}
