//! 对象缓存
//!
//! 以字符串键值缓存序列化后的对象（当前用于已认证用户查询）。
//! 后端以插件形式在加载期注册，启动时按配置选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    // 后端可用性异常或值不可读
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    // ttl 为 0 时使用默认过期时间
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明缓存插件，在程序加载时注册构造器
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::SchoolSysError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}

/// 已认证用户在缓存中的键
pub fn user_cache_key(token: &str) -> String {
    format!("user:{token}")
}
