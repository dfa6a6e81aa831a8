use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

// 可选 ID 参数：兼容数字、数字字符串与空字符串（flatten 查询参数时均为字符串）
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(v)) => Ok(Some(v)),
        Some(Raw::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::custom(format!("invalid integer: '{s}'"))),
    }
}

// 可清空的 ID 字段：缺省 -> None，显式 null -> Some(None)
//
// 需配合 `#[serde(default)]` 使用
pub fn deserialize_clearable_i64<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_accepts_numbers_and_strings() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page": 3, "size": "25"}"#).unwrap();
        assert_eq!(q.page, 3);
        assert_eq!(q.size, 25);
    }

    #[test]
    fn test_pagination_defaults() {
        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.size, 10);
    }

    #[test]
    fn test_optional_id_from_string_number_and_empty() {
        #[derive(Deserialize)]
        struct Q {
            #[serde(default, deserialize_with = "deserialize_optional_i64")]
            class_id: Option<i64>,
        }
        let q: Q = serde_json::from_str(r#"{"class_id": "42"}"#).unwrap();
        assert_eq!(q.class_id, Some(42));
        let q: Q = serde_json::from_str(r#"{"class_id": 7}"#).unwrap();
        assert_eq!(q.class_id, Some(7));
        let q: Q = serde_json::from_str(r#"{"class_id": ""}"#).unwrap();
        assert_eq!(q.class_id, None);
        let q: Q = serde_json::from_str("{}").unwrap();
        assert_eq!(q.class_id, None);
        assert!(serde_json::from_str::<Q>(r#"{"class_id": "x"}"#).is_err());
    }

    #[test]
    fn test_clearable_id_distinguishes_missing_and_null() {
        #[derive(Deserialize)]
        struct U {
            #[serde(default, deserialize_with = "deserialize_clearable_i64")]
            stream_id: Option<Option<i64>>,
        }
        let u: U = serde_json::from_str("{}").unwrap();
        assert_eq!(u.stream_id, None);
        let u: U = serde_json::from_str(r#"{"stream_id": null}"#).unwrap();
        assert_eq!(u.stream_id, Some(None));
        let u: U = serde_json::from_str(r#"{"stream_id": 5}"#).unwrap();
        assert_eq!(u.stream_id, Some(Some(5)));
    }

    #[test]
    fn test_pagination_rejects_garbage() {
        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page": "abc"}"#).is_err());
    }
}
