pub mod error_code;
pub mod pagination;
pub mod response;

pub use error_code::ErrorCode;
pub use pagination::{
    PaginatedResponse, PaginationInfo, PaginationQuery, deserialize_clearable_i64,
    deserialize_optional_i64,
};
pub use response::ApiResponse;
