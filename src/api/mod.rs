// ==========================================
// 产品生产追踪系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供界面控制器调用
// ==========================================

pub mod error;
pub mod product_api;
pub mod production_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use product_api::{CreateProductRequest, ProductApi, ProductInfo};
pub use production_api::{ProductionApi, ProductionLogEntry};
