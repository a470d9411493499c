// ==========================================
// 产品生产追踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、序列号规则
// 红线: 不含数据访问逻辑,不含界面逻辑
// ==========================================

pub mod error;
pub mod multimedia;
pub mod product;
pub mod production;
pub mod serial;
pub mod types;

// 重导出核心类型
pub use error::{DomainError, DomainResult};
pub use multimedia::{AudioPlayer, MultimediaControl};
pub use product::{derive_simple_name, Product, ProductDetails};
pub use production::{ProductionRecord, ResolvedProduction, PENDING_PRODUCTION_ID};
pub use serial::{compose_serial, manufacturer_prefix, SERIAL_COUNTER_WIDTH};
pub use types::{ItemType, ProductionStage};
