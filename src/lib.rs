// ==========================================
// 产品生产追踪系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 产品目录、生产记录与序列号管理
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 界面控制器与标签页分发
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ItemType, ProductionStage};

// 领域实体
pub use domain::{
    DomainError, MultimediaControl, Product, ProductDetails, ProductionRecord,
    ResolvedProduction,
};

// API
pub use api::{ApiError, ProductApi, ProductionApi};

// 应用
pub use app::{AppState, RootController, ScreenId};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "产品生产追踪系统";
