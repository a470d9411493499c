// ==========================================
// 产品生产追踪系统 - 应用层
// ==========================================
// 职责: 组装仓储/API/界面控制器，处理标签页切换
// ==========================================

pub mod screens;
pub mod state;

// 重导出
pub use screens::{RootController, ScreenController, ScreenId, ScreenRegistry};
pub use state::{get_default_db_path, AppState};
