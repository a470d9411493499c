// ==========================================
// 产品生产追踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态、API实例与界面控制器
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::api::{ProductApi, ProductionApi};
use crate::app::screens::{
    ProduceScreen, ProductLineScreen, ProductionLogScreen, RootController, ScreenRegistry,
};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::repository::{ProductRepository, ProductionRepository, SerialCounterRepository};

/// 应用状态
///
/// 包含所有API实例、界面控制器和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 产品目录API
    pub product_api: Arc<ProductApi>,

    /// 生产记录API
    pub production_api: Arc<ProductionApi>,

    /// 界面控制器（具体类型，便于直接操作界面）
    pub product_line_screen: Arc<ProductLineScreen>,
    pub produce_screen: Arc<ProduceScreen>,
    pub production_log_screen: Arc<ProductionLogScreen>,

    /// 根控制器（标签页分发）
    pub root_controller: RootController,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 表示内存库）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(anyhow::Error): 初始化错误（带失败步骤上下文）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并建表
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例与界面控制器，并调用一次 prepare
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        ensure_schema(&conn).context("数据库建表失败")?;
        match read_schema_version(&conn) {
            Ok(Some(v)) if v > CURRENT_SCHEMA_VERSION => {
                tracing::warn!("数据库 schema_version={} 高于当前程序支持的 {}", v, CURRENT_SCHEMA_VERSION);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("读取 schema_version 失败: {}", e),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let product_repo = Arc::new(ProductRepository::new(conn.clone()));
        let production_repo = Arc::new(ProductionRepository::new(conn.clone()));
        let serial_counter_repo = Arc::new(SerialCounterRepository::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone()).context("无法创建ConfigManager")?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let product_api = Arc::new(ProductApi::new(product_repo));
        let production_api = Arc::new(ProductionApi::new(
            product_api.clone(),
            production_repo,
            serial_counter_repo,
            config_manager.clone(),
        ));

        // ==========================================
        // 初始化界面控制器
        // ==========================================
        let product_line_screen = Arc::new(ProductLineScreen::new(product_api.clone()));
        let produce_screen = Arc::new(ProduceScreen::new(
            product_api.clone(),
            production_api.clone(),
        ));
        let production_log_screen = Arc::new(ProductionLogScreen::new(production_api.clone()));

        let registry = ScreenRegistry::new(
            product_line_screen.clone(),
            produce_screen.clone(),
            production_log_screen.clone(),
        )
        .context("界面控制器注册失败")?;
        let root_controller = RootController::new(registry);
        root_controller.prepare();

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            config_manager,
            product_api,
            production_api,
            product_line_screen,
            produce_screen,
            production_log_screen,
            root_controller,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级：
/// 1. 环境变量 PRODUCTION_TRACKER_DB_PATH
/// 2. 用户数据目录下的 production-tracker/production_tracker.db
/// 3. 当前目录 ./production_tracker.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PRODUCTION_TRACKER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./production_tracker.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("production-tracker");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("production_tracker.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CreateProductRequest;
    use chrono::NaiveDate;

    #[test]
    fn test_app_state_end_to_end_in_memory() {
        let state = AppState::new(":memory:".to_string()).unwrap();

        let product = state
            .product_line_screen
            .add_product(CreateProductRequest::generic("SoundBlaster", "Acme", "AUDIO"))
            .unwrap();
        assert_eq!(state.product_line_screen.products().len(), 1);

        let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let entry = state
            .produce_screen
            .record_production(product.product_id, 5, ts)
            .unwrap();
        assert_eq!(entry.serial_number, "AcmAUD00001");

        assert!(state.production_log_screen.lines().is_empty());
        state.root_controller.on_tab_selected("productionLogTab");
        let lines = state.production_log_screen.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("AcmAUD00001"));
    }

    #[test]
    fn test_app_state_open_failure_carries_context() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("missing").join("tracker.db");

        let err = AppState::new(db_path.to_string_lossy().to_string())
            .err()
            .expect("目录不存在时应打开失败");
        assert!(format!("{:#}", err).contains("无法打开数据库"));
    }
}
