// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供基于临时数据库文件的完整应用环境
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use tempfile::NamedTempFile;

use production_tracker::api::{CreateProductRequest, ProductInfo};
use production_tracker::app::AppState;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 持有 AppState 与临时数据库文件
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: AppState,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建测试环境（空库，自动建表）
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        production_tracker::logging::init_test();

        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or("临时文件路径不是合法 UTF-8")?
            .to_string();

        let state = AppState::new(db_path.clone())?;

        Ok(Self {
            db_path,
            state,
            _temp_file: temp_file,
        })
    }

    /// 创建普通产品
    pub fn create_product(&self, name: &str, manufacturer: &str, item_type: &str) -> ProductInfo {
        self.state
            .product_api
            .create_product(CreateProductRequest::generic(name, manufacturer, item_type))
            .expect("创建产品失败")
    }
}

/// 构造生产时间
pub fn ts(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}
