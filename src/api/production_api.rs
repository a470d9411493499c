// ==========================================
// 产品生产追踪系统 - 生产记录 API
// ==========================================
// 职责: 记录生产、生成序列号、查询/导出生产日志
// 流程: 解析产品 → 待持久化记录 → 发放计数器 → 生成序列号 → 入库
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::product_api::ProductApi;
use crate::config::config_manager::ConfigManager;
use crate::domain::production::ResolvedProduction;
use crate::domain::serial::counter_scope;
use crate::domain::types::ProductionStage;
use crate::repository::production_repo::ProductionRepository;
use crate::repository::serial_counter_repo::SerialCounterRepository;

// ==========================================
// ProductionApi - 生产记录 API
// ==========================================
pub struct ProductionApi {
    product_api: Arc<ProductApi>,
    production_repo: Arc<ProductionRepository>,
    serial_counter_repo: Arc<SerialCounterRepository>,
    config_manager: Arc<ConfigManager>,
}

impl ProductionApi {
    /// 创建新的ProductionApi实例
    pub fn new(
        product_api: Arc<ProductApi>,
        production_repo: Arc<ProductionRepository>,
        serial_counter_repo: Arc<SerialCounterRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            product_api,
            production_repo,
            serial_counter_repo,
            config_manager,
        }
    }

    /// 记录一次生产
    ///
    /// # 参数
    /// - product_id: 已入库的产品ID
    /// - quantity: 生产数量（正数）
    /// - manufactured_on: 生产时间
    ///
    /// # 返回
    /// - Ok(ProductionLogEntry): 已持久化的生产记录（含序列号）
    /// - Err(ApiError::NotFound): 产品不存在
    /// - Err(ApiError::ValidationError): 数量非法
    pub fn record_production(
        &self,
        product_id: i64,
        quantity: i32,
        manufactured_on: NaiveDateTime,
    ) -> ApiResult<ProductionLogEntry> {
        let product = Arc::new(self.product_api.load_product(product_id)?);
        let mut production =
            ResolvedProduction::new_pending(Arc::clone(&product), quantity, manufactured_on)?;

        let scope = counter_scope(product.manufacturer(), product.item_type());
        let start = self.config_manager.get_serial_counter_start()?;
        let counter = self.serial_counter_repo.next_value(&scope, start)?;
        production.generate_serial_number(counter)?;

        self.production_repo.insert(&mut production)?;

        tracing::info!(
            production_id = production.production_id(),
            product_id,
            quantity,
            serial_number = production.serial_number(),
            "生产记录已保存"
        );

        Ok(ProductionLogEntry::from(&production))
    }

    /// 查询单条生产记录
    pub fn get_production(&self, production_id: i64) -> ApiResult<ProductionLogEntry> {
        self.production_repo
            .find_by_id(production_id)?
            .map(|p| ProductionLogEntry::from(&p))
            .ok_or_else(|| ApiError::NotFound(format!("生产记录(id={})不存在", production_id)))
    }

    /// 按序列号查询
    pub fn find_by_serial(&self, serial_number: &str) -> ApiResult<Option<ProductionLogEntry>> {
        if serial_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("序列号不能为空".to_string()));
        }
        Ok(self
            .production_repo
            .find_by_serial(serial_number.trim())?
            .map(|p| ProductionLogEntry::from(&p)))
    }

    /// 生产日志（按生产时间倒序）
    ///
    /// # 参数
    /// - limit: 最多返回条数；None 使用配置 production_log_limit
    pub fn list_production_log(&self, limit: Option<usize>) -> ApiResult<Vec<ProductionLogEntry>> {
        let limit = match limit {
            Some(0) => return Err(ApiError::InvalidInput("limit 必须大于 0".to_string())),
            Some(n) => n,
            None => self.config_manager.get_production_log_limit()?,
        };

        let log = self.production_repo.list_log(limit)?;
        Ok(log.iter().map(ProductionLogEntry::from).collect())
    }

    /// 某产品的生产历史（按生产时间正序）
    ///
    /// # 错误
    /// - ApiError::NotFound: 产品不存在
    pub fn list_production_for_product(
        &self,
        product_id: i64,
    ) -> ApiResult<Vec<ProductionLogEntry>> {
        self.product_api.load_product(product_id)?;
        let history = self.production_repo.list_by_product(product_id)?;
        Ok(history.iter().map(ProductionLogEntry::from).collect())
    }

    /// 导出全部生产日志为 CSV
    ///
    /// 不受 production_log_limit 约束（该配置只作用于界面展示）
    ///
    /// # 返回
    /// 写入的记录条数（不含表头）
    pub fn export_production_log_csv(&self, path: &Path) -> ApiResult<usize> {
        let delimiter = self.config_manager.get_csv_delimiter()?;
        let entries: Vec<ProductionLogEntry> = self
            .production_repo
            .list_all_for_export()?
            .iter()
            .map(ProductionLogEntry::from)
            .collect();

        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_path(path)
            .map_err(|e| ApiError::ExportError(format!("{}: {}", path.display(), e)))?;

        for entry in &entries {
            writer
                .serialize(entry)
                .map_err(|e| ApiError::ExportError(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| ApiError::ExportError(e.to_string()))?;

        tracing::info!(path = %path.display(), rows = entries.len(), "生产日志已导出");
        Ok(entries.len())
    }
}

// ==========================================
// DTO 定义
// ==========================================

/// 生产日志条目（用于前端展示与导出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionLogEntry {
    pub production_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub manufacturer: String,
    pub item_type: String,
    pub quantity: i32,
    pub serial_number: String,
    pub manufactured_on: NaiveDateTime,
    pub stage: ProductionStage,
}

impl ProductionLogEntry {
    /// 生产日志中的单行展示文本
    pub fn display_line(&self) -> String {
        format!(
            "Prod. Num: {} Product Name: {} Serial Num: {} Quantity: {} Date: {}",
            self.production_id,
            self.product_name,
            self.serial_number,
            self.quantity,
            self.manufactured_on.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

impl From<&ResolvedProduction> for ProductionLogEntry {
    fn from(p: &ResolvedProduction) -> Self {
        Self {
            production_id: p.production_id(),
            product_id: p.product().id(),
            product_name: p.product_simple_name().to_string(),
            manufacturer: p.product().manufacturer().to_string(),
            item_type: p.product().item_type().to_string(),
            quantity: p.quantity(),
            serial_number: p.serial_number().to_string(),
            manufactured_on: p.manufactured_on(),
            stage: p.stage(),
        }
    }
}
