// ==========================================
// 生产录入界面
// ==========================================
// 选择产品 + 数量，录入一次生产
// ==========================================

use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};

use super::{ScreenController, ScreenId};
use crate::api::error::ApiResult;
use crate::api::product_api::{ProductApi, ProductInfo};
use crate::api::production_api::{ProductionApi, ProductionLogEntry};

pub struct ProduceScreen {
    product_api: Arc<ProductApi>,
    production_api: Arc<ProductionApi>,
    choices: Mutex<Vec<ProductInfo>>,
}

impl ProduceScreen {
    pub fn new(product_api: Arc<ProductApi>, production_api: Arc<ProductionApi>) -> Self {
        Self {
            product_api,
            production_api,
            choices: Mutex::new(Vec::new()),
        }
    }

    /// 可选产品
    pub fn choices(&self) -> Vec<ProductInfo> {
        self.choices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 录入生产
    pub fn record_production(
        &self,
        product_id: i64,
        quantity: i32,
        manufactured_on: NaiveDateTime,
    ) -> ApiResult<ProductionLogEntry> {
        self.production_api
            .record_production(product_id, quantity, manufactured_on)
    }
}

impl ScreenController for ProduceScreen {
    fn screen_id(&self) -> ScreenId {
        ScreenId::Produce
    }

    fn prepare(&self) {
        self.update();
    }

    fn update(&self) {
        match self.product_api.list_products() {
            Ok(list) => {
                tracing::debug!(count = list.len(), "生产录入界面已刷新");
                *self.choices.lock().unwrap_or_else(|e| e.into_inner()) = list;
            }
            Err(e) => tracing::warn!("生产录入界面刷新失败: {}", e),
        }
    }
}
