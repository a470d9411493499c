// ==========================================
// 产品线界面 - 产品目录
// ==========================================

use std::sync::{Arc, Mutex};

use super::{ScreenController, ScreenId};
use crate::api::product_api::{CreateProductRequest, ProductApi, ProductInfo};
use crate::api::error::ApiResult;

pub struct ProductLineScreen {
    product_api: Arc<ProductApi>,
    products: Mutex<Vec<ProductInfo>>,
}

impl ProductLineScreen {
    pub fn new(product_api: Arc<ProductApi>) -> Self {
        Self {
            product_api,
            products: Mutex::new(Vec::new()),
        }
    }

    /// 当前展示的产品列表
    pub fn products(&self) -> Vec<ProductInfo> {
        self.products
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 新增产品并刷新列表
    pub fn add_product(&self, request: CreateProductRequest) -> ApiResult<ProductInfo> {
        let created = self.product_api.create_product(request)?;
        self.update();
        Ok(created)
    }
}

impl ScreenController for ProductLineScreen {
    fn screen_id(&self) -> ScreenId {
        ScreenId::ProductLine
    }

    fn prepare(&self) {
        self.update();
    }

    fn update(&self) {
        match self.product_api.list_products() {
            Ok(list) => {
                tracing::debug!(count = list.len(), "产品线界面已刷新");
                *self.products.lock().unwrap_or_else(|e| e.into_inner()) = list;
            }
            // 刷新失败时保留上一次的内容
            Err(e) => tracing::warn!("产品线界面刷新失败: {}", e),
        }
    }
}
