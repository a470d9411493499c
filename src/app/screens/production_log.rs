// ==========================================
// 生产日志界面
// ==========================================

use std::sync::{Arc, Mutex};

use super::{ScreenController, ScreenId};
use crate::api::production_api::ProductionApi;

pub struct ProductionLogScreen {
    production_api: Arc<ProductionApi>,
    lines: Mutex<Vec<String>>,
}

impl ProductionLogScreen {
    pub fn new(production_api: Arc<ProductionApi>) -> Self {
        Self {
            production_api,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// 当前展示的日志行（最新在前）
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl ScreenController for ProductionLogScreen {
    fn screen_id(&self) -> ScreenId {
        ScreenId::ProductionLog
    }

    fn prepare(&self) {
        self.update();
    }

    fn update(&self) {
        match self.production_api.list_production_log(None) {
            Ok(entries) => {
                let lines: Vec<String> = entries.iter().map(|e| e.display_line()).collect();
                tracing::debug!(count = lines.len(), "生产日志界面已刷新");
                *self.lines.lock().unwrap_or_else(|e| e.into_inner()) = lines;
            }
            Err(e) => tracing::warn!("生产日志界面刷新失败: {}", e),
        }
    }
}
