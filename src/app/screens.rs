// ==========================================
// 产品生产追踪系统 - 界面控制器与标签页分发
// ==========================================
// 职责: 标签页切换时通知对应界面刷新
// 规则: 已知标签页只刷新对应界面；未知标签页记录告警并刷新全部界面
// 说明: 控制器通过显式注册表传递，不使用全局单例
// ==========================================

mod produce;
mod product_line;
mod production_log;

pub use produce::ProduceScreen;
pub use product_line::ProductLineScreen;
pub use production_log::ProductionLogScreen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};

// ==========================================
// ScreenId - 界面标识
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScreenId {
    ProductLine,   // 产品线
    Produce,       // 生产录入
    ProductionLog, // 生产日志
}

impl ScreenId {
    pub const ALL: [ScreenId; 3] = [
        ScreenId::ProductLine,
        ScreenId::Produce,
        ScreenId::ProductionLog,
    ];

    /// 对应标签页的 ID
    pub fn tab_id(&self) -> &'static str {
        match self {
            ScreenId::ProductLine => "productionLineTab",
            ScreenId::Produce => "produceTab",
            ScreenId::ProductionLog => "productionLogTab",
        }
    }

    /// 由标签页 ID 查找界面（精确匹配）
    pub fn from_tab_id(tab_id: &str) -> Option<Self> {
        ScreenId::ALL.into_iter().find(|s| s.tab_id() == tab_id)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenId::ProductLine => write!(f, "ProductLine"),
            ScreenId::Produce => write!(f, "Produce"),
            ScreenId::ProductionLog => write!(f, "ProductionLog"),
        }
    }
}

// ==========================================
// Trait: ScreenController
// ==========================================
pub trait ScreenController: Send + Sync {
    /// 控制器负责的界面
    fn screen_id(&self) -> ScreenId;

    /// 控制器创建后调用一次
    fn prepare(&self) {}

    /// 从底层数据刷新界面
    fn update(&self);
}

// ==========================================
// ScreenRegistry - 界面控制器注册表
// ==========================================
// 每个界面恰好一个控制器
pub struct ScreenRegistry {
    product_line: Arc<dyn ScreenController>,
    produce: Arc<dyn ScreenController>,
    production_log: Arc<dyn ScreenController>,
}

impl ScreenRegistry {
    /// 创建注册表
    ///
    /// # 错误
    /// 任一控制器的 screen_id 与所在槽位不一致
    pub fn new(
        product_line: Arc<dyn ScreenController>,
        produce: Arc<dyn ScreenController>,
        production_log: Arc<dyn ScreenController>,
    ) -> ApiResult<Self> {
        for (expected, controller) in [
            (ScreenId::ProductLine, &product_line),
            (ScreenId::Produce, &produce),
            (ScreenId::ProductionLog, &production_log),
        ] {
            if controller.screen_id() != expected {
                return Err(ApiError::InvalidInput(format!(
                    "界面控制器注册错误: 期望 {}，实际 {}",
                    expected,
                    controller.screen_id()
                )));
            }
        }

        Ok(Self {
            product_line,
            produce,
            production_log,
        })
    }

    /// 获取界面控制器
    pub fn get(&self, screen: ScreenId) -> &Arc<dyn ScreenController> {
        match screen {
            ScreenId::ProductLine => &self.product_line,
            ScreenId::Produce => &self.produce,
            ScreenId::ProductionLog => &self.production_log,
        }
    }
}

// ==========================================
// RootController - 根控制器
// ==========================================
pub struct RootController {
    registry: ScreenRegistry,
}

impl RootController {
    pub fn new(registry: ScreenRegistry) -> Self {
        Self { registry }
    }

    /// 准备全部界面（每个控制器调用一次 prepare）
    pub fn prepare(&self) {
        tracing::info!("RootController 已启动");
        for screen in ScreenId::ALL {
            self.registry.get(screen).prepare();
        }
    }

    /// 刷新全部界面
    pub fn update_all(&self) {
        for screen in ScreenId::ALL {
            self.registry.get(screen).update();
        }
    }

    /// 标签页切换事件
    ///
    /// # 返回
    /// 本次被刷新的界面
    pub fn on_tab_selected(&self, tab_id: &str) -> Vec<ScreenId> {
        tracing::debug!(tab_id, "标签页切换");

        match ScreenId::from_tab_id(tab_id) {
            Some(screen) => {
                self.registry.get(screen).update();
                vec![screen]
            }
            None => {
                tracing::warn!(tab_id, "未识别的标签页，刷新全部界面");
                self.update_all();
                ScreenId::ALL.to_vec()
            }
        }
    }
}
