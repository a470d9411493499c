// ==========================================
// 产品生产追踪系统 - 生产记录领域模型
// ==========================================
// 职责: 一次生产事件（产品、数量、时间、序列号）
// 生命周期: Pending → SerialAssigned → Persisted
// 红线: production_id 只能由存储层从 0 变为非 0
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::product::Product;
use crate::domain::serial::compose_serial;
use crate::domain::types::ProductionStage;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 未持久化记录的 production_id
pub const PENDING_PRODUCTION_ID: i64 = 0;

fn validate_quantity(quantity: i32) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation(
            "quantity",
            format!("生产数量必须为正数: {}", quantity),
        ));
    }
    Ok(())
}

// ==========================================
// ProductionRecord - 生产记录
// ==========================================
// 对齐: production_record 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecord {
    production_id: i64,
    product_id: i64,
    quantity: i32,
    serial_number: String, // 生成前为空串
    manufactured_on: NaiveDateTime,
}

impl ProductionRecord {
    /// 创建已标识的生产记录（从存储层加载时使用）
    pub fn identified(
        production_id: i64,
        product_id: i64,
        quantity: i32,
        serial_number: impl Into<String>,
        manufactured_on: NaiveDateTime,
    ) -> DomainResult<Self> {
        validate_quantity(quantity)?;
        Ok(Self {
            production_id,
            product_id,
            quantity,
            serial_number: serial_number.into(),
            manufactured_on,
        })
    }

    /// 创建待持久化的生产记录（production_id = 0，序列号为空）
    pub fn pending(
        product_id: i64,
        quantity: i32,
        manufactured_on: NaiveDateTime,
    ) -> DomainResult<Self> {
        Self::identified(
            PENDING_PRODUCTION_ID,
            product_id,
            quantity,
            String::new(),
            manufactured_on,
        )
    }

    pub fn production_id(&self) -> i64 {
        self.production_id
    }

    pub fn product_id(&self) -> i64 {
        self.product_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn manufactured_on(&self) -> NaiveDateTime {
        self.manufactured_on
    }

    /// 设置序列号
    ///
    /// 不做唯一性校验，唯一性由存储层约束保证
    ///
    /// # 错误
    /// - 已持久化且已有序列号的记录（序列号已定稿）
    /// - 清空已分配的序列号（SerialAssigned 不能回到 Pending）
    pub fn set_serial_number(&mut self, serial_number: impl Into<String>) -> DomainResult<()> {
        let serial_number = serial_number.into();
        if self.is_serial_finalized() {
            return Err(DomainError::InvalidStateTransition {
                from: format!("{}(serial={})", self.stage(), self.serial_number),
                to: format!("serial={}", serial_number),
            });
        }
        if serial_number.is_empty() && !self.serial_number.is_empty() {
            return Err(DomainError::InvalidStateTransition {
                from: self.stage().to_string(),
                to: ProductionStage::Pending.to_string(),
            });
        }
        self.serial_number = serial_number;
        Ok(())
    }

    /// 序列号是否已定稿（已持久化且非空）
    pub fn is_serial_finalized(&self) -> bool {
        !self.is_pending() && !self.serial_number.is_empty()
    }

    /// 是否尚未持久化
    pub fn is_pending(&self) -> bool {
        self.production_id == PENDING_PRODUCTION_ID
    }

    /// 当前生命周期阶段
    pub fn stage(&self) -> ProductionStage {
        if !self.is_pending() {
            ProductionStage::Persisted
        } else if self.serial_number.is_empty() {
            ProductionStage::Pending
        } else {
            ProductionStage::SerialAssigned
        }
    }

    /// 由存储层分配 production_id
    ///
    /// # 错误
    /// - id 为 0
    /// - 记录已持久化（不允许回退或重复分配）
    pub fn assign_production_id(&mut self, production_id: i64) -> DomainResult<()> {
        if production_id == PENDING_PRODUCTION_ID {
            return Err(DomainError::validation(
                "production_id",
                "存储层分配的 production_id 不能为 0",
            ));
        }
        if !self.is_pending() {
            return Err(DomainError::InvalidStateTransition {
                from: format!("{}(id={})", self.stage(), self.production_id),
                to: format!("{}(id={})", ProductionStage::Persisted, production_id),
            });
        }
        self.production_id = production_id;
        Ok(())
    }

    fn set_product_id(&mut self, product_id: i64) {
        self.product_id = product_id;
    }
}

// ==========================================
// ResolvedProduction - 生产记录 + 已解析的产品
// ==========================================
// 红线: product 与 product_simple_name 必须同步替换
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProduction {
    record: ProductionRecord,
    product: Arc<Product>,
    product_simple_name: String,
}

impl ResolvedProduction {
    /// 以显式 production_id 创建（序列号为空）
    pub fn new_with_id(
        production_id: i64,
        quantity: i32,
        manufactured_on: NaiveDateTime,
        product: Arc<Product>,
    ) -> DomainResult<Self> {
        let record = ProductionRecord::identified(
            production_id,
            product.id(),
            quantity,
            String::new(),
            manufactured_on,
        )?;
        Ok(Self::attach(record, product))
    }

    /// 创建待持久化记录，production_id 固定为 0
    pub fn new_pending(
        product: Arc<Product>,
        quantity: i32,
        manufactured_on: NaiveDateTime,
    ) -> DomainResult<Self> {
        let record = ProductionRecord::pending(product.id(), quantity, manufactured_on)?;
        Ok(Self::attach(record, product))
    }

    /// 从存储层全量字段重建
    pub fn new_from_storage(
        production_id: i64,
        quantity: i32,
        serial_number: impl Into<String>,
        manufactured_on: NaiveDateTime,
        product: Arc<Product>,
    ) -> DomainResult<Self> {
        let record = ProductionRecord::identified(
            production_id,
            product.id(),
            quantity,
            serial_number,
            manufactured_on,
        )?;
        Ok(Self::attach(record, product))
    }

    fn attach(record: ProductionRecord, product: Arc<Product>) -> Self {
        let mut resolved = Self {
            record,
            product_simple_name: String::new(),
            product: Arc::clone(&product),
        };
        resolved.set_product(product);
        resolved
    }

    pub fn record(&self) -> &ProductionRecord {
        &self.record
    }

    pub fn product(&self) -> &Arc<Product> {
        &self.product
    }

    /// 替换产品
    ///
    /// 产品引用、简称缓存、记录中的 product_id 在同一次调用内全部更新
    pub fn set_product(&mut self, product: Arc<Product>) {
        self.product_simple_name = product.simple_name();
        self.record.set_product_id(product.id());
        self.product = product;
    }

    pub fn product_simple_name(&self) -> &str {
        &self.product_simple_name
    }

    pub fn production_id(&self) -> i64 {
        self.record.production_id()
    }

    pub fn quantity(&self) -> i32 {
        self.record.quantity()
    }

    pub fn serial_number(&self) -> &str {
        self.record.serial_number()
    }

    pub fn manufactured_on(&self) -> NaiveDateTime {
        self.record.manufactured_on()
    }

    pub fn stage(&self) -> ProductionStage {
        self.record.stage()
    }

    pub fn set_serial_number(&mut self, serial_number: impl Into<String>) -> DomainResult<()> {
        self.record.set_serial_number(serial_number)
    }

    pub fn assign_production_id(&mut self, production_id: i64) -> DomainResult<()> {
        self.record.assign_production_id(production_id)
    }

    /// 生成并写入序列号
    ///
    /// 厂商前缀 + 分类代码 + 5 位补零计数器。同一产品与计数器重复调用结果相同。
    /// 序列号定稿后调用返回 InvalidStateTransition。
    pub fn generate_serial_number(&mut self, counter: i64) -> DomainResult<()> {
        let serial = compose_serial(
            self.product.manufacturer(),
            self.product.item_type(),
            counter,
        )?;
        self.record.set_serial_number(serial)
    }
}
