// ==========================================
// 产品生产追踪系统 - 产品领域模型
// ==========================================
// 职责: 可生产的产品（名称、厂商、分类），以及音频播放器变体
// 红线: 不含数据访问逻辑
// ==========================================

use crate::domain::error::{require_non_blank, DomainResult};
use crate::domain::types::ItemType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 未知格式的占位值
pub const UNSPECIFIED_FORMATS: &str = "N/A";

/// 由显示名称派生简称
///
/// 规则: 去除首尾空白，连续空白折叠为单个空格。
/// 纯函数且幂等: `derive_simple_name(derive_simple_name(x)) == derive_simple_name(x)`
pub fn derive_simple_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ==========================================
// ProductDetails - 产品变体的附加字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductDetails {
    /// 普通产品，无附加字段
    Generic,
    /// 音频播放器
    AudioPlayer {
        supported_audio_formats: String,
        supported_playlist_formats: String,
    },
}

impl ProductDetails {
    /// 数据库中的变体标识
    pub fn kind_str(&self) -> &'static str {
        match self {
            ProductDetails::Generic => "GENERIC",
            ProductDetails::AudioPlayer { .. } => "AUDIO_PLAYER",
        }
    }
}

// ==========================================
// Product - 产品
// ==========================================
// 对齐: product 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: i64, // 0 表示尚未入库
    name: String,
    manufacturer: String,
    item_type: ItemType,
    details: ProductDetails,
}

impl Product {
    /// 创建普通产品
    ///
    /// # 错误
    /// - 名称或厂商为空
    pub fn new(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        item_type: ItemType,
    ) -> DomainResult<Self> {
        Self::build(name.into(), manufacturer.into(), item_type, ProductDetails::Generic)
    }

    /// 创建音频播放器（分类固定为 Audio）
    pub fn audio_player(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        supported_audio_formats: impl Into<String>,
        supported_playlist_formats: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::build(
            name.into(),
            manufacturer.into(),
            ItemType::Audio,
            ProductDetails::AudioPlayer {
                supported_audio_formats: supported_audio_formats.into(),
                supported_playlist_formats: supported_playlist_formats.into(),
            },
        )
    }

    /// 创建音频播放器，支持格式未知
    pub fn audio_player_default(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::audio_player(name, manufacturer, UNSPECIFIED_FORMATS, UNSPECIFIED_FORMATS)
    }

    /// 从存储层数据重建产品（同样执行校验）
    pub fn restore(
        id: i64,
        name: String,
        manufacturer: String,
        item_type: ItemType,
        details: ProductDetails,
    ) -> DomainResult<Self> {
        Ok(Self::build(name, manufacturer, item_type, details)?.with_id(id))
    }

    fn build(
        name: String,
        manufacturer: String,
        item_type: ItemType,
        details: ProductDetails,
    ) -> DomainResult<Self> {
        require_non_blank("name", &name)?;
        require_non_blank("manufacturer", &manufacturer)?;

        // 音频播放器只能是 Audio 分类
        let item_type = match details {
            ProductDetails::AudioPlayer { .. } => ItemType::Audio,
            ProductDetails::Generic => item_type,
        };

        Ok(Self {
            id: 0,
            name,
            manufacturer,
            item_type,
            details,
        })
    }

    /// 附加存储层分配的 ID
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn details(&self) -> &ProductDetails {
        &self.details
    }

    /// 产品简称
    pub fn simple_name(&self) -> String {
        derive_simple_name(&self.name)
    }

    /// 是否为音频播放器
    pub fn is_audio_player(&self) -> bool {
        matches!(self.details, ProductDetails::AudioPlayer { .. })
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}\nManufacturer: {}\nType: {}",
            self.name, self.manufacturer, self.item_type
        )?;
        if let ProductDetails::AudioPlayer {
            supported_audio_formats,
            supported_playlist_formats,
        } = &self.details
        {
            write!(
                f,
                "\nSupported Audio Formats: {}\nSupported Playlist Formats: {}",
                supported_audio_formats, supported_playlist_formats
            )?;
        }
        Ok(())
    }
}
