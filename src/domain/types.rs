// ==========================================
// 产品生产追踪系统 - 领域类型定义
// ==========================================
// 产品分类 (ItemType) 与生产记录生命周期 (ProductionStage)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 产品分类 (Item Type)
// ==========================================
// 每个分类携带一个稳定、非空的短代码，用于拼接序列号
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Audio,        // 音频设备
    Visual,       // 视频设备
    AudioMobile,  // 便携音频
    VisualMobile, // 便携视频
}

impl ItemType {
    /// 全部分类（用于下拉框等展示）
    pub const ALL: [ItemType; 4] = [
        ItemType::Audio,
        ItemType::Visual,
        ItemType::AudioMobile,
        ItemType::VisualMobile,
    ];

    /// 序列号中使用的分类代码
    pub fn code(&self) -> &'static str {
        match self {
            ItemType::Audio => "AUD",
            ItemType::Visual => "VID",
            ItemType::AudioMobile => "AMB",
            ItemType::VisualMobile => "VMB",
        }
    }

    /// 转换为数据库存储字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ItemType::Audio => "AUDIO",
            ItemType::Visual => "VISUAL",
            ItemType::AudioMobile => "AUDIO_MOBILE",
            ItemType::VisualMobile => "VISUAL_MOBILE",
        }
    }

    /// 从名称或分类代码解析（大小写不敏感）
    ///
    /// # 示例
    /// - "AUDIO" / "audio" / "AUD" → Audio
    /// - "audio_mobile" / "AudioMobile" / "AMB" → AudioMobile
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        ItemType::ALL.into_iter().find(|t| {
            normalized == t.code() || normalized == t.to_db_str().replace('_', "")
        })
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Audio => write!(f, "Audio"),
            ItemType::Visual => write!(f, "Visual"),
            ItemType::AudioMobile => write!(f, "AudioMobile"),
            ItemType::VisualMobile => write!(f, "VisualMobile"),
        }
    }
}

// ==========================================
// 生产记录生命周期 (Production Stage)
// ==========================================
// Pending → SerialAssigned → Persisted，单向推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStage {
    Pending,        // 未持久化，尚无序列号
    SerialAssigned, // 未持久化，已生成序列号
    Persisted,      // 已由存储层分配 production_id
}

impl fmt::Display for ProductionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionStage::Pending => write!(f, "PENDING"),
            ProductionStage::SerialAssigned => write!(f, "SERIAL_ASSIGNED"),
            ProductionStage::Persisted => write!(f, "PERSISTED"),
        }
    }
}
