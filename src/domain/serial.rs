// ==========================================
// 产品生产追踪系统 - 序列号生成规则
// ==========================================
// 序列号 = 厂商前缀 + 分类代码 + 左补零计数器
// 例: "Acme" + Audio(AUD) + 42 → "AcmAUD00042"
// ==========================================

use crate::domain::error::{require_non_blank, DomainError, DomainResult};
use crate::domain::types::ItemType;

/// 厂商前缀最大长度（按字符计）
pub const MANUFACTURER_PREFIX_LEN: usize = 3;

/// 计数器补零宽度
pub const SERIAL_COUNTER_WIDTH: usize = 5;

/// 截取厂商前缀
///
/// 厂商名长度超过 3 个字符时取前 3 个字符，否则原样返回。
/// 按 Unicode 字符截取，不会切断多字节字符。
pub fn manufacturer_prefix(manufacturer: &str) -> &str {
    match manufacturer.char_indices().nth(MANUFACTURER_PREFIX_LEN) {
        Some((byte_idx, _)) => &manufacturer[..byte_idx],
        None => manufacturer,
    }
}

/// 左侧填充到指定宽度
///
/// 已达到或超过宽度的值原样返回（不截断）。
pub fn pad_left(value: &str, width: usize, pad: char) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(pad).take(width - len));
    out.push_str(value);
    out
}

/// 计数器补零
///
/// # 示例
/// - 42 → "00042"
/// - 123456 → "123456"（超出宽度不截断）
pub fn pad_counter(counter: i64) -> DomainResult<String> {
    if counter < 0 {
        return Err(DomainError::validation(
            "serial_counter",
            format!("序列号计数器不能为负数: {}", counter),
        ));
    }
    Ok(pad_left(&counter.to_string(), SERIAL_COUNTER_WIDTH, '0'))
}

/// 拼接序列号（无分隔符）
///
/// # 错误
/// - 厂商为空
/// - 计数器为负
pub fn compose_serial(
    manufacturer: &str,
    item_type: ItemType,
    counter: i64,
) -> DomainResult<String> {
    require_non_blank("manufacturer", manufacturer)?;
    let padded = pad_counter(counter)?;
    Ok(format!(
        "{}{}{}",
        manufacturer_prefix(manufacturer),
        item_type.code(),
        padded
    ))
}

/// 序列号计数器的作用域（厂商前缀 + 分类代码）
///
/// 同一作用域内计数器单调递增即可保证序列号唯一。
pub fn counter_scope(manufacturer: &str, item_type: ItemType) -> String {
    format!("{}{}", manufacturer_prefix(manufacturer), item_type.code())
}
