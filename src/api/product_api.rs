// ==========================================
// 产品生产追踪系统 - 产品目录 API
// ==========================================
// 职责: 产品创建、查询
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::product::{Product, ProductDetails};
use crate::domain::types::ItemType;
use crate::repository::product_repo::ProductRepository;

// ==========================================
// ProductApi - 产品目录 API
// ==========================================

/// 产品目录API
///
/// 职责：
/// 1. 产品创建（名称、厂商、分类校验）
/// 2. 产品查询（单个、全部、按分类）
pub struct ProductApi {
    product_repo: Arc<ProductRepository>,
}

impl ProductApi {
    /// 创建新的ProductApi实例
    pub fn new(product_repo: Arc<ProductRepository>) -> Self {
        Self { product_repo }
    }

    /// 创建产品
    ///
    /// # 参数
    /// - request: 产品字段；item_type 接受分类名称或分类代码
    ///
    /// # 返回
    /// - Ok(ProductInfo): 已入库的产品
    /// - Err(ApiError): 校验失败或数据库错误
    pub fn create_product(&self, request: CreateProductRequest) -> ApiResult<ProductInfo> {
        let item_type = ItemType::parse(&request.item_type).ok_or_else(|| {
            ApiError::InvalidInput(format!("未知的产品分类: {}", request.item_type))
        })?;

        let product = match (request.supported_audio_formats, request.supported_playlist_formats) {
            (None, None) => Product::new(request.name, request.manufacturer, item_type)?,
            (audio, playlist) => {
                if item_type != ItemType::Audio {
                    return Err(ApiError::InvalidInput(format!(
                        "只有 Audio 分类的产品可以设置音频格式: {}",
                        item_type
                    )));
                }
                let none = crate::domain::product::UNSPECIFIED_FORMATS;
                Product::audio_player(
                    request.name,
                    request.manufacturer,
                    audio.unwrap_or_else(|| none.to_string()),
                    playlist.unwrap_or_else(|| none.to_string()),
                )?
            }
        };

        let product_id = self.product_repo.insert(&product)?;
        let product = product.with_id(product_id);

        tracing::info!(
            product_id,
            name = product.name(),
            item_type = %product.item_type(),
            "产品已创建"
        );

        Ok(ProductInfo::from(&product))
    }

    /// 查询产品
    pub fn get_product(&self, product_id: i64) -> ApiResult<ProductInfo> {
        Ok(ProductInfo::from(&self.load_product(product_id)?))
    }

    /// 加载领域对象（供其他 API 复用）
    pub(crate) fn load_product(&self, product_id: i64) -> ApiResult<Product> {
        self.product_repo
            .find_by_id(product_id)?
            .ok_or_else(|| ApiError::NotFound(format!("产品(id={})不存在", product_id)))
    }

    /// 查询全部产品
    pub fn list_products(&self) -> ApiResult<Vec<ProductInfo>> {
        let products = self.product_repo.list_all()?;
        Ok(products.iter().map(ProductInfo::from).collect())
    }

    /// 按分类查询
    pub fn list_products_by_type(&self, item_type: ItemType) -> ApiResult<Vec<ProductInfo>> {
        let products = self.product_repo.find_by_item_type(item_type)?;
        Ok(products.iter().map(ProductInfo::from).collect())
    }
}

// ==========================================
// DTO 定义
// ==========================================

/// 创建产品请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub manufacturer: String,
    pub item_type: String,
    /// 设置任一格式即创建音频播放器
    pub supported_audio_formats: Option<String>,
    pub supported_playlist_formats: Option<String>,
}

impl CreateProductRequest {
    /// 普通产品请求
    pub fn generic(name: &str, manufacturer: &str, item_type: &str) -> Self {
        Self {
            name: name.to_string(),
            manufacturer: manufacturer.to_string(),
            item_type: item_type.to_string(),
            supported_audio_formats: None,
            supported_playlist_formats: None,
        }
    }
}

/// 产品信息（用于前端展示）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub product_id: i64,
    pub name: String,
    pub simple_name: String,
    pub manufacturer: String,
    pub item_type: String,
    pub item_type_code: String,
    pub product_kind: String,
    pub supported_audio_formats: Option<String>,
    pub supported_playlist_formats: Option<String>,
}

impl From<&Product> for ProductInfo {
    fn from(product: &Product) -> Self {
        let (audio, playlist) = match product.details() {
            ProductDetails::AudioPlayer {
                supported_audio_formats,
                supported_playlist_formats,
            } => (
                Some(supported_audio_formats.clone()),
                Some(supported_playlist_formats.clone()),
            ),
            ProductDetails::Generic => (None, None),
        };

        Self {
            product_id: product.id(),
            name: product.name().to_string(),
            simple_name: product.simple_name(),
            manufacturer: product.manufacturer().to_string(),
            item_type: product.item_type().to_string(),
            item_type_code: product.item_type().code().to_string(),
            product_kind: product.details().kind_str().to_string(),
            supported_audio_formats: audio,
            supported_playlist_formats: playlist,
        }
    }
}
