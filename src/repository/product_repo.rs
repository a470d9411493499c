// ==========================================
// 产品生产追踪系统 - 产品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 管理 product 表的写入与查询，product_id 由数据库分配
// ==========================================

use crate::domain::product::{Product, ProductDetails};
use crate::domain::types::ItemType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

const PRODUCT_COLUMNS: &str = r#"
    product_id, name, manufacturer, item_type,
    product_kind, supported_audio_formats, supported_playlist_formats
"#;

// product 表原始行
pub(crate) struct ProductRow {
    product_id: i64,
    name: String,
    manufacturer: String,
    item_type: String,
    product_kind: String,
    supported_audio_formats: Option<String>,
    supported_playlist_formats: Option<String>,
}

impl ProductRow {
    /// 按 PRODUCT_COLUMNS 的列顺序读取，offset 为起始列
    pub(crate) fn from_row(row: &Row<'_>, offset: usize) -> SqliteResult<Self> {
        Ok(Self {
            product_id: row.get(offset)?,
            name: row.get(offset + 1)?,
            manufacturer: row.get(offset + 2)?,
            item_type: row.get(offset + 3)?,
            product_kind: row.get(offset + 4)?,
            supported_audio_formats: row.get(offset + 5)?,
            supported_playlist_formats: row.get(offset + 6)?,
        })
    }

    pub(crate) fn product_id(&self) -> i64 {
        self.product_id
    }

    pub(crate) fn into_product(self) -> RepositoryResult<Product> {
        let item_type = ItemType::parse(&self.item_type).ok_or_else(|| {
            RepositoryError::InvalidStoredValue {
                field: "item_type".to_string(),
                message: format!("未知的产品分类: {}", self.item_type),
            }
        })?;

        let details = match self.product_kind.as_str() {
            "AUDIO_PLAYER" => ProductDetails::AudioPlayer {
                supported_audio_formats: self.supported_audio_formats.unwrap_or_default(),
                supported_playlist_formats: self.supported_playlist_formats.unwrap_or_default(),
            },
            "GENERIC" => ProductDetails::Generic,
            other => {
                return Err(RepositoryError::InvalidStoredValue {
                    field: "product_kind".to_string(),
                    message: format!("未知的产品变体: {}", other),
                })
            }
        };

        Ok(Product::restore(
            self.product_id,
            self.name,
            self.manufacturer,
            item_type,
            details,
        )?)
    }
}

// ==========================================
// ProductRepository - 产品仓储
// ==========================================
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入产品
    ///
    /// # 返回
    /// 数据库分配的 product_id（忽略入参中的 id）
    pub fn insert(&self, product: &Product) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;

        let (audio_formats, playlist_formats) = match product.details() {
            ProductDetails::AudioPlayer {
                supported_audio_formats,
                supported_playlist_formats,
            } => (
                Some(supported_audio_formats.as_str()),
                Some(supported_playlist_formats.as_str()),
            ),
            ProductDetails::Generic => (None, None),
        };

        conn.execute(
            r#"
            INSERT INTO product (
                name, manufacturer, item_type,
                product_kind, supported_audio_formats, supported_playlist_formats
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                product.name(),
                product.manufacturer(),
                product.item_type().to_db_str(),
                product.details().kind_str(),
                audio_formats,
                playlist_formats,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Product)): 找到产品
    /// - Ok(None): 未找到
    /// - Err: 数据库错误或数据不合法
    pub fn find_by_id(&self, product_id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM product WHERE product_id = ?1", PRODUCT_COLUMNS);

        let row = conn
            .query_row(&sql, params![product_id], |row| ProductRow::from_row(row, 0))
            .optional()?;

        row.map(ProductRow::into_product).transpose()
    }

    /// 查询全部产品（按名称排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM product ORDER BY name COLLATE NOCASE ASC, product_id ASC",
            PRODUCT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], |row| ProductRow::from_row(row, 0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// 按分类查询
    pub fn find_by_item_type(&self, item_type: ItemType) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM product WHERE item_type = ?1 ORDER BY name COLLATE NOCASE ASC",
            PRODUCT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(params![item_type.to_db_str()], |row| ProductRow::from_row(row, 0))?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }
}
