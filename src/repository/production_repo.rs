// ==========================================
// 产品生产追踪系统 - 生产记录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 红线: production_id 只能由本仓储在写入时分配 (0 → 非 0)
// 约束: 非空 serial_number 唯一 (idx_production_serial)
// ==========================================

use crate::domain::product::Product;
use crate::domain::production::ResolvedProduction;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::ProductRow;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

// 生产记录列 + 产品列（与 ProductRow::from_row 的列顺序一致）
const PRODUCTION_SELECT: &str = r#"
    SELECT
        pr.production_id, pr.quantity, pr.serial_number, pr.manufactured_on,
        p.product_id, p.name, p.manufacturer, p.item_type,
        p.product_kind, p.supported_audio_formats, p.supported_playlist_formats
    FROM production_record pr
    JOIN product p ON p.product_id = pr.product_id
"#;

struct ProductionRow {
    production_id: i64,
    quantity: i32,
    serial_number: String,
    manufactured_on: NaiveDateTime,
    product: ProductRow,
}

impl ProductionRow {
    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            production_id: row.get(0)?,
            quantity: row.get(1)?,
            serial_number: row.get(2)?,
            manufactured_on: row.get(3)?,
            product: ProductRow::from_row(row, 4)?,
        })
    }
}

/// 将查询行还原为 ResolvedProduction
///
/// 同一 product_id 的多条记录共享同一个 Arc<Product>
fn resolve_rows(rows: Vec<ProductionRow>) -> RepositoryResult<Vec<ResolvedProduction>> {
    let mut products: HashMap<i64, Arc<Product>> = HashMap::new();
    let mut out = Vec::with_capacity(rows.len());

    for row in rows {
        let product_id = row.product.product_id();
        let product = match products.get(&product_id) {
            Some(p) => Arc::clone(p),
            None => {
                let p = Arc::new(row.product.into_product()?);
                products.insert(product_id, Arc::clone(&p));
                p
            }
        };

        out.push(ResolvedProduction::new_from_storage(
            row.production_id,
            row.quantity,
            row.serial_number,
            row.manufactured_on,
            product,
        )?);
    }

    Ok(out)
}

// ==========================================
// ProductionRepository - 生产记录仓储
// ==========================================
pub struct ProductionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRepository {
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

    /// 持久化待写入的生产记录，并回写分配到的 production_id
    ///
    /// # 错误
    /// - InvalidStateTransition: 记录已持久化
    /// - UniqueConstraintViolation: 序列号重复
    /// - ForeignKeyViolation: 产品不存在
    pub fn insert(&self, production: &mut ResolvedProduction) -> RepositoryResult<i64> {
        if !production.record().is_pending() {
            return Err(RepositoryError::InvalidStateTransition {
                from: format!("{}(id={})", production.stage(), production.production_id()),
                to: "INSERT".to_string(),
            });
        }

        let production_id = {
            let conn = self.get_conn()?;
            conn.execute(
                r#"
                INSERT INTO production_record (
                    product_id, quantity, serial_number, manufactured_on
                ) VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    production.record().product_id(),
                    production.quantity(),
                    production.serial_number(),
                    production.manufactured_on(),
                ],
            )?;
            conn.last_insert_rowid()
        };

        production.assign_production_id(production_id)?;
        Ok(production_id)
    }

    /// 按主键查询（含产品）
    pub fn find_by_id(&self, production_id: i64) -> RepositoryResult<Option<ResolvedProduction>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE pr.production_id = ?1", PRODUCTION_SELECT);

        let row = conn
            .query_row(&sql, params![production_id], ProductionRow::from_row)
            .optional()?;

        match row {
            Some(row) => Ok(resolve_rows(vec![row])?.pop()),
            None => Ok(None),
        }
    }

    /// 按序列号查询
    pub fn find_by_serial(&self, serial_number: &str) -> RepositoryResult<Option<ResolvedProduction>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE pr.serial_number = ?1", PRODUCTION_SELECT);

        let row = conn
            .query_row(&sql, params![serial_number], ProductionRow::from_row)
            .optional()?;

        match row {
            Some(row) => Ok(resolve_rows(vec![row])?.pop()),
            None => Ok(None),
        }
    }

    /// 生产日志（按生产时间倒序）
    ///
    /// # 参数
    /// - limit: 最多返回条数
    pub fn list_log(&self, limit: usize) -> RepositoryResult<Vec<ResolvedProduction>> {
        self.query_log(limit as i64)
    }

    /// 全部生产日志（按生产时间倒序，不限条数，用于导出）
    pub fn list_all_for_export(&self) -> RepositoryResult<Vec<ResolvedProduction>> {
        // SQLite: LIMIT -1 不限条数
        self.query_log(-1)
    }

    fn query_log(&self, limit: i64) -> RepositoryResult<Vec<ResolvedProduction>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} ORDER BY pr.manufactured_on DESC, pr.production_id DESC LIMIT ?1",
            PRODUCTION_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(params![limit], ProductionRow::from_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        resolve_rows(rows)
    }

    /// 查询某产品的全部生产记录
    pub fn list_by_product(&self, product_id: i64) -> RepositoryResult<Vec<ResolvedProduction>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE pr.product_id = ?1 ORDER BY pr.manufactured_on ASC, pr.production_id ASC",
            PRODUCTION_SELECT
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt
            .query_map(params![product_id], ProductionRow::from_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        resolve_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ItemType, ProductionStage};
    use crate::repository::product_repo::ProductRepository;
    use chrono::NaiveDate;

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn ts(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn stored_product(conn: &Arc<Mutex<Connection>>) -> Arc<Product> {
        let repo = ProductRepository::new(conn.clone());
        let product = Product::new("SoundBlaster", "Acme", ItemType::Audio).unwrap();
        let id = repo.insert(&product).unwrap();
        Arc::new(product.with_id(id))
    }

    #[test]
    fn test_insert_assigns_production_id() {
        let conn = setup_test_db();
        let repo = ProductionRepository::new(conn.clone());
        let product = stored_product(&conn);

        let mut production = ResolvedProduction::new_pending(product, 3, ts(1)).unwrap();
        production.generate_serial_number(1).unwrap();
        let id = repo.insert(&mut production).unwrap();

        assert!(id > 0);
        assert_eq!(production.production_id(), id);
        assert_eq!(production.stage(), ProductionStage::Persisted);

        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.serial_number(), "AcmAUD00001");
        assert_eq!(found.quantity(), 3);
        assert_eq!(found.manufactured_on(), ts(1));
        assert_eq!(found.product_simple_name(), "SoundBlaster");
    }

    #[test]
    fn test_insert_rejects_persisted_record() {
        let conn = setup_test_db();
        let repo = ProductionRepository::new(conn.clone());
        let product = stored_product(&conn);

        let mut production = ResolvedProduction::new_with_id(5, 1, ts(1), product).unwrap();
        let err = repo.insert(&mut production).unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidStateTransition { .. }));
        assert!(repo.list_all_for_export().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_serial_rejected() {
        let conn = setup_test_db();
        let repo = ProductionRepository::new(conn.clone());
        let product = stored_product(&conn);

        let mut first = ResolvedProduction::new_pending(product.clone(), 1, ts(1)).unwrap();
        first.generate_serial_number(9).unwrap();
        repo.insert(&mut first).unwrap();

        let mut second = ResolvedProduction::new_pending(product, 1, ts(2)).unwrap();
        second.generate_serial_number(9).unwrap();
        let err = repo.insert(&mut second).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
        assert_eq!(second.production_id(), 0);
    }

    #[test]
    fn test_unknown_product_rejected() {
        let conn = setup_test_db();
        let repo = ProductionRepository::new(conn);
        let ghost = Arc::new(
            Product::new("Ghost", "Nobody", ItemType::Visual)
                .unwrap()
                .with_id(404),
        );

        let mut production = ResolvedProduction::new_pending(ghost, 1, ts(1)).unwrap();
        let err = repo.insert(&mut production).unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }

    #[test]
    fn test_list_log_newest_first_and_shares_products() {
        let conn = setup_test_db();
        let repo = ProductionRepository::new(conn.clone());
        let product = stored_product(&conn);

        for (day, counter) in [(1, 1), (3, 2), (2, 3)] {
            let mut p = ResolvedProduction::new_pending(product.clone(), 1, ts(day)).unwrap();
            p.generate_serial_number(counter).unwrap();
            repo.insert(&mut p).unwrap();
        }

        let log = repo.list_log(10).unwrap();
        let days: Vec<_> = log.iter().map(|p| p.manufactured_on()).collect();
        assert_eq!(days, vec![ts(3), ts(2), ts(1)]);
        assert!(Arc::ptr_eq(log[0].product(), log[1].product()));

        assert_eq!(repo.list_log(2).unwrap().len(), 2);
        assert_eq!(repo.list_all_for_export().unwrap().len(), 3);
        assert_eq!(repo.list_by_product(product.id()).unwrap().len(), 3);
        assert!(repo.find_by_serial("AcmAUD00002").unwrap().is_some());
        assert!(repo.find_by_serial("AcmAUD99999").unwrap().is_none());
    }
}
