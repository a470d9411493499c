// ==========================================
// 产品生产追踪系统 - 主入口
// ==========================================
// 用法:
//   production-tracker products
//   production-tracker add-product <name> <manufacturer> <item_type>
//   production-tracker produce <product_id> <quantity>
//   production-tracker log [limit]
//   production-tracker history <product_id>
//   production-tracker export <csv_path>
//   production-tracker tab <tab_id>
// ==========================================

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use production_tracker::api::{ApiError, CreateProductRequest};
use production_tracker::app::{get_default_db_path, AppState};

fn main() -> ExitCode {
    production_tracker::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", production_tracker::APP_NAME);
    tracing::info!("系统版本: {}", production_tracker::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("无法初始化AppState: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&state, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(state: &AppState, args: &[String]) -> anyhow::Result<()> {
    match args.first().map(String::as_str) {
        None | Some("products") => {
            for p in state.product_api.list_products()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    p.product_id, p.simple_name, p.manufacturer, p.item_type
                );
            }
        }
        Some("add-product") => {
            let created = state.product_line_screen.add_product(CreateProductRequest::generic(
                arg(args, 1)?,
                arg(args, 2)?,
                arg(args, 3)?,
            ))?;
            println!("{}", created.product_id);
        }
        Some("produce") => {
            let product_id = parse_num(arg(args, 1)?)?;
            let quantity = i32::try_from(parse_num(arg(args, 2)?)?)
                .map_err(|_| ApiError::InvalidInput("数量超出范围".to_string()))?;
            let now = chrono::Local::now().naive_local();
            let entry = state
                .produce_screen
                .record_production(product_id, quantity, now)?;
            println!("{}", entry.serial_number);
        }
        Some("log") => {
            let limit = match args.get(1) {
                Some(s) => Some(parse_num(s)?.max(1) as usize),
                None => None,
            };
            for entry in state.production_api.list_production_log(limit)? {
                println!("{}", entry.display_line());
            }
        }
        Some("history") => {
            let product_id = parse_num(arg(args, 1)?)?;
            for entry in state.production_api.list_production_for_product(product_id)? {
                println!("{}", entry.display_line());
            }
        }
        Some("export") => {
            let path = arg(args, 1)?;
            let rows = state
                .production_api
                .export_production_log_csv(Path::new(path))
                .with_context(|| format!("导出生产日志到 {} 失败", path))?;
            println!("{}", rows);
        }
        Some("tab") => {
            let updated = state.root_controller.on_tab_selected(arg(args, 1)?);
            for screen in updated {
                println!("{}", screen);
            }
        }
        Some(other) => {
            anyhow::bail!("未知命令: {}", other);
        }
    }

    Ok(())
}

fn arg(args: &[String], i: usize) -> Result<&str, ApiError> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| ApiError::InvalidInput(format!("缺少第 {} 个参数", i)))
}

fn parse_num(s: &str) -> Result<i64, ApiError> {
    s.parse::<i64>()
        .map_err(|_| ApiError::InvalidInput(format!("不是整数: {}", s)))
}
