// ==========================================
// ProductionApi 集成测试
// ==========================================
// 测试范围:
// 1. 生产录入: record_production（序列号生成、计数器、校验）
// 2. 生产日志: list_production_log, find_by_serial, get_production
// 3. 导出: export_production_log_csv
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use production_tracker::api::ApiError;
use production_tracker::config::config_keys;
use production_tracker::ProductionStage;

// ==========================================
// 生产录入测试
// ==========================================

#[test]
fn test_record_production_generates_serial() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let product = env.create_product("SoundBlaster", "Acme", "AUDIO");

    let entry = env
        .state
        .production_api
        .record_production(product.product_id, 10, ts(1, 8))
        .expect("录入失败");

    assert!(entry.production_id > 0);
    assert_eq!(entry.serial_number, "AcmAUD00001");
    assert_eq!(entry.quantity, 10);
    assert_eq!(entry.product_name, "SoundBlaster");
    assert_eq!(entry.stage, ProductionStage::Persisted);
}

#[test]
fn test_counters_are_per_manufacturer_prefix_and_type() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let acme_audio = env.create_product("SoundBlaster", "Acme", "AUDIO");
    let acme_other = env.create_product("Tube", "Acme Corp", "AUDIO");
    let bb_video = env.create_product("Tube TV", "BB", "VID");

    let api = &env.state.production_api;
    let s1 = api.record_production(acme_audio.product_id, 1, ts(1, 8)).unwrap();
    let s2 = api.record_production(acme_other.product_id, 1, ts(1, 9)).unwrap();
    let s3 = api.record_production(bb_video.product_id, 1, ts(1, 10)).unwrap();
    let s4 = api.record_production(acme_audio.product_id, 1, ts(1, 11)).unwrap();

    // "Acme" 与 "Acme Corp" 前缀相同，共享计数器
    assert_eq!(s1.serial_number, "AcmAUD00001");
    assert_eq!(s2.serial_number, "AcmAUD00002");
    assert_eq!(s3.serial_number, "BBVID00001");
    assert_eq!(s4.serial_number, "AcmAUD00003");
}

#[test]
fn test_counter_start_from_config() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.state
        .config_manager
        .set_global_config_value(config_keys::SERIAL_COUNTER_START, "99999")
        .unwrap();
    let product = env.create_product("Bravia", "Sony", "VISUAL");

    let api = &env.state.production_api;
    let first = api.record_production(product.product_id, 1, ts(2, 8)).unwrap();
    let second = api.record_production(product.product_id, 1, ts(2, 9)).unwrap();

    assert_eq!(first.serial_number, "SonVID99999");
    // 超出 5 位不截断
    assert_eq!(second.serial_number, "SonVID100000");
}

#[test]
fn test_record_production_unknown_product() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let err = env
        .state
        .production_api
        .record_production(12345, 1, ts(1, 8))
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_record_production_rejects_non_positive_quantity() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let product = env.create_product("SoundBlaster", "Acme", "AUDIO");

    let err = env
        .state
        .production_api
        .record_production(product.product_id, 0, ts(1, 8))
        .unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));

    // 校验失败不消耗计数器
    let entry = env
        .state
        .production_api
        .record_production(product.product_id, 1, ts(1, 9))
        .unwrap();
    assert_eq!(entry.serial_number, "AcmAUD00001");
}

// ==========================================
// 生产日志测试
// ==========================================

#[test]
fn test_production_log_newest_first_with_limit() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let product = env.create_product("iPod", "Apple", "AUDIO_MOBILE");
    let api = &env.state.production_api;

    api.record_production(product.product_id, 1, ts(3, 8)).unwrap();
    api.record_production(product.product_id, 2, ts(5, 8)).unwrap();
    api.record_production(product.product_id, 3, ts(4, 8)).unwrap();

    let log = api.list_production_log(None).unwrap();
    let quantities: Vec<i32> = log.iter().map(|e| e.quantity).collect();
    assert_eq!(quantities, vec![2, 3, 1]);

    assert_eq!(api.list_production_log(Some(2)).unwrap().len(), 2);
    assert!(matches!(
        api.list_production_log(Some(0)),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_production_history_for_product() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let ipod = env.create_product("iPod", "Apple", "AUDIO_MOBILE");
    let zune = env.create_product("Zune", "Microsoft", "AUDIO_MOBILE");
    let api = &env.state.production_api;

    api.record_production(ipod.product_id, 1, ts(5, 8)).unwrap();
    api.record_production(zune.product_id, 9, ts(4, 8)).unwrap();
    api.record_production(ipod.product_id, 2, ts(3, 8)).unwrap();

    let history = api.list_production_for_product(ipod.product_id).unwrap();
    let quantities: Vec<i32> = history.iter().map(|e| e.quantity).collect();
    assert_eq!(quantities, vec![2, 1]);
    assert!(history.iter().all(|e| e.product_id == ipod.product_id));

    assert!(matches!(
        api.list_production_for_product(999),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_find_by_serial_and_get_production() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let product = env.create_product("iPod", "Apple", "AUDIO_MOBILE");
    let api = &env.state.production_api;

    let recorded = api.record_production(product.product_id, 4, ts(1, 8)).unwrap();
    assert_eq!(recorded.serial_number, "AppAMB00001");

    let found = api.find_by_serial("AppAMB00001").unwrap().unwrap();
    assert_eq!(found, recorded);
    assert!(api.find_by_serial("AppAMB00002").unwrap().is_none());
    assert!(api.find_by_serial("  ").is_err());

    assert_eq!(api.get_production(recorded.production_id).unwrap(), recorded);
    assert!(matches!(
        api.get_production(999),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn test_display_line_format() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let product = env.create_product("  Sound   Blaster ", "Acme", "AUDIO");

    let entry = env
        .state
        .production_api
        .record_production(product.product_id, 7, ts(1, 8))
        .unwrap();

    assert_eq!(
        entry.display_line(),
        format!(
            "Prod. Num: {} Product Name: Sound Blaster Serial Num: AcmAUD00001 Quantity: 7 Date: 2024-06-01 08:00:00",
            entry.production_id
        )
    );
}

// ==========================================
// 导出测试
// ==========================================

#[test]
fn test_export_production_log_csv() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let product = env.create_product("SoundBlaster", "Acme", "AUDIO");
    let api = &env.state.production_api;
    api.record_production(product.product_id, 1, ts(1, 8)).unwrap();
    api.record_production(product.product_id, 2, ts(2, 8)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let rows = api.export_production_log_csv(&path).unwrap();
    assert_eq!(rows, 2);

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "production_id,product_id,product_name,manufacturer,item_type,quantity,serial_number,manufactured_on,stage"
    );
    assert!(lines.next().unwrap().contains("AcmAUD00002"));
    assert!(lines.next().unwrap().contains("AcmAUD00001"));
    assert!(lines.next().is_none());
}

#[test]
fn test_export_ignores_display_limit() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.state
        .config_manager
        .set_global_config_value(config_keys::PRODUCTION_LOG_LIMIT, "1")
        .unwrap();
    let product = env.create_product("SoundBlaster", "Acme", "AUDIO");
    let api = &env.state.production_api;
    api.record_production(product.product_id, 1, ts(1, 8)).unwrap();
    api.record_production(product.product_id, 2, ts(2, 8)).unwrap();

    // 展示受限，导出不受限
    assert_eq!(api.list_production_log(None).unwrap().len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let rows = api.export_production_log_csv(&path).unwrap();
    assert_eq!(rows, 2);

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 3);
    assert!(content.contains("AcmAUD00001"));
    assert!(content.contains("AcmAUD00002"));
}

#[test]
fn test_export_uses_configured_delimiter() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.state
        .config_manager
        .set_global_config_value(config_keys::CSV_DELIMITER, ";")
        .unwrap();
    let product = env.create_product("SoundBlaster", "Acme", "AUDIO");
    env.state
        .production_api
        .record_production(product.product_id, 1, ts(1, 8))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("log.csv");
    env.state.production_api.export_production_log_csv(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("production_id;product_id;"));
}
