// ==========================================
// ProductApi 集成测试
// ==========================================
// 测试范围:
// 1. 产品创建: 普通产品、音频播放器、校验失败
// 2. 产品查询: get_product, list_products, list_products_by_type
// ==========================================

mod helpers;

use helpers::api_test_helper::*;
use production_tracker::api::{ApiError, CreateProductRequest};
use production_tracker::ItemType;

#[test]
fn test_create_generic_product() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let info = env.create_product("  Zune   HD ", "Microsoft", "audio_mobile");

    assert!(info.product_id > 0);
    assert_eq!(info.simple_name, "Zune HD");
    assert_eq!(info.item_type, "AudioMobile");
    assert_eq!(info.item_type_code, "AMB");
    assert_eq!(info.product_kind, "GENERIC");
    assert_eq!(info.supported_audio_formats, None);

    let loaded = env.state.product_api.get_product(info.product_id).unwrap();
    assert_eq!(loaded, info);
}

#[test]
fn test_create_audio_player_defaults_missing_format() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let info = env
        .state
        .product_api
        .create_product(CreateProductRequest {
            name: "DP-X1A".to_string(),
            manufacturer: "Onkyo".to_string(),
            item_type: "AUD".to_string(),
            supported_audio_formats: Some("DSD, FLAC".to_string()),
            supported_playlist_formats: None,
        })
        .unwrap();

    assert_eq!(info.product_kind, "AUDIO_PLAYER");
    assert_eq!(info.supported_audio_formats.as_deref(), Some("DSD, FLAC"));
    assert_eq!(info.supported_playlist_formats.as_deref(), Some("N/A"));
}

#[test]
fn test_audio_formats_rejected_for_visual_product() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");

    let err = env
        .state
        .product_api
        .create_product(CreateProductRequest {
            name: "Bravia".to_string(),
            manufacturer: "Sony".to_string(),
            item_type: "VISUAL".to_string(),
            supported_audio_formats: Some("MP3".to_string()),
            supported_playlist_formats: None,
        })
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_validation_failures() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    let api = &env.state.product_api;

    assert!(matches!(
        api.create_product(CreateProductRequest::generic("", "Acme", "AUDIO")),
        Err(ApiError::ValidationError(_))
    ));
    assert!(matches!(
        api.create_product(CreateProductRequest::generic("iPod", " ", "AUDIO")),
        Err(ApiError::ValidationError(_))
    ));
    assert!(matches!(
        api.create_product(CreateProductRequest::generic("iPod", "Apple", "toaster")),
        Err(ApiError::InvalidInput(_))
    ));
    assert!(api.list_products().unwrap().is_empty());
}

#[test]
fn test_list_products_and_filter_by_type() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    env.create_product("iPod", "Apple", "AUDIO_MOBILE");
    env.create_product("Bravia", "Sony", "VISUAL");
    env.create_product("Zune", "Microsoft", "AUDIO_MOBILE");

    let all = env.state.product_api.list_products().unwrap();
    let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bravia", "iPod", "Zune"]);

    let mobile = env
        .state
        .product_api
        .list_products_by_type(ItemType::AudioMobile)
        .unwrap();
    assert_eq!(mobile.len(), 2);
}

#[test]
fn test_get_missing_product() {
    let env = ApiTestEnv::new().expect("无法创建测试环境");
    assert!(matches!(
        env.state.product_api.get_product(77),
        Err(ApiError::NotFound(_))
    ));
}
