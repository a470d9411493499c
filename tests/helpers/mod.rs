pub mod api_test_helper;
