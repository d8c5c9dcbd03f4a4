#![allow(dead_code)]

use gitgrade::analysis::gemini::GeminiService;
use gitgrade::config::{GitHubSettings, ModelSettings};
use gitgrade::github::GitHubClient;
use gitgrade::Pipeline;
use std::path::PathBuf;
use std::sync::Arc;

pub const TEST_MODEL: &str = "gemini-2.5-flash";
pub const TEST_API_KEY: &str = "test-key";

pub fn get_test_data_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(file)
}

pub fn read_test_json(file: &str) -> String {
    std::fs::read_to_string(get_test_data_path(file)).expect("Failed to read test data")
}

pub fn setup_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub fn gemini_path() -> String {
    format!("/v1beta/models/{}:generateContent", TEST_MODEL)
}

/// Pipeline wired to mock GitHub and Gemini servers
pub fn create_test_pipeline(github_url: String, model_url: String) -> Pipeline {
    let github = GitHubClient::new(&GitHubSettings {
        api_base: github_url,
        ..GitHubSettings::default()
    })
    .expect("Failed to build GitHub client");

    let model = GeminiService::new(
        &ModelSettings {
            api_base: Some(model_url),
            api_key: Some(TEST_API_KEY.to_string()),
            ..ModelSettings::default()
        },
        TEST_MODEL.to_string(),
    )
    .expect("Failed to build model service");

    Pipeline::new(github, Arc::new(model))
}
