use std::fs;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const ASSETS_JSON: &str = r#"[
        {"asset_id": "a-eth", "asset": "ETH/USD"},
        {"asset_id": "a-cngn", "asset": "CNGN/USD", "address": "0x52828daa48C1a9A06F37e9555357AC16416cA921"}
    ]"#;

    pub async fn create_mock_price_service() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/assets"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ASSETS_JSON))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/prices/last"))
            .and(query_param("asset", "a-eth"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"value": 200000, "expo": -2, "price_changes": [
                    {"period": "7d", "change": -50.0, "change_pct": -2.5,
                     "from_price": 2050.0, "to_price": 2000.0,
                     "from_time": "2025-01-01T00:00:00Z", "to_time": "2025-01-08T00:00:00Z"}
                ]}"#,
            ))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/prices/last"))
            .and(query_param("asset", "a-cngn"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"value": 67, "expo": -3, "price_changes": []}"#),
            )
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
api:
  base_url: "{base_url}"
refresh_interval_ms: 1000
"#
        );
        std::fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_prices_command_with_mock_service() {
    let mock_server = test_utils::create_mock_price_service().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = oraclefeed::run_command(
        oraclefeed::AppCommand::Prices,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Prices command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_assets_command_with_mock_service() {
    let mock_server = test_utils::create_mock_price_service().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = oraclefeed::run_command(
        oraclefeed::AppCommand::Assets,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Assets command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_pair_command_with_mock_service() {
    let mock_server = test_utils::create_mock_price_service().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    info!("Resolving ETH/CNGN through the mock service");
    let result = oraclefeed::run_command(
        oraclefeed::AppCommand::Pair {
            from: "ETH".to_string(),
            to: "CNGN".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Pair command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_audit_command_with_mock_service() {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    let mock_server = test_utils::create_mock_price_service().await;
    Mock::given(method("GET"))
        .and(path("/prices/audit"))
        .and(query_param("from", "2025-01-01T00:00:00Z"))
        .and(query_param("to", "2025-01-08T00:00:00Z"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"prices": [{"asset": "ETH/USD", "value": 2000}]}"#),
        )
        .mount(&mock_server)
        .await;

    let config_file = test_utils::write_config(&mock_server.uri());

    let result = oraclefeed::run_command(
        oraclefeed::AppCommand::Audit {
            from: "2025-01-01T00:00:00Z".to_string(),
            to: "2025-01-08T00:00:00Z".to_string(),
            asset: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Audit command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_audit_command_rejects_bad_timestamp() {
    let mock_server = test_utils::create_mock_price_service().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = oraclefeed::run_command(
        oraclefeed::AppCommand::Audit {
            from: "yesterday".to_string(),
            to: "2025-01-08T00:00:00Z".to_string(),
            asset: None,
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_err(), "Expected invalid timestamp to be rejected");
}

#[test_log::test(tokio::test)]
async fn test_prices_command_fails_when_catalog_unreachable() {
    // No mock server: the catalog endpoint is unreachable, and a catalog
    // failure cannot degrade per-asset, so the command fails.
    let config_file = test_utils::write_config("http://127.0.0.1:9");

    let result = oraclefeed::run_command(
        oraclefeed::AppCommand::Prices,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_config_rejecting_inverted_ttls() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        "price_ttl_ms: 10000\nall_prices_ttl_ms: 5000\n",
    )
    .expect("Failed to write config file");

    let result = oraclefeed::run_command(
        oraclefeed::AppCommand::Assets,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_err(), "Expected inverted TTL config to be rejected");
}
