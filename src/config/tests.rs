#[cfg(test)]
mod config_tests {
    use crate::config::{
        default_about_author, default_cookie_name, default_host, default_log_level,
        default_max_request_size, default_port, default_service_name, default_session_cleanup_interval,
        default_session_expiry, default_timeout, AboutConfig, Config, ConfigError, ServerConfig,
    };
    use std::collections::HashMap;
    use std::time::Duration;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_vars(HashMap::new()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_seconds, 30);
        assert_eq!(config.server.max_request_size, 1024 * 1024);
        assert_eq!(config.session.cookie_name, "storefront_session");
        assert_eq!(config.session.expiry_seconds, 7200);
        assert!(!config.session.secure_cookie);
        assert_eq!(config.session.cleanup_interval(), Duration::from_secs(60));
        assert!(config.catalog.seed_demo_products);
        assert_eq!(config.about, AboutConfig::default());
        assert_eq!(config.observability.otlp_endpoint, None);
        assert!(!config.observability.enable_json_logging);
    }

    #[test]
    fn test_config_from_vars() {
        let config = Config::from_vars(vars(&[
            ("STOREFRONT_SERVER__PORT", "9000"),
            ("STOREFRONT_SERVER__HOST", "127.0.0.1"),
            ("STOREFRONT_SESSION__COOKIE_NAME", "cart_sid"),
            ("STOREFRONT_SESSION__EXPIRY_SECONDS", "60"),
            ("STOREFRONT_SESSION__CLEANUP_INTERVAL_SECONDS", "5"),
            ("STOREFRONT_CATALOG__SEED_DEMO_PRODUCTS", "false"),
            ("STOREFRONT_ABOUT__AUTHOR", "Developed by: Someone Else"),
            ("STOREFRONT_OBSERVABILITY__OTLP_ENDPOINT", "http://collector:4317"),
            ("STOREFRONT_OBSERVABILITY__LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.session.cookie_name, "cart_sid");
        assert_eq!(config.session.expiry_seconds, 60);
        assert_eq!(config.session.cleanup_interval_seconds, 5);
        assert!(!config.catalog.seed_demo_products);
        assert_eq!(config.about.author, "Developed by: Someone Else");
        assert_eq!(config.about.title, "About us - Online Store");
        assert_eq!(
            config.observability.otlp_endpoint,
            Some("http://collector:4317".to_string())
        );
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_validation_rejects_zero_port() {
        let result = Config::from_vars(vars(&[("STOREFRONT_SERVER__PORT", "0")]));
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = Config::default();
        config.server.request_timeout_seconds = 0;

        let error = config.validate().unwrap_err();
        assert_eq!(
            error.to_string(),
            "Validation error: Request timeout cannot be 0"
        );
    }

    #[test]
    fn test_validation_rejects_bad_session_settings() {
        let mut config = Config::default();
        config.session.cookie_name = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.expiry_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.session.cleanup_interval_seconds = 0;
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "Validation error: Session cleanup interval cannot be 0"
        );
    }

    #[test]
    fn test_unparseable_value_is_load_error() {
        let result = Config::from_vars(vars(&[("STOREFRONT_SERVER__PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::LoadError { .. })));
    }

    #[test]
    fn test_server_config_request_timeout() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
            request_timeout_seconds: 45,
            max_request_size: 1024,
        };

        assert_eq!(config.request_timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 8080);
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_max_request_size(), 1024 * 1024);
        assert_eq!(default_cookie_name(), "storefront_session");
        assert_eq!(default_session_expiry(), 7200);
        assert_eq!(default_session_cleanup_interval(), 60);
        assert_eq!(default_about_author(), "Developed by: Kenia Toscano");
        assert_eq!(default_service_name(), "storefront-rs");
        assert_eq!(default_log_level(), "info");
    }
}
