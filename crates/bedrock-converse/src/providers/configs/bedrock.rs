use super::base::ProviderConfig;
use anyhow::{anyhow, Result};

pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, PartialEq)]
pub struct BedrockProviderConfig {
    /// Base URL of the bedrock runtime, without the `/model/...` path
    pub host: String,
    pub region: String,
    /// Bedrock API key, sent as a bearer token
    pub api_key: String,
}

impl BedrockProviderConfig {
    pub fn new(host: String, region: String, api_key: String) -> Self {
        Self {
            host,
            region,
            api_key,
        }
    }

    pub fn default_host(region: &str) -> String {
        format!("https://bedrock-runtime.{}.amazonaws.com", region)
    }
}

impl ProviderConfig for BedrockProviderConfig {
    fn from_env() -> Result<Self> {
        let api_key = Self::get_env("AWS_BEARER_TOKEN_BEDROCK", true, None)?
            .ok_or_else(|| anyhow!("Bedrock API key should be present"))?;

        let region = match Self::get_env("AWS_REGION", false, None)? {
            Some(region) => region,
            None => Self::get_env("AWS_DEFAULT_REGION", false, Some(DEFAULT_REGION.to_string()))?
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        };

        let host = Self::get_env("BEDROCK_RUNTIME_ENDPOINT", false, None)?
            .unwrap_or_else(|| Self::default_host(&region));

        Ok(Self::new(host, region, api_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 4] = [
        "AWS_BEARER_TOKEN_BEDROCK",
        "AWS_REGION",
        "AWS_DEFAULT_REGION",
        "BEDROCK_RUNTIME_ENDPOINT",
    ];

    fn clean_env() {
        for key in VARS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clean_env();
        env::set_var("AWS_BEARER_TOKEN_BEDROCK", "test-key");

        let config = BedrockProviderConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.host, "https://bedrock-runtime.us-east-1.amazonaws.com");

        clean_env();
    }

    #[test]
    #[serial]
    fn test_region_fallback_and_endpoint_override() {
        clean_env();
        env::set_var("AWS_BEARER_TOKEN_BEDROCK", "test-key");
        env::set_var("AWS_DEFAULT_REGION", "eu-west-1");

        let config = BedrockProviderConfig::from_env().unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.host, "https://bedrock-runtime.eu-west-1.amazonaws.com");

        env::set_var("AWS_REGION", "us-west-2");
        env::set_var("BEDROCK_RUNTIME_ENDPOINT", "http://localhost:4566");
        let config = BedrockProviderConfig::from_env().unwrap();
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.host, "http://localhost:4566");

        clean_env();
    }

    #[test]
    #[serial]
    fn test_missing_api_key() {
        clean_env();

        let err = BedrockProviderConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("AWS_BEARER_TOKEN_BEDROCK"));
    }
}
