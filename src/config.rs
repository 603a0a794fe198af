use clap::Parser;

pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";

#[derive(Debug, Clone, Parser)]
#[command(name = "llm-battle")]
#[command(about = "Compare summaries from two language models side by side", long_about = None)]
pub struct AppConfig {
    #[arg(long, env = "BATTLE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[arg(long, env = "BATTLE_NO_PROMPT", default_value_t = false)]
    pub no_prompt: bool,
}

impl AppConfig {
    pub fn from_env_and_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        let url = url::Url::parse(&self.api_url)
            .map_err(|_| "Invalid BATTLE_API_URL format".to_string())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!("unsupported api url scheme: {}", url.scheme()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_url: &str) -> AppConfig {
        AppConfig {
            api_url: api_url.to_string(),
            no_prompt: false,
        }
    }

    #[test]
    fn default_url_is_valid() {
        let cfg = AppConfig::try_parse_from(["llm-battle"]).expect("parse");
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_malformed_and_non_http_urls() {
        assert!(config("not a url").validate().is_err());
        let err = config("ftp://example.com/api").validate().unwrap_err();
        assert!(err.contains("ftp"));
    }
}
