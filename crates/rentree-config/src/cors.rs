use std::env;

#[derive(Clone, Debug)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        Self { allowed_origins }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_skips_empty() {
        let origins = parse_origins(" http://a.test , ,http://b.test,");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }
}
