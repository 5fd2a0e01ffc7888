//! Server Configuration

/// Environment-derived settings
///
/// The token route reads `NEXT_PUBLIC_BACKEND_URL` while the payment route
/// reads `BACKEND_URL`. Both are expected to name the same backend; they are
/// kept separate so existing deployments keep working.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,

    /// Backend base URL used by `POST /api/process-payment`
    pub backend_url: Option<String>,

    /// Backend base URL used by `GET /api/client-token`
    pub public_backend_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            backend_url: None,
            public_backend_url: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            backend_url: non_empty_var("BACKEND_URL"),
            public_backend_url: non_empty_var("NEXT_PUBLIC_BACKEND_URL"),
        }
    }

    /// Both URLs are set but point at different backends
    pub fn backends_diverge(&self) -> bool {
        match (&self.backend_url, &self.public_backend_url) {
            (Some(private), Some(public)) => {
                private.trim_end_matches('/') != public.trim_end_matches('/')
            }
            _ => false,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backends_diverge() {
        let mut config = ServerConfig {
            backend_url: Some("http://localhost:8001".into()),
            public_backend_url: Some("http://localhost:8001/".into()),
            ..Default::default()
        };
        assert!(!config.backends_diverge());

        config.public_backend_url = Some("https://api.example.com".into());
        assert!(config.backends_diverge());

        config.public_backend_url = None;
        assert!(!config.backends_diverge());
    }
}
