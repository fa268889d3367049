//! Server Configuration

/// Settings read from the environment (after `.env` is loaded)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,

    /// `STATIC_DIR`: built frontend
    pub static_dir: String,

    /// `PUBLIC_ORIGIN`: used to build approval URLs
    pub public_origin: String,

    /// `DEV_USER_ID`: identity reported by `/api/me`; unset means signed out
    pub dev_user_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            static_dir: "static".into(),
            public_origin: "http://localhost:3000".into(),
            dev_user_id: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            static_dir: std::env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
            public_origin: std::env::var("PUBLIC_ORIGIN")
                .map(|o| o.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_origin),
            dev_user_id: std::env::var("DEV_USER_ID").ok().filter(|id| !id.is_empty()),
        }
    }
}
