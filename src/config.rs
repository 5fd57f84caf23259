use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // HTTP API settings
    pub listen_addr: String,
    pub db_path: String,
    pub debug: bool,

    // External geolocation provider settings
    pub api_base_url: String,
    pub api_access_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            db_path: "geolocations.db".to_string(),
            debug: false,
            api_base_url: "https://api.ipstack.com".to_string(),
            api_access_key: String::new(),
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let listen_addr =
        std::env::var("GEOLOC_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let db_path =
        std::env::var("GEOLOC_DB_PATH").unwrap_or_else(|_| "geolocations.db".to_string());

    let debug = std::env::var("DEBUG").is_ok();

    let api_base_url = std::env::var("GEOLOC_API_BASE_URL")
        .unwrap_or_else(|_| "https://api.ipstack.com".to_string());

    // The provider key comes from the environment, never from code
    let api_access_key = std::env::var("GEOLOCATION_API_KEY").unwrap_or_default();

    Ok(Config {
        listen_addr,
        db_path,
        debug,
        api_base_url,
        api_access_key,
    })
}
