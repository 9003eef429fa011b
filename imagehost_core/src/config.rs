use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

static DATA_DIR_NAME: &str = "imagehost";
static DB_NAME: &str = "imagehost_db.sqlite";
static CONFIG_FILE_NAME: &str = "config.json";

// For now this directory structure should be like
// data_dir_path
// |- imagehost
//    |- imagehost_db.sqlite
//    |- config.json

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    ///
    /// `serde(default)` keeps backward compatibility with old config.json files.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    pub database_path: PathBuf,
}

impl AppConfig {
    /// Creates a new AppConfig with defaults and the specified data directory
    fn new(data_dir: PathBuf) -> Self {
        let listen_addr = default_listen_addr();
        let database_path = data_dir.join(DB_NAME);

        AppConfig {
            listen_addr,
            database_path,
        }
    }
}

/// Gets the existing config or initializes a new one if it doesn't exist
pub async fn get_or_init() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let data_dir = dirs::data_dir().expect("failed to find a data directory on this platform");

    let app_dir = data_dir.join(DATA_DIR_NAME);
    let config_path = app_dir.join(CONFIG_FILE_NAME);

    // Create the app directory if it doesn't exist
    fs::create_dir_all(&app_dir).await?;

    // Check if config file exists
    if config_path.exists() {
        // Read and deserialize existing config
        let mut file = fs::File::open(&config_path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;

        let config: AppConfig = serde_json::from_str(&contents)?;
        Ok(config)
    } else {
        // Create new config
        let config = AppConfig::new(app_dir.clone());

        // Serialize and write to file
        let json = serde_json::to_string_pretty(&config)?;
        let mut file = fs::File::create(&config_path).await?;
        file.write_all(json.as_bytes()).await?;

        Ok(config)
    }
}
