use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen: String,
    pub public_dir: String,
    pub reports_dir: String,
    pub contacts_file: String,
    pub reports_public_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:3000".to_string(),
            public_dir: "./public".to_string(),
            reports_dir: "./public/ProjectReports2".to_string(),
            contacts_file: "./contacts.xlsx".to_string(),
            reports_public_prefix: "/ProjectReports2".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = Path::new("config.toml");
        if config_path.exists() {
            let mut file = std::fs::File::open(config_path).expect("failed to open config.toml");
            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .expect("failed to read config.toml");
            toml::from_str(&contents).expect("failed to parse config.toml")
        } else {
            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)
                .expect("failed to serialize default config");
            let mut file =
                std::fs::File::create(config_path).expect("failed to create config.toml");
            file.write_all(toml_string.as_bytes())
                .expect("failed to write config.toml");
            default_config
        }
    }

    pub fn from_env_config() -> Self {
        let mut final_cfg = Self::load();

        // PORT overrides the port part of the configured listen address.
        if let Ok(port) = std::env::var("PORT") {
            if let Some((host, _)) = final_cfg.listen.rsplit_once(':') {
                final_cfg.listen = format!("{host}:{port}");
            }
        }
        std::fs::create_dir_all(&final_cfg.reports_dir).expect("create reports dir");
        final_cfg
    }
}
