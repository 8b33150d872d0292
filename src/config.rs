use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub store_endpoint: String,
    pub store_key: String,
    pub database: String,
    pub collection: String,
    pub storage_mode: StorageMode,
}

#[derive(Debug, Clone)]
pub enum StorageMode {
    Memory,
    File,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let storage = env::var("STORAGE_MODE")
            .unwrap_or_else(|_| "memory".to_string())
            .to_lowercase();

        let storage_mode = match storage.as_str() {
            "file" => StorageMode::File,
            _ => StorageMode::Memory, // Default to in-memory mode
        };

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("PORT")
                .or_else(|_| env::var("SERVER_PORT"))
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .unwrap_or(5000),
            store_endpoint: env::var("STORE_ENDPOINT").unwrap_or_default(),
            store_key: env::var("STORE_KEY").unwrap_or_default(),
            database: env::var("STORE_DATABASE").unwrap_or_else(|_| "blog".to_string()),
            collection: env::var("STORE_COLLECTION").unwrap_or_else(|_| "posts".to_string()),
            storage_mode,
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Path of the backing file used when `STORAGE_MODE=file`.
    pub fn collection_file(&self) -> String {
        format!("{}_{}.json", self.database, self.collection)
    }
}

impl AppConfig {
    /// Minimal configuration backed by the in-memory store.
    pub fn in_memory() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            store_endpoint: String::new(),
            store_key: String::new(),
            database: "blog".to_string(),
            collection: "posts".to_string(),
            storage_mode: StorageMode::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_file_combines_database_and_collection() {
        let config = AppConfig::in_memory();
        assert_eq!(config.collection_file(), "blog_posts.json");
    }
}
