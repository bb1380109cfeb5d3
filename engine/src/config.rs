use std::io::ErrorKind;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Where serialized configuration content lives (a file in production,
/// an in-memory buffer in tests).
pub trait ConfigSource {
    /// `Ok(None)` means the source does not exist yet.
    fn read(&self) -> Result<Option<String>, String>;
    fn write(&self, content: &str) -> Result<(), String>;
}

pub trait ConfigFormat<TConfig> {
    fn encode(&self, config: &TConfig) -> Result<String, String>;
    fn decode(&self, content: &str) -> Result<TConfig, String>;
}

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

#[derive(Default)]
pub struct YamlFormat;

impl<TConfig> ConfigFormat<TConfig> for YamlFormat
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn encode(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    fn decode(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content).map_err(|e| format!("Failed to deserialize config: {}", e))
    }
}

pub struct FileConfigSource {
    file_path: String,
}

impl FileConfigSource {
    pub fn new(file_path: String) -> Self {
        Self { file_path }
    }
}

impl ConfigSource for FileConfigSource {
    fn read(&self) -> Result<Option<String>, String> {
        match std::fs::read_to_string(self.file_path.as_str()) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(format!("Failed to read config file: {}", err)),
        }
    }

    fn write(&self, content: &str) -> Result<(), String> {
        std::fs::write(self.file_path.as_str(), content)
            .map_err(|e| format!("Failed to write config file: {}", e))
    }
}

/// Caching loader/writer for one validated config value.
pub struct ConfigManager<TSource, TConfig, TFormat = YamlFormat>
where
    TSource: ConfigSource,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TFormat: ConfigFormat<TConfig>,
{
    source: TSource,
    format: TFormat,
    cached: Mutex<Option<TConfig>>,
}

impl<TConfig> ConfigManager<FileConfigSource, TConfig, YamlFormat>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: &str) -> Self {
        Self::new(FileConfigSource::new(file_path.to_string()), YamlFormat)
    }
}

impl<TSource, TConfig, TFormat> ConfigManager<TSource, TConfig, TFormat>
where
    TSource: ConfigSource,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TFormat: ConfigFormat<TConfig>,
{
    pub fn new(source: TSource, format: TFormat) -> Self {
        Self {
            source,
            format,
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached value, the decoded source content, or
    /// `TConfig::default()` when the source does not exist.
    pub fn load(&self) -> Result<TConfig, String> {
        let mut cached = self.cached.lock().unwrap();

        if let Some(config) = cached.as_ref() {
            return Ok(config.clone());
        }

        if let Some(content) = self.source.read()? {
            let config = self.format.decode(&content)?;
            config
                .validate()
                .map_err(|e| format!("Config validation error: {}", e))?;

            *cached = Some(config.clone());
            return Ok(config);
        }

        Ok(TConfig::default())
    }

    pub fn store(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let content = self.format.encode(config)?;
        self.source.write(&content)?;

        let mut cached = self.cached.lock().unwrap();
        *cached = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct SampleConfig {
        name: String,
        limit: u32,
    }

    impl Validate for SampleConfig {
        fn validate(&self) -> Result<(), String> {
            if self.limit > 100 {
                return Err("limit must not exceed 100".to_string());
            }
            Ok(())
        }
    }

    struct MemorySource {
        content: Mutex<Option<String>>,
    }

    impl MemorySource {
        fn empty() -> Self {
            Self {
                content: Mutex::new(None),
            }
        }
    }

    impl ConfigSource for MemorySource {
        fn read(&self) -> Result<Option<String>, String> {
            Ok(self.content.lock().unwrap().clone())
        }

        fn write(&self, content: &str) -> Result<(), String> {
            *self.content.lock().unwrap() = Some(content.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_load_missing_source_returns_default() {
        let manager: ConfigManager<MemorySource, SampleConfig> =
            ConfigManager::new(MemorySource::empty(), YamlFormat);
        assert_eq!(manager.load().unwrap(), SampleConfig::default());
    }

    #[test]
    fn test_store_then_load_round_trips() {
        let manager: ConfigManager<MemorySource, SampleConfig> =
            ConfigManager::new(MemorySource::empty(), YamlFormat);
        let config = SampleConfig {
            name: "demo".to_string(),
            limit: 42,
        };
        manager.store(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_store_rejects_invalid_config() {
        let manager: ConfigManager<MemorySource, SampleConfig> =
            ConfigManager::new(MemorySource::empty(), YamlFormat);
        let config = SampleConfig {
            name: "demo".to_string(),
            limit: 101,
        };
        assert!(manager.store(&config).is_err());
    }

    #[test]
    fn test_load_rejects_invalid_stored_content() {
        let source = MemorySource::empty();
        source.write("name: demo\nlimit: 999\n").unwrap();
        let manager: ConfigManager<MemorySource, SampleConfig> =
            ConfigManager::new(source, YamlFormat);
        assert!(manager.load().is_err());
    }
}
