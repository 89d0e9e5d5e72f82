use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use directories::BaseDirs;
use tracing::debug;

use crate::engine::Engine;

/// File name of the engine jar shipped alongside the bridge.
pub const ENGINE_JAR_NAME: &str = "pdf-signatures-0.1.0.jar";

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(default_config_path())
    }

    /// Defaults, then `KEY=value` lines from `config_path`, then the environment.
    pub fn load_from(config_path: PathBuf) -> Self {
        Self::load_with_env(config_path, env::vars())
    }

    /// Like [`Config::load_from`], with an explicit environment overlay.
    pub fn load_with_env<I>(config_path: PathBuf, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = default_map();

        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
                debug!(path = %config_path.display(), "loaded config file");
            }
        }

        for (k, v) in vars {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).filter(|v| !v.is_empty()).cloned()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_string(), value.into());
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    pub fn log_level(&self) -> String {
        self.get("PDFSIG_LOG").unwrap_or_else(|| "warn".into())
    }

    /// `PDFSIG_ENGINE` runs directly when set; otherwise `PDFSIG_JAVA -jar PDFSIG_JAR`.
    pub fn engine(&self) -> Engine {
        if let Some(exe) = self.get("PDFSIG_ENGINE") {
            return Engine::executable(exe);
        }
        let java = self.get("PDFSIG_JAVA").unwrap_or_else(|| "java".into());
        let jar = self
            .get_path("PDFSIG_JAR")
            .unwrap_or_else(|| default_data_dir().join("libs").join(ENGINE_JAR_NAME));
        Engine::jar(java, jar.to_string_lossy().into_owned())
    }
}

fn is_config_key(k: &str) -> bool {
    k.starts_with("PDFSIG_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("pdfsig").join(".pdfsigrc")
}

fn default_data_dir() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("pdfsig")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("PDFSIG_JAVA".into(), "java".into());
    m.insert(
        "PDFSIG_JAR".into(),
        default_data_dir().join("libs").join(ENGINE_JAR_NAME).to_string_lossy().into_owned(),
    );
    m.insert("PDFSIG_LOG".into(), "warn".into());
    m
}
