use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Main application configuration with strongly-typed global sections
/// and a flexible per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Core server configuration.
    pub server: ServerConfig,
    /// Database configuration (optional). Without it the in-memory store is used.
    pub database: Option<DatabaseConfig>,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub home_dir: String, // will be normalized to absolute path
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database connection URL (e.g., "sqlite://teachers.db?mode=rwc", "sqlite::memory:").
    pub url: String,
    /// Maximum number of connections in the pool (optional, defaults to 10).
    pub max_conns: Option<u32>,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // "logs/api.log"
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>, // How many files to keep
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Max size of the file in MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Empty => $HOME/.teachers
            home_dir: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8087,
        }
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/teachers.log".to_string(),
            file_level: "debug".to_string(),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: None,
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `server.home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        // Optional sections stay None unless explicitly provided by YAML/ENV.
        let base = AppConfig {
            server: ServerConfig::default(),
            database: None,
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(config_path.as_ref()))
            // Example: APP__SERVER__PORT=8087 maps to server.port
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| "Failed to extract config from figment".to_string())?;

        normalize_home_dir_inplace(&mut config.server)
            .context("Failed to resolve server.home_dir")?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load configuration from file or create with default values.
    /// Also normalizes `server.home_dir` into an absolute path and creates the directory.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => {
                let path = path.as_ref();
                if !path.is_file() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load_layered(path)
            }
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c.server)
                    .context("Failed to resolve server.home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Typed view of a module section. A missing section yields `T::default()`.
    pub fn module_config<T>(&self, module_name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.modules.get(module_name) {
            Some(raw) => serde_json::from_value(raw.clone())
                .with_context(|| format!("Invalid configuration for module '{module_name}'")),
            None => Ok(T::default()),
        }
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        if args.mock {
            self.database = None;
        }

        // Set logging level based on verbose flags for "default" section.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
    pub mock: bool,
}

const DEFAULT_SUBDIR: &str = ".teachers";

/// Resolve a user-supplied home dir into an absolute path.
/// Empty → `$HOME/.teachers`; a leading `~` expands to `$HOME`; relative paths join the cwd.
fn resolve_home_dir(raw: &str) -> Result<PathBuf> {
    let user_home = || {
        std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .context("HOME is not set")
    };

    let trimmed = raw.trim();
    let path = if trimmed.is_empty() {
        user_home()?.join(DEFAULT_SUBDIR)
    } else if trimmed == "~" {
        user_home()?
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        user_home()?.join(rest)
    } else {
        let p = PathBuf::from(trimmed);
        if p.is_absolute() {
            p
        } else {
            std::env::current_dir()?.join(p)
        }
    };
    Ok(path)
}

/// Normalize `server.home_dir` and create the directory.
fn normalize_home_dir_inplace(server: &mut ServerConfig) -> Result<()> {
    let resolved = resolve_home_dir(&server.home_dir)?;
    std::fs::create_dir_all(&resolved)
        .with_context(|| format!("Cannot create home_dir {}", resolved.display()))?;
    server.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let raw = fs::read_to_string(&path)?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)?;
        bag.insert(name, serde_json::to_value(val)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct DemoModuleConfig {
        #[serde(default)]
        limit: u32,
        #[serde(default)]
        label: Option<String>,
    }

    fn home_in(tmp: &Path, name: &str) -> String {
        tmp.join(name).to_string_lossy().replace('\\', "/")
    }

    #[test]
    fn test_default_config_structure() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8087);
        assert_eq!(config.server.home_dir, "");
        assert!(config.database.is_none());

        let logging = config.logging.as_ref().unwrap();
        let default_section = &logging["default"];
        assert_eq!(default_section.console_level, "info");
        assert_eq!(default_section.file, "logs/teachers.log");

        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_load_layered_reads_all_sections() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = home_in(tmp.path(), "home");

        let yaml = format!(
            r#"
server:
  home_dir: "{home}"
  host: "0.0.0.0"
  port: 9090

database:
  url: "sqlite::memory:"
  max_conns: 4

logging:
  default:
    console_level: debug
    file: "logs/default.log"

modules:
  teachers:
    max_name_length: 20
"#
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(Path::new(&config.server.home_dir).is_absolute());
        assert!(Path::new(&config.server.home_dir).exists());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);

        let db = config.database.as_ref().unwrap();
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(db.max_conns, Some(4));

        let def = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(def.console_level, "debug");
        assert_eq!(def.file, "logs/default.log");

        assert_eq!(config.modules["teachers"]["max_name_length"], 20);
    }

    #[test]
    fn test_minimal_yaml_config() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = home_in(tmp.path(), "minimal");

        let yaml = format!(
            r#"
server:
  home_dir: "{home}"
  host: "localhost"
  port: 8080
"#
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(config.server.home_dir.ends_with("minimal"));
        assert_eq!(config.server.port, 8080);
        assert!(config.database.is_none());
        assert!(config.logging.is_none());
        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_unknown_top_level_key_is_rejected() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = home_in(tmp.path(), "strict");

        let yaml = format!(
            r#"
server:
  home_dir: "{home}"
  host: "localhost"
  port: 8080
caching:
  enabled: true
"#
        );
        fs::write(&cfg_path, yaml).unwrap();

        assert!(AppConfig::load_layered(&cfg_path).is_err());
    }

    #[test]
    fn test_load_or_default_rejects_missing_file() {
        let tmp = tempdir().unwrap();
        let err = AppConfig::load_or_default(Some(tmp.path().join("nope.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_module_config_falls_back_to_default() {
        let mut config = AppConfig::default();
        let missing: DemoModuleConfig = config.module_config("demo").unwrap();
        assert_eq!(missing, DemoModuleConfig::default());

        config.modules.insert(
            "demo".to_string(),
            serde_json::json!({ "limit": 7, "label": "x" }),
        );
        let present: DemoModuleConfig = config.module_config("demo").unwrap();
        assert_eq!(present.limit, 7);
        assert_eq!(present.label.as_deref(), Some("x"));

        config
            .modules
            .insert("demo".to_string(), serde_json::json!({ "limit": "many" }));
        assert!(config.module_config::<DemoModuleConfig>("demo").is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        config.database = Some(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_conns: None,
        });

        let args = CliArgs {
            port: Some(3000),
            verbose: 2,
            mock: true,
            ..Default::default()
        };

        config.apply_cli_overrides(&args);

        assert_eq!(config.server.port, 3000);
        assert!(config.database.is_none(), "--mock forces the in-memory store");
        let default_section = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(default_section.console_level, "trace");
    }

    #[test]
    fn test_cli_verbose_levels_matrix() {
        for (verbose, expected) in [(0, "info"), (1, "debug"), (2, "trace"), (3, "trace")] {
            let mut config = AppConfig::default();
            let args = CliArgs {
                verbose,
                ..Default::default()
            };
            config.apply_cli_overrides(&args);

            let default_section = &config.logging.as_ref().unwrap()["default"];
            assert_eq!(default_section.console_level, expected);
        }
    }

    #[test]
    fn test_layered_config_loading_with_modules_dir() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("modules_dir.yaml");
        let modules_dir = tmp.path().join("modules");
        let home = home_in(tmp.path(), "modules_home");

        fs::create_dir_all(&modules_dir).unwrap();
        fs::write(
            modules_dir.join("teachers.yaml"),
            "max_name_length: 12\npublic_base_url: \"https://school.example\"\n",
        )
        .unwrap();
        fs::write(modules_dir.join("notes.txt"), "ignored").unwrap();

        let modules_dir_str = modules_dir.to_string_lossy().replace('\\', "/");
        let yaml = format!(
            r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 8087

modules_dir: "{modules_dir_str}"

modules:
  api_ingress:
    bind_addr: "127.0.0.1:8087"
"#
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(config.modules.contains_key("api_ingress"));
        assert!(!config.modules.contains_key("notes"));
        let teachers = &config.modules["teachers"];
        assert_eq!(teachers["max_name_length"], 12);
        assert_eq!(teachers["public_base_url"], "https://school.example");
    }

    #[test]
    fn test_to_yaml_roundtrip_basic() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("server:"));
        assert!(yaml.contains("logging:"));

        let roundtrip: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(roundtrip.server.port, config.server.port);
    }

    #[test]
    fn test_resolve_home_dir_keeps_absolute_paths() {
        let tmp = tempdir().unwrap();
        let abs = tmp.path().join("abs_home");
        let resolved = resolve_home_dir(&abs.to_string_lossy()).unwrap();
        assert_eq!(resolved, abs);

        let relative = resolve_home_dir("relative/home").unwrap();
        assert!(relative.is_absolute());
        assert!(relative.ends_with("relative/home"));
    }
}
