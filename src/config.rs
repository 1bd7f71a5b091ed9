use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional config file at the site root.
pub const CONFIG_FILE: &str = "mdsite.json";

/// Top-level mdsite.json schema. Relative paths resolve against the site root.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    #[serde(default = "default_template")]
    pub template: PathBuf,

    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default = "default_basepath")]
    pub basepath: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            content_dir: default_content_dir(),
            template: default_template(),
            out_dir: default_out_dir(),
            basepath: default_basepath(),
        }
    }
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}
fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}
fn default_template() -> PathBuf {
    PathBuf::from("template.html")
}
fn default_out_dir() -> PathBuf {
    PathBuf::from("public")
}
fn default_basepath() -> String {
    "/".to_string()
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub static_dir: Option<PathBuf>,
    pub content_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub basepath: Option<String>,
}

impl SiteConfig {
    /// Apply overrides, then anchor every relative path at `root`.
    pub fn resolve(mut self, root: &Path, overrides: Overrides) -> Self {
        if let Some(dir) = overrides.static_dir {
            self.static_dir = dir;
        }
        if let Some(dir) = overrides.content_dir {
            self.content_dir = dir;
        }
        if let Some(file) = overrides.template {
            self.template = file;
        }
        if let Some(dir) = overrides.out_dir {
            self.out_dir = dir;
        }
        if let Some(basepath) = overrides.basepath {
            self.basepath = basepath;
        }

        self.static_dir = root.join(&self.static_dir);
        self.content_dir = root.join(&self.content_dir);
        self.template = root.join(&self.template);
        self.out_dir = root.join(&self.out_dir);
        self
    }
}

/// Load config from an mdsite.json file, or return defaults if missing.
pub fn load_config(site_root: &Path) -> Result<SiteConfig> {
    let config_path = site_root.join(CONFIG_FILE);

    if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: SiteConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        log::debug!("loaded {}", config_path.display());
        Ok(config)
    } else {
        Ok(SiteConfig::default())
    }
}
