use std::path::{Path, PathBuf};
use std::{fs, str::FromStr};

use common::crypto::{KeyError, KeyPair, PublicKey, SecretKey, DEFAULT_KEY_BITS};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "algotric";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const PUBLIC_KEY_FILE_NAME: &str = "public.pem";
pub const SECRET_KEY_FILE_NAME: &str = "private.pem";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// RSA modulus size used by `init`, `keygen` and `demo`
    #[serde(default = "default_key_bits")]
    pub key_bits: usize,
    /// Default log level when `--log-level` is not given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_key_bits() -> usize {
    DEFAULT_KEY_BITS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            key_bits: default_key_bits(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// The configured level, or `None` if it does not parse
    pub fn log_level(&self) -> Option<tracing::Level> {
        tracing::Level::from_str(&self.log_level).ok()
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the state directory (~/.algotric)
    pub state_dir: PathBuf,
    /// Path to the recipient public key
    pub public_key_path: PathBuf,
    /// Path to the recipient private key
    pub secret_key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the state directory path (custom or default ~/.algotric)
    pub fn state_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new state directory with a fresh key pair
    ///
    /// Generates an RSA key, so callers on an async runtime should run this
    /// on a blocking thread.
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;

        if state_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        // Generate before touching the filesystem so a bad key size leaves nothing behind
        let key_pair = KeyPair::generate(config.key_bits)?;

        fs::create_dir_all(&state_dir)?;
        let (public_key_path, secret_key_path) = write_key_pair(&state_dir, &key_pair)?;

        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        tracing::info!(
            dir = %state_dir.display(),
            fingerprint = %key_pair.public().fingerprint(),
            "initialized state directory"
        );

        Ok(Self {
            state_dir,
            public_key_path,
            secret_key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the state directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;

        if !state_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let public_key_path = state_dir.join(PUBLIC_KEY_FILE_NAME);
        let secret_key_path = state_dir.join(SECRET_KEY_FILE_NAME);
        let config_path = state_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            state_dir,
            public_key_path,
            secret_key_path,
            config_path,
            config,
        })
    }

    pub fn load_public_key(&self) -> Result<PublicKey, StateError> {
        load_public_key(&self.public_key_path)
    }

    pub fn load_secret_key(&self) -> Result<SecretKey, StateError> {
        load_secret_key(&self.secret_key_path)
    }
}

/// Write both halves of `key_pair` as PEM files into `dir`
pub fn write_key_pair(dir: &Path, key_pair: &KeyPair) -> Result<(PathBuf, PathBuf), StateError> {
    let public_key_path = dir.join(PUBLIC_KEY_FILE_NAME);
    let secret_key_path = dir.join(SECRET_KEY_FILE_NAME);

    fs::write(&public_key_path, key_pair.public().to_pem()?)?;
    write_private_file(&secret_key_path, key_pair.secret().to_pem()?.as_bytes())?;

    Ok((public_key_path, secret_key_path))
}

/// Write `contents` readable by the owner only
#[cfg(unix)]
fn write_private_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode only applies on creation, tighten a file that already existed
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}

pub fn load_public_key(path: &Path) -> Result<PublicKey, StateError> {
    let pem = read_key_file(path)?;
    PublicKey::from_pem(&pem)
        .map_err(|e| StateError::InvalidKey(format!("{}: {}", path.display(), e)))
}

pub fn load_secret_key(path: &Path) -> Result<SecretKey, StateError> {
    let pem = read_key_file(path)?;
    SecretKey::from_pem(&pem)
        .map_err(|e| StateError::InvalidKey(format!("{}: {}", path.display(), e)))
}

fn read_key_file(path: &Path) -> Result<String, StateError> {
    if !path.exists() {
        return Err(StateError::MissingFile(path.display().to_string()));
    }
    Ok(fs::read_to_string(path)?)
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("algotric directory not initialized. Run 'algotric init' first")]
    NotInitialized,

    #[error("algotric directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("key error: {0}")]
    Key(#[from] KeyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
