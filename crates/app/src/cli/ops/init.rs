use clap::Args;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// RSA modulus size for the generated key pair
    #[arg(long, default_value_t = common::crypto::DEFAULT_KEY_BITS)]
    pub bits: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
    #[error("key generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            key_bits: self.bits,
            ..AppConfig::default()
        };
        let config_path = ctx.config_path.clone();

        let state =
            tokio::task::spawn_blocking(move || AppState::init(config_path, Some(config))).await??;

        let output = format!(
            "Initialized algotric directory at: {}\n\
             - Public key: {}\n\
             - Private key: {}\n\
             - Config: {}\n\
             - Key size: {} bits",
            state.state_dir.display(),
            state.public_key_path.display(),
            state.secret_key_path.display(),
            state.config_path.display(),
            state.config.key_bits,
        );

        Ok(output)
    }
}
