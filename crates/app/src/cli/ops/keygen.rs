use std::path::PathBuf;

use clap::Args;
use common::crypto::{KeyError, KeyPair};

use crate::state::{self, StateError};

#[derive(Args, Debug, Clone)]
pub struct Keygen {
    /// RSA modulus size (defaults to the config file, then 2048)
    #[arg(long)]
    pub bits: Option<usize>,

    /// Directory to write public.pem and private.pem into
    #[arg(long)]
    pub out_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error("key generation failed: {0}")]
    Key(#[from] KeyError),
    #[error("failed to write keys: {0}")]
    State(#[from] StateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("key generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Keygen {
    type Error = KeygenError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let bits = super::resolve_key_bits(self.bits, ctx);
        let key_pair = tokio::task::spawn_blocking(move || KeyPair::generate(bits)).await??;

        tokio::fs::create_dir_all(&self.out_dir).await?;
        let (public_key_path, secret_key_path) = state::write_key_pair(&self.out_dir, &key_pair)?;

        Ok(format!(
            "Generated {}-bit key pair\n\
             - Public key: {}\n\
             - Private key: {}\n\
             - Fingerprint: {}",
            key_pair.public().bits(),
            public_key_path.display(),
            secret_key_path.display(),
            key_pair.public().fingerprint(),
        ))
    }
}
