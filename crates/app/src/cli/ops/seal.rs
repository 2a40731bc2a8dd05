use std::path::PathBuf;

use clap::Args;
use common::envelope::{self, EnvelopeError};

use crate::state::{self, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Seal {
    /// Recipient public key (defaults to the one in the state directory)
    #[arg(long)]
    pub public_key: Option<PathBuf>,

    /// File to encrypt (defaults to stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum SealError {
    #[error("failed to load key: {0}")]
    State(#[from] StateError),
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("seal failed: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("failed to encode envelope: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Seal {
    type Error = SealError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let public = match &self.public_key {
            Some(path) => state::load_public_key(path)?,
            None => AppState::load(ctx.config_path.clone())?.load_public_key()?,
        };
        let plaintext = super::read_input(self.input.as_deref()).await?;

        let envelope = envelope::seal(&public, &plaintext)?;
        Ok(envelope.to_json_pretty()?)
    }
}
