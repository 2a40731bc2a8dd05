use std::fmt;
use std::path::PathBuf;

use clap::Args;
use common::envelope::{self, Envelope, EnvelopeError};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::state::{self, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Open {
    /// Recipient private key (defaults to the one in the state directory)
    #[arg(long)]
    pub private_key: Option<PathBuf>,

    /// Envelope JSON to open (defaults to stdin)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Write the plaintext here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("failed to load key: {0}")]
    State(#[from] StateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("open failed: {0}")]
    Envelope(#[from] EnvelopeError),
}

#[derive(Debug)]
pub enum OpenOutput {
    /// Raw plaintext already went to stdout; nothing left to print
    Stdout { len: usize },
    Written { path: PathBuf, len: usize },
}

impl fmt::Display for OpenOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenOutput::Stdout { .. } => Ok(()),
            OpenOutput::Written { path, len } => {
                write!(f, "Wrote {} bytes to {}", len, path.display())
            }
        }
    }
}

/// Write plaintext byte for byte, no trailing newline
async fn write_plaintext<W>(writer: &mut W, plaintext: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(plaintext).await?;
    writer.flush().await
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Open {
    type Error = OpenError;
    type Output = OpenOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let secret = match &self.private_key {
            Some(path) => state::load_secret_key(path)?,
            None => AppState::load(ctx.config_path.clone())?.load_secret_key()?,
        };
        let input = super::read_input(self.input.as_deref()).await?;

        let sealed = Envelope::from_slice(&input)?;
        let plaintext = envelope::open(&secret, &sealed)?;

        match &self.output {
            Some(path) => {
                tokio::fs::write(path, &plaintext).await?;
                Ok(OpenOutput::Written {
                    path: path.clone(),
                    len: plaintext.len(),
                })
            }
            None => {
                write_plaintext(&mut tokio::io::stdout(), &plaintext).await?;
                tracing::debug!(len = plaintext.len(), "wrote plaintext to stdout");
                Ok(OpenOutput::Stdout {
                    len: plaintext.len(),
                })
            }
        }
    }
}
