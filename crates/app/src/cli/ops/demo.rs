use clap::Args;
use common::crypto::{KeyError, KeyPair};
use common::envelope::{self, EnvelopeError};

pub const DEMO_MESSAGE: &[u8] = b"Hello algoTRIC - hybrid test!";
const DEMO_REPEAT: usize = 10;

#[derive(Args, Debug, Clone)]
pub struct Demo {
    /// RSA modulus size (defaults to the config file, then 2048)
    #[arg(long)]
    pub bits: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("key generation failed: {0}")]
    Key(#[from] KeyError),
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("failed to encode envelope: {0}")]
    Json(#[from] serde_json::Error),
    #[error("key generation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("recovered plaintext does not match the original")]
    Mismatch,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Demo {
    type Error = DemoError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let bits = super::resolve_key_bits(self.bits, ctx);
        let key_pair = tokio::task::spawn_blocking(move || KeyPair::generate(bits)).await??;

        let message = DEMO_MESSAGE.repeat(DEMO_REPEAT);
        let sealed = envelope::seal(key_pair.public(), &message)?;
        let json = sealed.to_json()?;
        tracing::info!(
            plaintext_len = message.len(),
            transport_len = json.len(),
            "sealed demo message"
        );

        let recovered = envelope::open_json(key_pair.secret(), &json)?;
        if recovered != message {
            return Err(DemoError::Mismatch);
        }

        Ok("Demo OK".to_string())
    }
}
