pub mod demo;
pub mod init;
pub mod keygen;
pub mod open;
pub mod seal;
pub mod version;

pub use demo::Demo;
pub use init::Init;
pub use keygen::Keygen;
pub use open::Open;
pub use seal::Seal;
pub use version::Version;

use std::path::Path;

use tokio::io::AsyncReadExt;

/// Read all of `path`, or all of stdin when no path is given
pub(crate) async fn read_input(path: Option<&Path>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(path) => tokio::fs::read(path).await,
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin().read_to_end(&mut buf).await?;
            Ok(buf)
        }
    }
}

/// Resolve the RSA key size for commands that generate keys.
///
/// Priority: explicit `--bits` flag > config file `key_bits` > 2048.
pub(crate) fn resolve_key_bits(explicit: Option<usize>, ctx: &super::op::OpContext) -> usize {
    if let Some(bits) = explicit {
        return bits;
    }
    match crate::state::AppState::load(ctx.config_path.clone()) {
        Ok(state) => state.config.key_bits,
        Err(_) => common::crypto::DEFAULT_KEY_BITS,
    }
}
