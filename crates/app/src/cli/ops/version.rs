use std::convert::Infallible;

use clap::Args;

use common::build_info;

/// Print the package version, git revision, build profile and timestamp
#[derive(Args, Debug, Clone)]
pub struct Version;

#[async_trait::async_trait]
impl crate::cli::op::Op for Version {
    type Error = Infallible;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        Ok(build_info!().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::op::{Op, OpContext};

    #[tokio::test]
    async fn test_version_reports_build_info() {
        let output = Version.execute(&OpContext::default()).await.unwrap();
        assert!(output.starts_with("algotric "));
        assert!(output.contains(env!("CARGO_PKG_VERSION")));
    }
}
