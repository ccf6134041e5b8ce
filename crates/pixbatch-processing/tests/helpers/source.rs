use async_trait::async_trait;
use pixbatch_core::SourceRef;
use pixbatch_processing::{ByteSource, MemorySource, SourceError};
use tokio_util::sync::CancellationToken;

/// Memory source that cancels the batch token on every read
pub struct CancellingSource {
    inner: MemorySource,
    token: CancellationToken,
}

impl CancellingSource {
    pub fn new(inner: MemorySource, token: CancellationToken) -> Self {
        Self { inner, token }
    }
}

#[async_trait]
impl ByteSource for CancellingSource {
    async fn read_bytes(&self, source: &SourceRef) -> Result<Vec<u8>, SourceError> {
        self.token.cancel();
        self.inner.read_bytes(source).await
    }
}
