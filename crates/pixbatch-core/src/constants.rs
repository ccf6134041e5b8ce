//! Shared defaults.

/// Format token used when a directive does not name one.
pub const DEFAULT_FORMAT: &str = "webp";

/// Encoder quality used when a directive does not name one.
pub const DEFAULT_QUALITY: u8 = 85;

pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// Item pipelines kept in flight when `BATCH_CONCURRENCY` is unset.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Region used for Cloudflare R2 and other region-less S3-compatible stores.
pub const DEFAULT_S3_REGION: &str = "auto";
