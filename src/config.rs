use serde::{Deserialize, Serialize};

/// What a batch does when one of its images fails to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    /// The first malformed image fails the whole batch; nothing is emitted
    #[default]
    FailBatch,
    /// Emit every image that decoded and list the ones that did not
    ReportItems,
}

/// How opaque bytes (`B`, `BS`) are rendered when output is written as JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryEncoding {
    /// Standard base64 text, the same form the stream delivers
    #[default]
    Base64,
    /// Array of byte values
    Array,
}

/// Configuration for converting a batch of change records
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    pub failure_mode: FailureMode,

    pub binary_encoding: BinaryEncoding,

    /// Decode the images of a batch on the rayon pool.
    /// Output order is the batch order either way.
    pub parallel: bool,

    /// Log every original image next to its converted form
    pub log_images: bool,
}
