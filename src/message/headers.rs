//! Header keys and the header map type.

use std::collections::BTreeMap;

use serde_json::Value;

/// Header map carried by every message. Keys are unique; order is irrelevant.
pub type Headers = BTreeMap<String, Value>;

/// Unique identifier assigned by the enricher.
pub const MESSAGE_ID: &str = "messageId";
/// Milliseconds since the Unix epoch at enrichment time.
pub const PROCESSED_AT: &str = "processedAt";
/// Tag of the pipeline that enriched the message.
pub const SOURCE_FLOW: &str = "sourceFlow";
/// Channel that receives the message if its handler fails.
pub const ERROR_CHANNEL: &str = "errorChannel";
/// Display text of the failure captured on the dead-letter path.
pub const ERROR_CAUSE: &str = "errorCause";
/// Name of the stage whose failure sent the message to the dead-letter path.
pub const FAILED_STAGE: &str = "failedStage";

/// Headers written by the framework itself.
pub const RESERVED: [&str; 6] = [
    MESSAGE_ID,
    PROCESSED_AT,
    SOURCE_FLOW,
    ERROR_CHANNEL,
    ERROR_CAUSE,
    FAILED_STAGE,
];

/// The exact set of keys produced by header enrichment.
pub const ENRICHED: [&str; 4] = [PROCESSED_AT, MESSAGE_ID, SOURCE_FLOW, ERROR_CHANNEL];

/// Returns true if `key` is owned by the framework.
pub fn is_reserved(key: &str) -> bool {
    RESERVED.contains(&key)
}
