use crate::stream::types::ChangeRecord;
use serde_json::Value;

/// Select the post-change image of every record that carries one.
///
/// Records without a `NewImage` (e.g. `REMOVE` events, or `KEYS_ONLY`
/// streams) contribute nothing. Output order follows the batch.
pub fn extract(records: &[ChangeRecord]) -> Vec<&Value> {
    records.iter().filter_map(ChangeRecord::new_image).collect()
}

/// Like [`extract`], paired with each image's position in the batch
pub fn extract_indexed(records: &[ChangeRecord]) -> Vec<(usize, &Value)> {
    records
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| record.new_image().map(|image| (idx, image)))
        .collect()
}
