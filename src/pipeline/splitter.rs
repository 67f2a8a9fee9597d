//! Contiguous, size-balanced sharding.

use crate::error::{PhonoshardError, Result};
use crate::pipeline::types::{Record, Shard};

/// Splits `texts` into at most `shard_count` contiguous shards.
///
/// Shard `i` holds a contiguous run of positions; sizes differ by at most one
/// and the remainder goes to the first shards. When there are fewer texts than
/// shards, each shard holds exactly one record. Empty input yields no shards.
pub fn split(texts: Vec<String>, shard_count: usize) -> Result<Vec<Shard>> {
    if shard_count == 0 {
        return Err(PhonoshardError::InvalidArgument {
            message: "shard count must be positive".to_string(),
        });
    }

    let total = texts.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let shards = shard_count.min(total);
    let base = total / shards;
    let remainder = total % shards;

    let mut records = texts
        .into_iter()
        .enumerate()
        .map(|(position, text)| Record::new(position, text));

    let result = (0..shards)
        .map(|index| {
            let size = base + usize::from(index < remainder);
            Shard {
                index,
                records: records.by_ref().take(size).collect(),
            }
        })
        .collect();
    Ok(result)
}
