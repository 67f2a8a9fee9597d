//! Restores input order from per-shard batches.

use crate::error::{PhonoshardError, Result};
use crate::pipeline::types::{ShardBatch, TransformResult};

/// Concatenate `batches` in shard-index order.
///
/// Shard indices must be exactly `0..batches.len()`, the result count must be
/// `total_records`, and result `i` must carry position `i`. Any violation
/// means splitting or dispatch is broken and is reported, never patched up.
pub fn reassemble(mut batches: Vec<ShardBatch>, total_records: usize) -> Result<Vec<TransformResult>> {
    batches.sort_unstable_by_key(|b| b.shard_index);

    for (expected, batch) in batches.iter().enumerate() {
        if batch.shard_index != expected {
            let message = if batch.shard_index < expected {
                format!("duplicate shard {}", batch.shard_index)
            } else {
                format!("missing shard {expected}")
            };
            return Err(PhonoshardError::Reassembly { message });
        }
    }

    let count: usize = batches.iter().map(|b| b.results.len()).sum();
    if count != total_records {
        return Err(PhonoshardError::Reassembly {
            message: format!("expected {total_records} results, got {count}"),
        });
    }

    let mut ordered = Vec::with_capacity(total_records);
    for batch in batches {
        ordered.extend(batch.results);
    }

    if let Some((i, result)) = ordered
        .iter()
        .enumerate()
        .find(|(i, result)| result.position() != *i)
    {
        return Err(PhonoshardError::Reassembly {
            message: format!(
                "result at index {i} belongs to position {}",
                result.position()
            ),
        });
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produced(position: usize) -> TransformResult {
        TransformResult::Produced {
            position,
            phonemes: format!("p{position}"),
        }
    }

    fn batch(shard_index: usize, positions: std::ops::Range<usize>) -> ShardBatch {
        ShardBatch {
            shard_index,
            results: positions.map(produced).collect(),
        }
    }

    #[test]
    fn test_orders_batches_by_shard_index() {
        let batches = vec![batch(2, 5..7), batch(0, 0..3), batch(1, 3..5)];
        let ordered = reassemble(batches, 7).unwrap();
        let positions: Vec<_> = ordered.iter().map(TransformResult::position).collect();
        assert_eq!(positions, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_input() {
        assert!(reassemble(Vec::new(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_missing_shard_is_an_error() {
        let err = reassemble(vec![batch(0, 0..2), batch(2, 2..4)], 4).unwrap_err();
        assert!(err.to_string().contains("missing shard 1"), "got: {err}");
    }

    #[test]
    fn test_duplicate_shard_is_an_error() {
        let err = reassemble(vec![batch(0, 0..2), batch(0, 0..2)], 4).unwrap_err();
        assert!(err.to_string().contains("duplicate shard 0"), "got: {err}");
    }

    #[test]
    fn test_count_mismatch_is_an_error() {
        let err = reassemble(vec![batch(0, 0..2), batch(1, 2..4)], 5).unwrap_err();
        assert!(err.to_string().contains("expected 5 results, got 4"), "got: {err}");
    }

    #[test]
    fn test_position_mismatch_is_an_error() {
        let batches = vec![
            ShardBatch {
                shard_index: 0,
                results: vec![produced(1), produced(0)],
            },
        ];
        let err = reassemble(batches, 2).unwrap_err();
        assert!(matches!(err, PhonoshardError::Reassembly { .. }));
    }

    #[test]
    fn test_missing_markers_keep_their_slot() {
        let batches = vec![
            ShardBatch {
                shard_index: 1,
                results: vec![TransformResult::Missing { position: 2 }],
            },
            batch(0, 0..2),
        ];
        let ordered = reassemble(batches, 3).unwrap();
        assert!(ordered[2].is_missing());
        assert_eq!(ordered[1].phonemes(), Some("p1"));
    }
}
