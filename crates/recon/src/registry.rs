use std::collections::HashSet;

use stdcheck_core::ActualEntry;

/// Give every entry without an `id` one.
///
/// The entry's position is used when free; otherwise the next integer above
/// the largest id in use. Existing ids are never changed, so running this
/// twice assigns nothing the second time. Returns how many ids were assigned.
pub fn backfill_ids(entries: &mut [ActualEntry]) -> usize {
    let mut taken: HashSet<u64> = entries.iter().filter_map(|e| e.id).collect();
    let mut next_above = taken.iter().max().map_or(0, |m| m + 1);
    let mut assigned = 0;

    for (position, entry) in entries.iter_mut().enumerate() {
        if entry.id.is_some() {
            continue;
        }
        let position = position as u64;
        let id = if taken.contains(&position) { next_above } else { position };
        taken.insert(id);
        next_above = next_above.max(id + 1);
        entry.id = Some(id);
        assigned += 1;
    }

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ids(ids: &[Option<u64>]) -> Vec<ActualEntry> {
        ids.iter()
            .map(|&id| ActualEntry { id, ..ActualEntry::default() })
            .collect()
    }

    fn ids(entries: &[ActualEntry]) -> Vec<Option<u64>> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn positions_fill_gaps() {
        let mut entries = with_ids(&[None, None, None]);
        assert_eq!(backfill_ids(&mut entries), 3);
        assert_eq!(ids(&entries), vec![Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn taken_position_goes_above_max() {
        // position 1 is missing its id, but id 1 belongs to entry 0
        let mut entries = with_ids(&[Some(1), None, Some(7), None]);
        assert_eq!(backfill_ids(&mut entries), 2);
        assert_eq!(ids(&entries), vec![Some(1), Some(8), Some(7), Some(3)]);
    }

    #[test]
    fn second_run_assigns_nothing() {
        let mut entries = with_ids(&[None, Some(0), None]);
        backfill_ids(&mut entries);
        let once = entries.clone();
        assert_eq!(backfill_ids(&mut entries), 0);
        assert_eq!(entries, once);
    }

    #[test]
    fn assigned_ids_are_unique() {
        let mut entries = with_ids(&[None, Some(0), None, Some(2), None]);
        backfill_ids(&mut entries);
        let unique: HashSet<u64> = entries.iter().filter_map(|e| e.id).collect();
        assert_eq!(unique.len(), entries.len());
    }
}
