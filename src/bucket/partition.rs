// src/bucket/partition.rs - Repartition-by-key and partition-local equi-join
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Records of one partition grouped by key. Keys iterate in lexical order.
pub type Partition<T> = BTreeMap<String, Vec<T>>;

/// Stable partition of a key: the same key lands in the same partition in
/// every run and on every platform.
pub fn partition_index(key: &str, partitions: usize) -> usize {
    let digest = Sha256::digest(key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % partitions.max(1) as u64) as usize
}

/// Shuffles keyed records into `partitions` buckets. Within a key, records
/// keep their input order.
pub fn partition_by_key<T, I>(records: I, partitions: usize) -> Vec<Partition<T>>
where
    I: IntoIterator<Item = (String, T)>,
{
    let partitions = partitions.max(1);
    let mut shuffled: Vec<Partition<T>> = (0..partitions).map(|_| BTreeMap::new()).collect();
    for (key, record) in records {
        let idx = partition_index(&key, partitions);
        shuffled[idx].entry(key).or_default().push(record);
    }
    shuffled
}

/// Inner equi-join of two keyed collections.
///
/// Both sides are repartitioned by key, then every partition is joined on the
/// rayon pool. Output is ordered by key, then left input order, then right
/// input order, whatever the partition count. Duplicates are kept.
pub fn partitioned_equi_join<L, R, LI, RI>(left: LI, right: RI, partitions: usize) -> Vec<(L, R)>
where
    L: Copy + Send + Sync,
    R: Copy + Send + Sync,
    LI: IntoIterator<Item = (String, L)>,
    RI: IntoIterator<Item = (String, R)>,
{
    let left_partitions = partition_by_key(left, partitions);
    let right_partitions = partition_by_key(right, partitions);

    let mut joined: Vec<(&str, L, R)> = left_partitions
        .par_iter()
        .zip(right_partitions.par_iter())
        .map(|(left_part, right_part)| {
            let mut joined = Vec::new();
            for (key, left_records) in left_part {
                let Some(right_records) = right_part.get(key) else {
                    continue;
                };
                for l in left_records {
                    for r in right_records {
                        joined.push((key.as_str(), *l, *r));
                    }
                }
            }
            joined
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    // Stable: rows of one key come from one partition, already in input order
    joined.sort_by(|a, b| a.0.cmp(b.0));
    joined.into_iter().map(|(_, l, r)| (l, r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_index_is_stable_and_in_range() {
        for key in ["ut", "mit", "university texas", ""] {
            let idx = partition_index(key, 7);
            assert!(idx < 7);
            assert_eq!(idx, partition_index(key, 7));
        }
        assert_eq!(partition_index("anything", 1), 0);
    }

    #[test]
    fn test_partition_by_key_groups_records() {
        let records = vec![
            ("a".to_string(), 1),
            ("b".to_string(), 2),
            ("a".to_string(), 3),
        ];
        let parts = partition_by_key(records, 4);
        assert_eq!(parts.len(), 4);
        let a = &parts[partition_index("a", 4)]["a"];
        assert_eq!(a, &vec![1, 3]);
        let total: usize = parts.iter().flat_map(|p| p.values()).map(Vec::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_equi_join_emits_only_matching_keys() {
        let left = vec![("x".to_string(), 'a'), ("y".to_string(), 'b'), ("x".to_string(), 'c')];
        let right = vec![("x".to_string(), 1), ("z".to_string(), 2)];

        let mut joined = partitioned_equi_join(left, right, 3);
        joined.sort();
        assert_eq!(joined, vec![('a', 1), ('c', 1)]);
    }

    #[test]
    fn test_equi_join_order_independent_of_partition_count() {
        let left: Vec<(String, u32)> = (0..50).map(|i| (format!("k{}", i % 5), i)).collect();
        let right: Vec<(String, u32)> = (0..5).map(|i| (format!("k{}", i), i * 100)).collect();

        let one = partitioned_equi_join(left.clone(), right.clone(), 1);
        let many = partitioned_equi_join(left.clone(), right.clone(), 8);
        assert_eq!(one.len(), 50);
        assert_eq!(one, many);
        assert_eq!(one[..3], [(0, 0), (5, 0), (10, 0)]);
        assert_eq!(
            partitioned_equi_join(left.clone(), right.clone(), 8),
            partitioned_equi_join(left, right, 8)
        );
    }
}
