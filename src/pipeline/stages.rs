//! The three grouping passes of the duplicate funnel.
//!
//! Each pass consumes the previous pass's surviving buckets, re-buckets by a
//! stronger key, and splits the result into finalized groups (singletons, or
//! everything at the last stage) and buckets that continue on. Files whose
//! size or content cannot be read are warned about and dropped from further
//! grouping; they never abort the scan.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::{Hash, Hasher};

use super::{Candidate, FileGroup, GroupingStats, HashStats};

/// Stage 1: bucket paths by file size.
///
/// Sizes come from one `stat` per path; no file content is read. Paths whose
/// metadata cannot be probed are excluded with a warning. Buckets with a
/// single member are finalized as singleton groups immediately, which is
/// the funnel's cheapest and biggest cut.
///
/// Sequence numbers are assigned here, in iteration order, and identify
/// encounter order for the rest of the pipeline.
///
/// # Returns
///
/// - finalized singleton groups
/// - buckets of 2+ same-size candidates for the partial-hash stage
/// - stage statistics
#[must_use]
pub fn group_by_size(
    paths: impl IntoIterator<Item = PathBuf>,
) -> (Vec<FileGroup>, Vec<Vec<Candidate>>, GroupingStats) {
    let mut stats = GroupingStats::default();
    let mut buckets: HashMap<u64, Vec<Candidate>> = HashMap::new();

    for (seq, path) in paths.into_iter().enumerate() {
        stats.input_files += 1;
        let size = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(err) => {
                log::warn!(
                    "failed to get info on \"{}\" due to \"{}\" error",
                    path.display(),
                    err
                );
                stats.failed_files += 1;
                continue;
            }
        };
        buckets
            .entry(size)
            .or_default()
            .push(Candidate { seq, path, size });
    }

    let (finals, survivors) = split_buckets(buckets.into_values());
    stats.singletons = finals.len();
    stats.candidate_groups = survivors.len();
    stats.candidate_files = survivors.iter().map(Vec::len).sum();

    log::debug!(
        "size stage: {} files -> {} singletons, {} candidates in {} buckets",
        stats.input_files,
        stats.singletons,
        stats.candidate_files,
        stats.candidate_groups
    );

    (finals, survivors, stats)
}

/// Stage 2: re-bucket same-size candidates by a partial content hash.
///
/// Hashes only the first 64 KiB of each file (smaller files hash whole).
/// The bucket key pairs the digest with the size: a digest alone would let
/// different-sized files collide into one bucket, so the pairing is load
/// bearing, not cosmetic.
///
/// Files that share a size but differ inside the first 64 KiB cannot be
/// identical, so single-member buckets here are final singletons.
///
/// # Returns
///
/// - finalized singleton groups
/// - buckets of 2+ candidates that also agree on the partial hash
/// - stage statistics
#[must_use]
pub fn group_by_partial_hash(
    size_buckets: Vec<Vec<Candidate>>,
    hasher: &Hasher,
) -> (Vec<FileGroup>, Vec<Vec<Candidate>>, HashStats) {
    let (finals, survivors, stats) =
        hash_stage(size_buckets, |candidate| hasher.partial_hash(&candidate.path));

    log::debug!(
        "partial-hash stage: {} files -> {} singletons, {} candidates in {} buckets",
        stats.input_files,
        stats.singletons,
        stats.candidate_files,
        stats.candidate_groups
    );

    (finals, survivors, stats)
}

/// Stage 3: re-bucket by a digest of the entire file content.
///
/// Every resulting bucket is final. A single-member bucket means two files
/// agreed on size and on their first 64 KiB but diverged later; a bucket of
/// 2+ is a confirmed duplicate set.
///
/// # Returns
///
/// - all finalized groups (singletons and duplicate sets)
/// - stage statistics
#[must_use]
pub fn group_by_full_hash(
    partial_buckets: Vec<Vec<Candidate>>,
    hasher: &Hasher,
) -> (Vec<FileGroup>, HashStats) {
    let (buckets, mut stats) =
        bucket_by_digest(partial_buckets, |candidate| hasher.full_hash(&candidate.path));

    let finals: Vec<FileGroup> = buckets.into_values().map(FileGroup::from_members).collect();
    stats.singletons = finals.iter().filter(|g| g.is_singleton()).count();

    log::debug!(
        "full-hash stage: {} files -> {} groups ({} singletons)",
        stats.input_files,
        finals.len(),
        stats.singletons
    );

    (finals, stats)
}

/// Shared body of the hashing passes: re-bucket by `(digest, size)` and
/// split off single-member buckets as final.
fn hash_stage(
    input: Vec<Vec<Candidate>>,
    digest: impl FnMut(&Candidate) -> Result<Hash, crate::scanner::HashError>,
) -> (Vec<FileGroup>, Vec<Vec<Candidate>>, HashStats) {
    let (buckets, mut stats) = bucket_by_digest(input, digest);

    let (finals, survivors) = split_buckets(buckets.into_values());
    stats.singletons = finals.len();
    stats.candidate_groups = survivors.len();
    stats.candidate_files = survivors.iter().map(Vec::len).sum();

    (finals, survivors, stats)
}

/// Re-bucket candidates by the composite `(digest, size)` key, excluding
/// (with a warning) any file whose content cannot be read.
fn bucket_by_digest(
    input: Vec<Vec<Candidate>>,
    mut digest: impl FnMut(&Candidate) -> Result<Hash, crate::scanner::HashError>,
) -> (HashMap<(Hash, u64), Vec<Candidate>>, HashStats) {
    let mut stats = HashStats::default();
    let mut buckets: HashMap<(Hash, u64), Vec<Candidate>> = HashMap::new();

    for bucket in input {
        for candidate in bucket {
            stats.input_files += 1;
            match digest(&candidate) {
                Ok(hash) => {
                    stats.hashed_files += 1;
                    buckets
                        .entry((hash, candidate.size))
                        .or_default()
                        .push(candidate);
                }
                Err(err) => {
                    log::warn!("{err}");
                    stats.failed_files += 1;
                }
            }
        }
    }

    (buckets, stats)
}

/// Partition buckets into finalized singleton groups and surviving
/// multi-member buckets.
fn split_buckets(
    buckets: impl IntoIterator<Item = Vec<Candidate>>,
) -> (Vec<FileGroup>, Vec<Vec<Candidate>>) {
    let mut finals = Vec::new();
    let mut survivors = Vec::new();
    for bucket in buckets {
        if bucket.len() == 1 {
            finals.push(FileGroup::from_members(bucket));
        } else {
            survivors.push(bucket);
        }
    }
    (finals, survivors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_group_by_size_distinct_sizes_all_singletons() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"1");
        let b = write_file(dir.path(), "b.txt", b"22");
        let c = write_file(dir.path(), "c.txt", b"333");

        let (finals, survivors, stats) = group_by_size(vec![a, b, c]);

        assert_eq!(finals.len(), 3);
        assert!(survivors.is_empty());
        assert!(finals.iter().all(FileGroup::is_singleton));
        assert_eq!(stats.input_files, 3);
        assert_eq!(stats.singletons, 3);
        assert_eq!(stats.candidate_files, 0);
    }

    #[test]
    fn test_group_by_size_same_size_stays_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"aaa");
        let b = write_file(dir.path(), "b.txt", b"bbb");
        let c = write_file(dir.path(), "c.txt", b"cccc");

        let (finals, survivors, stats) = group_by_size(vec![a.clone(), b.clone(), c]);

        assert_eq!(finals.len(), 1);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].len(), 2);
        assert_eq!(survivors[0][0].path, a);
        assert_eq!(survivors[0][1].path, b);
        assert_eq!(stats.candidate_groups, 1);
        assert_eq!(stats.candidate_files, 2);
    }

    #[test]
    fn test_group_by_size_missing_file_warned_and_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"data");
        let ghost = dir.path().join("ghost.txt");

        let (finals, survivors, stats) = group_by_size(vec![a, ghost]);

        assert_eq!(stats.input_files, 2);
        assert_eq!(stats.failed_files, 1);
        assert_eq!(finals.len(), 1);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_group_by_size_assigns_sequence_in_encounter_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"xx");
        let b = write_file(dir.path(), "b.txt", b"yy");

        let (_, survivors, _) = group_by_size(vec![a, b]);
        assert_eq!(survivors[0][0].seq, 0);
        assert_eq!(survivors[0][1].seq, 1);
    }

    #[test]
    fn test_partial_stage_separates_different_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.bin", b"prefix-one");
        let b = write_file(dir.path(), "b.bin", b"prefix-two");

        let (_, survivors, _) = group_by_size(vec![a, b]);
        let (finals, survivors, stats) = group_by_partial_hash(survivors, &Hasher::new());

        assert_eq!(finals.len(), 2);
        assert!(survivors.is_empty());
        assert_eq!(stats.hashed_files, 2);
        assert_eq!(stats.singletons, 2);
    }

    #[test]
    fn test_partial_stage_keeps_matching_prefixes_together() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.bin", b"identical");
        let b = write_file(dir.path(), "b.bin", b"identical");

        let (_, survivors, _) = group_by_size(vec![a, b]);
        let (finals, survivors, _) = group_by_partial_hash(survivors, &Hasher::new());

        assert!(finals.is_empty());
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].len(), 2);
    }

    #[test]
    fn test_partial_stage_vanished_file_is_dropped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.bin", b"same-size!");
        let b = write_file(dir.path(), "b.bin", b"same-size?");

        let (_, survivors, _) = group_by_size(vec![a, b.clone()]);
        // Simulate a file disappearing between the size stat and hashing.
        fs::remove_file(&b).unwrap();

        let (finals, survivors, stats) = group_by_partial_hash(survivors, &Hasher::new());

        assert_eq!(stats.failed_files, 1);
        assert_eq!(stats.hashed_files, 1);
        assert_eq!(finals.len(), 1);
        assert!(survivors.is_empty());
    }

    #[test]
    fn test_full_stage_separates_late_divergence() {
        let dir = tempfile::tempdir().unwrap();
        // Same size, same first 64 KiB, different tails.
        let window = vec![7u8; 64 * 1024];
        let mut one = window.clone();
        one.extend_from_slice(b"alpha");
        let mut two = window;
        two.extend_from_slice(b"bravo");

        let a = write_file(dir.path(), "a.bin", &one);
        let b = write_file(dir.path(), "b.bin", &two);

        let (_, survivors, _) = group_by_size(vec![a, b]);
        let (finals, survivors, _) = group_by_partial_hash(survivors, &Hasher::new());
        assert!(finals.is_empty(), "partial stage must not separate these");

        let (finals, stats) = group_by_full_hash(survivors, &Hasher::new());
        assert_eq!(finals.len(), 2);
        assert_eq!(stats.singletons, 2);
        assert!(finals.iter().all(FileGroup::is_singleton));
    }

    #[test]
    fn test_full_stage_confirms_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let payload = vec![42u8; 70 * 1024];
        let a = write_file(dir.path(), "a.bin", &payload);
        let b = write_file(dir.path(), "b.bin", &payload);
        let c = write_file(dir.path(), "c.bin", &payload);

        let (_, survivors, _) = group_by_size(vec![a.clone(), b.clone(), c.clone()]);
        let (_, survivors, _) = group_by_partial_hash(survivors, &Hasher::new());
        let (finals, _) = group_by_full_hash(survivors, &Hasher::new());

        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].representative, a);
        assert_eq!(finals[0].duplicates, vec![b, c]);
    }

    #[test]
    fn test_empty_files_group_together() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.txt", b"");
        let b = write_file(dir.path(), "b.txt", b"");

        let (_, survivors, _) = group_by_size(vec![a.clone(), b.clone()]);
        let (_, survivors, _) = group_by_partial_hash(survivors, &Hasher::new());
        let (finals, _) = group_by_full_hash(survivors, &Hasher::new());

        assert_eq!(finals.len(), 1);
        assert_eq!(finals[0].len(), 2);
    }
}
