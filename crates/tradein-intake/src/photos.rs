//! Photo Associator
//!
//! Maps each uploaded file to its owning item via the field-name
//! convention, then fans the storage calls out with bounded concurrency.
//! Association is a pure step separate from storage dispatch so the
//! structural gate can run before any external call is made.

use std::sync::OnceLock;
use std::time::Duration;

use futures::StreamExt;
use regex::Regex;
use tradein_core::{ItemRecord, PhotoRef, Warning};
use tradein_storage::Storage;
use uuid::Uuid;

use crate::form::UploadedFile;

/// A file matched to its owning item, not yet stored. Jobs are kept in
/// arrival order; per-item photo sequences are rebuilt from that order
/// after all storage calls settle, never from completion order.
#[derive(Debug)]
pub struct PhotoJob {
    pub item_index: u32,
    pub file: UploadedFile,
}

fn photos_bracket_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Trailing `[]` tolerated: some form libraries append it to array fields.
    RE.get_or_init(|| Regex::new(r"^photos\[(\d+)\](\[\])?$").expect("static regex"))
}

fn photos_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^photos_(\d+)$").expect("static regex"))
}

fn pairs_photos_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^pairs\[(\d+)\]\[photos\](\[\])?$").expect("static regex"))
}

/// Derive the owning item index from a file's field name. Ordered
/// matchers, same pattern as the field parser: `photos[<i>]`,
/// `photos_<i>`, `pairs[<i>][photos]`.
pub fn owning_index(field_name: &str) -> Option<u32> {
    for re in [photos_bracket_re(), photos_suffix_re(), pairs_photos_re()] {
        if let Some(caps) = re.captures(field_name) {
            if let Ok(index) = caps[1].parse::<u32>() {
                return Some(index);
            }
        }
    }
    None
}

/// Pure association step. Files whose field name matches no convention
/// are reported as unassociated, never silently dropped. An index
/// referenced only by a photo materializes a minimal item record so the
/// photo is not lost.
pub fn associate_files(
    items: &mut Vec<ItemRecord>,
    files: Vec<UploadedFile>,
    warnings: &mut Vec<Warning>,
) -> Vec<PhotoJob> {
    let mut jobs = Vec::with_capacity(files.len());
    for file in files {
        match owning_index(&file.field_name) {
            Some(index) => {
                if let Err(pos) = items.binary_search_by_key(&index, |i| i.index) {
                    items.insert(pos, ItemRecord::empty_at(index));
                }
                jobs.push(PhotoJob {
                    item_index: index,
                    file,
                });
            }
            None => {
                tracing::warn!(
                    field = %file.field_name,
                    filename = %file.filename,
                    "Uploaded file matched no item"
                );
                warnings.push(Warning::UnassociatedFile {
                    field_name: file.field_name,
                    filename: file.filename,
                });
            }
        }
    }
    jobs
}

/// Object name under which a photo is stored: `{uuid}.{ext}`, with the
/// extension taken from the original filename when it looks sane.
fn stored_filename(original: &str) -> String {
    let ext = std::path::Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e.len() <= 8 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_string());
    format!("{}.{}", Uuid::new_v4(), ext)
}

/// Dispatch storage calls for all jobs with bounded concurrency and a
/// per-call timeout, then append the resulting photo refs (resolved or
/// tombstoned) to their owning items.
///
/// `buffered` polls up to `concurrency` uploads at once but yields
/// results in dispatch order, which is arrival order, so per-item photo
/// sequences come out ordered regardless of completion order. Byte
/// buffers move into the storage call and are not retained.
pub async fn store_photos(
    items: &mut [ItemRecord],
    jobs: Vec<PhotoJob>,
    storage: &dyn Storage,
    concurrency: usize,
    timeout: Duration,
    warnings: &mut Vec<Warning>,
) {
    let results: Vec<(u32, String, String, Result<String, String>)> =
        futures::stream::iter(jobs.into_iter().map(|job| {
            let PhotoJob { item_index, file } = job;
            async move {
                let stored_name = stored_filename(&file.filename);
                let UploadedFile {
                    filename,
                    content_type,
                    data,
                    ..
                } = file;
                let outcome =
                    tokio::time::timeout(timeout, storage.upload(&stored_name, &content_type, data))
                        .await;
                let url = match outcome {
                    Ok(Ok((_key, url))) => Ok(url),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err(format!("timed out after {}s", timeout.as_secs())),
                };
                (item_index, filename, content_type, url)
            }
        }))
        .buffered(concurrency.max(1))
        .collect()
        .await;

    for (item_index, filename, content_type, url) in results {
        let resolved_url = match url {
            Ok(url) => Some(url),
            Err(detail) => {
                tracing::warn!(
                    item_index,
                    filename = %filename,
                    error = %detail,
                    "Photo storage failed, keeping tombstone"
                );
                warnings.push(Warning::PhotoStorageFailed {
                    item_index,
                    filename: filename.clone(),
                    detail,
                });
                None
            }
        };
        match items.binary_search_by_key(&item_index, |i| i.index) {
            Ok(pos) => items[pos].photos.push(PhotoRef {
                original_filename: filename,
                content_type,
                resolved_url,
            }),
            // Association materializes a record for every job index, so
            // this only fires if a caller hands in mismatched inputs.
            Err(_) => {
                tracing::error!(
                    item_index,
                    filename = %filename,
                    "No item record for stored photo, dropping it"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tradein_storage::{StorageError, StorageResult};

    /// Upload succeeds unless the file content starts with `FAIL`; the
    /// returned URL echoes the stored name so tests can count resolutions.
    struct FakeStorage {
        calls: AtomicUsize,
    }

    impl FakeStorage {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Storage for FakeStorage {
        async fn upload(
            &self,
            filename: &str,
            _content_type: &str,
            data: Vec<u8>,
        ) -> StorageResult<(String, String)> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if data.starts_with(b"FAIL") {
                return Err(StorageError::UploadFailed("backend refused".to_string()));
            }
            Ok((
                format!("photos/{}", filename),
                format!("http://assets.test/photos/{}", filename),
            ))
        }

        async fn delete(&self, _storage_key: &str) -> StorageResult<()> {
            Ok(())
        }

        async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
            Ok(true)
        }
    }

    fn file(field_name: &str, filename: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            field_name: field_name.to_string(),
            filename: filename.to_string(),
            content_type: "image/jpeg".to_string(),
            data: data.to_vec(),
        }
    }

    #[test]
    fn owning_index_matches_conventions() {
        assert_eq!(owning_index("photos[1]"), Some(1));
        assert_eq!(owning_index("photos[12][]"), Some(12));
        assert_eq!(owning_index("photos_3"), Some(3));
        assert_eq!(owning_index("pairs[0][photos]"), Some(0));
        assert_eq!(owning_index("photos"), None);
        assert_eq!(owning_index("photos[a]"), None);
        assert_eq!(owning_index("selfie"), None);
    }

    #[test]
    fn associate_materializes_item_for_photo_only_index() {
        let mut items = vec![ItemRecord::empty_at(0)];
        let mut warnings = Vec::new();
        let jobs = associate_files(
            &mut items,
            vec![file("photos[4]", "side.jpg", b"jpeg")],
            &mut warnings,
        );
        assert_eq!(jobs.len(), 1);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].index, 4);
        assert_eq!(items[1].brand_model, "");
        assert!(warnings.is_empty());
    }

    #[test]
    fn associate_reports_unmatched_files() {
        let mut items = Vec::new();
        let mut warnings = Vec::new();
        let jobs = associate_files(
            &mut items,
            vec![file("photos", "orphan.jpg", b"jpeg")],
            &mut warnings,
        );
        assert!(jobs.is_empty());
        assert!(items.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Warning::UnassociatedFile { ref filename, .. } if filename == "orphan.jpg"
        ));
    }

    #[test]
    fn stored_filename_keeps_sane_extension() {
        assert!(stored_filename("pair.JPG").ends_with(".jpg"));
        assert!(stored_filename("no_extension").ends_with(".bin"));
        assert!(stored_filename("weird.e x t").ends_with(".bin"));
    }

    #[tokio::test]
    async fn store_photos_preserves_arrival_order_per_item() {
        let storage = FakeStorage::new();
        let mut items = Vec::new();
        let mut warnings = Vec::new();
        let jobs = associate_files(
            &mut items,
            vec![
                file("photos[1]", "first.jpg", b"a"),
                file("photos[0]", "other.jpg", b"b"),
                file("photos[1]", "second.jpg", b"c"),
            ],
            &mut warnings,
        );

        store_photos(
            &mut items,
            jobs,
            &storage,
            3,
            Duration::from_secs(5),
            &mut warnings,
        )
        .await;

        assert_eq!(storage.calls.load(Ordering::SeqCst), 3);
        let item1 = items.iter().find(|i| i.index == 1).unwrap();
        assert_eq!(item1.photos.len(), 2);
        assert_eq!(item1.photos[0].original_filename, "first.jpg");
        assert_eq!(item1.photos[1].original_filename, "second.jpg");
        assert!(item1.photos.iter().all(|p| !p.is_tombstone()));
    }

    #[tokio::test]
    async fn single_failure_tombstones_only_that_slot() {
        let storage = FakeStorage::new();
        let mut items = vec![ItemRecord::empty_at(0)];
        let mut warnings = Vec::new();
        let jobs = associate_files(
            &mut items,
            vec![
                file("photos[0]", "good1.jpg", b"ok"),
                file("photos[0]", "bad.jpg", b"FAIL"),
                file("photos[0]", "good2.jpg", b"ok"),
            ],
            &mut warnings,
        );

        store_photos(
            &mut items,
            jobs,
            &storage,
            2,
            Duration::from_secs(5),
            &mut warnings,
        )
        .await;

        assert_eq!(items[0].photos.len(), 3);
        assert!(!items[0].photos[0].is_tombstone());
        assert!(items[0].photos[1].is_tombstone());
        assert!(!items[0].photos[2].is_tombstone());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Warning::PhotoStorageFailed { item_index: 0, ref filename, .. } if filename == "bad.jpg"
        ));
    }

    #[tokio::test]
    async fn sequential_concurrency_still_completes() {
        let storage = FakeStorage::new();
        let mut items = vec![ItemRecord::empty_at(0)];
        let mut warnings = Vec::new();
        let jobs = associate_files(
            &mut items,
            vec![
                file("photos[0]", "a.jpg", b"x"),
                file("photos[0]", "b.jpg", b"y"),
            ],
            &mut warnings,
        );

        // concurrency 0 clamps to 1, strictly sequential uploads
        store_photos(
            &mut items,
            jobs,
            &storage,
            0,
            Duration::from_secs(5),
            &mut warnings,
        )
        .await;

        assert_eq!(items[0].photos.len(), 2);
        assert!(warnings.is_empty());
    }

    /// Upload never completes; only the per-call timeout resolves it.
    struct HangingStorage;

    #[async_trait]
    impl Storage for HangingStorage {
        async fn upload(
            &self,
            _filename: &str,
            _content_type: &str,
            _data: Vec<u8>,
        ) -> StorageResult<(String, String)> {
            futures::future::pending().await
        }

        async fn delete(&self, _storage_key: &str) -> StorageResult<()> {
            Ok(())
        }

        async fn exists(&self, _storage_key: &str) -> StorageResult<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn upload_timeout_tombstones_the_slot() {
        let storage = HangingStorage;
        let mut items = vec![ItemRecord::empty_at(0)];
        let mut warnings = Vec::new();
        let jobs = associate_files(
            &mut items,
            vec![file("photos[0]", "slow.jpg", b"jpeg")],
            &mut warnings,
        );

        store_photos(
            &mut items,
            jobs,
            &storage,
            2,
            Duration::from_millis(50),
            &mut warnings,
        )
        .await;

        assert_eq!(items[0].photos.len(), 1);
        assert!(items[0].photos[0].is_tombstone());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            warnings[0],
            Warning::PhotoStorageFailed { item_index: 0, ref detail, .. }
                if detail.contains("timed out")
        ));
    }

    #[tokio::test]
    async fn job_without_item_record_is_dropped_not_panicked() {
        let storage = FakeStorage::new();
        let mut items = vec![ItemRecord::empty_at(0)];
        let mut warnings = Vec::new();
        let jobs = vec![PhotoJob {
            item_index: 9,
            file: file("photos[9]", "stray.jpg", b"jpeg"),
        }];

        store_photos(
            &mut items,
            jobs,
            &storage,
            1,
            Duration::from_secs(5),
            &mut warnings,
        )
        .await;

        assert!(items[0].photos.is_empty());
        assert!(warnings.is_empty());
    }
}
