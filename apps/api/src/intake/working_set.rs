//! The session's set of uploaded resources.
//!
//! All mutation goes through one mutex, so intake's duplicate check and the
//! insert that follows it happen atomically. `settled` wakes anyone waiting
//! for every resource to reach a terminal state.
//!
//! Blobs are held only while a resource can still be extracted. Once it is
//! terminal the bytes are released; failed entries are capped at
//! `MAX_FAILED_RESOURCES`, oldest dropped first.

use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extraction::ExtractionError;
use crate::intake::resource::{LifecycleState, RawFile, UploadedResource};
use crate::intake::validator::{validate, IntakeRejection};

pub const MAX_FAILED_RESOURCES: usize = 50;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkingSetError {
    #[error("Resource {0} not found")]
    NotFound(Uuid),

    #[error("Resource {id} is {state:?}; extraction only starts from pending")]
    NotPending { id: Uuid, state: LifecycleState },
}

/// Outcome of offering a file to the working set. Both variants name the
/// resource that was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted(Uuid),
    Rejected { id: Uuid, reason: IntakeRejection },
}

impl Admission {
    pub fn id(&self) -> Uuid {
        match self {
            Admission::Accepted(id) => *id,
            Admission::Rejected { id, .. } => *id,
        }
    }
}

#[derive(Default)]
pub struct WorkingSet {
    resources: Mutex<Vec<UploadedResource>>,
    settled: Notify,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `file` against the current set and appends it as pending
    /// (accepted) or failed (rejected).
    pub async fn admit(&self, file: RawFile) -> Admission {
        let mut resources = self.resources.lock().await;
        match validate(&file, &resources) {
            Ok(accepted) => {
                let resource = UploadedResource::pending(file);
                let id = resource.id;
                info!(
                    "Accepted '{}' ({} bytes, {:?}) as {id}",
                    resource.file.filename,
                    resource.file.size(),
                    accepted.kind
                );
                resources.push(resource);
                Admission::Accepted(id)
            }
            Err(reason) => {
                warn!("Rejected '{}': {reason}", file.filename);
                let resource = UploadedResource::rejected(file, reason.code(), reason.to_string());
                let id = resource.id;
                resources.push(resource);
                evict_oldest_failed(&mut resources);
                self.settled.notify_waiters();
                Admission::Rejected { id, reason }
            }
        }
    }

    /// Moves a pending resource to `extracting` and hands back its file.
    /// Refuses a resource that is already extracting or finished.
    pub async fn begin_extraction(&self, id: Uuid) -> Result<RawFile, WorkingSetError> {
        let mut resources = self.resources.lock().await;
        let resource = resources
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(WorkingSetError::NotFound(id))?;
        if resource.state != LifecycleState::Pending {
            return Err(WorkingSetError::NotPending {
                id,
                state: resource.state,
            });
        }
        resource.state = LifecycleState::Extracting;
        Ok(resource.file.clone())
    }

    /// Records the extraction outcome. Returns `false` when the resource was
    /// removed while extracting; the result is then discarded.
    pub async fn finish_extraction(
        &self,
        id: Uuid,
        outcome: Result<String, ExtractionError>,
    ) -> bool {
        let mut resources = self.resources.lock().await;
        let Some(resource) = resources.iter_mut().find(|r| r.id == id) else {
            debug!("Resource {id} was removed during extraction; discarding result");
            return false;
        };
        match outcome {
            Ok(text) => {
                info!(
                    "Extracted {} characters from '{}'",
                    text.chars().count(),
                    resource.file.filename
                );
                resource.state = LifecycleState::Extracted;
                resource.extracted_text = Some(text);
                resource.failure_code = None;
                resource.failure_reason = None;
            }
            Err(e) => {
                warn!("Extraction failed for '{}': {e}", resource.file.filename);
                resource.state = LifecycleState::Failed;
                resource.extracted_text = None;
                resource.failure_code = Some(e.code());
                resource.failure_reason = Some(e.to_string());
            }
        }
        resource.file.release();
        evict_oldest_failed(&mut resources);
        drop(resources);
        self.settled.notify_waiters();
        true
    }

    pub async fn remove(&self, id: Uuid) -> Option<UploadedResource> {
        let mut resources = self.resources.lock().await;
        let index = resources.iter().position(|r| r.id == id)?;
        let removed = resources.remove(index);
        drop(resources);
        self.settled.notify_waiters();
        Some(removed)
    }

    pub async fn get(&self, id: Uuid) -> Option<UploadedResource> {
        self.resources
            .lock()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// All resources in upload order.
    pub async fn snapshot(&self) -> Vec<UploadedResource> {
        self.resources.lock().await.clone()
    }

    /// Waits until no resource is pending or extracting, then returns the
    /// set as of that moment.
    pub async fn wait_until_settled(&self) -> Vec<UploadedResource> {
        loop {
            let notified = self.settled.notified();
            tokio::pin!(notified);
            // Register before checking so a transition between the check and
            // the await is not missed.
            notified.as_mut().enable();

            {
                let resources = self.resources.lock().await;
                if resources.iter().all(|r| r.state.is_terminal()) {
                    return resources.clone();
                }
            }

            notified.await;
        }
    }
}

/// Drops the oldest failed entries beyond `MAX_FAILED_RESOURCES`.
fn evict_oldest_failed(resources: &mut Vec<UploadedResource>) {
    let failed = resources
        .iter()
        .filter(|r| r.state == LifecycleState::Failed)
        .count();
    let mut excess = failed.saturating_sub(MAX_FAILED_RESOURCES);
    if excess == 0 {
        return;
    }
    debug!("Evicting {excess} oldest failed resource(s)");
    resources.retain(|r| {
        if excess > 0 && r.state == LifecycleState::Failed {
            excess -= 1;
            false
        } else {
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::intake::validator::MAX_FILE_BYTES;

    fn text_file(name: &str, size: usize) -> RawFile {
        RawFile::new(name, Some("text/plain".into()), vec![b'a'; size])
    }

    #[tokio::test]
    async fn test_same_file_twice_accepted_then_duplicate() {
        let set = WorkingSet::new();
        let first = set.admit(text_file("cv.txt", 400)).await;
        assert!(matches!(first, Admission::Accepted(_)));

        let second = set.admit(text_file("cv.txt", 400)).await;
        assert!(matches!(
            second,
            Admission::Rejected {
                reason: IntakeRejection::DuplicateFile { .. },
                ..
            }
        ));

        let all = set.snapshot().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].state, LifecycleState::Pending);
        assert_eq!(all[1].state, LifecycleState::Failed);
        assert_eq!(all[1].failure_code, Some("duplicate_file"));
    }

    #[tokio::test]
    async fn test_one_extraction_in_flight_per_resource() {
        let set = WorkingSet::new();
        let id = set.admit(text_file("cv.txt", 400)).await.id();

        assert!(set.begin_extraction(id).await.is_ok());
        assert_eq!(
            set.begin_extraction(id).await,
            Err(WorkingSetError::NotPending {
                id,
                state: LifecycleState::Extracting
            })
        );
    }

    #[tokio::test]
    async fn test_begin_extraction_unknown_id() {
        let set = WorkingSet::new();
        let id = Uuid::new_v4();
        assert_eq!(
            set.begin_extraction(id).await,
            Err(WorkingSetError::NotFound(id))
        );
    }

    #[tokio::test]
    async fn test_finish_records_failure_reason() {
        let set = WorkingSet::new();
        let id = set.admit(text_file("cv.txt", 400)).await.id();
        set.begin_extraction(id).await.unwrap();
        assert!(
            set.finish_extraction(id, Err(ExtractionError::InsufficientText { chars: 12 }))
                .await
        );

        let resource = set.get(id).await.unwrap();
        assert_eq!(resource.state, LifecycleState::Failed);
        assert_eq!(resource.failure_code, Some("insufficient_text"));
        assert!(resource.extracted_text.is_none());
    }

    #[tokio::test]
    async fn test_rejected_oversize_upload_keeps_no_bytes() {
        let set = WorkingSet::new();
        let big = RawFile::new(
            "huge.pdf",
            Some("application/pdf".into()),
            vec![0u8; MAX_FILE_BYTES + 1],
        );
        let admission = set.admit(big).await;
        assert!(matches!(
            admission,
            Admission::Rejected {
                reason: IntakeRejection::TooLarge { .. },
                ..
            }
        ));

        let resource = set.get(admission.id()).await.unwrap();
        assert!(resource.file.bytes().is_empty());
        assert_eq!(resource.file.size(), MAX_FILE_BYTES + 1);
        assert_eq!(resource.file.filename, "huge.pdf");
        assert_eq!(resource.failure_code, Some("too_large"));
    }

    #[tokio::test]
    async fn test_finished_resource_releases_bytes() {
        let set = WorkingSet::new();
        let id = set.admit(text_file("cv.txt", 400)).await.id();
        let in_flight = set.begin_extraction(id).await.unwrap();
        assert_eq!(in_flight.bytes().len(), 400);

        set.finish_extraction(id, Ok("extracted text".into())).await;

        let resource = set.get(id).await.unwrap();
        assert!(resource.file.is_released());
        assert_eq!(resource.file.size(), 400);
        // Still a duplicate of itself after the blob is gone.
        assert!(matches!(
            set.admit(text_file("cv.txt", 400)).await,
            Admission::Rejected {
                reason: IntakeRejection::DuplicateFile { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_failed_entries_are_capped_oldest_first() {
        let set = WorkingSet::new();
        for i in 0..MAX_FAILED_RESOURCES + 5 {
            set.admit(text_file(&format!("photo{i}.png"), 400)).await;
        }
        let kept = set.admit(text_file("cv.txt", 400)).await.id();

        let all = set.snapshot().await;
        assert_eq!(all.len(), MAX_FAILED_RESOURCES + 1);
        assert_eq!(all[0].file.filename, "photo5.png");
        assert!(all.iter().any(|r| r.id == kept));
    }

    #[tokio::test]
    async fn test_finish_after_remove_is_discarded() {
        let set = WorkingSet::new();
        let id = set.admit(text_file("cv.txt", 400)).await.id();
        set.begin_extraction(id).await.unwrap();
        assert!(set.remove(id).await.is_some());
        assert!(!set.finish_extraction(id, Ok("text".into())).await);
        assert!(set.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_wait_until_settled_returns_immediately_when_idle() {
        let set = WorkingSet::new();
        set.admit(text_file("bad.png", 400)).await;
        let settled = set.wait_until_settled().await;
        assert_eq!(settled.len(), 1);
    }

    #[tokio::test]
    async fn test_wait_until_settled_waits_for_extraction() {
        let set = Arc::new(WorkingSet::new());
        let id = set.admit(text_file("cv.txt", 400)).await.id();
        set.begin_extraction(id).await.unwrap();

        let waiter = {
            let set = set.clone();
            tokio::spawn(async move { set.wait_until_settled().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        set.finish_extraction(id, Ok("extracted text".into())).await;
        let settled = waiter.await.unwrap();
        assert_eq!(settled[0].state, LifecycleState::Extracted);
        assert_eq!(settled[0].extracted_text.as_deref(), Some("extracted text"));
    }
}
