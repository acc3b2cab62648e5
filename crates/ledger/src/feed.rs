//! User-authored feed writes: proof posts and comments.

use std::sync::Arc;

use studyquest_core::activity::ActivityType;
use studyquest_core::sanitize::{normalize_comment, strip_markup};
use studyquest_core::types::DbId;
use studyquest_db::models::activity_log::{
    ActivityLog, CommentWithAuthor, CreateActivityLog, CreateComment,
};

use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;

pub struct FeedService {
    store: Arc<dyn LedgerStore>,
}

impl FeedService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Append a PROOF entry. The image, if any, is referenced by URL.
    pub async fn post_proof(
        &self,
        user_id: DbId,
        text: &str,
        image_url: Option<String>,
    ) -> LedgerResult<ActivityLog> {
        let text = strip_markup(text);
        if text.is_empty() {
            return Err(LedgerError::Validation("Proof text is required".to_string()));
        }
        let image_url = image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let mut tx = self.store.begin().await?;
        let entry = tx
            .append_activity(&CreateActivityLog {
                user_id,
                activity_type: ActivityType::Proof,
                text,
                image_url,
            })
            .await?;
        tx.commit().await?;

        tracing::info!(user_id, activity_id = entry.id, "Proof posted");
        Ok(entry)
    }

    /// Comment on an existing feed entry.
    pub async fn add_comment(
        &self,
        user_id: DbId,
        activity_id: DbId,
        text: &str,
    ) -> LedgerResult<CommentWithAuthor> {
        let text = normalize_comment(text).map_err(LedgerError::Validation)?;

        if !self.store.activity_exists(activity_id).await? {
            return Err(LedgerError::ActivityNotFound(activity_id));
        }

        let mut tx = self.store.begin().await?;
        let comment = tx
            .insert_comment(&CreateComment {
                activity_log_id: activity_id,
                user_id,
                text,
            })
            .await?;
        tx.commit().await?;

        tracing::debug!(user_id, activity_id, comment_id = comment.id, "Comment added");
        Ok(comment)
    }
}
