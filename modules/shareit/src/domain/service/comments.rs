use tracing::{info, instrument};

use super::{db_error, Service};
use crate::contract::model::{Comment, NewComment};
use crate::domain::error::DomainError;
use crate::domain::lifecycle;
use crate::domain::repo::CommentDraft;

impl Service {
    /// Leave a review. Allowed once the author has finished an approved booking of the item.
    #[instrument(
        name = "shareit.service.add_comment",
        skip(self, new_comment),
        fields(user_id = author_id)
    )]
    pub async fn add_comment(
        &self,
        author_id: i64,
        item_id: i64,
        new_comment: NewComment,
    ) -> Result<Comment, DomainError> {
        info!("Adding comment");

        self.validate_text("text", &new_comment.text)?;

        self.require_item(item_id).await?;
        self.require_user(author_id).await?;

        let now = self.clock.now();
        let bookings = self
            .bookings
            .list_by_items(&[item_id])
            .await
            .map_err(db_error)?;
        if !lifecycle::can_comment(author_id, &bookings, now) {
            return Err(DomainError::comment_not_allowed(author_id, item_id));
        }

        let comment = self
            .comments
            .insert(CommentDraft {
                item_id,
                author_id,
                text: new_comment.text,
                created: now,
            })
            .await
            .map_err(db_error)?;

        info!("Successfully added comment with id={}", comment.id);
        Ok(comment)
    }
}
