//! Articles, their cover image and attachment gallery.

use chrono::Utc;
use rpa_blob::{BlobPath, ProgressObserver};
use rpa_storage::{
    fetch_record, insert_record, query_records, Article, Collection, Direction, DocumentId,
    DocumentStore, Fields, Query, Stored,
};
use serde_json::Value;
use tracing::{info, warn};

use super::RecordContext;
use crate::attachments::{AttachmentEditor, AttachmentTarget, LocalFile};
use crate::error::{AttachmentError, RecordError};
use crate::uploads::{delete_all_quietly, upload};
use crate::validation::{required, FieldErrors};

/// Covers are stored by file name, so re-uploading a name replaces the blob.
const COVER_FOLDER: &str = "article-images";

#[derive(Clone, Debug, Default)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub article_summary: String,
    pub posted_by: String,
    /// Download URL returned by [`ArticleService::upload_cover`]
    pub image_url: Option<String>,
}

impl NewArticle {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check("title", required(&self.title, "Title is required"));
        errors.check("content", required(&self.content, "Content is required"));
        errors.check(
            "articleSummary",
            required(&self.article_summary, "Summary is required"),
        );
        errors.check("postedBy", required(&self.posted_by, "Author name is required"));
        errors
    }
}

#[derive(Clone, Debug, Default)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub article_summary: Option<String>,
    pub posted_by: Option<String>,
    pub image_url: Option<String>,
}

impl ArticleUpdate {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(v) = &self.title {
            errors.check("title", required(v, "Title is required"));
        }
        if let Some(v) = &self.content {
            errors.check("content", required(v, "Content is required"));
        }
        if let Some(v) = &self.article_summary {
            errors.check("articleSummary", required(v, "Summary is required"));
        }
        if let Some(v) = &self.posted_by {
            errors.check("postedBy", required(v, "Author name is required"));
        }
        errors
    }
}

pub struct ArticleService {
    ctx: RecordContext,
}

impl ArticleService {
    pub fn new(ctx: RecordContext) -> Self {
        Self { ctx }
    }

    /// Upload a cover image ahead of publishing and return its download URL.
    pub async fn upload_cover(
        &self,
        file: &LocalFile,
        progress: &dyn ProgressObserver,
    ) -> Result<String, RecordError> {
        let result = async {
            let path = BlobPath::in_folder(COVER_FOLDER, &file.name)?;
            upload(self.ctx.blobs.as_ref(), &path, file, progress).await
        }
        .await;
        self.ctx.report(
            result,
            "Image uploaded successfully",
            "Image upload failed",
        )
    }

    pub async fn create(&self, article: NewArticle) -> Result<DocumentId, RecordError> {
        let errors = article.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        let record = Article {
            title: article.title,
            content: article.content,
            article_summary: article.article_summary,
            posted_by: article.posted_by,
            image_url: article.image_url.filter(|u| !u.is_empty()),
            article_images: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        };
        let result = insert_record(self.ctx.documents.as_ref(), &record).await;
        if let Ok(id) = &result {
            info!(id = %id, "Article published");
        }
        self.ctx.report(
            result,
            "Article published successfully!",
            "Failed to publish article",
        )
    }

    /// Articles, newest first.
    pub async fn list(&self) -> Result<Vec<Stored<Article>>, RecordError> {
        let query = Query::new().order_by("createdAt", Direction::Descending);
        let result = query_records(self.ctx.documents.as_ref(), &query).await;
        self.ctx.report_fetch(result, "Failed to fetch articles")
    }

    pub async fn get(&self, id: &DocumentId) -> Result<Stored<Article>, RecordError> {
        Ok(fetch_record(self.ctx.documents.as_ref(), id).await?)
    }

    pub async fn update(&self, id: &DocumentId, update: ArticleUpdate) -> Result<(), RecordError> {
        let errors = update.validate();
        if !errors.is_empty() {
            return self.ctx.reject(errors);
        }
        let mut fields = Fields::new();
        let updates = [
            ("title", update.title),
            ("content", update.content),
            ("articleSummary", update.article_summary),
            ("postedBy", update.posted_by),
            ("imageUrl", update.image_url),
        ];
        for (field, value) in updates {
            if let Some(value) = value {
                fields.insert(field.to_string(), Value::from(value));
            }
        }
        if fields.is_empty() {
            return Ok(());
        }
        fields.insert("updatedAt".into(), Value::from(Utc::now().to_rfc3339()));

        let result = self
            .ctx
            .documents
            .update(Collection::Articles, id, fields)
            .await;
        self.ctx.report(
            result,
            "Article updated successfully!",
            "Failed to update article",
        )
    }

    /// Delete the article and its gallery images. The cover may be shared and is kept.
    pub async fn delete(&self, id: &DocumentId) -> Result<(), RecordError> {
        let result = self.remove(id).await;
        self.ctx.report(
            result,
            "Article deleted successfully",
            "Failed to delete article",
        )
    }

    async fn remove(&self, id: &DocumentId) -> Result<(), RecordError> {
        let existing: Stored<Article> = fetch_record(self.ctx.documents.as_ref(), id).await?;
        self.ctx.documents.delete(Collection::Articles, id).await?;
        let failed = delete_all_quietly(self.ctx.blobs.as_ref(), &existing.record.article_images).await;
        if failed > 0 {
            warn!(id = %id, failed, "Some article images were left behind");
        }
        info!(id = %id, "Article deleted");
        Ok(())
    }

    /// Open the attachment editor for an article.
    pub async fn edit_images(&self, id: DocumentId) -> Result<AttachmentEditor, AttachmentError> {
        AttachmentEditor::open(
            self.ctx.documents.clone(),
            self.ctx.blobs.clone(),
            self.ctx.notifier.clone(),
            AttachmentTarget::article(id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastKind;
    use crate::tests::common::{image, Backends};
    use rpa_blob::NoProgress;

    fn article(image_url: Option<String>) -> NewArticle {
        NewArticle {
            title: "Annual report".into(),
            content: "<p>Highlights</p>".into(),
            article_summary: "The year in review".into(),
            posted_by: "Asha".into(),
            image_url,
        }
    }

    #[test]
    fn test_every_field_is_required() {
        let errors = NewArticle::default().validate();
        let messages: Vec<&str> = errors.iter().map(|(_, m)| m).collect();
        assert_eq!(
            messages,
            vec![
                "Title is required",
                "Content is required",
                "Summary is required",
                "Author name is required"
            ]
        );
    }

    #[tokio::test]
    async fn test_cover_upload_then_publish() {
        let backends = Backends::new();
        let service = ArticleService::new(backends.context());

        let url = service
            .upload_cover(&image("cover.jpg"), &NoProgress)
            .await
            .unwrap();
        assert!(backends.blob_exists("article-images/cover.jpg"));
        assert!(backends
            .toasts
            .contains(ToastKind::Success, "Image uploaded successfully"));

        let id = service.create(article(Some(url.clone()))).await.unwrap();
        let stored = service.get(&id).await.unwrap().record;
        assert_eq!(stored.image_url, Some(url));
        assert!(stored.article_images.is_empty());
        assert!(backends
            .toasts
            .contains(ToastKind::Success, "Article published successfully!"));
    }

    #[tokio::test]
    async fn test_cover_upload_failure() {
        let backends = Backends::new();
        backends.blobs.fail_uploads_matching("article-images/");
        let service = ArticleService::new(backends.context());
        assert!(service
            .upload_cover(&image("cover.jpg"), &NoProgress)
            .await
            .is_err());
        assert!(backends.toasts.contains(ToastKind::Error, "Image upload failed"));
    }

    #[tokio::test]
    async fn test_delete_keeps_cover_and_removes_gallery() {
        let backends = Backends::new();
        let service = ArticleService::new(backends.context());
        let cover = service
            .upload_cover(&image("cover.jpg"), &NoProgress)
            .await
            .unwrap();
        let id = service.create(article(Some(cover))).await.unwrap();
        let gallery = backends.put_blob("articles/extra.jpg").await;
        let mut fields = Fields::new();
        fields.insert("articleImages".into(), Value::from(vec![gallery]));
        backends
            .documents
            .update(Collection::Articles, &id, fields)
            .await
            .unwrap();

        service.delete(&id).await.unwrap();
        assert!(backends
            .toasts
            .contains(ToastKind::Success, "Article deleted successfully"));
        assert!(backends.blob_exists("article-images/cover.jpg"));
        assert!(!backends.blob_exists("articles/extra.jpg"));
    }

    #[tokio::test]
    async fn test_delete_missing_article_fails() {
        let backends = Backends::new();
        let service = ArticleService::new(backends.context());
        assert!(service.delete(&DocumentId::from("nope")).await.is_err());
        assert!(backends
            .toasts
            .contains(ToastKind::Error, "Failed to delete article"));
    }
}
