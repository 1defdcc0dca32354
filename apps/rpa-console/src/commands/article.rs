use std::path::{Path, PathBuf};

use rpa_blob::NoProgress;
use rpa_console::format::format_date;
use rpa_console::records::NewArticle;
use rpa_console::Console;
use rpa_storage::DocumentId;

use super::{edit_images, read_files, require_session};

pub async fn cmd_article_create(
    console: &Console,
    title: &str,
    content: &str,
    summary: &str,
    posted_by: &str,
    cover: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let articles = console.articles();
    let image_url = match cover {
        Some(path) => {
            let file = read_files(&[path.to_path_buf()])
                .await?
                .pop()
                .ok_or("No cover image read")?;
            Some(articles.upload_cover(&file, &NoProgress).await?)
        }
        None => None,
    };
    let article = NewArticle {
        title: title.to_string(),
        content: content.to_string(),
        article_summary: summary.to_string(),
        posted_by: posted_by.to_string(),
        image_url,
    };
    let id = articles.create(article).await?;
    println!("ID: {}", id);
    Ok(())
}

pub async fn cmd_article_list(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let articles = console.articles().list().await?;
    if articles.is_empty() {
        println!("No articles found.");
        return Ok(());
    }
    println!("Articles:");
    for article in articles {
        println!(
            "  {}  {} by {} ({})",
            article.id,
            article.record.title,
            article.record.posted_by,
            format_date(&article.record.created_at.to_rfc3339())
        );
    }
    Ok(())
}

pub async fn cmd_article_delete(console: &Console, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    console.articles().delete(&DocumentId::from(id)).await?;
    Ok(())
}

pub async fn cmd_article_images(
    console: &Console,
    id: &str,
    add: &[PathBuf],
    remove: &[usize],
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let editor = console.articles().edit_images(DocumentId::from(id)).await?;
    edit_images(editor, add, remove).await
}
