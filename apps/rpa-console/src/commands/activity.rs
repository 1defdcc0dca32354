use std::path::PathBuf;

use rpa_console::format::format_date;
use rpa_console::records::NewActivity;
use rpa_console::Console;
use rpa_storage::DocumentId;

use super::{edit_images, print_images, read_files, require_session};

pub async fn cmd_activity_create(
    console: &Console,
    name: &str,
    location: &str,
    date: &str,
    summary: &str,
    images: &[PathBuf],
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let activity = NewActivity {
        activity_name: name.to_string(),
        location: location.to_string(),
        date: date.to_string(),
        activity_summary: summary.to_string(),
        images: read_files(images).await?,
    };
    let id = console.activities().create(activity).await?;
    println!("ID: {}", id);
    Ok(())
}

pub async fn cmd_activity_list(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let activities = console.activities().list().await?;
    if activities.is_empty() {
        println!("No activities found.");
        return Ok(());
    }
    println!("Activities:");
    for activity in activities {
        let count = activity.record.activity_images.len();
        println!(
            "  {}  {} at {} on {} ({} image{})",
            activity.id,
            activity.record.activity_name,
            activity.record.location,
            activity.record.date.format("%d/%m/%Y"),
            count,
            if count == 1 { "" } else { "s" }
        );
    }
    Ok(())
}

pub async fn cmd_activity_show(console: &Console, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let activity = console.activities().get(&DocumentId::from(id)).await?;
    let record = activity.record;
    println!("{}", record.activity_name);
    println!("Location: {}", record.location);
    println!("Date:     {}", record.date.format("%d/%m/%Y"));
    println!("Created:  {}", format_date(&record.created_at.to_rfc3339()));
    if let Some(updated_at) = record.updated_at {
        println!("Updated:  {}", format_date(&updated_at.to_rfc3339()));
    }
    println!();
    println!("{}", record.activity_summary);
    println!();
    println!("Images:");
    print_images(&record.activity_images);
    Ok(())
}

pub async fn cmd_activity_delete(console: &Console, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    console.activities().delete(&DocumentId::from(id)).await?;
    Ok(())
}

pub async fn cmd_activity_images(
    console: &Console,
    id: &str,
    add: &[PathBuf],
    remove: &[usize],
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let editor = console.activities().edit_images(DocumentId::from(id)).await?;
    edit_images(editor, add, remove).await
}
