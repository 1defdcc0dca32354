pub mod activity;
pub mod article;
pub mod auth;
pub mod event;
pub mod membership;
pub mod profile;
pub mod registry;
pub mod service;
pub mod team;

pub use activity::{
    cmd_activity_create, cmd_activity_delete, cmd_activity_images, cmd_activity_list,
    cmd_activity_show,
};
pub use article::{cmd_article_create, cmd_article_delete, cmd_article_images, cmd_article_list};
pub use auth::{cmd_login, cmd_logout, cmd_whoami};
pub use event::{cmd_event_add, cmd_event_delete, cmd_event_list, cmd_event_update};
pub use membership::{
    cmd_membership_add, cmd_membership_delete, cmd_membership_list, cmd_membership_status,
};
pub use profile::{cmd_profile_set, cmd_profile_show};
pub use registry::{cmd_registry_add, cmd_registry_list};
pub use service::{cmd_service_add, cmd_service_delete, cmd_service_list, cmd_service_status};
pub use team::{cmd_team_add, cmd_team_delete, cmd_team_list};

use std::io::{self, Write};
use std::path::PathBuf;

use rpa_console::attachments::{AttachmentEditor, LocalFile};
use rpa_console::session::Session;
use rpa_console::Console;

/// The restored session, or an error telling the operator to sign in.
pub(crate) fn require_session(console: &Console) -> Result<Session, Box<dyn std::error::Error>> {
    console
        .session()
        .ok_or_else(|| "Not signed in. Run 'rpa-console login' first.".into())
}

pub(crate) fn prompt(label: &str) -> Result<String, Box<dyn std::error::Error>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
pub(crate) fn confirm(question: &str) -> Result<bool, Box<dyn std::error::Error>> {
    let answer = prompt(&format!("{} [y/N]: ", question))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

pub(crate) async fn read_files(paths: &[PathBuf]) -> Result<Vec<LocalFile>, Box<dyn std::error::Error>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = LocalFile::read(path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        files.push(file);
    }
    Ok(files)
}

/// Stage removals and additions on an opened editor, then commit.
pub(crate) async fn edit_images(
    mut editor: AttachmentEditor,
    add: &[PathBuf],
    remove: &[usize],
) -> Result<(), Box<dyn std::error::Error>> {
    if add.is_empty() && remove.is_empty() {
        print_images(editor.persisted());
        return Ok(());
    }
    let files = read_files(add).await?;

    editor.begin_edit();
    // Highest index first so earlier positions stay valid.
    let mut positions = remove.to_vec();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions.dedup();
    for index in positions {
        let url = editor.remove_existing(index)?;
        println!("Removing {}", url);
    }
    if !files.is_empty() {
        let outcome = editor.select_files(files)?;
        println!("Queued {} image(s)", outcome.accepted.len());
    }

    let images = editor.commit().await?;
    print_images(&images);
    Ok(())
}

pub(crate) fn print_images(images: &[String]) {
    if images.is_empty() {
        println!("  (no images)");
    }
    for (index, url) in images.iter().enumerate() {
        println!("  [{}] {}", index, url);
    }
}
