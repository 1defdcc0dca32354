use std::path::Path;

use rpa_blob::NoProgress;
use rpa_console::format::format_date;
use rpa_console::records::NewTeamMember;
use rpa_console::Console;
use rpa_storage::DocumentId;

use super::{read_files, require_session};

pub async fn cmd_team_add(
    console: &Console,
    name: &str,
    role: &str,
    phone: &str,
    picture: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let picture = match picture {
        Some(path) => read_files(&[path.to_path_buf()]).await?.pop(),
        None => None,
    };
    let member = NewTeamMember {
        full_name: name.to_string(),
        role: role.to_string(),
        phone_number: phone.to_string(),
        picture,
    };
    let id = console.team().create(member, &NoProgress).await?;
    println!("ID: {}", id);
    Ok(())
}

pub async fn cmd_team_list(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let members = console.team().list().await?;
    if members.is_empty() {
        println!("No team members found.");
        return Ok(());
    }
    println!("Team members:");
    for member in members {
        println!(
            "  {}  {} ({})  {}  added {}",
            member.id,
            member.record.full_name,
            member.record.role,
            member.record.phone_number,
            format_date(&member.record.created_at.to_rfc3339())
        );
    }
    Ok(())
}

pub async fn cmd_team_delete(console: &Console, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    console.team().delete(&DocumentId::from(id)).await?;
    Ok(())
}
