use rpa_console::records::ProfileSaved;
use rpa_console::Console;

use super::require_session;

pub async fn cmd_profile_show(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    let session = require_session(console)?;
    let name = console.profile().load().await?;
    println!("Phone: {}", session.phone_number);
    println!("Name:  {}", if name.is_empty() { "-" } else { name.as_str() });
    Ok(())
}

pub async fn cmd_profile_set(
    console: &Console,
    full_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    match console.profile().save(full_name).await? {
        ProfileSaved::Updated => println!("Registry entry updated."),
        ProfileSaved::Created => println!("Registry entry created."),
    }
    Ok(())
}
