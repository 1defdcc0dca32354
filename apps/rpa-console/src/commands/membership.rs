use rpa_console::format::format_date;
use rpa_console::records::{DeleteConfirmation, NewMembershipRequest};
use rpa_console::Console;
use rpa_storage::{DocumentId, MembershipStatus};

use super::{confirm, require_session};

pub async fn cmd_membership_add(
    console: &Console,
    name: &str,
    contact: &str,
    location: &str,
    membership_type: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let request = NewMembershipRequest {
        full_name: name.to_string(),
        contact_number: contact.to_string(),
        location: location.to_string(),
        membership_type: membership_type.to_string(),
    };
    let id = console.membership().create(request).await?;
    println!("ID: {}", id);
    Ok(())
}

pub async fn cmd_membership_list(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let requests = console.membership().list().await?;
    if requests.is_empty() {
        println!("No membership requests found.");
        return Ok(());
    }
    println!("Membership requests:");
    for request in requests {
        let record = request.record;
        println!(
            "  {}  [{}] {} ({}) from {}, {}  {}",
            request.id,
            record.status,
            record.full_name,
            record.membership_type,
            record.location,
            record.contact_number,
            format_date(&record.created_at.to_rfc3339())
        );
    }
    Ok(())
}

pub async fn cmd_membership_status(
    console: &Console,
    id: &str,
    status: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let status: MembershipStatus = status.parse()?;
    console
        .membership()
        .set_status(&DocumentId::from(id), status)
        .await?;
    Ok(())
}

pub async fn cmd_membership_delete(
    console: &Console,
    id: &str,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let mut confirmation = DeleteConfirmation::new();
    confirmation.select(DocumentId::from(id));
    if !yes && !confirm(&format!("Delete membership request {}?", id))? {
        confirmation.cancel();
    }
    if console
        .membership()
        .confirm_delete(&mut confirmation)
        .await?
        .is_none()
    {
        println!("Cancelled.");
    }
    Ok(())
}
