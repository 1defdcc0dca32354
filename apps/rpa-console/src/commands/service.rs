use rpa_console::format::format_date;
use rpa_console::records::{DeleteConfirmation, NewServiceRequest};
use rpa_console::Console;
use rpa_storage::{DocumentId, ServiceStatus};

use super::{confirm, require_session};

pub async fn cmd_service_add(
    console: &Console,
    name: &str,
    type_of_service: &str,
    contact: &str,
    details: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let request = NewServiceRequest {
        full_name: name.to_string(),
        type_of_service: type_of_service.to_string(),
        more_details: details.map(str::to_string),
        contact_number: contact.to_string(),
    };
    let id = console.service_requests().create(request).await?;
    println!("ID: {}", id);
    Ok(())
}

pub async fn cmd_service_list(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let requests = console.service_requests().list().await?;
    if requests.is_empty() {
        println!("No service requests found.");
        return Ok(());
    }
    println!("Service requests:");
    for request in requests {
        let record = request.record;
        println!(
            "  {}  [{}] {} for {} ({})  {}",
            request.id,
            record.status,
            record.type_of_service,
            record.full_name,
            record.contact_number,
            format_date(&record.created_at.to_rfc3339())
        );
        if let Some(details) = record.more_details {
            println!("      {}", details);
        }
    }
    Ok(())
}

pub async fn cmd_service_status(
    console: &Console,
    id: &str,
    status: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let status: ServiceStatus = status.parse()?;
    console
        .service_requests()
        .set_status(&DocumentId::from(id), status)
        .await?;
    Ok(())
}

pub async fn cmd_service_delete(
    console: &Console,
    id: &str,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let mut confirmation = DeleteConfirmation::new();
    confirmation.select(DocumentId::from(id));
    if !yes && !confirm(&format!("Delete service request {}?", id))? {
        confirmation.cancel();
    }
    if console
        .service_requests()
        .confirm_delete(&mut confirmation)
        .await?
        .is_none()
    {
        println!("Cancelled.");
    }
    Ok(())
}
