use rpa_console::format::format_date_time_12hr;
use rpa_console::records::EventInput;
use rpa_console::Console;
use rpa_storage::DocumentId;

use super::require_session;
use crate::cli::EventArgs;

fn input(args: &EventArgs) -> EventInput {
    EventInput {
        title: args.title.clone(),
        summary: args.summary.clone(),
        place: args.place.clone(),
        date_time: args.at.clone(),
    }
}

pub async fn cmd_event_add(console: &Console, args: &EventArgs) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let id = console.events().add(input(args)).await?;
    println!("ID: {}", id);
    Ok(())
}

pub async fn cmd_event_list(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    let events = console.events().list().await?;
    if events.is_empty() {
        println!("No events found.");
        return Ok(());
    }
    println!("Events:");
    for event in events {
        // Stored as local wall-clock time; render it without an offset shift.
        let when = format!("{}Z", event.record.date_time.format("%Y-%m-%dT%H:%M:%S"));
        println!(
            "  {}  {}  {} @ {}",
            event.id,
            format_date_time_12hr(&when),
            event.record.title,
            event.record.place
        );
    }
    Ok(())
}

pub async fn cmd_event_update(
    console: &Console,
    id: &str,
    args: &EventArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    console.events().update(&DocumentId::from(id), input(args)).await?;
    Ok(())
}

pub async fn cmd_event_delete(console: &Console, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    require_session(console)?;
    console.events().delete(&DocumentId::from(id)).await?;
    Ok(())
}
