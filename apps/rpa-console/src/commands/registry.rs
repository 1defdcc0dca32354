use rpa_console::format::format_date;
use rpa_console::Console;
use rpa_identity::PhoneNumber;

pub async fn cmd_registry_add(
    console: &Console,
    phone: &str,
    name: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let phone = PhoneNumber::from_input(phone, console.country_code())?;
    let id = console.registry().register(&phone, name).await?;
    println!("✓ {} registered (ID: {})", phone, id);
    Ok(())
}

pub async fn cmd_registry_list(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    let users = console.registry().list().await?;
    if users.is_empty() {
        println!("No registered users.");
        return Ok(());
    }
    println!("Registered users:");
    for user in users {
        let added = user
            .record
            .created_at
            .map(|t| format_date(&t.to_rfc3339()))
            .unwrap_or_default();
        println!(
            "  {}  {}  {}",
            user.record.phone_number,
            user.record.full_name.as_deref().unwrap_or("-"),
            added
        );
    }
    Ok(())
}
