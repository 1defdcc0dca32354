use rpa_console::error::LoginError;
use rpa_console::format::format_date_time_12hr;
use rpa_console::login::Destination;
use rpa_console::Console;

use super::prompt;

pub async fn cmd_login(
    console: &Console,
    phone: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(session) = console.session() {
        println!(
            "Already signed in as {} ({})",
            session.display_name(),
            session.phone_number
        );
        return Ok(());
    }

    let mut login = console.login();
    let phone = match phone {
        Some(phone) => phone.to_string(),
        None => prompt(&format!("Phone number (+{} assumed): ", console.country_code()))?,
    };
    login.request_challenge(&phone).await?;

    loop {
        let input = prompt("Enter verification code (or 'r' to resend, 'q' to quit): ")?;
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            return Ok(());
        }
        if input.eq_ignore_ascii_case("r") || input.eq_ignore_ascii_case("resend") {
            login.request_challenge(&phone).await?;
            continue;
        }

        match login.verify_challenge(&input).await {
            Ok(Destination::Dashboard) => {
                println!("✓ Signed in");
                return Ok(());
            }
            Ok(Destination::ProfileCompletion) => {
                println!("✓ Signed in. Set your name with 'rpa-console profile set <name>'.");
                return Ok(());
            }
            Err(LoginError::InvalidCode) => {
                eprintln!("{}", LoginError::InvalidCode);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

pub async fn cmd_logout(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    if console.session().is_none() {
        println!("Not signed in.");
        return Ok(());
    }
    console.sign_out().await?;
    println!("✓ Signed out");
    Ok(())
}

pub async fn cmd_whoami(console: &Console) -> Result<(), Box<dyn std::error::Error>> {
    match console.session() {
        Some(session) => {
            println!("Name:  {}", session.display_name());
            println!("Phone: {}", session.phone_number);
            if let Some(verified_at) = session.verified_at {
                println!(
                    "Since: {}",
                    format_date_time_12hr(&verified_at.to_rfc3339())
                );
            }
        }
        None => println!("Not signed in."),
    }
    Ok(())
}
