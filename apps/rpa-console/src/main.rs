mod cli;
mod commands;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{
    ActivityCommand, ArticleCommand, Cli, Command, EventCommand, MembershipCommand,
    ProfileCommand, RegistryCommand, ServiceCommand, TeamCommand,
};
use commands::*;
use rpa_config::ConsoleConfig;
use rpa_console::notify::TerminalNotifier;
use rpa_console::Console;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ConsoleConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    let console = Console::open(&config, Arc::new(TerminalNotifier))?;

    match cli.command {
        Command::Login { phone } => {
            cmd_login(&console, phone.as_deref()).await?;
        }
        Command::Logout => {
            cmd_logout(&console).await?;
        }
        Command::Whoami => {
            cmd_whoami(&console).await?;
        }
        Command::Registry { registry_cmd } => match registry_cmd {
            RegistryCommand::Add { phone, name } => {
                cmd_registry_add(&console, &phone, name.as_deref()).await?;
            }
            RegistryCommand::List => {
                cmd_registry_list(&console).await?;
            }
        },
        Command::Profile { profile_cmd } => match profile_cmd {
            ProfileCommand::Show => {
                cmd_profile_show(&console).await?;
            }
            ProfileCommand::Set { full_name } => {
                cmd_profile_set(&console, &full_name).await?;
            }
        },
        Command::Team { team_cmd } => match team_cmd {
            TeamCommand::Add {
                name,
                role,
                phone,
                picture,
            } => {
                cmd_team_add(&console, &name, &role, &phone, picture.as_deref()).await?;
            }
            TeamCommand::List => {
                cmd_team_list(&console).await?;
            }
            TeamCommand::Delete { id } => {
                cmd_team_delete(&console, &id).await?;
            }
        },
        Command::Activity { activity_cmd } => match activity_cmd {
            ActivityCommand::Create {
                name,
                location,
                date,
                summary,
                images,
            } => {
                cmd_activity_create(&console, &name, &location, &date, &summary, &images).await?;
            }
            ActivityCommand::List => {
                cmd_activity_list(&console).await?;
            }
            ActivityCommand::Show { id } => {
                cmd_activity_show(&console, &id).await?;
            }
            ActivityCommand::Delete { id } => {
                cmd_activity_delete(&console, &id).await?;
            }
            ActivityCommand::Images(args) => {
                cmd_activity_images(&console, &args.id, &args.add, &args.remove).await?;
            }
        },
        Command::Article { article_cmd } => match article_cmd {
            ArticleCommand::Create {
                title,
                content,
                summary,
                posted_by,
                cover,
            } => {
                cmd_article_create(
                    &console,
                    &title,
                    &content,
                    &summary,
                    &posted_by,
                    cover.as_deref(),
                )
                .await?;
            }
            ArticleCommand::List => {
                cmd_article_list(&console).await?;
            }
            ArticleCommand::Delete { id } => {
                cmd_article_delete(&console, &id).await?;
            }
            ArticleCommand::Images(args) => {
                cmd_article_images(&console, &args.id, &args.add, &args.remove).await?;
            }
        },
        Command::Event { event_cmd } => match event_cmd {
            EventCommand::Add(event) => {
                cmd_event_add(&console, &event).await?;
            }
            EventCommand::List => {
                cmd_event_list(&console).await?;
            }
            EventCommand::Update { id, event } => {
                cmd_event_update(&console, &id, &event).await?;
            }
            EventCommand::Delete { id } => {
                cmd_event_delete(&console, &id).await?;
            }
        },
        Command::Service { service_cmd } => match service_cmd {
            ServiceCommand::Add {
                name,
                type_of_service,
                contact,
                details,
            } => {
                cmd_service_add(
                    &console,
                    &name,
                    &type_of_service,
                    &contact,
                    details.as_deref(),
                )
                .await?;
            }
            ServiceCommand::List => {
                cmd_service_list(&console).await?;
            }
            ServiceCommand::Status { id, status } => {
                cmd_service_status(&console, &id, &status).await?;
            }
            ServiceCommand::Delete { id, yes } => {
                cmd_service_delete(&console, &id, yes).await?;
            }
        },
        Command::Membership { membership_cmd } => match membership_cmd {
            MembershipCommand::Add {
                name,
                contact,
                location,
                membership_type,
            } => {
                cmd_membership_add(&console, &name, &contact, &location, &membership_type)
                    .await?;
            }
            MembershipCommand::List => {
                cmd_membership_list(&console).await?;
            }
            MembershipCommand::Status { id, status } => {
                cmd_membership_status(&console, &id, &status).await?;
            }
            MembershipCommand::Delete { id, yes } => {
                cmd_membership_delete(&console, &id, yes).await?;
            }
        },
    }

    Ok(())
}
