use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rpa-console")]
#[command(about = "RPA membership organisation admin console")]
pub struct Cli {
    /// Directory holding local storage and backend snapshots
    #[arg(long, env = "RPA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in with a one-time code sent to your phone
    Login {
        /// Phone number (national digits or +E.164); prompted when omitted
        #[arg(long)]
        phone: Option<String>,
    },
    /// Sign out and clear local storage
    Logout,
    /// Show the signed-in operator
    Whoami,
    /// Registry of phone numbers allowed to sign in
    Registry {
        #[command(subcommand)]
        registry_cmd: RegistryCommand,
    },
    /// Your profile
    Profile {
        #[command(subcommand)]
        profile_cmd: ProfileCommand,
    },
    /// Team members
    Team {
        #[command(subcommand)]
        team_cmd: TeamCommand,
    },
    /// Activities and their image galleries
    Activity {
        #[command(subcommand)]
        activity_cmd: ActivityCommand,
    },
    /// Articles and their image galleries
    Article {
        #[command(subcommand)]
        article_cmd: ArticleCommand,
    },
    /// Scheduled events
    Event {
        #[command(subcommand)]
        event_cmd: EventCommand,
    },
    /// Service requests
    Service {
        #[command(subcommand)]
        service_cmd: ServiceCommand,
    },
    /// Membership applications
    Membership {
        #[command(subcommand)]
        membership_cmd: MembershipCommand,
    },
}

#[derive(Subcommand)]
pub enum RegistryCommand {
    /// Allow a phone number to sign in
    Add {
        /// Phone number (national digits or +E.164)
        phone: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// List registered phone numbers
    List,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show your display name
    Show,
    /// Set your display name
    Set {
        /// Full name
        full_name: String,
    },
}

#[derive(Subcommand)]
pub enum TeamCommand {
    /// Add a team member
    Add {
        /// Full name
        #[arg(long)]
        name: String,
        /// Role within the organisation
        #[arg(long)]
        role: String,
        /// Phone number
        #[arg(long)]
        phone: String,
        /// Profile picture
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// List team members, newest first
    List,
    /// Delete a team member and their picture
    Delete {
        /// Team member ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ActivityCommand {
    /// Create an activity with one to six images
    Create {
        /// Activity name
        #[arg(long)]
        name: String,
        /// Location
        #[arg(long)]
        location: String,
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Summary
        #[arg(long)]
        summary: String,
        /// Image files
        #[arg(long = "image", required = true)]
        images: Vec<PathBuf>,
    },
    /// List activities, newest first
    List,
    /// Show one activity
    Show {
        /// Activity ID
        id: String,
    },
    /// Delete an activity and its images
    Delete {
        /// Activity ID
        id: String,
    },
    /// Add or remove gallery images
    Images(ImagesArgs),
}

#[derive(Subcommand)]
pub enum ArticleCommand {
    /// Publish an article
    Create {
        /// Title
        #[arg(long)]
        title: String,
        /// Body text
        #[arg(long)]
        content: String,
        /// Summary
        #[arg(long)]
        summary: String,
        /// Author name
        #[arg(long)]
        posted_by: String,
        /// Cover image
        #[arg(long)]
        cover: Option<PathBuf>,
    },
    /// List articles, newest first
    List,
    /// Delete an article and its gallery images
    Delete {
        /// Article ID
        id: String,
    },
    /// Add or remove gallery images
    Images(ImagesArgs),
}

#[derive(clap::Args)]
pub struct ImagesArgs {
    /// Record ID
    pub id: String,
    /// Image files to add
    #[arg(long = "add", num_args = 1..)]
    pub add: Vec<PathBuf>,
    /// Positions (from `show`, starting at 0) of images to remove
    #[arg(long = "remove", num_args = 1..)]
    pub remove: Vec<usize>,
}

#[derive(clap::Args)]
pub struct EventArgs {
    /// Title
    #[arg(long)]
    pub title: String,
    /// Summary
    #[arg(long)]
    pub summary: String,
    /// Place
    #[arg(long)]
    pub place: String,
    /// Date and time (YYYY-MM-DDTHH:MM)
    #[arg(long)]
    pub at: String,
}

#[derive(Subcommand)]
pub enum EventCommand {
    /// Add an event
    Add(EventArgs),
    /// List events, soonest first
    List,
    /// Replace an event's details
    Update {
        /// Event ID
        id: String,
        #[command(flatten)]
        event: EventArgs,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ServiceCommand {
    /// Record a service request
    Add {
        /// Requester's full name
        #[arg(long)]
        name: String,
        /// Type of service
        #[arg(long = "type")]
        type_of_service: String,
        /// Contact number
        #[arg(long)]
        contact: String,
        /// More details
        #[arg(long)]
        details: Option<String>,
    },
    /// List service requests
    List,
    /// Move a request to Submitted, Contacted or Resolved
    Status {
        /// Request ID
        id: String,
        /// New status
        status: String,
    },
    /// Delete a service request
    Delete {
        /// Request ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum MembershipCommand {
    /// Record a membership application
    Add {
        /// Applicant's full name
        #[arg(long)]
        name: String,
        /// Contact number
        #[arg(long)]
        contact: String,
        /// Location
        #[arg(long)]
        location: String,
        /// Membership type
        #[arg(long = "type")]
        membership_type: String,
    },
    /// List membership applications
    List,
    /// Move an application to Pending, Approved or Rejected
    Status {
        /// Application ID
        id: String,
        /// New status
        status: String,
    },
    /// Delete a membership application
    Delete {
        /// Application ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
