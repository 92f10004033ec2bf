use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "contractor-site")]
#[command(about = "Content tools for the contractor website and its admin panel")]
pub struct CliArgs {
    /// Path to the site TOML configuration
    #[arg(short, long, default_value = "site.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageName {
    Home,
    Services,
    Projects,
    WhoWeAre,
    Contact,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a public page as JSON, with fallback content filled in
    Page {
        #[arg(value_enum)]
        page: PageName,

        /// Only for the projects page
        #[arg(long)]
        category: Option<String>,
    },

    /// Admin: manage the project list (signs in with CMS_ADMIN_EMAIL / CMS_ADMIN_PASSWORD)
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },

    /// Submit a contact-form inquiry
    Inquiry {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
    },

    /// Send a password-reset email to an admin account
    ResetPassword { email: String },
}

#[derive(Debug, Subcommand)]
pub enum ProjectsAction {
    /// Show projects in display order
    List,

    /// Move the project at one position to another (zero-based)
    Reorder {
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
    },

    /// Move a project by id to a position (zero-based)
    Move {
        id: String,
        #[arg(long)]
        to: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reorder_command() {
        let args = CliArgs::try_parse_from([
            "contractor-site",
            "--config",
            "prod.toml",
            "projects",
            "reorder",
            "--from",
            "2",
            "--to",
            "0",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("prod.toml"));
        match args.command {
            Command::Projects {
                action: ProjectsAction::Reorder { from, to },
            } => assert_eq!((from, to), (2, 0)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_page_names_are_kebab_case() {
        let args = CliArgs::try_parse_from(["contractor-site", "page", "who-we-are"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Page {
                page: PageName::WhoWeAre,
                ..
            }
        ));
    }
}
