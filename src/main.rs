use clap::Parser;
use contractor_site::config::cli::{Command, PageName, ProjectsAction};
use contractor_site::domain::model::ContactSubmission;
use contractor_site::utils::logger;
use contractor_site::utils::validation::Validate;
use contractor_site::{CliArgs, CmsError, ReorderOutcome, SiteConfig, SiteContext};
use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> contractor_site::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn manage_projects(
    context: &SiteContext,
    action: ProjectsAction,
) -> contractor_site::Result<()> {
    let projects = context.project_list();
    projects.load().await?;

    let outcome = match action {
        ProjectsAction::List => ReorderOutcome::Unchanged,
        ProjectsAction::Reorder { from, to } => projects.reorder(from, to).await?,
        ProjectsAction::Move { id, to } => projects.move_id(&id, to).await?,
    };

    print_json(&projects.items().await)?;

    match outcome {
        ReorderOutcome::Reverted { failed_id, .. } => Err(CmsError::BackendError {
            operation: "reorder".to_string(),
            status: 0,
            message: format!("position write for {} failed, order reloaded", failed_id),
        }),
        _ => Ok(()),
    }
}

async fn run(context: &SiteContext, command: Command) -> contractor_site::Result<()> {
    match command {
        Command::Page { page, category } => {
            let content = context.content();
            match page {
                PageName::Home => print_json(&content.home_page().await),
                PageName::Services => print_json(&content.services_page().await),
                PageName::Projects => print_json(&content.projects_page(category.as_deref()).await),
                PageName::WhoWeAre => print_json(&content.who_we_are_page().await),
                PageName::Contact => print_json(&content.contact_page().await),
            }
        }
        Command::Projects { action } => {
            let result = context
                .with_admin_session(|| manage_projects(context, action))
                .await;

            for notification in context.notifier().take() {
                eprintln!("{}: {}", notification.title, notification.message);
            }
            result
        }
        Command::Inquiry {
            name,
            email,
            phone,
            message,
        } => {
            let submission = ContactSubmission {
                name,
                email,
                phone,
                message,
            };
            context.content().submit_inquiry(&submission).await?;
            println!("✅ Thank you! We will be in touch soon.");
            Ok(())
        }
        Command::ResetPassword { email } => {
            context.request_password_reset(&email).await?;
            println!("✅ Password reset email sent to {}", email);
            Ok(())
        }
    }
}

fn exit_with(e: &CmsError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.severity().exit_code())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match SiteConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(args.verbose);
            exit_with(&e)
        }
    };

    let verbose = args.verbose || config.logging.verbose;
    if config.logging.json {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("Starting contractor-site for {}", config.site.name);
    if verbose {
        tracing::debug!("Site config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let context = SiteContext::from_config(config).await?;

    if let Err(e) = run(&context, args.command).await {
        exit_with(&e);
    }

    Ok(())
}
