use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use docbind_config::Config;
use docbind_mapping_engine::{
    load_objects, load_templates, HeadlessUI, SavePolicy, SettingsController,
};
use docbind_remote::RemoteService;

#[derive(Parser)]
#[command(name = "docbind", version, about = "Document template input mapping")]
struct Cli {
    /// Override the service base URL from .docbind.toml
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List templates available for mapping
    Templates,
    /// List business objects
    Objects,
    /// Manage input mappings for a template
    Mappings {
        #[command(subcommand)]
        command: MappingCommands,
    },
}

#[derive(Subcommand)]
enum MappingCommands {
    /// Show the hydrated mapping state for a template
    Show {
        /// Template id
        #[arg(long)]
        template: String,
    },
    /// Map one input to an object field and save
    Set {
        /// Template id
        #[arg(long)]
        template: String,
        /// Input id
        #[arg(long)]
        input: String,
        /// Object API name
        #[arg(long)]
        object: String,
        /// Field API name
        #[arg(long)]
        field: String,
        /// Write unselected inputs with empty values instead of skipping them
        #[arg(long)]
        attempt_empty: bool,
    },
}

fn service(base_url: Option<String>) -> anyhow::Result<RemoteService> {
    match base_url {
        Some(base_url) => Ok(RemoteService::new(base_url)),
        None => {
            let base_path = std::env::current_dir()?;
            let config = Config::load_from_dir(&base_path)?;
            let service = RemoteService::with_timeout(
                config.service.base_url,
                Duration::from_secs(config.service.timeout_secs),
            )?;
            Ok(service)
        }
    }
}

async fn build_controller(
    service: Arc<RemoteService>,
    policy: SavePolicy,
) -> SettingsController<RemoteService, RemoteService, HeadlessUI> {
    let mut ui = HeadlessUI;
    let templates = load_templates(service.as_ref(), &mut ui).await;
    let objects = load_objects(service.as_ref(), &mut ui).await;

    SettingsController::new(service.clone(), service, templates, objects, ui).with_policy(policy)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let service = Arc::new(service(cli.base_url)?);

    match cli.command {
        Commands::Templates => {
            let mut ui = HeadlessUI;
            for template in load_templates(service.as_ref(), &mut ui).await {
                println!(
                    "{}  {} ({} input(s))",
                    template.id,
                    template.label,
                    template.inputs.len()
                );
            }
        }

        Commands::Objects => {
            let mut ui = HeadlessUI;
            for object in load_objects(service.as_ref(), &mut ui).await {
                println!("{}  {}", object.api_name, object.label);
            }
        }

        Commands::Mappings { command } => match command {
            MappingCommands::Show { template } => {
                let mut controller = build_controller(service, SavePolicy::default()).await;
                controller.select_template(&template).await?;

                for working in &controller.working().inputs {
                    let selection = match (&working.selected_object, &working.selected_field) {
                        (Some(object), Some(field)) => format!("{}.{}", object, field),
                        (Some(object), None) => format!("{}.<unset>", object),
                        _ => "<unmapped>".to_string(),
                    };
                    println!(
                        "{}  {}  {}  ({} candidate field(s))",
                        working.input_id(),
                        working.input.kind.as_wire(),
                        selection,
                        working.candidate_fields.len()
                    );
                }
            }

            MappingCommands::Set {
                template,
                input,
                object,
                field,
                attempt_empty,
            } => {
                let policy = if attempt_empty {
                    SavePolicy::AttemptEmpty
                } else {
                    SavePolicy::SkipUnselected
                };

                let mut controller = build_controller(service, policy).await;
                controller.select_template(&template).await?;
                controller.select_object(&input, &object).await?;
                controller.set_field(&input, &field)?;

                let report = controller.save().await;
                if !report.ok {
                    return Ok(ExitCode::FAILURE);
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
