mod config;

use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use platform_authz::{Operation, Principal};
use platform_db::{DbPool, connect};
use platform_obs::init_tracing;
use products_contacts::{
    ContactError, ContactInput, ContactService, ContactStatus, UpdateContact, seed_demo_contacts,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "contact-manager",
    version,
    about = "Contact records gated by resource-based authorization"
)]
struct Cli {
    #[command(flatten)]
    caller: CallerArgs,
    #[command(subcommand)]
    command: Command,
}

/// Identity established upstream; the CLI only forwards it.
#[derive(Args, Debug)]
struct CallerArgs {
    /// Caller id. Omit to act anonymously.
    #[arg(long, global = true)]
    user: Option<String>,
    /// Role held by the caller (repeatable).
    #[arg(long = "role", global = true)]
    roles: Vec<String>,
}

impl CallerArgs {
    fn principal(&self) -> Option<Principal> {
        self.user
            .as_ref()
            .map(|id| Principal::new(id.clone()).with_roles(self.roles.iter().cloned()))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run database migrations.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    #[command(flatten)]
    Workflow(WorkflowCommand),
}

/// Commands that need a migrated schema.
#[derive(Subcommand, Debug)]
enum WorkflowCommand {
    /// Insert the demo contacts when the table is empty.
    Seed {
        #[arg(long)]
        owner: String,
    },
    /// List the contacts visible to the caller.
    List,
    /// Show one contact.
    Show { id: Uuid },
    /// Create a contact owned by the caller.
    Create(ContactArgs),
    /// Edit a contact's fields.
    Update {
        id: Uuid,
        /// Version the edit was based on.
        #[arg(long)]
        version: i32,
        /// Reassign the contact to another owner.
        #[arg(long)]
        owner: Option<String>,
        #[command(flatten)]
        fields: ContactArgs,
    },
    /// Delete a contact.
    Delete { id: Uuid },
    /// Approve or reject a contact.
    Status { id: Uuid, status: ContactStatus },
    /// Ask the engine for a raw decision.
    Authorize {
        operation: Operation,
        #[arg(long)]
        contact: Option<Uuid>,
    },
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Rollback the most recent migration.
    Down,
}

#[derive(Args, Debug)]
struct ContactArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    zip: String,
    #[arg(long)]
    email: String,
}

impl From<ContactArgs> for ContactInput {
    fn from(value: ContactArgs) -> Self {
        ContactInput {
            first_name: value.first_name,
            last_name: value.last_name,
            address: value.address,
            city: value.city,
            state: value.state,
            zip: value.zip,
            email: value.email,
        }
    }
}

#[derive(Serialize)]
struct DecisionOutput {
    operation: Operation,
    contact: Option<Uuid>,
    succeeded: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(config.obs.clone())?;
    let db = Arc::new(connect(&config.database).await?);

    let command = match cli.command {
        Command::Migrate(MigrateCommand::Up) => return migrate_up(&db).await,
        Command::Migrate(MigrateCommand::Down) => return migrate_down(&db).await,
        Command::Workflow(command) => command,
    };
    ensure_migrations(&db).await?;

    let service = ContactService::new(db.clone(), &config.authz);
    let principal = cli.caller.principal();
    run(&service, &db, principal.as_ref(), command).await
}

async fn run(
    service: &ContactService,
    db: &DbPool,
    principal: Option<&Principal>,
    command: WorkflowCommand,
) -> Result<()> {
    match command {
        WorkflowCommand::Seed { owner } => {
            let inserted = seed_demo_contacts(db, &owner).await?;
            print_json(&serde_json::json!({ "inserted": inserted }))
        }
        WorkflowCommand::List => print_json(&service.index(principal).await.map_err(report)?),
        WorkflowCommand::Show { id } => print_json(&service.details(principal, id).await.map_err(report)?),
        WorkflowCommand::Create(fields) => {
            let created = service
                .create(principal, fields.into())
                .await
                .map_err(report)?;
            print_json(&created)
        }
        WorkflowCommand::Update {
            id,
            version,
            owner,
            fields,
        } => {
            let update = UpdateContact {
                input: fields.into(),
                owner_id: owner,
                expected_version: version,
            };
            let updated = service
                .update(principal, id, update)
                .await
                .map_err(report)?;
            print_json(&updated)
        }
        WorkflowCommand::Delete { id } => {
            service.delete(principal, id).await.map_err(report)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        WorkflowCommand::Status { id, status } => {
            let changed = service
                .change_status(principal, id, status)
                .await
                .map_err(report)?;
            print_json(&changed)
        }
        WorkflowCommand::Authorize { operation, contact } => {
            let decision = service
                .evaluate(principal, contact, operation)
                .await
                .map_err(report)?;
            print_json(&DecisionOutput {
                operation,
                contact,
                succeeded: decision.succeeded(),
            })
        }
    }
}

fn report(err: ContactError) -> anyhow::Error {
    anyhow!("{}: {}", err.code(), err)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn ensure_migrations(db: &DbPool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(db).await?;
    if !pending.is_empty() {
        anyhow::bail!("pending migrations detected; run `contact-manager migrate up` first");
    }
    Ok(())
}

async fn migrate_up(db: &DbPool) -> Result<()> {
    Migrator::up(db, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(db: &DbPool) -> Result<()> {
    Migrator::down(db, Some(1)).await?;
    info!("most recent migration rolled back");
    Ok(())
}
