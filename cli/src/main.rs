mod client;
mod render;
mod watch;


use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use fleet::auth::{LoginForm, RegistrationWizard, validate_tenant_name};
use fleet::endpoints::DEFAULT_API_BASE;
use fleet::error::FleetError;
use fleet::folders::FolderOrganizer;
use fleet::freshness::FreshnessTracker;
use fleet::poll::{REPAINT_INTERVAL_MS, TENANT_POLL_INTERVAL_MS};
use fleet::report::AgentConfig;
use fleet::scope::Scope;
use tracing_subscriber::EnvFilter;

use crate::client::FleetClient;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing scope; pass --tenant-id and --region or set FLEET_TENANT_ID and FLEET_REGION")]
    MissingScope,
    #[error("session rejected by the backend; log in again")]
    SessionRejected,
    #[error(transparent)]
    Fleet(FleetError),
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<FleetError> for CliError {
    fn from(error: FleetError) -> Self {
        if error.requires_login() {
            Self::SessionRejected
        } else {
            Self::Fleet(error)
        }
    }
}

impl From<fleet::ValidationError> for CliError {
    fn from(error: fleet::ValidationError) -> Self {
        Self::Fleet(error.into())
    }
}

#[derive(Parser, Debug)]
#[command(name = "fleet", about = "Printer fleet console for the terminal")]
struct Cli {
    #[arg(long, env = "FLEET_API_BASE", default_value = DEFAULT_API_BASE, global = true)]
    api_base: String,

    /// Company id of the signed-in account.
    #[arg(long, env = "FLEET_TENANT_ID", global = true)]
    tenant_id: Option<String>,

    #[arg(long, env = "FLEET_REGION", global = true)]
    region: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    client: FleetClient,
    scope: Option<Scope>,
}

impl CliContext {
    fn scope(&self) -> Result<&Scope, CliError> {
        self.scope.as_ref().ok_or(CliError::MissingScope)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check credentials and print the scope to export.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLEET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account.
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FLEET_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Tenants(TenantsCommand),
    Printers(PrintersCommand),
    Folders(FoldersCommand),
}

#[derive(Args, Debug)]
struct TenantsCommand {
    #[command(subcommand)]
    command: TenantsSubcommand,
}

#[derive(Subcommand, Debug)]
enum TenantsSubcommand {
    List,
    Show {
        tenant: String,
    },
    Create {
        name: String,
        /// Write the agent `.env` and JSON config into this directory.
        #[arg(long)]
        agent_config_dir: Option<PathBuf>,
    },
    Rename {
        tenant: String,
        name: String,
    },
    Delete {
        tenant: String,
    },
}

#[derive(Args, Debug)]
struct PrintersCommand {
    #[command(subcommand)]
    command: PrintersSubcommand,
}

#[derive(Subcommand, Debug)]
enum PrintersSubcommand {
    List {
        tenant: String,
    },
    /// Poll a tenant and print status changes until interrupted.
    Watch {
        tenant: String,
        #[arg(long, default_value_t = u64::from(TENANT_POLL_INTERVAL_MS / 1000))]
        poll_secs: u64,
        #[arg(long, default_value_t = u64::from(REPAINT_INTERVAL_MS / 1000))]
        repaint_secs: u64,
        /// Stop after this many polls.
        #[arg(long)]
        polls: Option<u64>,
    },
    Rename {
        printer: String,
        name: String,
    },
    Delete {
        printer: String,
    },
    /// Close the current counter period.
    Cut {
        printer: String,
    },
    /// Download the usage report.
    Pdf {
        printer: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct FoldersCommand {
    #[command(subcommand)]
    command: FoldersSubcommand,
}

#[derive(Subcommand, Debug)]
enum FoldersSubcommand {
    Tree,
    Create {
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    Rename {
        folder: String,
        name: String,
    },
    Delete {
        folder: String,
    },
    /// Move a folder; omit `--parent` to move it to the top level.
    Move {
        folder: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// File a tenant in a folder; omit `--folder` to unfile it.
    Assign {
        tenant: String,
        #[arg(long)]
        folder: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = CliContext {
        client: FleetClient::new(&cli.api_base)?,
        scope: Scope::from_parts(cli.tenant_id.as_deref(), cli.region.as_deref()),
    };
    match cli.command {
        Command::Login { email, password } => run_login(&ctx, cli.tenant_id, cli.region, email, password).await,
        Command::Register { email, password } => run_register(&ctx, email, password).await,
        Command::Tenants(tenants) => run_tenants(&ctx, tenants.command).await,
        Command::Printers(printers) => run_printers(&ctx, printers.command).await,
        Command::Folders(folders) => run_folders(&ctx, folders.command).await,
    }
}

async fn run_login(
    ctx: &CliContext,
    tenant_id: Option<String>,
    region: Option<String>,
    email: String,
    password: String,
) -> Result<(), CliError> {
    let form = LoginForm {
        email,
        password,
        region: region.unwrap_or_default(),
        tenant_id: tenant_id.unwrap_or_default(),
    };
    form.validate()?;
    let reply = ctx.client.login(&form).await?;
    let scope = form.scope(&reply.tenant_id).ok_or(CliError::MissingScope)?;
    tracing::info!(tenant = %scope.tenant_id, "login accepted");
    println!("export FLEET_TENANT_ID={}", scope.tenant_id);
    println!("export FLEET_REGION={}", scope.region);
    Ok(())
}

async fn run_register(ctx: &CliContext, email: String, password: String) -> Result<(), CliError> {
    let scope = ctx.scope()?;
    let mut wizard = RegistrationWizard::default();
    wizard.email = email;
    wizard.confirm_password = password.clone();
    wizard.password = password;
    wizard.region = scope.region.clone();
    wizard.tenant_id = scope.tenant_id.clone();
    wizard.next()?;
    wizard.next()?;
    let payload = wizard.payload()?;
    ctx.client.register(&payload).await?;
    wizard.complete();
    println!("account created for {}", payload.email);
    Ok(())
}

async fn run_tenants(ctx: &CliContext, command: TenantsSubcommand) -> Result<(), CliError> {
    match command {
        TenantsSubcommand::List => {
            let tenants = ctx.client.tenants(ctx.scope()?).await?;
            print!("{}", render::tenant_lines(&tenants));
        }
        TenantsSubcommand::Show { tenant } => {
            let tenant = ctx.client.tenant(&tenant).await?;
            println!("{}", serde_json::to_string_pretty(&tenant)?);
        }
        TenantsSubcommand::Create { name, agent_config_dir } => {
            let name = validate_tenant_name(&name)?;
            let created = ctx.client.create_tenant(&name, ctx.scope()?).await?;
            tracing::info!(tenant = %created.tenant_id, "tenant created");
            println!("tenant id: {}", created.tenant_id);
            println!("api key:   {}", created.api_key);
            if let Some(dir) = agent_config_dir {
                let config = AgentConfig::for_created(ctx.client.api().base(), &name, &created);
                write_agent_config(&dir, &config).await?;
            }
        }
        TenantsSubcommand::Rename { tenant, name } => {
            let name = validate_tenant_name(&name)?;
            ctx.client.rename_tenant(&tenant, &name).await?;
            println!("renamed {tenant} to {name}");
        }
        TenantsSubcommand::Delete { tenant } => {
            ctx.client.delete_tenant(&tenant).await?;
            println!("deleted {tenant}");
        }
    }
    Ok(())
}

async fn write_agent_config(dir: &std::path::Path, config: &AgentConfig) -> Result<(), CliError> {
    tokio::fs::create_dir_all(dir).await?;
    let env_path = dir.join(config.env_file_name());
    tokio::fs::write(&env_path, config.render_env()).await?;
    let json_path = dir.join(config.json_file_name());
    tokio::fs::write(&json_path, config.render_json()?).await?;
    println!("wrote {} and {}", env_path.display(), json_path.display());
    Ok(())
}

async fn run_printers(ctx: &CliContext, command: PrintersSubcommand) -> Result<(), CliError> {
    match command {
        PrintersSubcommand::List { tenant } => {
            let region = &ctx.scope()?.region;
            let batch = ctx.client.printers(&tenant, region).await?;
            watch::log_rejected(&tenant, &batch.rejected);
            let mut tracker = FreshnessTracker::default();
            let out = tracker.reconcile(&batch.records, watch::now_ms());
            watch::log_rejected(&tenant, &out.rejected);
            print!("{}", render::printer_table(&out.printers));
            println!("{}", render::online_summary(&out.printers));
        }
        PrintersSubcommand::Watch {
            tenant,
            poll_secs,
            repaint_secs,
            polls,
        } => {
            let region = ctx.scope()?.region.clone();
            let cadence = watch::Cadence {
                poll: Duration::from_secs(poll_secs.max(1)),
                repaint: Duration::from_secs(repaint_secs.max(1)),
                max_polls: polls,
            };
            let interrupted = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "ctrl-c handler unavailable");
                    std::future::pending::<()>().await;
                }
            };
            watch::run(&ctx.client, &tenant, &region, cadence, interrupted).await?;
        }
        PrintersSubcommand::Rename { printer, name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err(fleet::ValidationError::EmptyName.into());
            }
            ctx.client.rename_printer(&printer, name).await?;
            println!("renamed {printer} to {name}");
        }
        PrintersSubcommand::Delete { printer } => {
            ctx.client.delete_printer(&printer).await?;
            println!("removed {printer}");
        }
        PrintersSubcommand::Cut { printer } => {
            let reply = ctx.client.register_cut(&printer).await?;
            println!("cut registered: {} pages in the closed period", reply.total_pages);
        }
        PrintersSubcommand::Pdf { printer, out } => {
            let bytes = ctx.client.printer_pdf(&printer).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(fleet::report::pdf_file_name(&printer, watch::now_ms())));
            tokio::fs::write(&path, &bytes).await?;
            println!("saved {} ({} bytes)", path.display(), bytes.len());
        }
    }
    Ok(())
}

async fn run_folders(ctx: &CliContext, command: FoldersSubcommand) -> Result<(), CliError> {
    let mut organizer = FolderOrganizer::new(ctx.client.clone());
    organizer.load(ctx.client.folders().await?, ctx.client.assignments().await?);

    match command {
        FoldersSubcommand::Tree => {
            let tenants = ctx.client.tenants(ctx.scope()?).await?;
            print!("{}", render::folder_tree(organizer.tree(), &tenants));
        }
        FoldersSubcommand::Create { name, parent } => {
            let folder = organizer.create_folder(&name, parent.as_deref()).await?;
            println!("created {} ({})", folder.name, folder.id);
        }
        FoldersSubcommand::Rename { folder, name } => {
            organizer.rename_folder(&folder, &name).await?;
            println!("renamed {folder}");
        }
        FoldersSubcommand::Delete { folder } => {
            organizer.delete_folder(&folder).await?;
            println!("deleted {folder}");
        }
        FoldersSubcommand::Move { folder, parent } => {
            organizer.move_folder(&folder, parent.as_deref()).await?;
            println!("moved {folder}");
        }
        FoldersSubcommand::Assign { tenant, folder } => {
            organizer.assign_tenant_to_folder(&tenant, folder.as_deref()).await?;
            match folder {
                Some(folder) => println!("filed {tenant} in {folder}"),
                None => println!("unfiled {tenant}"),
            }
        }
    }
    Ok(())
}
