mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use sarms_core::{
    Classification, CustomerImpact, ImpactAnalysis, PriorityTier, RequestStatus, RequestStore,
    Role, SoftwareRequest, allowed_transitions,
};
use sarms_store::MemoryStore;
use sarms_sync::BackendClient;

#[derive(Parser)]
#[command(name = "sarms", version, about = "Software request priority and workflow tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the priority tier of an impact analysis.
    Classify(ImpactArgs),

    /// List the statuses a role may move a request to.
    Transitions {
        #[arg(long)]
        status: RequestStatus,
        #[arg(long)]
        role: Role,
    },

    /// Record a newly submitted request in status `new`.
    Submit {
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long)]
        id: String,
        #[arg(long)]
        tracking_number: String,
        /// Name of the requested solution.
        #[arg(long)]
        name: String,
        /// Priority as perceived by the submitter.
        #[arg(long)]
        priority: PriorityTier,
        #[arg(long)]
        submitted_by: String,
        #[command(flatten)]
        impact: ImpactArgs,
    },

    /// Show a stored request.
    Show {
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long)]
        id: String,
        /// Also list what this role may do next.
        #[arg(long)]
        role: Option<Role>,
    },

    /// Validate and apply a status change to a stored request.
    Transition {
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long)]
        id: String,
        #[arg(long)]
        to: RequestStatus,
        #[arg(long)]
        role: Role,
        /// Identity recorded on the status history, e.g. an email.
        #[arg(long)]
        actor: String,
        /// Rejection or hold reason.
        #[arg(long)]
        remark: Option<String>,
        /// Project manager to assign.
        #[arg(long)]
        assign: Option<String>,
    },

    /// Send a stored request's status and assignment to the backend.
    Push {
        #[command(flatten)]
        store: StoreArgs,
        #[arg(long)]
        id: String,
        #[arg(long, env = "SARMS_API_BASE_URL", default_value = "https://localhost:5001/api")]
        api_base_url: String,
    },
}

#[derive(Args)]
struct StoreArgs {
    /// JSON snapshot holding the requests. Created on first write.
    #[arg(long = "store", env = "SARMS_STORE", default_value = "requests.json")]
    path: PathBuf,
}

#[derive(Args)]
struct ImpactArgs {
    /// Read the impact analysis from a JSON file instead of flags.
    #[arg(long, conflicts_with_all = ["regulatory", "amount", "customer_impact", "urgent"])]
    json: Option<PathBuf>,
    #[arg(long)]
    regulatory: bool,
    #[arg(long)]
    regulatory_explanation: Option<String>,
    /// Financial impact in USD.
    #[arg(long, default_value_t = 0.0)]
    amount: f64,
    #[arg(long, default_value = "internal")]
    customer_impact: CustomerImpact,
    #[arg(long)]
    urgent: bool,
}

impl ImpactArgs {
    fn into_impact(self) -> anyhow::Result<ImpactAnalysis> {
        let impact: ImpactAnalysis = match self.json {
            Some(path) => {
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_slice(&bytes)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => ImpactAnalysis {
                is_regulatory_requirement: self.regulatory,
                regulatory_explanation: self.regulatory_explanation,
                financial_impact_usd: self.amount,
                customer_impact: self.customer_impact,
                operational_urgency: self.urgent,
                existing_systems: String::new(),
            },
        };
        impact.check()?;
        Ok(impact)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    tracing::debug!("sarms v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Classify(args) => {
            let impact = args.into_impact()?;
            display::print_classification(&impact, &Classification::of(&impact));
        }
        Command::Transitions { status, role } => {
            display::print_transitions(status, role, &allowed_transitions(status, role));
        }
        Command::Submit {
            store,
            id,
            tracking_number,
            name,
            priority,
            submitted_by,
            impact,
        } => {
            let impact = impact.into_impact()?;
            let requests = open_store(&store.path)?;
            if requests.get(&id)?.is_some() {
                bail!("request {id} already exists in {}", store.path.display());
            }
            let request = SoftwareRequest::submit(
                id,
                tracking_number,
                name,
                impact,
                priority,
                submitted_by,
                chrono::Utc::now(),
            );
            let calculated = request.calculated_priority();
            println!("{}: submitted, calculated priority {}", request.id, calculated);
            requests.save(request)?;
            requests.save_snapshot(&store.path)?;
        }
        Command::Show { store, id, role } => {
            let store = open_store(&store.path)?;
            display::print_request_card(&store.require(&id)?, role);
        }
        Command::Transition {
            store,
            id,
            to,
            role,
            actor,
            remark,
            assign,
        } => {
            let requests = open_store(&store.path)?;
            let outcome = requests.update(&id, |request| {
                request.transition(to, role, &actor, remark.as_deref(), assign.as_deref())
            })?;
            let record = match outcome {
                Ok(record) => record,
                Err(err) => bail!("status change rejected: {err}"),
            };
            requests.save_snapshot(&store.path)?;
            println!(
                "{}: {} -> {}",
                id,
                record.from_status.label(),
                record.to_status.label()
            );
        }
        Command::Push {
            store,
            id,
            api_base_url,
        } => {
            let request = open_store(&store.path)?.require(&id)?;
            let client = BackendClient::new(api_base_url);
            let plan = PushPlan::for_request(&request);

            client
                .update_status(&request.id, plan.status, plan.remark)
                .await
                .context("pushing status")?;
            println!("{}: pushed status {}", request.id, plan.status);
            if let Some(pm) = plan.assign {
                client
                    .assign(&request.id, pm)
                    .await
                    .context("pushing assignment")?;
                println!("{}: pushed assignment {}", request.id, pm);
            }
        }
    }
    Ok(())
}

/// What `push` sends for a stored request.
#[derive(Debug, PartialEq)]
struct PushPlan<'a> {
    status: RequestStatus,
    remark: Option<&'a str>,
    /// Only set when the latest status change assigned a project manager.
    assign: Option<&'a str>,
}

impl<'a> PushPlan<'a> {
    fn for_request(request: &'a SoftwareRequest) -> Self {
        let remark = match request.status {
            RequestStatus::Rejected => request.rejection_remark.as_deref(),
            RequestStatus::OnHold => request.on_hold_remark.as_deref(),
            _ => None,
        };
        let assign = request
            .status_history
            .last()
            .and_then(|record| record.assigned_to.as_deref());
        Self {
            status: request.status,
            remark,
            assign,
        }
    }
}

fn open_store(path: &Path) -> anyhow::Result<MemoryStore> {
    MemoryStore::open_snapshot_or_empty(path)
        .with_context(|| format!("opening store {}", path.display()))
}
