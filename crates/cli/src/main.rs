//! pawclinic CLI
//!
//! Book a clinic appointment from the terminal.
//!
//! ```bash
//! pawclinic clinics
//! pawclinic select-clinic 3
//! pawclinic fields
//! pawclinic book --owner-phone 09171234567 --answer 1=Limping --answer 2=Vaccination
//! ```
//!
//! # Environment Variables
//! - `PAWCLINIC_API_URL`: backend base URL (default: `http://localhost:8000/api`)
//! - `PAWCLINIC_TOKEN`: bearer token, overriding the stored one
//! - `PAWCLINIC_DATA_DIR`: local storage directory (default: `<data dir>/pawclinic`)
//! - `PAWCLINIC_TIMEOUT_SECS`: request timeout in seconds (default: none)
//! - `PAWCLINIC_COMMIT_MODE`: date/time picker behaviour, `immediate` or `deferred`

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pawclinic_client::config::{commit_mode_from_env_value, timeout_from_env_value};
use pawclinic_client::{
    ApiClient, BookingSession, ClientConfig, ClinicId, LocalStore, SelectedClinic,
    DEFAULT_API_URL,
};
use pawclinic_types::NonEmptyText;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod answers;
mod output;

use answers::{apply_answers, Answer};

#[derive(Parser)]
#[command(name = "pawclinic")]
#[command(about = "Request veterinary clinic appointments")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "PAWCLINIC_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Bearer token (defaults to the stored token)
    #[arg(long, env = "PAWCLINIC_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Local storage directory
    #[arg(long, env = "PAWCLINIC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Request timeout in seconds; 0 or unset waits indefinitely
    #[arg(long, env = "PAWCLINIC_TIMEOUT_SECS")]
    timeout_secs: Option<String>,

    /// Date/time picker behaviour: immediate or deferred
    #[arg(long, env = "PAWCLINIC_COMMIT_MODE")]
    commit_mode: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List clinics
    Clinics,
    /// Remember the clinic to book with
    SelectClinic {
        /// Clinic ID
        id: ClinicId,
        /// Clinic name (looked up when omitted)
        #[arg(long)]
        name: Option<String>,
    },
    /// Forget the selected clinic
    ClearClinic,
    /// Store a bearer token
    SetToken {
        /// Token issued at login
        token: String,
    },
    /// Remove the stored bearer token
    ClearToken,
    /// Show a clinic's intake form
    Fields {
        /// Clinic ID (defaults to the selected clinic)
        #[arg(long)]
        clinic: Option<ClinicId>,
    },
    /// Request an appointment
    Book {
        /// Clinic ID (defaults to the selected clinic)
        #[arg(long)]
        clinic: Option<ClinicId>,
        /// Owner name (defaults to the signed-in user's name)
        #[arg(long)]
        owner_name: Option<String>,
        /// Owner phone number
        #[arg(long)]
        owner_phone: String,
        /// Field answer as <field_id>=<value>; repeat per checkbox option
        #[arg(long = "answer", value_name = "FIELD_ID=VALUE")]
        answers: Vec<Answer>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pawclinic=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => LocalStore::default_data_dir()?,
    };
    let store = LocalStore::open(&data_dir)
        .with_context(|| format!("opening local storage in {}", data_dir.display()))?;

    match cli.command {
        Commands::SetToken { ref token } => {
            let token = NonEmptyText::new(token).context("token cannot be blank")?;
            store.set_token(&token)?;
            println!("Token saved.");
            return Ok(());
        }
        Commands::ClearToken => {
            store.clear_token()?;
            println!("Token removed.");
            return Ok(());
        }
        Commands::ClearClinic => {
            store.clear_selected_clinic()?;
            println!("Clinic selection cleared.");
            return Ok(());
        }
        _ => {}
    }

    let config = resolve_config(&cli, &store)?;
    tracing::debug!(base_url = config.base_url(), "using backend");
    let client = ApiClient::new(config)?;

    match cli.command {
        Commands::Clinics => {
            let clinics = client.list_clinics().await?;
            if clinics.is_empty() {
                println!("No clinics found.");
            }
            let selected = store.selected_clinic();
            for clinic in &clinics {
                println!("{}", output::describe_clinic(clinic, selected.as_ref()));
            }
        }
        Commands::SelectClinic { id, name } => {
            let clinic = match name {
                Some(name) => SelectedClinic {
                    id,
                    clinic_name: name,
                    image_url: None,
                    address: None,
                    contact_number: None,
                    is_open: true,
                },
                None => lookup_clinic(&client, id).await,
            };
            store.set_selected_clinic(&clinic)?;
            println!("Selected clinic {} {}", clinic.id, clinic.clinic_name);
        }
        Commands::Fields { clinic } => {
            let clinic_id = clinic_or_selected(clinic, &store)?;
            let mut session =
                BookingSession::new(client, Some(clinic_id), Default::default());
            session.load_fields().await;
            if let Some(banner) = session.banner().filter(|b| b.is_error()) {
                bail!("{}", banner.text);
            }
            if session.fields().is_empty() {
                println!("This clinic has no intake fields.");
            }
            for field in session.fields() {
                for line in output::describe_field(field, session.value(field.id)) {
                    println!("{line}");
                }
            }
        }
        Commands::Book {
            clinic,
            owner_name,
            owner_phone,
            answers,
        } => {
            let clinic_id = clinic_or_selected(clinic, &store)?;
            let commit_mode = client.config().commit_mode();
            let mut session = BookingSession::new(client, Some(clinic_id), commit_mode);

            session.prefill_owner().await;
            if let Some(name) = owner_name {
                session.set_owner_name(name);
            }
            session.set_owner_phone(owner_phone);

            session.load_fields().await;
            if let Some(banner) = session.banner().filter(|b| b.is_error()) {
                bail!("{}", banner.text);
            }

            apply_answers(&mut session, &answers)?;
            session.submit().await;

            match session.banner() {
                Some(banner) if banner.is_error() => bail!("{}", banner.text),
                Some(banner) => println!("{}", banner.text),
                None => bail!("appointment request was not sent"),
            }
        }
        Commands::SetToken { .. } | Commands::ClearToken | Commands::ClearClinic => {}
    }

    Ok(())
}

/// Build the client configuration from flags, environment and the stored token.
fn resolve_config(cli: &Cli, store: &LocalStore) -> anyhow::Result<ClientConfig> {
    let token = match cli.token.as_deref().map(NonEmptyText::new) {
        Some(Ok(token)) => Some(token),
        Some(Err(_)) | None => store.token()?,
    };

    Ok(ClientConfig::new(&cli.api_url)?
        .with_token(token)
        .with_timeout(timeout_from_env_value(cli.timeout_secs.clone())?)
        .with_commit_mode(commit_mode_from_env_value(cli.commit_mode.clone())?))
}

fn clinic_or_selected(clinic: Option<ClinicId>, store: &LocalStore) -> anyhow::Result<ClinicId> {
    match clinic.or_else(|| store.selected_clinic().map(|c| c.id)) {
        Some(id) => Ok(id),
        None => bail!("no clinic selected; pass --clinic or run `pawclinic select-clinic <id>`"),
    }
}

/// Fill in clinic details from `GET /clinics`, falling back to just the id.
async fn lookup_clinic(client: &ApiClient, id: ClinicId) -> SelectedClinic {
    let found = match client.list_clinics().await {
        Ok(clinics) => clinics.iter().find(|c| c.id == id).map(SelectedClinic::from),
        Err(e) => {
            tracing::warn!(error = %e, "could not look up clinic details");
            None
        }
    };

    found.unwrap_or_else(|| SelectedClinic {
        id,
        clinic_name: String::new(),
        image_url: None,
        address: None,
        contact_number: None,
        is_open: false,
    })
}
