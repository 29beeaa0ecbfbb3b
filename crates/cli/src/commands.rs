//! Subcommand handlers.

use anyhow::{bail, Context};
use clap::{Args, Subcommand, ValueEnum};
use tracing::info;

use adala_admin::{AuditLog, RoleRecord, Tenant, UserAccount};
use adala_auth::{LoginForm, LoginState, LoginStep, TwoFactorForm};
use adala_cases::{CalendarEvent, LegalCase};
use adala_client::screens::sign_out;
use adala_client::{AdalaClient, Collaborators, DeleteOutcome, ListScreen, ResourceService};
use adala_clients::Client;
use adala_consultations::Consultation;
use adala_contracts::Contract;
use adala_core::pagination::DEFAULT_PAGE_SIZE;
use adala_core::{PageRequest, RecordId, Resource, SortDirection, SortState};
use adala_documents::Document;
use adala_hr::{Employee, Leave, LeaveRejection};
use adala_tasks::Task;
use adala_timetracking::TimeEntry;

use crate::prompt::{ask, ask_secret};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Cases,
    Calendar,
    Clients,
    Contracts,
    Documents,
    Consultations,
    Employees,
    Leaves,
    Tasks,
    TimeEntries,
    Users,
    Roles,
    Tenants,
    AuditLogs,
}

/// Run a generic handler with the record type behind `kind`.
macro_rules! with_resource {
    ($kind:expr, $handler:ident($($arg:expr),*)) => {
        match $kind {
            ResourceKind::Cases => $handler::<LegalCase>($($arg),*).await,
            ResourceKind::Calendar => $handler::<CalendarEvent>($($arg),*).await,
            ResourceKind::Clients => $handler::<Client>($($arg),*).await,
            ResourceKind::Contracts => $handler::<Contract>($($arg),*).await,
            ResourceKind::Documents => $handler::<Document>($($arg),*).await,
            ResourceKind::Consultations => $handler::<Consultation>($($arg),*).await,
            ResourceKind::Employees => $handler::<Employee>($($arg),*).await,
            ResourceKind::Leaves => $handler::<Leave>($($arg),*).await,
            ResourceKind::Tasks => $handler::<Task>($($arg),*).await,
            ResourceKind::TimeEntries => $handler::<TimeEntry>($($arg),*).await,
            ResourceKind::Users => $handler::<UserAccount>($($arg),*).await,
            ResourceKind::Roles => $handler::<RoleRecord>($($arg),*).await,
            ResourceKind::Tenants => $handler::<Tenant>($($arg),*).await,
            ResourceKind::AuditLogs => $handler::<AuditLog>($($arg),*).await,
        }
    };
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Six-digit tenant account number (prompted when omitted).
    #[arg(long)]
    pub account: Option<String>,

    /// Prompted when omitted.
    #[arg(long)]
    pub email: Option<String>,

    /// Keep the session on disk for later commands.
    #[arg(long)]
    pub remember: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub resource: ResourceKind,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub limit: u32,

    #[arg(long)]
    pub search: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub role: Option<String>,

    /// Sort column; newest first when omitted.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    pub desc: bool,
}

impl ListArgs {
    pub fn page_request(&self) -> PageRequest {
        let mut request = PageRequest::new(self.page, self.limit);
        if let Some(column) = &self.sort {
            let direction = if self.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            request = request.with_sort(SortState::new(column.as_str(), direction));
        }
        request.set_search(self.search.clone().unwrap_or_default());
        request.set_filter("status", self.status.clone());
        request.set_filter("role", self.role.clone());
        request
    }
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub resource: ResourceKind,

    pub id: String,
}

#[derive(Debug, Subcommand)]
pub enum LeaveCommand {
    /// Approve a pending leave request.
    Approve { id: String },
    /// Reject a pending leave request (reason prompted when omitted).
    Reject {
        id: String,
        #[arg(long)]
        reason: Option<String>,
    },
}

pub async fn login(
    adala: &AdalaClient,
    collaborators: Collaborators,
    args: &LoginArgs,
) -> anyhow::Result<()> {
    let mut screen = adala.login_screen(collaborators, None).await;
    if matches!(screen.flow().state(), LoginState::Authenticated { .. }) {
        println!("already signed in");
        return Ok(());
    }

    let account = match &args.account {
        Some(account) => account.clone(),
        None => ask("Account number")?,
    };
    let email = match &args.email {
        Some(email) => email.clone(),
        None => ask("Email")?,
    };
    let password = ask_secret("Password")?;
    let form = LoginForm::new(account, email, password).remember_me(args.remember);

    let mut step = screen
        .submit_credentials(&form)
        .await
        .context("sign-in failed")?;
    if step == LoginStep::TwoFactorRequired {
        let code = ask("Two-factor code")?;
        step = screen
            .submit_two_factor(&TwoFactorForm::new(code))
            .await
            .context("two-factor verification failed")?;
    }

    if let LoginStep::Authenticated { session, .. } = step {
        println!("signed in as {} <{}>", session.display_name(), session.user.email);
    }
    Ok(())
}

pub async fn logout(adala: &AdalaClient, collaborators: Collaborators) -> anyhow::Result<()> {
    sign_out(&adala.auth(), &collaborators, Some(adala.session_store()))
        .await
        .context("sign-out failed")?;
    println!("signed out");
    Ok(())
}

pub async fn whoami(adala: &AdalaClient) -> anyhow::Result<()> {
    if adala.api().session().await.is_none() {
        bail!("not signed in; run `adala login`");
    }
    let user = adala
        .auth()
        .current_user()
        .await
        .context("failed to fetch the current user")?;
    println!("{} <{}> ({})", user.display_name(), user.email, user.role.label());
    Ok(())
}

pub async fn list(
    adala: &AdalaClient,
    collaborators: Collaborators,
    args: &ListArgs,
) -> anyhow::Result<()> {
    with_resource!(args.resource, list_as(adala, collaborators, args))
}

pub async fn delete(
    adala: &AdalaClient,
    collaborators: Collaborators,
    args: &DeleteArgs,
) -> anyhow::Result<()> {
    let id = RecordId::new(args.id.as_str())?;
    with_resource!(args.resource, delete_as(adala, collaborators, &id))
}

pub async fn leave(adala: &AdalaClient, command: &LeaveCommand) -> anyhow::Result<()> {
    let leaves = adala.leaves();
    let (id, reason) = match command {
        LeaveCommand::Approve { id } => (id, None),
        LeaveCommand::Reject { id, reason } => {
            let reason = match reason {
                Some(reason) => reason.clone(),
                None => ask("Reason")?,
            };
            (id, Some(LeaveRejection::new(reason)))
        }
    };
    let id = RecordId::new(id.as_str())?;
    let request = leaves
        .records()
        .get(&id)
        .await
        .with_context(|| format!("failed to fetch {} {id}", Leave::LABEL))?;

    let decided = match &reason {
        None => leaves.approve(&request).await,
        Some(rejection) => leaves.reject(&request, rejection).await,
    }
    .with_context(|| format!("failed to decide {}", request.display_name()))?;
    println!("{}: {}", decided.display_name(), decided.status_label().unwrap_or("-"));
    Ok(())
}

async fn list_as<R: Resource>(
    adala: &AdalaClient,
    collaborators: Collaborators,
    args: &ListArgs,
) -> anyhow::Result<()> {
    let service = ResourceService::<R>::new(adala.api().clone());
    let mut screen = ListScreen::with_request(service, collaborators, args.page_request());
    if let Err(err) = screen.load().await {
        let inline = screen.error().unwrap_or_default().to_string();
        return Err(anyhow::Error::new(err).context(inline));
    }

    for row in screen.rows() {
        println!(
            "{}\t{}\t{}",
            row.id(),
            row.display_name(),
            row.status_label().unwrap_or("-")
        );
    }
    println!(
        "{}: page {}/{} ({} total)",
        R::PLURAL_LABEL,
        screen.page(),
        screen.pages().max(1),
        screen.total()
    );
    Ok(())
}

async fn delete_as<R: Resource>(
    adala: &AdalaClient,
    collaborators: Collaborators,
    id: &RecordId,
) -> anyhow::Result<()> {
    let service = ResourceService::<R>::new(adala.api().clone());
    let row = service
        .get(id)
        .await
        .with_context(|| format!("failed to fetch {} {id}", R::LABEL))?;

    let mut screen = ListScreen::new(service, collaborators);
    match screen.delete(&row).await {
        Ok(DeleteOutcome::Cancelled) => println!("cancelled"),
        Ok(DeleteOutcome::Deleted) => {
            info!(resource = R::PATH, id = %id, "deleted from the command line");
            println!("deleted {} \"{}\"", R::LABEL, row.display_name());
        }
        Err(err) => {
            let inline = screen.error().unwrap_or_default().to_string();
            return Err(anyhow::Error::new(err).context(inline));
        }
    }
    Ok(())
}
