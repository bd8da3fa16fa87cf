//! lexrisk: run company risk analyses, draft follow-up emails and browse the
//! attorney, report, customer and knowledge directories from the terminal.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lexrisk_api::{ApiClient, ApiConfig, ApiError, OptionCache, SessionStore, Theme};
use lexrisk_core::select::{OptionSource, practice_area_options};
use lexrisk_core::table::{SortDirection, Table, TableRow};
use lexrisk_core::{AnalysisOptions, ProfileField, WizardView};
use lexrisk_store::{AttorneyFilter, Directory, ReportOrder, ReportQuery, StoreError};
use lexrisk_wizard::{Wizard, WizardError};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod display;

#[derive(Parser, Debug)]
#[command(name = "lexrisk", about = "Company risk analysis for legal operations", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Base URL of the analysis API.
    #[arg(long, global = true, env = "LEXRISK_API_BASE_URL", default_value = lexrisk_api::config::DEFAULT_BASE_URL)]
    api_base_url: String,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "LEXRISK_API_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// JSON file holding the session (token, user, theme, language). In memory when unset.
    #[arg(long, global = true, env = "LEXRISK_STORAGE")]
    storage: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a risk analysis for a company.
    Analyze(AnalyzeArgs),
    /// Open the analysis wizard from a deep link, e.g. "?view=report&companyName=Acme&confidence=92".
    Open {
        query: String,
    },
    /// Attorney directory.
    Attorneys {
        #[command(subcommand)]
        command: AttorneysCommand,
    },
    /// Past analysis reports.
    Reports {
        #[command(subcommand)]
        command: ReportsCommand,
    },
    /// Customer directory.
    Customers {
        #[command(subcommand)]
        command: CustomersCommand,
    },
    /// Knowledge sources consulted by analyses.
    Knowledge {
        #[command(subcommand)]
        command: KnowledgeCommand,
    },
    /// List the selectable practice areas.
    PracticeAreas {
        /// Fetch the list from this URL (absolute, or relative to the API base URL).
        #[arg(long)]
        from_url: Option<String>,
        /// Key of the response object holding the list.
        #[arg(long, requires = "from_url")]
        data_key: Option<String>,
    },
    /// Inspect or change the stored session.
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    #[arg(long)]
    company_name: String,
    #[arg(long)]
    company_email: String,
    #[arg(long)]
    company_phone: String,
    #[arg(long)]
    practice_area: String,
    /// Supporting document (PDF, DOC or DOCX, up to 10MB). Repeatable.
    #[arg(long = "attachment", value_name = "PATH")]
    attachments: Vec<PathBuf>,
    #[arg(long)]
    no_internal_docs: bool,
    #[arg(long)]
    no_public_news: bool,
    #[arg(long)]
    no_past_matters: bool,
    /// Continue to the email draft after the report.
    #[arg(long)]
    draft_email: bool,
    /// Replace the seeded email subject.
    #[arg(long, requires = "draft_email")]
    subject: Option<String>,
    /// Replace the seeded email body.
    #[arg(long, requires = "draft_email")]
    body: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AttorneysCommand {
    List {
        #[arg(long)]
        practice_area: Option<String>,
        /// Case-insensitive name search.
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        sort: SortArgs,
    },
    Show {
        id: u32,
    },
}

#[derive(Subcommand, Debug)]
enum ReportsCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        practice_area: Option<String>,
        /// Only reports from the N days up to --as-of.
        #[arg(long)]
        within_days: Option<u64>,
        /// Date the --within-days window counts back from (YYYY-MM-DD). Defaults to today.
        #[arg(long, value_name = "DATE")]
        as_of: Option<chrono::NaiveDate>,
        #[arg(long)]
        oldest_first: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CustomersCommand {
    List {
        #[command(flatten)]
        sort: SortArgs,
    },
    Show {
        id: u32,
    },
}

#[derive(Subcommand, Debug)]
enum KnowledgeCommand {
    List,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    Status,
    /// Store a bearer token, optionally with the user record as JSON.
    Login {
        token: String,
        #[arg(long)]
        user: Option<String>,
    },
    Logout,
    Theme {
        theme: ThemeArg,
    },
    Language {
        code: String,
    },
}

#[derive(clap::Args, Debug)]
struct SortArgs {
    /// Column key to sort by.
    #[arg(long)]
    sort: Option<String>,
    #[arg(long, requires = "sort")]
    descending: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

fn initialize_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    initialize_tracing();
    debug!("lexrisk v{}", env!("CARGO_PKG_VERSION"));

    let session = match &cli.storage {
        Some(path) => SessionStore::open(path)
            .with_context(|| format!("opening session storage {}", path.display()))?,
        None => SessionStore::in_memory(),
    };
    let config = ApiConfig::new(&cli.api_base_url).with_timeout(Duration::from_secs(cli.timeout_secs));

    match cli.command {
        Command::Analyze(args) => analyze(ApiClient::new(config, session)?, args).await,
        Command::Open { query } => open(ApiClient::new(config, session)?, &query),
        Command::Attorneys { command } => attorneys(&Directory::seeded()?, command),
        Command::Reports { command } => reports(&Directory::seeded()?, command),
        Command::Customers { command } => customers(&Directory::seeded()?, command),
        Command::Knowledge {
            command: KnowledgeCommand::List,
        } => {
            let dir = Directory::seeded()?;
            let rows: Vec<_> = dir.knowledge_sources().iter().collect();
            print!("{}", display::knowledge_table().render(&rows));
            Ok(ExitCode::SUCCESS)
        }
        Command::PracticeAreas { from_url, data_key } => {
            let source = match from_url {
                Some(url) => {
                    let remote = OptionSource::remote(url);
                    match data_key {
                        Some(key) => remote.with_data_key(key),
                        None => remote,
                    }
                }
                None => OptionSource::Static(practice_area_options()),
            };
            let client = ApiClient::new(config, session)?;
            let options = client.fetch_options(&OptionCache::default(), &source).await?;
            for option in options {
                if option.label == option.value {
                    println!("{}", option.label);
                } else {
                    println!("{}  ({})", option.label, option.value);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Session { command } => session_command(&session, command),
    }
}

async fn analyze(client: ApiClient, args: AnalyzeArgs) -> Result<ExitCode> {
    let mut wizard = Wizard::new(client);
    wizard.add_hook(display::print_view_banner);

    wizard.set_field(ProfileField::CompanyName, args.company_name);
    wizard.set_field(ProfileField::CompanyEmail, args.company_email);
    wizard.set_field(ProfileField::CompanyPhone, args.company_phone);
    wizard.set_field(ProfileField::PracticeArea, args.practice_area);
    wizard.set_options(AnalysisOptions {
        include_internal_docs: !args.no_internal_docs,
        include_public_news: !args.no_public_news,
        use_past_matters: !args.no_past_matters,
    });
    for path in &args.attachments {
        if let Err(e) = wizard.attach(path) {
            eprintln!("Skipping {}: {e}", path.display());
        }
    }

    info!(
        company = %wizard.profile().company_name,
        attachments = wizard.attachments().len(),
        "submitting analysis"
    );
    match wizard.run_analysis().await {
        Ok(_) => {}
        Err(WizardError::Validation(errors)) => {
            eprintln!("Please fix the following:");
            for e in &errors.errors {
                eprintln!("  {:<16} {}", e.field.label(), e.message);
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(WizardError::Analysis(e)) => {
            eprintln!("Analysis failed: {}", e.user_message());
            if let ApiError::Unauthorized { redirect } = &e {
                eprintln!("  Session cleared; sign in again ({redirect}).");
            } else {
                eprintln!("  Your entries were kept; run the command again to retry.");
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    }

    print_current(&wizard);
    if let Ok(link) = wizard.share_link() {
        println!("Share: {link}");
    }
    println!("Reopen: lexrisk open '?{}'", wizard.location().to_query());

    if args.draft_email {
        wizard.draft_email()?;
        if let Some(subject) = args.subject {
            wizard.edit_subject(subject);
        }
        if let Some(body) = args.body {
            wizard.edit_body(body);
        }
        print_current(&wizard);
    }
    Ok(ExitCode::SUCCESS)
}

fn open(client: ApiClient, query: &str) -> Result<ExitCode> {
    let wizard = Wizard::from_location(client, query);
    print_current(&wizard);
    if wizard.view() == WizardView::Form {
        println!();
        println!("No report in this link; run `lexrisk analyze` to start one.");
    } else if let Ok(link) = wizard.share_link() {
        println!("Share: {link}");
    }
    Ok(ExitCode::SUCCESS)
}

fn print_current<B>(wizard: &Wizard<B>) {
    match (wizard.view(), wizard.result()) {
        (WizardView::Form, _) | (_, None) => display::print_form(wizard.profile()),
        (WizardView::Report, Some(result)) => display::print_report(wizard.profile(), result),
        (WizardView::EmailDraft, Some(_)) => {
            if let Some(draft) = wizard.draft() {
                display::print_draft(draft);
            }
        }
    }
}

fn attorneys(dir: &Directory, command: AttorneysCommand) -> Result<ExitCode> {
    match command {
        AttorneysCommand::List {
            practice_area,
            search,
            sort,
        } => {
            let mut rows = dir.attorneys(&AttorneyFilter {
                practice_area,
                search,
            });
            print_sorted(&display::attorney_table(), &mut rows, &sort)
        }
        AttorneysCommand::Show { id } => match dir.attorney(id) {
            Ok(attorney) => {
                display::print_attorney(attorney);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => not_found(e, "lexrisk attorneys list"),
        },
    }
}

/// Split a `reports list` invocation into the query and the window's end date.
fn report_query(command: ReportsCommand) -> (ReportQuery, chrono::NaiveDate) {
    let ReportsCommand::List {
        search,
        practice_area,
        within_days,
        as_of,
        oldest_first,
    } = command;
    let query = ReportQuery {
        search,
        practice_area,
        within_days,
        order: if oldest_first {
            ReportOrder::OldestFirst
        } else {
            ReportOrder::LatestFirst
        },
    };
    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    (query, as_of)
}

fn reports(dir: &Directory, command: ReportsCommand) -> Result<ExitCode> {
    let (query, as_of) = report_query(command);
    let rows = dir.reports(&query, as_of);
    print!("{}", display::report_table().render(&rows));
    for report in &rows {
        debug!(id = report.id, link = %report.deep_link(), "report deep link");
    }
    if let Some(first) = rows.first() {
        println!();
        println!("Open one with: lexrisk open '?{}'", first.deep_link());
    }
    Ok(ExitCode::SUCCESS)
}

fn customers(dir: &Directory, command: CustomersCommand) -> Result<ExitCode> {
    match command {
        CustomersCommand::List { sort } => {
            let mut rows: Vec<_> = dir.customers().iter().collect();
            print_sorted(&display::customer_table(), &mut rows, &sort)
        }
        CustomersCommand::Show { id } => match dir.customer(id) {
            Ok(customer) => {
                display::print_customer(customer);
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => not_found(e, "lexrisk customers list"),
        },
    }
}

fn print_sorted<R: TableRow>(table: &Table<R>, rows: &mut [R], sort: &SortArgs) -> Result<ExitCode> {
    if let Some(key) = &sort.sort {
        let direction = if sort.descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        table.sort(rows, key, direction)?;
    }
    print!("{}", table.render(rows));
    Ok(ExitCode::SUCCESS)
}

/// Lookups that miss print inline with a pointer back to the listing.
fn not_found(e: StoreError, listing: &str) -> Result<ExitCode> {
    match e {
        StoreError::NotFound { .. } => {
            eprintln!("{e}");
            eprintln!("  See `{listing}` for valid ids.");
            Ok(ExitCode::FAILURE)
        }
        other => Err(other.into()),
    }
}

fn session_command(session: &SessionStore, command: SessionCommand) -> Result<ExitCode> {
    match command {
        SessionCommand::Status => {
            match session.token() {
                Some(token) => println!("Signed in     token {}", mask(&token)),
                None => println!("Signed out"),
            }
            if let Some(user) = session.user() {
                println!("User          {user}");
            }
            println!("Theme         {}", session.theme());
            println!("Language      {}", session.language());
        }
        SessionCommand::Login { token, user } => {
            let user = user
                .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
                .transpose()
                .context("--user must be JSON")?;
            session.login(&token, user.as_ref())?;
            println!("Signed in.");
        }
        SessionCommand::Logout => {
            session.logout()?;
            println!("Signed out.");
        }
        SessionCommand::Theme { theme } => {
            session.set_theme(theme.into())?;
            println!("Theme set to {}.", session.theme());
        }
        SessionCommand::Language { code } => {
            session.set_language(&code)?;
            println!("Language set to {code}.");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn mask(token: &str) -> String {
    let tail: String = token.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
    format!("…{tail}")
}
