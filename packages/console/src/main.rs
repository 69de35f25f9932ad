use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::auth::{self, Session};
use api::services::{associations, contents};
use api::{ApiClient, ApiError, Redirect, ReqwestTransport, Settings, Transport};
use store::{AssociationFilter, FileTokens, MemoryTokens, TokenStore};

#[derive(Parser)]
#[command(name = "console")]
#[command(about = "Browse the association platform from a terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the public association directory
    Associations {
        /// Page to show, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Keep associations whose name or acronym contains TEXT
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,

        /// Keep site associations only
        #[arg(long)]
        site: bool,

        /// Keep associations of these institution ids
        #[arg(long, value_delimiter = ',')]
        institutions: Vec<i64>,
    },
    /// Print an editable page content
    Content {
        /// Content code, e.g. HOME_INFO
        code: String,
    },
    /// Sign in and print the signed-in user
    Login { username: String, password: String },
    /// Sign out and forget the stored tokens
    Logout,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let settings = Settings::new()?;
    let transport = ReqwestTransport::new(&settings.base_url)?;
    let show_backend_errors = settings.show_backend_errors;

    let result = match settings.token_file.clone() {
        Some(path) => run(cli.command, ApiClient::new(transport, FileTokens::new(path), settings)).await,
        None => run(cli.command, ApiClient::new(transport, MemoryTokens::new(), settings)).await,
    };
    if let Err(error) = &result {
        explain(error, show_backend_errors);
    }
    Ok(result?)
}

async fn run<T: Transport, S: TokenStore>(
    command: Command,
    client: ApiClient<T, S>,
) -> Result<(), ApiError> {
    let mut state = client.settings().client_config().app_state();
    let mut session = Session::default();

    match command {
        Command::Associations {
            page,
            search,
            site,
            institutions,
        } => {
            let query = associations::AssociationQuery::public();
            associations::get_associations(&client, &mut state.associations, &query).await?;
            associations::get_institutions(&client, &mut state.associations).await?;

            let filter = AssociationFilter {
                text: search,
                institutions,
                is_site: site.then_some(true),
                ..Default::default()
            };
            let listed = filter.apply(state.associations.associations.items());

            let mut paginator = client.settings().client_config().paginator();
            paginator.set_page(page, listed.len());
            for association in paginator.slice(&listed) {
                let institution = state
                    .associations
                    .institution_label(association.institution)
                    .unwrap_or("-");
                println!("{:>5}  {:<40}  {}", association.id, association.name, institution);
            }
            println!(
                "page {}/{} ({} associations)",
                paginator.page(),
                paginator.page_count(listed.len()),
                listed.len()
            );
        }
        Command::Content { code } => {
            contents::get_contents(&client, &mut state.contents).await?;
            match state.contents.by_code(&code) {
                Some(content) => {
                    for part in [&content.header, &content.body, &content.footer, &content.aside]
                        .into_iter()
                        .flatten()
                    {
                        println!("{part}\n");
                    }
                }
                None => println!("no content with code {code}"),
            }
        }
        Command::Login { username, password } => {
            auth::login(&client, &mut session, &username, &password).await?;
            if let Some(user) = &session.user {
                println!("signed in as {} <{}>", user.display_name(), user.email);
            }
        }
        Command::Logout => {
            auth::logout(&client, &mut session).await?;
            println!("signed out");
        }
    }
    Ok(())
}

fn explain(error: &ApiError, show_backend_errors: bool) {
    let report = error.report(show_backend_errors);
    match &report.detail {
        Some(detail) => tracing::error!(key = report.key, %detail, "request failed"),
        None => tracing::error!(key = report.key, "request failed"),
    }
    if report.redirect == Some(Redirect::Maintenance) {
        eprintln!("The platform is under maintenance, try again later.");
    }
}
