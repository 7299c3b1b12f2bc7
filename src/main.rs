use std::sync::Arc;

use anyhow::{Context, bail};
use secrecy::SecretString;

use smartcard_wizard::api::{HttpProfileApi, ProfileApi};
use smartcard_wizard::profiles::{Dashboard, DashboardLoad};
use smartcard_wizard::store::{FileStore, KeyValueStore};
use smartcard_wizard::wizard::Progress;
use smartcard_wizard::{DraftStore, Session, SubmissionFlow, SubmitOutcome, WizardConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = WizardConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("status");

    eprintln!("🪪 Smart Card wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: {}", config.api_base_url);
    eprintln!("   Data: {}", config.data_dir.display());

    let backend: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(&config.data_dir)
            .await
            .with_context(|| format!("opening data dir {}", config.data_dir.display()))?,
    );
    let (store, restore) = DraftStore::open(backend.clone(), config.draft_limits())
        .await
        .context("loading saved draft")?;
    if let Some(notice) = restore.notice() {
        eprintln!("   {notice}");
    }
    let store = Arc::new(store);
    let session = Session::new(backend);

    match command {
        "status" => print_status(&store, &session).await,
        "reset" => {
            store.reset_wizard().await;
            println!("Draft cleared.");
        }
        "login" => {
            let Some(token) = args.get(1) else {
                bail!("usage: smartcard-wizard login <token>");
            };
            session.login(&SecretString::from(token.clone()), None).await?;
            println!("Logged in.");
        }
        "logout" => {
            session.logout().await;
            println!("Logged out.");
        }
        "profiles" => {
            let api: Arc<dyn ProfileApi> = Arc::new(HttpProfileApi::new(&config)?);
            match Dashboard::new(api, session).load().await? {
                DashboardLoad::Loaded(profiles) => {
                    for p in profiles {
                        let status = if p.is_published { "published" } else { "draft" };
                        println!("{}\t{}\t{}", p.slug, p.full_name, status);
                    }
                }
                DashboardLoad::LoginRequired => println!("Please login first."),
            }
        }
        "submit" => {
            if !store.has_required_data().await {
                bail!("draft is incomplete; fill every step before submitting");
            }
            let api: Arc<dyn ProfileApi> = Arc::new(HttpProfileApi::new(&config)?);
            let flow = SubmissionFlow::new(store.clone(), api, session);
            match flow.submit().await? {
                SubmitOutcome::Created(profile) => {
                    println!("Profile created: {}", profile.full_name);
                    if let Some(url) = profile.profile_url {
                        println!("  {url}");
                    }
                }
                SubmitOutcome::LoginRequired => {
                    println!("Please login first. Your draft has been kept.");
                }
            }
        }
        other => bail!(
            "unknown command {other:?} (expected status, reset, login, logout, profiles, submit)"
        ),
    }

    Ok(())
}

async fn print_status(store: &DraftStore, session: &Session) {
    let draft = store.snapshot().await;
    let progress = Progress::at(draft.current_step);

    println!("{}", progress.label);
    for step in &progress.steps {
        println!("  [{:?}] {}", step.status, step.step);
    }
    let name = &draft.personal_info.full_name;
    println!(
        "Name: {}",
        if name.is_empty() { "(not set)" } else { name }
    );
    println!("Work experiences: {}", draft.work_experiences.len());
    println!("Social links: {}", draft.social_links.len());
    println!(
        "Avatar: {}",
        if draft.avatar_url.is_empty() { "(not set)" } else { &draft.avatar_url }
    );
    println!(
        "Logged in: {}",
        if session.is_logged_in().await { "yes" } else { "no" }
    );
}
