use database::{db::create_connection, password::Password, services::AccountService};
use log::{error, info, warn};
use migration::{Migrator, MigratorTrait};
use server::{
    AppState, auth::JwtKeys, config::Config, router, utils::shutdown::shutdown_signal,
    utils::storage::DocumentStorage,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let db = create_connection(&config.database_url, config.database_max_connections).await?;
    Migrator::up(&db, None).await?;
    info!("Database migrations applied");

    match (&config.bootstrap_admin_email, &config.bootstrap_admin_password) {
        (Some(email), Some(password)) => {
            if let Some(admin) =
                AccountService::bootstrap_admin(&db, email, &Password::new(password.as_str()))
                    .await?
            {
                info!("Created initial admin account {}", admin.email);
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together");
        }
        (None, None) => {}
    }

    let storage = DocumentStorage::new(config.documents_dir.clone()).await?;
    info!("Storing documents in {}", storage.root().display());

    let state = AppState {
        db,
        jwt: JwtKeys::new(config.jwt_secret.as_bytes(), config.session_ttl),
        storage,
        charge_policy: config.charge_policy,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Running axum on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
