//! Token command - issues a JWT for an existing user

use clap::Args;

use crate::config::AppConfig;
use crate::domain::user::UserId;
use crate::infrastructure::auth::{JwtConfig, JwtGenerator, JwtService};
use crate::infrastructure::logging::init_logging;

#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Id of the user the token is issued for
    #[arg(long)]
    pub user: String,
}

pub async fn run(args: TokenArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    let secret = crate::configured_jwt_secret(&config).ok_or_else(|| {
        anyhow::anyhow!("Set auth.jwt_secret or JWT_SECRET so the server accepts the token")
    })?;

    let user_id = UserId::parse(&args.user)?;
    let repositories = crate::create_repositories(&config).await?;
    let user = repositories
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("User '{}' not found", user_id))?;

    let jwt = JwtService::new(JwtConfig::new(secret, config.auth.expiration_hours));
    let token = jwt.generate(&user)?;

    println!("{}", token);

    Ok(())
}
