use anyhow::{Context, Result};
use platform_authz::AuthzSettings;
use platform_db::DatabaseSettings;
use platform_obs::ObsConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub authz: AuthzSettings,
    pub obs: ObsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let database = DatabaseSettings::from_env().context("invalid database settings")?;
        let authz = AuthzSettings::from_env().context("invalid AUTHZ_* settings")?;
        Ok(Self {
            database,
            authz,
            obs: ObsConfig::from_env(),
        })
    }
}
