//! Environment overrides.
//!
//! `CHIT_*` variables win over every file source.

use crate::error::ConfigError;

use super::Config;

pub(super) fn apply_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(name) = env_lookup("CHIT_NAME") {
        config.post.name = name;
    }
    if let Some(mail) = env_lookup("CHIT_MAIL") {
        config.post.mail = mail;
    }
    if let Some(secs) = env_lookup("CHIT_POLL_INTERVAL_SECS") {
        config.session.poll_interval_secs = parse_secs("CHIT_POLL_INTERVAL_SECS", &secs)?;
    }
    if let Some(secs) = env_lookup("CHIT_HTTP_TIMEOUT_SECS") {
        config.network.timeout_secs = parse_secs("CHIT_HTTP_TIMEOUT_SECS", &secs)?;
    }
    Ok(())
}

fn parse_secs(var: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid {var} value `{value}`: expected positive integer seconds"
        ))
    })
}
