use std::str::FromStr;
use std::time::Duration;

use error_stack::{Report, ResultExt};
use kernel::prelude::entity::Cents;
use kernel::KernelError;

static MIN_ALLOWED_BALANCE_CENTS: &str = "MIN_ALLOWED_BALANCE_CENTS";
static OVERDUE_SWEEP_INTERVAL_SECS: &str = "OVERDUE_SWEEP_INTERVAL_SECS";
static SERVER_PORT: &str = "SERVER_PORT";

#[derive(Debug, Clone)]
pub struct Config {
    pub min_allowed_balance: Option<Cents>,
    pub sweep_interval: Duration,
    pub port: u16,
}

impl Config {
    /// Reads the process environment, honouring a `.env` file if present.
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        let _ = dotenvy::dotenv();
        let sweep_secs: u64 = optional(OVERDUE_SWEEP_INTERVAL_SECS)?.unwrap_or(3600);
        if sweep_secs == 0 {
            return Err(Report::new(KernelError::InvalidInput)
                .attach_printable(format!("`{OVERDUE_SWEEP_INTERVAL_SECS}` must be positive")));
        }
        Ok(Self {
            min_allowed_balance: optional::<i64>(MIN_ALLOWED_BALANCE_CENTS)?.map(Cents::new),
            sweep_interval: Duration::from_secs(sweep_secs),
            port: optional(SERVER_PORT)?.unwrap_or(8080),
        })
    }
}

fn optional<T>(key: &str) -> error_stack::Result<Option<T>, KernelError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenvy::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|error| Report::new(error).change_context(KernelError::InvalidInput))
            .attach_printable_lazy(|| format!("`{key}` has an invalid value `{value}`")),
        Err(dotenvy::Error::EnvVar(std::env::VarError::NotPresent)) => Ok(None),
        Err(error) => Err(Report::new(error).change_context(KernelError::Internal))
            .attach_printable_lazy(|| format!("Failed to read `{key}`")),
    }
}

#[cfg(test)]
mod test {
    use super::optional;
    use kernel::KernelError;

    #[test]
    fn missing_key_is_none() {
        let value = optional::<u16>("TOOLSHARE_SURELY_UNSET_KEY").unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn garbage_is_invalid_input() {
        std::env::set_var("TOOLSHARE_GARBAGE_PORT", "eighty");
        let error = optional::<u16>("TOOLSHARE_GARBAGE_PORT").unwrap_err();
        assert_eq!(error.current_context(), &KernelError::InvalidInput);
    }
}
