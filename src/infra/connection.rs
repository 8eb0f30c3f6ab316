// ============================================================
// Layer 6 — Connection Provider
// ============================================================
// Resolves the connection secret and opens a database handle
// with a bounded number of tries.
//
// Secret resolution:
//   1. the environment variable (default CNX_STR_PROFICAM)
//   2. otherwise, if configured, the first non-empty content of
//      a secret file
//   Neither → ConfigurationError. The value itself is only ever
//   logged at DEBUG.
//
// Retry loop:
//   tries run for attempt = 1 .. attempts-1 (exclusive bound),
//   so attempts = 6 gives five tries
//
//   on failure, not the last try → WARN, sleep(delay), try again
//   on failure, last try         → ERROR, ConnectionError
//
// The sleep is injectable so tests can count it without waiting.

use std::{fs, path::PathBuf, time::Duration};

use crate::domain::error::{PipelineError, Result};
use crate::domain::secret::ConnectionSecret;
use crate::domain::traits::Connector;

/// Default environment variable holding the connection string.
pub const DEFAULT_SECRET_VAR: &str = "CNX_STR_PROFICAM";

/// Where the connection string comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretSource {
    pub env_var: String,
    pub file:    Option<PathBuf>,
}

impl Default for SecretSource {
    fn default() -> Self {
        Self { env_var: DEFAULT_SECRET_VAR.to_string(), file: None }
    }
}

/// How hard to try before giving up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Exclusive upper bound on the attempt index; `attempts - 1` tries.
    pub attempts: u32,
    pub delay:    Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { attempts: 6, delay: Duration::from_secs(5) }
    }
}

impl RetryPolicy {
    /// Number of connection tries this policy allows.
    pub fn tries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Read the secret from the environment, falling back to a file.
pub fn resolve_secret(source: &SecretSource) -> Result<ConnectionSecret> {
    tracing::info!("Loading connection string from ${}", source.env_var);

    let value = match std::env::var(&source.env_var) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => match &source.file {
            Some(path) => {
                tracing::info!(
                    "${} is not set; reading connection string from '{}'",
                    source.env_var,
                    path.display()
                );
                fs::read_to_string(path)
                    .map_err(|e| {
                        tracing::error!("Cannot read secret file '{}': {}", path.display(), e);
                        PipelineError::Configuration(format!(
                            "secret file '{}' is unavailable: {e}",
                            path.display()
                        ))
                    })?
                    .trim()
                    .to_string()
            }
            None => String::new(),
        },
    };

    if value.is_empty() {
        tracing::error!("No connection string found in ${}", source.env_var);
        return Err(PipelineError::Configuration(format!(
            "connection string not found: set ${}",
            source.env_var
        )));
    }

    tracing::debug!("Connection string: {}", value);
    Ok(ConnectionSecret::new(value))
}

/// Open a connection, sleeping with `std::thread::sleep` between tries.
pub fn open_connection<'c, C: Connector>(
    connector: &'c C,
    secret:    &ConnectionSecret,
    policy:    RetryPolicy,
) -> Result<C::Handle<'c>> {
    open_connection_with(connector, secret, policy, std::thread::sleep)
}

/// Open a connection with a caller-supplied sleep.
pub fn open_connection_with<'c, C, S>(
    connector: &'c C,
    secret:    &ConnectionSecret,
    policy:    RetryPolicy,
    mut sleep: S,
) -> Result<C::Handle<'c>>
where
    C: Connector,
    S: FnMut(Duration),
{
    if policy.attempts < 2 {
        return Err(PipelineError::Configuration(format!(
            "attempts must be at least 2 to allow one try, got {}",
            policy.attempts
        )));
    }

    let last = policy.attempts - 1;
    for attempt in 1..policy.attempts {
        tracing::info!("Connecting to database (attempt {}/{})", attempt, last);
        match connector.connect(secret) {
            Ok(handle) => {
                tracing::info!("Connected on attempt {}", attempt);
                return Ok(handle);
            }
            Err(e) if attempt == last => {
                tracing::error!("Could not connect after {} attempt(s): {}", attempt, e);
                return Err(PipelineError::Connection { attempts: attempt, last_error: e });
            }
            Err(e) => {
                tracing::warn!(
                    "Connection attempt {} failed: {}; retrying in {:?}",
                    attempt,
                    e,
                    policy.delay
                );
                sleep(policy.delay);
            }
        }
    }

    unreachable!("the final attempt always returns")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::SqlSource;
    use polars::prelude::DataFrame;
    use std::cell::Cell;
    use std::io::Write;

    /// Fails the first `failures` connects, then succeeds.
    struct Flaky {
        failures: u32,
        calls:    Cell<u32>,
    }

    struct FakeHandle;

    impl SqlSource for FakeHandle {
        fn fetch(&mut self, _query: &str) -> Result<DataFrame> {
            Ok(DataFrame::empty())
        }
    }

    impl Connector for Flaky {
        type Handle<'a> = FakeHandle;

        fn connect(&self, _secret: &ConnectionSecret) -> std::result::Result<FakeHandle, String> {
            self.calls.set(self.calls.get() + 1);
            if self.calls.get() <= self.failures {
                Err("login timeout expired".into())
            } else {
                Ok(FakeHandle)
            }
        }
    }

    fn secret() -> ConnectionSecret {
        ConnectionSecret::new("DRIVER=fake")
    }

    #[test]
    fn test_always_failing_connector_gets_five_tries() {
        let connector = Flaky { failures: u32::MAX, calls: Cell::new(0) };
        let policy    = RetryPolicy { attempts: 6, delay: Duration::from_millis(250) };
        let mut slept = Vec::new();

        let err = open_connection_with(&connector, &secret(), policy, |d| slept.push(d))
            .err()
            .unwrap();

        assert_eq!(connector.calls.get(), 5);
        assert_eq!(slept, vec![Duration::from_millis(250); 4]);
        assert!(matches!(err, PipelineError::Connection { attempts: 5, .. }));
    }

    #[test]
    fn test_escalation_follows_attempts_not_a_constant() {
        let connector = Flaky { failures: u32::MAX, calls: Cell::new(0) };
        let policy    = RetryPolicy { attempts: 3, delay: Duration::ZERO };

        let err = open_connection_with(&connector, &secret(), policy, |_| {}).err().unwrap();
        assert_eq!(connector.calls.get(), 2);
        assert!(matches!(err, PipelineError::Connection { attempts: 2, .. }));
    }

    #[test]
    fn test_recovers_after_transient_failures() {
        let connector = Flaky { failures: 2, calls: Cell::new(0) };
        let mut sleeps = 0;

        let handle = open_connection_with(&connector, &secret(), RetryPolicy::default(), |_| sleeps += 1);
        assert!(handle.is_ok());
        assert_eq!(connector.calls.get(), 3);
        assert_eq!(sleeps, 2);
    }

    #[test]
    fn test_too_few_attempts_is_configuration_error() {
        let connector = Flaky { failures: 0, calls: Cell::new(0) };
        let policy    = RetryPolicy { attempts: 1, delay: Duration::ZERO };
        let err = open_connection_with(&connector, &secret(), policy, |_| {}).err().unwrap();
        assert!(matches!(err, PipelineError::Configuration(_)));
        assert_eq!(connector.calls.get(), 0);
    }

    #[test]
    fn test_secret_from_environment() {
        let var = "PROPERTY_VALUATION_TEST_SECRET_ENV";
        std::env::set_var(var, "DRIVER=x;SERVER=y");
        let source = SecretSource { env_var: var.into(), file: None };
        assert_eq!(resolve_secret(&source).unwrap().expose(), "DRIVER=x;SERVER=y");
        std::env::remove_var(var);
    }

    #[test]
    fn test_secret_falls_back_to_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "DRIVER=from-file").unwrap();

        let source = SecretSource {
            env_var: "PROPERTY_VALUATION_TEST_SECRET_UNSET".into(),
            file:    Some(file.path().to_path_buf()),
        };
        assert_eq!(resolve_secret(&source).unwrap().expose(), "DRIVER=from-file");
    }

    #[test]
    fn test_missing_secret_is_configuration_error() {
        let source = SecretSource { env_var: "PROPERTY_VALUATION_TEST_SECRET_NONE".into(), file: None };
        assert!(matches!(resolve_secret(&source), Err(PipelineError::Configuration(_))));
    }
}
