// ============================================================
// Layer 3 — Connection Secret
// ============================================================
// The ODBC connection string, e.g.
//   DRIVER={ODBC Driver 17 for SQL Server};SERVER=...;UID=...;PWD=...
//
// Debug and Display never show the value. Code that really needs
// it (the connector, the DEBUG-level trace) calls expose().

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSecret(String);

impl ConnectionSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ConnectionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConnectionSecret(***)")
    }
}

impl fmt::Display for ConnectionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted() {
        let s = ConnectionSecret::new("DRIVER=x;PWD=hunter2");
        assert!(!format!("{s:?}").contains("hunter2"));
        assert!(!s.to_string().contains("hunter2"));
        assert_eq!(s.expose(), "DRIVER=x;PWD=hunter2");
    }
}
