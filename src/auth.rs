/// Per-request authentication state, established once by whatever front end
/// handles credentials and passed explicitly into every mutating call. There
/// is no process-global admin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthContext {
    Anonymous,
    Admin,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        matches!(self, AuthContext::Admin)
    }
}

/// The single admin account. Overridable through the environment; the
/// defaults match the tutorial deployment.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let username = std::env::var("LEAGUE_ADMIN_USER")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "admin".to_string());
        let password = std::env::var("LEAGUE_ADMIN_PASS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "password".to_string());
        Self { username, password }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> AuthContext {
        if username == self.username && password == self.password {
            AuthContext::Admin
        } else {
            AuthContext::Anonymous
        }
    }
}
