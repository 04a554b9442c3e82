use super::InstallerError;

/// Builder for the error variants that carry optional operator guidance
pub struct ErrorBuilder;

impl ErrorBuilder {
    /// Starts an unsupported environment error
    pub fn unsupported(reason: &str) -> UnsupportedEnvironmentBuilder {
        UnsupportedEnvironmentBuilder {
            reason: reason.to_string(),
            remediation: None,
        }
    }

    /// Starts a repository failure error
    pub fn repository(name: &str) -> RepositoryFailureBuilder {
        RepositoryFailureBuilder {
            repository: name.to_string(),
            message: String::new(),
        }
    }
}

pub struct UnsupportedEnvironmentBuilder {
    reason: String,
    remediation: Option<String>,
}

impl UnsupportedEnvironmentBuilder {
    pub fn remediation(mut self, hint: impl Into<String>) -> Self {
        self.remediation = Some(hint.into());
        self
    }

    pub fn build(self) -> InstallerError {
        InstallerError::UnsupportedEnvironment {
            reason: self.reason,
            remediation: self.remediation,
        }
    }
}

pub struct RepositoryFailureBuilder {
    repository: String,
    message: String,
}

impl RepositoryFailureBuilder {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Uses the error chain of `err` as the message
    pub fn caused_by(mut self, err: &anyhow::Error) -> Self {
        self.message = format!("{err:#}");
        self
    }

    pub fn build(self) -> InstallerError {
        InstallerError::repository_enable_failure(self.repository, self.message)
    }
}
