use std::ffi::OsString;
use std::process::Command;

use crate::config::Config;
use crate::domain::Notification;
use crate::errors::{NotifierError, NotifierResult};

#[cfg_attr(test, mockall::automock)]
pub trait Dispatcher {
    /// Hand one notification to the delivery backend.
    fn send(&self, notification: &Notification) -> NotifierResult<()>;
}

/// Delivers notifications by running the `apprise` CLI once per message.
pub struct AppriseDispatcher {
    program: String,
    config: Option<String>,
}

impl AppriseDispatcher {
    pub fn new(program: impl Into<String>, config: Option<String>) -> Self {
        Self {
            program: program.into(),
            config,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.apprise_bin.clone(), config.apprise_config.clone())
    }

    /// Arguments passed to the program; title and body stay separate arguments.
    pub fn args(&self, notification: &Notification) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(6);

        if let Some(config) = &self.config {
            args.push("-q".into());
            args.push("-c".into());
            args.push(config.into());
        }

        args.push("-t".into());
        args.push(notification.title.as_str().into());
        args.push("-b".into());
        args.push(notification.body.as_str().into());

        args
    }
}

impl Dispatcher for AppriseDispatcher {
    fn send(&self, notification: &Notification) -> NotifierResult<()> {
        let output = Command::new(&self.program)
            .args(self.args(notification))
            .output()
            .map_err(|e| NotifierError::Dispatch(format!("could not run {}: {}", self.program, e)))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(NotifierError::Dispatch(format!(
            "{} exited with {}: {}",
            self.program,
            output.status,
            stderr.trim()
        )))
    }
}

/// Logs notifications instead of delivering them.
#[derive(Debug, Default)]
pub struct DryRunDispatcher;

impl Dispatcher for DryRunDispatcher {
    fn send(&self, notification: &Notification) -> NotifierResult<()> {
        tracing::info!(title = %notification.title, "[DRY RUN] would send notification");
        tracing::debug!(body = %notification.body, "[DRY RUN] notification body");
        Ok(())
    }
}
