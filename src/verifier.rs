//! Connection verification

use crate::connector::Session;
use crate::report::{self, Reporter};
use crate::{Error, Result};
use bson::{doc, Document};

/// Administrative command used to confirm a round trip
pub fn status_command() -> Document {
    doc! { "connectionStatus": 1 }
}

/// Result of a verification on an open connection
#[derive(Debug)]
pub enum VerifyOutcome {
    /// Status command succeeded
    Succeeded(Document),
    /// Status command failed; the connection was still released
    CommandFailed(Error),
}

impl VerifyOutcome {
    /// Whether the test succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Run the status command on `session`, report the result, and close it.
///
/// Command failures are reported and returned as
/// [`VerifyOutcome::CommandFailed`]; they are not propagated. The session
/// is closed on every path; only a failure to close is returned as `Err`.
/// When both the command and the close fail, the close error is returned
/// and the command error stays visible in the reporter output and in a
/// `warn` event.
pub async fn verify<S: Session>(session: S, reporter: &dyn Reporter) -> Result<VerifyOutcome> {
    reporter.line(report::CONNECTED);
    reporter.line(report::TESTING_COMMANDS);

    let outcome = match session.run_command(status_command()).await {
        Ok(reply) => {
            tracing::info!("status command succeeded");
            reporter.line(report::SUCCEEDED);
            VerifyOutcome::Succeeded(reply)
        }
        Err(e) => {
            tracing::warn!(error = %e, "status command failed");
            reporter.error(report::ERROR_LABEL, &e);
            VerifyOutcome::CommandFailed(e)
        }
    };

    if let Err(close_error) = session.close().await {
        if let VerifyOutcome::CommandFailed(ref command_error) = outcome {
            tracing::warn!(
                command_error = %command_error,
                close_error = %close_error,
                "closing failed after status command failure"
            );
        }
        return Err(close_error);
    }
    Ok(outcome)
}
