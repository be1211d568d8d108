//! JavaScript evaluation and execution.
//!
//! Both entry points bracket the command with console-log refreshes: once
//! before the script runs so the cursor is current, once after with the
//! error check armed, so a script that throws surfaces as
//! [`Error::JavaScript`](crate::Error::JavaScript) on the very next check.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::debug;

use crate::error::Result;

use super::Browser;

// ============================================================================
// Browser - Script Execution
// ============================================================================

impl Browser {
    /// Evaluates a JavaScript expression and returns its value.
    ///
    /// The server replies with the bare JSON rendering of the result. It is
    /// decoded wrapped as a one-element array, which tolerates payloads that
    /// are not valid standalone JSON documents; anything that still fails to
    /// parse (e.g. `undefined`) decodes to [`Value::Null`].
    pub async fn evaluate_script(&mut self, script: &str) -> Result<Value> {
        debug!(script_len = script.len(), "Evaluating script");

        self.update_console_log(false).await?;
        let payload = self.execute_text("Evaluate", &[script]).await?;
        self.update_console_log(true).await?;

        let wrapped = format!("[{payload}]");
        let Ok(values) = serde_json::from_str::<Vec<Value>>(&wrapped) else {
            return Ok(Value::Null);
        };
        Ok(values.into_iter().next().unwrap_or(Value::Null))
    }

    /// Executes a JavaScript statement and returns the raw payload.
    ///
    /// Unlike [`evaluate_script`](Browser::evaluate_script), no JSON decoding
    /// is applied.
    pub async fn execute_script(&mut self, script: &str) -> Result<String> {
        debug!(script_len = script.len(), "Executing script");

        self.update_console_log(false).await?;
        let payload = self.execute_text("Execute", &[script]).await?;
        self.update_console_log(true).await?;

        Ok(payload)
    }
}
