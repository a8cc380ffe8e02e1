//! Operator confirmation for critical actions.

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use tracing::warn;

use crate::actions::CriticalPrompt;

/// Synchronously asks the operator to confirm a critical action.
///
/// Returns `None` when the operator declines, otherwise the reason exactly as
/// typed. Validation of the reason happens in the dispatcher.
pub trait BaseOperatorPrompt: Send + Sync {
    fn confirm_critical(&self, prompt: &CriticalPrompt) -> Option<String>;
}

/// Terminal prompt built on dialoguer.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseOperatorPrompt for TerminalPrompt {
    fn confirm_critical(&self, prompt: &CriticalPrompt) -> Option<String> {
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(prompt.message())
            .default(false)
            .interact();

        match confirmed {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                warn!(error = %e, "Confirmation prompt failed");
                return None;
            }
        }

        Input::<String>::with_theme(&self.theme)
            .with_prompt("Reason")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| warn!(error = %e, "Reason prompt failed"))
            .ok()
    }
}
