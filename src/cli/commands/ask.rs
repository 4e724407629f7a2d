//! Ask command implementation.

use crate::cli::Output;
use crate::completion::CompletionClient;
use crate::config::Settings;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(prompt: &str, model: Option<String>, mut settings: Settings) -> Result<()> {
    if let Some(model) = model {
        settings.openai.model = model;
    }

    let client = match CompletionClient::from_settings(&settings.openai) {
        Ok(client) => client,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    // Traffic dumps share stderr with the spinner.
    let spinner = (!settings.logging.log_http)
        .then(|| Output::spinner(&format!("Asking {}...", client.model())));

    let result = client.complete(prompt).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(message) => {
            println!("{}", message.content.unwrap_or_default());
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Completion failed: {}", e));
            if !settings.logging.log_http {
                Output::info("Re-run with --log-http to see the raw exchange.");
            }
            Err(e.into())
        }
    }
}
