//! Doctor command - verify credential, configuration and API reachability.

use crate::api::types::ListIndexesQuery;
use crate::api::{ApiClient, ApiConfig};
use crate::cli::output::mask_secret;
use crate::cli::Output;
use crate::config::{Settings, API_KEY_ENV};
use crate::error::BridgeError;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("vidbridge doctor");
    println!();

    let mut checks = Vec::new();

    Output::section("Configuration");
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    let url_check = check_base_url(settings);
    url_check.print();
    checks.push(url_check);

    println!();

    Output::section("Credential");
    let key_check = check_api_key(std::env::var(API_KEY_ENV).ok().as_deref());
    key_check.print();
    let have_key = key_check.status == CheckStatus::Ok;
    checks.push(key_check);

    println!();

    Output::section("Upstream API");
    let api_check = if have_key {
        check_reachability(settings).await
    } else {
        CheckResult::warning(
            "Reachability",
            "skipped",
            &format!("Set {} to test the connection", API_KEY_ENV),
        )
    };
    api_check.print();
    checks.push(api_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before starting the server.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! vidbridge is ready to serve.");
    }

    Ok(())
}

/// Check if the config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create {} to override settings", config_path.display()),
        )
    }
}

/// Check that the base URL can be used for requests.
fn check_base_url(settings: &Settings) -> CheckResult {
    match ApiConfig::new(&settings.api.base_url, "") {
        Ok(config) => CheckResult::ok("Base URL", config.base_url().as_str()),
        Err(e) => CheckResult::error(
            "Base URL",
            &e.to_string(),
            "Set api.base_url to the versioned REST root, e.g. https://api.twelvelabs.io/v1.3",
        ),
    }
}

/// Check if the API key is configured.
fn check_api_key(value: Option<&str>) -> CheckResult {
    match value {
        Some(key) if !key.trim().is_empty() => {
            CheckResult::ok(API_KEY_ENV, &format!("configured ({})", mask_secret(key)))
        }
        Some(_) => CheckResult::error(
            API_KEY_ENV,
            "empty",
            &format!("Set with: export {}='<your api key>'", API_KEY_ENV),
        ),
        None => CheckResult::error(
            API_KEY_ENV,
            "not set",
            &format!("Set with: export {}='<your api key>'", API_KEY_ENV),
        ),
    }
}

/// Issue one cheap authenticated request.
async fn check_reachability(settings: &Settings) -> CheckResult {
    let client = match ApiConfig::from_settings(settings).and_then(ApiClient::new) {
        Ok(client) => client,
        Err(e) => return CheckResult::error("Reachability", &e.to_string(), "Fix the errors above"),
    };

    let query = ListIndexesQuery {
        page_limit: Some(1),
        ..Default::default()
    };
    match client.list_indexes(&query).await {
        Ok(page) => CheckResult::ok(
            "Reachability",
            &format!(
                "authenticated ({} index(es) in account)",
                page.page_info
                    .total_results
                    .unwrap_or(page.data.len() as u64)
            ),
        ),
        Err(BridgeError::Upstream { status: 401, .. }) | Err(BridgeError::Upstream { status: 403, .. }) => {
            CheckResult::error(
                "Reachability",
                "API key rejected",
                &format!("Check the value of {}", API_KEY_ENV),
            )
        }
        Err(e) => CheckResult::error(
            "Reachability",
            &e.to_string(),
            "Check network access and api.base_url",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_api_key() {
        assert_eq!(check_api_key(None).status, CheckStatus::Error);
        assert_eq!(check_api_key(Some("  ")).status, CheckStatus::Error);
        let ok = check_api_key(Some("tlk_0123456789abcdef"));
        assert_eq!(ok.status, CheckStatus::Ok);
        assert!(!ok.message.contains("0123456789"));
    }

    #[test]
    fn test_check_base_url() {
        let mut settings = Settings::default();
        assert_eq!(check_base_url(&settings).status, CheckStatus::Ok);

        settings.api.base_url = "::nope::".to_string();
        assert_eq!(check_base_url(&settings).status, CheckStatus::Error);
    }

    #[test]
    fn test_missing_config_file_is_a_warning() {
        let result = check_config_file(Path::new("/definitely/not/here.toml"));
        assert_eq!(result.status, CheckStatus::Warning);
    }
}
