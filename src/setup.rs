//! Setup verification
//!
//! Checks that a checkout is ready to talk to a local SGLang server: the
//! `.env` file, the resolved environment, and server reachability.

use crate::client::ChatService;
use crate::models::Config;
use std::fmt;
use std::fs;
use std::path::Path;

/// Value shipped in `.env.example` that must be replaced.
pub const HF_TOKEN_PLACEHOLDER: &str = "your_huggingface_token_here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Reported but does not fail the run.
    Warn,
    Fail,
}

impl CheckStatus {
    fn icon(self) -> &'static str {
        match self {
            CheckStatus::Pass => "✅",
            CheckStatus::Warn => "⚠️ ",
            CheckStatus::Fail => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub name: &'static str,
    pub status: CheckStatus,
    pub lines: Vec<String>,
}

impl CheckReport {
    fn new(name: &'static str, status: CheckStatus, summary: impl Into<String>) -> Self {
        Self {
            name,
            status,
            lines: vec![summary.into()],
        }
    }

    fn hint(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.status != CheckStatus::Fail
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = self.lines.iter();
        if let Some(first) = lines.next() {
            write!(f, "{} {}", self.status.icon(), first)?;
        }
        for line in lines {
            write!(f, "\n   {}", line)?;
        }
        Ok(())
    }
}

pub fn is_real_token(token: Option<&str>) -> bool {
    matches!(token, Some(t) if !t.trim().is_empty() && t != HF_TOKEN_PLACEHOLDER)
}

/// Verifies `.env.example` and `.env` in `dir`.
///
/// A missing or incomplete `.env` is acceptable when `global_token` holds a
/// real HuggingFace token.
pub fn check_env_file(dir: &Path, global_token: Option<&str>) -> CheckReport {
    const NAME: &str = "environment file";

    if !dir.join(".env.example").exists() {
        return CheckReport::new(NAME, CheckStatus::Fail, ".env.example file not found!");
    }

    let env_path = dir.join(".env");
    if !env_path.exists() {
        if is_real_token(global_token) {
            return CheckReport::new(
                NAME,
                CheckStatus::Pass,
                ".env file not found, but HF_TOKEN is available globally",
            );
        }
        return CheckReport::new(
            NAME,
            CheckStatus::Fail,
            ".env file not found. Please run: cp .env.example .env",
        )
        .hint("Then edit .env with your actual HuggingFace token.")
        .hint("Alternatively, set HF_TOKEN as a global environment variable.");
    }

    let content = match fs::read_to_string(&env_path) {
        Ok(content) => content,
        Err(e) => {
            return CheckReport::new(NAME, CheckStatus::Fail, format!("Error reading .env file: {}", e))
        }
    };

    let has_placeholder = content
        .lines()
        .any(|line| line.trim() == format!("HF_TOKEN={}", HF_TOKEN_PLACEHOLDER));
    let has_token_line = content
        .lines()
        .any(|line| line.trim_start().starts_with("HF_TOKEN="));

    match (has_placeholder, has_token_line) {
        (true, _) if is_real_token(global_token) => CheckReport::new(
            NAME,
            CheckStatus::Pass,
            ".env has placeholder value, but HF_TOKEN is available globally",
        ),
        (true, _) => CheckReport::new(NAME, CheckStatus::Fail, "HF_TOKEN still has placeholder value.")
            .hint("Please edit .env and set your actual HuggingFace token.")
            .hint("Alternatively, set HF_TOKEN as a global environment variable."),
        (false, false) if is_real_token(global_token) => CheckReport::new(
            NAME,
            CheckStatus::Pass,
            ".env missing HF_TOKEN, but it's available globally",
        ),
        (false, false) => CheckReport::new(NAME, CheckStatus::Fail, "HF_TOKEN not found in .env file.")
            .hint("Alternatively, set HF_TOKEN as a global environment variable."),
        (false, true) => CheckReport::new(NAME, CheckStatus::Pass, "Environment file configured"),
    }
}

/// Reports the resolved endpoint and whether `HF_TOKEN` is usable.
pub fn check_environment(config: &Config, hf_token: Option<&str>) -> CheckReport {
    const NAME: &str = "environment variables";

    let (status, summary) = if is_real_token(hf_token) {
        (CheckStatus::Pass, "HF_TOKEN is configured")
    } else {
        (CheckStatus::Fail, "HF_TOKEN not configured or using placeholder")
    };

    CheckReport::new(NAME, status, summary)
        .hint(format!("SGLANG_HOST: {}", config.endpoint.host))
        .hint(format!("SGLANG_PORT: {}", config.endpoint.port))
        .hint(format!("Model: {}", config.model))
}

/// Probes the server's health endpoint. An unreachable server only warns,
/// since the container may still be starting.
pub async fn check_server(service: &dyn ChatService, config: &Config) -> CheckReport {
    const NAME: &str = "server";

    if service.health_check().await {
        CheckReport::new(
            NAME,
            CheckStatus::Pass,
            format!("Server at {} is healthy", config.endpoint),
        )
    } else {
        CheckReport::new(
            NAME,
            CheckStatus::Warn,
            format!("Server at {} is not responding", config.endpoint),
        )
        .hint("Start it with: docker compose up -d")
    }
}

pub fn all_passed(reports: &[CheckReport]) -> bool {
    reports.iter().all(CheckReport::passed)
}
