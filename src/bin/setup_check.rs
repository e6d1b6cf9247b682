//! Verifies that the local environment is ready to run the client against an
//! SGLang server.

use anyhow::Result;
use sglang_mistral::client::SglangClient;
use sglang_mistral::models::Config;
use sglang_mistral::setup::{
    all_passed, check_env_file, check_environment, check_server, CheckReport,
};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    println!("🚀 SGLang Mistral Setup Verification");
    println!("{}", "=".repeat(40));

    // Read before `.env` is loaded so the file check sees only the global value.
    let global_token = std::env::var("HF_TOKEN").ok();
    let mut reports = vec![check_env_file(Path::new("."), global_token.as_deref())];

    let config = Config::from_env()?;
    let hf_token = std::env::var("HF_TOKEN").ok();
    reports.push(check_environment(&config, hf_token.as_deref()));

    let client = SglangClient::new(&config)?;
    reports.push(check_server(&client, &config).await);

    for report in &reports {
        print_report(report);
    }

    println!("\n{}", "=".repeat(40));
    if all_passed(&reports) {
        println!("🎉 All checks passed! You're ready to go.");
        Ok(())
    } else {
        println!("❌ Some checks failed. Please fix the issues above.");
        std::process::exit(1);
    }
}

fn print_report(report: &CheckReport) {
    println!("\n🔍 Checking {}...", report.name);
    println!("{}", report);
}
