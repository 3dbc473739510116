use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use inquire::{Password, PasswordDisplayMode, Text};
use weather_compare_core::{
    ComparisonQuery, Config, Credential, JellyFaasClient, Progress, compare_cities,
};

use crate::{display, spinner::Spinner};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-compare",
    version,
    about = "Compare the weather of two cities with an AI summary"
)]
pub struct Cli {
    /// Without a subcommand, prompts for two cities and compares them.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the JellyFaaS API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            None => compare().await,
        }
    }
}

fn configure() -> Result<()> {
    let path = Config::config_file_path()?;
    // Env overrides are not applied here so they never end up on disk.
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("JellyFaaS API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let Some(credential) = Credential::new(api_key) else {
        bail!("API key must not be empty.");
    };

    config.set_api_key(credential.expose().to_string());
    config.save_to(&path)?;

    eprintln!("Saved API key to {}", path.display());
    Ok(())
}

async fn compare() -> Result<()> {
    let config = Config::load()?;
    let credential = config.credential()?;
    tracing::debug!(
        auth_url = %config.endpoints.auth_url,
        query_url = %config.endpoints.query_url,
        "configuration loaded"
    );

    eprintln!("{}", "=== Weather Comparison Tool ===".blue().bold());

    let (city_a, city_b) = if io::stdin().is_terminal() {
        let city_a = Text::new("Enter the first city name:")
            .prompt()
            .context("Failed to read the first city name")?;
        let city_b = Text::new("Enter the second city name:")
            .prompt()
            .context("Failed to read the second city name")?;
        (city_a, city_b)
    } else {
        read_piped_cities(&mut io::stdin().lock())?
    };

    let mut spinner = Spinner::stderr();
    let mut stdout = io::stdout().lock();
    compare_and_render(
        &config,
        &credential,
        &city_a,
        &city_b,
        &mut spinner,
        &mut stdout,
    )
    .await
}

/// Reads one city per line, e.g. `printf 'Paris\nTokyo\n' | weather-compare`.
/// A missing line yields an empty name, which validation then rejects.
fn read_piped_cities(input: &mut dyn BufRead) -> Result<(String, String)> {
    let mut next_line = |which: &str| -> Result<String> {
        let mut line = String::new();
        input
            .read_line(&mut line)
            .with_context(|| format!("Failed to read the {which} city name"))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    };

    let city_a = next_line("first")?;
    let city_b = next_line("second")?;
    Ok((city_a, city_b))
}

/// Validate the cities, run the flow and write the result to `out`.
pub async fn compare_and_render(
    config: &Config,
    credential: &Credential,
    city_a: &str,
    city_b: &str,
    progress: &mut dyn Progress,
    out: &mut dyn Write,
) -> Result<()> {
    let query = ComparisonQuery::new(city_a, city_b)?;
    let client = JellyFaasClient::new(config.endpoints.clone());

    let result = compare_cities(&client, &client, credential, &query, progress).await?;

    display::render(&result, out).context("Failed to write comparison to the terminal")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weather_compare_core::{Endpoints, Error, NoProgress};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    const AUTH_PATH: &str = "/auth-service/v1/validate";
    const QUERY_PATH: &str = "/query-service/v1/function";

    fn config_for(server: &MockServer) -> Config {
        Config {
            api_key: Some("KEY".into()),
            endpoints: Endpoints {
                auth_url: format!("{}{AUTH_PATH}", server.uri()),
                query_url: format!("{}{QUERY_PATH}", server.uri()),
                ..Endpoints::default()
            },
        }
    }

    async fn mount_auth(server: &MockServer, status: u16) {
        Mock::given(method("GET"))
            .and(path(AUTH_PATH))
            .and(header("x-jf-apikey", "KEY"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"token": "T123"})))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn run(config: &Config, city_a: &str, city_b: &str) -> (Result<()>, String) {
        let credential = config.credential().unwrap();
        let mut out = Vec::new();
        let res =
            compare_and_render(config, &credential, city_a, city_b, &mut NoProgress, &mut out)
                .await;
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn no_arguments_means_compare() {
        let cli = Cli::try_parse_from(["weather-compare"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn configure_subcommand_parses() {
        let cli = Cli::try_parse_from(["weather-compare", "configure"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Configure)));
    }

    #[test]
    fn unknown_arguments_are_refused() {
        assert!(Cli::try_parse_from(["weather-compare", "Paris", "Tokyo"]).is_err());
    }

    #[test]
    fn piped_input_gives_one_city_per_line() {
        let mut input = io::Cursor::new("Paris\r\nTokyo\nignored\n");
        let (a, b) = read_piped_cities(&mut input).unwrap();
        assert_eq!((a.as_str(), b.as_str()), ("Paris", "Tokyo"));
    }

    #[test]
    fn short_piped_input_yields_empty_second_city() {
        let mut input = io::Cursor::new("Paris\n");
        let (a, b) = read_piped_cities(&mut input).unwrap();
        assert_eq!(a, "Paris");
        assert!(b.is_empty());
        assert!(ComparisonQuery::new(&a, &b).is_err());
    }

    #[tokio::test]
    async fn displays_the_answer_verbatim() {
        let server = MockServer::start().await;
        mount_auth(&server, 200).await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .and(header("jfwt", "T123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"answer": "| City | Mon |\n|---|---|\n| Paris | 12 |"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (res, out) = run(&config_for(&server), "Paris", "Tokyo").await;

        res.unwrap();
        assert_eq!(out, "| City | Mon |\n|---|---|\n| Paris | 12 |\n");
    }

    #[tokio::test]
    async fn missing_answer_is_not_an_error() {
        let server = MockServer::start().await;
        mount_auth(&server, 200).await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let (res, out) = run(&config_for(&server), "Paris", "Tokyo").await;

        res.unwrap();
        assert!(out.contains(display::NO_DATA_NOTICE));
    }

    #[tokio::test]
    async fn empty_city_makes_no_network_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (res, out) = run(&config_for(&server), "", "Tokyo").await;

        let err = res.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::Validation(_))
        ));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn auth_rejection_stops_before_comparison() {
        let server = MockServer::start().await;
        mount_auth(&server, 401).await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (res, out) = run(&config_for(&server), "Paris", "Tokyo").await;

        let msg = format!("{:#}", res.unwrap_err());
        assert!(msg.contains("authentication rejected"), "{msg}");
        assert!(msg.contains("401"), "{msg}");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn comparison_server_error_reports_status() {
        let server = MockServer::start().await;
        mount_auth(&server, 200).await;
        Mock::given(method("POST"))
            .and(path(QUERY_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let (res, out) = run(&config_for(&server), "Paris", "Tokyo").await;

        let msg = format!("{:#}", res.unwrap_err());
        assert!(msg.contains("500"), "{msg}");
        assert!(out.is_empty());
    }
}
