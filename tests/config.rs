use clap::Parser;
use hazard::config::{Args, Config};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn config_file(text: &str) -> Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new()?;
    tmp.write_all(text.as_bytes())?;
    tmp.flush()?;
    Ok(tmp)
}

#[test]
fn file_values_override_defaults() -> Result<()> {
    let file = config_file(
        "{\n  // panel on the hall tablet\n  server: 'http://hazard.lan:8080/',\n  timeout_secs: 4,\n}\n",
    )?;
    let path = file.path().to_str().ok_or("utf8 path")?;
    let args = Args::try_parse_from(["hazard", "--config", path])?;
    let config = Config::from_args(&args)?;
    assert_eq!(
        config,
        Config {
            server: "http://hazard.lan:8080".into(),
            timeout_secs: 4,
        }
    );
    Ok(())
}

#[test]
fn flags_override_file() -> Result<()> {
    let file = config_file(r#"{ "server": "http://from-file:8080", "timeout_secs": 4 }"#)?;
    let path = file.path().to_str().ok_or("utf8 path")?;
    let args = Args::try_parse_from([
        "hazard",
        "--config",
        path,
        "--server",
        "https://from-flag",
    ])?;
    let config = Config::from_args(&args)?;
    assert_eq!(config.server, "https://from-flag");
    assert_eq!(config.timeout_secs, 4);
    Ok(())
}

#[test]
fn unknown_file_keys_are_rejected() -> Result<()> {
    let file = config_file(r#"{ "sever": "http://typo:8080" }"#)?;
    let path = file.path().to_str().ok_or("utf8 path")?;
    let args = Args::try_parse_from(["hazard", "--config", path])?;
    let err = Config::from_args(&args).expect_err("typo should be rejected");
    assert!(err.to_string().starts_with("config error:"), "{err}");
    Ok(())
}

#[test]
fn zero_timeout_is_rejected() -> Result<()> {
    let args = Args::try_parse_from(["hazard", "--timeout-secs", "0"])?;
    assert!(Config::from_args(&args).is_err());
    Ok(())
}
