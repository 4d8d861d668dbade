//! Fetch a device's running configuration and save it to a file.
//!
//! Long configs trigger the device's pager; the executor answers each
//! pagination prompt automatically, so the saved file holds the whole
//! config.
//!
//! # Usage
//!
//! With password authentication:
//! ```bash
//! cargo run --example show_running_config -- --host 10.0.0.1 --user admin --password cisco
//! ```
//!
//! With SSH key authentication:
//! ```bash
//! cargo run --example show_running_config -- --host 10.0.0.1 --user admin --key ~/.ssh/id_rsa
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use depage::{DeviceProfile, Executor, SshConfig, SshTransport};

const OUTPUT_FILE: &str = "running_config.txt";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = SshConfig::new(&args.host, &args.user)
        .port(args.port)
        .timeout(Duration::from_secs(30));

    if let Some(password) = &args.password {
        config = config.password(password);
    } else if let Some(key_path) = &args.key {
        config = config.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    println!("Connecting to {}:{}...", args.host, args.port);
    let transport = SshTransport::connect(config).await?;
    let shell = transport.open_shell().await?;

    println!("Running 'show running-config' with paging handler...");
    let profile =
        DeviceProfile::builtin(&args.profile).ok_or_else(|| format!("unknown profile: {}", args.profile))?;

    // Allow 2 minutes for large configs
    let executor = Executor::from_profile(&profile)?.with_timeout(Duration::from_secs(120));
    let output = executor.execute(shell, "show running-config").await?;

    std::fs::write(OUTPUT_FILE, &output)?;
    println!("Output saved to {OUTPUT_FILE}");
    println!("Output length: {} characters", output.len());

    transport.close().await?;
    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    profile: String,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut port = 22u16;
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut profile = "generic".to_string();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--port" | "-p" => {
                    i += 1;
                    if i < args.len() {
                        port = args[i].parse().unwrap_or(22);
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--profile" => {
                    i += 1;
                    if i < args.len() {
                        profile = args[i].clone();
                    }
                }
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            host,
            port,
            user,
            password,
            key,
            profile,
        }
    }

    fn print_help() {
        println!(
            r#"depage show_running_config example

USAGE:
    cargo run --example show_running_config -- [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Target device [default: localhost]
    -p, --port <PORT>        SSH port [default: 22]
    -u, --user <USER>        Username [default: $USER]
    -P, --password <PASS>    Password for authentication
    -k, --key <PATH>         Path to SSH private key
    --profile <NAME>         Device profile [default: generic]
    --help                   Print this help message
"#
        );
    }
}
