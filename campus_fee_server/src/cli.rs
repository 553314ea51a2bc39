use std::{env, env::VarError};

/// The server deliberately has a tiny CLI: run the server (no arguments), or run one of the explicit
/// deployment-time operations. Account provisioning is a command, not a startup side effect, so that starting
/// the server never mutates the user table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    ProvisionAdmin { reg_no: String, name: String },
    Help,
}

pub fn parse_command_line_args() -> Command {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => Command::Serve,
        Some("provision-admin") => match (args.get(1), args.get(2)) {
            (Some(reg_no), Some(name)) => Command::ProvisionAdmin { reg_no: reg_no.clone(), name: name.clone() },
            _ => {
                eprintln!("Usage: campus_fee_server provision-admin <reg_no> <name>");
                Command::Help
            },
        },
        Some(_) => Command::Help,
    }
}

pub fn display_help() {
    display_readme();
    display_envs();
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 10] = [
        "RUST_LOG",
        "CFS_HOST",
        "CFS_PORT",
        "CFS_DATABASE_URL",
        "CFS_RATE_LIMIT_ENABLED",
        "CFS_RATE_LIMIT_WINDOW_SECS",
        "CFS_RATE_LIMIT_MAX_REQUESTS",
        "CFS_RATE_LIMIT_MAX_CLIENTS",
        "CFS_GATEWAY_TIMEOUT_SECS",
        "RAZORPAY_KEY_ID",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
