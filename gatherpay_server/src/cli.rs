use std::{env, env::VarError};

/// The server is configured through the environment only. Any argument at all prints the help text along with the
/// current configuration, and tells the caller not to start the server.
pub fn handle_command_line_args() -> bool {
    let wants_help = env::args().count() > 1;
    if wants_help {
        println!("\n{}\n", include_str!("./cli-help.txt"));
        print_environment();
    }
    wants_help
}

// Secrets are listed separately, and only ever reported as set or unset
const PUBLIC_ENVS: [&str; 12] = [
    "RUST_LOG",
    "GP_HOST",
    "GP_PORT",
    "GP_DATABASE_URL",
    "GP_EVENT_UTC_OFFSET",
    "GP_CURRENCY",
    "GP_CORS_ORIGIN",
    "GP_USE_X_FORWARDED_FOR",
    "GP_USE_FORWARDED",
    "GP_RAZORPAY_API_URL",
    "GP_RAZORPAY_KEY_ID",
    "GP_RAZORPAY_TIMEOUT_SECS",
];
const SECRET_ENVS: [&str; 1] = ["GP_RAZORPAY_KEY_SECRET"];

fn print_environment() {
    println!("Current environment values:");
    for name in PUBLIC_ENVS {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    }
    for name in SECRET_ENVS {
        let state = match env::var(name) {
            Ok(s) if !s.is_empty() => "Set (hidden)",
            _ => "Not set",
        };
        println!("  {name:<35} {state:<15}");
    }
}
