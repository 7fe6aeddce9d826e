//! Setup helpers: password hashing and configuration checks.

use std::io::BufRead;

/// Hashes `password`, or the first line of stdin when `None`, and prints the
/// PHC string to paste into the credentials file.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, the password is empty, or
/// hashing fails.
pub(crate) fn run_hash_password(password: Option<String>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let hash = orderdesk_core::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
    println!("{hash}");
    Ok(())
}

/// Loads the environment configuration and the credentials file, printing
/// a redacted summary of both.
///
/// # Errors
///
/// Returns the first configuration or credentials error encountered.
pub(crate) fn run_check_config() -> anyhow::Result<()> {
    let config = orderdesk_core::load_app_config()?;
    println!("{config:#?}");

    let credentials = orderdesk_core::load_credentials(&config.credentials_path)?;
    println!(
        "credentials: {} user(s), {} preauthorized email(s), cookie {:?} expires after {} day(s)",
        credentials.user_count(),
        credentials.preauthorized.emails.len(),
        credentials.cookie.name,
        credentials.cookie.expiry_days,
    );
    Ok(())
}
