//! Prints an Argon2 hash for `KEEVIQO_ADMIN_PASSWORD_HASH`.
//! Reads the password from the first argument, or from stdin when absent.

use std::io::BufRead;

use anyhow::Context;
use services::services::auth::hash_password;

fn main() -> anyhow::Result<()> {
    let password = match std::env::args().nth(1) {
        Some(password) => password,
        None => std::io::stdin()
            .lock()
            .lines()
            .next()
            .context("expected a password on stdin")??,
    };

    let password = password.trim_end_matches(['\r', '\n']);
    anyhow::ensure!(!password.is_empty(), "password must not be empty");

    println!("{}", hash_password(password)?);
    Ok(())
}
