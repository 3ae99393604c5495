//! Account and session commands.
//!
//! # Usage
//!
//! ```bash
//! stockroom register -u alice -p secret1 --confirm secret1
//! STOCKROOM_PASSWORD=secret1 stockroom login -u alice
//! stockroom status
//! stockroom logout
//! ```

use std::io::Write;

use secrecy::SecretString;
use stockroom_client::InventoryClient;
use stockroom_core::{Credentials, Registration};

use super::CommandError;

fn secret(value: Option<String>) -> SecretString {
    SecretString::from(value.unwrap_or_default())
}

/// Create an account. The user still has to log in afterwards.
pub async fn register(
    client: &InventoryClient,
    out: &mut impl Write,
    username: &str,
    password: Option<String>,
    confirm: Option<String>,
) -> Result<(), CommandError> {
    let confirm = secret(confirm.or_else(|| password.clone()));
    let registration = Registration::new(username, secret(password), &confirm)?;

    let response = client.register(registration.credentials()).await?;

    let message = response.message.as_deref().unwrap_or("Account created");
    writeln!(out, "{message}")?;
    writeln!(
        out,
        "Run `stockroom login -u {}` to sign in.",
        registration.credentials().username()
    )?;
    Ok(())
}

/// Sign in and save the session. Does nothing when already signed in.
pub async fn login(
    client: &InventoryClient,
    out: &mut impl Write,
    username: &str,
    password: Option<String>,
) -> Result<(), CommandError> {
    if client.session().is_authenticated() {
        writeln!(
            out,
            "Already logged in. Run `stockroom logout` first to switch accounts."
        )?;
        return Ok(());
    }

    let credentials = Credentials::new(username, secret(password))?;
    client.sign_in(&credentials).await?;

    writeln!(out, "Logged in as {}.", credentials.username())?;
    Ok(())
}

/// Forget the saved session.
pub fn logout(client: &InventoryClient, out: &mut impl Write) -> Result<(), CommandError> {
    let was_authenticated = client.session().is_authenticated();
    client.sign_out()?;

    if was_authenticated {
        writeln!(out, "Logged out.")?;
    } else {
        writeln!(out, "Not logged in.")?;
    }
    Ok(())
}

/// Report whether a session token is saved.
///
/// The token is not checked against the service.
pub fn status(client: &InventoryClient, out: &mut impl Write) -> Result<(), CommandError> {
    let state = if client.session().is_authenticated() {
        "Logged in"
    } else {
        "Not logged in"
    };

    writeln!(out, "{state}")?;
    writeln!(out, "Service: {}", client.http().base_url())?;
    Ok(())
}
