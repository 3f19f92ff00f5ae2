//! Auth command handlers.

use anyhow::Result;

use omnify_core::client::ApiClient;
use omnify_core::session::SessionManager;

pub async fn signup(
    client: &ApiClient,
    session: &mut SessionManager,
    name: &str,
    email: &str,
    password: &str,
) -> Result<()> {
    let adopted = session.signup(client, name, email, password).await?;
    println!("Welcome, {}! You are now logged in.", adopted.user.name);
    Ok(())
}

pub async fn login(
    client: &ApiClient,
    session: &mut SessionManager,
    email: &str,
    password: &str,
) -> Result<()> {
    let adopted = session.login(client, email, password).await?;
    println!("Logged in as {} <{}>", adopted.user.name, adopted.user.email);
    Ok(())
}

pub fn logout(session: &mut SessionManager) {
    session.logout();
    println!("Logged out.");
}

pub fn whoami(session: &SessionManager) {
    match session.current() {
        Some(current) => {
            println!("{} <{}>", current.user.name, current.user.email);
        }
        None => println!("Not logged in."),
    }
}
