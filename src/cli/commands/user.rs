//! User management command handlers

use crate::config::Config;
use crate::db::Store;
use crate::state::build_token_codec;

pub async fn cmd_add_user(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_username(username).await?.is_some() {
        println!("User '{}' already exists.", username);
        return Ok(());
    }

    let user = store
        .create_user(username, Some(password), &config.security)
        .await?;

    println!("Created user '{}' (id {})", user.username, user.id);
    Ok(())
}

pub async fn cmd_token(config: &Config, username: &str) -> anyhow::Result<()> {
    if config.security.secret_key.is_none() {
        anyhow::bail!(
            "security.secret_key is not set; a token signed with a throwaway secret would be rejected by the server"
        );
    }

    let store = Store::new(&config.general.database_path).await?;
    let Some(user) = store.get_user_by_username(username).await? else {
        anyhow::bail!("User not found: {username}");
    };

    let token = build_token_codec(config).issue(user.id)?;
    println!("{token}");
    Ok(())
}
