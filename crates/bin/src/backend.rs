//! Data directory loading and saving.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use topfive::{Clock, SystemClock, backend::InMemory, user::UserDirectory};

use crate::cli::DataArgs;

const LISTS_FILE: &str = "lists.json";
const USERS_FILE: &str = "users.json";

/// The server's persistent state, held in memory while running.
pub struct Data {
    pub dir: PathBuf,
    pub lists: Arc<InMemory>,
    pub users: Arc<UserDirectory>,
}

pub fn data_dir(args: &DataArgs) -> PathBuf {
    args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Load only the list table, e.g. for read-only commands.
pub async fn load_lists(args: &DataArgs) -> Result<InMemory, Box<dyn std::error::Error>> {
    let path = data_dir(args).join(LISTS_FILE);
    tracing::debug!("Loading lists from {}", path.display());
    Ok(InMemory::load_from_file(&path).await?)
}

/// Load lists and accounts. Missing files start empty.
pub async fn load(args: &DataArgs) -> Result<Data, Box<dyn std::error::Error>> {
    let dir = data_dir(args);
    tokio::fs::create_dir_all(&dir).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let lists = InMemory::load_from_file(dir.join(LISTS_FILE)).await?;
    let users = UserDirectory::load_from_file(dir.join(USERS_FILE), clock).await?;
    tracing::info!(
        lists = lists.len().await,
        users = users.len().await,
        "Loaded data from {}",
        dir.display()
    );

    Ok(Data {
        dir,
        lists: Arc::new(lists),
        users: Arc::new(users),
    })
}

/// Write both data files.
pub async fn save(data: &Data) -> Result<(), Box<dyn std::error::Error>> {
    save_file(&data.dir.join(LISTS_FILE), data.lists.save_to_file(data.dir.join(LISTS_FILE)).await)?;
    save_file(&data.dir.join(USERS_FILE), data.users.save_to_file(data.dir.join(USERS_FILE)).await)?;
    Ok(())
}

fn save_file(path: &Path, result: topfive::Result<()>) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        Ok(()) => {
            tracing::info!("Saved {}", path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to save {}: {e}", path.display());
            Err(e.into())
        }
    }
}
