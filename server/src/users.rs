use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use scribble_system::serde_json;
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginOutcome {
    /// First login under this name; the account was created.
    Created,
    Verified,
    Rejected,
}

/// Durable credential collection: username to bcrypt hash, persisted the same
/// way as the path store. Accounts are created implicitly on first login.
pub struct UserStore {
    file: PathBuf,
    users: HashMap<String, String>,
}

impl UserStore {
    pub async fn load(file: impl Into<PathBuf>) -> io::Result<Self> {
        let file = file.into();
        let users = match fs::read(&file).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err),
        };
        log::info!("user store ready: {} accounts from {:?}", users.len(), file);
        Ok(Self { file, users })
    }

    pub async fn login(&mut self, username: &str, password: &str) -> io::Result<LoginOutcome> {
        match self.users.get(username) {
            Some(hash) => {
                let verified = bcrypt::verify(password, hash)
                    .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
                if verified {
                    Ok(LoginOutcome::Verified)
                } else {
                    Ok(LoginOutcome::Rejected)
                }
            }
            None => {
                let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
                    .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
                self.users.insert(username.to_string(), hash);
                self.persist().await?;
                Ok(LoginOutcome::Created)
            }
        }
    }

    async fn persist(&self) -> io::Result<()> {
        let bytes = serde_json::to_vec(&self.users)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.file, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribble_system::uuid::Uuid;

    fn temp_file() -> PathBuf {
        std::env::temp_dir().join(format!("{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn it_creates_then_verifies_then_rejects() {
        let mut store = UserStore::load(temp_file()).await.unwrap();

        assert_eq!(store.login("alice", "hunter2").await.unwrap(), LoginOutcome::Created);
        assert_eq!(store.login("alice", "hunter2").await.unwrap(), LoginOutcome::Verified);
        assert_eq!(store.login("alice", "wrong").await.unwrap(), LoginOutcome::Rejected);
    }

    #[tokio::test]
    async fn it_keeps_accounts_across_reloads() {
        let file = temp_file();
        let mut store = UserStore::load(file.clone()).await.unwrap();
        store.login("alice", "hunter2").await.unwrap();

        let mut reloaded = UserStore::load(file).await.unwrap();
        assert_eq!(reloaded.login("alice", "hunter2").await.unwrap(), LoginOutcome::Verified);
    }
}
