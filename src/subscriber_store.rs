use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;

/// Flat-file JSON store of subscribers.
///
/// Every operation loads the whole file and mutations rewrite it entirely. Access goes
/// through a single lock so concurrent subscriptions cannot lose each other's writes.
pub struct SubscriberStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to access the subscribers file {path}.")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("The subscribers file {path} is not a valid subscriber list.")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum InsertError {
    #[error("{0} is already subscribed.")]
    AlreadySubscribed(SubscriberEmail),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> SubscriberStore {
        SubscriberStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty store file (and its parent directories) unless one already exists.
    #[tracing::instrument(name = "Initialise the subscribers store", skip(self), fields(path = %self.path.display()))]
    pub async fn init(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;

        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|err| self.io_error(err))?;

        if !exists {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|err| self.io_error(err))?;
            }
            self.write(&[]).await?;
            tracing::info!("Created an empty subscribers store");
        }

        Ok(())
    }

    #[tracing::instrument(name = "Load all subscribers", skip(self))]
    pub async fn all(&self) -> Result<Vec<Subscriber>, StoreError> {
        let _guard = self.lock.lock().await;

        self.read().await
    }

    #[tracing::instrument(name = "Count subscribers", skip(self))]
    pub async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.all().await?.len())
    }

    /// Appends a subscriber unless the (lowercased) email is already in the store.
    #[tracing::instrument(
        name = "Insert a new subscriber into the store",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email)
    )]
    pub async fn insert(&self, new_subscriber: NewSubscriber) -> Result<Subscriber, InsertError> {
        let _guard = self.lock.lock().await;

        let mut subscribers = self.read().await?;

        if subscribers
            .iter()
            .any(|subscriber| subscriber.email == new_subscriber.email)
        {
            return Err(InsertError::AlreadySubscribed(new_subscriber.email));
        }

        let subscriber = Subscriber::subscribe_now(new_subscriber);
        subscribers.push(subscriber.clone());
        self.write(&subscribers).await?;

        Ok(subscriber)
    }

    async fn read(&self) -> Result<Vec<Subscriber>, StoreError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|err| self.io_error(err))?;

        serde_json::from_slice(&data).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    // Writes next to the target first, so a crash mid-write never leaves a truncated store
    async fn write(&self, subscribers: &[Subscriber]) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(subscribers).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, data)
            .await
            .map_err(|err| self.io_error(err))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|err| self.io_error(err))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
