use crate::domain::document::{Subscription, SubscriptionDump};
use crate::domain::error::{DocumentError, read_json};
use crate::domain::ports::SubscriptionSource;
use std::path::{Path, PathBuf};

/// Subscription dump file (`{"Subscriptions": [...]}`).
pub struct FsSubscriptionSource {
    pub path: PathBuf,
}

impl FsSubscriptionSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SubscriptionSource for FsSubscriptionSource {
    fn subscriptions(&self) -> Result<Vec<Subscription>, DocumentError> {
        let dump: SubscriptionDump = read_json(&self.path)?;
        Ok(dump.subscriptions)
    }
}
