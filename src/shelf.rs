//! Turns a configured shelf into a provider plus a root crumb.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use satchel_browser::{Crumb, FolderBrowser, OpenerHandle};
use satchel_config::{Config, ProviderKind, ShelfConfig};
use satchel_provider::ProviderHandle;
use satchel_provider::provider::LocalProvider;
use std::sync::Arc;

pub struct Shelf {
    pub provider: ProviderHandle,
    pub root: Crumb,
}

impl Shelf {
    pub fn open(config: &Config, name: Option<&str>) -> Result<Self> {
        let (key, shelf) = config.shelf(name).or_raise(|| ErrorKind::Config)?;
        let display_name = shelf.display_name(key).to_string();
        tracing::debug!(shelf = key, provider = ?shelf.provider, root = %shelf.root, "Opening shelf");
        match shelf.provider {
            ProviderKind::Local => {
                let provider = LocalProvider::new(key, &shelf.root).or_raise(|| ErrorKind::Shelf(key.to_string()))?;
                let root = Crumb::new(provider.root_id(), display_name);
                Ok(Self {
                    provider: Arc::new(provider),
                    root,
                })
            },
            ProviderKind::Drive => Self::drive(config, key, shelf, display_name),
        }
    }

    #[cfg(feature = "drive")]
    fn drive(config: &Config, key: &str, shelf: &ShelfConfig, display_name: String) -> Result<Self> {
        use satchel_config::LinkStyle;
        use satchel_provider::provider::{DriveLink, DriveProvider};

        let link = match shelf.link {
            LinkStyle::View => DriveLink::View,
            LinkStyle::Preview => DriveLink::Preview,
        };
        // Presence is checked when the config is validated.
        let api_key = config.drive.api_key.clone().unwrap_or_default();
        let provider =
            DriveProvider::new(key, api_key, link, config.timeout()).or_raise(|| ErrorKind::Shelf(key.to_string()))?;
        Ok(Self {
            provider: Arc::new(provider),
            root: Crumb::new(shelf.root.clone(), display_name),
        })
    }

    #[cfg(not(feature = "drive"))]
    fn drive(_config: &Config, key: &str, _shelf: &ShelfConfig, _display_name: String) -> Result<Self> {
        exn::bail!(ErrorKind::DriveDisabled(key.to_string()))
    }

    pub fn browser(self, opener: Option<OpenerHandle>) -> FolderBrowser {
        let browser = FolderBrowser::new(self.provider, self.root);
        match opener {
            Some(opener) => browser.with_opener(opener),
            None => browser,
        }
    }
}
