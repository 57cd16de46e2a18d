use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::client::session::SessionBackend;

/// Fixed storage key for the serialized theme name. Independent of the
/// session blob: signing out does not reset the theme.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Light,
    Dark,
    Coffee,
    Forest,
    Sunset,
}

/// Durable theme preference. No stored preference means "follow the system".
pub struct ThemeStore {
    backend: Arc<dyn SessionBackend>,
    preference: Option<ThemeName>,
}

impl ThemeStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self {
            backend,
            preference: None,
        }
    }

    pub async fn load(&mut self) {
        match self.backend.get(THEME_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(theme) => self.preference = Some(theme),
                Err(_) => warn!("stored theme is malformed; following system preference"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read stored theme"),
        }
    }

    /// `None` clears the preference back to following the system.
    pub async fn set_preference(&mut self, theme: Option<ThemeName>) -> anyhow::Result<()> {
        match theme {
            Some(t) => {
                self.backend
                    .set(THEME_KEY, &serde_json::to_string(&t)?)
                    .await?
            }
            None => self.backend.remove(THEME_KEY).await?,
        }
        self.preference = theme;
        Ok(())
    }

    pub fn preference(&self) -> Option<ThemeName> {
        self.preference
    }

    /// Effective theme: the stored preference wins, otherwise the system
    /// light/dark setting.
    pub fn resolve(&self, system_prefers_dark: bool) -> ThemeName {
        self.preference.unwrap_or(if system_prefers_dark {
            ThemeName::Dark
        } else {
            ThemeName::Light
        })
    }
}
