//! Page description loaded from a RON file.
//!
//! The file stands in for the page's markup: which forms exist, how they are
//! marked, their submit buttons, and whether the page has a notification
//! region. It also carries the session cookie and download directory.

use std::fs;
use std::path::{Path, PathBuf};

use formrelay_core::{Control, FlashRegion, Form, FormField, FormId, FormMethod, PageState};
use formrelay_engine::SubmitSettings;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read page description {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse page description: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid page_url {url:?}: {source}")]
    PageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("form {form} names submitter {control}, which is not a declared control")]
    UnknownSubmitter { form: FormId, control: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
enum MethodConfig {
    Get,
    #[default]
    Post,
}

#[derive(Debug, Clone, Deserialize)]
struct ControlConfig {
    id: u32,
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FormConfig {
    id: FormId,
    #[serde(default)]
    classes: Vec<String>,
    #[serde(default)]
    action: String,
    #[serde(default)]
    method: MethodConfig,
    #[serde(default)]
    fields: Vec<(String, String)>,
    /// Button that submits this form by default.
    #[serde(default)]
    submitter: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    page_url: String,
    #[serde(default = "default_download_dir")]
    download_dir: PathBuf,
    #[serde(default)]
    session_cookie: Option<String>,
    #[serde(default = "default_region")]
    notification_region: bool,
    #[serde(default)]
    controls: Vec<ControlConfig>,
    #[serde(default)]
    forms: Vec<FormConfig>,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_region() -> bool {
    true
}

impl PageConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&content)?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: PageConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.page_url()?;
        for form in &self.forms {
            if let Some(control) = form.submitter {
                if !self.controls.iter().any(|c| c.id == control) {
                    return Err(ConfigError::UnknownSubmitter {
                        form: form.id,
                        control,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn page_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.page_url).map_err(|source| ConfigError::PageUrl {
            url: self.page_url.clone(),
            source,
        })
    }

    pub fn has_notification_region(&self) -> bool {
        self.notification_region
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Default submit button for a form.
    pub fn submitter_for(&self, form_id: FormId) -> Option<u32> {
        self.forms
            .iter()
            .find(|f| f.id == form_id)
            .and_then(|f| f.submitter)
    }

    pub fn submit_settings(&self) -> Result<SubmitSettings, ConfigError> {
        let mut settings = SubmitSettings::new(self.page_url()?);
        settings.session_cookie = self.session_cookie.clone();
        Ok(settings)
    }

    pub fn page_state(&self) -> PageState {
        let region = if self.notification_region {
            FlashRegion::present()
        } else {
            FlashRegion::absent()
        };
        let state = self
            .controls
            .iter()
            .fold(PageState::new().with_region(region), |state, c| {
                state.with_control(Control::new(c.id, c.text.clone()))
            });
        self.forms.iter().fold(state, |state, f| {
            state.with_form(Form {
                id: f.id,
                classes: f.classes.clone(),
                action: f.action.clone(),
                method: match f.method {
                    MethodConfig::Get => FormMethod::Get,
                    MethodConfig::Post => FormMethod::Post,
                },
                fields: f
                    .fields
                    .iter()
                    .map(|(name, value)| FormField::new(name.clone(), value.clone()))
                    .collect(),
            })
        })
    }

    pub fn form_ids(&self) -> impl Iterator<Item = FormId> + '_ {
        self.forms.iter().map(|f| f.id)
    }
}
