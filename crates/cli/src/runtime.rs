//! Settings merged with command-line overrides, and the fetch plumbing built from them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use stdcheck_config::Settings;
use stdcheck_core::Body;
use stdcheck_fetch::{Endpoints, FetchClient, Runner, SourceAdapter};
use tracing::debug;

use crate::exit_codes::EXIT_FETCH_SETUP;
use crate::CliError;

#[derive(Debug, Clone)]
pub struct Runtime {
    pub settings: Settings,
}

impl Runtime {
    /// An explicit settings file must load; the default one may be absent or broken.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let settings = match path {
            Some(p) => Settings::load_from(p).map_err(CliError::config)?,
            None => Settings::load(),
        };
        debug!(?settings, "settings loaded");
        Ok(Self { settings })
    }

    pub fn with_overrides(&self, data_dir: Option<PathBuf>, jobs: Option<usize>) -> Self {
        let mut settings = self.settings.clone();
        if let Some(dir) = data_dir {
            settings.data_dir = dir;
        }
        if let Some(jobs) = jobs {
            settings.jobs = jobs;
        }
        Self { settings }
    }

    /// `<data-dir>/<body>_<kind>.json`
    pub fn data_path(&self, body: Body, kind: &str) -> PathBuf {
        self.settings.data_dir.join(format!("{body}_{kind}.json"))
    }

    pub fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::default();
        let overrides = &self.settings.endpoints;
        for body in Body::ALL {
            if let Some(url) = overrides.get(body) {
                let slot = match body {
                    Body::Astm => &mut endpoints.astm,
                    Body::Iec => &mut endpoints.iec,
                    Body::Ieee => &mut endpoints.ieee,
                    Body::Tse => &mut endpoints.tse,
                };
                *slot = url.to_string();
            }
        }
        endpoints
    }

    pub fn client(&self) -> Result<FetchClient, CliError> {
        FetchClient::new(Duration::from_secs(self.settings.timeout_secs.max(1))).map_err(|e| CliError {
            code: EXIT_FETCH_SETUP,
            message: e.to_string(),
            hint: None,
        })
    }

    pub fn adapter(&self, body: Body, client: FetchClient) -> SourceAdapter {
        SourceAdapter::for_body(body, client, &self.endpoints())
    }

    pub fn runner(&self) -> Result<Runner, CliError> {
        Runner::new(self.settings.jobs).map_err(|e| CliError {
            code: EXIT_FETCH_SETUP,
            message: e.to_string(),
            hint: Some("lower --jobs".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_and_paths_follow_data_dir() {
        let mut settings = Settings::default();
        settings.endpoints.iec = Some("http://iec-mirror.local".into());
        let rt = Runtime { settings }.with_overrides(Some(PathBuf::from("/tmp/std")), Some(9));

        assert_eq!(rt.settings.jobs, 9);
        assert_eq!(rt.data_path(Body::Tse, "fetched"), PathBuf::from("/tmp/std/tse_fetched.json"));

        let endpoints = rt.endpoints();
        assert_eq!(endpoints.iec, "http://iec-mirror.local");
        assert_eq!(endpoints.astm, Endpoints::default().astm);
    }
}
