use std::time::Duration;

use url::Url;

use crate::errors::NexusError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct NexusConfig {
    pub base_url: Url,
    pub repository: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl NexusConfig {
    pub fn new(base_url: &str, repository: impl Into<String>) -> Result<Self, NexusError> {
        let mut base_url =
            Url::parse(base_url).map_err(|err| NexusError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(NexusError::InvalidUrl(format!("{base_url} cannot be a base")));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let repository = repository.into();
        if repository.trim().is_empty() {
            return Err(NexusError::MissingRepository);
        }
        Ok(Self {
            base_url,
            repository,
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: Option<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = password;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn components_url(&self, continuation: Option<&str>) -> Result<Url, NexusError> {
        let mut url = self
            .base_url
            .join("service/rest/v1/components")
            .map_err(|err| NexusError::InvalidUrl(err.to_string()))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("repository", &self.repository);
            if let Some(token) = continuation {
                query.append_pair("continuationToken", token);
            }
        }
        Ok(url)
    }

    pub(crate) fn component_url(&self, id: &str) -> Result<Url, NexusError> {
        let mut url = self
            .base_url
            .join("service/rest/v1/components/")
            .map_err(|err| NexusError::InvalidUrl(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| NexusError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}
