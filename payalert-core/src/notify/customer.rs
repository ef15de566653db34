use crate::conf::StripeConfig;
use crate::notify::CustomerLookupError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// Payment provider customer lookup.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, CustomerLookupError>;
}

/// Looks customers up through the Stripe REST API.
pub struct StripeCustomerDirectory {
    client: reqwest::Client,
    api_base: String,
    secret_key: Option<String>,
}

impl StripeCustomerDirectory {
    pub fn new(cfg: &StripeConfig) -> Result<Self, CustomerLookupError> {
        Ok(Self {
            client: super::http_client()?,
            api_base: cfg.api_base.clone(),
            secret_key: cfg.secret_key.clone(),
        })
    }

    /// `{api_base}/v1/customers/{id}`, with the id percent-encoded.
    pub fn customer_url(&self, customer_id: &str) -> Result<Url, CustomerLookupError> {
        let invalid = || CustomerLookupError::InvalidBaseUrl {
            base: self.api_base.clone(),
        };

        let mut url = Url::parse(&self.api_base).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["v1", "customers", customer_id]);

        Ok(url)
    }
}

#[async_trait]
impl CustomerDirectory for StripeCustomerDirectory {
    async fn retrieve_customer(&self, customer_id: &str) -> Result<Customer, CustomerLookupError> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or(CustomerLookupError::MissingCredentials)?;

        let url = self.customer_url(customer_id)?;
        let resp = self.client.get(url).bearer_auth(secret_key).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CustomerLookupError::Status {
                status: status.as_u16(),
            });
        }

        Ok(resp.json::<Customer>().await?)
    }
}
