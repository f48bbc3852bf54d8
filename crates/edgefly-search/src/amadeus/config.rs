//! Amadeus API client configuration.

/// Which Amadeus environment to target. Test credentials only work against
/// the sandbox endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Test,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Test => "https://test.api.amadeus.com",
            Self::Production => "https://api.amadeus.com",
        }
    }
}

/// Amadeus API client configuration.
#[derive(Clone)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    pub environment: Environment,
    /// Currency for returned prices.
    pub currency: String,
    /// Maximum offers requested per search.
    pub max_offers: u32,
}

impl std::fmt::Debug for AmadeusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmadeusConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("currency", &self.currency)
            .field("max_offers", &self.max_offers)
            .finish()
    }
}

impl AmadeusConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment: Environment::Test,
            currency: "USD".to_string(),
            max_offers: 20,
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn base_url(&self) -> &'static str {
        self.environment.base_url()
    }
}
