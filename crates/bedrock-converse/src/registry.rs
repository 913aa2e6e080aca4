//! Model and provider registration.
//!
//! A [`ModelRegistry`] maps model identifiers to the client that serves them and
//! provider names to providers. It is an ordinary value: build one at startup with
//! [`register_bedrock`] and hand it to whatever needs to resolve models.
use std::collections::HashMap;
use std::sync::Arc;

use crate::providers::base::{Provider, SharedClient};
use crate::providers::bedrock::{BedrockClient, BedrockProvider, BEDROCK_PROVIDER_NAME};

/// Models served through the bedrock runtime, with the provider that owns them
pub const BEDROCK_MODELS: &[(&str, &str)] = &[(
    "anthropic.claude-3-haiku-20240307-v1:0",
    BEDROCK_PROVIDER_NAME,
)];

#[derive(Clone)]
pub struct ModelEntry {
    /// None when no client could be constructed at registration time
    pub client: Option<SharedClient>,
    pub owned_by: String,
}

#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelEntry>,
    providers: HashMap<String, Arc<dyn Provider>>,
    default_client: Option<SharedClient>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or overwrite) a model against an optional client
    pub fn register_model<M, O>(&mut self, model_id: M, owned_by: O, client: Option<SharedClient>)
    where
        M: Into<String>,
        O: Into<String>,
    {
        self.models.insert(
            model_id.into(),
            ModelEntry {
                client,
                owned_by: owned_by.into(),
            },
        );
    }

    pub fn register_provider(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn set_default_client(&mut self, client: Option<SharedClient>) {
        self.default_client = client;
    }

    pub fn default_client(&self) -> Option<SharedClient> {
        self.default_client.clone()
    }

    pub fn model(&self, model_id: &str) -> Option<&ModelEntry> {
        self.models.get(model_id)
    }

    pub fn provider(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// Provider owning `model_id`, if both are registered
    pub fn provider_for(&self, model_id: &str) -> Option<Arc<dyn Provider>> {
        self.model(model_id)
            .and_then(|entry| self.provider(&entry.owned_by))
    }

    /// Client for `model_id`, falling back to the default client
    pub fn client_for(&self, model_id: &str) -> Option<SharedClient> {
        match self.model(model_id) {
            Some(ModelEntry {
                client: Some(client),
                ..
            }) => Some(client.clone()),
            Some(_) => {
                tracing::warn!(
                    model = model_id,
                    "Model is registered without a client, using the default client"
                );
                self.default_client()
            }
            None => {
                tracing::warn!(
                    model = model_id,
                    "Model is not registered, using the default client"
                );
                self.default_client()
            }
        }
    }

    pub fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

/// Build the bedrock runtime client from the environment, if possible
pub fn default_bedrock_client() -> Option<SharedClient> {
    match BedrockClient::from_env() {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Bedrock client unavailable, registering models without a client"
            );
            None
        }
    }
}

/// Register every bedrock model against `client`
pub fn register(registry: &mut ModelRegistry, client: Option<SharedClient>) {
    for (model_id, owned_by) in BEDROCK_MODELS {
        registry.register_model(*model_id, *owned_by, client.clone());
    }
}

/// Startup registration: default client, models and the bedrock provider
pub fn register_bedrock(registry: &mut ModelRegistry) -> Option<SharedClient> {
    let client = default_bedrock_client();
    register(registry, client.clone());
    registry.register_provider(Arc::new(BedrockProvider));
    registry.set_default_client(client.clone());
    client
}
