//! Provider clients, payload normalization and the source waterfall.

pub mod bot_api;
pub mod coordinator;
pub mod error;
pub mod fields;
pub mod harvester;
mod http;
pub mod normalize;
pub mod payload;
pub mod quality;
pub mod telemetrio;
pub mod tgstat;
pub mod ton_price;

pub use bot_api::{BotApiClient, ChatInfo};
pub use coordinator::{supplement, Gaps, SourceCoordinator, SourcesConfig};
pub use error::SourceError;
pub use harvester::{HarvestRefresh, Harvester, HttpHarvestRefresh};
pub use normalize::{normalize, Normalizer};
pub use payload::{HarvesterSnapshot, RawPayload};
pub use telemetrio::TelemetrioClient;
pub use tgstat::TgstatClient;
pub use ton_price::TonPriceClient;
