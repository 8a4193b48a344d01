pub mod app_config;
pub mod config;
pub mod input;
pub mod matcher;
pub mod shops;
pub mod similarity;
pub mod validate;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use input::{load_grouped, InputError};
pub use matcher::{find_common_shops, find_common_shops_with_threshold};
pub use shops::{Coordinates, Grouped, GroupedResults, MatchGroup, ShopRecord};
pub use similarity::{
    is_similar, normalize_name, normalize_postcode, similarity_score, Threshold, ThresholdError,
};
pub use validate::{
    validate_grouped, RawGroupedResults, RawShopRecord, RejectReason, RejectedRecord, Validated,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
