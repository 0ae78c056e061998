use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::upstream::UpstreamClient;

pub type AppState = (Arc<UpstreamClient>, Arc<AppConfig>);
