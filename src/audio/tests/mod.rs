use super::mixer::{build_filter_graph, parse_duration_output};
use super::warmth::{build_filter_chain, staging_path};
use super::*;
use crate::config::{MixerConfig, Transition, WarmthConfig};
use crate::error::{AudioError, DownloadError, Error};
