//! Biodash - Belly Button Biodiversity dashboard
//!
//! Biodash loads a dataset of navel swab samples (which OTUs were found in
//! each sample and how often) and draws, for one selected sample:
//!
//! - a horizontal bar chart of its top 10 OTUs
//! - a bubble chart of every OTU it contains
//! - a panel of its demographic metadata
//!
//! Picking a different sample re-fetches the dataset and redraws all three.
//!
//! # Quick Start
//!
//! ```no_run
//! use biodash::{Dashboard, DashboardConfig, PageState, SelectionChanged};
//!
//! # async fn run() -> biodash::Result<()> {
//! let config = DashboardConfig::default();
//! let source = biodash::source::from_config(&config)?;
//! let dashboard = Dashboard::new(config, source, PageState::default());
//!
//! dashboard.startup().await?;
//! dashboard.on_selection_change(SelectionChanged::new("941")).await?;
//!
//! let page = dashboard.surface();
//! println!("{:?}", page.panel_text("sample-metadata"));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: document model and the sample/metadata join key
//! - [`source`]: HTTP and file dataset sources
//! - [`projector`]: sample + metadata lookup for one identifier
//! - [`trace`]: bar and bubble trace builders
//! - [`chart`], [`selector`], [`panel`]: the three page widgets
//! - [`dashboard`]: startup / selection-change controller
//! - [`report`]: offline HTML and JSON output
//! - [`serve`]: interactive web UI

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod panel;
pub mod projector;
pub mod report;
pub mod selector;
pub mod serve;
pub mod source;
pub mod trace;
pub mod view;

pub use config::DashboardConfig;
pub use dashboard::{CycleOutcome, Dashboard};
pub use dataset::{Dataset, Metadata, Sample, SampleKey};
pub use error::{DashError, Result};
pub use projector::{project, Projection};
pub use selector::SelectionChanged;
pub use source::DataSource;
pub use view::{PageState, Surface};
