//! Dashboard controller
//!
//! Two transitions:
//!
//! - **startup**: fetch, fill the selector, pick the first name, draw.
//! - **selection change**: fetch again, draw the chosen sample.
//!
//! A cycle is fetch -> project -> build traces -> render charts -> display
//! metadata. Only the fetch awaits; the rest runs under the surface lock so
//! one cycle's drawing is never interleaved with another's.
//!
//! Each cycle takes a generation number before fetching. When its fetch
//! resolves after a newer cycle has started, the result is dropped, so the
//! page always ends up showing the most recent selection.

use crate::chart::{self, Layout};
use crate::config::{DashboardConfig, Targets};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::panel;
use crate::projector::project;
use crate::selector::{self, SelectionChanged};
use crate::source::DataSource;
use crate::trace::{bar_trace, bubble_trace, BarTrace, BubbleTrace};
use crate::view::Surface;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    Rendered {
        selected: String,
        generation: u64,
        /// False when no sample record matched and empty charts were drawn
        sample_found: bool,
        metadata_found: bool,
    },
    /// A newer cycle started while this one was fetching
    Superseded { generation: u64, latest: u64 },
    /// The dataset lists no sample names
    NoSamples,
}

pub struct Dashboard<V> {
    config: DashboardConfig,
    source: Box<dyn DataSource>,
    surface: Mutex<V>,
    generation: AtomicU64,
    selected: Mutex<Option<String>>,
}

impl<V: Surface> Dashboard<V> {
    pub fn new(config: DashboardConfig, source: Box<dyn DataSource>, surface: V) -> Self {
        Self {
            config,
            source,
            surface: Mutex::new(surface),
            generation: AtomicU64::new(0),
            selected: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Lock the surface to read what has been drawn
    pub fn surface(&self) -> MutexGuard<'_, V> {
        self.surface.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn into_surface(self) -> V {
        self.surface.into_inner().unwrap_or_else(|e| e.into_inner())
    }

    /// Currently displayed sample
    pub fn selected(&self) -> Option<String> {
        self.selected.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Generation of the most recently started cycle
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch, populate the selector and draw the first sample.
    pub async fn startup(&self) -> Result<CycleOutcome> {
        let generation = self.begin_cycle();
        info!(source = %self.source.describe(), generation, "dashboard startup");
        let dataset = self.fetch(generation).await?;

        // The names list is filled even when a newer selection has overtaken
        // this fetch; only the draw is dropped.
        let mut surface = self.surface();
        let targets = &self.config.targets;
        selector::populate(&mut *surface, &targets.selector, &dataset.names);

        if let Some(outcome) = self.check_stale(generation) {
            return Ok(outcome);
        }

        let Some(first) = dataset.names.first().cloned() else {
            warn!("dataset has no sample names, nothing to draw");
            return Ok(CycleOutcome::NoSamples);
        };
        Ok(self.draw(&mut *surface, &dataset, first, generation))
    }

    /// Re-fetch and draw the newly selected sample.
    pub async fn on_selection_change(&self, event: SelectionChanged) -> Result<CycleOutcome> {
        let generation = self.begin_cycle();
        debug!(sample = %event.sample, generation, "selection changed");
        let dataset = self.fetch(generation).await?;

        let mut surface = self.surface();
        if let Some(outcome) = self.check_stale(generation) {
            return Ok(outcome);
        }
        Ok(self.draw(&mut *surface, &dataset, event.sample, generation))
    }

    fn begin_cycle(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn fetch(&self, generation: u64) -> Result<Dataset> {
        self.source.fetch_dataset().await.map_err(|e| {
            warn!(generation, error = %e, "dataset fetch failed, leaving page as is");
            e
        })
    }

    fn check_stale(&self, generation: u64) -> Option<CycleOutcome> {
        let latest = self.generation();
        if latest != generation {
            debug!(generation, latest, "discarding stale fetch");
            return Some(CycleOutcome::Superseded { generation, latest });
        }
        None
    }

    fn draw(
        &self,
        surface: &mut V,
        dataset: &Dataset,
        id: String,
        generation: u64,
    ) -> CycleOutcome {
        let drawn = paint(surface, &self.config.targets, dataset, &id);
        if !drawn.sample_found {
            warn!(sample = %id, "no sample record, drew empty charts");
        }
        info!(sample = %id, generation, otus = drawn.otus, "dashboard rendered");
        *self.selected.lock().unwrap_or_else(|e| e.into_inner()) = Some(id.clone());

        CycleOutcome::Rendered {
            selected: id,
            generation,
            sample_found: drawn.sample_found,
            metadata_found: drawn.metadata_found,
        }
    }
}

struct Drawn {
    sample_found: bool,
    metadata_found: bool,
    otus: usize,
}

/// Project, build both traces, render both charts and the metadata panel.
/// An absent sample draws empty charts.
fn paint<S: Surface + ?Sized>(
    surface: &mut S,
    targets: &Targets,
    dataset: &Dataset,
    id: &str,
) -> Drawn {
    let projection = project(dataset, id);
    let (bar, bubble) = match projection.sample {
        Some(sample) => (bar_trace(sample), bubble_trace(sample)),
        None => (BarTrace::empty(), BubbleTrace::empty()),
    };

    surface.select(&targets.selector, id);
    chart::render(surface, &targets.bar, bar, Layout::bar());
    chart::render(surface, &targets.bubble, bubble, Layout::bubble());
    panel::display(surface, &targets.metadata, projection.metadata);

    Drawn {
        sample_found: projection.sample.is_some(),
        metadata_found: projection.metadata.is_some(),
        otus: projection.sample.map(|s| s.len()).unwrap_or(0),
    }
}

/// Draw one sample of an already loaded dataset onto a fresh page.
///
/// Used where every sample is rendered up front, e.g. the offline report.
pub fn render_sample<V: Surface + Default>(
    config: &DashboardConfig,
    dataset: &Dataset,
    id: &str,
) -> V {
    let mut surface = V::default();
    paint(&mut surface, &config.targets, dataset, id);
    surface
}
