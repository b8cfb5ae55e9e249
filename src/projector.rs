//! Pick one sample and its metadata out of a dataset

use crate::dataset::{Dataset, Metadata, Sample, SampleKey};

/// The records selected for one identifier. Either side may be absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection<'a> {
    pub sample: Option<&'a Sample>,
    pub metadata: Option<&'a Metadata>,
}

impl Projection<'_> {
    pub fn is_empty(&self) -> bool {
        self.sample.is_none() && self.metadata.is_none()
    }
}

/// Project `dataset` onto `selected_id`.
///
/// The sample is the first whose `id` equals `selected_id` exactly. The
/// metadata is the first record whose key equals the integer reading of
/// `selected_id`; an identifier with no integer reading matches no metadata.
pub fn project<'a>(dataset: &'a Dataset, selected_id: &str) -> Projection<'a> {
    let sample = dataset.samples.iter().find(|s| s.id == selected_id);

    let metadata = match SampleKey::from_selection(selected_id) {
        key @ SampleKey::Numeric(_) => dataset.metadata.iter().find(|m| m.key() == Some(&key)),
        SampleKey::Text(_) => None,
    };

    Projection { sample, metadata }
}
