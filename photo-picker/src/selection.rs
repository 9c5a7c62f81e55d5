use std::sync::Arc;

use crate::models::SharedAsset;

/// Ordered set of selected assets, unique by `uri` and bounded by `maximum`.
///
/// The set is a value: [`SelectionSet::toggle`] returns a new set instead of
/// mutating in place, so nobody holding an older selection sees it change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionSet {
    assets: Vec<SharedAsset>,
    maximum: usize,
}

impl SelectionSet {
    pub fn new(maximum: usize) -> Self {
        Self {
            assets: Vec::new(),
            maximum,
        }
    }

    /// Builds a selection from externally supplied assets.
    ///
    /// Duplicates (by `uri`) are dropped and the list is cut at `maximum`.
    pub fn from_assets(maximum: usize, assets: impl IntoIterator<Item = SharedAsset>) -> Self {
        let mut selection = Self::new(maximum);
        for asset in assets {
            if selection.is_full() {
                log::warn!(
                    "Initial selection exceeds maximum of {}, dropping {}",
                    maximum,
                    asset.uri
                );
                continue;
            }
            if !selection.contains(&asset.uri) {
                selection.assets.push(asset);
            }
        }
        selection
    }

    /// Deselects `asset` if present, otherwise selects it when below the cap.
    ///
    /// Returns the resulting selection and whether anything changed. Hitting
    /// the cap is not an error; the asset is simply not added.
    pub fn toggle(&self, asset: &SharedAsset) -> (SelectionSet, bool) {
        if let Some(index) = self.position(&asset.uri) {
            let mut next = self.clone();
            next.assets.remove(index);
            return (next, true);
        }

        if self.is_full() {
            log::debug!(
                "Selection cap of {} reached, ignoring {}",
                self.maximum,
                asset.uri
            );
            return (self.clone(), false);
        }

        let mut next = self.clone();
        next.assets.push(Arc::clone(asset));
        (next, true)
    }

    fn position(&self, uri: &str) -> Option<usize> {
        self.assets.iter().position(|a| a.uri == uri)
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.position(uri).is_some()
    }

    /// Whether the grid should draw a selection marker on `uri`.
    ///
    /// Single-select sessions (`maximum <= 1`) never show markers.
    pub fn is_marked(&self, uri: &str) -> bool {
        self.maximum > 1 && self.contains(uri)
    }

    pub fn assets(&self) -> &[SharedAsset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn maximum(&self) -> usize {
        self.maximum
    }

    pub fn is_full(&self) -> bool {
        self.assets.len() >= self.maximum
    }
}
