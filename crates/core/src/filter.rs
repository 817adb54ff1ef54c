//! Multi-facet filter engine.
//!
//! Selection semantics: within a facet the selected values are OR'd (a
//! product passes if any of its values is selected); across facets the
//! results are AND'd (a product fails if any facet with a selection fails).
//! A facet with no selection imposes no constraint.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::product::Product;

/// One filterable product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Facet {
    Gender,
    Category,
    Size,
    Color,
}

impl Facet {
    /// The `data-filter` value the presentation layer tags its controls with.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Category => "category",
            Self::Size => "size",
            Self::Color => "color",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a facet name supplied by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown facet: {0}")]
pub struct UnknownFacet(String);

impl std::str::FromStr for Facet {
    type Err = UnknownFacet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gender" => Ok(Self::Gender),
            "category" => Ok(Self::Category),
            "size" => Ok(Self::Size),
            "color" => Ok(Self::Color),
            other => Err(UnknownFacet(other.to_owned())),
        }
    }
}

/// The shopper's current facet selections.
///
/// Not persisted; lives only as long as the browse session. Ordered
/// collections keep the collaborator's filter chips deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    facets: BTreeMap<Facet, BTreeSet<String>>,
}

impl FilterState {
    /// Empty state: every product matches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a value within a facet (checkbox checked).
    pub fn insert(&mut self, facet: Facet, value: impl Into<String>) {
        self.facets.entry(facet).or_default().insert(value.into());
    }

    /// Deselect one value within a facet (checkbox unchecked, or a filter
    /// chip dismissed). Returns whether the value was present.
    pub fn remove(&mut self, facet: Facet, value: &str) -> bool {
        let Some(values) = self.facets.get_mut(&facet) else {
            return false;
        };
        let removed = values.remove(value);
        if values.is_empty() {
            self.facets.remove(&facet);
        }
        removed
    }

    /// Flip one value's selection within a facet.
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        if !self.remove(facet, value) {
            self.insert(facet, value);
        }
    }

    /// Drop every selection within one facet.
    pub fn clear_facet(&mut self, facet: Facet) {
        self.facets.remove(&facet);
    }

    /// Drop all selections ("Clear all" control).
    pub fn clear_all(&mut self) {
        self.facets.clear();
    }

    /// Whether no facet currently constrains anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// The selected values for one facet.
    pub fn selected(&self, facet: Facet) -> impl Iterator<Item = &str> {
        self.facets
            .get(&facet)
            .into_iter()
            .flat_map(|values| values.iter().map(String::as_str))
    }

    /// Every `(facet, value)` selection, for rendering removable chips.
    pub fn selections(&self) -> impl Iterator<Item = (Facet, &str)> {
        self.facets.iter().flat_map(|(facet, values)| {
            values.iter().map(move |value| (*facet, value.as_str()))
        })
    }

    /// Whether a product passes every constrained facet.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.facets.iter().all(|(facet, selected)| match facet {
            Facet::Gender => selected.contains(product.gender.as_str()),
            Facet::Category => selected.contains(&product.category),
            Facet::Size => product.sizes.iter().any(|size| selected.contains(size)),
            Facet::Color => product
                .colors
                .iter()
                .any(|color| selected.contains(&color.name)),
        })
    }
}
