use indexmap::IndexMap;
use msd_core::DesignError;
use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;

/// Summary of a dependency graph reported alongside every checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphProperties {
    /// Number of consistent sequences (saturates at `u128::MAX`).
    pub max_number_of_sequences: u128,
    /// Number of connected components.
    pub number_of_connected_components: usize,
    /// Sorted member positions of each component.
    pub components: Vec<Vec<usize>>,
}

impl GraphProperties {
    /// Collects the properties from any dependency graph.
    pub fn collect<G: DependencyGraph + ?Sized>(graph: &G) -> Result<Self, DesignError> {
        let number_of_connected_components = graph.number_of_connected_components();
        let components = (0..number_of_connected_components)
            .map(|component| graph.component_vertices(component))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            max_number_of_sequences: graph.number_of_sequences(),
            number_of_connected_components,
            components,
        })
    }

    /// Column name to value mapping, in a stable column order.
    pub fn fields(&self) -> IndexMap<String, String> {
        let mut fields = IndexMap::new();
        fields.insert(
            "max_number_of_sequences".to_string(),
            self.max_number_of_sequences.to_string(),
        );
        fields.insert(
            "number_of_connected_components".to_string(),
            self.number_of_connected_components.to_string(),
        );
        for (index, members) in self.components.iter().enumerate() {
            fields.insert(format!("cc_{index}"), format!("{members:?}"));
        }
        fields
    }
}
