use msd_core::{DesignError, DesignInput};
use msd_graph::DependencyGraph;
use msd_search::RunConfig;

/// `# Options: ...` line describing the effective configuration.
pub fn options_line(config: &RunConfig) -> String {
    format!(
        "# Options: number={}, stop={}, mode={}, engine={}, weight={}",
        config.runs, config.stop, config.mode, config.engine, config.weight
    )
}

/// Target structures followed by the constraint, one `#` line each.
pub fn target_lines(input: &DesignInput) -> Vec<String> {
    input
        .structures
        .iter()
        .map(|structure| format!("# {structure}"))
        .chain(std::iter::once(format!("# {}", input.constraint)))
        .collect()
}

/// Solution count, component count and one line per component.
pub fn graph_lines<G: DependencyGraph + ?Sized>(graph: &G) -> Result<Vec<String>, DesignError> {
    let components = graph.number_of_connected_components();
    let mut lines = vec![
        format!("# Maximal number of solutions: {}", graph.number_of_sequences()),
        format!("# Number of Connected Components: {components}"),
    ];
    for component in 0..components {
        let members = graph.component_vertices(component)?;
        lines.push(format!("# [{component}] {members:?}"));
    }
    Ok(lines)
}
