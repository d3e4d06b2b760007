use std::fmt;
use std::fs;
use std::path::Path;

use msd_core::errors::{DesignError, ErrorInfo};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::graph::{ConstraintGraph, DependencyGraph};

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";

/// `(id, for, attr.type)` of every declared data key. Target keys are added
/// per structure.
const KEYS: [(&str, &str, &str); 4] = [
    ("position", "node", "int"),
    ("component", "node", "int"),
    ("base", "node", "string"),
    ("structures", "edge", "string"),
];

/// Renders the graph as a GraphML document.
///
/// The graph element carries one `target_<i>` entry per dot-bracket target.
/// Nodes carry their position, component and current nucleotide; edges carry
/// the comma-separated indices of the structures that contain the pair.
pub fn to_graphml(graph: &ConstraintGraph) -> Result<String, DesignError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(&mut writer, graph).map_err(|err| xml_error("graphml-encode", err))?;
    String::from_utf8(writer.into_inner()).map_err(|err| xml_error("graphml-encode", err))
}

/// Writes the GraphML document to `path`.
pub fn write_graphml(graph: &ConstraintGraph, path: &Path) -> Result<(), DesignError> {
    let document = to_graphml(graph)?;
    fs::write(path, document).map_err(|err| {
        DesignError::Serde(
            ErrorInfo::new("graphml-write", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })
}

fn emit(writer: &mut Writer<Vec<u8>>, graph: &ConstraintGraph) -> quick_xml::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("graphml").with_attributes([("xmlns", GRAPHML_NS)]),
    ))?;

    let targets: Vec<String> = (0..graph.structures().len())
        .map(|index| format!("target_{index}"))
        .collect();
    for target in &targets {
        declare_key(writer, target, "graph", "string")?;
    }
    for (id, domain, kind) in KEYS {
        declare_key(writer, id, domain, kind)?;
    }

    writer.write_event(Event::Start(
        BytesStart::new("graph").with_attributes([("id", "dependency"), ("edgedefault", "undirected")]),
    ))?;
    for (target, structure) in targets.iter().zip(graph.structures()) {
        write_data(writer, target, structure.as_str())?;
    }

    let sequence = graph.get_sequence();
    for (position, base) in sequence.chars().enumerate() {
        let id = format!("n{position}");
        writer.write_event(Event::Start(
            BytesStart::new("node").with_attributes([("id", id.as_str())]),
        ))?;
        write_data(writer, "position", &position.to_string())?;
        write_data(writer, "component", &graph.component_of(position).to_string())?;
        write_data(writer, "base", &base.to_string())?;
        writer.write_event(Event::End(BytesEnd::new("node")))?;
    }

    for (i, j, structures) in graph.edges() {
        let source = format!("n{i}");
        let target = format!("n{j}");
        let labels: Vec<String> = structures.iter().map(|index| index.to_string()).collect();
        writer.write_event(Event::Start(BytesStart::new("edge").with_attributes([
            ("source", source.as_str()),
            ("target", target.as_str()),
        ])))?;
        write_data(writer, "structures", &labels.join(","))?;
        writer.write_event(Event::End(BytesEnd::new("edge")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("graphml")))?;
    Ok(())
}

fn declare_key(
    writer: &mut Writer<Vec<u8>>,
    id: &str,
    domain: &str,
    kind: &str,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Empty(BytesStart::new("key").with_attributes([
        ("id", id),
        ("for", domain),
        ("attr.name", id),
        ("attr.type", kind),
    ])))?;
    Ok(())
}

fn write_data(writer: &mut Writer<Vec<u8>>, key: &str, value: &str) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(
        BytesStart::new("data").with_attributes([("key", key)]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new("data")))?;
    Ok(())
}

fn xml_error(code: &str, err: impl fmt::Display) -> DesignError {
    DesignError::Serde(ErrorInfo::new(code, err.to_string()))
}
