use std::io::Write;

use msd_core::{
    parse_design_input, read_design_file, read_design_stream, read_start_sequence, DesignInput,
};

#[test]
fn builtin_problem_is_consistent() {
    let input = DesignInput::builtin();
    assert_eq!(input.structures.len(), 3);
    assert_eq!(input.len(), 36);
    assert_eq!(input.constraint.as_str(), "N".repeat(36));
    assert!(input.start_sequence.is_none());
}

#[test]
fn text_format_reads_structures_constraint_and_start() {
    let text = "; tri-stable toy\n\
                ((....))..  first\n\
                ..((....))\n\
                \n\
                NNNNNNNNNN\n\
                GGAAAACCAA\n";
    let input = parse_design_input(text).unwrap();
    assert_eq!(input.structures.len(), 2);
    assert_eq!(input.structures[0].as_str(), "((....))..");
    assert_eq!(input.constraint.as_str(), "NNNNNNNNNN");
    assert_eq!(input.start_sequence.as_deref(), Some("GGAAAACCAA"));
}

#[test]
fn missing_constraint_defaults_to_wildcard() {
    let input = parse_design_input("(...)\n.....\n").unwrap();
    assert_eq!(input.constraint.as_str(), "NNNNN");
}

#[test]
fn length_mismatch_is_reported() {
    let err = parse_design_input("(...)\n(....)\n").unwrap_err();
    assert_eq!(err.info().code, "length-mismatch");
    let err = parse_design_input("(...)\nNNNN\n").unwrap_err();
    assert_eq!(err.info().code, "length-mismatch");
}

#[test]
fn garbage_lines_are_rejected() {
    let err = parse_design_input("(...)\nhello!\n").unwrap_err();
    assert_eq!(err.info().code, "unrecognised-line");
    let err = parse_design_input("; only comments\n").unwrap_err();
    assert_eq!(err.info().code, "no-structures");
}

#[test]
fn files_and_streams_share_the_format() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "((....))").unwrap();
    writeln!(file, "NNNNNNNN").unwrap();
    let from_file = read_design_file(file.path()).unwrap();
    let from_stream = read_design_stream("((....))\nNNNNNNNN\n".as_bytes()).unwrap();
    assert_eq!(from_file, from_stream);
}

#[test]
fn start_sequence_file_strips_trailing_newline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "GGGAAACCC\n").unwrap();
    let start = read_start_sequence(file.path()).unwrap();
    assert_eq!(start, "GGGAAACCC");

    let input = parse_design_input("(((...)))\n").unwrap();
    let input = input.with_start_sequence(&start).unwrap();
    assert_eq!(input.start_sequence.as_deref(), Some("GGGAAACCC"));
    assert!(parse_design_input("(((...)))\n")
        .unwrap()
        .with_start_sequence("GGG")
        .is_err());
}
