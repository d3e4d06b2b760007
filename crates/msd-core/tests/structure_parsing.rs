use msd_core::{BracketKind, ElementKind, IupacCode, Nucleotide, SequenceConstraint, Structure};

#[test]
fn nested_structure_partners() {
    let structure = Structure::parse("((..))..").unwrap();
    assert_eq!(structure.len(), 8);
    assert_eq!(structure.partner(0), Some(5));
    assert_eq!(structure.partner(4), Some(1));
    assert_eq!(structure.partner(2), None);
    assert_eq!(structure.pairs().len(), 2);
    assert!(!structure.has_pseudoknot());
}

#[test]
fn unbalanced_brackets_are_rejected() {
    let err = Structure::parse("((..)").unwrap_err();
    assert_eq!(err.info().code, "unbalanced");
    let err = Structure::parse("..))").unwrap_err();
    assert_eq!(err.info().code, "unbalanced");
    let err = Structure::parse("(.x)").unwrap_err();
    assert_eq!(err.info().code, "invalid-symbol");
}

#[test]
fn pseudoknot_layers_split_cleanly() {
    let structure = Structure::parse("((..[[..))..]]").unwrap();
    assert!(structure.has_pseudoknot());
    assert_eq!(
        structure.layers(),
        vec![BracketKind::Round, BracketKind::Square]
    );
    let square = structure.layer(BracketKind::Square);
    assert_eq!(square.as_str(), "....((......))");
    assert!(!square.has_pseudoknot());
}

#[test]
fn elements_cover_helices_and_loops() {
    let structure = Structure::parse("((..)).(..)").unwrap();
    let elements = structure.elements();
    let helices: Vec<_> = elements
        .iter()
        .filter(|element| element.kind == ElementKind::Helix)
        .collect();
    let loops: Vec<_> = elements
        .iter()
        .filter(|element| element.kind == ElementKind::Loop)
        .collect();
    assert_eq!(helices.len(), 2);
    assert_eq!(helices[0].positions, vec![0, 1, 4, 5]);
    assert_eq!(helices[1].positions, vec![7, 10]);
    assert_eq!(loops.len(), 3);
    assert_eq!(loops[0].positions, vec![2, 3]);
    assert_eq!(loops[1].positions, vec![6]);
    assert_eq!(loops[2].positions, vec![8, 9]);
}

#[test]
fn pairing_rules_include_wobble() {
    assert!(Nucleotide::G.pairs_with(Nucleotide::U));
    assert!(Nucleotide::U.pairs_with(Nucleotide::A));
    assert!(!Nucleotide::A.pairs_with(Nucleotide::G));
    assert!(!Nucleotide::C.pairs_with(Nucleotide::C));
}

#[test]
fn iupac_codes_expand_to_bases() {
    let code = IupacCode::from_letter(b'r').unwrap();
    assert_eq!(code.iter().collect::<Vec<_>>(), vec![Nucleotide::A, Nucleotide::G]);
    assert_eq!(IupacCode::from_letter(b'T').unwrap().iter().next(), Some(Nucleotide::U));
    assert!(IupacCode::from_letter(b'X').is_none());

    let constraint = SequenceConstraint::parse("nNrY").unwrap();
    assert_eq!(constraint.as_str(), "NNRY");
    assert_eq!(constraint.code(3).len(), 2);
    assert!(SequenceConstraint::parse("NNZ").is_err());
}
