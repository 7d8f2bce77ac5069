use fgpath::output::write_report;
use fgpath::{
    AnalysisConfig, Analyzer, CorpusReader, DependencyType, HEADER, Position, ResultWriter,
};
use std::io::Write;

/// One `<s>` element: a flat ROOT over the words plus the given f-structure
fn sentence(n: usize, words: &[&str], preds: &[(&str, &str)], fnodes: &[(&str, &[(&str, &str)])]) -> String {
    let mut xml = format!("<s id=\"s{n}\">\n<graph root=\"s{n}_0\">\n<terminals>\n");
    for (i, word) in words.iter().enumerate() {
        xml.push_str(&format!("<t id=\"s{n}_{}\" word=\"{word}\"/>\n", i + 1));
    }
    for (attr, val) in preds {
        xml.push_str(&format!("<t id=\"s{n}_0_f_{attr}\" val=\"{val}\"/>\n"));
    }
    xml.push_str("</terminals>\n<nonterminals>\n");
    xml.push_str(&format!("<nt id=\"s{n}_500\" cat=\"ROOT\">\n"));
    for i in 0..words.len() {
        xml.push_str(&format!("<edge label=\"--\" idref=\"s{n}_{}\"/>\n", i + 1));
    }
    xml.push_str("</nt>\n");
    for (level, edges) in fnodes {
        xml.push_str(&format!("<nt id=\"s{n}_0_f_{level}\">\n"));
        for (label, target) in edges.iter() {
            xml.push_str(&format!("<edge label=\"{label}\" idref=\"s{n}_0_f_{target}\"/>\n"));
        }
        xml.push_str("</nt>\n");
    }
    xml.push_str("</nonterminals>\n</graph>\n</s>\n");
    xml
}

fn corpus() -> String {
    let sentences = [
        // Subject relative directly under the root clause
        sentence(
            1,
            &["den", "som", "sover"],
            &[("1_PRED", "pro")],
            &[("0", &[("TOPIC-REL", "1"), ("SUBJ", "1")])],
        ),
        // Object gap two clauses below the relative clause
        sentence(
            2,
            &["boka", "som", "jeg", "tror", "han", "leste"],
            &[
                ("9_PRED", "pro"),
                ("4_PRED", "jeg"),
                ("5_STMT-TYPE", "decl"),
                ("3_CLAUSE-TYPE", "rel"),
            ],
            &[
                ("0", &[("SUBJ", "1")]),
                ("1", &[("ADJUNCT", "2")]),
                ("2", &[("$", "3")]),
                ("3", &[("TOPIC-REL", "9"), ("SUBJ", "4"), ("COMP", "5")]),
                ("5", &[("SUBJ", "6"), ("COMP", "7")]),
                ("7", &[("OBJ", "9")]),
            ],
        ),
        // No dependency edge
        sentence(
            3,
            &["han", "sover"],
            &[("1_PRED", "pro")],
            &[("0", &[("SUBJ", "1")])],
        ),
        // Two dependencies
        sentence(
            4,
            &["den", "som", "ser", "den", "som", "sover"],
            &[("1_PRED", "pro"), ("2_PRED", "pro")],
            &[
                ("0", &[("TOPIC-REL", "1"), ("SUBJ", "1"), ("COMP", "3")]),
                ("3", &[("TOPIC-REL", "2"), ("SUBJ", "2")]),
            ],
        ),
        // Locative wh-word with no grammatical function edge
        sentence(
            5,
            &["huset", "hvor", "han", "bor"],
            &[("6_PRED", "hvor")],
            &[
                ("0", &[("SUBJ", "1")]),
                ("1", &[("ADJUNCT", "2")]),
                ("2", &[("$", "3")]),
                ("3", &[("TOPIC-REL", "6"), ("ADJUNCT", "5")]),
                ("5", &[("$", "6")]),
            ],
        ),
        // Object question
        sentence(
            6,
            &["hva", "leste", "han", "?"],
            &[("2_PRED", "pro")],
            &[("0", &[("FOCUS-INT", "2"), ("OBJ", "2"), ("SUBJ", "3")])],
        ),
    ];
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<corpus>\n<body>\n{}</body>\n</corpus>\n",
        sentences.concat()
    )
}

fn run(config: AnalysisConfig) -> Vec<String> {
    let analysis = Analyzer::new(config)
        .analyze_corpus(CorpusReader::from_string(&corpus()))
        .unwrap();
    let mut writer = ResultWriter::new(Vec::new()).unwrap();
    for row in &analysis.rows {
        writer.write_row(row).unwrap();
    }
    let out = String::from_utf8(writer.finish().unwrap()).unwrap();
    out.lines().map(str::to_string).collect()
}

#[test]
fn test_header_first() {
    let lines = run(AnalysisConfig::default());
    assert_eq!(lines[0], HEADER);
}

#[test]
fn test_root_clause_subject_has_empty_path() {
    let lines = run(AnalysisConfig::default());
    assert_eq!(lines[1], "1,s1,s1_0,Den som sover,SUBJ,");
}

#[test]
fn test_embedded_gap_path_reads_from_filler() {
    let lines = run(AnalysisConfig::default());
    assert_eq!(lines[2], "2,s2,s2_0,Boka som jeg tror han leste,OBJ,COMP_decl COMP");
}

#[test]
fn test_zero_and_multiple_dependencies_emit_nothing() {
    let lines = run(AnalysisConfig::default());
    assert_eq!(lines.len(), 4);
    assert!(!lines.iter().any(|l| l.contains(",s3,")));
    assert!(!lines.iter().any(|l| l.contains(",s4,")));
}

#[test]
fn test_wh_adverb_falls_back_to_adjunct() {
    let lines = run(AnalysisConfig::default());
    assert_eq!(lines[3], "5,s5,s5_0,Huset hvor han bor,ADJUNCT,");

    let analysis = Analyzer::default()
        .analyze_corpus(CorpusReader::from_string(&corpus()))
        .unwrap();
    let row = analysis.rows.iter().find(|r| r.ids.sent_id == "s5").unwrap();
    assert_eq!(row.dependency.position, Some(Position::AdjunctFallback));
    assert_eq!(row.dependency.failure, None);
    assert_eq!(analysis.diagnostics.failing_labels, ["TOPIC-REL", "$"]);
    assert_eq!(analysis.diagnostics.analyzed_ids, ["s1", "s2", "s5"]);
}

#[test]
fn test_summary() {
    let analysis = Analyzer::default()
        .analyze_corpus(CorpusReader::from_string(&corpus()))
        .unwrap();
    assert_eq!(analysis.summary.sentences, 6);
    assert_eq!(analysis.summary.rows, 3);
    assert_eq!(analysis.summary.no_dependency, 2);
    assert_eq!(analysis.summary.multiple_dependencies, 1);
    assert!(analysis.summary.failures.is_empty());
}

#[test]
fn test_question_dependencies() {
    let config = AnalysisConfig::default().with_dependency_type(DependencyType::Interrogative);
    let lines = run(config);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "6,s6,s6_0,Hva leste han?,OBJ,");
}

#[test]
fn test_gzipped_corpus_and_report() {
    let dir = std::env::temp_dir().join(format!("fgpath-scenarios-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("corpus.xml.gz");

    let mut encoder = flate2::write::GzEncoder::new(
        std::fs::File::create(&path).unwrap(),
        flate2::Compression::default(),
    );
    encoder.write_all(corpus().as_bytes()).unwrap();
    encoder.finish().unwrap();

    let reader = CorpusReader::from_file(&path).unwrap();
    let analysis = Analyzer::default().analyze_corpus(reader).unwrap();
    assert_eq!(analysis.rows.len(), 3);

    let report = dir.join("report");
    write_report(&report, &analysis.diagnostics).unwrap();
    assert_eq!(
        std::fs::read_to_string(report.join("worked_ids.txt")).unwrap(),
        "s1\ns2\ns5\n"
    );
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_malformed_corpus_is_fatal() {
    let broken = corpus().replace("<edge label=\"--\" idref=\"s3_2\"/>", "<edge label=\"--\"/>");
    let err = Analyzer::default()
        .analyze_corpus(CorpusReader::from_string(&broken))
        .unwrap_err();
    assert!(err.to_string().contains("idref"));
}
