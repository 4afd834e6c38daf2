use anyhow::Result;
use metta_translate::json::{decode_records, encode_records_with_policy, records_from_jsonl};
use metta_translate::rdf::{GraphDecoder, GraphEncoder, RdfFormat, RdfParser, RdfTerm, Triple};
use metta_translate::table;
use metta_translate::{parse_str, to_text, TranslatorConfig};

const CONFIG: &str = r#"
json:
  record_marker: json
  on_record_error: skip
graph:
  encoding: quoted
table:
  encoding: header_row
"#;

const RECORDS: &str = r#"
{"name": "Alice", "tags": [["a", "b"], ["c"]], "address": {"city": "Rome", "zip": "00100"}}
{"name": "Bob", "active": true, "score": 4.5}
"#;

const TURTLE: &str = r#"
@prefix ex: <http://example.org/> .
<#taskA> ex:member <#taskA1> ;
         ex:label "Task A"@en ;
         ex:priority 2 .
"#;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("MeTTa translation layer v{}", metta_translate::version());
    println!("==========================================");
    println!();

    let config = TranslatorConfig::from_yaml_str(CONFIG)?;

    demo_json(&config)?;
    demo_graph(&config)?;
    demo_table(&config)?;

    Ok(())
}

fn demo_json(config: &TranslatorConfig) -> Result<()> {
    println!("=== Demo 1: JSON records ===");
    let records = records_from_jsonl(RECORDS)?;
    let lines = encode_records_with_policy(&records, &config.json)?;
    print!("{}", to_text(&lines));

    let decoded = decode_records(&lines, &config.json.record_marker)?;
    println!("✓ Decoded {} records back", decoded.len());
    println!();
    Ok(())
}

fn demo_graph(config: &TranslatorConfig) -> Result<()> {
    println!("=== Demo 2: N3 graph with a quoted formula ===");
    let mut document = RdfParser::parse(
        TURTLE,
        RdfFormat::Turtle,
        Some("file:///kb/check_list.ttl"),
    )?;

    // { <#taskA> ex:member <#taskA1> } ex:assertedBy ex:alice .
    let formula = document.new_quoted_graph();
    let quoted: Vec<Triple> = document.asserted().triples().take(1).cloned().collect();
    for triple in quoted {
        document.graph_mut(formula).insert(triple);
    }
    document.asserted_mut().insert(Triple::new(
        RdfTerm::QuotedGraphRef(formula),
        RdfTerm::iri("http://example.org/assertedBy")?,
        RdfTerm::iri("http://example.org/alice")?,
    ));

    let lines = GraphEncoder::new(config.graph.clone()).encode(&document)?;
    let text = to_text(&lines);
    print!("{}", text);

    let decoded = GraphDecoder::new(config.graph.clone())
        .with_document_id("file:///kb/check_list.ttl")
        .decode(&parse_str(&text)?)?;
    println!(
        "✓ Decoded {} triples in {} graphs",
        decoded.triple_count(),
        decoded.graphs().count()
    );
    println!();
    Ok(())
}

fn demo_table(config: &TranslatorConfig) -> Result<()> {
    println!("=== Demo 3: Tables ===");
    let matrix: table::TableMatrix = vec![
        vec!["Index".into(), "Name".into()],
        vec!["1".into(), "Alice".into()],
        vec!["2".into(), "Bob".into()],
    ];

    let lines = table::encode(&matrix, config.table.encoding)?;
    print!("{}", to_text(&lines));

    let decoded = table::decode(&lines, config.table.encoding)?;
    println!("✓ Decoded {} rows back", decoded.len());
    Ok(())
}
