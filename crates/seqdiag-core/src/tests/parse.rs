use crate::ast::*;
use crate::*;

fn statements(src: &str) -> Vec<Statement> {
    parse(src).unwrap().statements
}

#[test]
fn parse_accepts_optional_keyword_and_id() {
    assert_eq!(parse("seqdiag { A -> B; }").unwrap().id, None);
    assert_eq!(
        parse("diagram admin { A -> B }").unwrap().id,
        Some("admin".to_string())
    );
    assert_eq!(parse("{ }").unwrap(), Document::default());
}

#[test]
fn parse_chained_edge_with_attrs_and_block() {
    let stmts = statements(
        r#"seqdiag {
  browser -> webserver -> database [label = "GET", diagonal] {
    database --> cache;
  }
}"#,
    );
    assert_eq!(stmts.len(), 1);
    let Statement::Edge(edge) = &stmts[0] else {
        panic!("expected edge, got {:?}", stmts[0]);
    };
    assert_eq!(edge.from, "browser");
    assert_eq!(edge.edge_type, "->");
    assert_eq!(edge.to, "webserver");
    assert_eq!(
        edge.followers,
        vec![("->".to_string(), "database".to_string())]
    );
    assert_eq!(
        edge.attrs,
        vec![Attr::new("label", Some("GET")), Attr::flag("diagonal")]
    );
    let block = edge.block.as_ref().unwrap();
    assert!(matches!(&block[0], Statement::Edge(e) if e.edge_type == "-->" && e.to == "cache"));
}

#[test]
fn parse_node_attribute_and_defaults_statements() {
    let stmts = statements(
        r#"{
  edge_length = 300;
  node [color = "red"];
  edge [style = dotted];
  A [label = "Alice"][activated];
}"#,
    );
    assert_eq!(
        stmts,
        vec![
            Statement::Attribute(Attr::new("edge_length", Some("300"))),
            Statement::Defaults(DefaultsStmt {
                target: DefaultsTarget::Node,
                attrs: vec![Attr::new("color", Some("red"))],
            }),
            Statement::Defaults(DefaultsStmt {
                target: DefaultsTarget::Edge,
                attrs: vec![Attr::new("style", Some("dotted"))],
            }),
            Statement::Node(NodeStmt {
                id: "A".to_string(),
                attrs: vec![Attr::new("label", Some("Alice")), Attr::flag("activated")],
            }),
        ]
    );
}

#[test]
fn parse_groups_fragments_and_separators() {
    let stmts = statements(
        r#"{
  group backend { label = "Backend"; app; db }
  === Login ===
  alt [label = "cached"] {
    app -> db;
    loop { app -> app; }
  }
  ... 5 minutes later ...
}"#,
    );
    assert_eq!(stmts.len(), 4);

    let Statement::Group(group) = &stmts[0] else {
        panic!("expected group");
    };
    assert_eq!(group.id.as_deref(), Some("backend"));
    assert_eq!(group.statements.len(), 3);

    assert_eq!(
        stmts[1],
        Statement::Separator(SeparatorStmt {
            kind: SeparatorKind::Divider,
            label: "Login".to_string(),
        })
    );

    let Statement::Fragment(alt) = &stmts[2] else {
        panic!("expected fragment");
    };
    assert_eq!(alt.kind, FragmentKind::Alt);
    assert_eq!(alt.attrs, vec![Attr::new("label", Some("cached"))]);
    assert_eq!(alt.position, Position { line: 4, column: 3 });
    assert!(matches!(&alt.statements[1], Statement::Fragment(f) if f.kind == FragmentKind::Loop));

    assert_eq!(
        stmts[3],
        Statement::Separator(SeparatorStmt {
            kind: SeparatorKind::Delay,
            label: "5 minutes later".to_string(),
        })
    );
}

#[test]
fn parse_keywords_are_contextual() {
    let stmts = statements("{ group -> alt; loop; class; }");
    assert!(matches!(&stmts[0], Statement::Edge(e) if e.from == "group" && e.to == "alt"));
    assert!(matches!(&stmts[1], Statement::Node(n) if n.id == "loop"));
    assert!(matches!(&stmts[2], Statement::Node(n) if n.id == "class"));
}

#[test]
fn parse_extensions() {
    let stmts = statements(r#"{ class emphasis [color = red]; plugin attributes [name = "x"]; }"#);
    assert_eq!(
        stmts,
        vec![
            Statement::Extension(ExtensionStmt {
                kind: ExtensionKind::Class,
                name: "emphasis".to_string(),
                attrs: vec![Attr::new("color", Some("red"))],
            }),
            Statement::Extension(ExtensionStmt {
                kind: ExtensionKind::Plugin,
                name: "attributes".to_string(),
                attrs: vec![Attr::new("name", Some("x"))],
            }),
        ]
    );
}

#[test]
fn parse_unknown_block_statement_is_fatal() {
    let err = parse("{\n  A -> B;\n  section { A -> B }\n}").unwrap_err();
    assert_eq!(
        err,
        Error::UnknownStatement {
            kind: "section".to_string(),
            line: 3,
            column: 3,
        }
    );
}

#[test]
fn parse_reports_missing_closing_brace() {
    let err = parse("{ A -> B;").unwrap_err();
    let Error::Parse {
        line,
        column,
        message,
    } = &err
    else {
        panic!("expected parse error, got {err:?}");
    };
    assert_eq!((*line, *column), (1, 10));
    assert!(message.contains("end of input"), "{message}");
}

#[test]
fn parse_rejects_trailing_tokens() {
    let err = parse("{ A } B").unwrap_err();
    assert!(matches!(err, Error::Parse { line: 1, column: 7, .. }), "{err:?}");
}

#[test]
fn parse_quoted_ids_and_escapes() {
    let stmts = statements(r#"{ "web server" -> 'db' [label = "line1\nline2"]; }"#);
    let Statement::Edge(edge) = &stmts[0] else {
        panic!("expected edge");
    };
    assert_eq!(edge.from, "web server");
    assert_eq!(edge.to, "db");
    assert_eq!(edge.attrs[0].value.as_deref(), Some("line1\nline2"));
}

#[test]
fn ast_serializes_with_statement_tags() {
    let doc = parse("{ A -> B; === s ===; alt { A -> B } class c [color = red] }").unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["statements"][0]["statement"], "edge");
    assert_eq!(json["statements"][0]["from"], "A");
    assert_eq!(json["statements"][1]["statement"], "separator");
    assert_eq!(json["statements"][1]["kind"], "divider");
    assert_eq!(json["statements"][2]["statement"], "fragment");
    assert_eq!(json["statements"][2]["kind"], "alt");
    assert_eq!(json["statements"][3]["kind"], "class");

    let text = serde_json::to_string(&doc).unwrap();
    let back: Document = serde_json::from_str(&text).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn unspaced_edges_and_block_comments_parse() {
    let stmts = statements("{ /* header */\n  web-server->db-1; /* multi\n line */ A<-B }");
    let edges: Vec<(&str, &str, &str)> = stmts
        .iter()
        .map(|stmt| match stmt {
            Statement::Edge(e) => (e.from.as_str(), e.edge_type.as_str(), e.to.as_str()),
            other => panic!("expected edge, got {other:?}"),
        })
        .collect();
    assert_eq!(edges, vec![("web-server", "->", "db-1"), ("A", "<-", "B")]);
}
