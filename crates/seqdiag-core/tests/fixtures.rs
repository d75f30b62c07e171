use seqdiag_core::{Diagram, Heading, LineStyle, RowItem, parse_and_build};
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn list_fixture_diag_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let Ok(entries) = std::fs::read_dir(root) else {
        return out;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|e| e == "diag") {
            out.push(path);
        }
    }
    out.sort();
    out
}

fn build_fixture(name: &str) -> Diagram {
    let path = workspace_root().join("fixtures").join("seqdiag").join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    parse_and_build(&text).unwrap_or_else(|err| panic!("{}: {err}", path.display()))
}

#[test]
fn every_fixture_builds_a_consistent_model() {
    let files = list_fixture_diag_files(&workspace_root().join("fixtures").join("seqdiag"));
    assert!(!files.is_empty(), "no fixtures found");

    for path in files {
        let text = std::fs::read_to_string(&path).expect("fixture");
        let diagram = parse_and_build(&text).unwrap_or_else(|err| panic!("{}: {err}", path.display()));

        for (column, p) in diagram.participants.iter().enumerate() {
            assert_eq!(p.column, column, "{}", path.display());
        }
        for (order, m) in diagram.messages.iter().enumerate() {
            assert_eq!(m.order, order, "{}", path.display());
            assert_eq!(diagram.rows[m.row], RowItem::Message(seqdiag_core::MessageId(order)));
        }

        let json = serde_json::to_string(&diagram).expect("serialize");
        let back: Diagram = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, diagram, "{}", path.display());
    }
}

#[test]
fn login_fixture_expands_both_way_edges() {
    let d = build_fixture("login.diag");
    let names: Vec<&str> = d.participants.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(names, ["browser", "webserver", "database"]);

    let labels: Vec<Option<&str>> = d.messages.iter().map(|m| m.label.as_deref()).collect();
    assert_eq!(
        labels,
        [
            Some("GET /index.html"),
            None,
            Some("POST /login"),
            Some("SELECT user"),
            None,
            Some("302 Found"),
            Some("GET /profile"),
            None,
        ]
    );
    let reply = &d.messages[5];
    assert_eq!(reply.style, LineStyle::Dashed);
    assert_eq!(reply.heading(), Heading::Left);
    assert_eq!(d.separators.len(), 1);
    assert_eq!(d.separators[0].row, 6);
}

#[test]
fn groups_fixture_applies_classes_and_settings() {
    let d = build_fixture("groups.diag");
    assert_eq!(d.groups.len(), 1);
    let group = &d.groups[0];
    assert_eq!(group.label.as_deref(), Some("Backend"));
    for member in &group.members {
        assert_eq!(
            d.participant(*member).and_then(|p| p.color.as_deref()),
            Some("#ccddff")
        );
    }
    assert_eq!(d.settings.edge_length, Some(240.0));
    assert_eq!(d.settings.default_note_color, "#ffffcc");
    assert!(d.warnings.is_empty(), "{:?}", d.warnings);
}
