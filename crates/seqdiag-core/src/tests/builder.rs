use crate::*;

fn diagram(src: &str) -> Diagram {
    parse_and_build(src).unwrap()
}

fn names(d: &Diagram) -> Vec<&str> {
    d.participants.iter().map(|p| p.id.as_str()).collect()
}

fn activations(d: &Diagram, name: &str) -> Vec<(usize, usize, usize)> {
    participant(d, name)
        .activations
        .iter()
        .map(|a| (a.level, a.start, a.end))
        .collect()
}

fn participant<'d>(d: &'d Diagram, name: &str) -> &'d Participant {
    d.participants
        .iter()
        .find(|p| p.id == name)
        .unwrap_or_else(|| panic!("no participant {name}"))
}

fn edge(d: &Diagram, order: usize) -> (&str, &str, MessageDir) {
    let m = &d.messages[order];
    (d.participant_name(m.from), d.participant_name(m.to), m.dir)
}

#[test]
fn columns_follow_first_encounter_order() {
    let d = diagram("{ A -> B; C; B -> D; A -> C }");
    assert_eq!(names(&d), vec!["A", "B", "C", "D"]);
    for (column, participant) in d.participants.iter().enumerate() {
        assert_eq!(participant.column, column);
    }
}

#[test]
fn group_members_are_placed_contiguously() {
    let d = diagram("{ A -> C; group { label = backend; B; C; } D; }");
    assert_eq!(names(&d), vec!["A", "C", "B", "D"]);
    assert_eq!(d.groups.len(), 1);
    let group = &d.groups[0];
    assert_eq!(group.label.as_deref(), Some("backend"));
    assert_eq!(group.members, vec![ParticipantId(1), ParticipantId(2)]);
    assert_eq!((group.first_column(), group.column_count()), (1, 2));
    assert_eq!(d.participants[1].group, Some(GroupId(0)));
    assert_eq!(d.participants[0].group, None);
    // Message endpoints follow the final column assignment.
    assert_eq!(edge(&d, 0), ("A", "C", MessageDir::Forward));
    assert_eq!(d.messages[0].to, ParticipantId(1));
}

#[test]
fn empty_groups_are_dropped() {
    let d = diagram("{ group { color = red } group { A } }");
    assert_eq!(d.groups.len(), 1);
    assert_eq!(d.participants[0].group, Some(GroupId(0)));
}

#[test]
fn participant_in_two_groups_is_fatal() {
    let err = parse_and_build("{ group { A; B } group { C; A } }").unwrap_err();
    assert_eq!(
        err,
        Error::ParticipantInTwoGroups {
            participant: "A".to_string()
        }
    );
}

#[test]
fn redeclaring_a_member_in_its_own_group_is_fine() {
    let d = diagram("{ group g { A; A [label = Alice] } }");
    assert_eq!(d.groups[0].members, vec![ParticipantId(0)]);
    assert_eq!(d.participants[0].label, "Alice");
}

#[test]
fn statements_are_validated_against_their_context() {
    let err = parse_and_build("{ group { A -> B } }").unwrap_err();
    assert_eq!(
        err,
        Error::UnexpectedStatement {
            kind: "edge",
            context: "group"
        }
    );

    let err = parse_and_build("{ A -> B { label = x } }").unwrap_err();
    assert_eq!(
        err,
        Error::UnexpectedStatement {
            kind: "attribute",
            context: "edge block"
        }
    );

    let err = parse_and_build("{ alt { group { A } } }").unwrap_err();
    assert_eq!(
        err,
        Error::UnexpectedStatement {
            kind: "group",
            context: "fragment"
        }
    );
}

#[test]
fn both_edge_expands_around_nested_block() {
    let d = diagram(
        r#"{
  A => B [label = "req", return = "resp", note = "call"] {
    B -> C;
  }
}"#,
    );
    assert_eq!(d.messages.len(), 3);
    assert_eq!(edge(&d, 0), ("A", "B", MessageDir::Forward));
    assert_eq!(edge(&d, 1), ("B", "C", MessageDir::Forward));
    assert_eq!(edge(&d, 2), ("A", "B", MessageDir::Back));

    let call = &d.messages[0];
    assert_eq!(call.label.as_deref(), Some("req"));
    assert_eq!(call.style, LineStyle::Solid);
    assert_eq!(call.right_note.as_deref(), Some("call"));

    let reply = &d.messages[2];
    assert_eq!(reply.label.as_deref(), Some("resp"));
    assert_eq!(reply.style, LineStyle::Dashed);
    assert_eq!(reply.right_note, None);
    assert_eq!(reply.heading(), Heading::Left);
    assert_eq!(d.participant_name(reply.receiver()), "A");
}

#[test]
fn chained_edges_expand_greedily() {
    let d = diagram("{ A => B => C [label = x] }");
    let got: Vec<_> = (0..d.messages.len()).map(|i| edge(&d, i)).collect();
    assert_eq!(
        got,
        vec![
            ("A", "B", MessageDir::Forward),
            ("B", "C", MessageDir::Forward),
            ("B", "C", MessageDir::Back),
            ("A", "B", MessageDir::Back),
        ]
    );
    assert_eq!(d.messages[1].label.as_deref(), Some("x"));
}

#[test]
fn arrow_tokens_set_style_and_async() {
    let d = diagram("{ A -->> B; B <<- A; A <-- B }");
    assert_eq!(d.messages[0].style, LineStyle::Dashed);
    assert!(d.messages[0].asynchronous);
    assert_eq!(d.messages[1].dir, MessageDir::Back);
    assert!(d.messages[1].asynchronous);
    assert_eq!(d.messages[1].heading(), Heading::Right);
    assert_eq!(d.messages[2].style, LineStyle::Dashed);
    assert_eq!(d.messages[2].heading(), Heading::Left);
}

#[test]
fn unknown_dir_warns_and_keeps_forward() {
    let d = diagram("{ A -> B [dir = sideways] }");
    assert_eq!(d.messages[0].dir, MessageDir::Forward);
    assert_eq!(
        d.warnings,
        vec![Warning::UnknownEdgeDirection {
            token: "sideways".to_string()
        }]
    );
}

#[test]
fn one_way_self_message_does_not_activate() {
    let d = diagram("{ A -> A }");
    assert!(!d.messages[0].activate);
    assert_eq!(d.messages[0].heading(), Heading::SelfLoop);
    assert_eq!(activations(&d, "A"), vec![(0, 0, 0)]);

    let d = diagram("{ A => A }");
    assert!(d.messages[0].activate);
    assert_eq!(activations(&d, "A"), vec![(0, 0, 1), (1, 0, 0)]);
}

#[test]
fn failed_message_never_activates() {
    let d = diagram("{ A -> B [failed, activate] }");
    assert!(d.messages[0].failed);
    assert!(!d.messages[0].activate);
    assert!(activations(&d, "B").is_empty());
}

#[test]
fn activations_follow_call_stack_rule() {
    let d = diagram(
        r#"{
  A; B; C;
  A -> B [label = "1"];
  B -> C [label = "2"];
  C -> B [label = "3", return];
  B -> A [label = "4"];
}"#,
    );
    assert_eq!(names(&d), vec!["A", "B", "C"]);
    let orders: Vec<_> = d.messages.iter().map(|m| m.order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);

    assert_eq!(activations(&d, "A"), vec![(0, 0, 3), (1, 3, 3)]);
    assert_eq!(activations(&d, "B"), vec![(0, 0, 3), (1, 2, 3)]);
    assert_eq!(activations(&d, "C"), vec![(0, 1, 3)]);
}

#[test]
fn replies_close_activations() {
    let d = diagram("{ A => B { B => C } A -> B; }");
    // rows: A->B, B->C, C<-B, B<-A, A->B
    assert_eq!(activations(&d, "B"), vec![(0, 0, 2), (0, 4, 4)]);
    assert_eq!(activations(&d, "C"), vec![(0, 1, 1)]);
    assert_eq!(participant(&d, "B").activation_level_at(1), Some(0));
    assert_eq!(participant(&d, "B").activation_level_at(3), None);
}

#[test]
fn noactivate_suppresses_count_change() {
    let d = diagram("{ A -> B [noactivate]; B -> C }");
    assert!(activations(&d, "B").is_empty());
    assert_eq!(activations(&d, "C"), vec![(0, 1, 1)]);
}

#[test]
fn activated_participants_start_active() {
    let d = diagram("{ C [activated]; A -> B }");
    assert_eq!(activations(&d, "C"), vec![(0, 0, 0)]);
    assert_eq!(activations(&d, "A"), vec![(0, 0, 0)]);
}

#[test]
fn stray_return_clamps_and_warns() {
    let d = diagram("{ A <- B }");
    assert!(activations(&d, "B").is_empty());
    assert_eq!(
        d.warnings,
        vec![Warning::UnbalancedReturn {
            participant: "B".to_string(),
            row: 0
        }]
    );
}

#[test]
fn activation_none_disables_activations() {
    let d = diagram("{ activation = none; A -> B; B -> C }");
    assert!(!d.settings.activation);
    assert!(d.participants.iter().all(|p| p.activations.is_empty()));
}

#[test]
fn separators_take_rows_but_not_orders() {
    let d = diagram("{ A -> B; === mid ===; B -> A; ... later ... }");
    assert_eq!(d.row_count(), 4);
    assert_eq!(d.messages[1].order, 1);
    assert_eq!(d.messages[1].row, 2);
    assert_eq!(d.separators[0].row, 1);
    assert_eq!(d.separators[1].row, 3);
    assert_eq!(d.separators[0].label, "mid");
    assert!(d.message_at_row(1).is_none());
    assert_eq!(d.message_at_row(2), Some(&d.messages[1]));

    // Activations stay contiguous across the separator row.
    assert_eq!(activations(&d, "A"), vec![(0, 0, 3), (1, 2, 3)]);
    assert_eq!(activations(&d, "B"), vec![(0, 0, 3)]);
}

#[test]
fn nested_fragments_get_xlevels_and_spans() {
    let d = diagram(
        r#"{
  A -> B;
  alt [label = outer] {
    B -> C;
    loop {
      label = inner;
      C -> D; D -> C; C -> B;
    }
    B -> A;
  }
  A -> B;
}"#,
    );
    assert_eq!(d.fragments.len(), 2);
    let outer = &d.fragments[0];
    let inner = &d.fragments[1];
    assert_eq!((outer.kind, outer.xlevel), (ast::FragmentKind::Alt, 1));
    assert_eq!((inner.kind, inner.xlevel), (ast::FragmentKind::Loop, 2));
    assert_eq!(outer.label.as_deref(), Some("outer"));
    assert_eq!(inner.label.as_deref(), Some("inner"));
    assert_eq!((outer.first_row, outer.last_row), (1, 5));
    assert_eq!((inner.first_row, inner.last_row), (2, 4));
    assert_eq!((outer.first_column, outer.last_column), (0, 3));
    assert_eq!((inner.first_column, inner.last_column), (1, 3));
    assert_eq!(outer.messages.len(), 5);
    assert_eq!(inner.messages, vec![MessageId(2), MessageId(3), MessageId(4)]);
}

#[test]
fn fragments_opening_on_the_same_row_are_stacked() {
    let d = diagram(
        "{ A -> B; A -> B; A -> B; A -> B; A -> B; alt { loop { A -> B; } B -> A; } }",
    );
    let alt = &d.fragments[0];
    let inner = &d.fragments[1];
    assert_eq!((alt.first_row, inner.first_row), (5, 5));
    let mut tops = vec![alt.ylevel_top, inner.ylevel_top];
    tops.sort();
    assert_eq!(tops, vec![1, 2]);
    assert_eq!(inner.ylevel_top, 1);
    assert_eq!(alt.ylevel_top, 2);
    assert_eq!((alt.ylevel_bottom, inner.ylevel_bottom), (1, 1));
}

#[test]
fn empty_fragment_is_skipped_with_warning() {
    let d = diagram("{ A; loop { B; } }");
    assert!(d.fragments.is_empty());
    assert_eq!(
        d.warnings,
        vec![Warning::EmptyFragment {
            fragment: "loop".to_string(),
            line: 1,
            column: 6,
        }]
    );
}

#[test]
fn autonumber_prefixes_labels() {
    let d = diagram("{ autonumber = true; A -> B [label = hi]; B -> A }");
    assert_eq!(d.messages[0].label.as_deref(), Some("1. hi"));
    assert_eq!(d.messages[1].label.as_deref(), Some("2. "));
}

#[test]
fn deprecated_edge_height_maps_to_span_height() {
    let d = diagram("{ edge_height = 20; A -> B }");
    assert_eq!(d.settings.span_height, Some(20.0));
    assert_eq!(
        d.warnings,
        vec![Warning::DeprecatedAttribute {
            name: "edge_height".to_string(),
            replacement: "span_height".to_string()
        }]
    );
}

#[test]
fn defaults_and_classes_seed_attributes() {
    let d = diagram(
        r#"{
  class hot [color = red, style = dotted];
  node [color = blue];
  edge [style = dashed];
  A; B [class = hot];
  A -> B;
  A -> B [class = hot];
  A -> B [class = missing];
}"#,
    );
    assert_eq!(d.participants[0].color.as_deref(), Some("blue"));
    assert_eq!(d.participants[1].color.as_deref(), Some("red"));
    assert_eq!(d.messages[0].style, LineStyle::Dashed);
    assert_eq!(d.messages[1].style, LineStyle::Dotted);
    assert_eq!(d.messages[1].color.as_deref(), Some("red"));
    // `style` is not a participant attribute, so the class application warns once.
    assert_eq!(
        d.warnings,
        vec![
            Warning::UnknownAttribute {
                target: "node".to_string(),
                name: "style".to_string()
            },
            Warning::UnknownClass {
                name: "missing".to_string()
            },
        ]
    );
}

#[test]
fn plugins_and_unknown_attributes_warn() {
    let d = diagram("{ plugin autoclass; A [shape = box]; }");
    assert_eq!(
        d.warnings,
        vec![
            Warning::UnsupportedPlugin {
                name: "autoclass".to_string()
            },
            Warning::UnknownAttribute {
                target: "node".to_string(),
                name: "shape".to_string()
            },
        ]
    );
}

#[test]
fn diagram_settings_are_read() {
    let d = diagram(
        r##"{
  node_width = 100; span_width = 40; edge_length = 300;
  default_note_color = "#eeeeee"; shadow_style = none;
  graph [default_fontsize = 14];
}"##,
    );
    let s = &d.settings;
    assert_eq!(s.node_width, Some(100.0));
    assert_eq!(s.span_width, Some(40.0));
    assert_eq!(s.edge_length, Some(300.0));
    assert_eq!(s.default_note_color, "#eeeeee");
    assert_eq!(s.shadow_style, ShadowStyle::None);
    assert_eq!(s.default_fontsize, Some(14.0));
    assert!(d.warnings.is_empty());
}

#[test]
fn builds_are_independent() {
    let src = "{ A -> B; group { C } }";
    let first = diagram(src);
    let _other = diagram("{ X -> Y -> Z; group { Y } }");
    let second = diagram(src);
    assert_eq!(first, second);
}

#[test]
fn model_serializes_to_json() {
    let d = diagram("{ A -> B [label = hi]; === s === }");
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["messages"][0]["from"], 0);
    assert_eq!(json["messages"][0]["label"], "hi");
    assert_eq!(json["rows"][1]["kind"], "separator");
    assert_eq!(json["rows"][1]["id"], 0);
}

#[test]
fn declarations_apply_wherever_they_are_written() {
    let d = diagram(
        r#"{
  A -> B [class = hot];
  C;
  class hot [color = red];
  node [textcolor = gray];
}"#,
    );
    assert_eq!(d.messages[0].color.as_deref(), Some("red"));
    assert!(
        d.participants
            .iter()
            .all(|p| p.textcolor.as_deref() == Some("gray"))
    );
    assert!(d.warnings.is_empty());
}
