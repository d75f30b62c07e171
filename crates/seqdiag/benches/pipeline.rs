use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use seqdiag::render::{LayoutOptions, SvgRenderOptions, layout_diagram, render_layout_svg};

fn fixtures() -> Vec<(&'static str, String)> {
    let mut chain = String::from("seqdiag {\n");
    for i in 0..200 {
        chain.push_str(&format!(
            "  P{} -> P{} [label = \"step {i}\"];\n",
            i % 12,
            (i * 7 + 3) % 12
        ));
        if i % 25 == 0 {
            chain.push_str("  === checkpoint ===\n");
        }
    }
    chain.push('}');

    vec![
        (
            "small",
            r#"seqdiag {
  browser -> webserver [label = "GET /index.html"];
  browser <-- webserver;
  browser => webserver [label = "POST /login"] {
    webserver => database;
  }
}"#
            .to_string(),
        ),
        (
            "fragments",
            r#"seqdiag {
  A -> B;
  alt [label = "cached"] {
    B -> C [diagonal];
    loop { C -> D; D -> C [failed]; C -> C [note = "retry"]; }
  }
  ... later ...
  B -> A;
}"#
            .to_string(),
        ),
        ("chain_200", chain),
    ]
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_and_build");
    for (name, input) in fixtures() {
        group.bench_function(name, |b| {
            b.iter(|| seqdiag::parse_and_build(&input).unwrap())
        });
    }
    group.finish();
}

fn bench_render_svg(c: &mut Criterion) {
    let layout = LayoutOptions::default();
    let svg_opts = SvgRenderOptions::default();

    let mut group = c.benchmark_group("render_svg");
    for (name, input) in fixtures() {
        let diagram = seqdiag::parse_and_build(&input).unwrap();
        group.bench_function(name, |b| {
            b.iter_batched(
                || &diagram,
                |diagram| {
                    let out = layout_diagram(diagram, &layout).unwrap();
                    let _svg = render_layout_svg(&out, &svg_opts);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_render_svg);
criterion_main!(benches);
