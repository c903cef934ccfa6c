use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fix_review::app::BackgroundMessage;
use fix_review::endpoint::{parse_fix_list, Dispatcher, Request};
use fix_review::fix::{cascade, FixId, FixList, FixMode, FixRecord};
use fix_review::session::{ReviewMode, SessionController};
use fix_review::ui::{self, App};
use fix_review::viewer::BufferViewer;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

struct NullDispatcher;

impl Dispatcher for NullDispatcher {
    fn dispatch(&self, _request: Request) {}
}

/// Repeating 0,1,2,3,1,2,0,... depth pattern
fn synthetic_records(count: usize) -> Vec<FixRecord> {
    const DEPTHS: [usize; 7] = [0, 1, 2, 3, 1, 2, 1];
    (0..count)
        .map(|i| FixRecord::new(format!("{i}"), DEPTHS[i % DEPTHS.len()], FixMode::Cast))
        .collect()
}

fn synthetic_fix_list_json(roots: usize) -> String {
    let entries: Vec<serde_json::Value> = (0..roots)
        .map(|r| {
            let children: Vec<serde_json::Value> = (0..4)
                .map(|c| serde_json::json!({ "id": format!("{r}-{c}"), "mode": "CHECK_ARITH" }))
                .collect();
            serde_json::json!({ "id": format!("{r}"), "mode": "CAST", "children": children })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

fn bench_cascade(c: &mut Criterion) {
    let records = synthetic_records(10_000);
    let root = FixId::new("0");
    // index 9999 sits at depth 3
    let deep = FixId::new("9999");

    c.bench_function("cascade_activate_root", |b| {
        b.iter(|| black_box(cascade(&records, black_box(&root), ReviewMode::Manual)));
    });

    let mut list = FixList::new("bench.c", records.clone());
    list.activate_all();
    c.bench_function("toggle_deactivate_leaf_chain", |b| {
        b.iter(|| {
            black_box(list.toggle(black_box(&deep), ReviewMode::Manual));
            black_box(list.toggle(black_box(&deep), ReviewMode::Manual));
        });
    });
}

fn bench_parse_fix_list(c: &mut Criterion) {
    let body = synthetic_fix_list_json(2_000);
    c.bench_function("parse_fix_list_nested", |b| {
        b.iter(|| black_box(parse_fix_list(black_box(&body)).map(|r| r.len())));
    });
}

fn bench_render_frame(c: &mut Criterion) {
    let session = SessionController::new(NullDispatcher, BufferViewer::new());
    let mut app = App::new(session, "http://localhost:9026/");
    app.select_mode(ReviewMode::Manual);
    app.session.open_file("bench.c");

    let source: Vec<String> = (0..5_000).map(|i| format!("int v{i} = a{i} + b{i};")).collect();
    app.session.handle(BackgroundMessage::SourceLoaded {
        file: "bench.c".to_string(),
        ticket: 1,
        result: Ok(source.join("\n")),
    });
    app.session.handle(BackgroundMessage::FixListLoaded {
        file: "bench.c".to_string(),
        ticket: 1,
        result: Ok(synthetic_records(2_000)),
    });

    let backend = TestBackend::new(140, 42);
    let mut terminal = Terminal::new(backend).expect("terminal should initialize");

    c.bench_function("render_frame_main", |b| {
        b.iter(|| {
            terminal
                .draw(|frame| ui::render(frame, &app))
                .expect("draw should succeed");
        });
    });
}

criterion_group!(
    perf_core,
    bench_cascade,
    bench_parse_fix_list,
    bench_render_frame
);
criterion_main!(perf_core);
