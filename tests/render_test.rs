use orion::{Data, Orion, OrionError, OrionOptions, Value};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn engine() -> Orion {
    init_tracing();
    Orion::new(
        OrionOptions::new()
            .views_path("tests/views")
            .directives_path("tests/resources/directives")
            .debug(true),
    )
}

#[derive(Serialize)]
struct HomePage {
    title: String,
    count: i64,
}

#[derive(Serialize)]
struct Item {
    label: &'static str,
}

#[test]
fn test_layout_with_sections_and_include() {
    let page = HomePage {
        title: "Welcome".to_string(),
        count: 3,
    };
    let html = engine().render("pages.home", &page).expect("Failed to render home");

    assert!(html.contains("<title>Home</title>"));
    assert!(html.contains("<h1>Welcome</h1>"));
    assert!(html.contains("<p>Hello, Guest!</p>"));
    assert!(html.contains("<p>3 items</p>"));
    assert!(!html.contains("empty"));
    assert!(!html.contains('@'));
}

#[test]
fn test_else_branch() {
    let page = HomePage {
        title: "Nothing".to_string(),
        count: 0,
    };
    let html = engine().render("pages.home", &page).expect("Failed to render home");
    assert!(html.contains("<p>empty</p>"));
    assert!(!html.contains("items"));
}

#[test]
fn test_foreach_with_escaping() {
    #[derive(Serialize)]
    struct ListPage {
        items: Vec<Item>,
    }

    let page = ListPage {
        items: vec![Item { label: "A" }, Item { label: "B & C" }],
    };
    let html = engine().render("pages.list", &page).expect("Failed to render list");
    assert_eq!(html, "<ul>\n<li>A</li>\n<li>B &amp; C</li>\n</ul>\n");
}

#[test]
fn test_file_and_app_directives() {
    let engine = engine();
    engine
        .directive("year", |_: &[String]| "2026".to_string())
        .expect("Failed to register directive");

    let names: Vec<String> = engine
        .directives()
        .iter()
        .map(|(name, _)| name.to_string())
        .collect();
    assert_eq!(names, ["datetime", "money", "brand", "year"]);

    let html = engine.render("pages.brand", &Data::new()).unwrap();
    assert_eq!(html, "<footer>Orion &copy; 2026</footer>\n");

    let compiled = engine.compile("@money($total, 2)", &Data::new()).unwrap();
    assert_eq!(compiled, "<?php echo number_format($total, 2); ?>");
}

#[test]
fn test_nested_include_sees_caller_data() {
    let mut data = Data::new();
    data.insert("title".to_string(), Value::from("Card"));
    data.insert("name".to_string(), Value::from("Ann"));

    let html = engine().render("partials.card", &data).unwrap();
    assert_eq!(html, "<div class=\"card\">Card: <p>Hello, Ann!</p>\n</div>\n");
}

#[test]
fn test_include_cycle_is_reported() {
    let err = engine().compile_view("pages.cycle", &Data::new()).unwrap_err();
    match err {
        OrionError::IncludeCycle(chain) => assert_eq!(chain, "cycle.a -> cycle.b -> cycle.a"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_view() {
    let err = engine().render("pages.missing", &Data::new()).unwrap_err();
    assert!(matches!(err, OrionError::ViewNotFound(view) if view == "pages.missing"));
}

#[test]
fn test_data_must_be_a_map() {
    let err = engine().render("pages.brand", &vec![1, 2]).unwrap_err();
    assert!(matches!(err, OrionError::InvalidData(_)));
}
