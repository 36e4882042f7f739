use orion::{Data, MemorySource, Orion, OrionOptions, TemplateSource, Value, directive, embed_views};

fn views() -> MemorySource {
    embed_views!("tests/views/**/*.orion.php")
}

#[test]
fn test_embedded_views_resolve_by_dotted_name() {
    let source = views();
    assert!(source.len() >= 8);

    let layout = source.load("layouts.app").unwrap().expect("layout should be embedded");
    assert!(layout.contains("@yield('content')"));
    assert!(source.load("pages.nope").unwrap().is_none());
}

#[test]
fn test_render_from_embedded_views() {
    let engine = Orion::new(OrionOptions::new().directives_path("tests/resources/directives"))
        .with_source(views());

    let mut data = Data::new();
    data.insert("title".to_string(), Value::from("Embedded"));
    data.insert("count".to_string(), Value::Int(1));

    let html = engine.render("pages.home", &data).unwrap();
    assert!(html.contains("<h1>Embedded</h1>"));
    assert!(html.contains("<p>1 items</p>"));
}

#[test]
fn test_embedded_views_with_custom_extension() {
    let source = embed_views!("tests/resources/mail/*.tpl").with_extension(".tpl");
    assert_eq!(source.len(), 1);

    let engine = Orion::new(OrionOptions::new().directives_path("/nonexistent/orion/directives"))
        .with_source(source);
    let html = engine
        .render("welcome", &Data::from([("name".to_string(), Value::from("Ann"))]))
        .unwrap();
    assert_eq!(html, "Welcome, Ann!\n");
}

#[test]
fn test_embedded_directive_definitions() {
    let definitions = directive::load(&[include_str!("resources/directives/03-brand.xml")]);
    let mut source = MemorySource::new();
    source.insert("footer", "<p>@brand</p>");

    let engine = Orion::new(OrionOptions::new().directives_path("/nonexistent/orion/directives"))
        .with_source(source)
        .with_directives(definitions);
    assert_eq!(engine.render("footer", &Data::new()).unwrap(), "<p>Orion</p>");
}
