use std::rc::Rc;

use serde_json::json;
use weft_render::{
    CollectingLogger, Context, Partials, RenderOptions, RenderSettings, Template, Warning,
    compile_bundle,
};
use weft_template::CompileOptions;

fn partials(entries: &[(&str, &str)]) -> Partials {
    entries
        .iter()
        .map(|(name, src)| (name.to_string(), Template::compile(src).expect("compile")))
        .collect()
}

#[test]
fn missing_partial_renders_nothing_and_warns_once() {
    let tpl = Template::compile("a{{>nope}}b").expect("compile");
    let logger = Rc::new(CollectingLogger::new());
    let settings = RenderSettings::default().with_logger(logger.clone());
    let out = tpl.to_markup_string_with(&Context::new(json!({})), &settings);
    assert_eq!(out, "ab");
    let warnings = logger.take();
    assert_eq!(
        warnings,
        vec![Warning::MissingPartial {
            name: "nope".into()
        }]
    );
    assert!(warnings[0].is_lookup());
}

#[test]
fn partials_render_with_the_current_context() {
    let tpl = Template::compile("<ul>{{#items}}{{>row}}{{/items}}</ul>").expect("compile");
    tpl.attach_partials(partials(&[("row", "<li>{{name}}</li>")]));
    let out = tpl.to_markup_string(&Context::new(json!({
        "items": [{"name": "a"}, {"name": "b"}]
    })));
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn partials_may_be_attached_after_use_is_compiled() {
    let outer = Template::compile("[{{>inner}}]").expect("compile");
    assert_eq!(outer.missing_partials(), vec!["inner"]);
    let inner = Template::compile("{{>leaf}}").expect("compile");
    outer.attach_partials([("inner".to_string(), inner.clone())]);
    inner.attach_partials(partials(&[("leaf", "x")]));
    assert!(outer.missing_partials().is_empty());
    assert_eq!(outer.to_markup_string(&Context::new(json!({}))), "[x]");
}

#[test]
fn call_partials_override_attached_ones() {
    let tpl = Template::compile("{{>p}}").expect("compile");
    tpl.attach_partials(partials(&[("p", "attached")]));
    let settings = RenderSettings::default().with_partials(partials(&[("p", "explicit")]));
    assert_eq!(
        tpl.to_markup_string_with(&Context::new(json!({})), &settings),
        "explicit"
    );
}

#[test]
fn recursive_partial_matches_manual_unrolling() {
    let tree = json!({
        "name": "a",
        "kids": [{"name": "b", "kids": [{"name": "c", "kids": []}]}]
    });
    let tpl = Template::compile("{{>node}}").expect("compile");
    let settings = RenderSettings::default()
        .with_partials(partials(&[("node", "{{name}}{{#kids}}({{>node}}){{/kids}}")]));
    let recursive = tpl.to_markup_string_with(&Context::new(tree.clone()), &settings);

    let unrolled = Template::compile(
        "{{name}}{{#kids}}({{name}}{{#kids}}({{name}}){{/kids}}){{/kids}}",
    )
    .expect("compile");
    assert_eq!(recursive, "a(b(c))");
    assert_eq!(recursive, unrolled.to_markup_string(&Context::new(tree)));
}

#[test]
fn self_referential_partial_stops_at_the_depth_limit() {
    let tpl = Template::compile("{{>loop}}").expect("compile");
    let logger = Rc::new(CollectingLogger::new());
    let settings = RenderSettings::default()
        .with_partials(partials(&[("loop", "x{{>loop}}")]))
        .with_options(RenderOptions {
            max_partial_depth: 3,
            ..RenderOptions::default()
        })
        .with_logger(logger.clone());
    let out = tpl.to_markup_string_with(&Context::new(json!({})), &settings);
    assert_eq!(out, "xxx");
    assert_eq!(
        logger.take(),
        vec![Warning::PartialDepth {
            name: "loop".into(),
            limit: 3
        }]
    );
}

#[test]
fn bundles_compile_to_named_partials() {
    let src = r#"
<template name="row"><li>{{name}}</li></template>
<template name="list" delimiters="<% %>"><ul><%#items%><%>row%><%/items%></ul></template>
"#;
    let bundle = compile_bundle(src, &CompileOptions::default()).expect("bundle");
    let list = bundle.get("list").expect("list").clone();
    assert_eq!(list.partial_names(), ["row".to_string()]);

    let settings = RenderSettings::default().with_partials(bundle);
    let ctx = Context::new(json!({"items": [{"name": "a"}]}));
    let out = list.to_markup_string_with(&ctx, &settings);
    assert_eq!(out, "<ul><li>a</li></ul>");
}

#[test]
fn bundle_compile_errors_name_the_template() {
    let err = compile_bundle(
        r#"<template name="bad">{{#open}}</template>"#,
        &CompileOptions::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("bad"));
}
