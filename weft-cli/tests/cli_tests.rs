use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use weft_cli::{Config, Format, RenderArgs, bundle_cmd, compile_cmd, render_cmd, unparse_cmd};
use weft_template::CompileOptions;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn compile_prints_tree_and_partial_names() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "page.weft", "<p>{{name}}</p>{{>footer}}");
    let out = compile_cmd(&input, &CompileOptions::default()).expect("compile");
    let json: serde_json::Value = serde_json::from_str(&out).expect("json");
    assert_eq!(json["partial_names"], serde_json::json!(["footer"]));
    assert_eq!(json["nodes"].as_array().map(Vec::len), Some(2));
}

#[test]
fn compile_reports_the_file_on_error() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "bad.weft", "{{#open}}");
    let err = compile_cmd(&input, &CompileOptions::default()).unwrap_err();
    assert!(format!("{err:#}").contains("bad.weft"));
}

#[test]
fn unparse_round_trips() {
    let dir = TempDir::new().expect("tempdir");
    let src = "<ul>{{#xs}}<li class=\"{{c}}\">{{.}}</li>{{/xs}}</ul>";
    let input = write(&dir, "list.weft", src);
    assert_eq!(unparse_cmd(&input, &CompileOptions::default()).expect("unparse"), src);
}

#[test]
fn render_uses_data_and_bundle_partials() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "page.weft", "<ul>{{#items}}{{>row}}{{/items}}</ul>");
    let data = write(&dir, "data.json", r#"{"items": [{"name": "a"}, {"name": "b"}]}"#);
    let partials = write(
        &dir,
        "parts.weft",
        r#"<template name="row"><li>{{name}}</li></template>"#,
    );
    let args = RenderArgs {
        data: Some(data),
        partials: Some(partials),
        ..RenderArgs::default()
    };
    let out = render_cmd(&input, &args, &Config::default()).expect("render");
    assert_eq!(out, "<ul><li>a</li><li>b</li></ul>");
}

#[test]
fn render_formats() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "slot.weft", "<div>{{$body}}</div>");

    let vtree = RenderArgs {
        format: Format::Vtree,
        host: Some("app".into()),
        ..RenderArgs::default()
    };
    let out = render_cmd(&input, &vtree, &Config::default()).expect("vtree");
    let json: serde_json::Value = serde_json::from_str(&out).expect("json");
    let handoff = &json[0]["Element"]["children"][0]["Handoff"];
    assert_eq!(handoff["name"], "body");
    assert_eq!(handoff["host"], "app");

    let html = RenderArgs {
        host: Some("app".into()),
        ..RenderArgs::default()
    };
    let out = render_cmd(&input, &html, &Config::default()).expect("html");
    assert_eq!(out, "<div></div>");

    let trace = RenderArgs {
        format: Format::Trace,
        ..RenderArgs::default()
    };
    let out = render_cmd(&input, &trace, &Config::default()).expect("trace");
    assert!(out.starts_with("open div\n"));
}

#[test]
fn render_rejects_bad_data() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(&dir, "t.weft", "{{x}}");
    let data = write(&dir, "data.json", "{not json");
    let args = RenderArgs {
        data: Some(data),
        ..RenderArgs::default()
    };
    let err = render_cmd(&input, &args, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("invalid JSON"));
}

#[test]
fn config_tables_feed_options() {
    let dir = TempDir::new().expect("tempdir");
    let path = write(
        &dir,
        "weft.toml",
        r#"
[compile]
elide_standalone = false
open_delimiter = "<%"
close_delimiter = "%>"

[render]
max_partial_depth = 2
"#,
    );
    let config = Config::load(Some(&path)).expect("config");
    assert!(!config.compile.elide_standalone);
    assert_eq!(config.compile.open_delimiter, "<%");
    assert_eq!(config.render.max_partial_depth, 2);
    assert!(config.render.validate_updates);

    let input = write(&dir, "t.weft", "<%name%>");
    let data = write(&dir, "d.json", r#"{"name": "x"}"#);
    let args = RenderArgs {
        data: Some(data),
        ..RenderArgs::default()
    };
    assert_eq!(render_cmd(&input, &args, &config).expect("render"), "x");
}

#[test]
fn empty_config_is_default() {
    assert_eq!(Config::parse("").expect("parse"), Config::default());
}

#[test]
fn bundle_lists_names() {
    let dir = TempDir::new().expect("tempdir");
    let input = write(
        &dir,
        "b.weft",
        "<template name=\"a\">1</template>\n<template name=\"b\">2</template>\n",
    );
    assert_eq!(bundle_cmd(&input).expect("bundle"), "a\nb\n");
}
