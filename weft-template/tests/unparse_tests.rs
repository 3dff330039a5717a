use weft_template::{compile, unparse};

const SOURCES: &[&str] = &[
    "<ul>\n  {{#items}}\n  <li class=\"item {{state}}\">{{name}}</li>\n  {{/items}}\n</ul>\n",
    "<div class=\"x\" {{#cond}}data-y=\"z\"{{/cond}}>{{{html}}}</div>",
    "<div {{#on}}hidden{{/on}} id=\"a\"></div>",
    "<!-- note {{who}} -->{{! plain }}{{>row}}",
    "<svg viewBox=\"0 0 1 1\"><circle r=\"1\"/></svg><p>after</p>",
    "{{=<% %>=}}<b><%x%></b>",
    "<table><tbody><tr><td>{{a}}</td></tr></tbody></table>",
    "{{$body}}<em>default</em>{{/body}}{{!@user}}",
    "<script>if (a < b) { x(); }</script>",
    "<input type=\"checkbox\" checked value='say \"hi\"'>",
    "<!DOCTYPE html>\n<p>{{^list}}empty{{/list}}</p>",
];

#[test]
fn compile_unparse_compile_is_stable() {
    for src in SOURCES {
        let first = compile(src).expect("first compile");
        let text = unparse(&first.nodes);
        let second = compile(&text).expect("second compile");
        assert_eq!(first, second, "source: {src}\nunparsed: {text}");
    }
}

#[test]
fn simple_sources_come_back_verbatim() {
    for src in [
        "<p>{{#a}}x{{/a}}</p>",
        "Begin.\n{{#flag}}\nX\n{{/flag}}\nEnd.\n",
        "<a href=\"/u/{{id}}\">{{&name}}</a>",
    ] {
        assert_eq!(unparse(&compile(src).expect("compile").nodes), src);
    }
}
