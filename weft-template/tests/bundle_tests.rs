use weft_template::{Bundle, BundleError, CompileOptions};

#[test]
fn splits_named_templates() {
    let src = r#"
<!-- shared pieces -->
<template name="row">
<li>{{name}}</li>
</template>

<template name="list" elide="false" delimiters="<% %>">
<ul><%#items%><%>row%><%/items%></ul>
</template>
"#;

    let bundle = Bundle::parse(src).expect("parse ok");
    assert_eq!(bundle.names().collect::<Vec<_>>(), vec!["row", "list"]);

    let row = bundle.get("row").expect("row");
    assert_eq!(row.content, "<li>{{name}}</li>\n");

    let list = bundle.get("list").expect("list");
    let opts = list.compile_options(&CompileOptions::default());
    assert!(!opts.elide_standalone);
    assert_eq!(opts.open_delimiter, "<%");
    assert_eq!(opts.close_delimiter, "%>");
}

#[test]
fn template_needs_a_name() {
    let err = Bundle::parse("<template id=\"x\">a</template>").unwrap_err();
    assert!(matches!(err, BundleError::MissingName { line: 1 }));
}

#[test]
fn duplicate_names_are_rejected() {
    let src = "<template name=\"a\">1</template><template name=\"a\">2</template>";
    assert!(matches!(
        Bundle::parse(src),
        Err(BundleError::Duplicate(name)) if name == "a"
    ));
}

#[test]
fn unterminated_block_is_a_syntax_error() {
    assert!(matches!(
        Bundle::parse("<template name=\"a\">never closed"),
        Err(BundleError::Syntax(_))
    ));
}
