use std::rc::Rc;

use serde_json::json;
use weft_dom::patch_children;
use weft_render::{CollectingLogger, Context, RenderSettings, Template};

#[test]
fn update_patches_reproduce_the_new_tree() {
    let tpl =
        Template::compile("<ul>{{#items}}<li>{{.}}</li>{{/items}}</ul>{{^items}}none{{/items}}")
            .expect("compile");
    let logger = Rc::new(CollectingLogger::new());
    let settings = RenderSettings::default().with_logger(logger.clone());

    let old = tpl.to_virtual_tree_with(&Context::new(json!({"items": ["a", "b"]})), &settings);
    let (new, patches) =
        tpl.update_with(&old, &Context::new(json!({"items": ["a", "c", "d"]})), &settings);
    assert!(!patches.is_empty());
    assert_eq!(patch_children(&old, &patches), new);

    let (emptied, patches) = tpl.update_with(&new, &Context::new(json!({"items": []})), &settings);
    assert_eq!(patch_children(&new, &patches), emptied);
    assert!(logger.warnings().is_empty());
}

#[test]
fn unchanged_data_yields_no_patches() {
    let tpl = Template::compile("<p class=\"{{c}}\">{{t}}</p>").expect("compile");
    let ctx = Context::new(json!({"c": "x", "t": "hi"}));
    let old = tpl.to_virtual_tree(&ctx, None);
    let (new, patches) = tpl.update(&old, &ctx);
    assert_eq!(new, old);
    assert!(patches.is_empty());
}
